use chrono::Local;
use serde::{Deserialize, Serialize};

pub const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: u32,
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: String, // "YYYY-MM-DD HH:MM:SS"
}

impl Task {
    pub fn new(id: u32, description: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
            completed: false,
            created_at: Local::now().format(CREATED_AT_FORMAT).to_string(),
        }
    }

    pub fn matches(&self, keyword: &str) -> bool {
        self.description
            .to_lowercase()
            .contains(&keyword.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    #[test]
    fn new_task_is_pending_with_formatted_timestamp() {
        let task = Task::new(3, "Water plants");
        assert_eq!(task.id, 3);
        assert!(!task.completed);
        assert!(NaiveDateTime::parse_from_str(&task.created_at, CREATED_AT_FORMAT).is_ok());
    }

    #[test]
    fn serializes_with_document_field_names() {
        let task = Task {
            id: 1,
            description: "Buy milk".into(),
            completed: true,
            created_at: "2024-01-02 03:04:05".into(),
        };
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": 1,
                "description": "Buy milk",
                "completed": true,
                "created_at": "2024-01-02 03:04:05",
            })
        );
    }

    #[test]
    fn missing_completed_defaults_to_false() {
        let task: Task = serde_json::from_str(
            r#"{"id": 4, "description": "x", "created_at": "2024-01-02 03:04:05"}"#,
        )
        .unwrap();
        assert!(!task.completed);
    }

    #[test]
    fn matching_ignores_case() {
        let task = Task::new(1, "Pay Rent");
        assert!(task.matches("pay"));
        assert!(task.matches("RENT"));
        assert!(!task.matches("milk"));
    }
}
