//! Text rendering of board outcomes. Nothing here touches the board.

use crossterm::style::{style, Color, Stylize};

use crate::{
    error::StorageError,
    task::Task,
    task_board::{CompleteOutcome, DeleteOutcome, EditOutcome, Listing, SearchResult, Statistics},
};

const WIDTH: usize = 60;

#[derive(Debug, Clone, Copy)]
pub struct View {
    color: bool,
}

impl View {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            style(text).with(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn ok(&self) -> String {
        self.paint("✓", Color::Green)
    }

    fn rule(&self) -> String {
        "=".repeat(WIDTH)
    }

    fn banner(&self, title: &str) -> Vec<String> {
        vec![
            format!("\n{}", self.rule()),
            self.paint(title, Color::Cyan),
            self.rule(),
        ]
    }

    fn task_line(&self, task: &Task) -> String {
        let mark = if task.completed {
            self.ok()
        } else {
            "○".to_string()
        };
        format!("{mark} [{}] {}", task.id, task.description)
    }

    pub fn welcome(&self) -> String {
        self.banner("Welcome to Task Manager!").join("\n")
    }

    pub fn menu(&self) -> String {
        let mut lines = self.banner("TASK MANAGER");
        lines.extend(
            [
                "1. Add a new task",
                "2. List all tasks",
                "3. Complete a task",
                "4. Delete a task",
                "5. Clear completed tasks",
                "6. Edit a task",
                "7. View statistics",
                "8. Search tasks",
                "9. Exit",
            ]
            .map(String::from),
        );
        lines.push(self.rule());
        lines.join("\n")
    }

    /// Farewell for closed input or an interrupt.
    pub fn exiting(&self) -> String {
        "\n\nExiting Task Manager. Goodbye! 👋\n".into()
    }

    pub fn added(&self, task: &Task) -> String {
        format!("{} Task added: {}", self.ok(), task.description)
    }

    pub fn listing(&self, listing: &Listing<'_>) -> String {
        let Listing::Tasks {
            tasks,
            completed,
            total,
        } = listing
        else {
            return "\nNo tasks found. Add some tasks to get started!".into();
        };
        let mut lines = self.banner("YOUR TASKS");
        for task in tasks.iter() {
            lines.push(self.task_line(task));
            if task.completed {
                lines.push(format!("    Created: {}", task.created_at));
            }
        }
        lines.push(self.rule());
        lines.push(format!("Progress: {completed}/{total} completed"));
        lines.push(format!("{}\n", self.rule()));
        lines.join("\n")
    }

    pub fn completed(&self, id: u32, outcome: &CompleteOutcome) -> String {
        match outcome {
            CompleteOutcome::NotFound => self.not_found(id),
            CompleteOutcome::AlreadyCompleted => format!("Task [{id}] is already completed!"),
            CompleteOutcome::Completed(_) => {
                format!("{} Task [{id}] marked as completed!", self.ok())
            }
        }
    }

    pub fn deleted(&self, id: u32, outcome: &DeleteOutcome) -> String {
        match outcome {
            DeleteOutcome::NotFound => self.not_found(id),
            DeleteOutcome::Deleted { description } => {
                format!("{} Task [{id}] deleted: {description}", self.ok())
            }
        }
    }

    pub fn edited(&self, id: u32, outcome: &EditOutcome) -> String {
        match outcome {
            EditOutcome::NotFound => self.not_found(id),
            EditOutcome::Updated { old, new } => format!(
                "{} Task [{id}] updated:\n  Old: {old}\n  New: {new}",
                self.ok()
            ),
        }
    }

    pub fn cleared(&self, removed: usize) -> String {
        if removed == 0 {
            "No completed tasks to remove.".into()
        } else {
            format!("{} Removed {removed} completed task(s).", self.ok())
        }
    }

    pub fn statistics(&self, stats: &Statistics) -> String {
        if stats.total == 0 {
            return "\nNo tasks to display statistics for.".into();
        }
        let mut lines = self.banner("TASK STATISTICS");
        lines.push(format!("Total tasks:        {}", stats.total));
        lines.push(format!("Completed:          {}", stats.completed));
        lines.push(format!("Pending:            {}", stats.pending));
        lines.push(format!("Completion rate:    {:.1}%", stats.completion_rate));
        lines.push(format!("{}\n", self.rule()));
        lines.join("\n")
    }

    pub fn search(&self, keyword: &str, result: &SearchResult) -> String {
        let SearchResult::Matches(tasks) = result else {
            return format!("\nNo tasks found matching '{keyword}'.");
        };
        let mut lines = self.banner(&format!("SEARCH RESULTS: '{keyword}'"));
        lines.extend(tasks.iter().map(|t| self.task_line(t)));
        lines.push(self.rule());
        lines.push(format!("Found {} matching task(s).", tasks.len()));
        lines.push(format!("{}\n", self.rule()));
        lines.join("\n")
    }

    pub fn save_failed(&self, err: &StorageError) -> String {
        self.paint(&format!("Error saving tasks: {err}"), Color::Red)
    }

    pub fn warning(&self, text: &str) -> String {
        self.paint(text, Color::Yellow)
    }

    fn not_found(&self, id: u32) -> String {
        format!("Task [{id}] not found.")
    }
}
