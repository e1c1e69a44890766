use std::io::{self, BufRead, ErrorKind, Write};

use tracing::{debug, warn};

use crate::{
    task_board::{Applied, TaskBoard},
    view::View,
};

enum Flow {
    Continue,
    Exit,
}

/// Numbered-menu loop over a board. Input and output are generic so the
/// loop can be scripted.
pub struct Shell<R, W> {
    board: TaskBoard,
    input: R,
    output: W,
    view: View,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(board: TaskBoard, input: R, output: W, view: View) -> Self {
        Self {
            board,
            input,
            output,
            view,
        }
    }

    #[cfg(test)]
    fn into_parts(self) -> (TaskBoard, W) {
        (self.board, self.output)
    }

    pub fn run(&mut self) -> io::Result<()> {
        let welcome = self.view.welcome();
        self.say(&welcome)?;
        loop {
            let menu = self.view.menu();
            self.say(&menu)?;
            let Some(choice) = self.prompt("\nEnter your choice (1-9): ")? else {
                let text = self.view.exiting();
                return self.say(&text);
            };
            debug!(choice = %choice, "menu choice");
            let flow = match choice.as_str() {
                "1" => self.add()?,
                "2" => self.list()?,
                "3" => self.complete()?,
                "4" => self.delete()?,
                "5" => self.clear_completed()?,
                "6" => self.edit()?,
                "7" => self.statistics()?,
                "8" => self.search()?,
                "9" => {
                    return self.say("\nThank you for using Task Manager! Goodbye! 👋\n");
                }
                _ => {
                    let text = self
                        .view
                        .warning("Invalid choice. Please enter a number between 1 and 9.");
                    self.say(&text)?;
                    Flow::Continue
                }
            };
            if let Flow::Exit = flow {
                let text = self.view.exiting();
                return self.say(&text);
            }
        }
    }

    fn say(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    /// `None` once input is exhausted.
    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.output, "{message}")?;
        self.output.flush()?;
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(line.trim().to_string())),
            // The offending line has been consumed; answer with nothing.
            Err(err) if err.kind() == ErrorKind::InvalidData => {
                warn!(error = %err, "discarding unreadable input");
                let text = self.view.warning(&format!("An error occurred: {err}"));
                self.say(&text)?;
                Ok(Some(String::new()))
            }
            Err(err) => Err(err),
        }
    }

    /// `Ok(None)` when the answer was not a number and has been reported.
    fn prompt_id(&mut self, message: &str) -> io::Result<Option<Option<u32>>> {
        let Some(answer) = self.prompt(message)? else {
            return Ok(None);
        };
        match answer.parse::<u32>() {
            Ok(id) => Ok(Some(Some(id))),
            Err(_) => {
                let text = self.view.warning("Invalid task ID. Please enter a number.");
                self.say(&text)?;
                Ok(Some(None))
            }
        }
    }

    fn confirm(&mut self, message: &str) -> io::Result<Option<bool>> {
        Ok(self
            .prompt(message)?
            .map(|answer| answer.eq_ignore_ascii_case("y")))
    }

    fn report<T>(
        &mut self,
        applied: Applied<T>,
        render: impl FnOnce(&View, &T) -> String,
    ) -> io::Result<()> {
        let text = render(&self.view, &applied.outcome);
        self.say(&text)?;
        if let Err(err) = &applied.persisted {
            let text = self.view.save_failed(err);
            self.say(&text)?;
        }
        Ok(())
    }

    fn add(&mut self) -> io::Result<Flow> {
        let Some(description) = self.prompt("Enter task description: ")? else {
            return Ok(Flow::Exit);
        };
        if description.is_empty() {
            let text = self.view.warning("Task description cannot be empty!");
            self.say(&text)?;
            return Ok(Flow::Continue);
        }
        let applied = self.board.add_task(description);
        self.report(applied, View::added)?;
        Ok(Flow::Continue)
    }

    fn list(&mut self) -> io::Result<Flow> {
        let text = self.view.listing(&self.board.list());
        self.say(&text)?;
        Ok(Flow::Continue)
    }

    fn complete(&mut self) -> io::Result<Flow> {
        self.list()?;
        let Some(id) = self.prompt_id("Enter task ID to complete: ")? else {
            return Ok(Flow::Exit);
        };
        if let Some(id) = id {
            let applied = self.board.complete_task(id);
            self.report(applied, |view, outcome| view.completed(id, outcome))?;
        }
        Ok(Flow::Continue)
    }

    fn delete(&mut self) -> io::Result<Flow> {
        self.list()?;
        let Some(id) = self.prompt_id("Enter task ID to delete: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(id) = id else {
            return Ok(Flow::Continue);
        };
        let question = format!("Are you sure you want to delete task [{id}]? (y/n): ");
        match self.confirm(&question)? {
            None => return Ok(Flow::Exit),
            Some(true) => {
                let applied = self.board.delete_task(id);
                self.report(applied, |view, outcome| view.deleted(id, outcome))?;
            }
            Some(false) => self.say("Deletion cancelled.")?,
        }
        Ok(Flow::Continue)
    }

    fn clear_completed(&mut self) -> io::Result<Flow> {
        match self.confirm("Are you sure you want to clear all completed tasks? (y/n): ")? {
            None => return Ok(Flow::Exit),
            Some(true) => {
                let applied = self.board.clear_completed();
                self.report(applied, |view, removed| view.cleared(*removed))?;
            }
            Some(false) => self.say("Operation cancelled.")?,
        }
        Ok(Flow::Continue)
    }

    fn edit(&mut self) -> io::Result<Flow> {
        self.list()?;
        let Some(id) = self.prompt_id("Enter task ID to edit: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(id) = id else {
            return Ok(Flow::Continue);
        };
        let Some(description) = self.prompt("Enter new task description: ")? else {
            return Ok(Flow::Exit);
        };
        if description.is_empty() {
            let text = self.view.warning("Task description cannot be empty!");
            self.say(&text)?;
            return Ok(Flow::Continue);
        }
        let applied = self.board.edit_task(id, description);
        self.report(applied, |view, outcome| view.edited(id, outcome))?;
        Ok(Flow::Continue)
    }

    fn statistics(&mut self) -> io::Result<Flow> {
        let text = self.view.statistics(&self.board.statistics());
        self.say(&text)?;
        Ok(Flow::Continue)
    }

    fn search(&mut self) -> io::Result<Flow> {
        let Some(keyword) = self.prompt("Enter search keyword: ")? else {
            return Ok(Flow::Exit);
        };
        if keyword.is_empty() {
            let text = self.view.warning("Search keyword cannot be empty!");
            self.say(&text)?;
            return Ok(Flow::Continue);
        }
        let text = self.view.search(&keyword, &self.board.search(&keyword));
        self.say(&text)?;
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::{storage::MemoryStorage, task_board::IdPolicy};

    fn run_script(storage: &MemoryStorage, script: impl Into<Vec<u8>>) -> (TaskBoard, String) {
        let board = TaskBoard::open(storage.clone(), IdPolicy::Monotonic);
        let input = Cursor::new(script.into());
        let mut shell = Shell::new(board, input, Vec::new(), View::new(false));
        shell.run().unwrap();
        let (board, output) = shell.into_parts();
        (board, String::from_utf8(output).unwrap())
    }

    #[test]
    fn add_list_and_exit() {
        let storage = MemoryStorage::new();
        let (board, out) = run_script(&storage, "1\nBuy milk\n2\n9\n");
        assert!(out.contains("✓ Task added: Buy milk"));
        assert!(out.contains("○ [1] Buy milk"));
        assert!(out.contains("Progress: 0/1 completed"));
        assert!(out.contains("Goodbye!"));
        assert_eq!(board.tasks().len(), 1);
        assert_eq!(storage.tasks().len(), 1);
    }

    #[test]
    fn empty_description_is_rejected_before_the_board() {
        let storage = MemoryStorage::new();
        let (board, out) = run_script(&storage, "1\n   \n9\n");
        assert!(out.contains("Task description cannot be empty!"));
        assert!(board.tasks().is_empty());
        assert_eq!(storage.save_count(), 0);
    }

    #[test]
    fn non_numeric_id_is_rejected() {
        let storage = MemoryStorage::new();
        let (_, out) = run_script(&storage, "1\nA\n3\nabc\n9\n");
        assert!(out.contains("Invalid task ID. Please enter a number."));
        assert_eq!(storage.save_count(), 1);
    }

    #[test]
    fn complete_twice_reports_already_completed() {
        let storage = MemoryStorage::new();
        let (_, out) = run_script(&storage, "1\nA\n3\n1\n3\n1\n3\n7\n9\n");
        assert!(out.contains("✓ Task [1] marked as completed!"));
        assert!(out.contains("Task [1] is already completed!"));
        assert!(out.contains("Task [7] not found."));
    }

    #[test]
    fn delete_requires_confirmation() {
        let storage = MemoryStorage::new();
        let (board, out) = run_script(&storage, "1\nA\n4\n1\nn\n4\n1\ny\n9\n");
        assert!(out.contains("Deletion cancelled."));
        assert!(out.contains("✓ Task [1] deleted: A"));
        assert!(board.tasks().is_empty());
    }

    #[test]
    fn clear_edit_stats_and_search() {
        let storage = MemoryStorage::new();
        let script = "1\nBuy milk\n1\nPay rent\n3\n1\n5\ny\n6\n2\nPay the rent\n7\n8\nRENT\n8\nzzz\n9\n";
        let (board, out) = run_script(&storage, script);
        assert!(out.contains("Removed 1 completed task(s)."));
        assert!(out.contains("  Old: Pay rent\n  New: Pay the rent"));
        assert!(out.contains("Completion rate:    0.0%"));
        assert!(out.contains("Found 1 matching task(s)."));
        assert!(out.contains("No tasks found matching 'zzz'."));
        assert_eq!(board.tasks()[0].description, "Pay the rent");
    }

    #[test]
    fn invalid_choice_keeps_looping() {
        let storage = MemoryStorage::new();
        let (_, out) = run_script(&storage, "42\n7\n9\n");
        assert!(out.contains("Invalid choice. Please enter a number between 1 and 9."));
        assert!(out.contains("No tasks to display statistics for."));
    }

    #[test]
    fn end_of_input_exits_cleanly() {
        let storage = MemoryStorage::new();
        let (_, out) = run_script(&storage, "1\n");
        assert!(out.contains("Exiting Task Manager."));
    }

    #[test]
    fn save_failure_is_reported_and_loop_continues() {
        let storage = MemoryStorage::new();
        storage.set_failing(true);
        let (board, out) = run_script(&storage, "1\nA\n2\n9\n");
        assert!(out.contains("Error saving tasks: storage is read-only"));
        assert!(out.contains("○ [1] A"));
        assert_eq!(board.tasks().len(), 1);
    }

    #[test]
    fn invalid_utf8_line_is_reported_and_loop_continues() {
        let storage = MemoryStorage::new();
        let mut script = b"7\n".to_vec();
        script.extend_from_slice(&[0xff, 0xfe, b'\n']);
        script.extend_from_slice(b"1\nafter\n9\n");

        let (board, out) = run_script(&storage, script);
        assert!(out.contains("An error occurred:"));
        assert!(out.contains("Invalid choice."));
        assert!(out.contains("✓ Task added: after"));
        assert_eq!(board.tasks()[0].description, "after");
    }

    #[test]
    fn invalid_utf8_id_is_treated_as_non_numeric() {
        let storage = MemoryStorage::new();
        let mut script = b"1\nA\n3\n".to_vec();
        script.extend_from_slice(&[0xc3, b'\n']);
        script.extend_from_slice(b"9\n");

        let (board, out) = run_script(&storage, script);
        assert!(out.contains("Invalid task ID. Please enter a number."));
        assert!(!board.tasks()[0].completed);
    }
}
