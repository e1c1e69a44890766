pub mod config;
pub mod error;
pub mod shell;
pub mod storage;
pub mod task;
pub mod task_board;
pub mod view;

pub use error::StorageError;
pub use storage::{JsonFileStorage, MemoryStorage, TaskStorage};
pub use task::Task;
pub use task_board::{
    Applied, CompleteOutcome, DeleteOutcome, EditOutcome, IdPolicy, Listing, SearchResult,
    Statistics, TaskBoard,
};
