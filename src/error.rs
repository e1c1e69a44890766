use std::path::PathBuf;

use thiserror::Error;

/// Failure to write the task document.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not encode tasks: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("{0}")]
    Unavailable(String),
}
