use std::path::PathBuf;

use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A directory could not be read.
    #[error("Error reading directory {}: {source}", path.display())]
    ListDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file exceeded the viewer size ceiling.
    #[error("file too large ({size} bytes), maximum allowed is {limit} bytes")]
    FileTooLarge { size: u64, limit: u64 },

    /// A shell command exited unsuccessfully or could not be spawned.
    #[error("{0}")]
    CommandFailure(String),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Invalid path provided by the user.
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}
