use thiserror::Error;

use crate::materials::navigator::NavError;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors from reading the catalog or log file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Invalid path provided by the user.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// The catalog file could not be decoded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] serde_json::Error),

    /// No module in the catalog matches the requested id or slug.
    #[error("Unknown module: {0}")]
    UnknownModule(String),

    /// The tracing subscriber could not be installed.
    #[error("Logging error: {0}")]
    Logging(String),

    /// A navigation request that does not fit the current tree.
    #[error("Navigation error: {0}")]
    Navigation(#[from] NavError),
}
