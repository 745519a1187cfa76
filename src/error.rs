//! Error types for the strand executor.

/// Result type alias for strand operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the strand executor.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Executor lifecycle error
    #[error("executor error: {0}")]
    Executor(String),

    /// Task-level failure, carried by async completion signals
    #[error("task failed: {0}")]
    Task(String),

    /// The settable side of a completion was dropped without resolving
    #[error("completion dropped before resolving")]
    CompletionDropped,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create an executor error
    pub fn executor<S: Into<String>>(msg: S) -> Self {
        Error::Executor(msg.into())
    }

    /// Create a task failure
    pub fn task<S: Into<String>>(msg: S) -> Self {
        Error::Task(msg.into())
    }
}
