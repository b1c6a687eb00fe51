use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// An input line that does not map to a view event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    #[error("missing title")]
    MissingTitle,

    #[error("`{0}` is not a todo id")]
    InvalidId(String),
}
