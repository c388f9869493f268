use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("invalid_input - {0}")]
    InvalidInput(String),
    #[error("invalid_data - {0}")]
    InvalidData(String),
    /// Raised by file import when the payload is not valid JSON or does not
    /// have the `{ "todos": [...], "removedTodos": [...] }` shape.
    #[error("parse_error - {0}")]
    Parse(String),
    #[error("io_error - {0}")]
    Io(String),
    #[error("clipboard_error - {0}")]
    Clipboard(String),
}

impl AppError {
    pub fn invalid_input<M: Into<String>>(message: M) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_data<M: Into<String>>(message: M) -> Self {
        Self::InvalidData(message.into())
    }

    pub fn parse<M: Into<String>>(message: M) -> Self {
        Self::Parse(message.into())
    }

    pub fn io<M: Into<String>>(message: M) -> Self {
        Self::Io(message.into())
    }

    pub fn clipboard<M: Into<String>>(message: M) -> Self {
        Self::Clipboard(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::InvalidData(_) => "invalid_data",
            Self::Parse(_) => "parse_error",
            Self::Io(_) => "io_error",
            Self::Clipboard(_) => "clipboard_error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::InvalidInput(message)
            | Self::InvalidData(message)
            | Self::Parse(message)
            | Self::Io(message)
            | Self::Clipboard(message) => message,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}
