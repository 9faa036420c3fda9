use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppError {
    /// Source is larger than the configured limit; nothing was parsed.
    InputTooLarge { size: u64, limit: u64 },
    /// Source has no rows at all.
    EmptyInput,
    MalformedInput(String),
    /// Source had rows but none of them produced an entry.
    NoValidData,
    IoFailure(String),
    QuotaExceeded(String),
    ServiceError(String),
    NotFound(String),
    ConfigError(String),
    ValidationError(String),
}

impl AppError {
    /// Process exit code for the command-line entry point.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::ConfigError(_) | AppError::ValidationError(_) => 2,
            AppError::InputTooLarge { .. } => 3,
            AppError::EmptyInput => 4,
            AppError::MalformedInput(_) => 5,
            AppError::NoValidData => 6,
            AppError::IoFailure(_) => 7,
            AppError::QuotaExceeded(_) => 8,
            AppError::ServiceError(_) | AppError::NotFound(_) => 9,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InputTooLarge { size, limit } => write!(
                f,
                "Input too large: {:.1}MB exceeds the {:.1}MB limit",
                *size as f64 / 1024.0 / 1024.0,
                *limit as f64 / 1024.0 / 1024.0
            ),
            AppError::EmptyInput => write!(f, "Empty input: the file has no rows"),
            AppError::MalformedInput(msg) => write!(f, "Malformed input: {}", msg),
            AppError::NoValidData => write!(
                f,
                "No valid data: no song rows were found under a playlist header"
            ),
            AppError::IoFailure(msg) => write!(f, "IO error: {}", msg),
            AppError::QuotaExceeded(msg) => write!(f, "Quota exceeded: {}", msg),
            AppError::ServiceError(msg) => write!(f, "Service error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Config error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoFailure(err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            AppError::IoFailure(err.to_string())
        } else {
            AppError::MalformedInput(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
