use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResetError {
    #[error("init.sql not found at {}", .0.display())]
    SeedFileMissing(PathBuf),

    #[error("database unreachable after {attempts} attempt(s): {reason}")]
    DatabaseUnreachable { attempts: u32, reason: String },

    #[error("MySQL error during reset: {0}")]
    Database(String),

    #[error("Unexpected error during reset: {0}")]
    Unexpected(String),
}

impl From<std::io::Error> for ResetError {
    fn from(err: std::io::Error) -> Self {
        Self::Unexpected(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ResetError>;
