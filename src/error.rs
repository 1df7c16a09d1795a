use sqlx::Error as SqlxError;
use std::path::PathBuf;
use thiserror::Error as ThisError;
use tokio::task::JoinError;

#[derive(Debug, ThisError)]
pub enum StorageError {
    #[error("credential store unavailable at {}: {source}", path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: SqlxError,
    },

    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("corrupt credential for user id {id}: {reason}")]
    CorruptRecord { id: i64, reason: String },

    #[error("password hashing error: {0}")]
    Hashing(String),

    #[error("hashing task failed: {0}")]
    Task(#[from] JoinError),
}

impl StorageError {
    pub fn hashing<E: std::fmt::Display>(err: E) -> Self {
        Self::Hashing(err.to_string())
    }

    /// Message safe to show to whoever sits in front of the terminal.
    pub fn user_message(&self) -> &'static str {
        match self {
            StorageError::Unavailable { .. } => {
                "Credential store unavailable. Try again or check the installation."
            }
            StorageError::Database(_)
            | StorageError::CorruptRecord { .. }
            | StorageError::Hashing(_)
            | StorageError::Task(_) => "An internal error occurred. The operation was aborted.",
        }
    }
}

#[derive(Debug, ThisError)]
pub enum RegisterError {
    #[error("username already taken: {0}")]
    UsernameTaken(String),

    #[error("{field} must not be empty")]
    InvalidInput { field: &'static str },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl RegisterError {
    pub fn user_message(&self) -> &'static str {
        match self {
            RegisterError::UsernameTaken(_) => "Registration failed. Username already exists.",
            RegisterError::InvalidInput { .. } => "Username and password must not be empty.",
            RegisterError::Storage(e) => e.user_message(),
        }
    }
}
