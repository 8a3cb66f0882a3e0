//! Application error types

use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    // ===== Recoverable Errors (degrade in place, continue) =====
    #[error("Storage error: {0}")]
    Storage(#[from] app_storage::StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Image search failed: {0}")]
    Fetch(String),

    #[error("Message catalog error: {0}")]
    Catalog(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // ===== Fatal Errors (bootstrap cannot continue) =====
    #[error("Initialization failed: {0}")]
    Init(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Is this error recoverable?
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, AppError::Init(_))
    }

    /// Is this a fatal error?
    pub fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }

    /// Get a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            AppError::Storage(_) => "Settings could not be saved".to_string(),
            AppError::Fetch(_) => "Images could not be loaded".to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<toml::de::Error> for AppError {
    fn from(e: toml::de::Error) -> Self {
        AppError::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for AppError {
    fn from(e: toml::ser::Error) -> Self {
        AppError::Config(e.to_string())
    }
}
