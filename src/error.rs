use std::fmt;

use rusqlite;
use thiserror::Error;
use tracing::{error, warn};

pub type AppResult<T> = Result<T, AppError>;

/// Fixed failure taxonomy for the identification pipeline. Every failure
/// surfaced by `identify` carries exactly one of these codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifyErrorCode {
    InvalidInput,
    Unauthorized,
    NotFound,
    NoCredits,
    ServerError,
    NetworkError,
}

impl IdentifyErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            IdentifyErrorCode::InvalidInput => "INVALID_INPUT",
            IdentifyErrorCode::Unauthorized => "UNAUTHORIZED",
            IdentifyErrorCode::NotFound => "NOT_FOUND",
            IdentifyErrorCode::NoCredits => "NO_CREDITS",
            IdentifyErrorCode::ServerError => "SERVER_ERROR",
            IdentifyErrorCode::NetworkError => "NETWORK_ERROR",
        }
    }
}

impl fmt::Display for IdentifyErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("database error: {message}")]
    Database { message: String },

    #[error("record not found")]
    NotFound,

    #[error("conflicting record: {message}")]
    Conflict { message: String },

    #[error("{message}")]
    Identify {
        code: IdentifyErrorCode,
        message: String,
        correlation_id: Option<String>,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl AppError {
    pub fn identify(code: IdentifyErrorCode, message: impl Into<String>) -> Self {
        Self::identify_with_correlation(code, message, None)
    }

    pub fn identify_with_correlation(
        code: IdentifyErrorCode,
        message: impl Into<String>,
        correlation_id: Option<&str>,
    ) -> Self {
        let message = message.into();
        let correlation = correlation_id.map(|value| value.to_string());
        match &correlation {
            Some(id) => {
                warn!(
                    target: "app::identify::error",
                    code = %code,
                    correlation_id = %id,
                    %message
                );
            }
            None => {
                warn!(target: "app::identify::error", code = %code, %message);
            }
        }

        AppError::Identify {
            code,
            message,
            correlation_id: correlation,
        }
    }

    pub fn identify_code(&self) -> Option<IdentifyErrorCode> {
        match self {
            AppError::Identify { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn identify_correlation_id(&self) -> Option<&str> {
        match self {
            AppError::Identify { correlation_id, .. } => correlation_id.as_deref(),
            _ => None,
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        let message = message.into();
        warn!(target: "app::conflict", %message, "conflict error");
        AppError::Conflict { message }
    }

    pub fn not_found() -> Self {
        warn!(target: "app::database", "resource not found");
        AppError::NotFound
    }

    pub fn database(message: impl Into<String>) -> Self {
        let message = message.into();
        error!(target: "app::database", %message, "database error");
        AppError::Database { message }
    }

    pub fn other(message: impl Into<String>) -> Self {
        let message = message.into();
        error!(target: "app::other", %message, "other error");
        AppError::Other(message)
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(error: rusqlite::Error) -> Self {
        use rusqlite::Error::{QueryReturnedNoRows, SqliteFailure};
        use rusqlite::ErrorCode;

        match &error {
            QueryReturnedNoRows => AppError::not_found(),
            SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation => {
                AppError::conflict("uniqueness or constraint violation")
            }
            _ => {
                error!(target: "app::database", error = ?error, "sqlite error");
                AppError::database(error.to_string())
            }
        }
    }
}
