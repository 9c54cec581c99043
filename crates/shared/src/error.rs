//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Input failed a pre-save validation rule; no I/O was performed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A data-layer routine ran but rejected the request with a result code.
    #[error("{routine} rejected the request (code {code}): {message}")]
    DomainRejection {
        /// Name of the creating/updating routine that produced the code.
        routine: String,
        /// The negative result code returned by the routine.
        code: i32,
        /// Human-readable description of the code.
        message: String,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// External service error.
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Best-effort cleanup failed; the surrounding operation still completed.
    #[error("Cleanup failed: {0}")]
    Cleanup(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Returns a stable code for logs and structured reporting.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::DomainRejection { .. } => "DOMAIN_REJECTION",
            Self::Database(_) => "DATABASE_ERROR",
            Self::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            Self::Cleanup(_) => "CLEANUP_FAILED",
            Self::Config(_) => "CONFIG_ERROR",
        }
    }

    /// True when the error left persistent state untouched.
    #[must_use]
    pub const fn is_pre_persistence(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Config(_))
    }
}
