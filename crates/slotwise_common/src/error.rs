// --- File: crates/slotwise_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type for all Slotwise errors.
///
/// Each crate keeps its own error enum and implements `From<ItsError> for SlotwiseError`
/// so handlers can turn any failure into an HTTP response.
#[derive(Error, Debug)]
pub enum SlotwiseError {
    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during authentication or authorization
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Error occurred due to a conflict (e.g., slot already taken)
    #[error("Conflict: {0}")]
    ConflictError(String),

    /// Error occurred due to a resource not being found
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for SlotwiseError {
    fn status_code(&self) -> u16 {
        match self {
            SlotwiseError::ParseError(_) => 400,
            SlotwiseError::ConfigError(_) => 500,
            SlotwiseError::AuthError(_) => 401,
            SlotwiseError::ValidationError(_) => 400,
            SlotwiseError::ExternalServiceError { .. } => 502,
            SlotwiseError::ConflictError(_) => 409,
            SlotwiseError::NotFoundError(_) => 404,
            SlotwiseError::InternalError(_) => 500,
        }
    }
}

/// A trait for adding context to errors.
pub trait Context<T, E> {
    /// Adds context to an error.
    fn context<C>(self, context: C) -> Result<T, SlotwiseError>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Adds context to an error with a lazy context provider.
    fn with_context<C, F>(self, f: F) -> Result<T, SlotwiseError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E: std::error::Error + Send + Sync + 'static> Context<T, E> for Result<T, E> {
    fn context<C>(self, context: C) -> Result<T, SlotwiseError>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|error| internal_error(format!("{}: {}", context, error)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, SlotwiseError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|error| internal_error(format!("{}: {}", f(), error)))
    }
}

// Common error conversions
impl From<serde_json::Error> for SlotwiseError {
    fn from(err: serde_json::Error) -> Self {
        SlotwiseError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for SlotwiseError {
    fn from(err: std::io::Error) -> Self {
        internal_error(err)
    }
}

impl From<config::ConfigError> for SlotwiseError {
    fn from(err: config::ConfigError) -> Self {
        SlotwiseError::ConfigError(err.to_string())
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> SlotwiseError {
    SlotwiseError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> SlotwiseError {
    SlotwiseError::ValidationError(message.to_string())
}

pub fn auth_error<T: fmt::Display>(message: T) -> SlotwiseError {
    SlotwiseError::AuthError(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> SlotwiseError {
    SlotwiseError::NotFoundError(message.to_string())
}

pub fn conflict<T: fmt::Display>(message: T) -> SlotwiseError {
    SlotwiseError::ConflictError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> SlotwiseError {
    SlotwiseError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> SlotwiseError {
    SlotwiseError::InternalError(message.to_string())
}
