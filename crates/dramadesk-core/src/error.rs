//! Error types for dramadesk.
//!
//! This module provides a unified error type with explicit variants for
//! backend, not-found, transport, and input validation errors.

use std::fmt;
use thiserror::Error;

/// The unified error type for dramadesk operations.
///
/// Absence of a row on a single-row read is not an error; see
/// [`Fetched`](crate::Fetched). [`Error::NotFound`] is reserved for mutations
/// that target an identifier which does not exist.
#[derive(Debug, Error)]
pub enum Error {
    /// Errors reported by the database or REST service.
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    /// A mutation targeted an identifier that does not exist.
    #[error("{resource} '{id}' not found")]
    NotFound { resource: &'static str, id: String },

    /// Network or local I/O failures.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Input validation errors (bad URL, identifier, vocabulary value, row shape).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

impl Error {
    /// Shorthand for [`Error::NotFound`].
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Error::NotFound {
            resource,
            id: id.into(),
        }
    }

    /// Returns true if this is a [`Error::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },

    /// Local filesystem error.
    #[error("IO error: {message}")]
    Io { message: String },
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Transport(TransportError::Io {
            message: err.to_string(),
        })
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidInput(InvalidInputError::Json {
            message: err.to_string(),
        })
    }
}

/// An error reported by a backend, surfaced verbatim.
///
/// The fields follow the PostgREST error body (`code`, `message`, `details`,
/// `hint`); REST services that only return a message leave the rest empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendError {
    /// HTTP status code, if the backend is reached over HTTP.
    pub status: Option<u16>,
    /// Backend error code (e.g. `PGRST116`, `23505`).
    pub code: Option<String>,
    /// Error message from the backend.
    pub message: Option<String>,
    /// Additional details.
    pub details: Option<String>,
    /// Suggested fix, when the backend offers one.
    pub hint: Option<String>,
}

impl BackendError {
    /// Create a backend error with a status and optional code/message.
    pub fn new(status: Option<u16>, code: Option<String>, message: Option<String>) -> Self {
        Self {
            status,
            code,
            message,
            details: None,
            hint: None,
        }
    }

    /// Create a backend error carrying only a code and message.
    pub fn coded(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(None, Some(code.into()), Some(message.into()))
    }

    /// Attach details to this error.
    pub fn with_details(mut self, details: Option<String>) -> Self {
        self.details = details;
        self
    }

    /// Attach a hint to this error.
    pub fn with_hint(mut self, hint: Option<String>) -> Self {
        self.hint = hint;
        self
    }

    /// Check if the backend reported a missing resource.
    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "HTTP {}", status)?,
            None => write!(f, "backend")?,
        }
        if let Some(ref code) = self.code {
            write!(f, " [{}]", code)?;
        }
        if let Some(ref message) = self.message {
            write!(f, ": {}", message)?;
        }
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for BackendError {}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid backend URL.
    #[error("invalid backend URL '{value}': {reason}")]
    BackendUrl { value: String, reason: String },

    /// Invalid resource identifier.
    #[error("invalid identifier '{value}': {reason}")]
    ResourceId { value: String, reason: String },

    /// Value outside a fixed vocabulary.
    #[error("invalid {vocabulary} '{value}': expected one of {expected}")]
    Vocabulary {
        vocabulary: &'static str,
        value: String,
        expected: &'static str,
    },

    /// A row or request body was not a JSON object.
    #[error("invalid row: {reason}")]
    Row { reason: String },

    /// JSON encoding or decoding failed.
    #[error("invalid JSON: {message}")]
    Json { message: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}
