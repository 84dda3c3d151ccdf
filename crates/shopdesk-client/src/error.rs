//! # Client Error Types
//!
//! Error types for resource store operations.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     API                 │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Transport      │  │  Http {status, message} │ │
//! │  │  ConfigLoad     │  │  Timeout        │  │  Unauthorized           │ │
//! │  │                 │  │                 │  │  NotFound               │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │    Decoding     │  │    Session      │  │      Domain             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Decode         │  │  NotAuthenticated│ │  Validation, Core       │ │
//! │  │  MissingId      │  │                 │  │  Export                 │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `user_message()` is what the dashboard shows in its error banner. For API
//! errors it is the backend's own `message`.

use shopdesk_core::{CoreError, ValidationError};
use thiserror::Error;

/// Result type alias for store operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Store error type covering every failure between a form and the backend.
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid client configuration.
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    /// Failed to read or parse the config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Request could not be sent or the response could not be read.
    #[error("Request failed: {0}")]
    Transport(String),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    // =========================================================================
    // API Errors
    // =========================================================================
    /// Backend answered with a non-success status.
    #[error("API error {status}: {message}")]
    Http { status: u16, message: String },

    /// Backend rejected the credentials (401/403).
    #[error("Not authorized: {0}")]
    Unauthorized(String),

    /// Resource does not exist (404).
    #[error("{resource} {id} not found")]
    NotFound { resource: String, id: String },

    // =========================================================================
    // Decoding Errors
    // =========================================================================
    /// Response body was not the expected JSON.
    #[error("Failed to parse response: {0}")]
    Decode(String),

    /// An entity that must have a backend id has none.
    #[error("{0} has no id; save it before updating or deleting")]
    MissingId(&'static str),

    // =========================================================================
    // Session Errors
    // =========================================================================
    /// Operation needs a signed-in staff member.
    #[error("Not signed in")]
    NotAuthenticated,

    // =========================================================================
    // Domain Errors
    // =========================================================================
    /// Form input failed validation; no request was sent.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Business rule failure from shopdesk-core.
    #[error("{0}")]
    Core(#[from] CoreError),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ClientError {
    /// Returns true if the same request might succeed if sent again.
    ///
    /// ## Retryable Errors
    /// - Transport failures and timeouts
    /// - 5xx responses and 429
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Transport(_) | ClientError::Timeout(_) => true,
            ClientError::Http { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Returns true if the user has to sign in (again).
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            ClientError::Unauthorized(_) | ClientError::NotAuthenticated
        )
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidConfig(_) | ClientError::ConfigLoadFailed(_)
        )
    }

    /// The text shown in the dashboard's error banner.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Http { message, .. } | ClientError::Unauthorized(message) => {
                message.clone()
            }
            other => other.to_string(),
        }
    }
}
