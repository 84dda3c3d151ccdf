//! # Error Types
//!
//! Domain-specific error types for shopdesk-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  shopdesk-core errors (this file)                                      │
//! │  ├── CoreError        - Business rule failures                         │
//! │  └── ValidationError  - Form input validation failures                 │
//! │                                                                         │
//! │  shopdesk-client errors (separate crate)                               │
//! │  └── ClientError      - HTTP, decoding, config, auth failures          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ClientError → displayed message   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The pricing engine and report aggregator never return errors: malformed
//! numbers are clamped and empty inputs produce zeroed results. Errors here
//! come from form validation, discount rules and CSV export.

use thiserror::Error;

use crate::money::Money;
use crate::types::DiscountStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Discount code cannot be used right now.
    ///
    /// ## When This Occurs
    /// - The discount window has not started yet (Scheduled)
    /// - The window has ended or the usage limit was reached (Expired)
    #[error("Discount {code} is {status:?} and cannot be applied")]
    DiscountNotActive { code: String, status: DiscountStatus },

    /// Purchase amount is below the discount's minimum purchase.
    #[error("Discount {code} requires a minimum purchase of {minimum}, got {amount}")]
    MinimumPurchaseNotMet {
        code: String,
        minimum: Money,
        amount: Money,
    },

    /// Report export failed while writing CSV.
    #[error("Export failed: {0}")]
    Export(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These mirror the checks the dashboard forms perform before submitting
/// a product, customer, order or discount to the backend.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., invalid SKU, invalid email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A date window ends before it starts.
    #[error("{field} ends before it starts")]
    InvalidWindow { field: String },
}

impl ValidationError {
    /// Creates a Required error for a field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
