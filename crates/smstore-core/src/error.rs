//! # Error Types
//!
//! Domain-specific error types for smstore-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Hierarchy                                 │
//! │                                                                         │
//! │  CoreError (business logic errors)                                      │
//! │  ├── InvalidPayment { reason }                                          │
//! │  ├── AmountOutOfRange { field }                                         │
//! │  └── Validation(ValidationError)                                        │
//! │                                                                         │
//! │  ValidationError (input validation errors)                              │
//! │  ├── Required { field }                                                 │
//! │  ├── TooLong { field, max }                                             │
//! │  ├── MustNotBeNegative { field }                                        │
//! │  └── InvalidFormat { field, reason }                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Messages are shown to the cashier as-is in the `{ "message" }` body,
//! so they name the field or id involved.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Requests that cannot be turned into a sale. The server answers them
/// with 400.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The payment part of a checkout cannot be interpreted.
    ///
    /// ## When This Occurs
    /// - `paymentType` is not one of `paid`, `half`, `due`
    /// - `payment_status` on the legacy endpoint is not a known status
    #[error("Invalid payment: {reason}")]
    InvalidPayment { reason: String },

    /// A line total, sale total or shortfall does not fit in poisha.
    #[error("{field} is too large")]
    AmountOutOfRange { field: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before anything touches the database.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Amount must be zero or more.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., invalid id, invalid date).
    #[error("Invalid {field}: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
