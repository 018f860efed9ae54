//! # Error Types
//!
//! Domain-specific error types for centavo-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  centavo-core errors (this file)                                       │
//! │  ├── CoreError        - Configuration and domain errors                │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  centavo-db errors (separate crate)                                    │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  NOT here: the codec and resolver. They are total functions and never  │
//! │  return an error; garbage input degrades to zero.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Configuration and domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A locale tag that has no formatting conventions.
    ///
    /// ## When This Occurs
    /// - `CENTAVO_LOCALE` set to an unsupported tag
    /// - `"xx-YY".parse::<Locale>()`
    #[error("Unknown locale: {0}")]
    UnknownLocale(String),

    /// A display style other than `currency` or `decimal`.
    #[error("Unknown display style: {0}")]
    UnknownDisplayStyle(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Why an input was rejected. Every variant names the offending field.
///
/// Produced by [`crate::validation`] for callers that must show a
/// user-visible message ("enter a valid amount") before calling the codec.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Empty or whitespace-only input.
    #[error("{field} cannot be empty")]
    Required { field: String },

    /// Stray characters, misplaced sign, or a malformed decimal string.
    #[error("invalid {field}: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Outside the range a JavaScript number holds exactly.
    #[error("{field} must be within {min}..={max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    #[error("{field} must be greater than zero")]
    MustBePositive { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
