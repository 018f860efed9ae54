//! # centavo-core: Pure Amount Logic
//!
//! This crate converts monetary amounts between user text, integer cents,
//! display strings, and the legacy decimal column, and decides which of two
//! stored columns is authoritative. It has zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Amount Data Flow                               │
//! │                                                                         │
//! │  WRITE:  UI text ──► codec ──► MoneyCents ──► resolver ──► "12.30"      │
//! │                                                                         │
//! │  READ:   DB row (amount_cents, amount)                                  │
//! │            │                                                            │
//! │            ▼                                                            │
//! │          resolver ──► MoneyCents ──► display ──► "R$ 12,30"             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               ★ centavo-core (THIS CRATE) ★                     │   │
//! │  │   codec · legacy · resolver · display · validation              │   │
//! │  │   NO I/O • NO DATABASE • NO FLOATING POINT MONEY               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 centavo-db (Database Layer)                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - `MoneyCents`, the only in-memory amount representation
//! - [`codec`] - text ⇄ cents conversions
//! - [`legacy`] - the legacy column's value shapes
//! - [`resolver`] - dual-column precedence rule and legacy write value
//! - [`display`] - locale-aware UI formatting
//! - [`validation`] - strict checks for callers that must reject input
//! - [`types`] - stored record types
//! - [`error`] - domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use centavo_core::codec::{cents_to_decimal_text, decimal_text_to_cents};
//! use centavo_core::display::{cents_to_display_text, DisplayOptions};
//! use centavo_core::{resolve_authoritative_cents, LegacyDecimal};
//!
//! let typed = decimal_text_to_cents("1.234,56");
//! assert_eq!(typed.cents(), 123456);
//! assert_eq!(cents_to_decimal_text(typed), "1234.56");
//! assert_eq!(cents_to_display_text(typed, &DisplayOptions::default()), "R$\u{a0}1.234,56");
//!
//! // An unmigrated row: cents column defaulted to 0
//! let stored = resolve_authoritative_cents(Some(0), &LegacyDecimal::from("1234.56"));
//! assert_eq!(stored, typed);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod codec;
pub mod display;
pub mod error;
pub mod legacy;
pub mod money;
pub mod resolver;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use legacy::LegacyDecimal;
pub use money::{MoneyCents, MAX_SAFE_CENTS};
pub use resolver::{
    cents_to_legacy_decimal, resolve_authoritative_cents, AmountSource, DualColumnRecord,
    Resolution,
};
pub use types::*;
