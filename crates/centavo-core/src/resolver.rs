//! # Persistence Resolver
//!
//! Reconciles the two historical storage columns of an amount into one
//! authoritative [`MoneyCents`], and produces the legacy column value to
//! write back.
//!
//! ## Precedence Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  amount_cents (INTEGER)        amount (legacy decimal)                  │
//! │        │                              │                                 │
//! │        ▼                              │                                 │
//! │  present AND > 0 ? ── yes ──► trusted as-is                             │
//! │        │                              │                                 │
//! │        no (NULL, 0, negative)         │                                 │
//! │        └──────────────────────────────┴──► parse legacy, nearest cent   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A cents value of exactly zero is NOT trusted. Unmigrated rows were
//! created with the cents column defaulted to 0 while the real amount lives
//! in the legacy column, so a genuine R$ 0,00 row cannot be told apart from
//! an unmigrated one by the columns alone. Rows that carry the explicit
//! `cents_migrated` flag (see [`DualColumnRecord::with_migrated`]) are not
//! subject to this ambiguity.

use serde::{Deserialize, Serialize};
use tracing::trace;
use ts_rs::TS;

use crate::codec::cents_to_decimal_text;
use crate::legacy::LegacyDecimal;
use crate::money::MoneyCents;

/// Which column supplied the authoritative amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum AmountSource {
    /// The integer cents column was trusted.
    CentsColumn,
    /// The cents column was absent or untrusted; the legacy column was parsed.
    LegacyColumn,
}

/// The outcome of resolving one dual-column record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub cents: MoneyCents,
    pub source: AmountSource,
}

/// The two stored representations of one logical amount.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DualColumnRecord {
    /// The integer cents column. `None` when NULL or not stored as an integer.
    pub cents_column: Option<i64>,
    /// The legacy decimal column, classified by shape.
    pub legacy_column: LegacyDecimal,
    /// Explicit migration flag. `None` for rows written before the flag existed.
    pub migrated: Option<bool>,
}

impl DualColumnRecord {
    pub fn new(cents_column: Option<i64>, legacy_column: impl Into<LegacyDecimal>) -> Self {
        DualColumnRecord {
            cents_column,
            legacy_column: legacy_column.into(),
            migrated: None,
        }
    }

    /// Attaches the explicit migration flag.
    ///
    /// When the flag is `Some(true)` and the cents column is present, the
    /// cents column is trusted even when it is zero or negative.
    pub fn with_migrated(mut self, migrated: Option<bool>) -> Self {
        self.migrated = migrated;
        self
    }

    /// Resolves the authoritative amount and reports which column won.
    ///
    /// ```rust
    /// use centavo_core::{AmountSource, DualColumnRecord};
    ///
    /// let legacy_only = DualColumnRecord::new(Some(0), "10.00").resolve();
    /// assert_eq!(legacy_only.cents.cents(), 1000);
    /// assert_eq!(legacy_only.source, AmountSource::LegacyColumn);
    ///
    /// let migrated_zero = DualColumnRecord::new(Some(0), "10.00")
    ///     .with_migrated(Some(true))
    ///     .resolve();
    /// assert_eq!(migrated_zero.cents.cents(), 0);
    /// ```
    pub fn resolve(&self) -> Resolution {
        resolve(self.cents_column, &self.legacy_column, self.migrated)
    }
}

// =============================================================================
// Operations
// =============================================================================

/// Produces one authoritative amount from the cents and legacy columns.
///
/// The cents column wins only when it is present and strictly positive.
/// Otherwise the legacy column is parsed and rounded to the nearest cent.
/// Never fails: an unusable legacy value resolves to zero.
///
/// ```rust
/// use centavo_core::resolver::resolve_authoritative_cents;
/// use centavo_core::LegacyDecimal;
///
/// let legacy = LegacyDecimal::from("10.00");
/// assert_eq!(resolve_authoritative_cents(Some(1500), &legacy).cents(), 1500);
/// assert_eq!(resolve_authoritative_cents(Some(0), &legacy).cents(), 1000);
/// assert_eq!(resolve_authoritative_cents(None, &legacy).cents(), 1000);
/// ```
pub fn resolve_authoritative_cents(
    cents_column: Option<i64>,
    legacy_column: &LegacyDecimal,
) -> MoneyCents {
    resolve(cents_column, legacy_column, None).cents
}

/// Renders the value written to the legacy column on every save.
///
/// Identical to [`cents_to_decimal_text`]; kept as its own name so write
/// paths read as what they are.
pub fn cents_to_legacy_decimal(cents: MoneyCents) -> String {
    cents_to_decimal_text(cents)
}

fn resolve(
    cents_column: Option<i64>,
    legacy_column: &LegacyDecimal,
    migrated: Option<bool>,
) -> Resolution {
    match (cents_column, migrated) {
        (Some(cents), Some(true)) => trusted(cents),
        (Some(cents), _) if cents > 0 => trusted(cents),
        _ => {
            let cents = legacy_column.to_cents();
            trace!(
                cents_column = ?cents_column,
                legacy_column = ?legacy_column,
                resolved = cents.cents(),
                "cents column not trusted, resolved from legacy column"
            );
            Resolution {
                cents,
                source: AmountSource::LegacyColumn,
            }
        }
    }
}

fn trusted(cents: i64) -> Resolution {
    Resolution {
        cents: MoneyCents::from_cents(cents),
        source: AmountSource::CentsColumn,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
