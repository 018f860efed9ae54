//! # Money Module
//!
//! Provides [`MoneyCents`], the single canonical representation of an amount.
//!
//! ## Why Integer Cents?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004                                      │
//! │    10.05 * 100 = 1004.9999999999999  → truncates to 1004 cents!        │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    "10,05" → 1005 (string digits, never a float)                        │
//! │    1005    → "10.05" (string slicing, never a division)                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use centavo_core::money::MoneyCents;
//!
//! let price = MoneyCents::from_cents(1099); // R$ 10,99
//! let total = price + MoneyCents::from_cents(500);
//! assert_eq!(total.cents(), 1599);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use ts_rs::TS;

/// Largest magnitude a JavaScript number holds exactly (2^53 - 1).
///
/// Amounts that cross the UI boundary must stay within this bound; see
/// [`crate::validation::validate_cents_range`].
pub const MAX_SAFE_CENTS: i64 = 9_007_199_254_740_991;

// =============================================================================
// MoneyCents Type
// =============================================================================

/// A monetary amount in minor units (1 = one cent).
///
/// ## Design Decisions
/// - **i64 (signed)**: refunds and corrections are negative
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Saturating arithmetic**: totals clamp at the i64 bounds instead of
///   wrapping or panicking
///
/// ## Where MoneyCents Lives
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  UI text ──► codec ──► MoneyCents ──► resolver ──► legacy "10.00"       │
/// │                           │                                             │
/// │  DB row ──► resolver ─────┘──► display ──► "R$ 10,00"                   │
/// │                                                                         │
/// │  No other representation is ever held in application state             │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[ts(export)]
pub struct MoneyCents(i64);

impl MoneyCents {
    /// Creates a value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use centavo_core::money::MoneyCents;
    ///
    /// let price = MoneyCents::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        MoneyCents(cents)
    }

    /// Creates a value from whole units, saturating at the i64 bounds.
    ///
    /// ## Example
    /// ```rust
    /// use centavo_core::money::MoneyCents;
    ///
    /// assert_eq!(MoneyCents::from_units(10).cents(), 1000);
    /// assert_eq!(MoneyCents::from_units(-3).cents(), -300);
    /// ```
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        MoneyCents(units.saturating_mul(100))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit portion (truncated toward zero).
    ///
    /// ```rust
    /// use centavo_core::money::MoneyCents;
    ///
    /// assert_eq!(MoneyCents::from_cents(1099).units(), 10);
    /// assert_eq!(MoneyCents::from_cents(-550).units(), -5);
    /// ```
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion, always 0-99.
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero.
    #[inline]
    pub const fn zero() -> Self {
        MoneyCents(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Absolute value, saturating (`i64::MIN` maps to `i64::MAX`).
    #[inline]
    pub const fn abs(&self) -> Self {
        MoneyCents(self.0.saturating_abs())
    }

    /// Adds two amounts, returning `None` on overflow.
    #[inline]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(MoneyCents(v)),
            None => None,
        }
    }

    /// Subtracts two amounts, returning `None` on overflow.
    #[inline]
    pub const fn checked_sub(self, other: Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(MoneyCents(v)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders the legacy decimal form (`"-5.00"`). For UI text use
/// [`crate::display::cents_to_display_text`].
impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::codec::cents_to_decimal_text(*self))
    }
}

impl Default for MoneyCents {
    fn default() -> Self {
        MoneyCents::zero()
    }
}

impl From<i64> for MoneyCents {
    fn from(cents: i64) -> Self {
        MoneyCents(cents)
    }
}

impl From<MoneyCents> for i64 {
    fn from(value: MoneyCents) -> Self {
        value.0
    }
}

impl Add for MoneyCents {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        MoneyCents(self.0.saturating_add(other.0))
    }
}

impl AddAssign for MoneyCents {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for MoneyCents {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        MoneyCents(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for MoneyCents {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for MoneyCents {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        MoneyCents(self.0.saturating_neg())
    }
}

impl Sum for MoneyCents {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(MoneyCents::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a MoneyCents> for MoneyCents {
    fn sum<I: Iterator<Item = &'a MoneyCents>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
