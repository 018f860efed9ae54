//! # Amount Codec
//!
//! Lossless, floating-point-free conversion between text and [`MoneyCents`].
//!
//! ## Two Parsers, Two Input Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  masked_text_to_cents     "R$ 1.234,56" → digits "123456" → 123456      │
//! │    Input comes from a currency MASK: the last two digits ARE the cents │
//! │    "10" → 10 cents (R$ 0,10)                                            │
//! │                                                                         │
//! │  decimal_text_to_cents    "1.234,56"    → 1234 + "56"     → 123456      │
//! │    Input is free-typed: the last ',' or '.' is the decimal separator   │
//! │    "10" → 1000 cents (R$ 10,00)                                         │
//! │                                                                         │
//! │  Using one where the other belongs is a silent 100x error.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function here is total: malformed input degrades to a defined
//! value (usually zero) and never panics. Callers that need to reject input
//! run [`crate::validation`] first.
//!
//! Magnitudes beyond `i64` saturate at `i64::MIN` / `i64::MAX`.

use crate::money::MoneyCents;

pub use crate::display::cents_to_display_text;

// =============================================================================
// Text → Cents
// =============================================================================

/// Strips every character that is not an ASCII digit.
///
/// ```rust
/// use centavo_core::codec::normalize_to_digits;
///
/// assert_eq!(normalize_to_digits("R$ 1.234,56"), "123456");
/// assert_eq!(normalize_to_digits(""), "");
/// ```
pub fn normalize_to_digits(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}

/// Parses MASKED input, where the digits are already scaled to cents.
///
/// All non-digits (including any `-`) are dropped and the remaining digit
/// run is the cents value itself. It is never divided by 100.
///
/// Do NOT use this on free-typed decimals: `"10"` yields 10 cents here but
/// 1000 cents from [`decimal_text_to_cents`].
///
/// ```rust
/// use centavo_core::codec::masked_text_to_cents;
///
/// assert_eq!(masked_text_to_cents("R$ 1.234,56").cents(), 123456);
/// assert_eq!(masked_text_to_cents("").cents(), 0);
/// ```
pub fn masked_text_to_cents(text: &str) -> MoneyCents {
    MoneyCents::from_cents(digits_to_i64(&normalize_to_digits(text), false))
}

/// Parses FREE-TYPED decimal input using `,` or `.` as the separator.
///
/// ## Algorithm
/// 1. Trim; empty input is zero
/// 2. Strip a leading `-` and remember the sign
/// 3. The LAST `,` or `.` is the decimal separator; anything before it is
///    the integer part (thousands separators are dropped with the rest of
///    the non-digits)
/// 4. The fractional digits are padded or truncated to exactly two
/// 5. No separator at all means whole units (`"10"` → 1000)
///
/// Ambiguous input such as `"1,234.5,6"` is not rejected; it is parsed
/// best-effort by the same rules.
///
/// ```rust
/// use centavo_core::codec::decimal_text_to_cents;
///
/// assert_eq!(decimal_text_to_cents("1.234,56").cents(), 123456);
/// assert_eq!(decimal_text_to_cents("10,5").cents(), 1050);
/// assert_eq!(decimal_text_to_cents("-5,00").cents(), -500);
/// ```
pub fn decimal_text_to_cents(text: &str) -> MoneyCents {
    let parts = DecimalParts::split(text);
    let digits = format!("{}{}", parts.integer, parts.fraction_truncated());
    MoneyCents::from_cents(digits_to_i64(&digits, parts.negative))
}

/// Same separator rules as [`decimal_text_to_cents`], but the third
/// fractional digit rounds half away from zero instead of being dropped.
///
/// Used by the resolver when reading the legacy column, which may hold more
/// precision than two places.
pub(crate) fn decimal_text_to_cents_rounded(text: &str) -> MoneyCents {
    let parts = DecimalParts::split(text);
    let digits = format!("{}{}", parts.integer, parts.fraction_truncated());
    let mut magnitude = digits_to_u64(&digits);

    if parts.rounds_up() {
        magnitude = magnitude.saturating_add(1);
    }

    MoneyCents::from_cents(apply_sign(magnitude, parts.negative))
}

// =============================================================================
// Cents → Text
// =============================================================================

/// Formats cents as a fixed two-decimal string using string slicing only.
///
/// ```rust
/// use centavo_core::codec::cents_to_decimal_text;
/// use centavo_core::MoneyCents;
///
/// assert_eq!(cents_to_decimal_text(MoneyCents::from_cents(5)), "0.05");
/// assert_eq!(cents_to_decimal_text(MoneyCents::from_cents(0)), "0.00");
/// assert_eq!(cents_to_decimal_text(MoneyCents::from_cents(-500)), "-5.00");
/// ```
pub fn cents_to_decimal_text(cents: MoneyCents) -> String {
    let value = cents.cents();
    let padded = format!("{:0>3}", value.unsigned_abs());
    let (integer, fraction) = padded.split_at(padded.len() - 2);
    let sign = if value < 0 { "-" } else { "" };

    format!("{sign}{integer}.{fraction}")
}

// =============================================================================
// Internals
// =============================================================================

/// A free-typed decimal split at its separator. Both parts hold digits only.
struct DecimalParts {
    negative: bool,
    integer: String,
    fraction: String,
}

impl DecimalParts {
    fn split(text: &str) -> Self {
        let trimmed = text.trim();
        let (negative, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        match body.rfind(|c: char| c == ',' || c == '.') {
            Some(idx) => {
                let integer = normalize_to_digits(&body[..idx]);
                DecimalParts {
                    negative,
                    integer: if integer.is_empty() { "0".to_string() } else { integer },
                    // Separators are single-byte, so idx + 1 is a char boundary
                    fraction: normalize_to_digits(&body[idx + 1..]),
                }
            }
            None => DecimalParts {
                negative,
                integer: normalize_to_digits(body),
                fraction: String::new(),
            },
        }
    }

    /// Exactly two fractional digits: right-padded with zeros or truncated.
    fn fraction_truncated(&self) -> String {
        let mut fraction: String = self.fraction.chars().take(2).collect();
        while fraction.len() < 2 {
            fraction.push('0');
        }
        fraction
    }

    fn rounds_up(&self) -> bool {
        matches!(self.fraction.as_bytes().get(2), Some(b'5'..=b'9'))
    }
}

/// Parses an ASCII digit run as a magnitude, saturating at `u64::MAX`.
fn digits_to_u64(digits: &str) -> u64 {
    digits
        .bytes()
        .filter(u8::is_ascii_digit)
        .fold(0u64, |acc, b| {
            acc.saturating_mul(10).saturating_add(u64::from(b - b'0'))
        })
}

fn digits_to_i64(digits: &str, negative: bool) -> i64 {
    apply_sign(digits_to_u64(digits), negative)
}

/// Applies a sign to a magnitude, clamping to the i64 range.
fn apply_sign(magnitude: u64, negative: bool) -> i64 {
    if negative {
        // i64::MIN has a magnitude one larger than i64::MAX
        0i64.checked_sub_unsigned(magnitude).unwrap_or(i64::MIN)
    } else {
        i64::try_from(magnitude).unwrap_or(i64::MAX)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
