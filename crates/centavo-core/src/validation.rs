//! # Validation Module
//!
//! Strict checks for callers that must reject bad amounts.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Where Validation Happens                           │
//! │                                                                         │
//! │  Form submit: "R$ 12,3x"                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_amount_text() ← THIS MODULE (fail loud, user-visible)        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  decimal_text_to_cents() ← codec (fail safe, never errors)             │
//! │                                                                         │
//! │  The codec normalizes anything; only this module says "invalid".       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use centavo_core::codec::decimal_text_to_cents;
//! use centavo_core::validation::validate_amount_text;
//!
//! validate_amount_text("R$ 1.234,56").unwrap();
//! assert_eq!(decimal_text_to_cents("R$ 1.234,56").cents(), 123456);
//! ```

use crate::error::ValidationError;
use crate::money::{MoneyCents, MAX_SAFE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const AMOUNT_FIELD: &str = "amount";

/// Symbols accepted around the number, matched after whitespace is removed.
const CURRENCY_SYMBOLS: &[&str] = &["R$", "$", "US$", "€", "£", "¥", "CHF", "BRL", "USD", "EUR"];

fn is_separator(c: char) -> bool {
    c == ',' || c == '.'
}

/// Empty, or exactly one known currency symbol padded with whitespace.
fn is_symbol_affix(affix: &str) -> bool {
    let compact: String = affix.chars().filter(|c| !c.is_whitespace()).collect();
    compact.is_empty() || CURRENCY_SYMBOLS.contains(&compact.as_str())
}

// =============================================================================
// Text Validators
// =============================================================================

/// Validates free-typed amount text before it reaches the codec.
///
/// ## Rules
/// - Must contain at least one digit
/// - Between the first and last digit: only digits, `,`, `.` and whitespace
/// - A `-` is only accepted as the very first character, which is the only
///   place [`decimal_text_to_cents`](crate::codec::decimal_text_to_cents)
///   reads it
/// - Around the number: whitespace and at most one known currency symbol
///   on each side (`R$`, `$`, `€`, ...)
///
/// ```rust
/// use centavo_core::validation::validate_amount_text;
///
/// assert!(validate_amount_text("10,50").is_ok());
/// assert!(validate_amount_text("-R$ 3,00").is_ok());
/// assert!(validate_amount_text("1.234,56 €").is_ok());
/// assert!(validate_amount_text("12a4").is_err());
/// assert!(validate_amount_text("   ").is_err());
/// ```
pub fn validate_amount_text(text: &str) -> ValidationResult<()> {
    let text = text.trim();

    if text.is_empty() {
        return Err(ValidationError::Required {
            field: AMOUNT_FIELD.to_string(),
        });
    }

    let (first, last) = match (
        text.find(|c: char| c.is_ascii_digit()),
        text.rfind(|c: char| c.is_ascii_digit()),
    ) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(invalid_amount("must contain at least one digit")),
    };

    let prefix = &text[..first];
    let number = &text[first..=last];
    let suffix = &text[last + 1..];

    if !number
        .chars()
        .all(|c| c.is_ascii_digit() || is_separator(c) || c.is_whitespace())
    {
        return Err(invalid_amount("must contain only digits and separators"));
    }

    if (prefix.contains('-') && !text.starts_with('-')) || suffix.contains('-') {
        return Err(invalid_amount("sign must be the first character"));
    }

    let prefix = prefix.strip_prefix('-').unwrap_or(prefix);

    if !is_symbol_affix(prefix) || !is_symbol_affix(suffix) {
        return Err(invalid_amount("only a currency symbol may surround the number"));
    }

    Ok(())
}

/// Validates a legacy column value: exactly `-?\d+\.\d{2}`.
///
/// ```rust
/// use centavo_core::validation::validate_decimal_db_string;
///
/// assert!(validate_decimal_db_string("-12.50").is_ok());
/// assert!(validate_decimal_db_string("12.5").is_err());
/// assert!(validate_decimal_db_string("12,50").is_err());
/// ```
pub fn validate_decimal_db_string(text: &str) -> ValidationResult<()> {
    let unsigned = text.strip_prefix('-').unwrap_or(text);

    let well_formed = match unsigned.split_once('.') {
        Some((integer, fraction)) => {
            !integer.is_empty()
                && integer.bytes().all(|b| b.is_ascii_digit())
                && fraction.len() == 2
                && fraction.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    };

    if well_formed {
        Ok(())
    } else {
        Err(ValidationError::InvalidFormat {
            field: "legacy amount".to_string(),
            reason: "must look like 123.45".to_string(),
        })
    }
}

/// Validates a record id (UUID).
pub fn validate_record_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates that an amount survives a trip through a JavaScript number.
///
/// ## Rules
/// - `|cents| <= 2^53 - 1`
pub fn validate_cents_range(cents: MoneyCents) -> ValidationResult<()> {
    if cents.cents() < -MAX_SAFE_CENTS || cents.cents() > MAX_SAFE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: AMOUNT_FIELD.to_string(),
            min: -MAX_SAFE_CENTS,
            max: MAX_SAFE_CENTS,
        });
    }

    Ok(())
}

/// Validates that an amount is strictly positive (e.g., a payment).
pub fn validate_positive_amount(cents: MoneyCents) -> ValidationResult<()> {
    if !cents.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: AMOUNT_FIELD.to_string(),
        });
    }

    Ok(())
}

fn invalid_amount(reason: &str) -> ValidationError {
    ValidationError::InvalidFormat {
        field: AMOUNT_FIELD.to_string(),
        reason: reason.to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_amount_text() {
        // Valid
        assert!(validate_amount_text("10").is_ok());
        assert!(validate_amount_text("10,5").is_ok());
        assert!(validate_amount_text("1.234,56").is_ok());
        assert!(validate_amount_text("R$ 1.234,56").is_ok());
        assert!(validate_amount_text("-5,00").is_ok());
        assert!(validate_amount_text("1 234,56\u{a0}€").is_ok());
        assert!(validate_amount_text("-R$ 3,00").is_ok());
        assert!(validate_amount_text("- $ 3.00").is_ok());
        assert!(validate_amount_text("US$ 3.00").is_ok());

        // Invalid
        assert!(matches!(
            validate_amount_text(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(validate_amount_text("R$").is_err());
        assert!(validate_amount_text("12x4").is_err());
        assert!(validate_amount_text("--5").is_err());
        assert!(validate_amount_text("5-").is_err());
        assert!(validate_amount_text(".,5").is_err());
        assert!(validate_amount_text("R$ -3,00").is_err());
        assert!(validate_amount_text("12 apples").is_err());
        assert!(validate_amount_text("abc 5").is_err());
        assert!(validate_amount_text("R$ € 5").is_err());
    }

    #[test]
    fn test_accepted_text_parses_with_its_sign() {
        use crate::codec::decimal_text_to_cents;

        for (text, cents) in [("-R$ 3,00", -300), ("R$ 3,00", 300), ("-3,00 €", -300)] {
            assert!(validate_amount_text(text).is_ok(), "{text}");
            assert_eq!(decimal_text_to_cents(text).cents(), cents, "{text}");
        }

        // A sign the parser would ignore is never accepted
        assert!(validate_amount_text("R$ -3,00").is_err());
        assert!(validate_amount_text("$-3.00").is_err());
    }

    #[test]
    fn test_validate_decimal_db_string() {
        assert!(validate_decimal_db_string("0.00").is_ok());
        assert!(validate_decimal_db_string("1234.56").is_ok());
        assert!(validate_decimal_db_string("-0.05").is_ok());

        assert!(validate_decimal_db_string("").is_err());
        assert!(validate_decimal_db_string(".50").is_err());
        assert!(validate_decimal_db_string("10").is_err());
        assert!(validate_decimal_db_string("10.500").is_err());
        assert!(validate_decimal_db_string("+1.00").is_err());
        assert!(validate_decimal_db_string("1.0a").is_err());
    }

    #[test]
    fn test_validate_cents_range() {
        assert!(validate_cents_range(MoneyCents::from_cents(MAX_SAFE_CENTS)).is_ok());
        assert!(validate_cents_range(MoneyCents::from_cents(-MAX_SAFE_CENTS)).is_ok());
        assert!(validate_cents_range(MoneyCents::from_cents(MAX_SAFE_CENTS + 1)).is_err());
        assert!(validate_cents_range(MoneyCents::from_cents(i64::MIN)).is_err());
    }

    #[test]
    fn test_validate_positive_amount() {
        assert!(validate_positive_amount(MoneyCents::from_cents(1)).is_ok());
        assert!(validate_positive_amount(MoneyCents::zero()).is_err());
        assert!(validate_positive_amount(MoneyCents::from_cents(-1)).is_err());
    }

    #[test]
    fn test_validate_record_id() {
        assert!(validate_record_id("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_record_id("").is_err());
        assert!(validate_record_id("not-a-uuid").is_err());
    }
}
