//! # Display Formatting
//!
//! Locale-aware rendering of [`MoneyCents`] for the UI.
//!
//! Output from this module is for humans only. It is NEVER fed back into a
//! parser; persisted values go through [`crate::resolver::cents_to_legacy_decimal`].
//!
//! ## Conventions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Locale   Currency style        Decimal style                           │
//! │  ──────   ──────────────        ─────────────                           │
//! │  pt-BR    R$ 1.234,56           1.234,56                                │
//! │  en-US    $1,234.56             1,234.56                                │
//! │  de-DE    1.234,56 €            1.234,56                                │
//! │  fr-FR    1 234,56 €            1 234,56                                │
//! │                                                                         │
//! │  Spaces next to symbols are U+00A0; fr-FR groups with U+202F.          │
//! │  Negative amounts always start with '-'.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::MoneyCents;

const NBSP: &str = "\u{a0}";
const NARROW_NBSP: &str = "\u{202f}";

/// Environment variable selecting the display locale.
pub const LOCALE_ENV: &str = "CENTAVO_LOCALE";

/// Environment variable selecting `currency` or `decimal` display.
pub const DISPLAY_STYLE_ENV: &str = "CENTAVO_DISPLAY_STYLE";

// =============================================================================
// Locale
// =============================================================================

/// Where the currency symbol goes relative to the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum SymbolPosition {
    Prefix,
    Suffix,
}

/// The formatting rules of one locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LocaleConventions {
    pub decimal_separator: String,
    /// Inserted between groups of three integer digits. Empty disables grouping.
    pub group_separator: String,
    pub currency_symbol: String,
    pub symbol_position: SymbolPosition,
    /// Puts a no-break space between the symbol and the number.
    pub symbol_spacing: bool,
}

/// A display locale.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Locale {
    #[default]
    #[serde(rename = "pt-BR")]
    PtBr,
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "de-DE")]
    DeDe,
    #[serde(rename = "fr-FR")]
    FrFr,
    #[serde(rename = "custom")]
    Custom(LocaleConventions),
}

impl Locale {
    /// Returns the formatting rules for this locale.
    pub fn conventions(&self) -> LocaleConventions {
        match self {
            Locale::PtBr => builtin(",", ".", "R$", SymbolPosition::Prefix, true),
            Locale::EnUs => builtin(".", ",", "$", SymbolPosition::Prefix, false),
            Locale::DeDe => builtin(",", ".", "€", SymbolPosition::Suffix, true),
            Locale::FrFr => builtin(",", NARROW_NBSP, "€", SymbolPosition::Suffix, true),
            Locale::Custom(conventions) => conventions.clone(),
        }
    }
}

fn builtin(
    decimal_separator: &str,
    group_separator: &str,
    currency_symbol: &str,
    symbol_position: SymbolPosition,
    symbol_spacing: bool,
) -> LocaleConventions {
    LocaleConventions {
        decimal_separator: decimal_separator.to_string(),
        group_separator: group_separator.to_string(),
        currency_symbol: currency_symbol.to_string(),
        symbol_position,
        symbol_spacing,
    }
}

/// Parses BCP-47 style tags: `pt-BR`, `pt_br`, `en`, ...
impl FromStr for Locale {
    type Err = CoreError;

    fn from_str(tag: &str) -> CoreResult<Self> {
        match tag.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "pt" | "pt-br" => Ok(Locale::PtBr),
            "en" | "en-us" => Ok(Locale::EnUs),
            "de" | "de-de" => Ok(Locale::DeDe),
            "fr" | "fr-fr" => Ok(Locale::FrFr),
            _ => Err(CoreError::UnknownLocale(tag.to_string())),
        }
    }
}

// =============================================================================
// Display Options
// =============================================================================

/// Currency symbol or plain grouped number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum DisplayStyle {
    #[default]
    Currency,
    Decimal,
}

impl FromStr for DisplayStyle {
    type Err = CoreError;

    fn from_str(style: &str) -> CoreResult<Self> {
        match style.trim().to_ascii_lowercase().as_str() {
            "currency" => Ok(DisplayStyle::Currency),
            "decimal" => Ok(DisplayStyle::Decimal),
            _ => Err(CoreError::UnknownDisplayStyle(style.to_string())),
        }
    }
}

/// How amounts are rendered for display.
///
/// ## Configuration Sources (Priority Order)
/// 1. Environment variables (`CENTAVO_LOCALE`, `CENTAVO_DISPLAY_STYLE`)
/// 2. Deserialized settings (camelCase JSON)
/// 3. Defaults: pt-BR, currency style
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct DisplayOptions {
    pub locale: Locale,
    pub style: DisplayStyle,
}

impl DisplayOptions {
    pub fn currency(locale: Locale) -> Self {
        DisplayOptions {
            locale,
            style: DisplayStyle::Currency,
        }
    }

    pub fn decimal(locale: Locale) -> Self {
        DisplayOptions {
            locale,
            style: DisplayStyle::Decimal,
        }
    }

    /// Builds options from defaults plus environment overrides.
    ///
    /// Invalid values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`DisplayOptions::from_env`] with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut options = DisplayOptions::default();

        if let Some(tag) = lookup(LOCALE_ENV) {
            match tag.parse() {
                Ok(locale) => options.locale = locale,
                Err(err) => warn!(error = %err, "Ignoring {}", LOCALE_ENV),
            }
        }

        if let Some(style) = lookup(DISPLAY_STYLE_ENV) {
            match style.parse() {
                Ok(style) => options.style = style,
                Err(err) => warn!(error = %err, "Ignoring {}", DISPLAY_STYLE_ENV),
            }
        }

        options
    }
}

// =============================================================================
// Formatting
// =============================================================================

/// Formats cents for display according to `options`.
///
/// Integer arithmetic only; the result is never parsed again.
///
/// ```rust
/// use centavo_core::display::{cents_to_display_text, DisplayOptions, Locale};
/// use centavo_core::MoneyCents;
///
/// let amount = MoneyCents::from_cents(-123456);
/// let text = cents_to_display_text(amount, &DisplayOptions::currency(Locale::EnUs));
/// assert_eq!(text, "-$1,234.56");
/// ```
pub fn cents_to_display_text(cents: MoneyCents, options: &DisplayOptions) -> String {
    let conventions = options.locale.conventions();
    let magnitude = cents.cents().unsigned_abs();

    let number = format!(
        "{}{}{:02}",
        group_digits(&(magnitude / 100).to_string(), &conventions.group_separator),
        conventions.decimal_separator,
        magnitude % 100
    );

    let body = match options.style {
        DisplayStyle::Decimal => number,
        DisplayStyle::Currency => {
            let gap = if conventions.symbol_spacing { NBSP } else { "" };
            match conventions.symbol_position {
                SymbolPosition::Prefix => format!("{}{gap}{number}", conventions.currency_symbol),
                SymbolPosition::Suffix => format!("{number}{gap}{}", conventions.currency_symbol),
            }
        }
    };

    if cents.is_negative() {
        format!("-{body}")
    } else {
        body
    }
}

/// Inserts `separator` between groups of three digits, from the right.
fn group_digits(digits: &str, separator: &str) -> String {
    if separator.is_empty() {
        return digits.to_string();
    }

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 * separator.len());
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push_str(separator);
        }
        grouped.push(digit);
    }
    grouped
}

// =============================================================================
// Unit Tests
// =============================================================================
