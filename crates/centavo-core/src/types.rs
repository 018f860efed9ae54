//! # Domain Types
//!
//! Records that carry an amount between storage and the UI.
//!
//! ## Record Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────────────┐   save   ┌────────────────────────────────────┐  │
//! │  │ NewAmountRecord  │ ───────► │ amount_records row                 │  │
//! │  │  description     │          │  amount_cents   INTEGER  (trusted) │  │
//! │  │  amount (cents)  │          │  amount         TEXT     (legacy)  │  │
//! │  │  occurred_on     │          │  cents_migrated INTEGER  (flag)    │  │
//! │  └──────────────────┘          └───────────────┬────────────────────┘  │
//! │                                                │ resolver              │
//! │                                ┌───────────────▼────────────────────┐  │
//! │                                │ AmountRecord                       │  │
//! │                                │  amount (resolved cents) + source  │  │
//! │                                └────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::MoneyCents;
use crate::resolver::AmountSource;

/// A stored amount after dual-column resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AmountRecord {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Free-text label shown next to the amount.
    pub description: String,

    /// Authoritative amount in cents.
    pub amount: MoneyCents,

    /// Which storage column supplied `amount`.
    pub source: AmountSource,

    /// Calendar date the amount refers to.
    #[ts(as = "String")]
    pub occurred_on: NaiveDate,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a record. The amount is already in cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewAmountRecord {
    pub description: String,
    pub amount: MoneyCents,
    #[ts(as = "String")]
    pub occurred_on: NaiveDate,
}

impl NewAmountRecord {
    pub fn new(description: impl Into<String>, amount: MoneyCents, occurred_on: NaiveDate) -> Self {
        NewAmountRecord {
            description: description.into(),
            amount,
            occurred_on,
        }
    }
}
