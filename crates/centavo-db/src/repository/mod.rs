//! # Repository Module
//!
//! Database repository implementations for centavo.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Caller                                                                 │
//! │       │  db.amounts().get_by_id(id)                                     │
//! │       ▼                                                                 │
//! │  AmountRepository                                                       │
//! │  ├── insert / update_amount   → writes BOTH amount columns              │
//! │  ├── get_by_id / list / total → reads both, resolver picks one          │
//! │  └── backfill                 → migrates legacy-only rows               │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`AmountRepository`](amount::AmountRepository) - amount records

pub mod amount;
