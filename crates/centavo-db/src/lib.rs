//! # centavo-db: Database Layer for centavo
//!
//! This crate stores amount records in SQLite with sqlx. Every record keeps
//! two amount columns during the migration to integer cents; reads pick the
//! authoritative one through `centavo-core`'s resolver.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        centavo Data Flow                                │
//! │                                                                         │
//! │  Caller (service, CLI, backfill binary)                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   centavo-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │  (amount.rs)  │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ AmountRepo    │    │ 001_amount_  │  │   │
//! │  │   │ WAL mode      │    │ backfill      │    │ records.sql  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  amount_records (amount, amount_cents, cents_migrated)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use centavo_core::{MoneyCents, NewAmountRecord};
//! use centavo_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/centavo.db")).await?;
//!
//! let amount = MoneyCents::from_cents(1230);
//! let record = db.amounts().insert(&NewAmountRecord::new("Lunch", amount, today)).await?;
//!
//! // Legacy rows are migrated in batches
//! while db.amounts().backfill(500).await? > 0 {}
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use migrations::MigrationStatus;
pub use pool::{Database, DbConfig, DB_PATH_ENV};

pub use repository::amount::AmountRepository;
