//! # Legacy Amount Backfill
//!
//! Migrates rows that only carry the legacy decimal column onto the
//! integer cents column.
//!
//! ## Usage
//! ```bash
//! # Backfill ./centavo.db in batches of 500 (default)
//! cargo run -p centavo-db --bin backfill
//!
//! # Custom database and batch size
//! cargo run -p centavo-db --bin backfill -- --db ./data/centavo.db --batch 100
//!
//! # Database path from the environment
//! CENTAVO_DB_PATH=./data/centavo.db cargo run -p centavo-db --bin backfill
//! ```
//!
//! Re-running is safe: migrated rows are skipped, and the resolved totals
//! before and after are logged so drift is visible.

use std::env;
use std::time::Instant;

use centavo_db::{Database, DbConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_DB_PATH: &str = "./centavo.db";
const DEFAULT_BATCH: u32 = 500;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut config = DbConfig::from_env_or(DEFAULT_DB_PATH);
    let mut batch = DEFAULT_BATCH;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config = DbConfig::new(&args[i + 1]);
                    i += 1;
                }
            }
            "--batch" | "-b" => {
                if i + 1 < args.len() {
                    batch = match args[i + 1].parse() {
                        Ok(n) if n > 0 => n,
                        _ => {
                            warn!(value = %args[i + 1], "Invalid batch size, using default");
                            DEFAULT_BATCH
                        }
                    };
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("centavo legacy amount backfill");
                println!();
                println!("Usage: backfill [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>     Database file path (default: $CENTAVO_DB_PATH or ./centavo.db)");
                println!("  -b, --batch <N>     Rows per transaction (default: 500)");
                println!("  -h, --help          Show this help message");
                return Ok(());
            }
            other => warn!(argument = %other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    info!(path = ?config.database_path, batch, "Starting backfill");

    let db = Database::new(config).await?;
    let status = db.migration_status().await?;
    info!(embedded = status.embedded, applied = status.applied, "Schema ready");

    let amounts = db.amounts();
    let records = amounts.count().await?;
    let total_before = amounts.total().await?;
    info!(records, total_cents = total_before.cents(), "Resolved total before backfill");

    let start = Instant::now();
    let mut migrated = 0usize;

    loop {
        let done = amounts.backfill(batch).await?;
        if done == 0 {
            break;
        }
        migrated += done;
        info!(migrated, "Backfill progress");
    }

    let total_after = amounts.total().await?;
    if total_after != total_before {
        warn!(
            before = total_before.cents(),
            after = total_after.cents(),
            "Resolved total changed during backfill"
        );
    }

    info!(
        migrated,
        total_cents = total_after.cents(),
        elapsed = ?start.elapsed(),
        "Backfill complete"
    );

    db.close().await;
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show every migrated row
/// - Default: `info,centavo=debug,sqlx=warn`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,centavo=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
