//! # Amount Repository
//!
//! Database operations for amount records.
//!
//! ## Dual-Column Storage
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  WRITE (insert / update_amount / backfill)                              │
//! │    amount_cents   ← cents                                               │
//! │    amount         ← cents_to_legacy_decimal(cents)   e.g. "12.30"       │
//! │    cents_migrated ← 1                                                   │
//! │                                                                         │
//! │  READ (get_by_id / list / total)                                        │
//! │    typeof(amount_cents) = 'integer' ? value : absent                    │
//! │    typeof(amount)       → LegacyDecimal::{Text, Integer, Real, Null}    │
//! │    DualColumnRecord::resolve() → AmountRecord.amount                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The legacy column is still written on every save so consumers that only
//! read `amount` keep seeing correct values.

use centavo_core::{
    cents_to_legacy_decimal, AmountRecord, AmountSource, DualColumnRecord, LegacyDecimal,
    MoneyCents, NewAmountRecord,
};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use tokio_stream::StreamExt;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};

/// Splits both amount columns by SQLite storage class so each shape decodes
/// into its own typed column.
const SELECT_RECORD: &str = r#"
    SELECT
        id,
        description,
        CASE WHEN typeof(amount_cents) = 'integer' THEN amount_cents END AS amount_cents,
        cents_migrated,
        CASE WHEN typeof(amount) = 'text' THEN amount END AS legacy_text,
        CASE WHEN typeof(amount) = 'integer' THEN amount END AS legacy_integer,
        CASE WHEN typeof(amount) = 'real' THEN amount END AS legacy_real,
        occurred_on,
        created_at,
        updated_at
    FROM amount_records
"#;

const UNMIGRATED: &str = "(cents_migrated IS NULL OR cents_migrated <> 1)";

/// Raw row as stored; never leaves this module.
#[derive(Debug, FromRow)]
struct AmountRow {
    id: String,
    description: String,
    amount_cents: Option<i64>,
    cents_migrated: Option<i64>,
    legacy_text: Option<String>,
    legacy_integer: Option<i64>,
    legacy_real: Option<f64>,
    occurred_on: NaiveDate,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AmountRow {
    fn legacy_column(&self) -> LegacyDecimal {
        if let Some(text) = &self.legacy_text {
            LegacyDecimal::Text(text.clone())
        } else if let Some(units) = self.legacy_integer {
            LegacyDecimal::Integer(units)
        } else if let Some(value) = self.legacy_real {
            LegacyDecimal::Real(value)
        } else {
            LegacyDecimal::Null
        }
    }

    fn dual_column(&self) -> DualColumnRecord {
        DualColumnRecord::new(self.amount_cents, self.legacy_column())
            .with_migrated(self.cents_migrated.map(|flag| flag != 0))
    }

    fn into_record(self) -> AmountRecord {
        let resolution = self.dual_column().resolve();

        AmountRecord {
            id: self.id,
            description: self.description,
            amount: resolution.cents,
            source: resolution.source,
            occurred_on: self.occurred_on,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Repository for amount record database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = AmountRepository::new(pool);
///
/// let record = repo.insert(&NewAmountRecord::new("Rent", amount, date)).await?;
/// let same = repo.get_by_id(&record.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct AmountRepository {
    pool: SqlitePool,
}

impl AmountRepository {
    /// Creates a new AmountRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AmountRepository { pool }
    }

    /// Inserts a new record, writing both amount columns.
    pub async fn insert(&self, new: &NewAmountRecord) -> DbResult<AmountRecord> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let legacy = cents_to_legacy_decimal(new.amount);

        debug!(id = %id, cents = new.amount.cents(), "Inserting amount record");

        sqlx::query(
            r#"
            INSERT INTO amount_records (
                id, description, amount, amount_cents, cents_migrated,
                occurred_on, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, 1, ?5, ?6, ?7)
            "#,
        )
        .bind(&id)
        .bind(&new.description)
        .bind(&legacy)
        .bind(new.amount)
        .bind(new.occurred_on)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(AmountRecord {
            id,
            description: new.description.clone(),
            amount: new.amount,
            source: AmountSource::CentsColumn,
            occurred_on: new.occurred_on,
            created_at: now,
            updated_at: now,
        })
    }

    /// Inserts a row the way pre-migration clients wrote it: the legacy
    /// value with its original shape, an optional cents value, no flag.
    ///
    /// ## Usage
    /// Importing old exports and reproducing legacy rows in tests.
    pub async fn insert_legacy(
        &self,
        description: &str,
        cents_column: Option<i64>,
        legacy: &LegacyDecimal,
        occurred_on: NaiveDate,
    ) -> DbResult<String> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(id = %id, legacy = ?legacy, "Inserting legacy amount record");

        let query = sqlx::query(
            r#"
            INSERT INTO amount_records (
                id, description, amount, amount_cents, cents_migrated,
                occurred_on, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, NULL, ?5, ?6, ?7)
            "#,
        )
        .bind(&id)
        .bind(description);

        let query = match legacy {
            LegacyDecimal::Text(text) => query.bind(text.clone()),
            LegacyDecimal::Integer(units) => query.bind(*units),
            LegacyDecimal::Real(value) => query.bind(*value),
            LegacyDecimal::Null => query.bind(None::<String>),
        };

        query
            .bind(cents_column)
            .bind(occurred_on)
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(id)
    }

    /// Gets a record by its ID, resolving the authoritative amount.
    ///
    /// ## Returns
    /// * `Ok(Some(AmountRecord))` - Record found
    /// * `Ok(None)` - Record not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<AmountRecord>> {
        let sql = format!("{SELECT_RECORD} WHERE id = ?1");

        let row: Option<AmountRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(AmountRow::into_record))
    }

    /// Lists records, most recent `occurred_on` first.
    pub async fn list(&self, limit: u32) -> DbResult<Vec<AmountRecord>> {
        let sql = format!("{SELECT_RECORD} ORDER BY occurred_on DESC, created_at DESC LIMIT ?1");

        let rows: Vec<AmountRow> = sqlx::query_as(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Listed amount records");
        Ok(rows.into_iter().map(AmountRow::into_record).collect())
    }

    /// Lists rows whose cents column is not yet known to be authoritative.
    pub async fn list_unmigrated(&self, limit: u32) -> DbResult<Vec<AmountRecord>> {
        let sql = format!("{SELECT_RECORD} WHERE {UNMIGRATED} ORDER BY created_at LIMIT ?1");

        let rows: Vec<AmountRow> = sqlx::query_as(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(AmountRow::into_record).collect())
    }

    /// Replaces a record's amount, rewriting both columns.
    pub async fn update_amount(&self, id: &str, amount: MoneyCents) -> DbResult<()> {
        debug!(id = %id, cents = amount.cents(), "Updating amount");

        let result = sqlx::query(
            r#"
            UPDATE amount_records
            SET amount = ?1, amount_cents = ?2, cents_migrated = 1, updated_at = ?3
            WHERE id = ?4
            "#,
        )
        .bind(cents_to_legacy_decimal(amount))
        .bind(amount)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("AmountRecord", id));
        }

        Ok(())
    }

    /// Sums every record's resolved amount.
    ///
    /// Resolution happens in Rust, not SQL: legacy values need the codec.
    /// Rows are streamed, so memory stays flat on large tables.
    pub async fn total(&self) -> DbResult<MoneyCents> {
        let mut rows = sqlx::query_as::<_, AmountRow>(SELECT_RECORD).fetch(&self.pool);
        let mut total = MoneyCents::zero();

        while let Some(row) = rows.next().await {
            total += row?.dual_column().resolve().cents;
        }

        Ok(total)
    }

    /// Counts all records.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM amount_records")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Migrates up to `batch` unmigrated rows inside one transaction.
    ///
    /// ## What This Does
    /// 1. Takes the write lock up front (`BEGIN IMMEDIATE`), waiting up to
    ///    the pool's `busy_timeout` for other writers
    /// 2. Resolves each row with the precedence rule
    /// 3. Writes the resolved cents and its canonical legacy decimal
    /// 4. Sets `cents_migrated = 1` so later reads trust the cents column,
    ///    including genuine zero amounts
    ///
    /// A deferred transaction fails with SQLITE_BUSY, without waiting, when
    /// another writer commits between its first read and first write.
    ///
    /// Returns the number of rows migrated. Zero means nothing is left.
    pub async fn backfill(&self, batch: u32) -> DbResult<usize> {
        let mut conn = self.pool.acquire().await?;

        sqlx::query("BEGIN IMMEDIATE")
            .execute(&mut *conn)
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let outcome = backfill_locked(&mut conn, batch).await;

        let finish = if outcome.is_ok() { "COMMIT" } else { "ROLLBACK" };
        if let Err(e) = sqlx::query(finish).execute(&mut *conn).await {
            if outcome.is_ok() {
                // A failed COMMIT leaves the transaction open
                let _ = sqlx::query("ROLLBACK").execute(&mut *conn).await;
            }
            return Err(DbError::TransactionFailed(e.to_string()));
        }

        let migrated = outcome?;
        info!(migrated, "Backfill batch committed");
        Ok(migrated)
    }
}

/// The body of one backfill batch. The caller owns BEGIN and COMMIT.
async fn backfill_locked(conn: &mut SqliteConnection, batch: u32) -> DbResult<usize> {
    let sql = format!("{SELECT_RECORD} WHERE {UNMIGRATED} ORDER BY created_at LIMIT ?1");
    let rows: Vec<AmountRow> = sqlx::query_as(&sql)
        .bind(batch)
        .fetch_all(&mut *conn)
        .await?;

    let now = Utc::now();

    for row in &rows {
        let resolution = row.dual_column().resolve();

        sqlx::query(
            r#"
            UPDATE amount_records
            SET amount = ?1, amount_cents = ?2, cents_migrated = 1, updated_at = ?3
            WHERE id = ?4
            "#,
        )
        .bind(cents_to_legacy_decimal(resolution.cents))
        .bind(resolution.cents)
        .bind(now)
        .bind(&row.id)
        .execute(&mut *conn)
        .await?;

        debug!(
            id = %row.id,
            cents = resolution.cents.cents(),
            source = ?resolution.source,
            "Backfilled amount record"
        );
    }

    Ok(rows.len())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn repo() -> AmountRepository {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.amounts()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    async fn raw_columns(repo: &AmountRepository, id: &str) -> (Option<String>, Option<i64>, Option<i64>) {
        sqlx::query_as(
            "SELECT CAST(amount AS TEXT), amount_cents, cents_migrated FROM amount_records WHERE id = ?1",
        )
        .bind(id)
        .fetch_one(&repo.pool)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let repo = repo().await;
        let new = NewAmountRecord::new("Rent", MoneyCents::from_cents(123456), date(1));

        let inserted = repo.insert(&new).await.unwrap();
        let fetched = repo.get_by_id(&inserted.id).await.unwrap().unwrap();

        assert_eq!(fetched.id, inserted.id);
        assert_eq!(fetched.description, "Rent");
        assert_eq!(fetched.amount.cents(), 123456);
        assert_eq!(fetched.source, AmountSource::CentsColumn);
        assert_eq!(fetched.occurred_on, date(1));
    }

    #[tokio::test]
    async fn test_insert_writes_both_columns() {
        let repo = repo().await;
        let new = NewAmountRecord::new("Coffee", MoneyCents::from_cents(-505), date(2));

        let inserted = repo.insert(&new).await.unwrap();
        let (legacy, cents, migrated) = raw_columns(&repo, &inserted.id).await;

        assert_eq!(legacy.as_deref(), Some("-5.05"));
        assert_eq!(cents, Some(-505));
        assert_eq!(migrated, Some(1));
    }

    #[tokio::test]
    async fn test_inserted_zero_amount_is_trusted() {
        let repo = repo().await;
        let new = NewAmountRecord::new("Free sample", MoneyCents::zero(), date(3));

        let inserted = repo.insert(&new).await.unwrap();
        let fetched = repo.get_by_id(&inserted.id).await.unwrap().unwrap();

        assert_eq!(fetched.amount.cents(), 0);
        assert_eq!(fetched.source, AmountSource::CentsColumn);
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let repo = repo().await;
        assert!(repo.get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_legacy_rows_resolve_by_precedence() {
        let repo = repo().await;

        let zero_cents = repo
            .insert_legacy("unmigrated", Some(0), &LegacyDecimal::from("10.00"), date(1))
            .await
            .unwrap();
        let trusted = repo
            .insert_legacy("trusted", Some(1500), &LegacyDecimal::from("10.00"), date(1))
            .await
            .unwrap();
        let real = repo
            .insert_legacy("real", None, &LegacyDecimal::Real(19.99), date(1))
            .await
            .unwrap();
        let integer = repo
            .insert_legacy("integer", None, &LegacyDecimal::Integer(7), date(1))
            .await
            .unwrap();
        let null = repo
            .insert_legacy("null", None, &LegacyDecimal::Null, date(1))
            .await
            .unwrap();

        let get = |id: String| {
            let repo = repo.clone();
            async move { repo.get_by_id(&id).await.unwrap().unwrap() }
        };

        let record = get(zero_cents).await;
        assert_eq!(record.amount.cents(), 1000);
        assert_eq!(record.source, AmountSource::LegacyColumn);

        let record = get(trusted).await;
        assert_eq!(record.amount.cents(), 1500);
        assert_eq!(record.source, AmountSource::CentsColumn);

        assert_eq!(get(real).await.amount.cents(), 1999);
        assert_eq!(get(integer).await.amount.cents(), 700);
        assert_eq!(get(null).await.amount.cents(), 0);
    }

    #[tokio::test]
    async fn test_non_integer_cents_column_is_ignored() {
        let repo = repo().await;

        sqlx::query(
            r#"
            INSERT INTO amount_records (
                id, description, amount, amount_cents, occurred_on, created_at, updated_at
            )
            VALUES ('odd', 'odd', '3.00', 12.5, '2024-05-01',
                    '2024-05-01T00:00:00Z', '2024-05-01T00:00:00Z')
            "#,
        )
        .execute(&repo.pool)
        .await
        .unwrap();

        let record = repo.get_by_id("odd").await.unwrap().unwrap();
        assert_eq!(record.amount.cents(), 300);
        assert_eq!(record.source, AmountSource::LegacyColumn);
    }

    #[tokio::test]
    async fn test_update_amount_rewrites_both_columns() {
        let repo = repo().await;
        let id = repo
            .insert_legacy("old", Some(0), &LegacyDecimal::from("1.00"), date(1))
            .await
            .unwrap();

        repo.update_amount(&id, MoneyCents::from_cents(250)).await.unwrap();

        let (legacy, cents, migrated) = raw_columns(&repo, &id).await;
        assert_eq!(legacy.as_deref(), Some("2.50"));
        assert_eq!(cents, Some(250));
        assert_eq!(migrated, Some(1));
    }

    #[tokio::test]
    async fn test_update_missing_record_fails() {
        let repo = repo().await;

        let err = repo
            .update_amount("missing", MoneyCents::from_cents(1))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_orders_by_date_and_limits() {
        let repo = repo().await;
        for day in [3, 1, 2] {
            let new = NewAmountRecord::new(format!("day {day}"), MoneyCents::from_cents(100), date(day));
            repo.insert(&new).await.unwrap();
        }

        let records = repo.list(2).await.unwrap();
        let days: Vec<NaiveDate> = records.iter().map(|r| r.occurred_on).collect();
        assert_eq!(days, vec![date(3), date(2)]);
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_total_mixes_both_columns() {
        let repo = repo().await;
        repo.insert(&NewAmountRecord::new("new", MoneyCents::from_cents(1050), date(1)))
            .await
            .unwrap();
        repo.insert_legacy("legacy", Some(0), &LegacyDecimal::from("2,25"), date(1))
            .await
            .unwrap();
        repo.insert_legacy("refund", None, &LegacyDecimal::from("-0.75"), date(1))
            .await
            .unwrap();

        assert_eq!(repo.total().await.unwrap().cents(), 1050 + 225 - 75);
    }

    #[tokio::test]
    async fn test_backfill_migrates_in_batches() {
        let repo = repo().await;
        repo.insert(&NewAmountRecord::new("already", MoneyCents::from_cents(1), date(1)))
            .await
            .unwrap();
        let real = repo
            .insert_legacy("real", Some(0), &LegacyDecimal::Real(19.99), date(1))
            .await
            .unwrap();
        let zero = repo
            .insert_legacy("zero", Some(0), &LegacyDecimal::from("0.00"), date(1))
            .await
            .unwrap();
        repo.insert_legacy("text", None, &LegacyDecimal::from("4,5"), date(1))
            .await
            .unwrap();

        assert_eq!(repo.list_unmigrated(10).await.unwrap().len(), 3);

        assert_eq!(repo.backfill(2).await.unwrap(), 2);
        assert_eq!(repo.backfill(2).await.unwrap(), 1);
        assert_eq!(repo.backfill(2).await.unwrap(), 0);
        assert!(repo.list_unmigrated(10).await.unwrap().is_empty());

        let (legacy, cents, migrated) = raw_columns(&repo, &real).await;
        assert_eq!(legacy.as_deref(), Some("19.99"));
        assert_eq!(cents, Some(1999));
        assert_eq!(migrated, Some(1));

        // A genuine zero is now distinguishable from an unmigrated row
        let record = repo.get_by_id(&zero).await.unwrap().unwrap();
        assert_eq!(record.amount.cents(), 0);
        assert_eq!(record.source, AmountSource::CentsColumn);
    }

    #[tokio::test]
    async fn test_backfill_preserves_totals() {
        let repo = repo().await;
        repo.insert_legacy("a", Some(0), &LegacyDecimal::from("10.005"), date(1))
            .await
            .unwrap();
        repo.insert_legacy("b", Some(300), &LegacyDecimal::from("9.99"), date(1))
            .await
            .unwrap();
        repo.insert_legacy("c", None, &LegacyDecimal::Integer(2), date(1))
            .await
            .unwrap();

        let before = repo.total().await.unwrap();
        while repo.backfill(1).await.unwrap() > 0 {}
        let after = repo.total().await.unwrap();

        assert_eq!(before.cents(), 1001 + 300 + 200);
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_total_over_many_rows() {
        let repo = repo().await;
        for cents in 1..=300 {
            let new = NewAmountRecord::new("row", MoneyCents::from_cents(cents), date(1));
            repo.insert(&new).await.unwrap();
        }
        repo.insert_legacy("legacy", None, &LegacyDecimal::Real(0.5), date(1))
            .await
            .unwrap();

        assert_eq!(repo.total().await.unwrap().cents(), 300 * 301 / 2 + 50);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_backfill_waits_for_another_writer() {
        let dir = tempfile::tempdir().unwrap();
        let config = DbConfig::new(dir.path().join("centavo.db")).max_connections(2);
        let db = Database::new(config).await.unwrap();
        let repo = db.amounts();

        let id = repo
            .insert_legacy("legacy", Some(0), &LegacyDecimal::from("4.00"), date(1))
            .await
            .unwrap();

        // Another connection holds the write lock while backfill starts
        let mut writer = db.pool().begin().await.unwrap();
        sqlx::query("UPDATE amount_records SET description = 'edited' WHERE id = ?1")
            .bind(&id)
            .execute(&mut *writer)
            .await
            .unwrap();

        let backfill = tokio::spawn({
            let repo = repo.clone();
            async move { repo.backfill(10).await }
        });
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        writer.commit().await.unwrap();

        assert_eq!(backfill.await.unwrap().unwrap(), 1);

        let record = repo.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(record.description, "edited");
        assert_eq!(record.amount.cents(), 400);
        assert_eq!(record.source, AmountSource::CentsColumn);
    }
}
