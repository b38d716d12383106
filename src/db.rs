//! Ledger storage
//!
//! Provides persistence for debtor records. Every read-then-write runs inside
//! an IMMEDIATE transaction while holding the connection lock, so two
//! operations on the same name can never interleave.

mod schema;

pub use schema::*;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Debtor not found: {0}")]
    NotFound(String),
    #[error("Debtor already exists: {0}")]
    AlreadyExists(String),
    #[error("Payment exceeds remaining balance of {remaining}")]
    Overpayment { name: String, remaining: Decimal },
    #[error("Amount must be positive, got {0}")]
    InvalidAmount(Decimal),
    #[error("Amount out of range for debtor {0}")]
    AmountOverflow(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Thread-safe database handle
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    #[allow(dead_code)] // Used in tests
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// A panic while holding the lock drops any open transaction, which
    /// rolls it back, so the connection stays usable.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn run_migrations(&self) -> DbResult<()> {
        let mut conn = self.conn();
        conn.execute_batch(SCHEMA)?;

        let has_legacy: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
            params![LEGACY_TABLE],
            |row| row.get(0),
        )?;

        if has_legacy {
            let now = Utc::now().to_rfc3339();
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let copied = tx.execute(MIGRATION_COPY_LEGACY, params![now])?;
            tx.execute_batch(MIGRATION_DROP_LEGACY)?;
            tx.commit()?;
            tracing::info!(rows = copied, "Migrated legacy debts table");
        }

        Ok(())
    }

    // ==================== Queries ====================

    /// All debtor names, ordered by name
    pub fn list_names(&self) -> DbResult<Vec<String>> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT name FROM debtors ORDER BY name")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }

    /// All debtor records, ordered by name
    pub fn list_records(&self) -> DbResult<Vec<DebtorRecord>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT name, total, paid, created_at, updated_at FROM debtors ORDER BY name",
        )?;
        let rows = stmt.query_map([], parse_record_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
    }

    /// Get a debtor by name
    pub fn get_record(&self, name: &str) -> DbResult<Option<DebtorRecord>> {
        let conn = self.conn();
        fetch_record(&conn, name)
    }

    // ==================== Mutations ====================

    /// Insert a new debtor with `paid = 0`. An existing record is left untouched.
    pub fn create_record(&self, name: &str, initial_amount: Decimal) -> DbResult<DebtorRecord> {
        if initial_amount <= Decimal::ZERO {
            return Err(DbError::InvalidAmount(initial_amount));
        }

        let conn = self.conn();
        let now = Utc::now();

        let inserted = conn.execute(
            "INSERT OR IGNORE INTO debtors (name, total, paid, created_at, updated_at)
             VALUES (?1, ?2, '0', ?3, ?3)",
            params![name, initial_amount.to_string(), now.to_rfc3339()],
        )?;

        if inserted == 0 {
            return Err(DbError::AlreadyExists(name.to_string()));
        }

        Ok(DebtorRecord {
            name: name.to_string(),
            total: initial_amount,
            paid: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        })
    }

    /// Add `amount` to the debtor's total and return the updated record
    pub fn increase_total(&self, name: &str, amount: Decimal) -> DbResult<DebtorRecord> {
        if amount <= Decimal::ZERO {
            return Err(DbError::InvalidAmount(amount));
        }

        let mut conn = self.conn();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut record =
            fetch_record(&tx, name)?.ok_or_else(|| DbError::NotFound(name.to_string()))?;
        record.total = record
            .total
            .checked_add(amount)
            .ok_or_else(|| DbError::AmountOverflow(name.to_string()))?;
        record.updated_at = Utc::now();

        tx.execute(
            "UPDATE debtors SET total = ?1, updated_at = ?2 WHERE name = ?3",
            params![
                record.total.to_string(),
                record.updated_at.to_rfc3339(),
                name
            ],
        )?;
        tx.commit()?;

        Ok(record)
    }

    /// Apply a payment and return the remaining balance.
    ///
    /// Rejected with [`DbError::Overpayment`] (carrying the balance before the
    /// payment) if it would push `paid` above `total`; nothing is written then.
    pub fn record_payment(&self, name: &str, amount: Decimal) -> DbResult<Decimal> {
        if amount <= Decimal::ZERO {
            return Err(DbError::InvalidAmount(amount));
        }

        let mut conn = self.conn();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let record =
            fetch_record(&tx, name)?.ok_or_else(|| DbError::NotFound(name.to_string()))?;
        let new_paid = record
            .paid
            .checked_add(amount)
            .ok_or_else(|| DbError::AmountOverflow(name.to_string()))?;

        if new_paid > record.total {
            // Dropping the transaction rolls it back
            return Err(DbError::Overpayment {
                name: name.to_string(),
                remaining: record.remaining(),
            });
        }

        tx.execute(
            "UPDATE debtors SET paid = ?1, updated_at = ?2 WHERE name = ?3",
            params![new_paid.to_string(), Utc::now().to_rfc3339(), name],
        )?;
        tx.commit()?;

        Ok(record.total - new_paid)
    }

    /// Delete a debtor; returns whether a row was removed
    pub fn delete_record(&self, name: &str) -> DbResult<bool> {
        let conn = self.conn();
        let deleted = conn.execute("DELETE FROM debtors WHERE name = ?1", params![name])?;
        Ok(deleted > 0)
    }
}

fn fetch_record(conn: &Connection, name: &str) -> DbResult<Option<DebtorRecord>> {
    conn.query_row(
        "SELECT name, total, paid, created_at, updated_at FROM debtors WHERE name = ?1",
        params![name],
        parse_record_row,
    )
    .optional()
    .map_err(DbError::from)
}

/// Parse a debtor row from the database
fn parse_record_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DebtorRecord> {
    Ok(DebtorRecord {
        name: row.get(0)?,
        total: parse_decimal(row, 1)?,
        paid: parse_decimal(row, 2)?,
        created_at: parse_datetime(&row.get::<_, String>(3)?),
        updated_at: parse_datetime(&row.get::<_, String>(4)?),
    })
}

fn parse_decimal(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let text: String = row.get(idx)?;
    Decimal::from_str(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc))
}
