//! Database schema and types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// SQL schema for initialization
///
/// Amounts are stored as canonical decimal text so repeated additions never
/// pick up binary floating point drift.
pub const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS debtors (
    name TEXT PRIMARY KEY NOT NULL CHECK (length(name) > 0),
    total TEXT NOT NULL,
    paid TEXT NOT NULL DEFAULT '0',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
";

/// Name of the table written by the first (REAL-typed) version of the bot
pub const LEGACY_TABLE: &str = "debts";

/// Migration SQL to move rows out of the legacy REAL-typed table.
/// `?1` is the timestamp used for both `created_at` and `updated_at`.
pub const MIGRATION_COPY_LEGACY: &str = r"
INSERT OR IGNORE INTO debtors (name, total, paid, created_at, updated_at)
SELECT name, CAST(total AS TEXT), CAST(paid AS TEXT), ?1, ?1 FROM debts
";

pub const MIGRATION_DROP_LEGACY: &str = "DROP TABLE debts";

/// A debtor as stored in the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtorRecord {
    pub name: String,
    /// Cumulative debt ever incurred
    pub total: Decimal,
    /// Cumulative payments, never above `total`
    pub paid: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DebtorRecord {
    pub fn remaining(&self) -> Decimal {
        self.total - self.paid
    }

    /// Check the monetary invariant `0 <= paid <= total`
    pub fn is_consistent(&self) -> bool {
        self.paid >= Decimal::ZERO && self.paid <= self.total
    }
}
