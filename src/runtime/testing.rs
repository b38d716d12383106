//! Mock implementations for testing
//!
//! These mocks enable exercising failure paths without a broken database.

use super::traits::LedgerStore;
use crate::db::{DbError, DbResult, DebtorRecord};
use rust_decimal::Decimal;

fn io_failure() -> DbError {
    DbError::Sqlite(rusqlite::Error::SqliteFailure(
        rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_IOERR),
        Some("disk I/O error".to_string()),
    ))
}

/// Ledger whose every operation fails like an unreadable database file
pub struct FailingLedger;

impl LedgerStore for FailingLedger {
    fn list_names(&self) -> DbResult<Vec<String>> {
        Err(io_failure())
    }

    fn list_records(&self) -> DbResult<Vec<DebtorRecord>> {
        Err(io_failure())
    }

    fn get_record(&self, _name: &str) -> DbResult<Option<DebtorRecord>> {
        Err(io_failure())
    }

    fn create_record(&self, _name: &str, _initial_amount: Decimal) -> DbResult<DebtorRecord> {
        Err(io_failure())
    }

    fn increase_total(&self, _name: &str, _amount: Decimal) -> DbResult<DebtorRecord> {
        Err(io_failure())
    }

    fn record_payment(&self, _name: &str, _amount: Decimal) -> DbResult<Decimal> {
        Err(io_failure())
    }

    fn delete_record(&self, _name: &str) -> DbResult<bool> {
        Err(io_failure())
    }
}

/// Ledger that panics on every call, for exercising the panic guard
pub struct PanickingLedger;

impl LedgerStore for PanickingLedger {
    fn list_names(&self) -> DbResult<Vec<String>> {
        panic!("list_names exploded")
    }

    fn list_records(&self) -> DbResult<Vec<DebtorRecord>> {
        panic!("list_records exploded")
    }

    fn get_record(&self, _name: &str) -> DbResult<Option<DebtorRecord>> {
        panic!("get_record exploded")
    }

    fn create_record(&self, _name: &str, _initial_amount: Decimal) -> DbResult<DebtorRecord> {
        panic!("create_record exploded")
    }

    fn increase_total(&self, _name: &str, _amount: Decimal) -> DbResult<DebtorRecord> {
        panic!("increase_total exploded")
    }

    fn record_payment(&self, _name: &str, _amount: Decimal) -> DbResult<Decimal> {
        panic!("record_payment exploded")
    }

    fn delete_record(&self, _name: &str) -> DbResult<bool> {
        panic!("delete_record exploded")
    }
}
