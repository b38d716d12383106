//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the executor with mock implementations.

use crate::db::{Database, DbResult, DebtorRecord};
use rust_decimal::Decimal;

/// Storage for debtor records
///
/// Implementations must make `create_record`, `increase_total` and
/// `record_payment` atomic per name.
pub trait LedgerStore: Send + Sync {
    fn list_names(&self) -> DbResult<Vec<String>>;

    fn list_records(&self) -> DbResult<Vec<DebtorRecord>>;

    fn get_record(&self, name: &str) -> DbResult<Option<DebtorRecord>>;

    fn create_record(&self, name: &str, initial_amount: Decimal) -> DbResult<DebtorRecord>;

    fn increase_total(&self, name: &str, amount: Decimal) -> DbResult<DebtorRecord>;

    /// Returns the remaining balance after the payment
    fn record_payment(&self, name: &str, amount: Decimal) -> DbResult<Decimal>;

    fn delete_record(&self, name: &str) -> DbResult<bool>;
}

impl LedgerStore for Database {
    fn list_names(&self) -> DbResult<Vec<String>> {
        Database::list_names(self)
    }

    fn list_records(&self) -> DbResult<Vec<DebtorRecord>> {
        Database::list_records(self)
    }

    fn get_record(&self, name: &str) -> DbResult<Option<DebtorRecord>> {
        Database::get_record(self, name)
    }

    fn create_record(&self, name: &str, initial_amount: Decimal) -> DbResult<DebtorRecord> {
        Database::create_record(self, name, initial_amount)
    }

    fn increase_total(&self, name: &str, amount: Decimal) -> DbResult<DebtorRecord> {
        Database::increase_total(self, name, amount)
    }

    fn record_payment(&self, name: &str, amount: Decimal) -> DbResult<Decimal> {
        Database::record_payment(self, name, amount)
    }

    fn delete_record(&self, name: &str) -> DbResult<bool> {
        Database::delete_record(self, name)
    }
}
