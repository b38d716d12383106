//! HTTP API for the debt ledger chat

mod handlers;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::db::Database;
use crate::locale::Locale;
use crate::runtime::ProductionRuntime;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub runtime: Arc<ProductionRuntime>,
}

impl AppState {
    pub fn new(db: Database, locale: Locale) -> Self {
        Self {
            runtime: Arc::new(ProductionRuntime::new(db, locale)),
        }
    }
}
