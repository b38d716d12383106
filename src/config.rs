//! Process configuration from the environment

use crate::locale::Locale;
use std::path::PathBuf;

const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub port: u16,
    pub locale: Locale,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (the environment in production)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let db_path = lookup("DEBT_LEDGER_DB_PATH").map_or_else(
            || {
                let home = lookup("HOME").unwrap_or_else(|| "/tmp".to_string());
                PathBuf::from(home).join(".debt-ledger").join("debts.db")
            },
            PathBuf::from,
        );

        let port = lookup("DEBT_LEDGER_PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let locale = match lookup("DEBT_LEDGER_LOCALE") {
            Some(value) => value.parse().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to English");
                Locale::default()
            }),
            None => Locale::default(),
        };

        Self {
            db_path,
            port,
            locale,
        }
    }
}
