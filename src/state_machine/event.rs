//! Events that can occur in a session

use super::intent::{Intent, Vocabulary};
use crate::db::DebtorRecord;
use rust_decimal::Decimal;

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    /// Text typed or a button pressed by the user
    UserMessage { text: String, intent: Intent },

    /// Result of a ledger command requested by the previous transition
    LedgerOutcome(Outcome),
}

impl Event {
    /// Build a user message event, classifying the text against `vocabulary`
    pub fn user_message(text: impl Into<String>, vocabulary: &Vocabulary) -> Self {
        let text = text.into();
        let intent = vocabulary.classify(&text);
        Event::UserMessage {
            text: text.trim().to_string(),
            intent,
        }
    }
}

/// What a ledger command produced
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Names for the selection menu
    Names(Vec<String>),
    /// Every record, for the summary listing
    Records(Vec<DebtorRecord>),
    /// Lookup of typed text against existing names
    Selection {
        name: String,
        exists: bool,
        fallback: Option<Intent>,
    },
    Created { name: String, amount: Decimal },
    AlreadyExists { name: String },
    DebtIncreased {
        name: String,
        amount: Decimal,
        remaining: Decimal,
    },
    PaymentApplied { name: String, remaining: Decimal },
    Overpayment { name: String, remaining: Decimal },
    Status(DebtorRecord),
    Deleted { name: String },
    NotFound { name: String },
}
