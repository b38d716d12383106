//! Effects produced by state transitions

use super::Intent;
use crate::db::DebtorRecord;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Run a ledger command; its [`super::Outcome`] is fed back as an event
    Ledger(LedgerCommand),

    /// Answer the user. Ends the interaction.
    Reply(Reply),
}

impl Effect {
    pub fn reply(notice: Notice, menu: Menu) -> Self {
        Effect::Reply(Reply { notice, menu })
    }

    pub fn ledger(command: LedgerCommand) -> Self {
        Effect::Ledger(command)
    }
}

/// Ledger operations the state machine can request
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerCommand {
    ListNames,
    ListRecords,
    /// Check whether typed text names an existing debtor. When it does not,
    /// `fallback` is the debtor action the text also spelled.
    Lookup {
        name: String,
        fallback: Option<Intent>,
    },
    Create { name: String, amount: Decimal },
    IncreaseTotal { name: String, amount: Decimal },
    RecordPayment { name: String, amount: Decimal },
    Status { name: String },
    Delete { name: String },
}

impl LedgerCommand {
    /// Whether running this command can change stored records
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            LedgerCommand::Create { .. }
                | LedgerCommand::IncreaseTotal { .. }
                | LedgerCommand::RecordPayment { .. }
                | LedgerCommand::Delete { .. }
        )
    }
}

/// Menu the transport should offer next
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "names", rename_all = "snake_case")]
pub enum Menu {
    Main,
    NameList(Vec<String>),
    DebtorActions,
    /// Keep whatever is currently shown
    None,
}

/// Typed message; rendering to text is a locale concern
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Welcome,
    ChooseFromMenu,
    AskNewName,
    InvalidName,
    AskInitialAmount { name: String },
    InvalidAmount,
    Created { name: String, amount: Decimal },
    AlreadyExists { name: String },
    ListEmpty,
    ChooseName,
    Summary(Vec<DebtorRecord>),
    NoDebts,
    Selected { name: String },
    SelectFirst,
    AskDebtAmount { name: String },
    AskPaymentAmount { name: String },
    DebtIncreased {
        name: String,
        amount: Decimal,
        remaining: Decimal,
    },
    PaymentApplied { remaining: Decimal },
    Overpayment { remaining: Decimal },
    Status(DebtorRecord),
    Deleted { name: String },
    NotFound { name: String },
    NotUnderstood,
    UnexpectedError,
}

/// A notice plus the menu to show with it
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub notice: Notice,
    pub menu: Menu,
}
