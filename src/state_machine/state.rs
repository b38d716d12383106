//! Session state types

use serde::{Deserialize, Serialize};

/// The kind of input a session is currently waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PendingAction {
    /// Top level: menu triggers or a debtor name
    #[default]
    None,
    AwaitingNewName,
    AwaitingInitialAmount,
    AwaitingNewDebtAmount,
    AwaitingPaymentAmount,
}

impl PendingAction {
    /// Whether this step acts on the selected debtor
    pub fn needs_selection(self) -> bool {
        matches!(
            self,
            PendingAction::AwaitingNewDebtAmount | PendingAction::AwaitingPaymentAmount
        )
    }

    /// Whether this step belongs to the debtor creation sequence
    pub fn is_creation(self) -> bool {
        matches!(
            self,
            PendingAction::AwaitingNewName | PendingAction::AwaitingInitialAmount
        )
    }
}

/// Per-user conversational context. Lives only in memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SessionContext {
    pub pending_action: PendingAction,
    /// Debtor in focus. May go stale if the record is deleted elsewhere.
    pub selected_name: Option<String>,
    /// Name typed during creation, kept until the initial amount arrives
    pub draft_name: Option<String>,
}

impl SessionContext {
    /// Fully cleared context (top-level menu)
    pub fn cleared() -> Self {
        Self::default()
    }

    /// Start the creation sequence
    pub fn awaiting_new_name() -> Self {
        Self {
            pending_action: PendingAction::AwaitingNewName,
            ..Self::default()
        }
    }

    /// Creation sequence with the name staged
    pub fn awaiting_initial_amount(draft_name: impl Into<String>) -> Self {
        Self {
            pending_action: PendingAction::AwaitingInitialAmount,
            selected_name: None,
            draft_name: Some(draft_name.into()),
        }
    }

    /// Debtor selected, no pending action
    pub fn selected(name: impl Into<String>) -> Self {
        Self {
            pending_action: PendingAction::None,
            selected_name: Some(name.into()),
            draft_name: None,
        }
    }

    /// Same selection, waiting for `pending_action`
    pub fn with_pending(&self, pending_action: PendingAction) -> Self {
        Self {
            pending_action,
            selected_name: self.selected_name.clone(),
            draft_name: None,
        }
    }

    /// Drop the pending action but stay on the selected debtor
    pub fn settled(&self) -> Self {
        self.with_pending(PendingAction::None)
    }

    /// Check the structural invariants of a context
    pub fn is_valid(&self) -> bool {
        let draft_ok = self.draft_name.is_none()
            || self.pending_action == PendingAction::AwaitingInitialAmount;
        let selection_ok = !self.pending_action.needs_selection() || self.selected_name.is_some();
        let creation_ok = !self.pending_action.is_creation() || self.selected_name.is_none();
        draft_ok && selection_ok && creation_ok
    }
}
