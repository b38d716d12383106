//! Pure state transition function
//!
//! Given the current session and an event, decides the next session and the
//! effects to run. Ledger access never happens here: a transition that needs
//! the ledger emits [`Effect::Ledger`] and the runtime answers with an
//! [`Event::LedgerOutcome`].

use super::{
    Effect, Event, Intent, LedgerCommand, Menu, Notice, Outcome, PendingAction, SessionContext,
};
use crate::amount::parse_amount;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_session: SessionContext,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(session: SessionContext) -> Self {
        Self {
            new_session: session,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    fn reply(session: SessionContext, notice: Notice, menu: Menu) -> Self {
        Self::new(session).with_effect(Effect::reply(notice, menu))
    }

    fn ledger(session: SessionContext, command: LedgerCommand) -> Self {
        Self::new(session).with_effect(Effect::ledger(command))
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("Unexpected ledger outcome {outcome:?} while {pending:?}")]
    UnexpectedOutcome {
        pending: PendingAction,
        outcome: Box<Outcome>,
    },
}

/// Pure transition function
///
/// Given the same inputs, it always produces the same outputs, with no I/O.
pub fn transition(
    session: &SessionContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match event {
        Event::UserMessage { text, intent } => Ok(on_user_message(session, &text, &intent)),
        Event::LedgerOutcome(outcome) => on_outcome(session, outcome),
    }
}

// ============================================================
// User input
// ============================================================

fn on_user_message(session: &SessionContext, text: &str, intent: &Intent) -> TransitionResult {
    match intent {
        Intent::Back => {
            return TransitionResult::reply(
                SessionContext::cleared(),
                Notice::ChooseFromMenu,
                Menu::Main,
            )
        }
        Intent::Start => {
            return TransitionResult::reply(SessionContext::cleared(), Notice::Welcome, Menu::Main)
        }
        _ => {}
    }

    // A pending amount step whose debtor vanished is dropped, not honoured
    let session = if session.pending_action.needs_selection() && session.selected_name.is_none() {
        session.settled()
    } else {
        session.clone()
    };

    match session.pending_action {
        PendingAction::AwaitingNewName => {
            if text.is_empty() {
                TransitionResult::reply(session, Notice::InvalidName, Menu::None)
            } else {
                TransitionResult::reply(
                    SessionContext::awaiting_initial_amount(text),
                    Notice::AskInitialAmount {
                        name: text.to_string(),
                    },
                    Menu::None,
                )
            }
        }

        PendingAction::AwaitingInitialAmount => {
            let Some(name) = session.draft_name.clone() else {
                return TransitionResult::reply(
                    SessionContext::cleared(),
                    Notice::ChooseFromMenu,
                    Menu::Main,
                );
            };
            match parse_amount(text) {
                Ok(amount) => TransitionResult::ledger(session, LedgerCommand::Create { name, amount }),
                Err(_) => TransitionResult::reply(session, Notice::InvalidAmount, Menu::None),
            }
        }

        PendingAction::AwaitingNewDebtAmount | PendingAction::AwaitingPaymentAmount => {
            let (Some(name), Ok(amount)) = (session.selected_name.clone(), parse_amount(text))
            else {
                return TransitionResult::reply(session, Notice::InvalidAmount, Menu::None);
            };
            let command = if session.pending_action == PendingAction::AwaitingNewDebtAmount {
                LedgerCommand::IncreaseTotal { name, amount }
            } else {
                LedgerCommand::RecordPayment { name, amount }
            };
            TransitionResult::ledger(session, command)
        }

        PendingAction::None => on_top_level(session, text, intent),
    }
}

fn on_top_level(session: SessionContext, text: &str, intent: &Intent) -> TransitionResult {
    match intent {
        Intent::MainMenu => TransitionResult::ledger(session, LedgerCommand::ListNames),
        Intent::ListAll => TransitionResult::ledger(session, LedgerCommand::ListRecords),
        Intent::AddName => TransitionResult::reply(
            SessionContext::awaiting_new_name(),
            Notice::AskNewName,
            Menu::None,
        ),

        // Already on the debtor that carries this label as its name
        Intent::NewDebt | Intent::Payment | Intent::Status | Intent::Delete
            if session.selected_name.as_deref() == Some(text) =>
        {
            on_debtor_action(session, intent)
        }

        // An existing debtor may carry an action label as its name
        Intent::NewDebt | Intent::Payment | Intent::Status | Intent::Delete => {
            TransitionResult::ledger(
                session,
                LedgerCommand::Lookup {
                    name: text.to_string(),
                    fallback: Some(intent.clone()),
                },
            )
        }

        Intent::Text if !text.is_empty() => TransitionResult::ledger(
            session,
            LedgerCommand::Lookup {
                name: text.to_string(),
                fallback: None,
            },
        ),

        _ => TransitionResult::reply(session, Notice::NotUnderstood, Menu::None),
    }
}

fn on_debtor_action(session: SessionContext, action: &Intent) -> TransitionResult {
    let Some(name) = session.selected_name.clone() else {
        return TransitionResult::reply(session, Notice::SelectFirst, Menu::None);
    };
    match action {
        Intent::NewDebt => TransitionResult::reply(
            session.with_pending(PendingAction::AwaitingNewDebtAmount),
            Notice::AskDebtAmount { name },
            Menu::None,
        ),
        Intent::Payment => TransitionResult::reply(
            session.with_pending(PendingAction::AwaitingPaymentAmount),
            Notice::AskPaymentAmount { name },
            Menu::None,
        ),
        Intent::Status => TransitionResult::ledger(session, LedgerCommand::Status { name }),
        Intent::Delete => TransitionResult::ledger(session, LedgerCommand::Delete { name }),
        _ => TransitionResult::reply(session, Notice::NotUnderstood, Menu::None),
    }
}

// ============================================================
// Ledger outcomes
// ============================================================

fn on_outcome(
    session: &SessionContext,
    outcome: Outcome,
) -> Result<TransitionResult, TransitionError> {
    let result = match (session.pending_action, outcome) {
        // Creation finishes the sequence either way
        (PendingAction::AwaitingInitialAmount, Outcome::Created { name, amount }) => {
            TransitionResult::reply(
                SessionContext::cleared(),
                Notice::Created { name, amount },
                Menu::Main,
            )
        }
        (PendingAction::AwaitingInitialAmount, Outcome::AlreadyExists { name }) => {
            TransitionResult::reply(
                SessionContext::cleared(),
                Notice::AlreadyExists { name },
                Menu::Main,
            )
        }

        // Amount steps settle back onto the selected debtor, even on rejection
        (
            PendingAction::AwaitingNewDebtAmount,
            Outcome::DebtIncreased {
                name,
                amount,
                remaining,
            },
        ) => TransitionResult::reply(
            session.settled(),
            Notice::DebtIncreased {
                name,
                amount,
                remaining,
            },
            Menu::DebtorActions,
        ),
        (PendingAction::AwaitingPaymentAmount, Outcome::PaymentApplied { remaining, .. }) => {
            TransitionResult::reply(
                session.settled(),
                Notice::PaymentApplied { remaining },
                Menu::DebtorActions,
            )
        }
        (PendingAction::AwaitingPaymentAmount, Outcome::Overpayment { remaining, .. }) => {
            TransitionResult::reply(
                session.settled(),
                Notice::Overpayment { remaining },
                Menu::DebtorActions,
            )
        }
        (
            PendingAction::AwaitingNewDebtAmount | PendingAction::AwaitingPaymentAmount,
            Outcome::NotFound { name },
        ) => TransitionResult::reply(
            session.settled(),
            Notice::NotFound { name },
            Menu::DebtorActions,
        ),

        // Top level
        (PendingAction::None, Outcome::Names(names)) => {
            if names.is_empty() {
                TransitionResult::reply(session.clone(), Notice::ListEmpty, Menu::Main)
            } else {
                TransitionResult::reply(session.clone(), Notice::ChooseName, Menu::NameList(names))
            }
        }
        (PendingAction::None, Outcome::Records(records)) => {
            if records.is_empty() {
                TransitionResult::reply(session.clone(), Notice::NoDebts, Menu::None)
            } else {
                TransitionResult::reply(session.clone(), Notice::Summary(records), Menu::None)
            }
        }
        (PendingAction::None, Outcome::Selection { name, exists: true, .. }) => {
            TransitionResult::reply(
                SessionContext::selected(name.clone()),
                Notice::Selected { name },
                Menu::DebtorActions,
            )
        }
        (
            PendingAction::None,
            Outcome::Selection {
                exists: false,
                fallback: Some(action),
                ..
            },
        ) => on_debtor_action(session.clone(), &action),
        (PendingAction::None, Outcome::Selection { exists: false, .. }) => {
            TransitionResult::reply(session.clone(), Notice::NotUnderstood, Menu::None)
        }
        (PendingAction::None, Outcome::Status(record)) => TransitionResult::reply(
            session.clone(),
            Notice::Status(record),
            Menu::DebtorActions,
        ),
        (PendingAction::None, Outcome::Deleted { name }) => TransitionResult::reply(
            SessionContext::cleared(),
            Notice::Deleted { name },
            Menu::Main,
        ),
        (PendingAction::None, Outcome::NotFound { name }) => {
            TransitionResult::reply(session.clone(), Notice::NotFound { name }, Menu::None)
        }

        (pending, outcome) => {
            return Err(TransitionError::UnexpectedOutcome {
                pending,
                outcome: Box::new(outcome),
            })
        }
    };
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::Locale;
    use crate::state_machine::{Reply, Vocabulary};
    use rust_decimal::Decimal;

    fn vocab() -> Vocabulary {
        Locale::English.vocabulary()
    }

    fn user(text: &str) -> Event {
        Event::user_message(text, &vocab())
    }

    fn only_reply(result: &TransitionResult) -> &Reply {
        match result.effects.as_slice() {
            [Effect::Reply(reply)] => reply,
            other => panic!("Expected a single reply, got {other:?}"),
        }
    }

    fn only_command(result: &TransitionResult) -> &LedgerCommand {
        match result.effects.as_slice() {
            [Effect::Ledger(command)] => command,
            other => panic!("Expected a single ledger command, got {other:?}"),
        }
    }

    /// Press an action button when no debtor carries that label as a name
    fn press_action(session: &SessionContext, label: &str) -> TransitionResult {
        let lookup = transition(session, user(label)).unwrap();
        let LedgerCommand::Lookup { name, fallback } = only_command(&lookup).clone() else {
            panic!("Expected a lookup for {label}");
        };
        assert!(fallback.is_some());
        transition(
            &lookup.new_session,
            Event::LedgerOutcome(Outcome::Selection {
                name,
                exists: false,
                fallback,
            }),
        )
        .unwrap()
    }

    #[test]
    fn test_back_clears_everything() {
        let session = SessionContext::selected("Ali").with_pending(PendingAction::AwaitingPaymentAmount);

        let result = transition(&session, user(&vocab().back)).unwrap();

        assert_eq!(result.new_session, SessionContext::cleared());
        assert_eq!(only_reply(&result).menu, Menu::Main);
    }

    #[test]
    fn test_creation_flow() {
        let result = transition(&SessionContext::cleared(), user(&vocab().add_name)).unwrap();
        assert_eq!(result.new_session.pending_action, PendingAction::AwaitingNewName);

        let result = transition(&result.new_session, user("  Ali ")).unwrap();
        assert_eq!(result.new_session, SessionContext::awaiting_initial_amount("Ali"));

        let result = transition(&result.new_session, user("100")).unwrap();
        assert_eq!(
            only_command(&result),
            &LedgerCommand::Create {
                name: "Ali".to_string(),
                amount: Decimal::from(100),
            }
        );

        let result = transition(
            &result.new_session,
            Event::LedgerOutcome(Outcome::Created {
                name: "Ali".to_string(),
                amount: Decimal::from(100),
            }),
        )
        .unwrap();
        assert_eq!(result.new_session, SessionContext::cleared());
        assert_eq!(only_reply(&result).menu, Menu::Main);
    }

    #[test]
    fn test_empty_name_reprompts() {
        let session = SessionContext::awaiting_new_name();
        let result = transition(&session, user("   ")).unwrap();

        assert_eq!(result.new_session, session);
        assert_eq!(only_reply(&result).notice, Notice::InvalidName);
    }

    #[test]
    fn test_menu_label_accepted_as_new_name() {
        let session = SessionContext::awaiting_new_name();
        let result = transition(&session, user(&vocab().status)).unwrap();

        assert_eq!(
            result.new_session,
            SessionContext::awaiting_initial_amount(vocab().status)
        );
    }

    #[test]
    fn test_invalid_amount_reprompts() {
        let session = SessionContext::awaiting_initial_amount("Ali");
        let result = transition(&session, user("zero")).unwrap();

        assert_eq!(result.new_session, session);
        assert_eq!(only_reply(&result).notice, Notice::InvalidAmount);

        let session = SessionContext::selected("Ali").with_pending(PendingAction::AwaitingPaymentAmount);
        let result = transition(&session, user("-3")).unwrap();
        assert_eq!(result.new_session, session);
        assert_eq!(only_reply(&result).notice, Notice::InvalidAmount);
    }

    #[test]
    fn test_duplicate_creation_clears_session() {
        let session = SessionContext::awaiting_initial_amount("Ali");
        let result = transition(
            &session,
            Event::LedgerOutcome(Outcome::AlreadyExists {
                name: "Ali".to_string(),
            }),
        )
        .unwrap();

        assert_eq!(result.new_session, SessionContext::cleared());
        assert!(matches!(
            only_reply(&result).notice,
            Notice::AlreadyExists { .. }
        ));
    }

    #[test]
    fn test_actions_require_selection() {
        for label in [vocab().new_debt, vocab().payment, vocab().status, vocab().delete] {
            let result = press_action(&SessionContext::cleared(), &label);
            assert_eq!(result.new_session, SessionContext::cleared());
            assert_eq!(only_reply(&result).notice, Notice::SelectFirst);
        }
    }

    #[test]
    fn test_payment_overpayment_settles_on_debtor() {
        let selected = SessionContext::selected("Ali");
        let result = press_action(&selected, &vocab().payment);
        assert_eq!(
            result.new_session.pending_action,
            PendingAction::AwaitingPaymentAmount
        );

        let result = transition(&result.new_session, user("٢٠٠")).unwrap();
        assert_eq!(
            only_command(&result),
            &LedgerCommand::RecordPayment {
                name: "Ali".to_string(),
                amount: Decimal::from(200),
            }
        );

        let result = transition(
            &result.new_session,
            Event::LedgerOutcome(Outcome::Overpayment {
                name: "Ali".to_string(),
                remaining: Decimal::from(90),
            }),
        )
        .unwrap();
        assert_eq!(result.new_session, selected);
        assert_eq!(
            only_reply(&result),
            &Reply {
                notice: Notice::Overpayment {
                    remaining: Decimal::from(90)
                },
                menu: Menu::DebtorActions,
            }
        );
    }

    #[test]
    fn test_stale_pending_without_selection_is_dropped() {
        let session = SessionContext::cleared().with_pending(PendingAction::AwaitingNewDebtAmount);
        let result = transition(&session, user("50")).unwrap();

        assert_eq!(result.new_session.pending_action, PendingAction::None);
        assert!(matches!(only_command(&result), LedgerCommand::Lookup { .. }));
    }

    #[test]
    fn test_selecting_a_name() {
        let result = transition(&SessionContext::cleared(), user("Ali")).unwrap();
        assert_eq!(
            only_command(&result),
            &LedgerCommand::Lookup {
                name: "Ali".to_string(),
                fallback: None,
            }
        );

        let found = transition(
            &result.new_session,
            Event::LedgerOutcome(Outcome::Selection {
                name: "Ali".to_string(),
                exists: true,
                fallback: None,
            }),
        )
        .unwrap();
        assert_eq!(found.new_session, SessionContext::selected("Ali"));
        assert_eq!(only_reply(&found).menu, Menu::DebtorActions);

        let missing = transition(
            &result.new_session,
            Event::LedgerOutcome(Outcome::Selection {
                name: "Ali".to_string(),
                exists: false,
                fallback: None,
            }),
        )
        .unwrap();
        assert_eq!(missing.new_session, SessionContext::cleared());
        assert_eq!(only_reply(&missing).notice, Notice::NotUnderstood);
    }

    #[test]
    fn test_debtor_named_like_an_action_is_selected_first() {
        let selected = SessionContext::selected("Ali");
        let result = transition(&selected, user(&vocab().payment)).unwrap();
        assert_eq!(
            only_command(&result),
            &LedgerCommand::Lookup {
                name: vocab().payment,
                fallback: Some(Intent::Payment),
            }
        );

        let found = transition(
            &result.new_session,
            Event::LedgerOutcome(Outcome::Selection {
                name: vocab().payment,
                exists: true,
                fallback: Some(Intent::Payment),
            }),
        )
        .unwrap();
        assert_eq!(found.new_session, SessionContext::selected(vocab().payment));
        assert_eq!(only_reply(&found).menu, Menu::DebtorActions);

        // Pressed again while selected, the label acts on that debtor
        let again = transition(&found.new_session, user(&vocab().payment)).unwrap();
        assert_eq!(
            again.new_session,
            SessionContext::selected(vocab().payment)
                .with_pending(PendingAction::AwaitingPaymentAmount)
        );
    }

    #[test]
    fn test_action_falls_back_when_no_such_debtor() {
        let selected = SessionContext::selected("Ali");

        let result = press_action(&selected, &vocab().status);
        assert_eq!(
            only_command(&result),
            &LedgerCommand::Status {
                name: "Ali".to_string()
            }
        );
        assert_eq!(result.new_session, selected);

        let result = press_action(&selected, &vocab().new_debt);
        assert_eq!(
            result.new_session,
            selected.with_pending(PendingAction::AwaitingNewDebtAmount)
        );
    }

    #[test]
    fn test_delete_clears_only_on_success() {
        let selected = SessionContext::selected("Ali");

        let deleted = transition(
            &selected,
            Event::LedgerOutcome(Outcome::Deleted {
                name: "Ali".to_string(),
            }),
        )
        .unwrap();
        assert_eq!(deleted.new_session, SessionContext::cleared());

        let missing = transition(
            &selected,
            Event::LedgerOutcome(Outcome::NotFound {
                name: "Ali".to_string(),
            }),
        )
        .unwrap();
        assert_eq!(missing.new_session, selected);
    }

    #[test]
    fn test_unexpected_outcome_is_an_error() {
        let result = transition(
            &SessionContext::awaiting_new_name(),
            Event::LedgerOutcome(Outcome::Names(vec![])),
        );
        assert!(matches!(
            result,
            Err(TransitionError::UnexpectedOutcome { .. })
        ));
    }
}
