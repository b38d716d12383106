//! Interaction executor
//!
//! Drives one user message through the state machine: run the transition,
//! execute ledger effects, feed their outcomes back, stop at the reply.

use super::traits::LedgerStore;
use crate::db::DbError;
use crate::state_machine::{
    transition, Effect, Event, LedgerCommand, Outcome, Reply, SessionContext, TransitionError,
};
use thiserror::Error;

/// Upper bound on transitions per interaction. A message needs at most three
/// (look up an action label as a name, run the action, answer its outcome).
const MAX_STEPS: usize = 4;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Storage failure: {0}")]
    Storage(#[from] DbError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("Interaction ended without a reply")]
    NoReply,
    #[error("Interaction exceeded {MAX_STEPS} steps")]
    TooManySteps,
}

/// Run one event to completion.
///
/// Returns the session to commit and the reply. On error nothing should be
/// committed; ledger writes that did succeed are each atomic on their own.
pub fn run_interaction<S: LedgerStore + ?Sized>(
    store: &S,
    session: &SessionContext,
    event: Event,
) -> Result<(SessionContext, Reply), RuntimeError> {
    let mut session = session.clone();
    let mut next_event = Some(event);
    let mut steps = 0;

    while let Some(event) = next_event.take() {
        steps += 1;
        if steps > MAX_STEPS {
            return Err(RuntimeError::TooManySteps);
        }

        let result = transition(&session, event)?;
        session = result.new_session;

        for effect in result.effects {
            match effect {
                Effect::Reply(reply) => return Ok((session, reply)),
                Effect::Ledger(command) => {
                    next_event = Some(Event::LedgerOutcome(execute_command(store, command)?));
                }
            }
        }
    }

    Err(RuntimeError::NoReply)
}

/// Execute a ledger command, folding expected refusals into the outcome
pub fn execute_command<S: LedgerStore + ?Sized>(
    store: &S,
    command: LedgerCommand,
) -> Result<Outcome, DbError> {
    if command.is_mutation() {
        tracing::info!(command = ?command, "Executing ledger command");
    } else {
        tracing::debug!(command = ?command, "Executing ledger query");
    }

    let outcome = match command {
        LedgerCommand::ListNames => Outcome::Names(store.list_names()?),
        LedgerCommand::ListRecords => Outcome::Records(store.list_records()?),
        LedgerCommand::Lookup { name, fallback } => {
            let exists = store.get_record(&name)?.is_some();
            Outcome::Selection {
                name,
                exists,
                fallback,
            }
        }
        LedgerCommand::Create { name, amount } => match store.create_record(&name, amount) {
            Ok(_) => Outcome::Created { name, amount },
            Err(DbError::AlreadyExists(_)) => Outcome::AlreadyExists { name },
            Err(e) => return Err(e),
        },
        LedgerCommand::IncreaseTotal { name, amount } => {
            match store.increase_total(&name, amount) {
                Ok(record) => Outcome::DebtIncreased {
                    remaining: record.remaining(),
                    name,
                    amount,
                },
                Err(DbError::NotFound(_)) => Outcome::NotFound { name },
                Err(e) => return Err(e),
            }
        }
        LedgerCommand::RecordPayment { name, amount } => {
            match store.record_payment(&name, amount) {
                Ok(remaining) => Outcome::PaymentApplied { name, remaining },
                Err(DbError::Overpayment { remaining, .. }) => {
                    tracing::info!(name = %name, amount = %amount, remaining = %remaining, "Payment rejected");
                    Outcome::Overpayment { name, remaining }
                }
                Err(DbError::NotFound(_)) => Outcome::NotFound { name },
                Err(e) => return Err(e),
            }
        }
        LedgerCommand::Status { name } => match store.get_record(&name)? {
            Some(record) => Outcome::Status(record),
            None => Outcome::NotFound { name },
        },
        LedgerCommand::Delete { name } => {
            if store.delete_record(&name)? {
                Outcome::Deleted { name }
            } else {
                Outcome::NotFound { name }
            }
        }
    };

    Ok(outcome)
}
