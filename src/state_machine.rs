//! Session state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions. Ledger
//! access is requested through effects and answered with outcome events.

mod effect;
pub mod event;
pub mod intent;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::{Effect, LedgerCommand, Menu, Notice, Reply};
pub use event::{Event, Outcome};
pub use intent::{Intent, Vocabulary};
pub use state::{PendingAction, SessionContext};
pub use transition::{transition, TransitionError, TransitionResult};
