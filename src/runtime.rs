//! Runtime for handling chat messages
//!
//! Owns the per-user session store and serializes each user's messages,
//! while different users proceed in parallel.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::{execute_command, run_interaction, RuntimeError};
pub use traits::*;

use crate::locale::Locale;
use crate::state_machine::{Event, Menu, Notice, Reply, SessionContext, Vocabulary};
use serde::Serialize;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// What the transport should show after a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseDirective {
    pub message: String,
    pub menu: Menu,
}

/// Sessions idle this long may be dropped
const IDLE_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Map size at which idle sessions start being dropped
const PRUNE_THRESHOLD: usize = 10_000;

struct SessionSlot {
    context: Arc<Mutex<SessionContext>>,
    last_seen: Instant,
}

/// In-memory map from session identity to its context
///
/// Each context sits behind its own lock; holding it for a whole interaction
/// is what keeps one user's messages in order. Once the map reaches its
/// threshold, sessions idle past the timeout and not in use are evicted.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, SessionSlot>>,
    idle_timeout: Duration,
    prune_threshold: usize,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_limits(IDLE_TIMEOUT, PRUNE_THRESHOLD)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(idle_timeout: Duration, prune_threshold: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_timeout,
            prune_threshold,
        }
    }

    /// Get the session slot, creating an empty context on first contact
    pub fn get_or_create(&self, session_id: &str) -> Arc<Mutex<SessionContext>> {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();

        if !sessions.contains_key(session_id) && sessions.len() >= self.prune_threshold {
            let before = sessions.len();
            sessions.retain(|_, slot| {
                Arc::strong_count(&slot.context) > 1
                    || now.duration_since(slot.last_seen) < self.idle_timeout
            });
            tracing::info!(evicted = before - sessions.len(), "Pruned idle sessions");
        }

        let slot = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| SessionSlot {
                context: Arc::new(Mutex::new(SessionContext::default())),
                last_seen: now,
            });
        slot.last_seen = now;
        Arc::clone(&slot.context)
    }

    /// Copy of a session's current context, if it has ever interacted
    #[allow(dead_code)] // Diagnostics
    pub fn snapshot(&self, session_id: &str) -> Option<SessionContext> {
        let slot = {
            let sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
            sessions.get(session_id).map(|slot| Arc::clone(&slot.context))
        }?;
        let session = slot.lock().unwrap_or_else(PoisonError::into_inner);
        Some(session.clone())
    }
}

/// Conversation controller: session store plus ledger
pub struct Runtime<S: LedgerStore> {
    store: S,
    locale: Locale,
    vocabulary: Vocabulary,
    sessions: SessionStore,
}

/// Runtime backed by the SQLite ledger
pub type ProductionRuntime = Runtime<crate::db::Database>;

impl<S: LedgerStore> Runtime<S> {
    pub fn new(store: S, locale: Locale) -> Self {
        Self {
            store,
            locale,
            vocabulary: locale.vocabulary(),
            sessions: SessionStore::new(),
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    #[allow(dead_code)] // Diagnostics
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Handle one text message from `session_id`.
    ///
    /// Never fails: storage errors and panics become a generic error reply,
    /// and only that interaction is affected.
    pub fn handle(&self, session_id: &str, text: &str) -> ResponseDirective {
        let slot = self.sessions.get_or_create(session_id);
        let mut session = slot.lock().unwrap_or_else(PoisonError::into_inner);
        let event = Event::user_message(text, &self.vocabulary);

        tracing::debug!(
            session_id = %session_id,
            pending = ?session.pending_action,
            event = ?event,
            "Handling message"
        );

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            run_interaction(&self.store, &session, event)
        }));

        let reply = match result {
            Ok(Ok((new_session, reply))) => {
                *session = new_session;
                reply
            }
            Ok(Err(e)) => {
                tracing::error!(session_id = %session_id, error = %e, "Interaction failed");
                Reply {
                    notice: Notice::UnexpectedError,
                    menu: Menu::None,
                }
            }
            Err(_) => {
                tracing::error!(session_id = %session_id, "Interaction panicked, session reset");
                *session = SessionContext::cleared();
                Reply {
                    notice: Notice::UnexpectedError,
                    menu: Menu::Main,
                }
            }
        };

        self.render(&reply)
    }

    /// The `/start` command
    pub fn start(&self, session_id: &str) -> ResponseDirective {
        self.handle(session_id, "/start")
    }

    fn render(&self, reply: &Reply) -> ResponseDirective {
        ResponseDirective {
            message: self.locale.render(&reply.notice),
            menu: reply.menu.clone(),
        }
    }
}
