//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across arbitrary message sequences.

use super::*;
use crate::db::Database;
use crate::locale::Locale;
use crate::runtime::run_interaction;
use proptest::prelude::*;
use rust_decimal::Decimal;

// ============================================================================
// Test Helpers
// ============================================================================

fn vocabulary() -> Vocabulary {
    Locale::English.vocabulary()
}

fn send(db: &Database, session: &SessionContext, text: &str) -> (SessionContext, Reply) {
    let event = Event::user_message(text, &vocabulary());
    run_interaction(db, session, event).expect("interaction should not fail on a healthy ledger")
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_name() -> impl Strategy<Value = String> {
    prop_oneof![Just("Ali".to_string()), Just("Sara".to_string()), "[a-z]{1,6}"]
}

fn arb_amount_text() -> impl Strategy<Value = String> {
    prop_oneof![
        (1u32..500).prop_map(|n| n.to_string()),
        (1u32..500, 1u32..99).prop_map(|(a, b)| format!("{a}.{b}")),
        Just("٢٥".to_string()),
        Just("0".to_string()),
        Just("-5".to_string()),
        Just("abc".to_string()),
    ]
}

fn arb_label() -> impl Strategy<Value = String> {
    let v = vocabulary();
    prop_oneof![
        Just(v.main_menu),
        Just(v.add_name),
        Just(v.list_all),
        Just(v.new_debt),
        Just(v.payment),
        Just(v.status),
        Just(v.delete),
        Just(v.back),
        Just("/start".to_string()),
    ]
}

fn arb_message() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => arb_label(),
        2 => arb_name(),
        2 => arb_amount_text(),
        1 => Just("   ".to_string()),
    ]
}

fn arb_session() -> impl Strategy<Value = SessionContext> {
    prop_oneof![
        Just(SessionContext::cleared()),
        Just(SessionContext::awaiting_new_name()),
        arb_name().prop_map(SessionContext::awaiting_initial_amount),
        arb_name().prop_map(SessionContext::selected),
        arb_name().prop_map(|n| {
            SessionContext::selected(n).with_pending(PendingAction::AwaitingNewDebtAmount)
        }),
        arb_name().prop_map(|n| {
            SessionContext::selected(n).with_pending(PendingAction::AwaitingPaymentAmount)
        }),
    ]
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every session reached by real messages is structurally valid, and
    /// every stored record keeps 0 <= paid <= total.
    #[test]
    fn prop_conversations_preserve_invariants(
        messages in proptest::collection::vec(arb_message(), 0..30)
    ) {
        let db = Database::open_in_memory().unwrap();
        let mut session = SessionContext::cleared();

        for text in &messages {
            let (next, _reply) = send(&db, &session, text);
            prop_assert!(next.is_valid(), "Invalid session after {:?}: {:?}", text, next);
            session = next;

            for record in db.list_records().unwrap() {
                prop_assert!(record.is_consistent(), "Inconsistent record: {:?}", record);
            }
        }
    }

    #[test]
    fn prop_back_always_clears(session in arb_session()) {
        let event = Event::user_message(&vocabulary().back, &vocabulary());
        let result = transition(&session, event).unwrap();

        prop_assert_eq!(result.new_session, SessionContext::cleared());
        prop_assert_eq!(
            result.effects,
            vec![Effect::reply(Notice::ChooseFromMenu, Menu::Main)]
        );
    }

    /// User messages never make the transition function fail
    #[test]
    fn prop_user_messages_always_transition(session in arb_session(), text in arb_message()) {
        let event = Event::user_message(&text, &vocabulary());
        let result = transition(&session, event);
        prop_assert!(result.is_ok(), "Transition failed: {:?}", result);
        prop_assert!(result.unwrap().new_session.is_valid());
    }

    #[test]
    fn prop_duplicate_creation_leaves_record_untouched(
        name in arb_name(),
        first in 1u32..1000,
        second in 1u32..1000,
    ) {
        let db = Database::open_in_memory().unwrap();
        let v = vocabulary();

        let mut session = SessionContext::cleared();
        for text in [v.add_name.clone(), name.clone(), first.to_string()] {
            session = send(&db, &session, &text).0;
        }
        let before = db.get_record(&name).unwrap().unwrap();

        for text in [v.add_name.clone(), name.clone(), second.to_string()] {
            session = send(&db, &session, &text).0;
        }
        let after = db.get_record(&name).unwrap().unwrap();

        prop_assert_eq!(before.total, Decimal::from(first));
        prop_assert_eq!(after.total, before.total);
        prop_assert_eq!(after.paid, before.paid);
        prop_assert_eq!(session, SessionContext::cleared());
    }
}
