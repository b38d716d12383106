//! API request and response types

use crate::runtime::ResponseDirective;
use crate::state_machine::{Menu, Vocabulary};
use serde::{Deserialize, Serialize};

/// Longest message accepted from a client, in characters
pub const MAX_TEXT_CHARS: usize = 4096;

/// Longest session id accepted from a client, in characters
pub const MAX_SESSION_ID_CHARS: usize = 128;

/// Request to deliver a chat message
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub text: String,
}

/// Response to a chat message
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub message: String,
    pub menu: Menu,
    /// Button rows to render; absent when the current keyboard stays
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyboard: Option<Vec<Vec<String>>>,
}

impl ChatResponse {
    pub fn from_directive(directive: ResponseDirective, vocabulary: &Vocabulary) -> Self {
        let keyboard = keyboard_rows(&directive.menu, vocabulary);
        Self {
            message: directive.message,
            menu: directive.menu,
            keyboard,
        }
    }
}

/// Lay out a menu as button rows
pub fn keyboard_rows(menu: &Menu, vocabulary: &Vocabulary) -> Option<Vec<Vec<String>>> {
    let v = vocabulary;
    match menu {
        Menu::Main => Some(vec![
            vec![v.main_menu.clone()],
            vec![v.add_name.clone(), v.list_all.clone()],
        ]),
        Menu::NameList(names) => {
            let mut rows: Vec<Vec<String>> = names.iter().map(|n| vec![n.clone()]).collect();
            rows.push(vec![v.back.clone()]);
            Some(rows)
        }
        Menu::DebtorActions => Some(vec![
            vec![v.new_debt.clone(), v.payment.clone()],
            vec![v.status.clone(), v.delete.clone()],
            vec![v.back.clone()],
        ]),
        Menu::None => None,
    }
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
