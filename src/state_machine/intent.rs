//! Intent classification
//!
//! Menu labels are display strings; the state machine only ever sees the
//! [`Intent`] they resolve to.

use serde::{Deserialize, Serialize};

/// What the user asked for, independent of how the button was labelled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// `/start` command
    Start,
    Back,
    MainMenu,
    AddName,
    ListAll,
    NewDebt,
    Payment,
    Status,
    Delete,
    /// Anything else: a debtor name, an amount, or noise
    Text,
}

/// Menu labels for one locale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    pub main_menu: String,
    pub add_name: String,
    pub list_all: String,
    pub new_debt: String,
    pub payment: String,
    pub status: String,
    pub delete: String,
    pub back: String,
}

impl Vocabulary {
    /// Resolve raw input to an intent. Labels match exactly after trimming.
    pub fn classify(&self, text: &str) -> Intent {
        let text = text.trim();
        match text {
            "/start" => return Intent::Start,
            "/back" => return Intent::Back,
            _ => {}
        }

        [
            (&self.back, Intent::Back),
            (&self.main_menu, Intent::MainMenu),
            (&self.add_name, Intent::AddName),
            (&self.list_all, Intent::ListAll),
            (&self.new_debt, Intent::NewDebt),
            (&self.payment, Intent::Payment),
            (&self.status, Intent::Status),
            (&self.delete, Intent::Delete),
        ]
        .into_iter()
        .find(|(label, _)| label.as_str() == text)
        .map_or(Intent::Text, |(_, intent)| intent)
    }
}
