use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Outcome of evaluating an account's most overdue unpaid invoice.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StatementDueAction {
    Due,
    Overdue,
    Reminder,
}

impl StatementDueAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementDueAction::Due => "DUE",
            StatementDueAction::Overdue => "OVERDUE",
            StatementDueAction::Reminder => "REMINDER",
        }
    }
}

impl Display for StatementDueAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
