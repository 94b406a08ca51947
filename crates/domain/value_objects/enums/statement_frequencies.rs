use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StatementFrequency {
    Daily,
    Weekly,
    Monthly,
}

impl StatementFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementFrequency::Daily => "DAILY",
            StatementFrequency::Weekly => "WEEKLY",
            StatementFrequency::Monthly => "MONTHLY",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "DAILY" => Some(StatementFrequency::Daily),
            "WEEKLY" => Some(StatementFrequency::Weekly),
            "MONTHLY" => Some(StatementFrequency::Monthly),
            _ => None,
        }
    }
}

impl Display for StatementFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
