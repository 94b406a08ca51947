use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CfsAccountStatus {
    Active,
    Freeze,
}

impl CfsAccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CfsAccountStatus::Active => "ACTIVE",
            CfsAccountStatus::Freeze => "FREEZE",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "ACTIVE" => Some(CfsAccountStatus::Active),
            "FREEZE" => Some(CfsAccountStatus::Freeze),
            _ => None,
        }
    }
}

impl Display for CfsAccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
