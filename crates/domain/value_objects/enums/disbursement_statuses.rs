use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DisbursementStatus {
    Uploaded,
    Errored,
}

impl DisbursementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisbursementStatus::Uploaded => "UPLOADED",
            DisbursementStatus::Errored => "ERRORED",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "UPLOADED" => Some(DisbursementStatus::Uploaded),
            "ERRORED" => Some(DisbursementStatus::Errored),
            _ => None,
        }
    }
}

impl Display for DisbursementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
