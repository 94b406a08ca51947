use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Accounting batch classification: internal-ministry partners settle on
/// "GI" batches, external-ministry partners on "GA".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EjvBatchType {
    Internal,
    External,
}

impl EjvBatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EjvBatchType::Internal => "GI",
            EjvBatchType::External => "GA",
        }
    }

    pub fn all() -> [EjvBatchType; 2] {
        [EjvBatchType::Internal, EjvBatchType::External]
    }
}

impl Display for EjvBatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
