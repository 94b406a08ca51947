use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentMethod {
    Eft,
    DirectPay,
    Drawdown,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Eft => "EFT",
            PaymentMethod::DirectPay => "DIRECT_PAY",
            PaymentMethod::Drawdown => "DRAWDOWN",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "EFT" => Some(PaymentMethod::Eft),
            "DIRECT_PAY" => Some(PaymentMethod::DirectPay),
            "DRAWDOWN" => Some(PaymentMethod::Drawdown),
            _ => None,
        }
    }
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
