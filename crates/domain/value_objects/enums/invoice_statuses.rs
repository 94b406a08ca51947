use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum InvoiceStatus {
    Created,
    Partial,
    SettlementScheduled,
    Paid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Created => "CREATED",
            InvoiceStatus::Partial => "PARTIAL",
            InvoiceStatus::SettlementScheduled => "SETTLEMENT_SCHEDULED",
            InvoiceStatus::Paid => "PAID",
            InvoiceStatus::Overdue => "OVERDUE",
            InvoiceStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "CREATED" => Some(InvoiceStatus::Created),
            "PARTIAL" => Some(InvoiceStatus::Partial),
            "SETTLEMENT_SCHEDULED" => Some(InvoiceStatus::SettlementScheduled),
            "PAID" => Some(InvoiceStatus::Paid),
            "OVERDUE" => Some(InvoiceStatus::Overdue),
            "CANCELLED" => Some(InvoiceStatus::Cancelled),
            _ => None,
        }
    }

    /// Statuses an invoice can hold before any money has settled against it.
    pub fn unpaid() -> [InvoiceStatus; 3] {
        [
            InvoiceStatus::SettlementScheduled,
            InvoiceStatus::Partial,
            InvoiceStatus::Created,
        ]
    }
}

impl Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
