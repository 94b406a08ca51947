use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::enums::statement_due_actions::StatementDueAction;

/// Payload published when a statement needs a due/overdue/reminder
/// notification sent to the account's recipients.
#[derive(Debug, Clone, Serialize)]
pub struct StatementNotificationInfo {
    pub auth_account_id: String,
    pub statement_id: i64,
    pub action: StatementDueAction,
    pub due_date: NaiveDate,
    pub emails: Vec<String>,
    pub total_amount_owing: Decimal,
}

/// Payload published to the account-management queue when an overdue
/// statement locks the account.
#[derive(Debug, Clone, Serialize)]
pub struct LockAccountEvent {
    pub auth_account_id: String,
    pub payment_method: String,
    pub outstanding_amount: Decimal,
    pub original_amount: Decimal,
    pub amount: Decimal,
}
