use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;

use crate::domain::entities::invoices::InvoiceEntity;
use crate::domain::entities::statements::StatementEntity;

#[automock]
#[async_trait]
pub trait StatementRepository {
    /// Latest statement for the account at the given frequency, by
    /// `to_date`.
    async fn find_most_recent_by_frequency(
        &self,
        payment_account_id: i64,
        frequency: String,
    ) -> Result<Option<StatementEntity>>;

    /// The statement's unpaid invoice with the earliest overdue date.
    async fn find_most_overdue_unpaid_invoice(
        &self,
        statement_id: i64,
    ) -> Result<Option<InvoiceEntity>>;

    async fn find_unpaid_invoices(&self, statement_id: i64) -> Result<Vec<InvoiceEntity>>;

    /// Amount still owing across the statement's unpaid invoices.
    async fn total_due(&self, statement_id: i64) -> Result<Decimal>;

    async fn find_recipient_emails(&self, payment_account_id: i64) -> Result<Vec<String>>;
}
