use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;

use crate::domain::entities::invoices::InvoiceEntity;
use crate::domain::entities::payment_line_items::PaymentLineItemEntity;

#[automock]
#[async_trait]
pub trait InvoiceRepository {
    /// PAID invoices for the partner that have not been disbursed yet
    /// (no disbursement status, or a previous attempt ERRORED).
    async fn find_disbursable_by_corp_type(
        &self,
        corp_type_code: String,
    ) -> Result<Vec<InvoiceEntity>>;

    async fn find_line_items(&self, invoice_ids: Vec<i64>)
        -> Result<Vec<PaymentLineItemEntity>>;

    /// Bulk-flips unpaid EFT invoices whose overdue date falls before the
    /// cutoff to OVERDUE. One update, one commit.
    async fn mark_eft_invoices_overdue(&self, cutoff: DateTime<Utc>) -> Result<usize>;
}
