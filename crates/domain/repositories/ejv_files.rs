use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::ejv_files::InsertEjvFileEntity;

#[automock]
#[async_trait]
pub trait EjvFileRepository {
    /// Persists one partner's disbursement batch atomically: the file
    /// record, one link per invoice, and the invoices' UPLOADED flips all
    /// commit together. Returns the new file id, which seeds the batch's
    /// control number.
    async fn commit_partner_batch(
        &self,
        file: InsertEjvFileEntity,
        invoice_ids: Vec<i64>,
    ) -> Result<i64>;
}
