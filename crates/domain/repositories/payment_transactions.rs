use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::payment_transactions::{
    InsertPaymentTransactionEntity, PaymentTransactionEntity,
};

/// Finalizing methods (`complete_with_payment`, `mark_failed`) update rows
/// conditionally on `CREATED` status and report the affected-row count so a
/// caller can detect a concurrent finalization instead of double-completing.
#[automock]
#[async_trait]
pub trait PaymentTransactionRepository {
    async fn create(
        &self,
        transaction: InsertPaymentTransactionEntity,
    ) -> Result<PaymentTransactionEntity>;

    async fn find_by_id_and_payment_id(
        &self,
        transaction_id: Uuid,
        payment_id: i64,
    ) -> Result<Option<PaymentTransactionEntity>>;

    async fn find_active_by_payment_id(
        &self,
        payment_id: i64,
    ) -> Result<Option<PaymentTransactionEntity>>;

    async fn find_by_payment_id(&self, payment_id: i64)
        -> Result<Vec<PaymentTransactionEntity>>;

    /// Marks the transaction COMPLETED and its payment COMPLETED in one
    /// database transaction.
    async fn complete_with_payment(
        &self,
        transaction_id: Uuid,
        payment_id: i64,
        end_time: DateTime<Utc>,
    ) -> Result<usize>;

    async fn mark_failed(
        &self,
        transaction_id: Uuid,
        end_time: DateTime<Utc>,
        gateway_reason_code: Option<String>,
    ) -> Result<usize>;

    /// Records a transient gateway reason code without finalizing; the
    /// transaction stays CREATED and retryable.
    async fn set_gateway_reason_code(
        &self,
        transaction_id: Uuid,
        gateway_reason_code: String,
    ) -> Result<usize>;
}
