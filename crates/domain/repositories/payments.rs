use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::payments::PaymentEntity;

#[automock]
#[async_trait]
pub trait PaymentRepository {
    async fn find_by_id(&self, payment_id: i64) -> Result<Option<PaymentEntity>>;
}
