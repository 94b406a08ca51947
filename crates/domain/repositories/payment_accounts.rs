use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::payment_accounts::PaymentAccountEntity;

#[automock]
#[async_trait]
pub trait PaymentAccountRepository {
    /// EFT accounts that receive monthly statements.
    async fn find_monthly_eft_accounts(&self) -> Result<Vec<PaymentAccountEntity>>;
}
