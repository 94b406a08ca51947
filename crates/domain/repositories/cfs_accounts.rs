use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::cfs_accounts::CfsAccountEntity;

#[automock]
#[async_trait]
pub trait CfsAccountRepository {
    async fn find_effective_by_account_id(
        &self,
        payment_account_id: i64,
    ) -> Result<Option<CfsAccountEntity>>;

    /// Freezes the account's settlement profile, disabling further invoice
    /// creation. Returns the number of rows updated.
    async fn freeze_by_account_id(&self, payment_account_id: i64) -> Result<usize>;
}
