use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::distribution_codes::DistributionCodeEntity;

#[automock]
#[async_trait]
pub trait DistributionCodeRepository {
    async fn find_by_id(
        &self,
        distribution_code_id: i64,
    ) -> Result<Option<DistributionCodeEntity>>;
}
