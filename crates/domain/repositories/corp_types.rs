use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::corp_types::CorpTypeEntity;

#[automock]
#[async_trait]
pub trait CorpTypeRepository {
    async fn find_by_batch_type(&self, batch_type: String) -> Result<Vec<CorpTypeEntity>>;
}
