use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::non_sufficient_funds::InsertNonSufficientFundsEntity;

#[automock]
#[async_trait]
pub trait NonSufficientFundsRepository {
    async fn create_rows(&self, rows: Vec<InsertNonSufficientFundsEntity>) -> Result<()>;
}
