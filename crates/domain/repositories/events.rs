use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::value_objects::statement_notifications::{
    LockAccountEvent, StatementNotificationInfo,
};

#[automock]
#[async_trait]
pub trait EventPublisher {
    async fn publish_statement_notification(
        &self,
        info: StatementNotificationInfo,
    ) -> Result<()>;

    async fn publish_lock_account(&self, event: LockAccountEvent) -> Result<()>;
}
