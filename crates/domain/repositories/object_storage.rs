use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use mockall::automock;

#[automock]
#[async_trait]
pub trait ObjectStorage {
    async fn put(&self, file_name: String, content: Bytes) -> Result<()>;
}
