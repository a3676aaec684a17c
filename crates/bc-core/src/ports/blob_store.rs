use anyhow::Result;
use async_trait::async_trait;

use crate::ids::BlobId;

/// Storage for binary block sources (images, attachments).
#[async_trait]
pub trait BlobStorePort: Send + Sync {
    /// Store `bytes` and return their content-addressed id.
    async fn put(&self, bytes: Vec<u8>) -> Result<BlobId>;

    async fn get(&self, id: &BlobId) -> Result<Option<Vec<u8>>>;
}
