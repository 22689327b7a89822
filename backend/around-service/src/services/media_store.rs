/// Durable storage for uploaded media
use async_trait::async_trait;
use bytes::Bytes;
use resilience::TimeoutError;
use s3_utils::{S3Error, S3Operations};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    S3(#[from] S3Error),

    #[error("Media upload timed out: {0}")]
    Timeout(#[from] TimeoutError),

    #[error("Media store unavailable: {0}")]
    Unavailable(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store `data` as a publicly readable object named `name` and return
    /// its retrieval URL.
    async fn upload(
        &self,
        name: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<String, StorageError>;
}

pub struct S3MediaStore {
    operations: S3Operations,
}

impl S3MediaStore {
    pub fn new(operations: S3Operations) -> Self {
        Self { operations }
    }
}

#[async_trait]
impl MediaStore for S3MediaStore {
    async fn upload(
        &self,
        name: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<String, StorageError> {
        Ok(self
            .operations
            .upload_public(name, data, content_type)
            .await?)
    }
}
