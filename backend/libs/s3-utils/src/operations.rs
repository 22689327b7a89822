/// S3 object operations for media upload
use crate::config::S3Config;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;
use bytes::Bytes;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum S3Error {
    #[error("bucket {bucket} is not accessible: {message}")]
    Bucket { bucket: String, message: String },
    #[error("failed to put object {key}: {message}")]
    Put { key: String, message: String },
}

#[derive(Clone)]
pub struct S3Operations {
    client: Arc<Client>,
    config: S3Config,
}

impl S3Operations {
    pub fn new(client: Arc<Client>, config: S3Config) -> Self {
        Self { client, config }
    }

    /// Verify the bucket exists and is reachable with the current credentials.
    pub async fn check_bucket(&self) -> Result<(), S3Error> {
        self.client
            .head_bucket()
            .bucket(&self.config.bucket)
            .send()
            .await
            .map_err(|e| S3Error::Bucket {
                bucket: self.config.bucket.clone(),
                message: e.to_string(),
            })?;

        Ok(())
    }

    /// Upload an object readable by anyone and return its public URL.
    ///
    /// The bucket is checked first so that a missing bucket surfaces as
    /// [`S3Error::Bucket`] rather than an opaque put failure.
    pub async fn upload_public(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<String, S3Error> {
        self.check_bucket().await?;

        let size = body.len();
        self.client
            .put_object()
            .bucket(&self.config.bucket)
            .key(key)
            .content_type(content_type)
            .acl(ObjectCannedAcl::PublicRead)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| S3Error::Put {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        let url = self.config.object_url(key);
        tracing::info!(key, size, url = %url, "object uploaded with public-read ACL");
        Ok(url)
    }
}
