/// S3 configuration for the media bucket
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Config {
    /// S3 bucket name
    pub bucket: String,
    /// AWS region
    pub region: String,
    /// Custom endpoint (MinIO, LocalStack); `None` uses the AWS default
    pub endpoint: Option<String>,
    /// Base URL for public access; overrides the derived bucket URL
    pub public_base_url: Option<String>,
    /// Whether to use path-style URLs (false = virtual-hosted-style)
    pub path_style: bool,
}

impl S3Config {
    pub fn new(bucket: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            region: region.into(),
            endpoint: None,
            public_base_url: None,
            path_style: false,
        }
    }

    /// Stable public URL of an object.
    ///
    /// Objects are written with a public-read ACL, so this URL is directly
    /// retrievable without signing.
    pub fn object_url(&self, key: &str) -> String {
        if let Some(base) = &self.public_base_url {
            return format!("{}/{}", base.trim_end_matches('/'), key);
        }

        match (&self.endpoint, self.path_style) {
            (Some(endpoint), true) => {
                format!("{}/{}/{}", endpoint.trim_end_matches('/'), self.bucket, key)
            }
            _ => format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            ),
        }
    }
}
