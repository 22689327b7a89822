/// Shared S3 utilities for Around services
///
/// Provides the AWS S3 client wrapper, bucket configuration, and the object
/// operations used for media storage.

use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::Client;
use std::sync::Arc;

pub mod config;
pub mod operations;

pub use config::S3Config;
pub use operations::{S3Error, S3Operations};

/// Shared S3 client wrapper
#[derive(Clone)]
pub struct S3Client {
    client: Arc<Client>,
    config: S3Config,
}

impl S3Client {
    /// Create a client from bucket configuration; credentials come from the
    /// standard AWS provider chain.
    pub async fn with_config(config: S3Config) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }
        builder = builder.force_path_style(config.path_style);

        Self {
            client: Arc::new(Client::from_conf(builder.build())),
            config,
        }
    }

    /// Get reference to underlying AWS S3 client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Get S3 configuration
    pub fn config(&self) -> &S3Config {
        &self.config
    }

    /// Object operations bound to this client's bucket
    pub fn operations(&self) -> S3Operations {
        S3Operations::new(self.client.clone(), self.config.clone())
    }
}
