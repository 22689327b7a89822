//! Configuration for the around service
use resilience::Deadline;
use s3_utils::S3Config;
use serde::Deserialize;

/// Main configuration struct, loaded from environment variables
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    // ============================================
    // Search engine
    // ============================================
    #[serde(default = "default_elasticsearch_url")]
    pub elasticsearch_url: String,

    #[serde(default = "default_post_index")]
    pub post_index: String,

    #[serde(default = "default_user_index")]
    pub user_index: String,

    /// Page size for post searches
    #[serde(default = "default_search_max_hits")]
    pub search_max_hits: i64,

    // ============================================
    // Media storage
    // ============================================
    #[serde(default = "default_s3_bucket")]
    pub s3_bucket: String,

    #[serde(default = "default_aws_region")]
    pub aws_region: String,

    /// Custom endpoint (MinIO, LocalStack)
    #[serde(default)]
    pub s3_endpoint: Option<String>,

    /// CDN or public host serving the bucket
    #[serde(default)]
    pub s3_public_base_url: Option<String>,

    #[serde(default)]
    pub s3_path_style: bool,

    /// Largest accepted media part in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    // ============================================
    // Face classifier
    // ============================================
    #[serde(default = "default_prediction_project")]
    pub prediction_project: String,

    #[serde(default = "default_prediction_model")]
    pub prediction_model: String,

    /// Full endpoint override, takes precedence over project/model
    #[serde(default)]
    pub prediction_url: Option<String>,

    /// Send an Application Default Credentials bearer token
    #[serde(default = "default_true")]
    pub prediction_use_adc: bool,

    // ============================================
    // Auth
    // ============================================
    pub jwt_secret: String,

    // ============================================
    // Deadlines (unset or 0 = unbounded)
    // ============================================
    #[serde(default)]
    pub media_store_timeout_ms: Option<u64>,

    #[serde(default)]
    pub annotation_timeout_ms: Option<u64>,

    #[serde(default)]
    pub search_index_timeout_ms: Option<u64>,

    /// `json` switches log output to JSON lines
    #[serde(default)]
    pub log_format: Option<String>,
}

/// Deadline per external boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallDeadlines {
    pub media_store: Deadline,
    pub annotation: Deadline,
    pub search_index: Deadline,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_elasticsearch_url() -> String {
    "http://localhost:9200".to_string()
}

fn default_post_index() -> String {
    "post".to_string()
}

fn default_user_index() -> String {
    "user".to_string()
}

fn default_search_max_hits() -> i64 {
    10
}

fn default_s3_bucket() -> String {
    "my-post-images".to_string()
}

fn default_aws_region() -> String {
    "us-east-1".to_string()
}

fn default_max_upload_bytes() -> usize {
    32 * 1024 * 1024 // 32 MiB
}

fn default_prediction_project() -> String {
    "around".to_string()
}

fn default_prediction_model() -> String {
    "face_model".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    pub fn deadlines(&self) -> CallDeadlines {
        CallDeadlines {
            media_store: Deadline::from_millis(self.media_store_timeout_ms),
            annotation: Deadline::from_millis(self.annotation_timeout_ms),
            search_index: Deadline::from_millis(self.search_index_timeout_ms),
        }
    }

    pub fn prediction_endpoint(&self) -> String {
        match &self.prediction_url {
            Some(url) if !url.is_empty() => url.clone(),
            _ => format!(
                "https://ml.googleapis.com/v1/projects/{}/models/{}:predict",
                self.prediction_project, self.prediction_model
            ),
        }
    }

    pub fn s3_config(&self) -> S3Config {
        S3Config {
            endpoint: self.s3_endpoint.clone(),
            public_base_url: self.s3_public_base_url.clone(),
            path_style: self.s3_path_style,
            ..S3Config::new(self.s3_bucket.clone(), self.aws_region.clone())
        }
    }

    pub fn json_logs(&self) -> bool {
        self.log_format
            .as_deref()
            .is_some_and(|format| format.eq_ignore_ascii_case("json"))
    }
}
