//! Face-score classification through a hosted prediction endpoint
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use gcp_auth::TokenProvider;
use reqwest::Client;
use resilience::TimeoutError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

const PREDICTION_SCOPES: &[&str] = &["https://www.googleapis.com/auth/cloud-platform"];

#[derive(Debug, Error)]
pub enum AnnotationError {
    /// The endpoint answered but produced no usable prediction.
    #[error("Prediction response is empty")]
    Empty,

    #[error("Prediction endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Prediction request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode prediction response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Failed to obtain access token: {0}")]
    Auth(#[from] gcp_auth::Error),

    #[error("Prediction call timed out: {0}")]
    Timeout(#[from] TimeoutError),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Annotator: Send + Sync {
    /// Confidence in [0, 1] that the image shows a face.
    async fn classify(&self, image: Bytes) -> Result<f64, AnnotationError>;
}

/// How requests to the prediction endpoint are authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// Application Default Credentials bearer token
    Adc,
    /// No Authorization header (local model servers, tests)
    Anonymous,
}

// ============================================
// Wire types
// ============================================

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    instances: [Instance<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Instance<'a> {
    image_bytes: ImageBytes,
    key: &'a str,
}

#[derive(Debug, Serialize)]
struct ImageBytes {
    b64: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct PredictResponse {
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct Prediction {
    scores: Vec<f64>,
}

/// Client for the hosted face classifier.
pub struct PredictionClient {
    client: Client,
    endpoint: String,
    auth_mode: AuthMode,
    token_provider: Arc<RwLock<Option<Arc<dyn TokenProvider>>>>,
}

impl PredictionClient {
    pub fn new(endpoint: impl Into<String>, auth_mode: AuthMode) -> Result<Self, AnnotationError> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            auth_mode,
            token_provider: Arc::new(RwLock::new(None)),
        })
    }

    async fn access_token(&self) -> Result<String, AnnotationError> {
        let mut provider_guard = self.token_provider.write().await;

        let provider = match provider_guard.as_ref() {
            Some(provider) => provider.clone(),
            None => {
                let provider = gcp_auth::provider().await?;
                *provider_guard = Some(provider.clone());
                provider
            }
        };

        let token = provider.token(PREDICTION_SCOPES).await?;
        Ok(token.as_str().to_string())
    }

    fn encode_request(image: &[u8]) -> Result<Vec<u8>, AnnotationError> {
        let request = PredictRequest {
            instances: [Instance {
                image_bytes: ImageBytes {
                    b64: STANDARD.encode(image),
                },
                key: "1",
            }],
        };
        Ok(serde_json::to_vec(&request)?)
    }

    fn parse_score(body: &[u8]) -> Result<f64, AnnotationError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(AnnotationError::Empty);
        }

        let response: PredictResponse = serde_json::from_slice(body)?;
        response
            .predictions
            .first()
            .and_then(|prediction| prediction.scores.first())
            .copied()
            .ok_or(AnnotationError::Empty)
    }
}

#[async_trait]
impl Annotator for PredictionClient {
    async fn classify(&self, image: Bytes) -> Result<f64, AnnotationError> {
        let payload = Self::encode_request(&image)?;
        debug!(endpoint = %self.endpoint, image_bytes = image.len(), "Sending prediction request");

        let mut request = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(payload);

        if self.auth_mode == AuthMode::Adc {
            let token = self.access_token().await?;
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Prediction endpoint error");
            return Err(AnnotationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        let score = Self::parse_score(&body)?;
        info!(score, "Received face score");
        Ok(score)
    }
}
