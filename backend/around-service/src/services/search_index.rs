/// Search index abstraction: two collections, structured predicates,
/// typed decoding of hits.
use crate::models::Location;
use async_trait::async_trait;
use resilience::TimeoutError;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::fmt;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum SearchIndexError {
    #[error("Invalid search engine URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to build search transport: {0}")]
    TransportBuild(#[from] elasticsearch::http::transport::BuildError),

    #[error("Search engine request failed: {0}")]
    Transport(#[from] elasticsearch::Error),

    #[error("Search engine returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to encode document: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Search index call timed out: {0}")]
    Timeout(#[from] TimeoutError),

    #[error("Search index unavailable: {0}")]
    Unavailable(String),
}

/// Logical collections kept in the search engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Posts,
    Users,
}

/// Radius for geo queries, rendered with its unit (`200km`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distance {
    kilometers: f64,
}

impl Distance {
    pub fn km(kilometers: f64) -> Self {
        Self { kilometers }
    }

    pub fn kilometers(&self) -> f64 {
        self.kilometers
    }

    pub fn meters(&self) -> f64 {
        self.kilometers * 1000.0
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}km", self.kilometers)
    }
}

/// Structured search predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Documents whose geo field lies within `radius` of `center`.
    GeoRadius {
        field: String,
        center: Location,
        radius: Distance,
    },
    /// Documents whose numeric field is `>= gte`.
    Range { field: String, gte: f64 },
    /// Documents whose keyword field equals `value`.
    Term { field: String, value: String },
}

impl Predicate {
    /// Query DSL body for this predicate.
    pub fn to_query(&self) -> Value {
        match self {
            Predicate::GeoRadius {
                field,
                center,
                radius,
            } => json!({
                "geo_distance": {
                    "distance": radius.to_string(),
                    field.as_str(): { "lat": center.lat, "lon": center.lon }
                }
            }),
            Predicate::Range { field, gte } => json!({
                "range": { field.as_str(): { "gte": gte } }
            }),
            Predicate::Term { field, value } => json!({
                "term": { field.as_str(): value }
            }),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Create any missing collection with its mapping. Safe to call repeatedly.
    async fn ensure_collections(&self) -> Result<(), SearchIndexError>;

    /// Upsert `document` under `id`; visible to queries once this returns.
    async fn write(
        &self,
        collection: Collection,
        id: &str,
        document: Value,
    ) -> Result<(), SearchIndexError>;

    /// Raw `_source` of every hit.
    async fn query(
        &self,
        collection: Collection,
        predicate: &Predicate,
    ) -> Result<Vec<Value>, SearchIndexError>;

    async fn ping(&self) -> Result<(), SearchIndexError>;
}

/// Decode hits into `T`, skipping documents that do not fit.
pub fn decode_hits<T: DeserializeOwned>(collection: Collection, hits: Vec<Value>) -> Vec<T> {
    hits.into_iter()
        .filter_map(|hit| match serde_json::from_value::<T>(hit) {
            Ok(doc) => Some(doc),
            Err(e) => {
                warn!(?collection, error = %e, "Skipping malformed search hit");
                None
            }
        })
        .collect()
}
