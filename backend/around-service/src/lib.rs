//! Around: location-tagged media posts.
//!
//! Posts are ingested through [`services::PostIngestionPipeline`] (media
//! store, face annotation, search index) and found again through
//! [`services::QueryTranslator`] by geo radius or face-score threshold.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod validators;

pub use config::{CallDeadlines, Config};
pub use error::{AppError, Result};
pub use state::AppState;
