use crate::config::CallDeadlines;
use crate::services::{
    Annotator, MediaStore, PostIngestionPipeline, QueryTranslator, SearchIndex, UserDirectory,
};
use crypto_core::JwtKeys;
use std::sync::Arc;

/// Shared per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: PostIngestionPipeline,
    pub queries: QueryTranslator,
    pub users: UserDirectory,
    pub index: Arc<dyn SearchIndex>,
    pub jwt: JwtKeys,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        media: Arc<dyn MediaStore>,
        annotator: Arc<dyn Annotator>,
        index: Arc<dyn SearchIndex>,
        jwt: JwtKeys,
        deadlines: CallDeadlines,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            pipeline: PostIngestionPipeline::new(media, annotator, index.clone(), deadlines),
            queries: QueryTranslator::new(index.clone(), deadlines.search_index),
            users: UserDirectory::new(index.clone(), deadlines.search_index),
            index,
            jwt,
            max_upload_bytes,
        }
    }
}
