/// Post ingestion: media upload, face annotation, index write.
///
/// Steps run strictly in order and the first failure ends the ingestion.
/// Nothing is rolled back, so an upload followed by a failed annotation or
/// index write leaves an orphaned object in the media store.
use super::annotation::{AnnotationError, Annotator};
use super::media_store::{MediaStore, StorageError};
use super::search_index::{Collection, SearchIndex, SearchIndexError};
use crate::config::CallDeadlines;
use crate::models::{annotated_extension, file_extension, Location, MediaKind, Post};
use bytes::Bytes;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument};
use uuid::Uuid;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Media is missing from the request")]
    MediaMissing,

    #[error("Failed to store media: {0}")]
    Storage(#[source] StorageError),

    #[error("Failed to annotate media: {0}")]
    Annotation(#[source] AnnotationError),

    #[error("Failed to index post: {0}")]
    Index(#[source] SearchIndexError),
}

/// Raw text fields of a post submission.
#[derive(Debug, Clone, Default)]
pub struct PostForm {
    pub lat: String,
    pub lon: String,
    pub message: String,
}

/// Uploaded media part, fully buffered.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Unparseable or non-finite coordinates become `0.0`.
pub fn parse_coordinate(raw: &str) -> f64 {
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

#[derive(Clone)]
pub struct PostIngestionPipeline {
    media: Arc<dyn MediaStore>,
    annotator: Arc<dyn Annotator>,
    index: Arc<dyn SearchIndex>,
    deadlines: CallDeadlines,
}

impl PostIngestionPipeline {
    pub fn new(
        media: Arc<dyn MediaStore>,
        annotator: Arc<dyn Annotator>,
        index: Arc<dyn SearchIndex>,
        deadlines: CallDeadlines,
    ) -> Self {
        Self {
            media,
            annotator,
            index,
            deadlines,
        }
    }

    #[instrument(skip(self, form, media))]
    pub async fn ingest(
        &self,
        user: &str,
        form: PostForm,
        media: Option<MediaUpload>,
    ) -> Result<Uuid, IngestError> {
        let location = Location::new(parse_coordinate(&form.lat), parse_coordinate(&form.lon));
        let media = media.ok_or(IngestError::MediaMissing)?;

        let id = Uuid::new_v4();
        let name = id.to_string();
        let content_type = media
            .content_type
            .as_deref()
            .unwrap_or(DEFAULT_CONTENT_TYPE);

        let url = self
            .deadlines
            .media_store
            .run(self.media.upload(&name, media.data.clone(), content_type))
            .await
            .map_err(StorageError::from)
            .and_then(|result| result)
            .map_err(IngestError::Storage)?;
        debug!(post_id = %id, url = %url, "Media stored");

        let extension = file_extension(&media.filename);
        let kind = MediaKind::from_extension(extension);
        let face = if extension == annotated_extension() {
            self.deadlines
                .annotation
                .run(self.annotator.classify(media.data))
                .await
                .map_err(AnnotationError::from)
                .and_then(|result| result)
                .map_err(IngestError::Annotation)?
        } else {
            0.0
        };

        let post = Post {
            user: user.to_string(),
            message: form.message,
            location,
            url,
            kind,
            face,
        };
        let document = serde_json::to_value(&post)
            .map_err(|e| IngestError::Index(SearchIndexError::Serialization(e)))?;

        self.deadlines
            .search_index
            .run(self.index.write(Collection::Posts, &name, document))
            .await
            .map_err(SearchIndexError::from)
            .and_then(|result| result)
            .map_err(IngestError::Index)?;

        info!(post_id = %id, kind = ?post.kind, face = post.face, "Saved one post to the search index: {}", post.message);
        Ok(id)
    }
}
