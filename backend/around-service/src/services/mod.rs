/// External-system adapters and the orchestration built on them
pub mod annotation;
pub mod elasticsearch;
pub mod media_store;
pub mod pipeline;
pub mod query;
pub mod search_index;
pub mod users;

pub use annotation::{AnnotationError, Annotator, AuthMode, PredictionClient};
pub use elasticsearch::{ElasticsearchIndex, IndexNames};
pub use media_store::{MediaStore, S3MediaStore, StorageError};
pub use pipeline::{IngestError, MediaUpload, PostForm, PostIngestionPipeline};
pub use query::QueryTranslator;
pub use search_index::{Collection, Predicate, SearchIndex, SearchIndexError};
pub use users::{AuthError, UserDirectory, UserError};
