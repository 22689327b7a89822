//! In-memory stand-ins for the external systems, shared by unit and HTTP
//! tests.
use crate::config::CallDeadlines;
use crate::handlers;
use crate::services::annotation::{AnnotationError, Annotator};
use crate::services::media_store::{MediaStore, StorageError};
use crate::services::search_index::{Collection, Predicate, SearchIndex, SearchIndexError};
use crate::state::AppState;
use actix_web::web;
use async_trait::async_trait;
use bytes::Bytes;
use crypto_core::JwtKeys;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// Great-circle distance in meters.
pub fn haversine_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_METERS * a.sqrt().asin()
}

fn matches(document: &Value, predicate: &Predicate) -> bool {
    match predicate {
        Predicate::GeoRadius {
            field,
            center,
            radius,
        } => {
            let point = &document[field.as_str()];
            match (point["lat"].as_f64(), point["lon"].as_f64()) {
                (Some(lat), Some(lon)) => {
                    haversine_meters(center.lat, center.lon, lat, lon) <= radius.meters()
                }
                _ => false,
            }
        }
        Predicate::Range { field, gte } => document[field.as_str()]
            .as_f64()
            .is_some_and(|value| value >= *gte),
        Predicate::Term { field, value } => document[field.as_str()].as_str() == Some(value.as_str()),
    }
}

/// Search index evaluating predicates over documents held in memory.
#[derive(Default)]
pub struct InMemorySearchIndex {
    collections: Mutex<HashMap<Collection, BTreeMap<String, Value>>>,
    failing_writes: AtomicBool,
    failing_queries: AtomicBool,
}

impl InMemorySearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.failing_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_queries(&self, fail: bool) {
        self.failing_queries.store(fail, Ordering::SeqCst);
    }

    /// Every stored document of `collection`, ordered by id.
    pub fn documents(&self, collection: Collection) -> Vec<Value> {
        self.collections
            .lock()
            .map(|collections| {
                collections
                    .get(&collection)
                    .map(|docs| docs.values().cloned().collect())
                    .unwrap_or_default()
            })
            .unwrap_or_default()
    }

    pub fn get(&self, collection: Collection, id: &str) -> Option<Value> {
        self.collections
            .lock()
            .ok()?
            .get(&collection)?
            .get(id)
            .cloned()
    }
}

fn poisoned<T>(_: T) -> SearchIndexError {
    SearchIndexError::Unavailable("in-memory index lock poisoned".into())
}

#[async_trait]
impl SearchIndex for InMemorySearchIndex {
    async fn ensure_collections(&self) -> Result<(), SearchIndexError> {
        let mut collections = self.collections.lock().map_err(poisoned)?;
        collections.entry(Collection::Posts).or_default();
        collections.entry(Collection::Users).or_default();
        Ok(())
    }

    async fn write(
        &self,
        collection: Collection,
        id: &str,
        document: Value,
    ) -> Result<(), SearchIndexError> {
        if self.failing_writes.load(Ordering::SeqCst) {
            return Err(SearchIndexError::Unavailable("writes disabled".into()));
        }
        self.collections
            .lock()
            .map_err(poisoned)?
            .entry(collection)
            .or_default()
            .insert(id.to_string(), document);
        Ok(())
    }

    async fn query(
        &self,
        collection: Collection,
        predicate: &Predicate,
    ) -> Result<Vec<Value>, SearchIndexError> {
        if self.failing_queries.load(Ordering::SeqCst) {
            return Err(SearchIndexError::Unavailable("queries disabled".into()));
        }
        let collections = self.collections.lock().map_err(poisoned)?;
        Ok(collections
            .get(&collection)
            .map(|docs| {
                docs.values()
                    .filter(|doc| matches(doc, predicate))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn ping(&self) -> Result<(), SearchIndexError> {
        if self.failing_queries.load(Ordering::SeqCst) {
            return Err(SearchIndexError::Unavailable("queries disabled".into()));
        }
        Ok(())
    }
}

/// Media store keeping uploaded objects in memory.
#[derive(Default)]
pub struct InMemoryMediaStore {
    objects: Mutex<HashMap<String, Bytes>>,
    failing: AtomicBool,
}

impl InMemoryMediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_uploads(&self, fail: bool) {
        self.failing.store(fail, Ordering::SeqCst);
    }

    pub fn object(&self, name: &str) -> Option<Bytes> {
        self.objects.lock().ok()?.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().map(|objects| objects.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl MediaStore for InMemoryMediaStore {
    async fn upload(
        &self,
        name: &str,
        data: Bytes,
        _content_type: &str,
    ) -> Result<String, StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("uploads disabled".into()));
        }
        self.objects
            .lock()
            .map_err(|_| StorageError::Unavailable("in-memory store lock poisoned".into()))?
            .insert(name.to_string(), data);
        Ok(format!("https://media.test/{name}"))
    }
}

#[derive(Debug, Clone, Copy)]
enum Script {
    Score(f64),
    Empty,
}

/// Annotator answering with a fixed outcome and counting calls.
pub struct ScriptedAnnotator {
    script: Script,
    calls: AtomicUsize,
}

impl ScriptedAnnotator {
    pub fn score(score: f64) -> Self {
        Self {
            script: Script::Score(score),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always fails the way an empty prediction response does.
    pub fn empty() -> Self {
        Self {
            script: Script::Empty,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Annotator for ScriptedAnnotator {
    async fn classify(&self, _image: Bytes) -> Result<f64, AnnotationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.script {
            Script::Score(score) => Ok(score),
            Script::Empty => Err(AnnotationError::Empty),
        }
    }
}

pub const TEST_JWT_SECRET: &[u8] = b"around-test-secret";

/// Application state over in-memory fakes, with handles to inspect them.
pub struct TestHarness {
    pub index: Arc<InMemorySearchIndex>,
    pub media: Arc<InMemoryMediaStore>,
    pub annotator: Arc<ScriptedAnnotator>,
    pub jwt: JwtKeys,
    pub state: AppState,
}

impl TestHarness {
    pub fn new(annotator: ScriptedAnnotator) -> Self {
        let index = Arc::new(InMemorySearchIndex::new());
        let media = Arc::new(InMemoryMediaStore::new());
        let annotator = Arc::new(annotator);
        let jwt = match JwtKeys::from_secret(TEST_JWT_SECRET) {
            Ok(keys) => keys,
            Err(e) => panic!("test secret rejected: {e}"),
        };

        let state = AppState::new(
            media.clone(),
            annotator.clone(),
            index.clone(),
            jwt.clone(),
            CallDeadlines::default(),
            1024 * 1024,
        );

        Self {
            index,
            media,
            annotator,
            jwt,
            state,
        }
    }

    /// Route configuration for `App::configure`.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.state.clone()));
        handlers::configure(cfg, &self.jwt);
    }
}
