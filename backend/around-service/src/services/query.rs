/// Turns search requests into index predicates and decodes posts back.
use super::search_index::{decode_hits, Collection, Distance, Predicate, SearchIndex, SearchIndexError};
use crate::models::{Location, Post};
use resilience::Deadline;
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_SEARCH_RADIUS_KM: f64 = 200.0;
pub const CLUSTER_SCORE_THRESHOLD: f64 = 0.97;
pub const LOCATION_FIELD: &str = "location";

#[derive(Clone)]
pub struct QueryTranslator {
    index: Arc<dyn SearchIndex>,
    deadline: Deadline,
}

impl QueryTranslator {
    pub fn new(index: Arc<dyn SearchIndex>, deadline: Deadline) -> Self {
        Self { index, deadline }
    }

    /// Posts within `radius_km` (default 200) of the given point.
    pub fn build_geo_query(lat: f64, lon: f64, radius_km: Option<f64>) -> Predicate {
        Predicate::GeoRadius {
            field: LOCATION_FIELD.to_string(),
            center: Location::new(lat, lon),
            radius: Distance::km(radius_km.unwrap_or(DEFAULT_SEARCH_RADIUS_KM)),
        }
    }

    /// Posts whose `field` is at least the cluster threshold.
    pub fn build_threshold_query(field: &str) -> Predicate {
        Predicate::Range {
            field: field.to_string(),
            gte: CLUSTER_SCORE_THRESHOLD,
        }
    }

    pub async fn search(&self, predicate: &Predicate) -> Result<Vec<Post>, SearchIndexError> {
        debug!(?predicate, "Searching posts");
        let hits = self
            .deadline
            .run(self.index.query(Collection::Posts, predicate))
            .await??;
        Ok(decode_hits(Collection::Posts, hits))
    }

    pub async fn search_nearby(
        &self,
        lat: f64,
        lon: f64,
        radius_km: Option<f64>,
    ) -> Result<Vec<Post>, SearchIndexError> {
        self.search(&Self::build_geo_query(lat, lon, radius_km)).await
    }

    pub async fn cluster(&self, field: &str) -> Result<Vec<Post>, SearchIndexError> {
        self.search(&Self::build_threshold_query(field)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::search_index::MockSearchIndex;
    use serde_json::json;

    #[test]
    fn test_geo_query_defaults_to_200km() {
        let predicate = QueryTranslator::build_geo_query(37.7749, -122.4194, None);
        assert_eq!(
            predicate.to_query()["geo_distance"]["distance"],
            json!("200km")
        );
    }

    #[test]
    fn test_geo_query_appends_km() {
        let predicate = QueryTranslator::build_geo_query(0.0, 0.0, Some(1.5));
        match predicate {
            Predicate::GeoRadius { field, radius, .. } => {
                assert_eq!(field, "location");
                assert_eq!(radius.to_string(), "1.5km");
            }
            other => panic!("unexpected predicate {other:?}"),
        }
    }

    #[test]
    fn test_threshold_query() {
        assert_eq!(
            QueryTranslator::build_threshold_query("face"),
            Predicate::Range {
                field: "face".into(),
                gte: 0.97
            }
        );
    }

    #[tokio::test]
    async fn test_search_passes_predicate_through_and_decodes() {
        let expected = QueryTranslator::build_threshold_query("face");
        let mut index = MockSearchIndex::new();
        index
            .expect_query()
            .withf(move |collection, predicate| *collection == Collection::Posts && *predicate == expected)
            .times(1)
            .returning(|_, _| {
                Ok(vec![
                    json!({"user": "a", "location": {"lat": 0.0, "lon": 0.0}, "face": 0.98}),
                    json!({"garbage": true}),
                ])
            });

        let posts = QueryTranslator::new(Arc::new(index), Deadline::unbounded())
            .cluster("face")
            .await
            .unwrap();

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].face, 0.98);
    }

    #[tokio::test]
    async fn test_search_failure_surfaces() {
        let mut index = MockSearchIndex::new();
        index
            .expect_query()
            .returning(|_, _| Err(SearchIndexError::Unavailable("down".into())));

        let result = QueryTranslator::new(Arc::new(index), Deadline::unbounded())
            .search_nearby(1.0, 2.0, None)
            .await;

        assert!(matches!(result, Err(SearchIndexError::Unavailable(_))));
    }
}
