//! Elasticsearch adapter against a mock cluster.
use around_service::models::Post;
use around_service::services::search_index::decode_hits;
use around_service::services::{
    Collection, ElasticsearchIndex, IndexNames, QueryTranslator, SearchIndex, SearchIndexError,
};
use serde_json::json;
use wiremock::{
    matchers::{body_partial_json, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn es_response(status: u16) -> ResponseTemplate {
    ResponseTemplate::new(status).insert_header("X-Elastic-Product", "Elasticsearch")
}

fn index_for(server: &MockServer) -> ElasticsearchIndex {
    ElasticsearchIndex::connect(&server.uri(), IndexNames::default(), 10)
        .expect("failed to build index client")
}

#[tokio::test]
async fn test_ensure_collections_creates_missing_indices() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/post"))
        .respond_with(es_response(404))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/user"))
        .respond_with(es_response(200))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/post"))
        .and(body_partial_json(json!({
            "mappings": { "properties": { "location": { "type": "geo_point" } } }
        })))
        .respond_with(es_response(200).set_body_json(json!({"acknowledged": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/user"))
        .respond_with(es_response(200))
        .expect(0)
        .mount(&server)
        .await;

    index_for(&server)
        .ensure_collections()
        .await
        .expect("ensure_collections failed");
}

#[tokio::test]
async fn test_ensure_collections_tolerates_concurrent_create() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .respond_with(es_response(404))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(es_response(400).set_body_json(json!({
            "error": { "type": "resource_already_exists_exception" },
            "status": 400
        })))
        .mount(&server)
        .await;

    index_for(&server)
        .ensure_collections()
        .await
        .expect("already-existing index should be accepted");
}

#[tokio::test]
async fn test_write_waits_for_refresh() {
    let server = MockServer::start().await;
    Mock::given(path("/post/_doc/abc-123"))
        .and(query_param("refresh", "wait_for"))
        .and(body_partial_json(json!({"user": "alice"})))
        .respond_with(es_response(201).set_body_json(json!({"result": "created"})))
        .expect(1)
        .mount(&server)
        .await;

    index_for(&server)
        .write(Collection::Posts, "abc-123", json!({"user": "alice"}))
        .await
        .expect("write failed");
}

#[tokio::test]
async fn test_write_error_status_surfaces() {
    let server = MockServer::start().await;
    Mock::given(path("/user/_doc/bob"))
        .respond_with(es_response(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let result = index_for(&server)
        .write(Collection::Users, "bob", json!({"username": "bob"}))
        .await;

    assert!(matches!(result, Err(SearchIndexError::Status { status: 500, .. })), "got {result:?}");
}

#[tokio::test]
async fn test_geo_search_sends_distance_and_decodes_hits() {
    let server = MockServer::start().await;
    Mock::given(path("/post/_search"))
        .and(body_partial_json(json!({
            "query": { "geo_distance": { "distance": "200km" } }
        })))
        .respond_with(es_response(200).set_body_json(json!({
            "took": 3,
            "hits": {
                "total": { "value": 2, "relation": "eq" },
                "hits": [
                    { "_id": "1", "_source": {
                        "user": "alice", "message": "hi",
                        "location": { "lat": 37.7749, "lon": -122.4194 },
                        "url": "https://media/1", "type": "image", "face": 0.5
                    }},
                    { "_id": "2", "_source": { "message": "missing author" } }
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let predicate = QueryTranslator::build_geo_query(37.7749, -122.4194, None);
    let hits = index_for(&server)
        .query(Collection::Posts, &predicate)
        .await
        .expect("search failed");
    assert_eq!(hits.len(), 2);

    let posts: Vec<Post> = decode_hits(Collection::Posts, hits);
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].user, "alice");
}

#[tokio::test]
async fn test_search_error_status_surfaces() {
    let server = MockServer::start().await;
    Mock::given(path("/post/_search"))
        .respond_with(es_response(400).set_body_string("parse error"))
        .mount(&server)
        .await;

    let predicate = QueryTranslator::build_threshold_query("face");
    let result = index_for(&server).query(Collection::Posts, &predicate).await;

    assert!(matches!(result, Err(SearchIndexError::Status { status: 400, .. })), "got {result:?}");
}
