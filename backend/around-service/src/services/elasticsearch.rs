use super::search_index::{Collection, Predicate, SearchIndex, SearchIndexError};
use async_trait::async_trait;
use elasticsearch::{
    http::{
        response::Response,
        transport::{SingleNodeConnectionPool, TransportBuilder},
    },
    indices::{IndicesCreateParts, IndicesExistsParts},
    params::Refresh,
    Elasticsearch, IndexParts, SearchParts,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};
use url::Url;

/// Index names backing each collection.
#[derive(Debug, Clone)]
pub struct IndexNames {
    pub posts: String,
    pub users: String,
}

impl Default for IndexNames {
    fn default() -> Self {
        Self {
            posts: "post".to_string(),
            users: "user".to_string(),
        }
    }
}

/// Elasticsearch-backed [`SearchIndex`].
#[derive(Clone)]
pub struct ElasticsearchIndex {
    client: Elasticsearch,
    names: IndexNames,
    max_hits: i64,
}

impl ElasticsearchIndex {
    pub fn connect(url: &str, names: IndexNames, max_hits: i64) -> Result<Self, SearchIndexError> {
        let parsed = Url::parse(url)?;
        let pool = SingleNodeConnectionPool::new(parsed);
        let transport = TransportBuilder::new(pool).disable_proxy().build()?;

        Ok(Self {
            client: Elasticsearch::new(transport),
            names,
            max_hits: max_hits.max(1),
        })
    }

    fn index_name(&self, collection: Collection) -> &str {
        match collection {
            Collection::Posts => &self.names.posts,
            Collection::Users => &self.names.users,
        }
    }

    fn mapping(collection: Collection) -> Value {
        match collection {
            Collection::Posts => json!({
                "mappings": {
                    "properties": {
                        "location": { "type": "geo_point" }
                    }
                }
            }),
            Collection::Users => json!({
                "mappings": {
                    "properties": {
                        "username": { "type": "keyword" }
                    }
                }
            }),
        }
    }

    async fn ensure_index(&self, collection: Collection) -> Result<(), SearchIndexError> {
        let name = self.index_name(collection);
        let exists_response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[name]))
            .send()
            .await?;

        match exists_response.status_code().as_u16() {
            200 => return Ok(()),
            404 => {}
            status => {
                return Err(SearchIndexError::Status {
                    status,
                    body: format!("index existence check for {name}"),
                })
            }
        }

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(name))
            .body(Self::mapping(collection))
            .send()
            .await?;

        let status = response.status_code();
        if status.is_success() {
            info!(index = name, "Created search index");
            return Ok(());
        }

        let body = response.text().await?;
        // Another instance created it between the check and the create.
        if body.contains("resource_already_exists_exception") {
            return Ok(());
        }
        Err(SearchIndexError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

async fn ensure_success(response: Response) -> Result<Response, SearchIndexError> {
    let status = response.status_code();
    if status.is_success() {
        Ok(response)
    } else {
        let body = response.text().await?;
        Err(SearchIndexError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl SearchIndex for ElasticsearchIndex {
    async fn ensure_collections(&self) -> Result<(), SearchIndexError> {
        self.ensure_index(Collection::Posts).await?;
        self.ensure_index(Collection::Users).await?;
        Ok(())
    }

    async fn write(
        &self,
        collection: Collection,
        id: &str,
        document: Value,
    ) -> Result<(), SearchIndexError> {
        let index = self.index_name(collection);
        let response = self
            .client
            .index(IndexParts::IndexId(index, id))
            .refresh(Refresh::WaitFor)
            .body(document)
            .send()
            .await?;

        ensure_success(response).await?;
        debug!(index, id, "Indexed document");
        Ok(())
    }

    async fn query(
        &self,
        collection: Collection,
        predicate: &Predicate,
    ) -> Result<Vec<Value>, SearchIndexError> {
        let index = self.index_name(collection);
        let body = json!({
            "size": self.max_hits,
            "query": predicate.to_query(),
        });

        let response = self
            .client
            .search(SearchParts::Index(&[index]))
            .body(body)
            .send()
            .await?;

        let search_response: SearchResponse = ensure_success(response).await?.json().await?;
        let hits: Vec<Value> = search_response
            .hits
            .hits
            .into_iter()
            .filter_map(|hit| hit.source)
            .collect();

        info!(
            index,
            took_ms = search_response.took.unwrap_or_default(),
            hits = hits.len(),
            "Query took {} ms",
            search_response.took.unwrap_or_default()
        );
        Ok(hits)
    }

    async fn ping(&self) -> Result<(), SearchIndexError> {
        let response = self.client.ping().send().await?;
        ensure_success(response).await?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    took: Option<u64>,
    hits: InnerHits,
}

#[derive(Debug, Deserialize)]
struct InnerHits {
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "_source")]
    source: Option<Value>,
}
