use crate::state::AppState;
use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::warn;

/// GET /health
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// GET /health/ready: the search engine must answer a ping.
pub async fn ready(state: web::Data<AppState>) -> HttpResponse {
    match state.index.ping().await {
        Ok(()) => HttpResponse::Ok().json(json!({ "status": "ready" })),
        Err(e) => {
            warn!(error = %e, "Search engine is not reachable");
            HttpResponse::ServiceUnavailable().json(json!({ "status": "unavailable" }))
        }
    }
}
