use crate::error::{AppError, Result};
use crate::services::pipeline::parse_coordinate;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use std::time::Instant;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub lat: Option<String>,
    pub lon: Option<String>,
    /// Radius in kilometers
    pub range: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ClusterParams {
    pub term: Option<String>,
}

/// Empty or absent means the default radius.
fn parse_range(raw: Option<&str>) -> Result<Option<f64>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<f64>()
            .ok()
            .filter(|km| km.is_finite() && *km >= 0.0)
            .map(Some)
            .ok_or(AppError::BadRequest("Invalid range")),
    }
}

/// GET /search?lat=&lon=&range=
pub async fn search(
    state: web::Data<AppState>,
    params: web::Query<SearchParams>,
) -> Result<HttpResponse> {
    let started = Instant::now();
    let lat = parse_coordinate(params.lat.as_deref().unwrap_or_default());
    let lon = parse_coordinate(params.lon.as_deref().unwrap_or_default());
    let range = parse_range(params.range.as_deref())?;

    let posts = state
        .queries
        .search_nearby(lat, lon, range)
        .await
        .map_err(|e| AppError::dependency("Failed to read post from the search index", e))?;

    info!(lat, lon, results = posts.len(), "Query took {} ms", started.elapsed().as_millis());
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /cluster?term=
pub async fn cluster(
    state: web::Data<AppState>,
    params: web::Query<ClusterParams>,
) -> Result<HttpResponse> {
    let started = Instant::now();
    let term = params.term.as_deref().unwrap_or_default();

    let posts = state
        .queries
        .cluster(term)
        .await
        .map_err(|e| AppError::dependency("Failed to read post from the search index", e))?;

    info!(term, results = posts.len(), "Query took {} ms", started.elapsed().as_millis());
    Ok(HttpResponse::Ok().json(posts))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range(None).unwrap(), None);
        assert_eq!(parse_range(Some("")).unwrap(), None);
        assert_eq!(parse_range(Some("50")).unwrap(), Some(50.0));
        assert_eq!(parse_range(Some("1.5")).unwrap(), Some(1.5));
        assert!(parse_range(Some("far")).is_err());
        assert!(parse_range(Some("-3")).is_err());
        assert!(parse_range(Some("NaN")).is_err());
    }
}
