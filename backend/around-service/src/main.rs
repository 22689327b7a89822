//! Around service - HTTP entry point
//!
//! Wires the S3 media store, the face prediction client and the
//! Elasticsearch index into the actix-web routes.

use actix_middleware::{Logging, PermissiveCors};
use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use around_service::handlers;
use around_service::services::{
    AuthMode, ElasticsearchIndex, IndexNames, PredictionClient, S3MediaStore, SearchIndex,
};
use around_service::{AppState, Config};
use crypto_core::JwtKeys;
use s3_utils::S3Client;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "around_service=debug,actix_web=info,info".into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("Failed to load configuration")?;
    init_tracing(config.json_logs());

    info!(
        host = %config.host,
        port = config.port,
        elasticsearch = %config.elasticsearch_url,
        bucket = %config.s3_bucket,
        "Starting around-service"
    );

    let jwt = JwtKeys::from_secret(config.jwt_secret.as_bytes())
        .context("Failed to initialize JWT keys")?;

    let index = ElasticsearchIndex::connect(
        &config.elasticsearch_url,
        IndexNames {
            posts: config.post_index.clone(),
            users: config.user_index.clone(),
        },
        config.search_max_hits,
    )
    .context("Failed to create Elasticsearch client")?;
    index
        .ensure_collections()
        .await
        .context("Failed to create search indices")?;
    let index: Arc<dyn SearchIndex> = Arc::new(index);

    let s3 = S3Client::with_config(config.s3_config()).await;
    let media = Arc::new(S3MediaStore::new(s3.operations()));

    let auth_mode = if config.prediction_use_adc {
        AuthMode::Adc
    } else {
        AuthMode::Anonymous
    };
    let annotator = Arc::new(
        PredictionClient::new(config.prediction_endpoint(), auth_mode)
            .context("Failed to create prediction client")?,
    );

    let state = AppState::new(
        media,
        annotator,
        index,
        jwt.clone(),
        config.deadlines(),
        config.max_upload_bytes,
    );

    let bind_address = (config.host.clone(), config.port);
    info!("HTTP server listening on {}:{}", bind_address.0, bind_address.1);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(PermissiveCors)
            .wrap(Logging)
            .configure(|cfg| handlers::configure(cfg, &jwt))
    })
    .bind(bind_address)?
    .run()
    .await
    .map_err(|e| {
        error!("Server error: {}", e);
        e
    })?;

    info!("around-service shutting down");
    Ok(())
}
