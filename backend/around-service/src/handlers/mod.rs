/// HTTP handlers
///
/// - auth: signup and login
/// - posts: multipart post submission
/// - search: geo-radius search and face-score clustering
/// - health: liveness and readiness probes
pub mod auth;
pub mod health;
pub mod posts;
pub mod search;

use actix_middleware::JwtAuthMiddleware;
use actix_web::web;
use crypto_core::JwtKeys;

/// Register every route. `/post`, `/search` and `/cluster` require a bearer
/// token.
pub fn configure(cfg: &mut web::ServiceConfig, keys: &JwtKeys) {
    cfg.route("/health", web::get().to(health::health))
        .route("/health/ready", web::get().to(health::ready))
        .route("/signup", web::post().to(auth::signup))
        .route("/login", web::post().to(auth::login))
        .service(
            web::resource("/post")
                .wrap(JwtAuthMiddleware::new(keys.clone()))
                .route(web::post().to(posts::create_post)),
        )
        .service(
            web::resource("/search")
                .wrap(JwtAuthMiddleware::new(keys.clone()))
                .route(web::get().to(search::search)),
        )
        .service(
            web::resource("/cluster")
                .wrap(JwtAuthMiddleware::new(keys.clone()))
                .route(web::get().to(search::cluster)),
        );
}
