use actix_middleware::{AuthenticatedUser, JwtAuthMiddleware, Logging, PermissiveCors};
use actix_web::{http::header, http::Method, http::StatusCode, test, web, App, HttpResponse};
use crypto_core::jwt::JwtKeys;

async fn protected(user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().body(user.username().to_string())
}

fn keys() -> JwtKeys {
    JwtKeys::from_secret(b"integration-secret").expect("keys")
}

#[actix_web::test]
async fn test_unauthorized_response_still_carries_cors_headers() {
    let app = test::init_service(
        App::new().wrap(Logging).wrap(PermissiveCors).service(
            web::resource("/cluster")
                .wrap(JwtAuthMiddleware::new(keys()))
                .route(web::get().to(protected)),
        ),
    )
    .await;

    let req = test::TestRequest::get().uri("/cluster").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}

#[actix_web::test]
async fn test_options_skips_authentication() {
    let app = test::init_service(
        App::new().wrap(PermissiveCors).service(
            web::resource("/post")
                .wrap(JwtAuthMiddleware::new(keys()))
                .route(web::post().to(protected)),
        ),
    )
    .await;

    let req = test::TestRequest::default()
        .method(Method::OPTIONS)
        .uri("/post")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_expired_token_rejected() {
    let keys = keys();
    let token = keys
        .issue_with_ttl("dave", chrono::Duration::hours(-3))
        .expect("token");

    let app = test::init_service(
        App::new().service(
            web::resource("/search")
                .wrap(JwtAuthMiddleware::new(keys))
                .route(web::get().to(protected)),
        ),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/search")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
