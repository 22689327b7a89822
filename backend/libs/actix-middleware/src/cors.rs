//! Permissive CORS middleware
//!
//! Every response allows any origin and the `Content-Type` and
//! `Authorization` request headers. `OPTIONS` requests never reach the inner
//! service: they are answered with an empty `200`.

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::{
        header::{self, HeaderMap, HeaderValue},
        Method,
    },
    Error, HttpResponse,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};

const ALLOWED_HEADERS: &str = "Content-Type,Authorization";

#[derive(Clone, Default)]
pub struct PermissiveCors;

impl<S, B> Transform<S, ServiceRequest> for PermissiveCors
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = PermissiveCorsService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(PermissiveCorsService { service }))
    }
}

pub struct PermissiveCorsService<S> {
    service: S,
}

fn apply_headers(headers: &mut HeaderMap) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
}

impl<S, B> Service<ServiceRequest> for PermissiveCorsService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if req.method() == Method::OPTIONS {
            let mut response = HttpResponse::Ok().finish();
            apply_headers(response.headers_mut());
            return Box::pin(async move { Ok(req.into_response(response).map_into_right_body()) });
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            let mut res = fut.await?;
            apply_headers(res.headers_mut());
            Ok(res.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, web, App};

    #[actix_web::test]
    async fn test_options_short_circuits() {
        let app = test::init_service(
            App::new()
                .wrap(PermissiveCors)
                .route("/post", web::post().to(|| async { HttpResponse::Created().finish() })),
        )
        .await;

        let req = test::TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/post")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
        let body = test::read_body(resp).await;
        assert!(body.is_empty());
    }

    #[actix_web::test]
    async fn test_headers_added_to_regular_responses() {
        let app = test::init_service(
            App::new()
                .wrap(PermissiveCors)
                .route("/search", web::get().to(|| async { HttpResponse::Ok().body("[]") })),
        )
        .await;

        let req = test::TestRequest::get().uri("/search").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_HEADERS).unwrap(),
            ALLOWED_HEADERS
        );
    }
}
