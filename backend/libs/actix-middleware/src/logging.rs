//! Logging middleware
//!
//! One access-log line per request: method, path, status, duration and,
//! on authenticated routes, the username the bearer token asserted.
//! Server errors are logged at `warn`.

use crate::jwt_auth::AuthenticatedUser;
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage, HttpRequest,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::time::Instant;

/// Username recorded by [`crate::JwtAuthMiddleware`] further down the chain.
fn request_user(req: &HttpRequest) -> Option<String> {
    req.extensions()
        .get::<AuthenticatedUser>()
        .map(|user| user.username().to_string())
}

/// Middleware that logs HTTP requests and responses
#[derive(Clone, Default)]
pub struct Logging;

impl<S, B> Transform<S, ServiceRequest> for Logging
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = LoggingService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(LoggingService { service }))
    }
}

pub struct LoggingService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for LoggingService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().clone();
        let path = req.path().to_string();

        tracing::debug!(method = %method, path = %path, "HTTP request started");

        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;
            let status = res.status();
            let duration_ms = start.elapsed().as_millis() as u64;
            let user = request_user(res.request()).unwrap_or_default();

            if status.is_server_error() {
                tracing::warn!(
                    method = %method,
                    path = %path,
                    status = status.as_u16(),
                    duration_ms,
                    user = %user,
                    "HTTP request failed"
                );
            } else {
                tracing::info!(
                    method = %method,
                    path = %path,
                    status = status.as_u16(),
                    duration_ms,
                    user = %user,
                    "HTTP request completed"
                );
            }

            Ok(res)
        })
    }
}
