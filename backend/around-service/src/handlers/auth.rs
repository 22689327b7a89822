use crate::error::{AppError, Result};
use crate::models::{LoginRequest, SignupRequest};
use crate::state::AppState;
use crate::validators::{validate_password, validate_username};
use actix_web::{web, HttpResponse};
use serde::de::DeserializeOwned;
use std::time::Instant;
use tracing::{info, warn};

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, "Rejected undecodable user payload");
        AppError::BadRequest("Cannot decode user data from client")
    })
}

/// POST /signup
pub async fn signup(state: web::Data<AppState>, body: web::Bytes) -> Result<HttpResponse> {
    let started = Instant::now();
    let request: SignupRequest = decode(&body)?;

    if !validate_username(&request.username) || !validate_password(&request.password) {
        return Err(AppError::BadRequest("Invalid username or password"));
    }

    state.users.create(&request).await?;

    info!(
        username = %request.username,
        "User added successfully, signup took {} ms",
        started.elapsed().as_millis()
    );
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("User added successfully."))
}

/// POST /login
pub async fn login(state: web::Data<AppState>, body: web::Bytes) -> Result<HttpResponse> {
    let started = Instant::now();
    let request: LoginRequest = decode(&body)?;

    state
        .users
        .verify(&request.username, &request.password)
        .await?;

    let token = state
        .jwt
        .issue(&request.username)
        .map_err(|e| AppError::dependency("Failed to generate token", e))?;

    info!(
        username = %request.username,
        "Login took {} ms",
        started.elapsed().as_millis()
    );
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(token))
}
