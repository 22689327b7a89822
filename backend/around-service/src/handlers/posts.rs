use crate::error::{AppError, Result};
use crate::services::{MediaUpload, PostForm};
use crate::state::AppState;
use actix_middleware::AuthenticatedUser;
use actix_multipart::{Field, Multipart};
use actix_web::{web, HttpResponse};
use bytes::BytesMut;
use futures_util::TryStreamExt;
use std::time::Instant;
use tracing::{info, warn};

const MEDIA_FIELD: &str = "image";

fn malformed(e: impl std::fmt::Display) -> AppError {
    warn!(error = %e, "Rejected malformed multipart body");
    AppError::BadRequest("Cannot decode post data from client")
}

async fn read_field(field: &mut Field, limit: usize) -> Result<BytesMut> {
    let mut data = BytesMut::new();
    while let Some(chunk) = field.try_next().await.map_err(malformed)? {
        if data.len() + chunk.len() > limit {
            return Err(AppError::PayloadTooLarge("Image is too large"));
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

/// Split a multipart body into the text fields and the media file part.
///
/// A part named `image` only counts as media when it carries a non-empty
/// filename. The first such part wins; later ones are ignored.
async fn read_post_form(
    mut payload: Multipart,
    max_upload_bytes: usize,
) -> Result<(PostForm, Option<MediaUpload>)> {
    let mut form = PostForm::default();
    let mut media = None;

    while let Some(mut field) = payload.try_next().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);

        match (name.as_str(), filename) {
            (MEDIA_FIELD, Some(filename)) if !filename.is_empty() && media.is_none() => {
                let content_type = field.content_type().map(|mime| mime.to_string());
                let data = read_field(&mut field, max_upload_bytes).await?;
                media = Some(MediaUpload {
                    filename,
                    content_type,
                    data: data.freeze(),
                });
            }
            (field_name, _) => {
                let data = read_field(&mut field, max_upload_bytes).await?;
                let value = String::from_utf8_lossy(&data).into_owned();
                match field_name {
                    "lat" => form.lat = value,
                    "lon" => form.lon = value,
                    "message" => form.message = value,
                    _ => {}
                }
            }
        }
    }

    Ok((form, media))
}

/// POST /post (multipart: lat, lon, message, image)
pub async fn create_post(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    payload: Multipart,
) -> Result<HttpResponse> {
    let started = Instant::now();
    let (form, media) = read_post_form(payload, state.max_upload_bytes).await?;

    let post_id = state.pipeline.ingest(user.username(), form, media).await?;

    info!(
        post_id = %post_id,
        user = user.username(),
        "Post saved, request took {} ms",
        started.elapsed().as_millis()
    );
    Ok(HttpResponse::Ok().finish())
}
