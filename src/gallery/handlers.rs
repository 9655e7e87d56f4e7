use actix_multipart::Multipart;
use actix_web::{http::header::ContentType, web, HttpResponse, ResponseError};
use chrono::Utc;
use std::path::PathBuf;

use super::pages;
use super::store::{GalleryStore, UploadRecord};
use crate::services::upload_service::{self, ParsedForm, UploadRules};
use crate::utils::AppError;

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const IMAGE_RULES: UploadRules = UploadRules {
    file_field: "image",
    max_files: 1,
    max_file_bytes: MAX_IMAGE_BYTES,
    images_only: true,
};

pub struct GalleryState {
    pub store: GalleryStore,
    pub upload_dir: PathBuf,
}

fn html(status: actix_web::http::StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(body)
}

pub async fn index() -> HttpResponse {
    html(actix_web::http::StatusCode::OK, pages::upload_form())
}

pub async fn upload(state: web::Data<GalleryState>, payload: Multipart) -> HttpResponse {
    log::info!("🖼️  POST /upload");

    let result = match upload_service::parse_multipart(payload, &state.upload_dir, &IMAGE_RULES).await {
        Ok(form) => record_upload(&state.store, form).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(record) => {
            log::info!("✅ Stored upload {} from {} ({} bytes)", record.id, record.email, record.size);
            html(actix_web::http::StatusCode::OK, pages::upload_success(&record))
        }
        Err(e) => {
            log::warn!("❌ Upload rejected: {}", e);
            html(e.status_code(), pages::upload_failed(&e.to_string()))
        }
    }
}

async fn record_upload(store: &GalleryStore, form: ParsedForm) -> Result<UploadRecord, AppError> {
    let result = build_record(&form);
    let record = match result {
        Ok(record) => record,
        Err(e) => {
            form.discard().await;
            return Err(e);
        }
    };

    if let Err(e) = store.append(&record).await {
        form.discard().await;
        return Err(e);
    }

    Ok(record)
}

fn build_record(form: &ParsedForm) -> Result<UploadRecord, AppError> {
    let (name, email) = match (form.text("name"), form.text("email")) {
        (Some(n), Some(e)) => (n, e),
        _ => return Err(AppError::InvalidRequest("Name and email are required".to_string())),
    };

    let image = form
        .files
        .first()
        .ok_or_else(|| AppError::InvalidRequest("An image file is required".to_string()))?;

    Ok(UploadRecord {
        id: uuid::Uuid::new_v4().to_string(),
        name: name.to_string(),
        email: email.to_string(),
        description: form.text("description").unwrap_or_default().to_string(),
        file_name: image.file_name.clone(),
        original_name: image.original_name.clone(),
        size: image.size,
        uploaded_at: Utc::now(),
    })
}

pub async fn admin(state: web::Data<GalleryState>) -> HttpResponse {
    log::info!("🗂️  GET /admin");

    match state.store.list().await {
        Ok(records) => html(actix_web::http::StatusCode::OK, pages::admin_listing(&records)),
        Err(e) => {
            log::error!("❌ Failed to read {}: {}", state.store.path().display(), e);
            html(e.status_code(), pages::upload_failed("Could not load uploads"))
        }
    }
}
