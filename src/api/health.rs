use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    /// "connected", "unreachable" or "in-memory"
    pub database: String,
    pub timestamp: i64,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is up; database state reported separately", body = HealthResponse)
    )
)]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let database = match &state.database {
        Some(db) => match db.ping().await {
            Ok(()) => "connected",
            Err(e) => {
                log::warn!("⚠️  Health check: MongoDB unreachable: {}", e);
                "unreachable"
            }
        },
        None => "in-memory",
    };

    HttpResponse::Ok().json(HealthResponse {
        status: if database == "unreachable" { "degraded" } else { "healthy" }.to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}
