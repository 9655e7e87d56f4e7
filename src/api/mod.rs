pub mod admin;
pub mod auth;
pub mod health;
pub mod orders;
pub mod swagger;

use actix_cors::Cors;
use actix_web::{web, HttpResponse, ResponseError};
use std::path::Path;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Credentials;
use crate::middleware::BasicAuth;
use crate::utils::AppError;

/// CORS policy for the order API: any origin, method and header.
pub fn cors() -> Cors {
    Cors::permissive()
}

/// Registers every route of the order API.
pub fn configure(cfg: &mut web::ServiceConfig, upload_dir: &Path, admin: Option<Credentials>) {
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        AppError::InvalidRequest(format!("Invalid JSON body: {}", err)).into()
    });

    cfg.app_data(json_config)
        .service(
            SwaggerUi::new("/swagger-ui/{_:.*}")
                .url("/api-docs/openapi.json", swagger::ApiDoc::openapi()),
        )
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api/auth")
                .route("/send-otp", web::post().to(auth::send_otp))
                .route("/verify-otp", web::post().to(auth::verify_otp)),
        )
        .service(
            web::scope("/api/order")
                .route("/new", web::post().to(orders::create_order))
                .route("/my-orders/{user_id}", web::get().to(orders::my_orders)),
        )
        .service(
            web::scope("/api/admin")
                .wrap(BasicAuth::optional(admin, "pickup-admin"))
                .route("/orders", web::get().to(admin::list_orders))
                .route("/order/{order_id}/status", web::post().to(admin::update_status)),
        )
        .service(actix_files::Files::new("/uploads", upload_dir));
}

/// Logs a failed request and renders the error body.
pub(crate) fn error_response(route: &str, e: AppError) -> HttpResponse {
    if e.is_client_error() {
        log::warn!("❌ {} failed: {}", route, e);
    } else {
        log::error!("❌ {} failed: {}", route, e);
    }
    e.error_response()
}
