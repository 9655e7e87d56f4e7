//! Standalone image-upload demo: a public upload form and a Basic-Auth
//! protected admin listing, with metadata kept in an append-only log.

pub mod handlers;
pub mod pages;
pub mod store;

pub use handlers::GalleryState;
pub use store::{GalleryStore, UploadRecord};

use actix_web::web;

use crate::config::Credentials;
use crate::middleware::BasicAuth;

pub fn configure(cfg: &mut web::ServiceConfig, state: web::Data<GalleryState>, admin: Credentials) {
    let upload_dir = state.upload_dir.clone();

    cfg.app_data(state)
        .route("/", web::get().to(handlers::index))
        .route("/upload", web::post().to(handlers::upload))
        .service(
            web::resource("/admin")
                .wrap(BasicAuth::new(admin, "gallery-admin"))
                .route(web::get().to(handlers::admin)),
        )
        .service(actix_files::Files::new("/uploads", upload_dir));
}
