use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;

use pickup_service::config::GalleryConfig;
use pickup_service::gallery::{self, GalleryState, GalleryStore};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = GalleryConfig::from_env();

    log::info!("🚀 Starting Gallery demo...");

    tokio::fs::create_dir_all(&config.upload_dir).await?;
    log::info!("📁 Images stored in {}", config.upload_dir.display());
    log::info!("🗒️  Upload log at {}", config.log_path.display());

    let state = web::Data::new(GalleryState {
        store: GalleryStore::new(config.log_path.clone()),
        upload_dir: config.upload_dir.clone(),
    });
    let admin = config.admin.clone();

    log::info!("🌐 Gallery listening on {}:{}", config.host, config.port);

    HttpServer::new(move || {
        let state = state.clone();
        let admin = admin.clone();

        App::new()
            .wrap(Logger::default())
            .configure(|cfg| gallery::configure(cfg, state, admin))
    })
    .bind((config.host.clone(), config.port))?
    .run()
    .await
}
