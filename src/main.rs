use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;

use pickup_service::{api, config::Config, database::MongoDB, state::AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();

    log::info!("🚀 Starting Pickup Service...");

    tokio::fs::create_dir_all(&config.upload_dir).await?;
    log::info!("📁 Uploads stored in {}", config.upload_dir.display());

    // Only a malformed URI is fatal; an unreachable server is not
    let db = MongoDB::new(&config.database_url).await.map_err(|e| {
        log::error!("❌ Invalid DATABASE_URL: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    log::info!("📊 Database: {}", db.database().name());

    match db.ping().await {
        Ok(()) => {
            log::info!("✅ MongoDB connected successfully");
            if let Err(e) = db.ensure_indexes().await {
                log::error!("❌ Failed to create indexes: {}", e);
            }
        }
        Err(e) => {
            log::error!("❌ MongoDB connection failed, serving in degraded mode: {}", e);
        }
    }

    if config.admin_credentials.is_none() {
        log::warn!("⚠️  ADMIN_USERNAME/ADMIN_PASSWORD not set, admin endpoints are open");
    }
    if config.otp_in_response {
        log::warn!("⚠️  OTP_IN_RESPONSE is enabled, codes are returned to the caller");
    }

    let bind = (config.host.clone(), config.port);
    let upload_dir = config.upload_dir.clone();
    let admin = config.admin_credentials.clone();
    let state = web::Data::new(AppState::with_mongodb(db, config));

    log::info!("🌐 Server starting on {}:{}", bind.0, bind.1);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", bind.0, bind.1);

    HttpServer::new(move || {
        let upload_dir = upload_dir.clone();
        let admin = admin.clone();

        App::new()
            .app_data(state.clone())
            .wrap(api::cors())
            .wrap(Logger::default())
            .configure(|cfg| api::configure(cfg, &upload_dir, admin))
    })
    .bind(bind)?
    .run()
    .await
}
