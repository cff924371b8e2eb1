use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::{error, info, warn};

use trip_planner_api::config::{AppConfig, DatabaseBackend};
use trip_planner_api::db::{memory::MemoryStore, mongo::MongoStore, store::Store};
use trip_planner_api::services::openai_service::{OpenAiClient, TextGenerator};
use trip_planner_api::AppState;

async fn build_store(config: &AppConfig) -> io::Result<Arc<dyn Store>> {
    match config.database.backend {
        DatabaseBackend::Memory => {
            warn!("Using the in-memory store; data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        DatabaseBackend::MongoDb => {
            let uri = config.database.mongodb_uri.as_deref().unwrap_or_default();
            let store = MongoStore::connect(uri, &config.database.mongodb_database)
                .await
                .map_err(|e| {
                    error!("MongoDB connection failed: {}", e);
                    io::Error::other(e)
                })?;
            info!("MongoDB connection established");
            Ok(Arc::new(store))
        }
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    let store = build_store(&config).await?;

    let text_generator: Arc<dyn TextGenerator> = Arc::new(OpenAiClient::new(&config.generation));
    if !text_generator.is_configured() {
        warn!("OPENAI_API_KEY is not set; plan generation requests will fail");
    }

    let host = config.host.clone();
    let port = config.port;
    let state = web::Data::new(AppState::new(config, store, text_generator).map_err(|e| {
        error!("Failed to load page templates: {}", e);
        io::Error::other(e.to_string())
    })?);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(trip_planner_api::configure)
    })
    .bind((host, port))?
    .run()
    .await
}
