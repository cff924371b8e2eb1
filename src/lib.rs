use std::sync::Arc;

use actix_web::web;
use handlebars::TemplateError;

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod views;

use config::AppConfig;
use db::store::Store;
use middleware::auth::AuthMiddleware;
use services::itinerary_generation_service::{ItineraryGenerationConfig, ItineraryGenerator};
use services::openai_service::TextGenerator;
use views::page::PageRenderer;

/// Shared by every worker through `web::Data`.
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn Store>,
    pub generator: ItineraryGenerator,
    pub pages: PageRenderer,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn Store>,
        text_generator: Arc<dyn TextGenerator>,
    ) -> Result<Self, TemplateError> {
        let generator = ItineraryGenerator::with_config(
            text_generator,
            store.clone(),
            ItineraryGenerationConfig::from(&config.generation),
        );

        Ok(Self {
            config,
            store,
            generator,
            pages: PageRenderer::new()?,
        })
    }
}

/// Registers every route. The caller provides `web::Data<AppState>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .route("/health", web::get().to(routes::health::health_check))
        .service(
            web::scope("/auth")
                .route("/register", web::post().to(routes::account::register))
                .route("/signin", web::post().to(routes::account::signin)),
        )
        .service(
            web::scope("/shared")
                .route("/{id}", web::get().to(routes::shared::get_by_id))
                .route("/{id}/view", web::get().to(routes::view::shared_page)),
        )
        // Protected routes
        .service(
            web::scope("/plans")
                .wrap(AuthMiddleware)
                .route("", web::post().to(routes::plans::create))
                .route("", web::get().to(routes::plans::list))
                .route("/{id}", web::get().to(routes::plans::get_by_id))
                .route("/{id}/share", web::post().to(routes::plans::share)),
        )
        .configure(routes::admin::config);
}
