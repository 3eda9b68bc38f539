//! HTTP proxy in front of the image model.

pub mod handlers;

use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;

use crate::{
    config::Config,
    generator::{GeminiClient, ImageGenerator},
    logger,
};

pub const GENERATE_PATHS: [&str; 2] = ["/generate", "/api/generate"];

pub struct AppState {
    pub generator: Arc<dyn ImageGenerator>,
}

impl AppState {
    pub fn new(generator: Arc<dyn ImageGenerator>) -> Self {
        Self { generator }
    }
}

pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(handlers::json_error)
}

/// Registers the proxy routes. State and JSON config are added by the caller.
pub fn routes(cfg: &mut web::ServiceConfig) {
    for path in GENERATE_PATHS {
        cfg.service(
            web::resource(path)
                .route(web::post().to(handlers::generate))
                .default_service(web::to(handlers::method_not_allowed)),
        );
    }
    cfg.route("/health", web::get().to(handlers::health));
}

pub async fn run(config: Config) -> std::io::Result<()> {
    let generator: Arc<dyn ImageGenerator> = Arc::new(GeminiClient::new(config.gemini.clone()));
    if let Err(e) = generator.ensure_configured() {
        log::warn!("⚠️  {} Requests will fail until it is set.", e);
    }

    let state = web::Data::new(AppState::new(generator));
    let limit = config.max_body_bytes();
    let host = config.host().to_string();
    let port = config.port();

    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), &host, port);
    logger::log_config_info(&config);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::new("%r %s %b %Dms"))
            .app_data(state.clone())
            .app_data(json_config(limit))
            .configure(routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
