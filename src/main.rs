mod api;
mod config;
mod jobs;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use config::AppConfig;
use dotenv::dotenv;
use services::{PokeApiClient, PokedexService};
use std::sync::Arc;
use utils::cache::TtlCache;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn build_cors(allowed_origins: &[String]) -> Cors {
    let cors = if allowed_origins.is_empty() {
        Cors::default().allow_any_origin()
    } else {
        allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    cors.allowed_methods(vec!["GET", "OPTIONS"])
        .allowed_headers(vec![
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::ACCEPT,
            actix_web::http::header::CACHE_CONTROL,
        ])
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env();

    log::info!("🚀 Starting Pokedex Service...");
    log::info!("🌐 Upstream: {}", config.pokeapi_base_url);
    log::info!(
        "📦 Cache: default TTL {}s, sweep every {}s",
        config.cache_default_ttl.as_secs(),
        config.cache_sweep_interval.as_secs()
    );

    let client = PokeApiClient::new(&config.pokeapi_base_url, config.upstream_timeout)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    // The cache lives for the whole process; the sweeper is stopped after the server exits.
    let cache = TtlCache::new(config.cache_default_ttl);
    let sweeper = jobs::start_cache_sweeper(cache.clone(), config.cache_sweep_interval);

    let service = web::Data::new(PokedexService::new(Arc::new(client), cache));

    log::info!("🌐 Server starting on {}:{}", config.host, config.port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", config.host, config.port);

    let cors_origins = config.cors_allowed_origins.clone();
    let server = HttpServer::new(move || {
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(service.clone())
            .wrap(build_cors(&cors_origins))
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi)
            )
            .configure(api::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run();

    let result = server.await;

    sweeper.stop().await;
    log::info!("👋 Pokedex Service stopped");

    result
}
