use actix_web::web;

pub mod health;
pub mod metrics;
pub mod pokemon;
pub mod swagger;

/// Registers every route. Shared by `main` and the route tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // Health check
        .route("/health", web::get().to(health::health_check))
        .route("/ping", web::get().to(health::ping))
        // Metrics
        .route("/metrics", web::get().to(metrics::get_metrics))
        // Pokemon: cached PokeAPI facade
        .service(
            web::scope("/pokemon")
                .route("", web::get().to(pokemon::list_pokemon))
                .route("/{identifier}", web::get().to(pokemon::get_pokemon))
                .route("/{identifier}/abilities", web::get().to(pokemon::get_pokemon_abilities))
                .route("/{identifier}/evolutions", web::get().to(pokemon::get_pokemon_evolutions)),
        );
}
