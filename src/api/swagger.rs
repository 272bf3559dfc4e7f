use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pokedex Service API",
        version = "1.0.0",
        description = "Caching facade over PokeAPI.\n\n**Features:**\n- Paginated pokemon listing\n- Pokemon detail by number or name\n- Abilities with English effect text\n- Evolution chains\n- Health monitoring and metrics\n\nUpstream responses are cached in memory for a configurable TTL."
    ),
    paths(
        // Health & Metrics
        crate::api::health::health_check,
        crate::api::health::ping,
        crate::api::metrics::get_metrics,

        // Pokemon
        crate::api::pokemon::list_pokemon,
        crate::api::pokemon::get_pokemon,
        crate::api::pokemon::get_pokemon_abilities,
        crate::api::pokemon::get_pokemon_evolutions,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check and system metrics endpoints for monitoring service status."),
        (name = "Pokemon", description = "Pokemon data served from the in-memory cache, falling back to PokeAPI."),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_pokemon_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/pokemon",
            "/pokemon/{identifier}",
            "/pokemon/{identifier}/abilities",
            "/pokemon/{identifier}/evolutions",
            "/health",
            "/metrics",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
