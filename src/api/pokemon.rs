use actix_web::{web, HttpResponse};
use serde::Deserialize;
use crate::api::metrics;
use crate::services::PokedexService;
use crate::utils::error::RetrievalError;

const DEFAULT_LIMIT: u32 = 20;
const DEFAULT_OFFSET: u32 = 0;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

fn parse_page_param(raw: Option<&str>, default: u32) -> Option<u32> {
    match raw {
        Some(value) => value.trim().parse().ok(),
        None => Some(default),
    }
}

fn bad_request(message: &str) -> HttpResponse {
    metrics::increment_error_count();
    HttpResponse::BadRequest().json(serde_json::json!({ "error": message }))
}

/// 404 for things upstream does not have, 502 for everything else.
fn upstream_error(context: &str, e: &RetrievalError) -> HttpResponse {
    metrics::increment_error_count();
    log::error!("❌ {}: {}", context, e);

    let body = serde_json::json!({ "error": e.to_string() });
    if e.is_not_found() {
        HttpResponse::NotFound().json(body)
    } else {
        HttpResponse::BadGateway().json(body)
    }
}

/// "mr-mime" -> "Mr-Mime"
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut at_word_start = true;
    for c in name.chars() {
        if at_word_start && c.is_alphabetic() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !c.is_alphanumeric() && c != '\'';
    }
    out
}

/// GET /pokemon?limit=20&offset=0
#[utoipa::path(
    get,
    path = "/pokemon",
    tag = "Pokemon",
    params(
        ("limit" = Option<u32>, Query, description = "Page size (default 20)"),
        ("offset" = Option<u32>, Query, description = "Index of the first entry (default 0)")
    ),
    responses(
        (status = 200, description = "One page of pokemon"),
        (status = 400, description = "Invalid limit or offset"),
        (status = 502, description = "Upstream failure")
    )
)]
pub async fn list_pokemon(
    query: web::Query<ListQuery>,
    service: web::Data<PokedexService>,
) -> HttpResponse {
    metrics::increment_request_count();

    let Some(limit) = parse_page_param(query.limit.as_deref(), DEFAULT_LIMIT) else {
        return bad_request("invalid limit parameter");
    };
    let Some(offset) = parse_page_param(query.offset.as_deref(), DEFAULT_OFFSET) else {
        return bad_request("invalid offset parameter");
    };

    log::info!("📋 GET /pokemon?limit={}&offset={}", limit, offset);

    match service.list_pokemon(limit, offset).await {
        Ok(page) => {
            let pokemons: Vec<_> = page
                .results
                .iter()
                .enumerate()
                .map(|(i, entry)| {
                    serde_json::json!({
                        "id": u64::from(offset) + i as u64 + 1,
                        "name": entry.name,
                    })
                })
                .collect();

            let next = page
                .next
                .as_ref()
                .map(|_| format!("/pokemon?limit={}&offset={}", limit, offset.saturating_add(limit)));
            let previous = page
                .previous
                .as_ref()
                .map(|_| format!("/pokemon?limit={}&offset={}", limit, offset.saturating_sub(limit)));

            HttpResponse::Ok().json(serde_json::json!({
                "count": page.count,
                "next": next,
                "previous": previous,
                "pokemons": pokemons,
            }))
        }
        Err(e) => upstream_error("Failed to list pokemon", &e),
    }
}

/// GET /pokemon/{identifier}
#[utoipa::path(
    get,
    path = "/pokemon/{identifier}",
    tag = "Pokemon",
    params(
        ("identifier" = String, Path, description = "National dex number or name")
    ),
    responses(
        (status = 200, description = "Pokemon detail"),
        (status = 404, description = "Unknown pokemon"),
        (status = 502, description = "Upstream failure")
    )
)]
pub async fn get_pokemon(
    path: web::Path<String>,
    service: web::Data<PokedexService>,
) -> HttpResponse {
    metrics::increment_request_count();
    let identifier = path.into_inner();
    log::info!("🔎 GET /pokemon/{}", identifier);

    match service.pokemon(&identifier).await {
        Ok(pokemon) => HttpResponse::Ok().json(serde_json::json!({
            "id": pokemon.id,
            "name": title_case(&pokemon.name),
            "height": f64::from(pokemon.height) / 10.0,
            "weight": f64::from(pokemon.weight) / 10.0,
            "types": pokemon.types,
            "abilities": pokemon.abilities,
            "imageUrl": pokemon.sprites.other.official_artwork.front_default,
        })),
        Err(e) => upstream_error("Failed to get pokemon", &e),
    }
}

/// GET /pokemon/{identifier}/abilities
#[utoipa::path(
    get,
    path = "/pokemon/{identifier}/abilities",
    tag = "Pokemon",
    params(
        ("identifier" = String, Path, description = "National dex number or name")
    ),
    responses(
        (status = 200, description = "Abilities with English effect text"),
        (status = 404, description = "Unknown pokemon or ability"),
        (status = 502, description = "Upstream failure")
    )
)]
pub async fn get_pokemon_abilities(
    path: web::Path<String>,
    service: web::Data<PokedexService>,
) -> HttpResponse {
    metrics::increment_request_count();
    let identifier = path.into_inner();
    log::info!("✨ GET /pokemon/{}/abilities", identifier);

    match service.pokemon_abilities(&identifier).await {
        Ok(abilities) => {
            let abilities: Vec<_> = abilities
                .iter()
                .map(|ability| ability.with_effects_in("en"))
                .collect();
            HttpResponse::Ok().json(serde_json::json!({ "abilities": abilities }))
        }
        Err(e) => upstream_error("Failed to get abilities", &e),
    }
}

/// GET /pokemon/{identifier}/evolutions
#[utoipa::path(
    get,
    path = "/pokemon/{identifier}/evolutions",
    tag = "Pokemon",
    params(
        ("identifier" = String, Path, description = "National dex number or name")
    ),
    responses(
        (status = 200, description = "Evolution tree rooted at the base species"),
        (status = 404, description = "Unknown species"),
        (status = 502, description = "Upstream failure")
    )
)]
pub async fn get_pokemon_evolutions(
    path: web::Path<String>,
    service: web::Data<PokedexService>,
) -> HttpResponse {
    metrics::increment_request_count();
    let identifier = path.into_inner();
    log::info!("🧬 GET /pokemon/{}/evolutions", identifier);

    match service.evolutions(&identifier).await {
        Ok(chain) => HttpResponse::Ok().json(serde_json::json!({ "evolutions": chain.chain })),
        Err(e) => upstream_error("Failed to get evolutions", &e),
    }
}
