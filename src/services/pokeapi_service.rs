use crate::models::{Ability, EvolutionChain, NamedResourceList, Pokemon, PokemonSpecies};
use crate::utils::error::RetrievalError;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const POKEAPI_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Upstream operations the service needs. Each call is one HTTP GET.
#[async_trait]
pub trait PokeApi: Send + Sync {
    async fn list_pokemon(&self, limit: u32, offset: u32) -> Result<NamedResourceList, RetrievalError>;

    /// `identifier` is a national dex number or a lower-case name.
    async fn pokemon(&self, identifier: &str) -> Result<Pokemon, RetrievalError>;

    async fn ability(&self, name: &str) -> Result<Ability, RetrievalError>;

    async fn species(&self, identifier: &str) -> Result<PokemonSpecies, RetrievalError>;

    /// `url` comes from a species payload and must point at the same API.
    async fn evolution_chain(&self, url: &str) -> Result<EvolutionChain, RetrievalError>;
}

/// reqwest-backed client. Clone shares the connection pool.
#[derive(Clone)]
pub struct PokeApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl PokeApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pokedex-service/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn resource_url(&self, resource: &str, identifier: &str) -> String {
        format!("{}/{}/{}", self.base_url, resource, urlencoding::encode(identifier))
    }

    fn is_upstream_url(&self, url: &str) -> bool {
        url.strip_prefix(&self.base_url)
            .is_some_and(|rest| rest.starts_with('/'))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, RetrievalError> {
        log::info!("🌐 Fetching from PokeAPI: {}", url);

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| RetrievalError::Network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(RetrievalError::NotFound(
                url.trim_start_matches(&self.base_url).trim_start_matches('/').to_string(),
            ));
        }
        if !status.is_success() {
            log::warn!("⚠️  PokeAPI returned {} for {}", status, url);
            return Err(RetrievalError::Status(status.as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| RetrievalError::Decode(e.to_string()))
    }
}

#[async_trait]
impl PokeApi for PokeApiClient {
    async fn list_pokemon(&self, limit: u32, offset: u32) -> Result<NamedResourceList, RetrievalError> {
        let url = format!("{}/pokemon?limit={}&offset={}", self.base_url, limit, offset);
        self.get_json(&url).await
    }

    async fn pokemon(&self, identifier: &str) -> Result<Pokemon, RetrievalError> {
        self.get_json(&self.resource_url("pokemon", identifier)).await
    }

    async fn ability(&self, name: &str) -> Result<Ability, RetrievalError> {
        self.get_json(&self.resource_url("ability", name)).await
    }

    async fn species(&self, identifier: &str) -> Result<PokemonSpecies, RetrievalError> {
        self.get_json(&self.resource_url("pokemon-species", identifier)).await
    }

    async fn evolution_chain(&self, url: &str) -> Result<EvolutionChain, RetrievalError> {
        if !self.is_upstream_url(url) {
            return Err(RetrievalError::InvalidUrl(url.to_string()));
        }
        self.get_json(url).await
    }
}
