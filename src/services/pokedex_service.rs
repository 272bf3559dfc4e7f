use crate::models::{
    Ability, CacheableResource, CachedResource, EvolutionChain, NamedResourceList, Pokemon, PokemonSpecies,
};
use crate::services::pokeapi_service::PokeApi;
use crate::utils::cache::{CacheStats, Expiration, TtlCache};
use crate::utils::error::RetrievalError;
use futures::future::try_join_all;
use std::future::Future;
use std::sync::Arc;

/// Cache keys: `<kind>:<parameters>`. Kinds never contain ':', so two
/// different logical requests can never produce the same key.
pub mod cache_keys {
    pub fn pokemon_list(limit: u32, offset: u32) -> String {
        format!("list_pokemon:{}:{}", limit, offset)
    }

    pub fn pokemon(identifier: &str) -> String {
        format!("pokemon:{}", identifier)
    }

    pub fn ability(name: &str) -> String {
        format!("ability:{}", name)
    }

    pub fn species(identifier: &str) -> String {
        format!("species:{}", identifier)
    }

    pub fn evolution_chain(url: &str) -> String {
        format!("evolution_chain:{}", url)
    }
}

/// Lower-cases and trims a user-supplied identifier so "Pikachu " and
/// "pikachu" share one cache entry.
pub fn normalize_identifier(identifier: &str) -> String {
    identifier.trim().to_lowercase()
}

/// Cache-backed access to the upstream API. Shared by all handlers via `web::Data`.
pub struct PokedexService {
    api: Arc<dyn PokeApi>,
    cache: TtlCache<CachedResource>,
}

impl PokedexService {
    pub fn new(api: Arc<dyn PokeApi>, cache: TtlCache<CachedResource>) -> Self {
        Self { api, cache }
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub async fn list_pokemon(&self, limit: u32, offset: u32) -> Result<Arc<NamedResourceList>, RetrievalError> {
        let api = Arc::clone(&self.api);
        self.fetch(
            cache_keys::pokemon_list(limit, offset),
            move || async move { api.list_pokemon(limit, offset).await },
            |_: &NamedResourceList| Vec::new(),
        )
        .await
    }

    /// Fetches by number or name; the result is cached under both.
    pub async fn pokemon(&self, identifier: &str) -> Result<Arc<Pokemon>, RetrievalError> {
        let identifier = normalize_identifier(identifier);
        let api = Arc::clone(&self.api);
        let upstream_id = identifier.clone();
        self.fetch(
            cache_keys::pokemon(&identifier),
            move || async move { api.pokemon(&upstream_id).await },
            |pokemon: &Pokemon| {
                vec![
                    cache_keys::pokemon(&pokemon.id.to_string()),
                    cache_keys::pokemon(&normalize_identifier(&pokemon.name)),
                ]
            },
        )
        .await
    }

    pub async fn ability(&self, name: &str) -> Result<Arc<Ability>, RetrievalError> {
        let name = normalize_identifier(name);
        let api = Arc::clone(&self.api);
        let upstream_name = name.clone();
        self.fetch(
            cache_keys::ability(&name),
            move || async move { api.ability(&upstream_name).await },
            |_: &Ability| Vec::new(),
        )
        .await
    }

    pub async fn species(&self, identifier: &str) -> Result<Arc<PokemonSpecies>, RetrievalError> {
        let identifier = normalize_identifier(identifier);
        let api = Arc::clone(&self.api);
        let upstream_id = identifier.clone();
        self.fetch(
            cache_keys::species(&identifier),
            move || async move { api.species(&upstream_id).await },
            |_: &PokemonSpecies| Vec::new(),
        )
        .await
    }

    pub async fn evolution_chain(&self, url: &str) -> Result<Arc<EvolutionChain>, RetrievalError> {
        let api = Arc::clone(&self.api);
        let upstream_url = url.to_string();
        self.fetch(
            cache_keys::evolution_chain(url),
            move || async move { api.evolution_chain(&upstream_url).await },
            |_: &EvolutionChain| Vec::new(),
        )
        .await
    }

    /// Every ability of a pokemon, in the order upstream lists them.
    pub async fn pokemon_abilities(&self, identifier: &str) -> Result<Vec<Arc<Ability>>, RetrievalError> {
        let pokemon = self.pokemon(identifier).await?;
        try_join_all(
            pokemon
                .abilities
                .iter()
                .map(|slot| self.ability(&slot.ability.name)),
        )
        .await
    }

    /// Species lookup followed by the chain it links to.
    pub async fn evolutions(&self, identifier: &str) -> Result<Arc<EvolutionChain>, RetrievalError> {
        let species = self.species(identifier).await?;
        self.evolution_chain(&species.evolution_chain.url).await
    }

    async fn fetch<T, F, Fut, A>(&self, key: String, retrieve: F, aliases: A) -> Result<Arc<T>, RetrievalError>
    where
        T: CacheableResource,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, RetrievalError>> + Send + 'static,
        A: FnOnce(&T) -> Vec<String> + Send + 'static,
    {
        let empty_key = key.clone();
        let resource = self
            .cache
            .fetch_with_aliases(
                &key,
                Expiration::Default,
                move || {
                    let pending = retrieve();
                    async move {
                        let value = pending.await?;
                        if value.is_empty() {
                            log::warn!("⚠️  Upstream returned an empty payload for {}", empty_key);
                            return Err(RetrievalError::EmptyPayload(empty_key));
                        }
                        Ok::<_, RetrievalError>(T::into_cached(Arc::new(value)))
                    }
                },
                move |resource: &CachedResource| {
                    T::from_cached(resource)
                        .map(|value| aliases(&*value))
                        .unwrap_or_default()
                },
            )
            .await?;

        T::from_cached(&resource).ok_or(RetrievalError::UnexpectedPayload(key))
    }
}
