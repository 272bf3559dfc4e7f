use std::sync::Arc;
use super::{Ability, EvolutionChain, NamedResourceList, Pokemon, PokemonSpecies};

/// Everything the service keeps in its cache, one variant per resource kind.
#[derive(Debug, Clone)]
pub enum CachedResource {
    PokemonList(Arc<NamedResourceList>),
    Pokemon(Arc<Pokemon>),
    Ability(Arc<Ability>),
    Species(Arc<PokemonSpecies>),
    EvolutionChain(Arc<EvolutionChain>),
}

/// A decoded upstream payload that can live in the cache.
pub trait CacheableResource: Sized + Send + Sync + 'static {
    fn into_cached(value: Arc<Self>) -> CachedResource;

    /// `None` when `resource` holds a different kind.
    fn from_cached(resource: &CachedResource) -> Option<Arc<Self>>;

    /// Upstream answered 200 with a zero-value body.
    fn is_empty(&self) -> bool {
        false
    }
}

impl CacheableResource for NamedResourceList {
    fn into_cached(value: Arc<Self>) -> CachedResource {
        CachedResource::PokemonList(value)
    }

    fn from_cached(resource: &CachedResource) -> Option<Arc<Self>> {
        match resource {
            CachedResource::PokemonList(list) => Some(Arc::clone(list)),
            _ => None,
        }
    }
}

impl CacheableResource for Pokemon {
    fn into_cached(value: Arc<Self>) -> CachedResource {
        CachedResource::Pokemon(value)
    }

    fn from_cached(resource: &CachedResource) -> Option<Arc<Self>> {
        match resource {
            CachedResource::Pokemon(pokemon) => Some(Arc::clone(pokemon)),
            _ => None,
        }
    }

    fn is_empty(&self) -> bool {
        self.id == 0 || self.name.is_empty()
    }
}

impl CacheableResource for Ability {
    fn into_cached(value: Arc<Self>) -> CachedResource {
        CachedResource::Ability(value)
    }

    fn from_cached(resource: &CachedResource) -> Option<Arc<Self>> {
        match resource {
            CachedResource::Ability(ability) => Some(Arc::clone(ability)),
            _ => None,
        }
    }

    fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}

impl CacheableResource for PokemonSpecies {
    fn into_cached(value: Arc<Self>) -> CachedResource {
        CachedResource::Species(value)
    }

    fn from_cached(resource: &CachedResource) -> Option<Arc<Self>> {
        match resource {
            CachedResource::Species(species) => Some(Arc::clone(species)),
            _ => None,
        }
    }

    // Without a chain URL the species is useless to the evolutions route.
    fn is_empty(&self) -> bool {
        self.name.is_empty() || self.evolution_chain.url.is_empty()
    }
}

impl CacheableResource for EvolutionChain {
    fn into_cached(value: Arc<Self>) -> CachedResource {
        CachedResource::EvolutionChain(value)
    }

    fn from_cached(resource: &CachedResource) -> Option<Arc<Self>> {
        match resource {
            CachedResource::EvolutionChain(chain) => Some(Arc::clone(chain)),
            _ => None,
        }
    }

    fn is_empty(&self) -> bool {
        self.chain.is_none()
    }
}
