//! In-memory stand-in for PokeAPI used by service and route tests.

use crate::models::{
    Ability, ChainLink, EffectEntry, EvolutionChain, NamedResource, NamedResourceList, OfficialArtwork,
    OtherSprites, Pokemon, PokemonAbility, PokemonSpecies, PokemonType, ResourceLink, Sprites,
};
use crate::services::pokeapi_service::PokeApi;
use crate::utils::error::RetrievalError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

pub const EEVEE_CHAIN_URL: &str = "https://pokeapi.test/api/v2/evolution-chain/67/";

#[derive(Default)]
pub struct FakePokeApi {
    pokemon: Vec<Pokemon>,
    abilities: HashMap<String, Ability>,
    species: HashMap<String, PokemonSpecies>,
    chains: HashMap<String, EvolutionChain>,
    calls: Mutex<HashMap<&'static str, usize>>,
    failure: Mutex<Option<RetrievalError>>,
}

fn named(name: &str) -> NamedResource {
    NamedResource {
        name: name.to_string(),
        url: String::new(),
    }
}

fn pokemon(id: u32, name: &str, height: u32, weight: u32, types: &[&str], abilities: &[&str]) -> Pokemon {
    Pokemon {
        id,
        name: name.to_string(),
        height,
        weight,
        types: types.iter().map(|t| PokemonType { kind: named(t) }).collect(),
        abilities: abilities
            .iter()
            .map(|a| PokemonAbility { ability: named(a) })
            .collect(),
        sprites: Sprites {
            other: OtherSprites {
                official_artwork: OfficialArtwork {
                    front_default: Some(format!("https://img.test/{}.png", id)),
                },
            },
        },
    }
}

fn ability(name: &str, english: &str) -> Ability {
    Ability {
        name: name.to_string(),
        effect_entries: vec![
            EffectEntry {
                effect: format!("Effet de {}", name),
                language: named("fr"),
            },
            EffectEntry {
                effect: english.to_string(),
                language: named("en"),
            },
        ],
    }
}

fn link(name: &str, evolves_to: Vec<ChainLink>) -> ChainLink {
    ChainLink {
        species: named(name),
        evolves_to,
    }
}

impl FakePokeApi {
    pub fn with_sample_data() -> Self {
        let mut fake = FakePokeApi {
            pokemon: vec![
                pokemon(25, "pikachu", 4, 60, &["electric"], &["static", "lightning-rod"]),
                pokemon(133, "eevee", 3, 65, &["normal"], &["run-away", "adaptability", "anticipation"]),
                pokemon(122, "mr-mime", 13, 545, &["psychic", "fairy"], &["soundproof"]),
            ],
            ..FakePokeApi::default()
        };

        for a in [
            ability("static", "Contact may paralyze the attacker."),
            ability("lightning-rod", "Redirects electric moves."),
            ability("run-away", "Guarantees escape from wild battles."),
            ability("adaptability", "Increases STAB to 2x."),
            ability("anticipation", "Senses dangerous moves."),
            ability("soundproof", "Immune to sound-based moves."),
        ] {
            fake.abilities.insert(a.name.clone(), a);
        }

        let eevee = PokemonSpecies {
            id: 133,
            name: "eevee".into(),
            evolution_chain: ResourceLink {
                url: EEVEE_CHAIN_URL.into(),
            },
        };
        fake.species.insert("133".into(), eevee.clone());
        fake.species.insert("eevee".into(), eevee);

        fake.chains.insert(
            EEVEE_CHAIN_URL.into(),
            EvolutionChain {
                chain: Some(link(
                    "eevee",
                    vec![
                        link("vaporeon", vec![]),
                        link("jolteon", vec![]),
                        link("flareon", vec![]),
                    ],
                )),
            },
        );

        fake
    }

    /// Makes every following call fail with `failure`, or succeed again with `None`.
    pub fn fail_with(&self, failure: Option<RetrievalError>) {
        *self.failure.lock().unwrap() = failure;
    }

    pub fn calls(&self, operation: &str) -> usize {
        self.calls.lock().unwrap().get(operation).copied().unwrap_or(0)
    }

    fn record(&self, operation: &'static str) -> Result<(), RetrievalError> {
        *self.calls.lock().unwrap().entry(operation).or_insert(0) += 1;
        match self.failure.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PokeApi for FakePokeApi {
    async fn list_pokemon(&self, limit: u32, offset: u32) -> Result<NamedResourceList, RetrievalError> {
        self.record("list")?;
        let count = 1302;
        Ok(NamedResourceList {
            count,
            next: (offset + limit < count).then(|| format!("next?offset={}", offset + limit)),
            previous: (offset > 0).then(|| format!("previous?offset={}", offset.saturating_sub(limit))),
            results: ["bulbasaur", "ivysaur", "venusaur"].into_iter().map(named).collect(),
        })
    }

    async fn pokemon(&self, identifier: &str) -> Result<Pokemon, RetrievalError> {
        self.record("pokemon")?;
        if identifier == "0" {
            // Upstream quirk: 200 with a zero-value body.
            return Ok(Pokemon::default());
        }
        self.pokemon
            .iter()
            .find(|p| p.name == identifier || p.id.to_string() == identifier)
            .cloned()
            .ok_or_else(|| RetrievalError::NotFound(format!("pokemon/{}", identifier)))
    }

    async fn ability(&self, name: &str) -> Result<Ability, RetrievalError> {
        self.record("ability")?;
        self.abilities
            .get(name)
            .cloned()
            .ok_or_else(|| RetrievalError::NotFound(format!("ability/{}", name)))
    }

    async fn species(&self, identifier: &str) -> Result<PokemonSpecies, RetrievalError> {
        self.record("species")?;
        self.species
            .get(identifier)
            .cloned()
            .ok_or_else(|| RetrievalError::NotFound(format!("pokemon-species/{}", identifier)))
    }

    async fn evolution_chain(&self, url: &str) -> Result<EvolutionChain, RetrievalError> {
        self.record("evolution_chain")?;
        self.chains
            .get(url)
            .cloned()
            .ok_or_else(|| RetrievalError::NotFound(url.to_string()))
    }
}
