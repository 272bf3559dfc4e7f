use serde::{Deserialize, Serialize};
use super::{NamedResource, ResourceLink};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pokemon {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    /// Decimetres.
    #[serde(default)]
    pub height: u32,
    /// Hectograms.
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub types: Vec<PokemonType>,
    #[serde(default)]
    pub abilities: Vec<PokemonAbility>,
    #[serde(default)]
    pub sprites: Sprites,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PokemonType {
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PokemonAbility {
    pub ability: NamedResource,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sprites {
    #[serde(default)]
    pub other: OtherSprites,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OtherSprites {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: OfficialArtwork,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OfficialArtwork {
    #[serde(default)]
    pub front_default: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PokemonSpecies {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub evolution_chain: ResourceLink,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvolutionChain {
    #[serde(default)]
    pub chain: Option<ChainLink>,
}

/// A node of the evolution tree: a species and everything it evolves into.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainLink {
    pub species: NamedResource,
    #[serde(default)]
    pub evolves_to: Vec<ChainLink>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_upstream_pokemon_shape() {
        let body = serde_json::json!({
            "id": 25,
            "name": "pikachu",
            "height": 4,
            "weight": 60,
            "base_experience": 112,
            "types": [{ "slot": 1, "type": { "name": "electric", "url": "https://pokeapi.co/api/v2/type/13/" } }],
            "abilities": [
                { "ability": { "name": "static", "url": "https://pokeapi.co/api/v2/ability/9/" }, "is_hidden": false },
                { "ability": { "name": "lightning-rod", "url": "https://pokeapi.co/api/v2/ability/31/" }, "is_hidden": true }
            ],
            "sprites": { "other": { "official-artwork": { "front_default": "https://img/25.png" } } }
        });

        let pokemon: Pokemon = serde_json::from_value(body).unwrap();

        assert_eq!(pokemon.id, 25);
        assert_eq!(pokemon.types[0].kind.name, "electric");
        assert_eq!(pokemon.abilities[1].ability.name, "lightning-rod");
        assert_eq!(pokemon.sprites.other.official_artwork.front_default.as_deref(), Some("https://img/25.png"));
    }

    #[test]
    fn serializes_types_without_upstream_urls() {
        let kind = PokemonType {
            kind: NamedResource { name: "grass".into(), url: "https://pokeapi.co/api/v2/type/12/".into() },
        };

        assert_eq!(serde_json::to_value(&kind).unwrap(), serde_json::json!({ "type": { "name": "grass" } }));
    }

    #[test]
    fn decodes_nested_evolution_chain() {
        let body = serde_json::json!({
            "id": 67,
            "chain": {
                "species": { "name": "eevee", "url": "" },
                "evolves_to": [
                    { "species": { "name": "vaporeon", "url": "" }, "evolves_to": [] },
                    { "species": { "name": "jolteon", "url": "" }, "evolves_to": [] }
                ]
            }
        });

        let chain: EvolutionChain = serde_json::from_value(body).unwrap();
        let root = chain.chain.unwrap();

        assert_eq!(root.species.name, "eevee");
        assert_eq!(root.evolves_to.len(), 2);
        assert_eq!(root.evolves_to[1].species.name, "jolteon");
    }
}
