pub mod pokeapi_service;
pub mod pokedex_service;

#[cfg(test)]
pub mod fake_pokeapi;

pub use pokeapi_service::*;
pub use pokedex_service::*;
