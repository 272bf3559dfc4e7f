use serde::{Deserialize, Serialize};
use super::NamedResource;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub effect_entries: Vec<EffectEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectEntry {
    #[serde(default)]
    pub effect: String,
    pub language: NamedResource,
}

impl Ability {
    /// Copy of this ability keeping only effect entries in `language`.
    pub fn with_effects_in(&self, language: &str) -> Ability {
        Ability {
            name: self.name.clone(),
            effect_entries: self
                .effect_entries
                .iter()
                .filter(|entry| entry.language.name == language)
                .cloned()
                .collect(),
        }
    }
}
