use serde::{Deserialize, Serialize};

/// A `{ name, url }` reference to another upstream resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedResource {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing)]
    pub url: String,
}

/// A bare `{ url }` reference, used where upstream links without a name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceLink {
    #[serde(default)]
    pub url: String,
}

/// One page of a paginated upstream listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedResourceList {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub results: Vec<NamedResource>,
}
