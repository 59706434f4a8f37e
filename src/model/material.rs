use super::record::PropertySet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    #[serde(default)]
    pub property_sets: Vec<PropertySet>,
}

impl Material {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            property_sets: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_property_set(mut self, property_set: PropertySet) -> Self {
        self.property_sets.push(property_set);
        self
    }
}

/// One entry of a constituent set. The constituent may lack a material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constituent {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub material: Option<Material>,
}

/// Target of a material association relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MaterialAssociation {
    Material(Material),
    List { materials: Vec<Material> },
    ConstituentSet { constituents: Vec<Constituent> },
    /// A relation whose target the collaborator could not map.
    Unresolved { entity: String },
}
