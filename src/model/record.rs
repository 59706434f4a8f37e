use super::material::MaterialAssociation;
use super::mesh::Mesh;
use super::value::PropertyValue;
use serde::{Deserialize, Serialize};

/// Source entity family of an element record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    Window,
    Wall,
    Slab,
    Roof,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: PropertyValue,
}

/// A named bag of attributes attached to an element, its type or a material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySet {
    pub name: String,
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl PropertySet {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            properties: Vec::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<PropertyValue>) -> Self {
        self.properties.push(Property {
            name: name.to_string(),
            value: value.into(),
        });
        self
    }
}

/// Raw element as materialized by the model collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementRecord {
    pub global_id: String,
    #[serde(default)]
    pub name: String,
    pub kind: ElementKind,
    #[serde(default)]
    pub predefined_type: Option<String>,
    #[serde(default)]
    pub overall_width: Option<PropertyValue>,
    #[serde(default)]
    pub overall_height: Option<PropertyValue>,
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub type_property_sets: Vec<PropertySet>,
    #[serde(default)]
    pub property_sets: Vec<PropertySet>,
    #[serde(default)]
    pub materials: Vec<MaterialAssociation>,
    #[serde(default)]
    pub location: Option<[f64; 3]>,
    #[serde(default)]
    pub mesh: Option<Mesh>,
}

impl ElementRecord {
    #[must_use]
    pub fn new(global_id: &str, name: &str, kind: ElementKind) -> Self {
        Self {
            global_id: global_id.to_string(),
            name: name.to_string(),
            kind,
            predefined_type: None,
            overall_width: None,
            overall_height: None,
            type_name: None,
            type_property_sets: Vec::new(),
            property_sets: Vec::new(),
            materials: Vec::new(),
            location: None,
            mesh: None,
        }
    }
}
