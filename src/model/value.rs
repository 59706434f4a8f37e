use serde::{Deserialize, Serialize};
use std::fmt;

/// A property value as delivered by the model collaborator.
///
/// IFC wraps most measures in a defined type (`IFCLENGTHMEASURE(70.)`), which
/// arrives here as [`PropertyValue::Wrapped`]. The wrapper is removed once,
/// when property sets are merged, and never seen downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Wrapped {
        #[serde(rename = "type")]
        value_type: String,
        value: Box<PropertyValue>,
    },
    Boolean(bool),
    Number(f64),
    Text(String),
}

impl PropertyValue {
    #[must_use]
    pub fn wrapped(value_type: &str, value: PropertyValue) -> Self {
        Self::Wrapped {
            value_type: value_type.to_string(),
            value: Box::new(value),
        }
    }

    /// Strips the defined-type wrapper and returns the scalar inside.
    #[must_use]
    pub fn to_scalar(&self) -> AttributeValue {
        match self {
            Self::Wrapped { value, .. } => value.to_scalar(),
            Self::Boolean(b) => AttributeValue::Boolean(*b),
            Self::Number(n) => AttributeValue::Number(*n),
            Self::Text(s) => AttributeValue::Text(s.clone()),
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// An unwrapped scalar attribute, as stored in merged property sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Boolean(bool),
    Number(f64),
    Text(String),
}

impl AttributeValue {
    /// Numeric view of the value. Text is parsed after trimming.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// True for `true`, `1` and `yes` (case-insensitive), and for boolean true.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Boolean(b) => *b,
            Self::Number(n) => *n == 1.0,
            Self::Text(s) => matches!(s.trim().to_lowercase().as_str(), "true" | "1" | "yes"),
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}
