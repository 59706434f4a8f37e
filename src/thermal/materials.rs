//! Material association walk and glazing/frame classification.

use crate::config::ThermalConfig;
use crate::model::{Material, MaterialAssociation};
use crate::thermal::units::{length_from_name, parse_number};
use serde::Serialize;

const GLAZING_TOKENS: &[&str] = &["glass", "glaz"];
const CONDUCTIVITY_TOKENS: &[&str] = &["thermalconductivity", "lambda"];

/// Thicknesses parsed from names outside this range are ignored (m).
const MAX_NAME_THICKNESS: f64 = 1.0;

/// Frame and glazing data found in an element's materials.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MaterialSummary {
    pub frame_name: Option<String>,
    pub frame_k: Option<f64>,
    pub frame_thickness: Option<f64>,
    pub glass_name: Option<String>,
    pub glass_k: Option<f64>,
}

#[must_use]
pub fn is_glazing(name: &str) -> bool {
    let name = name.to_lowercase();
    GLAZING_TOKENS.iter().any(|t| name.contains(t))
}

/// Thermal conductivity from any property set of the material.
///
/// All sets are scanned and the last matching key wins. Non-positive values
/// count as missing.
#[must_use]
pub fn conductivity(material: &Material) -> Option<f64> {
    let mut found = None;
    for set in &material.property_sets {
        for property in &set.properties {
            let key = property.name.to_lowercase();
            if CONDUCTIVITY_TOKENS.iter().any(|t| key.contains(t)) {
                if let Some(k) = parse_number(&property.value.to_scalar()) {
                    found = Some(k);
                }
            }
        }
    }
    found.filter(|k| *k > 0.0)
}

/// Flattens one association into its member materials.
///
/// Returns `None` when the association target could not be resolved.
#[must_use]
pub fn expand_association(association: &MaterialAssociation) -> Option<Vec<&Material>> {
    match association {
        MaterialAssociation::Material(material) => Some(vec![material]),
        MaterialAssociation::List { materials } => Some(materials.iter().collect()),
        MaterialAssociation::ConstituentSet { constituents } => Some(
            constituents
                .iter()
                .filter_map(|c| c.material.as_ref())
                .collect(),
        ),
        MaterialAssociation::Unresolved { .. } => None,
    }
}

/// Walks all associations and classifies each material as glazing or frame.
///
/// The first material of each class names it; a later one only fills in a
/// conductivity (or frame thickness) that is still missing. Any unresolved
/// association yields an empty summary.
#[must_use]
pub fn resolve_materials(
    associations: &[MaterialAssociation],
    config: &ThermalConfig,
) -> MaterialSummary {
    let mut materials = Vec::new();
    for association in associations {
        match expand_association(association) {
            Some(members) => materials.extend(members),
            None => {
                tracing::debug!(?association, "unresolved material association");
                return MaterialSummary::default();
            }
        }
    }

    let mut summary = MaterialSummary::default();
    for material in materials {
        let k = conductivity(material);

        if is_glazing(&material.name) {
            if summary.glass_name.is_none() {
                summary.glass_name = Some(material.name.clone());
            }
            if summary.glass_k.is_none() {
                summary.glass_k = k;
            }
        } else {
            if summary.frame_name.is_none() {
                summary.frame_name = Some(material.name.clone());
            }
            if summary.frame_k.is_none() {
                summary.frame_k = k;
            }
            if summary.frame_thickness.is_none() {
                summary.frame_thickness = length_from_name(&material.name, config)
                    .filter(|t| *t > 0.0 && *t < MAX_NAME_THICKNESS);
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Constituent, PropertySet};
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;

    fn material(name: &str, k: Option<f64>) -> Material {
        let m = Material::new(name);
        match k {
            Some(k) => m.with_property_set(
                PropertySet::new("Pset_MaterialThermal").with("ThermalConductivity", k),
            ),
            None => m,
        }
    }

    #[test]
    fn constituent_set_splits_frame_and_glass() {
        let association = MaterialAssociation::ConstituentSet {
            constituents: vec![
                Constituent {
                    name: Some("Framing".into()),
                    material: Some(material("Timber 70mm", Some(0.13))),
                },
                Constituent {
                    name: Some("Glazing".into()),
                    material: Some(material("Double Glazing", Some(1.1))),
                },
                Constituent {
                    name: Some("Empty".into()),
                    material: None,
                },
            ],
        };

        let summary = resolve_materials(&[association], &ThermalConfig::default());

        assert_eq!(summary.frame_name.as_deref(), Some("Timber 70mm"));
        assert_eq!(summary.frame_k, Some(0.13));
        assert_relative_eq!(summary.frame_thickness.unwrap(), 0.07);
        assert_eq!(summary.glass_name.as_deref(), Some("Double Glazing"));
        assert_eq!(summary.glass_k, Some(1.1));
    }

    #[test]
    fn later_glazing_fills_missing_k_only() {
        let association = MaterialAssociation::List {
            materials: vec![
                material("Glass outer", None),
                material("Glass inner", Some(0.9)),
                material("Glass spare", Some(3.0)),
            ],
        };

        let summary = resolve_materials(&[association], &ThermalConfig::default());

        assert_eq!(summary.glass_name.as_deref(), Some("Glass outer"));
        assert_eq!(summary.glass_k, Some(0.9));
    }

    #[test]
    fn last_conductivity_key_wins() {
        let m = Material::new("Aluminium")
            .with_property_set(PropertySet::new("A").with("Lambda", 200.0))
            .with_property_set(PropertySet::new("B").with("ThermalConductivity", 160.0));
        assert_eq!(conductivity(&m), Some(160.0));
    }

    #[test]
    fn unresolved_association_yields_empty_summary() {
        let associations = [
            MaterialAssociation::Material(material("Oak", Some(0.15))),
            MaterialAssociation::Unresolved {
                entity: "IFCMATERIALPROFILESETUSAGE".into(),
            },
        ];

        let summary = resolve_materials(&associations, &ThermalConfig::default());
        assert_eq!(summary, MaterialSummary::default());
    }

    #[test]
    fn implausible_name_thickness_is_ignored() {
        let association = MaterialAssociation::Material(material("Aluminium 6063", None));
        let summary = resolve_materials(&[association], &ThermalConfig::default());
        assert_eq!(summary.frame_thickness, None);
    }

    #[test]
    fn glazing_tokens() {
        assert!(is_glazing("Float GLASS 4mm"));
        assert!(is_glazing("Triple glazing"));
        assert!(!is_glazing("PVC"));
    }
}
