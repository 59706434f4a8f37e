//! Areas, thicknesses and U-values per element family.
//!
//! Opaque elements only ever report an explicit transmittance. Windows get a
//! composite value from a frame/glass area split:
//!
//! ```text
//! U = (U_glass * A_glass + U_frame * A_frame) / A_total
//! U_frame = k_frame / t_frame
//! ```

use crate::config::ThermalConfig;
use crate::model::{ElementKind, ElementRecord, PropertyValue, WindowAssembly};
use crate::thermal::geometry::estimate_upward_area;
use crate::thermal::materials::resolve_materials;
use crate::thermal::properties::MergedProperties;
use crate::thermal::units::{normalize_area, normalize_length, parse_number};

pub const TRANSMITTANCE_KEYS: &[&str] = &[
    "ThermalTransmittance",
    "Heat Transfer Coefficient (U)",
    "U Value",
];
const WALL_THICKNESS_KEYS: &[&str] = &["Width", "Thickness"];
const WALL_AREA_KEYS: &[&str] = &["Area", "NetSideArea"];
const WALL_FALLBACK_AREA_KEYS: &[&str] = &["NetSideArea", "Area"];
const SLAB_THICKNESS_KEYS: &[&str] = &["Thickness", "Width", "Depth"];
const SLAB_AREA_KEYS: &[&str] = &["Area", "NetArea"];
const VOLUME_KEYS: &[&str] = &["NetVolume", "Volume"];
const FRAME_WIDTH_KEYS: &[&str] = &["FrameWidth", "Frame Width"];
const DIMENSIONS_SET: &str = "Dimensions";
const QUANTITIES_SET: &str = "Quantities";

/// Resolved quantities of a wall, slab or roof.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpaqueValues {
    pub thickness: Option<f64>,
    pub area: Option<f64>,
    pub u_value: Option<f64>,
}

/// Resolved quantities of a window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowValues {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub total_area: Option<f64>,
    pub assembly: WindowAssembly,
    pub u_value: Option<f64>,
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

/// Explicit transmittance property, if any. Nothing is derived from layers.
#[must_use]
pub fn explicit_u_value(props: &MergedProperties) -> Option<f64> {
    positive(props.find(TRANSMITTANCE_KEYS, None).and_then(parse_number))
}

#[must_use]
pub fn compute_opaque(
    record: &ElementRecord,
    props: &MergedProperties,
    config: &ThermalConfig,
) -> OpaqueValues {
    let (thickness_keys, area_keys, fallback_area_keys) = match record.kind {
        ElementKind::Wall => (WALL_THICKNESS_KEYS, WALL_AREA_KEYS, WALL_FALLBACK_AREA_KEYS),
        _ => (SLAB_THICKNESS_KEYS, SLAB_AREA_KEYS, SLAB_AREA_KEYS),
    };

    let thickness = positive(
        props
            .find(thickness_keys, None)
            .and_then(|v| normalize_length(v, config)),
    );

    let explicit_area = positive(
        props
            .find(area_keys, Some(DIMENSIONS_SET))
            .and_then(normalize_area),
    )
    .or_else(|| positive(props.find(fallback_area_keys, None).and_then(normalize_area)));

    let area = explicit_area
        .or_else(|| {
            let volume = positive(props.find(VOLUME_KEYS, None).and_then(parse_number))?;
            Some(volume / thickness?)
        })
        .or_else(|| match record.kind {
            ElementKind::Slab | ElementKind::Roof => estimate_upward_area(record.mesh.as_ref()),
            ElementKind::Wall | ElementKind::Window => None,
        });

    OpaqueValues {
        thickness,
        area,
        u_value: explicit_u_value(props),
    }
}

/// `k / t`, or `None` for a non-positive thickness.
#[must_use]
pub fn frame_u_value(conductivity: f64, thickness: f64) -> Option<f64> {
    if thickness > 0.0 {
        Some(conductivity / thickness)
    } else {
        None
    }
}

/// Glazing conductivity inside the plausible band, else the configured default.
#[must_use]
pub fn glass_u_value(glass_k: Option<f64>, config: &ThermalConfig) -> f64 {
    match glass_k {
        Some(k) if k > config.glass_u_min && k < config.glass_u_max => k,
        _ => config.glass_u,
    }
}

/// Splits the total window area into `(glass, frame)`.
///
/// With a known frame width and both dimensions the glazed part is the
/// inner rectangle; otherwise the configured frame fraction applies.
#[must_use]
pub fn split_window_area(
    total_area: f64,
    width: Option<f64>,
    height: Option<f64>,
    frame_width: Option<f64>,
    config: &ThermalConfig,
) -> (f64, f64) {
    if let (Some(w), Some(h), Some(fw)) = (width, height, frame_width) {
        let glass = (w - 2.0 * fw).max(0.0) * (h - 2.0 * fw).max(0.0);
        let frame = (total_area - glass).max(0.0);
        (glass, frame)
    } else {
        let frame = total_area * config.frame_area_fraction;
        (total_area - frame, frame)
    }
}

/// Area-weighted combination of glass and frame U-values.
#[must_use]
pub fn window_u_value(
    glass_u: f64,
    glass_area: f64,
    frame_u: Option<f64>,
    frame_area: f64,
    total_area: f64,
) -> Option<f64> {
    let frame_u = frame_u?;
    if total_area > 0.0 {
        Some((glass_u * glass_area + frame_u * frame_area) / total_area)
    } else {
        None
    }
}

#[must_use]
pub fn compute_window(
    record: &ElementRecord,
    props: &MergedProperties,
    config: &ThermalConfig,
) -> WindowValues {
    let dimension = |raw: Option<&PropertyValue>| {
        positive(raw.and_then(|v| normalize_length(&v.to_scalar(), config)))
    };
    let width = dimension(record.overall_width.as_ref());
    let height = dimension(record.overall_height.as_ref());

    let total_area = match (width, height) {
        (Some(w), Some(h)) => Some(w * h),
        _ => [DIMENSIONS_SET, QUANTITIES_SET].into_iter().find_map(|set| {
            positive(props.find(&["Area"], Some(set)).and_then(normalize_area))
        }),
    };

    let frame_width = positive(
        props
            .find(FRAME_WIDTH_KEYS, None)
            .and_then(|v| normalize_length(v, config)),
    );

    let materials = resolve_materials(&record.materials, config);
    let frame_thickness = materials.frame_thickness.unwrap_or(config.frame_thickness);
    let frame_k = materials.frame_k.unwrap_or(config.frame_conductivity);
    let frame_u = frame_u_value(frame_k, frame_thickness);
    let glass_u = glass_u_value(materials.glass_k, config);

    let split = total_area.map(|total| split_window_area(total, width, height, frame_width, config));
    let u_value = match (total_area, split) {
        (Some(total), Some((glass_area, frame_area))) => {
            window_u_value(glass_u, glass_area, frame_u, frame_area, total)
        }
        _ => None,
    };

    WindowValues {
        width,
        height,
        total_area,
        assembly: WindowAssembly {
            frame_material: materials.frame_name,
            glass_material: materials.glass_name,
            frame_width,
            frame_thickness,
            frame_k,
            frame_u,
            frame_area: split.map(|(_, frame)| frame),
            glass_k: materials.glass_k,
            glass_u,
            glass_area: split.map(|(glass, _)| glass),
        },
        u_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Material, MaterialAssociation, Mesh, PropertySet};
    use crate::thermal::properties::get_merged_properties;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;

    fn window(width: f64, height: f64) -> ElementRecord {
        let mut record = ElementRecord::new("w1", "Window", ElementKind::Window);
        record.overall_width = Some(PropertyValue::Number(width));
        record.overall_height = Some(PropertyValue::Number(height));
        record
    }

    #[test]
    fn window_with_frame_width_uses_inner_rectangle() {
        let mut record = window(1200.0, 1500.0);
        record.property_sets = vec![PropertySet::new("Construction").with("Frame Width", "70mm")];
        record.materials = vec![MaterialAssociation::List {
            materials: vec![
                Material::new("Timber").with_property_set(
                    PropertySet::new("Thermal").with("ThermalConductivity", 0.17),
                ),
                Material::new("Glass").with_property_set(
                    PropertySet::new("Thermal").with("ThermalConductivity", 1.1),
                ),
            ],
        }];
        let config = ThermalConfig::default();
        let props = get_merged_properties(&record);

        let values = compute_window(&record, &props, &config);

        assert_relative_eq!(values.total_area.unwrap(), 1.8, epsilon = 1e-9);
        assert_relative_eq!(values.assembly.glass_area.unwrap(), 1.4416, epsilon = 1e-9);
        assert_relative_eq!(values.assembly.frame_area.unwrap(), 0.3584, epsilon = 1e-9);
        assert_relative_eq!(values.assembly.frame_u.unwrap(), 0.17 / 0.07, epsilon = 1e-9);
        assert_relative_eq!(values.u_value.unwrap(), 1.3645, epsilon = 1e-3);
    }

    #[test]
    fn window_without_frame_width_uses_fixed_split() {
        let record = window(1000.0, 1000.0);
        let config = ThermalConfig::default();
        let values = compute_window(&record, &get_merged_properties(&record), &config);

        assert_relative_eq!(values.assembly.frame_area.unwrap(), 0.15, epsilon = 1e-12);
        assert_relative_eq!(values.assembly.glass_area.unwrap(), 0.85, epsilon = 1e-12);
        let expected = 1.2 * 0.85 + (0.17 / 0.07) * 0.15;
        assert_relative_eq!(values.u_value.unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn window_area_from_dimensions_set() {
        let mut record = ElementRecord::new("w2", "Window", ElementKind::Window);
        record.property_sets = vec![PropertySet::new("Dimensions").with("Area", 2.0)];
        let config = ThermalConfig::default();

        let values = compute_window(&record, &get_merged_properties(&record), &config);

        assert_eq!(values.width, None);
        assert_eq!(values.total_area, Some(2.0));
        assert!(values.u_value.is_some());
    }

    #[test]
    fn window_without_any_area_has_no_u_value() {
        let record = ElementRecord::new("w3", "Window", ElementKind::Window);
        let config = ThermalConfig::default();
        let values = compute_window(&record, &get_merged_properties(&record), &config);

        assert_eq!(values.total_area, None);
        assert_eq!(values.u_value, None);
        assert_eq!(values.assembly.glass_area, None);
    }

    #[test]
    fn implausible_glass_k_falls_back_to_default() {
        let config = ThermalConfig::default();
        assert_eq!(glass_u_value(Some(0.8), &config), 0.8);
        assert_eq!(glass_u_value(Some(5.8), &config), 1.2);
        assert_eq!(glass_u_value(Some(3.5), &config), 1.2);
        assert_eq!(glass_u_value(None, &config), 1.2);
    }

    #[test]
    fn frame_u_needs_positive_thickness() {
        assert_eq!(frame_u_value(0.17, 0.0), None);
        assert_relative_eq!(frame_u_value(0.2, 0.05).unwrap(), 4.0);
    }

    #[test]
    fn oversized_frame_width_leaves_no_glass() {
        let config = ThermalConfig::default();
        let (glass, frame) = split_window_area(0.25, Some(0.5), Some(0.5), Some(0.3), &config);
        assert_eq!(glass, 0.0);
        assert_eq!(frame, 0.25);
    }

    #[test]
    fn wall_area_from_volume_and_no_u_value() {
        let mut record = ElementRecord::new("wall", "Wall", ElementKind::Wall);
        record.property_sets = vec![PropertySet::new("Qto_WallBaseQuantities")
            .with("Width", 0.2)
            .with("NetVolume", 10.0)];
        let config = ThermalConfig::default();

        let values = compute_opaque(&record, &get_merged_properties(&record), &config);

        assert_relative_eq!(values.thickness.unwrap(), 0.2);
        assert_relative_eq!(values.area.unwrap(), 50.0);
        assert_eq!(values.u_value, None);
    }

    #[test]
    fn dimensions_area_is_preferred() {
        let mut record = ElementRecord::new("wall", "Wall", ElementKind::Wall);
        record.property_sets = vec![
            PropertySet::new("Qto_WallBaseQuantities").with("NetSideArea", 9.0),
            PropertySet::new("Dimensions").with("Area", 12.0),
            PropertySet::new("Pset_WallCommon").with("ThermalTransmittance", 0.28),
        ];
        let config = ThermalConfig::default();

        let values = compute_opaque(&record, &get_merged_properties(&record), &config);

        assert_eq!(values.area, Some(12.0));
        assert_eq!(values.u_value, Some(0.28));
    }

    #[test]
    fn roof_area_from_mesh() {
        let mut record = ElementRecord::new("roof", "Roof", ElementKind::Roof);
        record.mesh = Some(Mesh {
            vertices: vec![
                [0.0, 0.0, 3.0],
                [1.0, 0.0, 3.0],
                [1.0, 1.0, 3.0],
                [0.0, 1.0, 3.0],
            ],
            faces: vec![[0, 1, 2], [0, 2, 3]],
        });
        let config = ThermalConfig::default();

        let values = compute_opaque(&record, &get_merged_properties(&record), &config);

        assert_relative_eq!(values.area.unwrap(), 1.0);
    }

    #[test]
    fn walls_never_use_the_mesh() {
        let mut record = ElementRecord::new("wall", "Wall", ElementKind::Wall);
        record.mesh = Some(Mesh {
            vertices: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            faces: vec![[0, 1, 2]],
        });
        let config = ThermalConfig::default();

        let values = compute_opaque(&record, &get_merged_properties(&record), &config);
        assert_eq!(values.area, None);
    }
}
