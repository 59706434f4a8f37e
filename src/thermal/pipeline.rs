//! Per-element processing and the batch that feeds aggregation.

use crate::config::ThermalConfig;
use crate::error::ElementError;
use crate::model::{
    Category, Element, ElementKind, ElementRecord, SkippedElement, ThermalReport,
};
use crate::thermal::aggregate::{
    deduplicate, master_summary, summarize_opaque, summarize_windows,
};
use crate::thermal::classify::classify;
use crate::thermal::properties::get_merged_properties;
use crate::thermal::uvalue::{compute_opaque, compute_window};

pub const UNKNOWN: &str = "Unknown";

/// Placement rounded to millimeter precision, as `x_y_z`.
#[must_use]
pub fn location_key(location: Option<[f64; 3]>) -> String {
    match location {
        Some(p) if p.iter().all(|c| c.is_finite()) => {
            // adding 0.0 turns -0.0 into 0.0
            let r = |c: f64| (c * 1000.0).round() / 1000.0 + 0.0;
            format!("{}_{}_{}", r(p[0]), r(p[1]), r(p[2]))
        }
        _ => UNKNOWN.to_string(),
    }
}

fn select(elements: &[Element], keep: fn(Category) -> bool) -> Vec<&Element> {
    elements.iter().filter(|e| keep(e.category)).collect()
}

fn to_mm(meters: Option<f64>) -> Option<f64> {
    meters.map(|m| m * 1000.0)
}

/// Turns one raw record into a report element.
///
/// Fails with [`ElementError::InsufficientData`] when neither an area nor a
/// U-value could be resolved; such elements are dropped, never zero-filled.
pub fn process_element(
    record: &ElementRecord,
    config: &ThermalConfig,
) -> Result<Element, ElementError> {
    if record.global_id.trim().is_empty() {
        return Err(ElementError::Malformed {
            id: record.name.clone(),
            message: "missing GlobalId".to_string(),
        });
    }

    let props = get_merged_properties(record);
    let (category, position) = classify(record, &props);

    let mut element = Element {
        global_id: record.global_id.clone(),
        name: record.name.clone(),
        category,
        type_name: record
            .type_name
            .clone()
            .unwrap_or_else(|| UNKNOWN.to_string()),
        position,
        location_key: location_key(record.location),
        width_mm: None,
        height_mm: None,
        thickness_mm: None,
        area_m2: None,
        u_value: None,
        assembly: None,
    };

    match record.kind {
        ElementKind::Window => {
            let values = compute_window(record, &props, config);
            element.width_mm = to_mm(values.width);
            element.height_mm = to_mm(values.height);
            element.area_m2 = values.total_area;
            element.u_value = values.u_value;
            element.assembly = Some(values.assembly);
        }
        ElementKind::Wall | ElementKind::Slab | ElementKind::Roof => {
            let values = compute_opaque(record, &props, config);
            element.thickness_mm = to_mm(values.thickness);
            element.area_m2 = values.area;
            element.u_value = values.u_value;
        }
    }

    if element.area_m2.is_none() && element.u_value.is_none() {
        return Err(ElementError::InsufficientData {
            id: element.global_id,
        });
    }

    Ok(element)
}

/// Processes every record, isolating failures per element, then aggregates.
pub fn process_batch<I>(source: &str, records: I, config: &ThermalConfig) -> ThermalReport
where
    I: IntoIterator<Item = Result<ElementRecord, ElementError>>,
{
    let mut elements = Vec::new();
    let mut skipped = Vec::new();

    for record in records {
        match record.and_then(|r| process_element(&r, config)) {
            Ok(element) => elements.push(element),
            Err(err) => {
                tracing::warn!(element = err.element_id(), "skipping element: {err}");
                skipped.push(SkippedElement::from(&err));
            }
        }
    }

    let processed = elements.len();
    let elements = deduplicate(elements);
    tracing::info!(
        retained = elements.len(),
        duplicates = processed - elements.len(),
        skipped = skipped.len(),
        "processed {source}"
    );

    let windows = summarize_windows(&select(&elements, |c| c == Category::Window));
    let walls = summarize_opaque("Walls Summary", &select(&elements, |c| c == Category::Wall));
    let slabs = summarize_opaque("Slabs Summary", &select(&elements, Category::is_horizontal));

    ThermalReport {
        source: source.to_string(),
        master: master_summary(&elements),
        windows,
        walls,
        slabs,
        elements,
        skipped,
    }
}
