//! Deduplication and summary tables.

use crate::model::{round3, Category, Element, MeanKind, Summary, SummaryRow};
use crate::thermal::pipeline::UNKNOWN;
use std::collections::HashSet;

pub const WINDOW_KEY_COLUMNS: &[&str] = &[
    "Type",
    "Frame Material",
    "Glass Material",
    "Width (mm)",
    "Height (mm)",
];
pub const OPAQUE_KEY_COLUMNS: &[&str] = &[
    "Category",
    "Position",
    "Type",
    "Thickness (mm)",
    "U-Value",
];
pub const MASTER_KEY_COLUMNS: &[&str] = &["Category", "Position", "Type"];

type DedupKey = (Category, String, Option<u64>, Option<u64>);

fn principal_dimensions(element: &Element) -> (Option<f64>, Option<f64>) {
    if element.category == Category::Window {
        (element.width_mm, element.height_mm)
    } else {
        (element.thickness_mm, element.area_m2)
    }
}

/// Drops repeated records of the same physical element, keeping the first.
///
/// Two elements are repeats when category, location key and principal
/// dimensions (width/height for windows, thickness/area otherwise) all match.
/// Elements without a known location are never treated as repeats.
#[must_use]
pub fn deduplicate(elements: Vec<Element>) -> Vec<Element> {
    let mut seen: HashSet<DedupKey> = HashSet::new();
    elements
        .into_iter()
        .filter(|element| {
            if element.location_key == UNKNOWN {
                return true;
            }
            let (a, b) = principal_dimensions(element);
            seen.insert((
                element.category,
                element.location_key.clone(),
                a.map(f64::to_bits),
                b.map(f64::to_bits),
            ))
        })
        .collect()
}

fn key_number(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{}", round3(v)))
}

fn key_text(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

fn simple_mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Area-weighted mean U over rows that have a U-value.
///
/// Rows without an area weigh nothing. Falls back to the plain mean when the
/// weights sum to zero.
fn weighted_mean(rows: &[&Element]) -> Option<f64> {
    let valid: Vec<(f64, f64)> = rows
        .iter()
        .filter_map(|e| Some((e.u_value?, e.area_m2.unwrap_or(0.0))))
        .collect();

    let weight: f64 = valid.iter().map(|(_, a)| a).sum();
    if weight > 0.0 {
        Some(valid.iter().map(|(u, a)| u * a).sum::<f64>() / weight)
    } else {
        simple_mean(valid.iter().map(|(u, _)| *u))
    }
}

fn summarize<F>(
    title: &str,
    columns: &[&str],
    mean: MeanKind,
    elements: &[&Element],
    key: F,
) -> Summary
where
    F: Fn(&Element) -> Vec<String>,
{
    let mut groups: Vec<(Vec<String>, Vec<&Element>)> = Vec::new();
    for &element in elements {
        let k = key(element);
        match groups.iter_mut().find(|(existing, _)| *existing == k) {
            Some((_, members)) => members.push(element),
            None => groups.push((k, vec![element])),
        }
    }

    let rows = groups
        .into_iter()
        .map(|(key, members)| SummaryRow {
            key,
            count: members.len(),
            total_area: members.iter().filter_map(|e| e.area_m2).sum(),
            mean_u: match mean {
                MeanKind::Simple => simple_mean(members.iter().filter_map(|e| e.u_value)),
                MeanKind::AreaWeighted => weighted_mean(&members),
            },
        })
        .collect();

    Summary {
        title: title.to_string(),
        key_columns: columns.iter().map(|c| (*c).to_string()).collect(),
        mean,
        rows,
    }
}

#[must_use]
pub fn summarize_windows(elements: &[&Element]) -> Summary {
    summarize("Windows Summary", WINDOW_KEY_COLUMNS, MeanKind::Simple, elements, |e| {
        let assembly = e.assembly.as_ref();
        vec![
            e.type_name.clone(),
            key_text(assembly.and_then(|a| a.frame_material.as_deref())),
            key_text(assembly.and_then(|a| a.glass_material.as_deref())),
            key_number(e.width_mm),
            key_number(e.height_mm),
        ]
    })
}

/// Detail summary for walls or slabs/roofs.
#[must_use]
pub fn summarize_opaque(title: &str, elements: &[&Element]) -> Summary {
    summarize(title, OPAQUE_KEY_COLUMNS, MeanKind::Simple, elements, |e| {
        vec![
            e.category.to_string(),
            e.position.to_string(),
            e.type_name.clone(),
            key_number(e.thickness_mm),
            key_number(e.u_value),
        ]
    })
}

/// Cross-category summary by (category, position, type) with area-weighted U.
#[must_use]
pub fn master_summary(elements: &[Element]) -> Summary {
    let all: Vec<&Element> = elements.iter().collect();
    let mut summary = summarize(
        "Master Summary",
        MASTER_KEY_COLUMNS,
        MeanKind::AreaWeighted,
        &all,
        |e| vec![e.category.to_string(), e.position.to_string(), e.type_name.clone()],
    );
    summary
        .rows
        .sort_by(|a, b| (&a.key[0], &a.key[1]).cmp(&(&b.key[0], &b.key[1])));
    summary
}
