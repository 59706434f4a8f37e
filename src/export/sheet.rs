//! Tabular views of a [`ThermalReport`], shared by the CSV writer and the viewer.

use crate::model::{round3, Element, MeanKind, SkippedElement, Summary, ThermalReport};

/// Placeholder written for absent values.
pub const NULL_CELL: &str = "-";

#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    pub cells: Vec<String>,
    /// `GlobalId` of the element behind a data row.
    pub element_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub title: String,
    /// File name used by the CSV exporter, without extension.
    pub file_stem: &'static str,
    pub headers: Vec<String>,
    pub rows: Vec<SheetRow>,
}

fn number(value: Option<f64>) -> String {
    value.map_or_else(|| NULL_CELL.to_string(), |v| format!("{v}"))
}

fn text(value: Option<&str>) -> String {
    value.unwrap_or(NULL_CELL).to_string()
}

fn headers(columns: &[&str]) -> Vec<String> {
    columns.iter().map(|c| (*c).to_string()).collect()
}

fn summary_sheet(summary: &Summary, file_stem: &'static str) -> Sheet {
    let mut headers = summary.key_columns.clone();
    headers.push("Count".to_string());
    headers.push("Total Area (m²)".to_string());
    headers.push(
        match summary.mean {
            MeanKind::Simple => "Mean U-Value",
            MeanKind::AreaWeighted => "Weighted U-Value",
        }
        .to_string(),
    );

    let rows = summary
        .rows
        .iter()
        .map(|row| {
            let mut cells = row.key.clone();
            cells.push(row.count.to_string());
            cells.push(number(Some(round3(row.total_area))));
            cells.push(number(row.mean_u.map(round3)));
            SheetRow {
                cells,
                element_id: None,
            }
        })
        .collect();

    Sheet {
        title: summary.title.clone(),
        file_stem,
        headers,
        rows,
    }
}

const WINDOW_DATA_COLUMNS: &[&str] = &[
    "GlobalId",
    "Name",
    "Type",
    "Location",
    "Width (mm)",
    "Height (mm)",
    "Area (m²)",
    "U-Value",
    "Frame Material",
    "Glass Material",
    "Frame Width (mm)",
    "Frame Thickness (mm)",
    "Frame k (W/mK)",
    "Frame U",
    "Frame Area (m²)",
    "Glass k (W/mK)",
    "Glass U",
    "Glass Area (m²)",
];

const OPAQUE_DATA_COLUMNS: &[&str] = &[
    "GlobalId",
    "Name",
    "Category",
    "Position",
    "Type",
    "Location",
    "Thickness (mm)",
    "Area (m²)",
    "U-Value",
];

fn window_row(element: &Element) -> SheetRow {
    let e = element.rounded();
    let a = e.assembly.clone().unwrap_or_default();
    let mut cells = vec![
        e.global_id.clone(),
        e.name.clone(),
        e.type_name.clone(),
        e.location_key.clone(),
        number(e.width_mm),
        number(e.height_mm),
        number(e.area_m2),
        number(e.u_value),
    ];
    if e.assembly.is_some() {
        cells.extend([
            text(a.frame_material.as_deref()),
            text(a.glass_material.as_deref()),
            number(a.frame_width.map(|w| round3(w * 1000.0))),
            number(Some(round3(a.frame_thickness * 1000.0))),
            number(Some(a.frame_k)),
            number(a.frame_u),
            number(a.frame_area),
            number(a.glass_k),
            number(Some(a.glass_u)),
            number(a.glass_area),
        ]);
    } else {
        cells.resize(WINDOW_DATA_COLUMNS.len(), NULL_CELL.to_string());
    }
    SheetRow {
        cells,
        element_id: Some(e.global_id),
    }
}

fn opaque_row(element: &Element) -> SheetRow {
    let e = element.rounded();
    SheetRow {
        cells: vec![
            e.global_id.clone(),
            e.name.clone(),
            e.category.to_string(),
            e.position.to_string(),
            e.type_name.clone(),
            e.location_key.clone(),
            number(e.thickness_mm),
            number(e.area_m2),
            number(e.u_value),
        ],
        element_id: Some(e.global_id),
    }
}

fn data_sheet(
    title: &str,
    file_stem: &'static str,
    columns: &[&str],
    elements: &[&Element],
    row: fn(&Element) -> SheetRow,
) -> Sheet {
    Sheet {
        title: title.to_string(),
        file_stem,
        headers: headers(columns),
        rows: elements.iter().map(|e| row(e)).collect(),
    }
}

fn skipped_sheet(skipped: &[SkippedElement]) -> Sheet {
    Sheet {
        title: "Skipped".to_string(),
        file_stem: "skipped",
        headers: headers(&["GlobalId", "Reason"]),
        rows: skipped
            .iter()
            .map(|s| SheetRow {
                cells: vec![s.global_id.clone(), s.reason.clone()],
                element_id: None,
            })
            .collect(),
    }
}

/// All report sheets in display order.
#[must_use]
pub fn report_sheets(report: &ThermalReport) -> Vec<Sheet> {
    vec![
        summary_sheet(&report.master, "master_summary"),
        summary_sheet(&report.walls, "walls_summary"),
        summary_sheet(&report.slabs, "slabs_summary"),
        summary_sheet(&report.windows, "windows_summary"),
        data_sheet(
            "Walls Data",
            "walls_data",
            OPAQUE_DATA_COLUMNS,
            &report.walls_data(),
            opaque_row,
        ),
        data_sheet(
            "Slabs Data",
            "slabs_data",
            OPAQUE_DATA_COLUMNS,
            &report.slabs_data(),
            opaque_row,
        ),
        data_sheet(
            "Windows Data",
            "windows_data",
            WINDOW_DATA_COLUMNS,
            &report.windows_data(),
            window_row,
        ),
        skipped_sheet(&report.skipped),
    ]
}
