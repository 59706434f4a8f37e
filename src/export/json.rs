use crate::error::ExportError;
use crate::model::{Element, SkippedElement, Summary, ThermalReport};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Report with element and summary values rounded for output.
#[derive(Serialize)]
struct RoundedReport<'a> {
    source: &'a str,
    elements: Vec<Element>,
    skipped: &'a [SkippedElement],
    master: Summary,
    windows: Summary,
    walls: Summary,
    slabs: Summary,
}

pub fn to_json(report: &ThermalReport) -> Result<String, ExportError> {
    let rounded = RoundedReport {
        source: &report.source,
        elements: report.elements.iter().map(Element::rounded).collect(),
        skipped: &report.skipped,
        master: report.master.rounded(),
        windows: report.windows.rounded(),
        walls: report.walls.rounded(),
        slabs: report.slabs.rounded(),
    };
    Ok(serde_json::to_string_pretty(&rounded)?)
}

pub fn export_json<P: AsRef<Path>>(report: &ThermalReport, path: P) -> Result<(), ExportError> {
    let path_ref = path.as_ref();
    let json = to_json(report)?;

    let mut file = File::create(path_ref).map_err(|source| ExportError::FileCreate {
        path: path_ref.to_path_buf(),
        source,
    })?;

    file.write_all(json.as_bytes())
        .map_err(|e| ExportError::WriteError {
            message: e.to_string(),
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ThermalConfig;
    use crate::model::{ElementKind, ElementRecord, PropertySet};
    use crate::thermal::process_batch;

    #[test]
    fn elements_are_rounded_in_json() {
        let mut record = ElementRecord::new("w1", "Wall", ElementKind::Wall);
        record.property_sets = vec![PropertySet::new("Dimensions")
            .with("Area", 10.123_456)
            .with("ThermalTransmittance", 0.234_567)];
        let report = process_batch("test.json", vec![Ok(record)], &ThermalConfig::default());

        let value: serde_json::Value = serde_json::from_str(&to_json(&report).unwrap()).unwrap();

        assert_eq!(value["source"], "test.json");
        assert_eq!(value["elements"][0]["area_m2"], 10.123);
        assert_eq!(value["elements"][0]["u_value"], 0.235);
        assert_eq!(value["walls"]["rows"][0]["count"], 1);
    }

    #[test]
    fn summaries_are_rounded_in_json() {
        let mut record = ElementRecord::new("w1", "Wall", ElementKind::Wall);
        record.property_sets = vec![PropertySet::new("Dimensions")
            .with("Area", 10.123_456)
            .with("ThermalTransmittance", 0.234_567)];
        let report = process_batch("test.json", vec![Ok(record)], &ThermalConfig::default());

        let value: serde_json::Value = serde_json::from_str(&to_json(&report).unwrap()).unwrap();

        for summary in ["master", "walls"] {
            assert_eq!(value[summary]["rows"][0]["total_area"], 10.123);
            assert_eq!(value[summary]["rows"][0]["mean_u"], 0.235);
        }
    }
}
