use ifc_thermal::config::ThermalConfig;
use ifc_thermal::export::{export_csv_dir, export_json};
use ifc_thermal::model::{
    ElementKind, ElementRecord, Material, MaterialAssociation, PropertySet, PropertyValue,
};
use ifc_thermal::thermal::process_batch;
use pretty_assertions::assert_eq;
use std::path::PathBuf;

fn output_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir()
        .join(format!("ifc-thermal-export-{}-{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn records() -> Vec<Result<ElementRecord, ifc_thermal::error::ElementError>> {
    let mut window = ElementRecord::new("win-1", "Window", ElementKind::Window);
    window.overall_width = Some(PropertyValue::Text("1000mm".into()));
    window.overall_height = Some(PropertyValue::Number(1.0));
    window.materials = vec![MaterialAssociation::Material(Material::new("Aluminium"))];

    let mut wall = ElementRecord::new("wall-1", "Wall", ElementKind::Wall);
    wall.type_name = Some("Brick 250".into());
    wall.property_sets = vec![PropertySet::new("Dimensions")
        .with("Area", 7.123_456)
        .with("ThermalTransmittance", 0.333_333)];

    vec![
        Ok(window),
        Ok(wall),
        Ok(ElementRecord::new("empty", "Slab", ElementKind::Slab)),
    ]
}

fn read_csv(path: &std::path::Path) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .unwrap();
    reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}

#[test]
fn csv_directory_has_one_file_per_sheet() {
    let report = process_batch("model.json", records(), &ThermalConfig::default());
    let dir = output_dir("sheets");

    let written = export_csv_dir(&report, &dir).unwrap();

    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "master_summary.csv",
            "walls_summary.csv",
            "slabs_summary.csv",
            "windows_summary.csv",
            "walls_data.csv",
            "slabs_data.csv",
            "windows_data.csv",
            "skipped.csv",
        ]
    );

    let walls = read_csv(&dir.join("walls_data.csv"));
    assert_eq!(walls[0][0], "GlobalId");
    assert_eq!(
        walls[1],
        vec!["wall-1", "Wall", "Wall", "Internal", "Brick 250", "Unknown", "-", "7.123", "0.333"]
    );

    // header only
    assert_eq!(read_csv(&dir.join("slabs_data.csv")).len(), 1);

    let skipped = read_csv(&dir.join("skipped.csv"));
    assert_eq!(skipped[1][0], "empty");
}

#[test]
fn window_rows_use_fallback_split() {
    let report = process_batch("model.json", records(), &ThermalConfig::default());
    let dir = output_dir("windows");
    export_csv_dir(&report, &dir).unwrap();

    let windows = read_csv(&dir.join("windows_data.csv"));
    let header = &windows[0];
    let row = &windows[1];
    let cell = |name: &str| {
        let index = header.iter().position(|h| h == name).unwrap();
        row[index].as_str()
    };

    assert_eq!(cell("Width (mm)"), "1000");
    assert_eq!(cell("Area (m²)"), "1");
    assert_eq!(cell("Frame Material"), "Aluminium");
    assert_eq!(cell("Glass Material"), "-");
    assert_eq!(cell("Frame Area (m²)"), "0.15");
    assert_eq!(cell("Glass Area (m²)"), "0.85");
    // (1.2 * 0.85 + 0.17 / 0.07 * 0.15) / 1
    assert_eq!(cell("U-Value"), "1.384");
}

#[test]
fn json_report_is_written() {
    let report = process_batch("model.json", records(), &ThermalConfig::default());
    let dir = output_dir("json");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("report.json");

    export_json(&report, &path).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["elements"].as_array().unwrap().len(), 2);
    assert_eq!(value["skipped"][0]["global_id"], "empty");
    assert_eq!(value["master"]["mean"], "AreaWeighted");
}
