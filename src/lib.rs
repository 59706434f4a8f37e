//! # IFC Thermal
//!
//! Extracts thermal data of building-envelope elements (windows, walls,
//! slabs, roofs) from IFC models and aggregates it into summaries.
//!
//! ## Features
//!
//! - Read IFC files (IFC2x3 and IFC4 schemas) or JSON element records
//! - Normalize lengths and areas given in meters or millimeters
//! - Resolve U-values, falling back to frame/glass window assemblies
//! - Deduplicate repeated records and build area-weighted summaries
//! - Export to CSV and JSON, or browse the report in the terminal
//!
//! ## Example
//!
//! ```no_run
//! use ifc_thermal::config::ThermalConfig;
//! use ifc_thermal::parser::read_model_file;
//! use ifc_thermal::thermal::process_batch;
//!
//! let records = read_model_file("model.ifc").expect("Failed to read model");
//! let report = process_batch("model.ifc", records, &ThermalConfig::default());
//! println!("Elements: {}", report.elements.len());
//! println!("Envelope area: {:.1} m²", report.total_area());
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod parser;
pub mod thermal;
pub mod ui;
