pub mod csv;
pub mod json;
pub mod sheet;

pub use crate::error::ExportError;
pub use csv::export_csv_dir;
pub use json::{export_json, to_json};
pub use sheet::{report_sheets, Sheet, SheetRow};
