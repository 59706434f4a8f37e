pub mod ifc;
pub mod json;
pub mod step;

pub use crate::error::ParseError;
pub use ifc::{extract_elements, read_ifc_file};
pub use json::{parse_records, read_records_file};
pub use step::{StepEntity, StepFile, StepValue};

use crate::error::ElementError;
use crate::model::ElementRecord;
use std::path::Path;

/// Reads a building model, picking the reader from the file extension.
///
/// `.ifc` files go through the STEP reader, `.json` files are decoded as
/// element records.
pub fn read_model_file<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<Result<ElementRecord, ElementError>>, ParseError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("ifc") => read_ifc_file(path),
        Some("json") => read_records_file(path),
        _ => Err(ParseError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}
