use crate::error::ExportError;
use crate::export::sheet::{report_sheets, Sheet};
use crate::model::ThermalReport;
use std::fs::File;
use std::path::{Path, PathBuf};

fn write_sheet(sheet: &Sheet, path: &Path) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|source| ExportError::FileCreate {
        path: path.to_path_buf(),
        source,
    })?;

    let mut writer = csv::Writer::from_writer(file);

    writer.write_record(&sheet.headers)?;
    for row in &sheet.rows {
        writer.write_record(&row.cells)?;
    }

    writer.flush().map_err(|e| ExportError::WriteError {
        message: e.to_string(),
    })?;

    Ok(())
}

/// Writes one CSV file per report sheet into `dir`, creating it if needed.
///
/// Returns the written paths in sheet order.
pub fn export_csv_dir<P: AsRef<Path>>(
    report: &ThermalReport,
    dir: P,
) -> Result<Vec<PathBuf>, ExportError> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir).map_err(|source| ExportError::FileCreate {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut written = Vec::new();
    for sheet in report_sheets(report) {
        let path = dir.join(format!("{}.csv", sheet.file_stem));
        write_sheet(&sheet, &path)?;
        tracing::debug!(path = %path.display(), rows = sheet.rows.len(), "wrote sheet");
        written.push(path);
    }

    Ok(written)
}
