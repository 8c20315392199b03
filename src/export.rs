//! Spreadsheet export of the rate table.

use std::path::{Path, PathBuf};

use anyhow::Result;
use log::info;
use rust_xlsxwriter::Workbook;

use crate::exchange_rate::RateSnapshot;

const EXTENSION: &str = "xlsx";

/// Appends `.xlsx` unless the path already ends with it.
pub fn with_xlsx_extension(path: &Path) -> PathBuf {
    match path.extension() {
        Some(ext) if ext == EXTENSION => path.to_path_buf(),
        _ => {
            let mut name = path.as_os_str().to_owned();
            name.push(".");
            name.push(EXTENSION);
            PathBuf::from(name)
        }
    }
}

/// Writes a header row, then one `(code, rate)` row per currency sorted by code.
/// Returns the path actually written.
pub fn write_rates(snapshot: &RateSnapshot, path: &Path) -> Result<PathBuf> {
    let path = with_xlsx_extension(path);
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.write_string(0, 0, "Currency")?;
    worksheet.write_string(0, 1, "Rate (RUB)")?;
    for (row, (code, rate)) in (1u32..).zip(snapshot.iter()) {
        worksheet.write_string(row, 0, code)?;
        worksheet.write_number(row, 1, rate)?;
    }
    workbook.save(&path)?;

    info!("exported {} rates to {}", snapshot.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn test_extension_appended_once() {
        assert_eq!(
            with_xlsx_extension(Path::new("out/rates")),
            PathBuf::from("out/rates.xlsx")
        );
        assert_eq!(
            with_xlsx_extension(Path::new("out/rates.xlsx")),
            PathBuf::from("out/rates.xlsx")
        );
        assert_eq!(
            with_xlsx_extension(Path::new("rates.2026")),
            PathBuf::from("rates.2026.xlsx")
        );
    }

    #[test]
    fn test_write_rates_creates_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = RateSnapshot::new(
            BTreeMap::from([("USD".to_string(), 81.5), ("EUR".to_string(), 94.4)]),
            None,
        )
        .with_domestic();

        let written = write_rates(&snapshot, &dir.path().join("nested").join("Curss")).unwrap();

        assert_eq!(written, dir.path().join("nested").join("Curss.xlsx"));
        let bytes = std::fs::read(&written).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }
}
