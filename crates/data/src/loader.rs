//! Delimited-file ingestion for per-store daily records.
//!
//! Input columns (exact header names): `Date`, `Product Name`, `Amount Sold`,
//! `Visible Stock`, `Inventory`. Dates use the day-first convention. Files may
//! carry Latin-family non-UTF8 text; decoding falls back to Latin-1.

use std::path::Path;

use chrono::NaiveDate;

use shelfcast_core::{DailyRecord, DomainError, DomainResult, ProductName};

const COL_DATE: &str = "Date";
const COL_PRODUCT: &str = "Product Name";
const COL_SOLD: &str = "Amount Sold";
const COL_VISIBLE: &str = "Visible Stock";
const COL_INVENTORY: &str = "Inventory";

/// Day-first formats accepted for the `Date` column.
const DATE_FORMATS: &[&str] = &["%d-%m-%Y", "%d/%m/%Y", "%d.%m.%Y", "%d-%m-%y", "%d/%m/%y"];

/// Load one or more per-store files, concatenated in file order.
///
/// Rows with a missing or unparseable field in any column are dropped. Fails
/// with [`DomainError::DataUnavailable`] if no readable rows remain across all
/// files, and with [`DomainError::Ingest`] if a file cannot be read or lacks a
/// required column.
pub fn load<P: AsRef<Path>>(file_paths: &[P]) -> DomainResult<Vec<DailyRecord>> {
    let mut records = Vec::new();

    for path in file_paths {
        let path = path.as_ref();
        tracing::info!(file = %path.display(), "loading store data");
        let before = records.len();
        load_file(path, &mut records)?;
        tracing::debug!(
            file = %path.display(),
            rows = records.len() - before,
            "file ingested"
        );
    }

    if records.is_empty() {
        return Err(DomainError::DataUnavailable);
    }
    Ok(records)
}

fn load_file(path: &Path, out: &mut Vec<DailyRecord>) -> DomainResult<()> {
    let bytes = std::fs::read(path)
        .map_err(|e| DomainError::ingest(format!("{}: {e}", path.display())))?;
    let text = decode_latin_tolerant(&bytes);

    let mut lines = text.lines();
    let header = lines
        .next()
        .ok_or_else(|| DomainError::ingest(format!("{}: empty file", path.display())))?;
    let columns = ColumnIndex::from_header(header, path)?;

    let mut dropped = 0usize;
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        match columns.parse_row(line) {
            Some(record) => out.push(record),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        tracing::warn!(
            file = %path.display(),
            dropped,
            "dropped rows with missing or malformed fields"
        );
    }
    Ok(())
}

/// Decode as UTF-8 when valid, otherwise as Latin-1.
///
/// Latin-1 maps each byte to the code point of the same value, so the fallback
/// never fails; it mirrors reading the source files with a `latin1` codec.
fn decode_latin_tolerant(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Positions of the required columns within a file's header.
struct ColumnIndex {
    date: usize,
    product: usize,
    sold: usize,
    visible: usize,
    inventory: usize,
}

impl ColumnIndex {
    fn from_header(header: &str, path: &Path) -> DomainResult<Self> {
        let names: Vec<&str> = header.split(',').map(str::trim).collect();
        let find = |name: &str| -> DomainResult<usize> {
            names.iter().position(|n| *n == name).ok_or_else(|| {
                DomainError::ingest(format!("{}: missing column {name:?}", path.display()))
            })
        };
        Ok(Self {
            date: find(COL_DATE)?,
            product: find(COL_PRODUCT)?,
            sold: find(COL_SOLD)?,
            visible: find(COL_VISIBLE)?,
            inventory: find(COL_INVENTORY)?,
        })
    }

    /// Parse one data row; `None` drops the row (missing/malformed field).
    fn parse_row(&self, line: &str) -> Option<DailyRecord> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let field = |idx: usize| -> Option<&str> {
            let v = *fields.get(idx)?;
            if v.is_empty() { None } else { Some(v) }
        };

        let date = parse_day_first(field(self.date)?)?;
        let product_name = ProductName::from(field(self.product)?);
        let amount_sold = field(self.sold)?.parse::<f64>().ok()?;
        let visible_stock = field(self.visible)?.parse::<f64>().ok()?;
        let inventory_stock = field(self.inventory)?.parse::<f64>().ok()?;

        Some(DailyRecord {
            date,
            product_name,
            amount_sold,
            visible_stock,
            inventory_stock,
        })
    }
}

fn parse_day_first(s: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}
