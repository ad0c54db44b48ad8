//! CSV record loading.
//!
//! Reads a header-first CSV export into a vector of [`Incident`]
//! records, preserving file order. Column names are taken from the
//! field mapping so exports with renamed headers still load.

use crate::models::Incident;
use csv::ReaderBuilder;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors surfaced while loading the input file.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("input file is not valid UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Which CSV columns hold which incident fields.
#[derive(Debug, Clone)]
pub struct FieldMap {
    pub shift: String,
    pub offense: String,
    pub reported_at: String,
    pub started_at: String,
    pub ended_at: String,
}

impl Default for FieldMap {
    fn default() -> Self {
        Self {
            shift: "SHIFT".to_string(),
            offense: "OFFENSE".to_string(),
            reported_at: "REPORT_DAT".to_string(),
            started_at: "START_DATE".to_string(),
            ended_at: "END_DATE".to_string(),
        }
    }
}

impl From<&crate::config::FieldsConfig> for FieldMap {
    fn from(config: &crate::config::FieldsConfig) -> Self {
        Self {
            shift: config.shift.clone(),
            offense: config.offense.clone(),
            reported_at: config.report.clone(),
            started_at: config.start.clone(),
            ended_at: config.end.clone(),
        }
    }
}

/// Resolved header positions for the mapped fields.
///
/// A column absent from the file resolves to `None`; the records then
/// carry `None` for that field and the aggregator decides whether that
/// is fatal.
struct ColumnIndex {
    shift: Option<usize>,
    offense: Option<usize>,
    reported_at: Option<usize>,
    started_at: Option<usize>,
    ended_at: Option<usize>,
}

impl ColumnIndex {
    fn resolve(headers: &csv::StringRecord, fields: &FieldMap) -> Self {
        let position = |name: &str| headers.iter().position(|h| h == name);

        Self {
            shift: position(&fields.shift),
            offense: position(&fields.offense),
            reported_at: position(&fields.reported_at),
            started_at: position(&fields.started_at),
            ended_at: position(&fields.ended_at),
        }
    }
}

/// Load all incident records from a CSV file.
///
/// The whole file is read into memory (the datasets are modest and the
/// aggregation needs a single complete pass anyway). A UTF-8 byte-order
/// mark before the header is tolerated.
pub fn load_records(path: &Path, fields: &FieldMap) -> Result<Vec<Incident>, LoaderError> {
    let bytes = std::fs::read(path).map_err(|source| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut content = String::from_utf8(bytes)?;

    // Spreadsheet exports commonly prefix a BOM.
    if content.starts_with('\u{feff}') {
        content = content.trim_start_matches('\u{feff}').to_string();
        debug!("stripped UTF-8 BOM from {}", path.display());
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let columns = ColumnIndex::resolve(&headers, fields);
    debug!("resolved {} header columns", headers.len());

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let field = |index: Option<usize>| index.and_then(|i| row.get(i)).map(str::to_string);

        records.push(Incident {
            shift: field(columns.shift),
            offense: field(columns.offense),
            reported_at: field(columns.reported_at),
            started_at: field(columns.started_at),
            ended_at: field(columns.ended_at),
        });
    }

    info!("loaded {} records from {}", records.len(), path.display());
    Ok(records)
}
