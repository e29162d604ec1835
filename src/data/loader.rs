use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use arrow::array::Array;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::reader::ChunkReader;
use serde_json::Value as JsonValue;

use super::model::{Dataset, Record};
use crate::config::DashboardConfig;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a dataset could not be loaded. Individual undecodable rows are not
/// errors; they are skipped and counted in [`Dataset::skipped_rows`].
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("required column '{0}' not found")]
    MissingColumn(String),
    #[error("expected a top-level JSON array of records")]
    NotAnArray,
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a case dataset from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row; age and race columns located by name
/// * `.json`    – `[{ "age_group": "...", "race_ethnicity_combined": "..." }, ...]`
/// * `.parquet` – any column types; values are rendered as text
pub fn load_file(path: &Path, config: &DashboardConfig) -> Result<Dataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let open = || {
        File::open(path).map_err(|source| LoadError::Open {
            path: path.display().to_string(),
            source,
        })
    };

    let dataset = match ext.as_str() {
        "csv" => read_csv(open()?, config)?,
        "json" => read_json(BufReader::new(open()?), config)?,
        "parquet" | "pq" => read_parquet(open()?, config)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string())),
    };

    log::info!(
        "Loaded {} records from {} ({} skipped, {} age groups, {} races)",
        dataset.len(),
        path.display(),
        dataset.skipped_rows,
        dataset.age_groups.len(),
        dataset.races.len()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names. Only the configured age and
/// race columns are read; every other column is ignored. Short rows are
/// accepted with the absent fields treated as missing.
pub fn read_csv<R: Read>(reader: R, config: &DashboardConfig) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = reader.headers()?.clone();

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
    };
    let age_idx = column(&config.age_column)?;
    let race_idx = column(&config.race_column)?;

    let mut records = Vec::new();
    let mut skipped = 0;

    for (row_no, result) in reader.records().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => return Err(e.into()),
            Err(e) => {
                log::warn!("Skipping CSV line {}: {e}", source_line(&e, row_no));
                skipped += 1;
                continue;
            }
        };

        records.push(Record {
            age_group: row.get(age_idx).and_then(|v| config.normalize(v)),
            race_ethnicity: row.get(race_idx).and_then(|v| config.normalize(v)),
        });
    }

    Ok(Dataset::from_records(records).with_skipped_rows(skipped))
}

/// 1-based line of the file a CSV error refers to. Falls back to the record
/// index shifted past the header line when the error carries no position.
fn source_line(error: &csv::Error, record_index: usize) -> u64 {
    error
        .position()
        .map_or(record_index as u64 + 2, |pos| pos.line())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (the default `df.to_json(orient='records')`).
/// Non-object rows are skipped; non-string values are stringified. A
/// configured column that no object row carries is a load error.
pub fn read_json<R: Read>(reader: R, config: &DashboardConfig) -> Result<Dataset, LoadError> {
    let root: JsonValue = serde_json::from_reader(reader)?;
    let rows = root.as_array().ok_or(LoadError::NotAnArray)?;

    let mut records = Vec::with_capacity(rows.len());
    let mut skipped = 0;
    let mut seen_age = false;
    let mut seen_race = false;

    for (i, row) in rows.iter().enumerate() {
        let Some(obj) = row.as_object() else {
            log::warn!("Skipping JSON row {i}: not an object");
            skipped += 1;
            continue;
        };

        let field = |name: &str| match obj.get(name) {
            None | Some(JsonValue::Null) => None,
            Some(JsonValue::String(s)) => config.normalize(s),
            Some(other) => config.normalize(&other.to_string()),
        };

        seen_age |= obj.contains_key(&config.age_column);
        seen_race |= obj.contains_key(&config.race_column);

        records.push(Record {
            age_group: field(&config.age_column),
            race_ethnicity: field(&config.race_column),
        });
    }

    if !records.is_empty() {
        if !seen_age {
            return Err(LoadError::MissingColumn(config.age_column.clone()));
        }
        if !seen_race {
            return Err(LoadError::MissingColumn(config.race_column.clone()));
        }
    }

    Ok(Dataset::from_records(records).with_skipped_rows(skipped))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Parquet file with the configured age and race columns. Any Arrow type is
/// accepted (strings, dictionary-encoded categoricals, integers); values are
/// rendered to text. Nulls become missing fields.
pub fn read_parquet<R: ChunkReader + 'static>(
    reader: R,
    config: &DashboardConfig,
) -> Result<Dataset, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(reader)?;

    // Resolve columns from the file schema so a file without rows still
    // reports a missing column.
    let column = |name: &str| {
        builder
            .schema()
            .index_of(name)
            .map_err(|_| LoadError::MissingColumn(name.to_string()))
    };
    let age_idx = column(&config.age_column)?;
    let race_idx = column(&config.race_column)?;
    let batches = builder.build()?;

    let mut records = Vec::new();
    let mut skipped = 0;

    for batch_result in batches {
        let batch = batch_result?;
        let age_col = batch.column(age_idx);
        let race_col = batch.column(race_idx);

        for row in 0..batch.num_rows() {
            let cell = |col: &dyn Array| -> Result<Option<String>, arrow::error::ArrowError> {
                if col.is_null(row) {
                    return Ok(None);
                }
                Ok(config.normalize(&array_value_to_string(col, row)?))
            };

            match (cell(age_col.as_ref()), cell(race_col.as_ref())) {
                (Ok(age_group), Ok(race_ethnicity)) => records.push(Record {
                    age_group,
                    race_ethnicity,
                }),
                (Err(e), _) | (_, Err(e)) => {
                    log::warn!("Skipping Parquet row {row}: {e}");
                    skipped += 1;
                }
            }
        }
    }

    Ok(Dataset::from_records(records).with_skipped_rows(skipped))
}
