//! CSV loaders for the two rate files.
//!
//! ## Decas file
//!
//! | Column              | Type    | Notes                                   |
//! |---------------------|---------|-----------------------------------------|
//! | `Hotel`             | string  |                                         |
//! | `Dias de la Semana` | string  | `Entre Semana` or `Fin de Semana`       |
//! | `Doble`             | decimal | decas per night; empty cell means none  |
//! | `Triple`            | decimal |                                         |
//! | `Cuádruple`         | decimal |                                         |
//!
//! ## All-Inclusive file
//!
//! | Column               | Type    | Notes                                  |
//! |----------------------|---------|----------------------------------------|
//! | `Hotel`              | string  |                                        |
//! | `Tipo de Habitacion` | string  | room type name                         |
//! | `Dias de la Semana`  | string  | `Entre Semana` or `Fin de Semana`      |
//! | `Tarifa Baja`        | decimal | USD per person per night               |
//! | `Tarifa Media`       | decimal |                                        |
//! | `Tarifa Alta`        | decimal |                                        |
//!
//! Headers are matched by name and are case-sensitive; column order does not
//! matter. Day bucket labels are matched case-insensitively. Prices may carry
//! surrounding whitespace and `,` thousands separators.
//!
//! ```csv
//! Hotel,Dias de la Semana,Doble,Triple,Cuádruple
//! Isleño,Entre Semana,20,25,30
//! Isleño,Fin de semana,30,36,42
//! ```

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use resort_core::{
    AllInclusiveRateEntry, AllInclusiveRateTable, DayBucket, DecasRateEntry, DecasRateTable,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

const DECAS_COLUMNS: &[&str] = &["Hotel", "Dias de la Semana", "Doble", "Triple", "Cuádruple"];

const ALL_INCLUSIVE_COLUMNS: &[&str] = &[
    "Hotel",
    "Tipo de Habitacion",
    "Dias de la Semana",
    "Tarifa Baja",
    "Tarifa Media",
    "Tarifa Alta",
];

/// Errors that can occur while loading a rate file. Any of them aborts the
/// load; no partial table is returned.
#[derive(Debug, Error)]
pub enum RateLoaderError {
    #[error("failed to open rate file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Header or structural problem before any row is read.
    #[error("CSV parse error: {0}")]
    CsvParse(#[from] csv::Error),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    /// A row could not be deserialised (bad price, wrong column count).
    /// `row` is 1-based, not counting the header.
    #[error("row {row}: {source}")]
    InvalidRow {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("unrecognised day bucket '{label}' on row {row}")]
    InvalidDayBucket { label: String, row: usize },

    #[error("blank {column} on row {row}")]
    BlankField { column: &'static str, row: usize },
}

// ---------------------------------------------------------------------------
// Serde rows that mirror the CSV layouts
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct DecasRow {
    #[serde(rename = "Hotel")]
    hotel: String,
    #[serde(rename = "Dias de la Semana")]
    day_bucket: String,
    #[serde(rename = "Doble", deserialize_with = "deserialize_optional_decimal")]
    double: Option<Decimal>,
    #[serde(rename = "Triple", deserialize_with = "deserialize_optional_decimal")]
    triple: Option<Decimal>,
    #[serde(rename = "Cuádruple", deserialize_with = "deserialize_optional_decimal")]
    quadruple: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
struct AllInclusiveRow {
    #[serde(rename = "Hotel")]
    hotel: String,
    #[serde(rename = "Tipo de Habitacion")]
    room_type: String,
    #[serde(rename = "Dias de la Semana")]
    day_bucket: String,
    #[serde(rename = "Tarifa Baja", deserialize_with = "deserialize_optional_decimal")]
    low: Option<Decimal>,
    #[serde(rename = "Tarifa Media", deserialize_with = "deserialize_optional_decimal")]
    medium: Option<Decimal>,
    #[serde(rename = "Tarifa Alta", deserialize_with = "deserialize_optional_decimal")]
    high: Option<Decimal>,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .replace(',', "")
            .parse::<Decimal>()
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("invalid price '{}': {e}", s.trim()))),
        None => Ok(None),
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(reader)
}

fn require_columns<R: Read>(
    reader: &mut csv::Reader<R>,
    columns: &[&str],
) -> Result<(), RateLoaderError> {
    let headers = reader.headers()?;
    for column in columns {
        if !headers.iter().any(|h| h == *column) {
            return Err(RateLoaderError::MissingColumn((*column).to_string()));
        }
    }
    Ok(())
}

fn parse_bucket(
    label: String,
    row: usize,
) -> Result<DayBucket, RateLoaderError> {
    DayBucket::parse(&label).ok_or(RateLoaderError::InvalidDayBucket { label, row })
}

fn require_text(
    value: String,
    column: &'static str,
    row: usize,
) -> Result<String, RateLoaderError> {
    if value.is_empty() {
        return Err(RateLoaderError::BlankField { column, row });
    }
    Ok(value)
}

fn open(path: &Path) -> Result<File, RateLoaderError> {
    File::open(path).map_err(|source| RateLoaderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

/// Loader for the Decas rate file.
pub struct DecasRateLoader;

impl DecasRateLoader {
    /// Parse Decas rows from any reader, in file order.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<DecasRateEntry>, RateLoaderError> {
        let mut reader = csv_reader(reader);
        require_columns(&mut reader, DECAS_COLUMNS)?;

        reader
            .deserialize::<DecasRow>()
            .enumerate()
            .map(|(idx, result)| {
                let row_number = idx + 1;
                let row = result.map_err(|source| RateLoaderError::InvalidRow {
                    row: row_number,
                    source,
                })?;
                Ok(DecasRateEntry {
                    hotel: require_text(row.hotel, "hotel", row_number)?,
                    day_bucket: parse_bucket(row.day_bucket, row_number)?,
                    double: row.double,
                    triple: row.triple,
                    quadruple: row.quadruple,
                })
            })
            .collect()
    }

    /// Read a Decas rate file into a lookup table.
    pub fn load_from_file(path: &Path) -> Result<DecasRateTable, RateLoaderError> {
        let entries = Self::parse(open(path)?)?;
        let rows = entries.len();
        let table: DecasRateTable = entries.into_iter().collect();
        info!(
            path = %path.display(),
            rows,
            hotels = table.hotels().len(),
            "loaded decas rates"
        );
        Ok(table)
    }
}

/// Loader for the All-Inclusive rate file.
pub struct AllInclusiveRateLoader;

impl AllInclusiveRateLoader {
    /// Parse All-Inclusive rows from any reader, in file order.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<AllInclusiveRateEntry>, RateLoaderError> {
        let mut reader = csv_reader(reader);
        require_columns(&mut reader, ALL_INCLUSIVE_COLUMNS)?;

        reader
            .deserialize::<AllInclusiveRow>()
            .enumerate()
            .map(|(idx, result)| {
                let row_number = idx + 1;
                let row = result.map_err(|source| RateLoaderError::InvalidRow {
                    row: row_number,
                    source,
                })?;
                Ok(AllInclusiveRateEntry {
                    hotel: require_text(row.hotel, "hotel", row_number)?,
                    room_type: require_text(row.room_type, "room type", row_number)?,
                    day_bucket: parse_bucket(row.day_bucket, row_number)?,
                    low: row.low,
                    medium: row.medium,
                    high: row.high,
                })
            })
            .collect()
    }

    /// Read an All-Inclusive rate file into a lookup table.
    pub fn load_from_file(path: &Path) -> Result<AllInclusiveRateTable, RateLoaderError> {
        let entries = Self::parse(open(path)?)?;
        let rows = entries.len();
        let table: AllInclusiveRateTable = entries.into_iter().collect();
        info!(
            path = %path.display(),
            rows,
            hotels = table.hotels().len(),
            "loaded all-inclusive rates"
        );
        Ok(table)
    }
}
