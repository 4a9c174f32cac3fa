//! Table loading
//!
//! Reads a delimited census file into memory. Columns are bound by position in the
//! fixed order of [`COLUMNS`]; header names are never consulted.

use crate::config::{HeaderMode, ReportConfig};
use crate::types::{Record, ReportError, Result, Salary, COLUMNS};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// In-memory, read-only collection of records
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    records: Vec<Record>,
}

impl Table {
    /// Load a table from a file on disk
    pub fn from_path(path: &Path, config: &ReportConfig) -> Result<Self> {
        log::info!("Loading census table: {:?}", path);

        let file = File::open(path)?;
        let table = Self::from_reader(file, config)?;

        log::info!("Loaded {} records from {:?}", table.len(), path);
        Ok(table)
    }

    /// Load a table from any reader
    pub fn from_reader<R: Read>(reader: R, config: &ReportConfig) -> Result<Self> {
        let delimiter = config.delimiter_byte().ok_or_else(|| {
            ReportError::InvalidConfig(format!(
                "delimiter must be a single ASCII character, got {:?}",
                config.delimiter
            ))
        })?;

        // Header handling is done here so that Auto can inspect the first row
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .delimiter(delimiter)
            .from_reader(reader);

        let mut records = Vec::new();
        let mut row = csv::StringRecord::new();
        let mut first = true;

        while csv_reader.read_record(&mut row)? {
            let line = row.position().map(|p| p.line()).unwrap_or(0);

            if first {
                first = false;
                if is_header(&row, config.header) {
                    log::debug!("Skipping header row at line {}", line);
                    continue;
                }
            }

            records.push(parse_record(&row, line)?);
        }

        Self::from_records(records)
    }

    /// Build a table from already-parsed records
    pub fn from_records(records: Vec<Record>) -> Result<Self> {
        if records.is_empty() {
            return Err(ReportError::EmptyTable);
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false for a successfully built table
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn is_header(row: &csv::StringRecord, mode: HeaderMode) -> bool {
    match mode {
        HeaderMode::Present => true,
        HeaderMode::Absent => false,
        HeaderMode::Auto => {
            row.len() == COLUMNS.len()
                && row
                    .iter()
                    .zip(COLUMNS)
                    .all(|(field, name)| field.eq_ignore_ascii_case(name))
        }
    }
}

/// Parse one row into a record, reporting the first malformed field
fn parse_record(row: &csv::StringRecord, line: u64) -> Result<Record> {
    if row.len() != COLUMNS.len() {
        return Err(ReportError::ColumnCount {
            line,
            expected: COLUMNS.len(),
            found: row.len(),
        });
    }

    let text = |idx: usize| row[idx].to_string();
    let integer = |idx: usize| -> Result<i64> {
        row[idx].parse::<i64>().map_err(|_| ReportError::InvalidInteger {
            line,
            column: COLUMNS[idx],
            value: row[idx].to_string(),
        })
    };

    Ok(Record {
        age: integer(0)?,
        workclass: text(1),
        fnlwgt: integer(2)?,
        education: text(3),
        education_num: integer(4)?,
        marital_status: text(5),
        occupation: text(6),
        relationship: text(7),
        race: text(8),
        sex: text(9),
        capital_gain: integer(10)?,
        capital_loss: integer(11)?,
        hours_per_week: integer(12)?,
        native_country: text(13),
        salary: Salary::from_literal(&row[14]).ok_or_else(|| ReportError::InvalidSalary {
            line,
            value: row[14].to_string(),
        })?,
    })
}
