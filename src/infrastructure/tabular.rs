//! CSV batch uploads.
//!
//! One header row naming the columns, one record per data row. The implicit
//! row index is the 0-based data-row position. Cells are passed on as text;
//! type checks happen in the validator like for any other raw record.

use crate::domain::validation::raw_record::RawRecord;
use std::io::Read;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TabularError {
    #[error("failed to read CSV header: {0}")]
    Header(#[source] csv::Error),

    #[error("malformed CSV at data row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: csv::Error,
    },
}

/// Parses a CSV upload into raw records. Empty cells are left out so they
/// surface as missing fields.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<RawRecord>, TabularError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().map_err(TabularError::Header)?.clone();

    let mut records = Vec::new();
    for (row, result) in rdr.records().enumerate() {
        let line = result.map_err(|source| TabularError::Row { row, source })?;
        let record: RawRecord = headers
            .iter()
            .zip(line.iter())
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(column, cell)| (column.to_string(), cell.to_string()))
            .collect();
        records.push(record);
    }
    Ok(records)
}
