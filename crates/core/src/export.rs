//! Delimited-text serialization of reconstructed rows.
//!
//! One record per row, fields in row order. Quoting of embedded
//! delimiters, quotes and newlines is handled by the `csv` crate. Rows may
//! differ in length, so both directions run in flexible mode.

use std::io::{Read, Write};

use csv::{ReaderBuilder, WriterBuilder};

use crate::error::Result;
use crate::reconstruct::Row;

pub const DEFAULT_DELIMITER: u8 = b',';

/// Write `rows` as CSV with the default comma delimiter.
pub fn write_csv<W: Write>(rows: &[Row], writer: W) -> Result<()> {
    write_delimited(rows, writer, DEFAULT_DELIMITER)
}

pub fn write_delimited<W: Write>(rows: &[Row], writer: W, delimiter: u8) -> Result<()> {
    let mut out = WriterBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .has_headers(false)
        .from_writer(writer);
    for row in rows {
        // An empty record would be written as a bare newline, which the
        // reader skips; a single empty field round-trips as `""`.
        if row.is_empty() {
            out.write_record([""])?;
        } else {
            out.write_record(row)?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Parse CSV back into rows.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<Row>> {
    read_delimited(reader, DEFAULT_DELIMITER)
}

pub fn read_delimited<R: Read>(reader: R, delimiter: u8) -> Result<Vec<Row>> {
    let mut input = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .has_headers(false)
        .from_reader(reader);
    let mut rows = Vec::new();
    for record in input.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}
