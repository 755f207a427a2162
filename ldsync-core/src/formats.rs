//! Local file rendering of string tables.
//!
//! CSV files carry no header row and quote every value, the layout LocDirect users exchange
//! with translators. JSON output is an array of objects keyed by field name.

use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::table::{FieldList, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(Error::InvalidConfig(format!(
                "cannot recognize format `{other}`, use csv or json"
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Csv => f.write_str("csv"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

pub fn write_table<W: Write>(table: &Table, format: OutputFormat, writer: W) -> Result<()> {
    match format {
        OutputFormat::Csv => write_csv(table, writer),
        OutputFormat::Json => write_json(table, writer),
    }
}

pub fn write_csv<W: Write>(table: &Table, writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(writer);
    for record in table.rows() {
        wtr.write_record(record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(table: &Table, mut writer: W) -> Result<()> {
    serde_json::to_writer(&mut writer, &table.to_json_objects())?;
    writer.flush()?;
    Ok(())
}

/// Reads a header-less CSV whose rows must all have `fields.len()` columns.
pub fn read_csv<R: Read>(fields: &FieldList, reader: R) -> Result<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut table = Table::new(fields.clone());
    for result in rdr.records() {
        let record = result?;
        if record.len() != fields.len() {
            return Err(Error::ColumnMismatch {
                line: record.position().map(|p| p.line()).unwrap_or_default(),
                expected: fields.len(),
                found: record.len(),
            });
        }
        table.push(record.iter().map(str::to_string).collect())?;
    }
    Ok(table)
}
