//! LDC, the compact record format LocDirect uses for bulk string transfer.
//!
//! Every value is followed by [`FIELD_SEPARATOR`] and every record by [`ROW_SEPARATOR`]:
//!
//! ```text
//! Strings/Menu¬¬btn_ok¬¬OK¬¬¯¯Strings/Menu¬¬btn_cancel¬¬Cancel¬¬¯¯
//! ```
//!
//! Field names are not part of the blob; they travel next to it as a semicolon-joined list.
//!
//! # Limitation
//! Values are not escaped. A value containing either separator corrupts the payload, and the
//! server expects exactly this unescaped form, so the codec keeps it. The separators are
//! picked because they practically never occur in localized text.
//!
//! Single separator characters at a value's edge are just as unsafe: a value ending in `¬`
//! merges with the following field separator (`x¬` then `¬¬` reads back as `x` and a
//! value starting with `¬`), and a value starting with `¯` merges with the preceding row
//! separator. Such rows still have the right width, so decoding cannot notice.
//! [`RecordCodec::try_encode`] refuses them before anything is sent.

use tracing::warn;

use crate::error::{Error, Result};
use crate::table::{FieldList, Record, Table};

pub const FIELD_SEPARATOR: &str = "\u{ac}\u{ac}";
pub const ROW_SEPARATOR: &str = "\u{af}\u{af}";

const FIELD_MARK: char = '\u{ac}';
const ROW_MARK: char = '\u{af}';

/// Wire encoding for record batches. The reconciler only ever sees [`Table`]s, so a codec
/// can be replaced without touching it.
pub trait RecordCodec {
    fn encode(&self, table: &Table) -> String;

    /// Decodes rows that must each carry exactly `width` values.
    fn decode(&self, blob: &str, width: usize) -> Result<Vec<Record>>;

    /// Checks that every value of `table` reads back unchanged after [`encode`](Self::encode).
    fn check_encodable(&self, _table: &Table) -> Result<()> {
        Ok(())
    }

    /// Encodes `table` for upload, failing with `MalformedPayload` when a value would not
    /// survive the round trip.
    fn try_encode(&self, table: &Table) -> Result<String> {
        self.check_encodable(table)?;
        Ok(self.encode(table))
    }

    fn decode_table(&self, fields: &FieldList, blob: &str) -> Result<Table> {
        let rows = self.decode(blob, fields.len())?;
        Table::from_rows(fields.clone(), rows)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Ldc;

impl RecordCodec for Ldc {
    fn encode(&self, table: &Table) -> String {
        let mut blob = String::new();
        for record in table.rows() {
            for value in record {
                blob.push_str(value);
                blob.push_str(FIELD_SEPARATOR);
            }
            blob.push_str(ROW_SEPARATOR);
        }
        blob
    }

    fn check_encodable(&self, table: &Table) -> Result<()> {
        for (index, record) in table.rows().iter().enumerate() {
            for (field, value) in table.fields().iter().zip(record) {
                if let Some(reason) = unsafe_value(value) {
                    warn!(row = index + 1, field, "[LDC] Value cannot be encoded: {reason}");
                    return Err(Error::malformed(format!(
                        "row {} field `{field}` {reason}",
                        index + 1
                    )));
                }
            }
        }
        Ok(())
    }

    fn decode(&self, blob: &str, width: usize) -> Result<Vec<Record>> {
        if blob.is_empty() {
            return Ok(Vec::new());
        }
        let body = blob.strip_suffix(ROW_SEPARATOR).ok_or_else(|| {
            Error::malformed(format!(
                "payload of {} bytes does not end with the row separator",
                blob.len()
            ))
        })?;

        body.split(ROW_SEPARATOR)
            .enumerate()
            .map(|(index, segment)| decode_row(segment, index + 1, width))
            .collect()
    }
}

fn unsafe_value(value: &str) -> Option<&'static str> {
    if value.contains(FIELD_SEPARATOR) {
        Some("contains the field separator")
    } else if value.contains(ROW_SEPARATOR) {
        Some("contains the row separator")
    } else if value.starts_with(FIELD_MARK) || value.ends_with(FIELD_MARK) {
        Some("starts or ends with U+00AC")
    } else if value.starts_with(ROW_MARK) {
        Some("starts with U+00AF")
    } else {
        None
    }
}

fn decode_row(segment: &str, row: usize, width: usize) -> Result<Record> {
    let values: Record = if segment.is_empty() && width == 0 {
        Vec::new()
    } else {
        segment
            .strip_suffix(FIELD_SEPARATOR)
            .ok_or_else(|| {
                Error::malformed(format!(
                    "row {row} does not end with the field separator"
                ))
            })?
            .split(FIELD_SEPARATOR)
            .map(str::to_string)
            .collect()
    };

    if values.len() != width {
        return Err(Error::malformed(format!(
            "row {row} has {} fields, expected {width}",
            values.len()
        )));
    }
    Ok(values)
}
