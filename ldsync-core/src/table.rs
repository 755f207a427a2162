//! Tabular string records: an ordered field list plus rows positionally aligned with it.
//!
//! Every table upholds `row.len() == fields.len()` for all rows; constructors and
//! [`Table::push`] reject rows that would break it.

use std::collections::HashSet;
use std::fmt;

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Separator used when a field list travels as a single string (`path;identifierName;...`).
pub const FIELD_LIST_SEPARATOR: char = ';';

/// One row of values, aligned with the owning table's [`FieldList`].
pub type Record = Vec<String>;

/// Ordered column names of a table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldList(Vec<String>);

impl FieldList {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldList(names.into_iter().map(Into::into).collect())
    }

    /// Parses a semicolon-joined list. Empty segments are dropped, so `""` is an empty list.
    pub fn parse(joined: &str) -> Self {
        FieldList::new(
            joined
                .split(FIELD_LIST_SEPARATOR)
                .map(str::trim)
                .filter(|name| !name.is_empty()),
        )
    }

    pub fn joined(&self) -> String {
        self.0.join(";")
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|field| field == name)
    }

    /// Fails with [`Error::DuplicateField`] on the first name seen twice.
    pub fn ensure_unique(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for name in &self.0 {
            if !seen.insert(name.as_str()) {
                return Err(Error::DuplicateField(name.clone()));
            }
        }
        Ok(())
    }
}

impl fmt::Display for FieldList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    fields: FieldList,
    rows: Vec<Record>,
}

impl Table {
    pub fn new(fields: FieldList) -> Self {
        Table {
            fields,
            rows: Vec::new(),
        }
    }

    pub fn from_rows(fields: FieldList, rows: Vec<Record>) -> Result<Self> {
        let mut table = Table::new(fields);
        for row in rows {
            table.push(row)?;
        }
        Ok(table)
    }

    pub fn push(&mut self, record: Record) -> Result<()> {
        if record.len() != self.fields.len() {
            return Err(Error::malformed(format!(
                "record {} has {} values but the table has {} fields ({})",
                self.rows.len() + 1,
                record.len(),
                self.fields.len(),
                self.fields
            )));
        }
        self.rows.push(record);
        Ok(())
    }

    pub fn fields(&self) -> &FieldList {
        &self.fields
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value of `field` in row `row`, if both exist.
    pub fn value(&self, row: usize, field: &str) -> Option<&str> {
        let column = self.fields.position(field)?;
        self.rows.get(row).map(|record| record[column].as_str())
    }

    /// Rows as JSON objects keyed by field name, keys in schema order.
    pub fn to_json_objects(&self) -> Vec<Value> {
        self.rows
            .iter()
            .map(|record| {
                let object: Map<String, Value> = self
                    .fields
                    .iter()
                    .zip(record)
                    .map(|(name, value)| (name.to_string(), Value::String(value.clone())))
                    .collect();
                Value::Object(object)
            })
            .collect()
    }
}
