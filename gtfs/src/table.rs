use std::collections::BTreeMap;

use anyhow::Result;
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::de::DeserializeOwned;

/// One delimited text resource: a header row and data rows. Every row is normalized to exactly
/// as many fields as the header has.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    headers: StringRecord,
    rows: Vec<StringRecord>,
}

/// One data row, viewed as column name to value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Record(BTreeMap<String, String>);

impl Table {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Splits on `delimiter` without any quote handling. Blank and whitespace-only lines are
    /// dropped, and every header and value is trimmed. Short rows are padded with empty values;
    /// fields beyond the header are ignored.
    pub fn parse(text: &str, delimiter: u8) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .trim(Trim::All)
            .delimiter(delimiter)
            .from_reader(text.as_bytes());

        let mut headers: Option<StringRecord> = None;
        let mut rows = Vec::new();
        for rec in reader.records() {
            let rec = rec?;
            if is_blank(&rec) {
                continue;
            }
            match headers {
                None => {
                    headers = Some(rec);
                }
                Some(ref headers) => {
                    rows.push(
                        (0..headers.len())
                            .map(|i| rec.get(i).unwrap_or(""))
                            .collect(),
                    );
                }
            }
        }

        Ok(Self {
            headers: headers.unwrap_or_default(),
            rows,
        })
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.headers.iter()
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn records(&self) -> Vec<Record> {
        self.rows
            .iter()
            .map(|row| {
                Record(
                    self.headers
                        .iter()
                        .zip(row.iter())
                        .map(|(header, value)| (header.to_string(), value.to_string()))
                        .collect(),
                )
            })
            .collect()
    }

    /// Deserializes every row against the header. Rows that don't fit `T` are logged and skipped.
    pub fn deserialize<T: DeserializeOwned>(&self, name: &str) -> Vec<T> {
        let mut results = Vec::with_capacity(self.rows.len());
        for (idx, row) in self.rows.iter().enumerate() {
            match row.deserialize(Some(&self.headers)) {
                Ok(rec) => results.push(rec),
                Err(err) => {
                    // +2 for the header and 1-based counting, ignoring skipped blank lines
                    warn!("Skipping row {} of {name}: {err}", idx + 2);
                }
            }
        }
        results
    }
}

impl Record {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.0.get(column).map(|x| x.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|x| x.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// After trimming, a whitespace-only line is a single empty field. A line of bare delimiters is
// not blank.
fn is_blank(rec: &StringRecord) -> bool {
    rec.len() == 0 || (rec.len() == 1 && rec[0].is_empty())
}
