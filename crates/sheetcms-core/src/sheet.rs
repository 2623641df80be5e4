//! In-memory tabular document
//!
//! A [`Workbook`] is what a [`SheetSource`] hands to the pipeline: named
//! sheets, each with ordered unique column names and ordered rows of raw
//! string cells. Nothing here interprets cell contents.
//!
//! # JSON form
//!
//! ```json
//! [
//!   {
//!     "name": "Configuration",
//!     "columnNames": ["Key", "Value", "Type"],
//!     "rows": [{ "Key": "DefaultLanguage", "Value": "en", "Type": "string" }]
//!   }
//! ]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::error::{Error, Result};

/// One row of a sheet: column name to raw cell text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(HashMap<String, String>);

impl Row {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw cell for a column, `None` when the row has no such cell
    pub fn get(&self, column: &str) -> Option<&str> {
        self.0.get(column).map(String::as_str)
    }

    /// Set a cell, replacing any previous content
    pub fn insert(&mut self, column: impl Into<String>, cell: impl Into<String>) {
        self.0.insert(column.into(), cell.into());
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// One tab of the source document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSheet", rename_all = "camelCase")]
pub struct Sheet {
    name: String,
    column_names: Vec<String>,
    rows: Vec<Row>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSheet {
    name: String,
    column_names: Vec<String>,
    #[serde(default)]
    rows: Vec<Row>,
}

impl TryFrom<RawSheet> for Sheet {
    type Error = Error;

    fn try_from(raw: RawSheet) -> Result<Self> {
        Sheet::new(raw.name, raw.column_names, raw.rows)
    }
}

impl Sheet {
    /// Create a sheet, rejecting duplicate column names
    pub fn new(name: impl Into<String>, column_names: Vec<String>, rows: Vec<Row>) -> Result<Self> {
        let name = name.into();
        let mut seen = HashSet::new();
        for column in &column_names {
            if !seen.insert(column.as_str()) {
                return Err(Error::Schema {
                    sheet: name,
                    column: column.clone(),
                    message: "column names must be unique within a sheet".to_string(),
                });
            }
        }
        Ok(Self {
            name,
            column_names,
            rows,
        })
    }

    /// Create a sheet from a header and positional records
    ///
    /// Cells past the end of the header are dropped; a short record leaves
    /// its trailing columns absent.
    pub fn from_records<H, R, C>(name: impl Into<String>, header: H, records: R) -> Result<Self>
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let column_names: Vec<String> = header.into_iter().map(Into::into).collect();
        let rows = records
            .into_iter()
            .map(|record| {
                column_names
                    .iter()
                    .cloned()
                    .zip(record.into_iter().map(Into::into))
                    .collect::<Row>()
            })
            .collect();
        Self::new(name, column_names, rows)
    }

    /// Sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column names in declaration order
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Data rows in sheet order (the header is not a row)
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }
}

/// The whole source document, sheets kept in source order
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<Sheet>")]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl TryFrom<Vec<Sheet>> for Workbook {
    type Error = Error;

    fn try_from(sheets: Vec<Sheet>) -> Result<Self> {
        Workbook::new(sheets)
    }
}

impl Workbook {
    /// Create a workbook, rejecting duplicate sheet names
    pub fn new(sheets: Vec<Sheet>) -> Result<Self> {
        let mut seen = HashSet::new();
        for sheet in &sheets {
            if !seen.insert(sheet.name()) {
                return Err(Error::Source {
                    message: format!("sheet '{}' appears more than once", sheet.name()),
                });
            }
        }
        Ok(Self { sheets })
    }

    /// Parse the JSON form of a workbook
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Look up a sheet by exact name
    pub fn get(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name() == name)
    }

    /// Whether a sheet with this exact name exists
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Sheets in source order
    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    /// Sheet names in source order
    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(Sheet::name)
    }
}

/// Provider of a fully materialized source document
///
/// Fetching and parsing the spreadsheet (and any retry policy) belongs to the
/// implementor; the pipeline only ever sees the returned [`Workbook`].
pub trait SheetSource {
    /// Produce the document for one run
    fn load(&self) -> Result<Workbook>;
}

impl SheetSource for Workbook {
    fn load(&self) -> Result<Workbook> {
        Ok(self.clone())
    }
}
