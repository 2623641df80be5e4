//! Per-sheet shape transforms
//!
//! The `Sheet_DataType` control sheet declares one shape per content sheet:
//!
//! - `array` - one [`LinkEntry`] per row, in row order
//! - `object` - `Key` to value, later rows overwrite earlier ones
//! - `nestedObject` - `Section` to (`Key` to value), sections in first-appearance order
//! - `ignore` - no output
//!
//! The value column is resolved once per sheet, never per row.

use std::collections::HashMap;

use crate::columns::ColumnResolver;
use crate::content::{Entries, LinkEntry, Sections, SheetContent};
use crate::coerce::is_flag_set;
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::sheet::{Row, Sheet};

/// Column holding the entry key
pub const KEY_COLUMN: &str = "Key";
/// Column holding a link target (`array` shape)
pub const HREF_COLUMN: &str = "Href";
/// Column holding the display order (`array` shape)
pub const ORDER_COLUMN: &str = "Order";
/// Column holding the active flag (`array` shape)
pub const IS_ACTIVE_COLUMN: &str = "IsActive";
/// Column holding the new-tab flag (`array` shape)
pub const OPEN_NEW_TAB_COLUMN: &str = "OpenNewTab";
/// Column holding the section name (`nestedObject` shape)
pub const SECTION_COLUMN: &str = "Section";

/// How a sheet's rows become output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// No output
    Ignore,
    /// Ordered list of link entries
    Array,
    /// Flat key/value map
    Object,
    /// Key/value maps grouped by section
    NestedObject,
}

impl Shape {
    /// Tag as written in the declarations sheet
    pub fn as_str(self) -> &'static str {
        match self {
            Shape::Ignore => "ignore",
            Shape::Array => "array",
            Shape::Object => "object",
            Shape::NestedObject => "nestedObject",
        }
    }
}

/// A declared shape tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeDeclaration {
    /// One of the supported shapes
    Known(Shape),
    /// A tag no transform exists for; the sheet is skipped
    Unrecognized(String),
}

impl ShapeDeclaration {
    /// Parse a tag, case-sensitively
    pub fn parse(tag: &str) -> Self {
        match tag {
            "ignore" => ShapeDeclaration::Known(Shape::Ignore),
            "array" => ShapeDeclaration::Known(Shape::Array),
            "object" => ShapeDeclaration::Known(Shape::Object),
            "nestedObject" => ShapeDeclaration::Known(Shape::NestedObject),
            other => ShapeDeclaration::Unrecognized(other.to_string()),
        }
    }
}

/// Sheet name to declared shape
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShapeDirectory {
    declarations: HashMap<String, ShapeDeclaration>,
}

impl ShapeDirectory {
    /// Build from the `object` transform of the declarations sheet
    pub fn from_entries(entries: &Entries) -> Self {
        Self {
            declarations: entries
                .iter()
                .map(|(sheet, tag)| (sheet.to_string(), ShapeDeclaration::parse(tag)))
                .collect(),
        }
    }

    /// Declaration for a sheet
    pub fn get(&self, sheet: &str) -> Option<&ShapeDeclaration> {
        self.declarations.get(sheet)
    }

    /// Number of declared sheets
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Whether nothing is declared
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

/// Applies shapes to sheets for one effective locale
#[derive(Debug, Clone)]
pub struct ShapeTransformer<'a> {
    columns: &'a ColumnResolver,
    locale: Option<&'a str>,
    default_section: &'a str,
}

impl<'a> ShapeTransformer<'a> {
    /// Create a transformer
    pub fn new(columns: &'a ColumnResolver, locale: Option<&'a str>, default_section: &'a str) -> Self {
        Self {
            columns,
            locale,
            default_section,
        }
    }

    /// Transform a sheet per its declaration
    ///
    /// Returns `Ok(None)` for ignored sheets and for unrecognized tags, the
    /// latter with a warning.
    pub fn transform(
        &self,
        sheet: &Sheet,
        declaration: &ShapeDeclaration,
        diagnostics: &mut Diagnostics,
    ) -> Result<Option<SheetContent>> {
        let shape = match declaration {
            ShapeDeclaration::Known(shape) => *shape,
            ShapeDeclaration::Unrecognized(tag) => {
                diagnostics.warn(
                    sheet.name(),
                    format!(
                        "type '{}' is not implemented at the moment, sheet '{}' will be ignored",
                        tag,
                        sheet.name()
                    ),
                );
                return Ok(None);
            }
        };

        tracing::debug!(sheet = %sheet.name(), shape = shape.as_str(), rows = sheet.rows().len(), "transforming sheet");
        let content = match shape {
            Shape::Ignore => return Ok(None),
            Shape::Array => SheetContent::List(self.to_list(sheet)?),
            Shape::Object => SheetContent::Map(self.to_map(sheet, diagnostics)?),
            Shape::NestedObject => SheetContent::Nested(self.to_nested(sheet, diagnostics)?),
        };
        Ok(Some(content))
    }

    /// `array` shape
    pub fn to_list(&self, sheet: &Sheet) -> Result<Vec<LinkEntry>> {
        let value_column = self.columns.resolve(sheet, self.locale)?;
        Ok(sheet
            .rows()
            .iter()
            .map(|row| LinkEntry {
                key: cell(row, KEY_COLUMN),
                value: cell(row, value_column),
                href: cell(row, HREF_COLUMN),
                order: cell(row, ORDER_COLUMN),
                is_active: is_flag_set(row.get(IS_ACTIVE_COLUMN)),
                open_new_tab: is_flag_set(row.get(OPEN_NEW_TAB_COLUMN)),
            })
            .collect())
    }

    /// `object` shape
    pub fn to_map(&self, sheet: &Sheet, diagnostics: &mut Diagnostics) -> Result<Entries> {
        let value_column = self.columns.resolve(sheet, self.locale)?;
        let mut entries = Entries::new();
        for (index, row) in sheet.rows().iter().enumerate() {
            let row_number = index + 2;
            let Some(key) = row_key(sheet, row, row_number, diagnostics) else {
                continue;
            };
            if entries.insert(key, cell(row, value_column)).is_some() {
                diagnostics.warn_row(
                    sheet.name(),
                    row_number,
                    format!("key '{}' is defined more than once, the last row wins", key),
                );
            }
        }
        Ok(entries)
    }

    /// `nestedObject` shape
    pub fn to_nested(&self, sheet: &Sheet, diagnostics: &mut Diagnostics) -> Result<Sections> {
        let value_column = self.columns.resolve(sheet, self.locale)?;
        let mut sections = Sections::new();
        for (index, row) in sheet.rows().iter().enumerate() {
            let row_number = index + 2;
            let Some(key) = row_key(sheet, row, row_number, diagnostics) else {
                continue;
            };
            let section = match row.get(SECTION_COLUMN).map(str::trim) {
                Some(section) if !section.is_empty() => section,
                _ => {
                    diagnostics.warn_row(
                        sheet.name(),
                        row_number,
                        format!(
                            "row has no {}, grouping it under '{}'",
                            SECTION_COLUMN, self.default_section
                        ),
                    );
                    self.default_section
                }
            };
            if sections
                .section_mut(section)
                .insert(key, cell(row, value_column))
                .is_some()
            {
                diagnostics.warn_row(
                    sheet.name(),
                    row_number,
                    format!(
                        "key '{}' is defined more than once in section '{}', the last row wins",
                        key, section
                    ),
                );
            }
        }
        Ok(sections)
    }
}

fn cell(row: &Row, column: &str) -> String {
    row.get(column).unwrap_or_default().to_string()
}

fn row_key<'r>(
    sheet: &Sheet,
    row: &'r Row,
    row_number: usize,
    diagnostics: &mut Diagnostics,
) -> Option<&'r str> {
    match row.get(KEY_COLUMN) {
        Some(key) if !key.trim().is_empty() => Some(key),
        _ => {
            diagnostics.warn_row(
                sheet.name(),
                row_number,
                format!("the {} in row {} is empty, the row is ignored", KEY_COLUMN, row_number),
            );
            None
        }
    }
}
