//! Transformed content handed to the rendering layer
//!
//! The serialized form is what a view binds to:
//!
//! ```json
//! {
//!   "Menu": [{ "key": "home", "value": "Home", "href": "/", "order": "1",
//!              "isActive": true, "openNewTab": false }],
//!   "Labels": { "title": "Welcome" },
//!   "Faq": { "General": { "q1": "..." }, "Billing": { "q2": "..." } }
//! }
//! ```

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::{BTreeMap, HashMap};

/// One row of an `array` sheet
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkEntry {
    /// `Key` cell
    pub key: String,
    /// Cell of the resolved value column
    pub value: String,
    /// `Href` cell
    pub href: String,
    /// `Order` cell, kept as written
    pub order: String,
    /// `IsActive` flag
    pub is_active: bool,
    /// `OpenNewTab` flag
    pub open_new_tab: bool,
}

/// Key to value entries in first-insertion order
///
/// Inserting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entries {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl Entries {
    /// Create an empty set of entries
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace, returning the replaced value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.index.get(&key) {
            Some(&position) => Some(std::mem::replace(&mut self.entries[position].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Value for a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .map(|&position| self.entries[position].1.as_str())
    }

    /// Keys in first-insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Entries in first-insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Entries {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Section buckets of a `nestedObject` sheet, in first-appearance order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sections {
    sections: Vec<(String, Entries)>,
    index: HashMap<String, usize>,
}

impl Sections {
    /// Create an empty set of sections
    pub fn new() -> Self {
        Self::default()
    }

    /// Bucket for `section`, created at the end if new
    pub fn section_mut(&mut self, section: &str) -> &mut Entries {
        let position = match self.index.get(section) {
            Some(&position) => position,
            None => {
                self.index.insert(section.to_string(), self.sections.len());
                self.sections.push((section.to_string(), Entries::new()));
                self.sections.len() - 1
            }
        };
        &mut self.sections[position].1
    }

    /// Bucket for `section`
    pub fn get(&self, section: &str) -> Option<&Entries> {
        self.index
            .get(section)
            .map(|&position| &self.sections[position].1)
    }

    /// Section names in first-appearance order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|(name, _)| name.as_str())
    }

    /// Number of sections
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether there are no sections
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl Serialize for Sections {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len()))?;
        for (name, entries) in &self.sections {
            map.serialize_entry(name, entries)?;
        }
        map.end()
    }
}

/// Output of one transformed sheet
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum SheetContent {
    /// `array` shape
    List(Vec<LinkEntry>),
    /// `object` shape
    Map(Entries),
    /// `nestedObject` shape
    Nested(Sections),
}

impl SheetContent {
    /// Rows of an `array` sheet
    pub fn as_list(&self) -> Option<&[LinkEntry]> {
        match self {
            SheetContent::List(rows) => Some(rows),
            _ => None,
        }
    }

    /// Entries of an `object` sheet
    pub fn as_map(&self) -> Option<&Entries> {
        match self {
            SheetContent::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Sections of a `nestedObject` sheet
    pub fn as_nested(&self) -> Option<&Sections> {
        match self {
            SheetContent::Nested(sections) => Some(sections),
            _ => None,
        }
    }
}

/// Sheet name to transformed output; ignored sheets are absent
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct ContentMap(BTreeMap<String, SheetContent>);

impl ContentMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet's output
    pub fn insert(&mut self, sheet: impl Into<String>, content: SheetContent) {
        self.0.insert(sheet.into(), content);
    }

    /// Output of a sheet
    pub fn get(&self, sheet: &str) -> Option<&SheetContent> {
        self.0.get(sheet)
    }

    /// Whether a sheet produced output
    pub fn contains(&self, sheet: &str) -> bool {
        self.0.contains_key(sheet)
    }

    /// Names of sheets with output
    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of sheets with output
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no sheet produced output
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// JSON form consumed by the view layer
    pub fn to_json(&self) -> crate::Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}
