//! Settings read from the `Configuration` control sheet
//!
//! The sheet has exactly three leading columns, `Key`, `Value` and `Type`.
//! Each data row declares one setting whose raw value is coerced according to
//! its `Type` (`string`, `array`, `boolean` or `int`).
//!
//! | Key                | Value      | Type    |
//! |--------------------|------------|---------|
//! | DefaultLanguage    | en         | string  |
//! | SupportedLanguages | en, fr, de | array   |
//! | UseLanguageMenu    | TRUE       | boolean |
//!
//! Malformed headers and cross-setting violations are fatal. A bad row is
//! skipped with a warning.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::coerce::{
    CoercionWarning, Coerced, Integer, coerce_array, coerce_boolean, coerce_int, coerce_string,
};
use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use crate::sheet::Sheet;

/// Header of the control sheet, in required order
pub const CONFIG_COLUMNS: [&str; 3] = ["Key", "Value", "Type"];

/// Setting name, recognized or not
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SettingKey {
    /// Locale used when neither the request nor the browser provides one
    DefaultLanguage,
    /// Locales offered by the language menu
    SupportedLanguages,
    /// Whether the rendering layer shows a language menu
    UseLanguageMenu,
    /// Declared content format version
    Version,
    /// Any other key, passed through to the rendering layer
    Extension(String),
}

impl SettingKey {
    /// Name of the key as written in the sheet
    pub fn as_str(&self) -> &str {
        match self {
            SettingKey::DefaultLanguage => "DefaultLanguage",
            SettingKey::SupportedLanguages => "SupportedLanguages",
            SettingKey::UseLanguageMenu => "UseLanguageMenu",
            SettingKey::Version => "GoogleSheetsCmsVersion",
            SettingKey::Extension(name) => name,
        }
    }
}

impl From<&str> for SettingKey {
    fn from(name: &str) -> Self {
        match name {
            "DefaultLanguage" => SettingKey::DefaultLanguage,
            "SupportedLanguages" => SettingKey::SupportedLanguages,
            "UseLanguageMenu" => SettingKey::UseLanguageMenu,
            "GoogleSheetsCmsVersion" => SettingKey::Version,
            other => SettingKey::Extension(other.to_string()),
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared type of a setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingType {
    /// `string`
    String,
    /// `array`
    Array,
    /// `boolean`
    Boolean,
    /// `int`
    Int,
}

impl FromStr for SettingType {
    type Err = CoercionWarning;

    fn from_str(s: &str) -> Coerced<Self> {
        match s {
            "string" => Ok(SettingType::String),
            "array" => Ok(SettingType::Array),
            "boolean" => Ok(SettingType::Boolean),
            "int" => Ok(SettingType::Int),
            other => Err(CoercionWarning::UnknownType {
                type_name: other.to_string(),
            }),
        }
    }
}

/// Typed setting value
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum SettingValue {
    /// Text
    String(String),
    /// Ordered list of trimmed pieces
    Array(Vec<String>),
    /// Flag
    Bool(bool),
    /// Integer (possibly infinite)
    Int(Integer),
}

impl SettingValue {
    /// Coerce a raw cell to the declared type
    pub fn coerce(raw: &str, ty: SettingType, separator: &str) -> Coerced<Self> {
        match ty {
            SettingType::String => coerce_string(raw).map(SettingValue::String),
            SettingType::Array => coerce_array(raw, separator).map(SettingValue::Array),
            SettingType::Boolean => coerce_boolean(raw).map(SettingValue::Bool),
            SettingType::Int => coerce_int(raw).map(SettingValue::Int),
        }
    }

    /// Explicit truthiness used by the cross-setting rules
    ///
    /// Text is truthy when non-empty, a list always, an integer when non-zero.
    pub fn is_truthy(&self) -> bool {
        match self {
            SettingValue::String(s) => !s.is_empty(),
            SettingValue::Array(_) => true,
            SettingValue::Bool(b) => *b,
            SettingValue::Int(n) => n.is_nonzero(),
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::String(s) => f.write_str(s),
            SettingValue::Array(items) => f.write_str(&items.join(", ")),
            SettingValue::Bool(b) => write!(f, "{}", b),
            SettingValue::Int(n) => write!(f, "{}", n),
        }
    }
}

/// Resolved settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    values: BTreeMap<SettingKey, SettingValue>,
}

impl Settings {
    /// Create empty settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, returning the one it replaced
    pub fn insert(&mut self, key: SettingKey, value: SettingValue) -> Option<SettingValue> {
        self.values.insert(key, value)
    }

    /// Look up a setting by key
    pub fn get(&self, key: &SettingKey) -> Option<&SettingValue> {
        self.values.get(key)
    }

    /// Look up a setting by its sheet name
    pub fn get_named(&self, name: &str) -> Option<&SettingValue> {
        self.get(&SettingKey::from(name))
    }

    /// Whether a setting is present
    pub fn contains(&self, key: &SettingKey) -> bool {
        self.values.contains_key(key)
    }

    /// Number of settings
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no setting was read
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All settings, ordered by key
    pub fn iter(&self) -> impl Iterator<Item = (&SettingKey, &SettingValue)> {
        self.values.iter()
    }

    /// `DefaultLanguage`, when declared as non-blank text
    pub fn default_language(&self) -> Option<&str> {
        match self.get(&SettingKey::DefaultLanguage) {
            Some(SettingValue::String(lang)) if !lang.trim().is_empty() => Some(lang.trim()),
            _ => None,
        }
    }

    /// `SupportedLanguages`, when declared as an array
    pub fn supported_languages(&self) -> Option<&[String]> {
        match self.get(&SettingKey::SupportedLanguages) {
            Some(SettingValue::Array(langs)) => Some(langs),
            _ => None,
        }
    }

    /// Whether `UseLanguageMenu` is truthy
    pub fn use_language_menu(&self) -> bool {
        self.get(&SettingKey::UseLanguageMenu)
            .is_some_and(SettingValue::is_truthy)
    }

    /// Declared content format version
    pub fn version(&self) -> Option<String> {
        self.get(&SettingKey::Version).map(ToString::to_string)
    }
}

impl Serialize for Settings {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (key, value) in &self.values {
            map.serialize_entry(key.as_str(), value)?;
        }
        map.end()
    }
}

/// Reads [`Settings`] from a `Key`/`Value`/`Type` control sheet
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    separator: String,
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::new(crate::coerce::DEFAULT_SEPARATOR)
    }
}

impl ConfigResolver {
    /// Create a resolver splitting `array` settings on `separator`
    pub fn new(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }

    /// Validate the header, read every row and check cross-setting rules
    pub fn resolve(&self, sheet: &Sheet, diagnostics: &mut Diagnostics) -> Result<Settings> {
        check_header(sheet)?;

        let mut settings = Settings::new();
        if sheet.rows().is_empty() {
            tracing::debug!(sheet = %sheet.name(), "configuration sheet has no settings");
            return Ok(settings);
        }

        // Row 1 is the header
        for (index, row) in sheet.rows().iter().enumerate() {
            let row_number = index + 2;

            let mut cells = [""; 3];
            let mut complete = true;
            for (cell, column) in cells.iter_mut().zip(CONFIG_COLUMNS) {
                *cell = row.get(column).unwrap_or("");
                if cell.trim().is_empty() {
                    diagnostics.warn_row(
                        sheet.name(),
                        row_number,
                        format!("the {} in row {} is empty", column, row_number),
                    );
                    complete = false;
                }
            }
            if !complete {
                continue;
            }
            let [key, raw_value, type_name] = cells;

            let value = match type_name
                .parse::<SettingType>()
                .and_then(|ty| SettingValue::coerce(raw_value, ty, &self.separator))
            {
                Ok(value) => value,
                Err(warning) => {
                    diagnostics.warn_row(
                        sheet.name(),
                        row_number,
                        format!("setting '{}' ignored: {}", key, warning),
                    );
                    continue;
                }
            };

            if settings.insert(SettingKey::from(key), value).is_some() {
                diagnostics.warn_row(
                    sheet.name(),
                    row_number,
                    format!(
                        "setting '{}' is defined more than once, the value from row {} wins",
                        key, row_number
                    ),
                );
            }
        }

        check_integrity(&settings, sheet.name(), diagnostics)?;
        tracing::debug!(sheet = %sheet.name(), count = settings.len(), "settings resolved");
        Ok(settings)
    }
}

fn check_header(sheet: &Sheet) -> Result<()> {
    for (position, expected) in CONFIG_COLUMNS.iter().enumerate() {
        let schema_error = |message: String| Error::Schema {
            sheet: sheet.name().to_string(),
            column: expected.to_string(),
            message,
        };
        match sheet.column_names().get(position) {
            None => {
                return Err(schema_error(format!(
                    "the {} column must be named, it is undefined",
                    expected
                )));
            }
            Some(name) if name.trim().is_empty() => {
                return Err(schema_error(format!(
                    "the {} column must be named, it is empty",
                    expected
                )));
            }
            Some(name) if name != expected => {
                return Err(schema_error(format!(
                    "the column isn't named {}, it equals \"{}\"",
                    expected, name
                )));
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// A truthy `UseLanguageMenu` requires `SupportedLanguages`; the reverse is
/// only advisory.
fn check_integrity(settings: &Settings, sheet: &str, diagnostics: &mut Diagnostics) -> Result<()> {
    if settings.use_language_menu() && !settings.contains(&SettingKey::SupportedLanguages) {
        return Err(Error::Integrity {
            message: "SupportedLanguages must be set if UseLanguageMenu is TRUE".to_string(),
        });
    }

    if settings.contains(&SettingKey::SupportedLanguages) {
        match settings.get(&SettingKey::UseLanguageMenu) {
            None => diagnostics.warn(sheet, "UseLanguageMenu must be set to use SupportedLanguages"),
            Some(value) if !value.is_truthy() => {
                diagnostics.warn(sheet, "UseLanguageMenu must be TRUE to use SupportedLanguages")
            }
            Some(_) => {}
        }
    }
    Ok(())
}
