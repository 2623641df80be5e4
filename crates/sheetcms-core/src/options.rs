//! Pipeline options
//!
//! Every field has a default, so an empty document is a valid configuration.
//!
//! # Example
//!
//! ```yaml
//! check_i18n: true
//! metadata_sheet: MetaData
//! array_separator: ";"
//! default_section: general
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Options controlling a pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOptions {
    /// Look for a `Value_<locale>` column before the default value column
    #[serde(default = "default_check_i18n")]
    pub check_i18n: bool,

    /// Control sheet declaring the shape of every other sheet
    #[serde(default = "default_data_type_sheet")]
    pub data_type_sheet: String,

    /// Control sheet holding `Key`/`Value`/`Type` settings
    #[serde(default = "default_configuration_sheet")]
    pub configuration_sheet: String,

    /// Content sheet holding head metadata (title, Open Graph, Twitter tags)
    #[serde(default = "default_metadata_sheet")]
    pub metadata_sheet: String,

    /// Column supplying row values when no localized column matches
    #[serde(default = "default_value_column")]
    pub default_value_column: String,

    /// Separator for `array` settings
    #[serde(default = "default_array_separator")]
    pub array_separator: String,

    /// Section bucket for nested rows with no `Section`
    #[serde(default = "default_section")]
    pub default_section: String,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            check_i18n: default_check_i18n(),
            data_type_sheet: default_data_type_sheet(),
            configuration_sheet: default_configuration_sheet(),
            metadata_sheet: default_metadata_sheet(),
            default_value_column: default_value_column(),
            array_separator: default_array_separator(),
            default_section: default_section(),
        }
    }
}

fn default_check_i18n() -> bool {
    true
}

fn default_data_type_sheet() -> String {
    "Sheet_DataType".to_string()
}

fn default_configuration_sheet() -> String {
    "Configuration".to_string()
}

fn default_metadata_sheet() -> String {
    "MetaData".to_string()
}

fn default_value_column() -> String {
    "Value".to_string()
}

fn default_array_separator() -> String {
    crate::coerce::DEFAULT_SEPARATOR.to_string()
}

fn default_section() -> String {
    "default".to_string()
}

impl PipelineOptions {
    /// Parse options from YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Whether a sheet name is one of the reserved control sheets
    pub fn is_control_sheet(&self, name: &str) -> bool {
        name == self.data_type_sheet || name == self.configuration_sheet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = PipelineOptions::default();
        assert!(options.check_i18n);
        assert_eq!(options.data_type_sheet, "Sheet_DataType");
        assert_eq!(options.configuration_sheet, "Configuration");
        assert_eq!(options.default_value_column, "Value");
        assert_eq!(options.array_separator, ",");
    }

    #[test]
    fn test_empty_yaml_gives_defaults() {
        assert_eq!(
            PipelineOptions::from_yaml_str("").unwrap(),
            PipelineOptions::default()
        );
        assert_eq!(
            PipelineOptions::from_yaml_str("{}").unwrap(),
            PipelineOptions::default()
        );
    }

    #[test]
    fn test_parse_partial_yaml() {
        let yaml = r#"
check_i18n: false
array_separator: ";"
default_section: general
"#;
        let options = PipelineOptions::from_yaml_str(yaml).unwrap();
        assert!(!options.check_i18n);
        assert_eq!(options.array_separator, ";");
        assert_eq!(options.default_section, "general");
        assert_eq!(options.metadata_sheet, "MetaData");
    }

    #[test]
    fn test_bad_yaml_is_an_error() {
        let result = PipelineOptions::from_yaml_str("check_i18n: [1, 2]");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("pipeline options"));
    }

    #[test]
    fn test_control_sheet_names() {
        let options = PipelineOptions::default();
        assert!(options.is_control_sheet("Configuration"));
        assert!(options.is_control_sheet("Sheet_DataType"));
        assert!(!options.is_control_sheet("MetaData"));
    }
}
