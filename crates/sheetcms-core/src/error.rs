//! Error types for sheetcms-core

use thiserror::Error;

/// Result type alias for sheetcms-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors that abort a pipeline run
///
/// Row- and setting-level problems never surface here: they are recovered
/// locally and reported as [`crate::diagnostics::Warning`]s.
#[derive(Error, Debug)]
pub enum Error {
    /// A sheet does not have the structure it is required to have
    #[error("schema error in sheet '{sheet}', column '{column}': {message}")]
    Schema {
        /// Sheet holding the malformed header
        sheet: String,
        /// Column (or column position) that failed validation
        column: String,
        /// Description of the problem
        message: String,
    },

    /// A reserved control sheet is absent from the source document
    #[error(
        "please create a sheet '{sheet}' to define how each sheet's data should be transformed"
    )]
    MissingControlSheet {
        /// Name of the missing control sheet
        sheet: String,
    },

    /// A content sheet has no shape declared for it
    #[error(
        "please add '{sheet}' to sheet '{directory}' to define how it should be transformed"
    )]
    MissingDeclaration {
        /// Name of the undeclared sheet
        sheet: String,
        /// Name of the sheet holding the shape declarations
        directory: String,
    },

    /// Neither a localized nor the default value column exists
    #[error("the sheet '{sheet}' must at least contain a {column} column")]
    MissingValueColumn {
        /// Sheet without a usable value column
        sheet: String,
        /// Name of the default value column that was searched for
        column: String,
    },

    /// Settings violate a cross-setting rule
    #[error("configuration integrity error: {message}")]
    Integrity {
        /// Description of the violated rule
        message: String,
    },

    /// The sheet source failed to provide a document
    #[error("sheet source error: {message}")]
    Source {
        /// Description of the failure
        message: String,
    },

    /// Failed to parse pipeline options
    #[error("failed to parse pipeline options: {0}")]
    OptionsParse(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_sheet() {
        let err = Error::MissingDeclaration {
            sheet: "Menu".to_string(),
            directory: "Sheet_DataType".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'Menu'"));
        assert!(msg.contains("'Sheet_DataType'"));

        let err = Error::MissingValueColumn {
            sheet: "Labels".to_string(),
            column: "Value".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "the sheet 'Labels' must at least contain a Value column"
        );
    }

    #[test]
    fn test_schema_error_names_the_column() {
        let err = Error::Schema {
            sheet: "Configuration".to_string(),
            column: "Type".to_string(),
            message: "the column is not named Type, it equals \"Kind\"".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Configuration"));
        assert!(msg.contains("'Type'"));
        assert!(msg.contains("Kind"));
    }
}
