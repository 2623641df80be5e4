//! Value column resolution
//!
//! A content sheet may carry one value column per language (`Value_en`,
//! `Value_fr-FR`, ...) next to the default `Value` column. The resolver picks
//! the column that supplies row values for the effective locale:
//!
//! 1. with i18n checking on and a locale known, the first column (in
//!    declaration order) whose name contains `Value_<locale>`, ignoring case;
//! 2. otherwise the column named exactly `Value`, ignoring case;
//! 3. otherwise the sheet has no value column, which is fatal.

use crate::error::{Error, Result};
use crate::sheet::Sheet;

/// Picks the value column of a sheet
#[derive(Debug, Clone)]
pub struct ColumnResolver {
    check_i18n: bool,
    default_column: String,
}

impl Default for ColumnResolver {
    fn default() -> Self {
        Self::new(true, "Value")
    }
}

impl ColumnResolver {
    /// Create a resolver falling back to `default_column`
    pub fn new(check_i18n: bool, default_column: impl Into<String>) -> Self {
        Self {
            check_i18n,
            default_column: default_column.into(),
        }
    }

    /// Name of the localized column searched for a locale
    pub fn localized_name(&self, locale: &str) -> String {
        format!("{}_{}", self.default_column, locale)
    }

    /// Resolve the value column of `sheet` for `locale`
    pub fn resolve<'s>(&self, sheet: &'s Sheet, locale: Option<&str>) -> Result<&'s str> {
        let columns = sheet.column_names();

        if self.check_i18n
            && let Some(locale) = locale
        {
            let candidate = self.localized_name(locale);
            let matches = find_loosely(columns, &candidate);
            if let Some(&first) = matches.first() {
                if matches.len() > 1 {
                    tracing::debug!(
                        sheet = %sheet.name(),
                        candidate = %candidate,
                        matches = ?matches,
                        "several localized columns match, using the first declared"
                    );
                }
                return Ok(first);
            }
            tracing::debug!(
                sheet = %sheet.name(),
                candidate = %candidate,
                "no localized column, falling back to the default column"
            );
        }

        find_exactly(columns, &self.default_column).ok_or_else(|| Error::MissingValueColumn {
            sheet: sheet.name().to_string(),
            column: self.default_column.clone(),
        })
    }
}

/// Every column containing `filter`, ignoring case, in declaration order
fn find_loosely<'c>(columns: &'c [String], filter: &str) -> Vec<&'c str> {
    let filter = filter.to_lowercase();
    columns
        .iter()
        .filter(|c| c.to_lowercase().contains(&filter))
        .map(String::as_str)
        .collect()
}

/// First column equal to `name`, ignoring case
fn find_exactly<'c>(columns: &'c [String], name: &str) -> Option<&'c str> {
    let name = name.to_lowercase();
    columns
        .iter()
        .find(|c| c.to_lowercase() == name)
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sheet(columns: &[&str]) -> Sheet {
        Sheet::from_records("Labels", columns.iter().copied(), Vec::<Vec<&str>>::new()).unwrap()
    }

    #[rstest]
    #[case(&["Key", "Value", "Value_fr-FR"], Some("fr"), "Value_fr-FR")]
    #[case(&["Key", "Value", "value_FR"], Some("fr"), "value_FR")]
    #[case(&["Key", "Value"], Some("fr"), "Value")]
    #[case(&["Key", "Value"], None, "Value")]
    #[case(&["Key", "VALUE", "Value_de"], Some("fr"), "VALUE")]
    #[case(&["Key", "Value_fr-CA", "Value_fr-FR"], Some("fr"), "Value_fr-CA")]
    fn test_resolves(
        #[case] columns: &[&str],
        #[case] locale: Option<&str>,
        #[case] expected: &str,
    ) {
        let sheet = sheet(columns);
        let resolved = ColumnResolver::default().resolve(&sheet, locale).unwrap();
        assert_eq!(resolved, expected);
    }

    #[test]
    fn test_default_match_is_exact() {
        // "Values" contains "Value" but is not the default column
        let sheet = sheet(&["Key", "Values"]);
        assert!(ColumnResolver::default().resolve(&sheet, None).is_err());
    }

    #[test]
    fn test_i18n_disabled_uses_default() {
        let sheet = sheet(&["Key", "Value", "Value_fr"]);
        let resolver = ColumnResolver::new(false, "Value");
        assert_eq!(resolver.resolve(&sheet, Some("fr")).unwrap(), "Value");
    }

    #[test]
    fn test_no_value_column_is_fatal() {
        let sheet = sheet(&["Foo"]);
        match ColumnResolver::default().resolve(&sheet, Some("fr")) {
            Err(Error::MissingValueColumn { sheet, column }) => {
                assert_eq!(sheet, "Labels");
                assert_eq!(column, "Value");
            }
            other => panic!("Expected missing value column, got {:?}", other),
        }
    }

    #[test]
    fn test_localized_only_sheet_needs_a_locale() {
        let sheet = sheet(&["Key", "Value_en"]);
        let resolver = ColumnResolver::default();
        assert_eq!(resolver.resolve(&sheet, Some("en-US")).ok(), None);
        assert_eq!(resolver.resolve(&sheet, Some("en")).unwrap(), "Value_en");
        assert!(resolver.resolve(&sheet, None).is_err());
    }
}
