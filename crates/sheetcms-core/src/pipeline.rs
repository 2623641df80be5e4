//! Pipeline orchestration
//!
//! One run turns a [`Workbook`] into a [`ContentMap`]:
//!
//! 1. require the declarations sheet (`Sheet_DataType`)
//! 2. read settings from `Configuration` when present
//! 3. pick the effective locale
//! 4. transform the declarations sheet as an `object`, without a locale, to get
//!    the shape directory
//! 5. require a declaration for every content sheet
//! 6. transform every declared sheet
//!
//! Any fatal error aborts the run before content is assembled. A run holds no
//! state beyond its own call, so identical input gives identical output.

use serde::Serialize;

use crate::columns::ColumnResolver;
use crate::config::{ConfigResolver, Settings};
use crate::content::ContentMap;
use crate::diagnostics::{Diagnostics, Warning};
use crate::error::{Error, Result};
use crate::locale::{LocaleContext, effective_locale};
use crate::metadata::HeadMetadata;
use crate::options::PipelineOptions;
use crate::shape::{ShapeDirectory, ShapeTransformer};
use crate::sheet::{SheetSource, Workbook};

/// Everything a run produces
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineOutput {
    /// Transformed content sheets
    pub content: ContentMap,
    /// Settings read from the configuration sheet
    pub settings: Settings,
    /// Locale the value columns were resolved against
    pub locale: Option<String>,
    /// Recoverable problems, in the order they were found
    pub warnings: Vec<Warning>,
}

/// Drives a run
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    options: PipelineOptions,
}

impl Pipeline {
    /// Create a pipeline with the given options
    pub fn new(options: PipelineOptions) -> Self {
        Self { options }
    }

    /// Options in use
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Load a document from `source` and run on it
    pub fn run_source(
        &self,
        source: &dyn SheetSource,
        locale: &LocaleContext<'_>,
    ) -> Result<PipelineOutput> {
        let workbook = source.load()?;
        self.run(&workbook, locale)
    }

    /// Transform a document
    pub fn run(&self, workbook: &Workbook, locale: &LocaleContext<'_>) -> Result<PipelineOutput> {
        let options = &self.options;
        tracing::info!(sheets = workbook.sheets().len(), "starting content transform");

        let data_type_sheet =
            workbook
                .get(&options.data_type_sheet)
                .ok_or_else(|| Error::MissingControlSheet {
                    sheet: options.data_type_sheet.clone(),
                })?;

        let mut diagnostics = Diagnostics::new();

        let settings = match workbook.get(&options.configuration_sheet) {
            Some(sheet) => ConfigResolver::new(options.array_separator.as_str())
                .resolve(sheet, &mut diagnostics)?,
            None => {
                tracing::debug!(sheet = %options.configuration_sheet, "no configuration sheet, using empty settings");
                Settings::new()
            }
        };
        if let Some(version) = settings.version() {
            tracing::debug!(version = %version, "declared content version");
        }

        let locale = effective_locale(locale, &settings);
        tracing::debug!(locale = ?locale, "effective locale");

        let columns = ColumnResolver::new(options.check_i18n, options.default_value_column.as_str());
        let transformer = ShapeTransformer::new(&columns, locale.as_deref(), &options.default_section);

        // declarations never depend on the reader's language
        let directory = ShapeTransformer::new(&columns, None, &options.default_section)
            .to_map(data_type_sheet, &mut diagnostics)?;
        let directory = ShapeDirectory::from_entries(&directory);

        let mut declared = Vec::new();
        for sheet in workbook.sheets() {
            if options.is_control_sheet(sheet.name()) {
                continue;
            }
            let declaration = directory
                .get(sheet.name())
                .ok_or_else(|| Error::MissingDeclaration {
                    sheet: sheet.name().to_string(),
                    directory: options.data_type_sheet.clone(),
                })?;
            declared.push((sheet, declaration));
        }

        let mut content = ContentMap::new();
        for (sheet, declaration) in declared {
            if let Some(output) = transformer.transform(sheet, declaration, &mut diagnostics)? {
                content.insert(sheet.name(), output);
            }
        }

        let warnings = diagnostics.into_warnings();
        tracing::info!(
            sheets = content.len(),
            warnings = warnings.len(),
            "content transform complete"
        );
        Ok(PipelineOutput {
            content,
            settings,
            locale,
            warnings,
        })
    }
}

impl PipelineOutput {
    /// Head metadata from the reserved metadata sheet, if it was transformed
    pub fn head_metadata(&self, options: &PipelineOptions) -> Option<HeadMetadata> {
        HeadMetadata::from_content(&self.content, &options.metadata_sheet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::Sheet;

    fn data_types(rows: Vec<Vec<&str>>) -> Sheet {
        Sheet::from_records("Sheet_DataType", ["Key", "Value"], rows).unwrap()
    }

    #[test]
    fn test_missing_data_type_sheet_is_fatal() {
        let workbook = Workbook::new(vec![
            Sheet::from_records("Labels", ["Key", "Value"], [vec!["a", "b"]]).unwrap(),
        ])
        .unwrap();
        let result = Pipeline::default().run(&workbook, &LocaleContext::default());
        match result {
            Err(Error::MissingControlSheet { sheet }) => assert_eq!(sheet, "Sheet_DataType"),
            other => panic!("Expected missing control sheet, got {:?}", other),
        }
    }

    #[test]
    fn test_undeclared_sheet_is_fatal() {
        let workbook = Workbook::new(vec![
            data_types(vec![vec!["Labels", "object"]]),
            Sheet::from_records("Labels", ["Key", "Value"], [vec!["a", "b"]]).unwrap(),
            Sheet::from_records("Footer", ["Key", "Value"], [vec!["c", "d"]]).unwrap(),
        ])
        .unwrap();
        let result = Pipeline::default().run(&workbook, &LocaleContext::default());
        match result {
            Err(Error::MissingDeclaration { sheet, .. }) => assert_eq!(sheet, "Footer"),
            other => panic!("Expected missing declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_control_sheets_need_no_declaration() {
        let workbook = Workbook::new(vec![
            data_types(vec![vec!["Labels", "object"]]),
            Sheet::from_records("Configuration", ["Key", "Value", "Type"], [vec!["DefaultLanguage", "en", "string"]])
                .unwrap(),
            Sheet::from_records("Labels", ["Key", "Value"], [vec!["a", "b"]]).unwrap(),
        ])
        .unwrap();
        let output = Pipeline::default()
            .run(&workbook, &LocaleContext::default())
            .unwrap();

        assert_eq!(output.content.sheet_names().collect::<Vec<_>>(), ["Labels"]);
        assert_eq!(output.locale.as_deref(), Some("en"));
        assert_eq!(output.settings.default_language(), Some("en"));
    }

    #[test]
    fn test_ignored_and_unknown_shapes_are_absent() {
        let workbook = Workbook::new(vec![
            data_types(vec![
                vec!["Drafts", "ignore"],
                vec!["Gallery", "carousel"],
                vec!["Labels", "object"],
            ]),
            Sheet::from_records("Drafts", ["Notes"], [vec!["wip"]]).unwrap(),
            Sheet::from_records("Gallery", ["Key", "Value"], [vec!["a", "b"]]).unwrap(),
            Sheet::from_records("Labels", ["Key", "Value"], [vec!["a", "b"]]).unwrap(),
        ])
        .unwrap();
        let output = Pipeline::default()
            .run(&workbook, &LocaleContext::default())
            .unwrap();

        assert_eq!(output.content.len(), 1);
        assert!(output.content.contains("Labels"));
        assert_eq!(output.warnings.len(), 1);
        assert_eq!(output.warnings[0].sheet, "Gallery");
    }

    #[test]
    fn test_shape_directory_ignores_localized_columns() {
        let workbook = Workbook::new(vec![
            Sheet::from_records(
                "Sheet_DataType",
                ["Key", "Value", "Value_fr"],
                [vec!["Labels", "object", "ignore"]],
            )
            .unwrap(),
            Sheet::from_records("Labels", ["Key", "Value", "Value_fr"], [vec!["a", "b", "c"]]).unwrap(),
        ])
        .unwrap();
        let browser = crate::locale::BrowserLanguages::new(["fr"]);
        let output = Pipeline::default()
            .run(&workbook, &LocaleContext::from_provider(&browser))
            .unwrap();

        let labels = output.content.get("Labels").and_then(|c| c.as_map()).unwrap();
        assert_eq!(labels.get("a"), Some("c"));
    }

    #[test]
    fn test_bad_configuration_aborts_the_run() {
        let workbook = Workbook::new(vec![
            data_types(vec![]),
            Sheet::from_records("Configuration", ["Key", "Value"], Vec::<Vec<&str>>::new()).unwrap(),
        ])
        .unwrap();
        let result = Pipeline::default().run(&workbook, &LocaleContext::default());
        assert!(matches!(result, Err(Error::Schema { .. })));
    }

    #[test]
    fn test_custom_control_sheet_names() {
        let options = PipelineOptions {
            data_type_sheet: "Shapes".to_string(),
            configuration_sheet: "Settings".to_string(),
            ..Default::default()
        };
        let workbook = Workbook::new(vec![
            Sheet::from_records("Shapes", ["Key", "Value"], [vec!["Labels", "object"]]).unwrap(),
            Sheet::from_records("Labels", ["Key", "Value"], [vec!["a", "b"]]).unwrap(),
        ])
        .unwrap();
        let output = Pipeline::new(options)
            .run(&workbook, &LocaleContext::default())
            .unwrap();
        assert!(output.content.contains("Labels"));
    }
}
