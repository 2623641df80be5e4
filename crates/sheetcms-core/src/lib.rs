//! Sheetcms Core Library
//!
//! Turns a spreadsheet document into typed, localized site content:
//! - Settings parsing with type coercion
//! - Locale-aware value column resolution
//! - Per-sheet shape transforms (list, map, sectioned map)
//! - Head metadata extraction
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ SheetSource │────▶│   Config    │────▶│    Shape    │────▶│ ContentMap  │
//! │ (Workbook)  │     │  + Locale   │     │ Transforms  │     │   (view)    │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use sheetcms_core::{BrowserLanguages, LocaleContext, Pipeline, Workbook};
//!
//! let workbook = Workbook::from_json_str(&json)?;
//! let browser = BrowserLanguages::from_accept_language("fr-FR,fr;q=0.9,en;q=0.5");
//! let output = Pipeline::default().run(&workbook, &LocaleContext::from_provider(&browser))?;
//! println!("{}", output.content.to_json()?);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod coerce;
pub mod columns;
pub mod config;
pub mod content;
pub mod diagnostics;
pub mod error;
pub mod locale;
pub mod metadata;
pub mod options;
pub mod pipeline;
pub mod shape;
pub mod sheet;

pub use columns::ColumnResolver;
pub use config::{ConfigResolver, SettingKey, SettingValue, Settings};
pub use content::{ContentMap, Entries, LinkEntry, Sections, SheetContent};
pub use diagnostics::Warning;
pub use error::{Error, Result};
pub use locale::{BrowserLanguages, LocaleContext, LocaleProvider, NoLocale, QueryStringLocale};
pub use metadata::{HeadMetadata, MetadataSink};
pub use options::PipelineOptions;
pub use pipeline::{Pipeline, PipelineOutput};
pub use shape::{Shape, ShapeDeclaration, ShapeTransformer};
pub use sheet::{Row, Sheet, SheetSource, Workbook};
