//! Non-fatal warnings collected during a run
//!
//! Every warning is logged through `tracing` when it is recorded and kept so
//! callers can inspect what was skipped without scraping logs.

use serde::Serialize;
use std::fmt;

/// A recoverable problem: the row, setting or sheet it concerns was skipped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    /// Sheet the problem was found in
    pub sheet: String,
    /// Spreadsheet row number (the header is row 1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    /// What went wrong
    pub message: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row {
            Some(row) => write!(f, "{} (row {}): {}", self.sheet, row, self.message),
            None => write!(f, "{}: {}", self.sheet, self.message),
        }
    }
}

/// Collector for [`Warning`]s
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sheet-level warning
    pub fn warn(&mut self, sheet: &str, message: impl Into<String>) {
        self.push(sheet, None, message.into());
    }

    /// Record a warning tied to a spreadsheet row
    pub fn warn_row(&mut self, sheet: &str, row: usize, message: impl Into<String>) {
        self.push(sheet, Some(row), message.into());
    }

    fn push(&mut self, sheet: &str, row: Option<usize>, message: String) {
        tracing::warn!(sheet = %sheet, row = ?row, "{}", message);
        self.warnings.push(Warning {
            sheet: sheet.to_string(),
            row,
            message,
        });
    }

    /// Warnings recorded so far, in order
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Consume the collector
    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warnings_keep_order_and_rows() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.warn_row("Configuration", 3, "the Value in row 3 is empty");
        diagnostics.warn("Gallery", "shape 'carousel' is not implemented");

        let warnings = diagnostics.into_warnings();
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].row, Some(3));
        assert_eq!(warnings[1].row, None);
        assert_eq!(
            warnings[1].to_string(),
            "Gallery: shape 'carousel' is not implemented"
        );
    }
}
