//! Report renderers: terminal and JSON.

pub mod json;
pub mod terminal;

use crate::models::IssueRecord;

/// Trait for rendering audit issues to an output format.
pub trait ReportRenderer {
    /// Render issues to a string.
    fn render(&self, issues: &[IssueRecord]) -> String;
}
