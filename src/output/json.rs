//! JSON renderer for machine consumption.

use serde_json::json;

use crate::models::{IssueRecord, Summary};
use crate::output::ReportRenderer;

/// Renders issues as a pretty-printed JSON object with a summary.
pub struct JsonRenderer;

impl ReportRenderer for JsonRenderer {
    fn render(&self, issues: &[IssueRecord]) -> String {
        let payload = json!({
            "issues": issues,
            "summary": Summary::from_records(issues),
        });
        serde_json::to_string_pretty(&payload).unwrap_or_else(|_| "{}".to_string())
    }
}
