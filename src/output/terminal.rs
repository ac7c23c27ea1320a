//! Terminal renderer: styled flowing text grouped by file.

use colored::Colorize;

use crate::models::issue::{INVALID_JSON_PROBLEM, TRANSPORT_FAILURE_PROBLEM};
use crate::models::{IssueRecord, Summary};
use crate::output::ReportRenderer;

/// Terminal output renderer with colored, flowing text.
pub struct TerminalRenderer;

impl ReportRenderer for TerminalRenderer {
    fn render(&self, issues: &[IssueRecord]) -> String {
        if issues.is_empty() {
            return format!("{}", "  ✔ No sustainability issues found.\n".green());
        }

        let mut output = String::new();
        let mut current_file = "";

        for issue in issues {
            // Group by file, preserving analysis order
            if issue.file_name != current_file {
                if !current_file.is_empty() {
                    output.push('\n');
                }
                current_file = &issue.file_name;
                output.push_str(&format!("{}\n", current_file.bold().underline()));
            }

            let is_fallback =
                issue.problem == INVALID_JSON_PROBLEM || issue.problem == TRANSPORT_FAILURE_PROBLEM;
            let icon = if is_fallback {
                "✖".red().bold().to_string()
            } else {
                "⚠".yellow().bold().to_string()
            };

            output.push_str(&format!(" {} {}\n", icon, issue.problem.bold()));
            if !issue.problem_description.is_empty() {
                output.push_str(&format!("   {}\n", issue.problem_description));
            }
            if !issue.problematic_code.is_empty() {
                output.push_str(&format!("   {}\n", issue.problematic_code.dimmed()));
            }
            if !issue.optimization.is_empty() {
                output.push_str(&format!("   {} {}\n", "→".cyan(), issue.optimization));
            }
            output.push('\n');
        }

        let summary = Summary::from_records(issues);
        output.push_str(&format!(
            "{}\n",
            "───────────────────────────────────".dimmed()
        ));
        output.push_str(&format!(
            " {} {} across {} {}, {} {}\n",
            summary.total.to_string().bold(),
            if summary.total == 1 { "issue" } else { "issues" },
            summary.files.to_string().bold(),
            if summary.files == 1 { "file" } else { "files" },
            summary.fallbacks.to_string().red().bold(),
            if summary.fallbacks == 1 {
                "analysis failure"
            } else {
                "analysis failures"
            },
        ));

        output
    }
}
