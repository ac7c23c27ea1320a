//! Per-file analysis: prompt construction, response parsing, and record
//! normalization.
//!
//! This layer never fails. A valid JSON array from the model becomes one
//! record per element; anything else (malformed text, transport failure)
//! becomes exactly one synthetic diagnostic record, so the aggregate report
//! always says something about every analyzed file.

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::models::issue::{INVALID_JSON_PROBLEM, TRANSPORT_FAILURE_PROBLEM};
use crate::models::IssueRecord;
use crate::providers::CompletionProvider;

/// At most this many characters of a file are embedded in the prompt.
const PROMPT_CONTENT_LIMIT: usize = 4000;

/// At most this many characters of an unparseable reply (or error message)
/// are quoted in the diagnostic record.
const RAW_PREVIEW_LIMIT: usize = 300;

/// Issue shape the model is instructed to emit. All keys optional; absent
/// keys become empty strings.
#[derive(Debug, Default, Deserialize)]
struct RawIssue {
    #[serde(default)]
    problem: String,
    #[serde(default)]
    problem_description: String,
    #[serde(default)]
    problem_snippet: String,
    #[serde(default)]
    optimization_description: String,
    #[serde(default)]
    optimization_code: String,
}

/// Runs the sustainability audit for one file at a time.
pub struct Analyzer {
    provider: Arc<dyn CompletionProvider>,
}

impl Analyzer {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    /// Analyze one file's content. Always returns at least one record.
    pub async fn analyze(&self, content: &str, display_name: &str) -> Vec<IssueRecord> {
        let prompt = build_audit_prompt(content);
        let file_name = base_name(display_name);

        match self.provider.complete(&prompt).await {
            Ok(text) => parse_issues(&text, file_name),
            Err(e) => {
                tracing::warn!(file = display_name, error = %e, "completion failed");
                vec![diagnostic_record(
                    file_name,
                    TRANSPORT_FAILURE_PROBLEM,
                    &e.to_string(),
                )]
            }
        }
    }
}

/// The fixed audit prompt, embedding at most the first
/// [`PROMPT_CONTENT_LIMIT`] characters of the file.
pub fn build_audit_prompt(content: &str) -> String {
    let code = truncate_chars(content, PROMPT_CONTENT_LIMIT);
    format!(
        "You are a senior JavaScript sustainability auditor.\n\
         Analyze the following code for energy-inefficient patterns \
         (unnecessary re-renders, polling loops, unbounded listeners, heavy \
         synchronous work, redundant network calls).\n\
         Respond ONLY with a JSON array. Each element must have the keys: \
         problem, problem_description, problem_snippet, \
         optimization_description, optimization_code.\n\n\
         Code:\n{code}"
    )
}

/// Parse the model's reply into issue records. A malformed reply yields one
/// synthetic record quoting the raw text.
fn parse_issues(text: &str, file_name: &str) -> Vec<IssueRecord> {
    match serde_json::from_str::<Vec<RawIssue>>(text.trim()) {
        Ok(raw) => raw
            .into_iter()
            .map(|issue| IssueRecord {
                file_name: file_name.to_string(),
                problem: issue.problem,
                problem_description: issue.problem_description,
                problematic_code: issue.problem_snippet,
                optimization: issue.optimization_description,
                optimized_code: issue.optimization_code,
            })
            .collect(),
        Err(_) => vec![diagnostic_record(file_name, INVALID_JSON_PROBLEM, text)],
    }
}

fn diagnostic_record(file_name: &str, problem: &str, detail: &str) -> IssueRecord {
    IssueRecord {
        file_name: file_name.to_string(),
        problem: problem.to_string(),
        problem_description: truncate_chars(detail, RAW_PREVIEW_LIMIT).to_string(),
        problematic_code: String::new(),
        optimization: String::new(),
        optimized_code: String::new(),
    }
}

fn base_name(display_name: &str) -> &str {
    Path::new(display_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(display_name)
}

/// Truncate on a character boundary, never mid-codepoint.
fn truncate_chars(s: &str, limit: usize) -> &str {
    match s.char_indices().nth(limit) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
