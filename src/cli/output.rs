//! Output formatting for CLI commands.
//!
//! This module renders a [`DiffSummary`] for the user in the various
//! output formats.

use colored::Colorize;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt::Write;
use tabled::{Table, Tabled};

use crate::diff::{DiffChange, DiffOperation, DiffResult, DiffSummary, EntityType, SummaryCounts};
use crate::error::{Result, StoresyncError};

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Introspect row for table display.
#[derive(Tabled)]
struct IntrospectRow {
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Type")]
    entity_type: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Changes")]
    changes: String,
}

/// JSON document for one comparison run.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryJson<'a> {
    summary: SummaryCounts,
    results: Vec<ResultJson<'a>>,
}

/// JSON rendering of one result.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResultJson<'a> {
    operation: DiffOperation,
    entity_type: EntityType,
    entity_name: &'a str,
    severity: &'static str,
    changes: &'a [DiffChange],
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the result of `diff`.
    ///
    /// # Errors
    ///
    /// Returns an error if the summary counts are inconsistent (JSON only)
    /// or serialization fails.
    pub fn format_diff(&self, summary: &DiffSummary) -> Result<String> {
        match self.format {
            OutputFormat::Text => Ok(Self::format_text(summary)),
            OutputFormat::Summary => Ok(Self::format_summary_line(summary)),
            OutputFormat::Json => Self::format_json(summary),
            OutputFormat::Markdown => Ok(Self::format_markdown(summary)),
        }
    }

    /// Formats the result of `introspect`.
    ///
    /// The summary is expected to be oriented towards the local file.
    ///
    /// # Errors
    ///
    /// Returns an error under the same conditions as [`Self::format_diff`].
    pub fn format_introspect(&self, summary: &DiffSummary) -> Result<String> {
        match self.format {
            OutputFormat::Text => Ok(Self::format_introspect_text(summary)),
            _ => self.format_diff(summary),
        }
    }

    /// Formats the detailed text view, grouped by entity type.
    fn format_text(summary: &DiffSummary) -> String {
        if !summary.has_changes() {
            return format!(
                "{} No differences found - configuration is in sync.\n",
                "✓".green()
            );
        }

        let mut output = String::from("\nConfiguration diff\n");

        for (entity_type, results) in group_by_type(summary.results()) {
            let _ = write!(output, "\n{} ({})\n", entity_type.label().bold(), results.len());
            for result in results {
                let _ = writeln!(
                    output,
                    "  {} {}",
                    Self::operation_marker(result.operation),
                    result.entity_name
                );
                for change in &result.changes {
                    let _ = writeln!(output, "      {}", change.description);
                }
            }
        }

        output.push('\n');
        output.push_str(&Self::format_summary_line(summary));
        output
    }

    /// Formats the one-line summary.
    fn format_summary_line(summary: &DiffSummary) -> String {
        format!(
            "Diff: {} to create, {} to update, {} to delete ({} total)\n",
            summary.creates().to_string().green(),
            summary.updates().to_string().yellow(),
            summary.deletes().to_string().red(),
            summary.total_changes()
        )
    }

    /// Formats the machine-readable JSON document.
    fn format_json(summary: &DiffSummary) -> Result<String> {
        let counts = summary.counts();
        counts.validate()?;

        let document = SummaryJson {
            summary: counts,
            results: summary
                .results()
                .iter()
                .map(|r| ResultJson {
                    operation: r.operation,
                    entity_type: r.entity_type,
                    entity_name: &r.entity_name,
                    severity: severity(r.operation),
                    changes: &r.changes,
                })
                .collect(),
        };

        serde_json::to_string_pretty(&document)
            .map_err(|e| StoresyncError::internal(format!("Failed to serialize diff: {e}")))
    }

    /// Formats a review comment with one collapsible block per entity type.
    fn format_markdown(summary: &DiffSummary) -> String {
        let mut output = String::from("## Configuration diff\n\n");

        if !summary.has_changes() {
            output.push_str("No differences found.\n");
            return output;
        }

        let _ = writeln!(
            output,
            "**{} change(s)**: {} to create, {} to update, {} to delete",
            summary.total_changes(),
            summary.creates(),
            summary.updates(),
            summary.deletes()
        );

        for (entity_type, results) in group_by_type(summary.results()) {
            let _ = write!(
                output,
                "\n<details>\n<summary>{} ({})</summary>\n\n",
                entity_type.label(),
                results.len()
            );
            for result in results {
                let _ = writeln!(output, "- **{}** `{}`", result.operation, result.entity_name);
                for change in &result.changes {
                    let _ = writeln!(output, "  - `{}`: {}", change.field, change.description);
                }
            }
            output.push_str("\n</details>\n");
        }

        output
    }

    /// Formats the introspect view as a table of what the file would gain
    /// or lose.
    fn format_introspect_text(summary: &DiffSummary) -> String {
        if !summary.has_changes() {
            return format!(
                "{} Local configuration already matches the remote platform.\n",
                "✓".green()
            );
        }

        let rows: Vec<IntrospectRow> = summary
            .results()
            .iter()
            .map(|r| IntrospectRow {
                action: introspect_action(r.operation).to_string(),
                entity_type: r.entity_type.label().to_string(),
                name: truncate(&r.entity_name, 40),
                changes: if r.changes.is_empty() {
                    String::from("-")
                } else {
                    r.changes.len().to_string()
                },
            })
            .collect();

        let mut output = String::from("\nLocal file changes\n");
        output.push_str(&Table::new(rows).to_string());
        output.push('\n');
        let _ = write!(
            output,
            "\nIntrospect: {} to add, {} to update, {} to remove\n",
            summary.creates().to_string().green(),
            summary.updates().to_string().yellow(),
            summary.deletes().to_string().red()
        );
        output
    }

    /// Formats an operation marker.
    fn operation_marker(operation: DiffOperation) -> String {
        match operation {
            DiffOperation::Create => "+".green().to_string(),
            DiffOperation::Update => "~".yellow().to_string(),
            DiffOperation::Delete => "-".red().to_string(),
        }
    }
}

/// Groups results by entity type, keeping first-seen order.
fn group_by_type(results: &[DiffResult]) -> IndexMap<EntityType, Vec<&DiffResult>> {
    let mut groups: IndexMap<EntityType, Vec<&DiffResult>> = IndexMap::new();
    for result in results {
        groups.entry(result.entity_type).or_default().push(result);
    }
    groups
}

/// Severity of an operation for automated review.
const fn severity(operation: DiffOperation) -> &'static str {
    match operation {
        DiffOperation::Delete => "high",
        DiffOperation::Update => "medium",
        DiffOperation::Create => "low",
    }
}

const fn introspect_action(operation: DiffOperation) -> &'static str {
    match operation {
        DiffOperation::Create => "add to file",
        DiffOperation::Update => "update in file",
        DiffOperation::Delete => "remove from file",
    }
}

/// Truncates a string to a maximum length.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
