//! Output writing and run report formatting.

use crate::cli::ReportFormat;
use crate::error::Result;
use colored::*;
use std::fs;
use std::path::Path;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};
use volt_enricher::{RunReport, SourceStatus};
use volt_validator::CompanyProfile;

/// Serialize companies as a 2-space indented JSON array
pub fn render_companies(companies: &[CompanyProfile]) -> Result<String> {
    Ok(serde_json::to_string_pretty(companies)?)
}

/// Write the validated JSON array to `path`
pub fn write_companies(path: &Path, companies: &[CompanyProfile]) -> Result<()> {
    let mut json = render_companies(companies)?;
    json.push('\n');
    fs::write(path, json)?;
    Ok(())
}

/// Run report formatter.
pub struct Formatter {
    format: ReportFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: ReportFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the run report, or `None` when reporting is off.
    pub fn format_report(&self, report: &RunReport) -> Result<Option<String>> {
        match self.format {
            ReportFormat::None => Ok(None),
            ReportFormat::Json => Ok(Some(serde_json::to_string_pretty(report)?)),
            ReportFormat::Table => Ok(Some(self.format_report_table(report))),
        }
    }

    fn format_report_table(&self, report: &RunReport) -> String {
        let mut out = String::new();

        if report.entities.is_empty() {
            out.push_str(&self.colorize("No companies found.", "yellow"));
        } else {
            let mut builder = Builder::default();
            builder.push_record(["Company", "Aliases", "Sources", "Unresolved", "Time"]);

            for entity in &report.entities {
                let sources: Vec<String> = entity
                    .attempts
                    .iter()
                    .map(|a| self.colorize(&a.to_string(), status_color(&a.status)))
                    .collect();
                let unresolved = if entity.unresolved.is_empty() {
                    self.colorize("-", "green")
                } else {
                    let fields: Vec<&str> = entity.unresolved.iter().map(|f| f.as_str()).collect();
                    self.colorize(&fields.join(", "), "yellow")
                };
                builder.push_record([
                    entity.name.clone(),
                    entity.aliases.join(", "),
                    sources.join("\n"),
                    unresolved,
                    format!("{}ms", entity.elapsed_ms),
                ]);
            }

            let mut table = builder.build();
            table
                .with(Style::rounded())
                .with(Modify::new(Rows::first()).with(Alignment::center()));
            out.push_str(&table.to_string());
        }

        out.push('\n');
        out.push_str(&self.summary(report));

        if !report.dropped_mentions.is_empty() {
            out.push('\n');
            out.push_str(&self.warning(&format!(
                "Dropped {} mention(s): {}",
                report.dropped_mentions.len(),
                report.dropped_mentions.join(", ")
            )));
        }
        out
    }

    /// One-line run summary.
    pub fn summary(&self, report: &RunReport) -> String {
        let message = format!(
            "{} mention(s) -> {} company(ies), {} complete, {} warning(s) in {}ms",
            report.mention_count,
            report.entities.len(),
            report.complete_count(),
            report.warnings.len(),
            report.elapsed_ms
        );
        if report.warnings.is_empty() {
            self.success(&message)
        } else {
            self.warning(&message)
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            "dimmed" => text.dimmed().to_string(),
            _ => text.to_string(),
        }
    }
}

fn status_color(status: &SourceStatus) -> &'static str {
    match status {
        SourceStatus::Contributed(_) => "green",
        SourceStatus::NotFound => "yellow",
        SourceStatus::Failed(_) => "red",
        SourceStatus::Skipped(_) => "dimmed",
    }
}
