//! @ai:module:intent Markdown report generation
//! @ai:module:layer infrastructure
//! @ai:module:public_api MarkdownReporter
//! @ai:module:stateless true

use crate::report::format_cell;
use crate::summary::SummaryTable;
use anyhow::Result;
use std::fmt::Write as FmtWrite;
use std::path::Path;

/// @ai:intent Trait for Markdown report generation
pub trait MarkdownReporterTrait: Send + Sync {
    /// @ai:intent Generate Markdown report from a summary
    fn generate(&self, summary: &SummaryTable, charts: &[String], output_path: &Path) -> Result<()>;
}

/// @ai:intent Generates a Markdown summary with links to the rendered charts
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// @ai:intent Create a new Markdown reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Generate header section
    /// @ai:effects pure
    fn generate_header(summary: &SummaryTable) -> String {
        let mut output = String::new();

        writeln!(output, "# Epidemic Summary").unwrap();
        writeln!(output).unwrap();
        match summary.as_of {
            Some(date) => writeln!(output, "**As of:** {}", date).unwrap(),
            None => writeln!(output, "**As of:** no dates in snapshot").unwrap(),
        }
        writeln!(output, "**Countries:** {}", summary.len()).unwrap();
        writeln!(output, "**Sorted by:** {} (descending)", summary.primary).unwrap();
        writeln!(output).unwrap();

        output
    }

    /// @ai:intent Generate summary table
    /// @ai:effects pure
    fn generate_table(summary: &SummaryTable) -> String {
        let mut output = String::new();

        writeln!(output, "## Latest Values").unwrap();
        writeln!(output).unwrap();

        write!(output, "| Country |").unwrap();
        for column in &summary.columns {
            write!(output, " {} |", column).unwrap();
        }
        writeln!(output).unwrap();

        write!(output, "|---------|").unwrap();
        for _ in &summary.columns {
            write!(output, "---:|").unwrap();
        }
        writeln!(output).unwrap();

        for row in &summary.rows {
            write!(output, "| {} |", row.country.replace('|', "\\|")).unwrap();
            for value in &row.values {
                write!(output, " {} |", format_cell(*value, "-")).unwrap();
            }
            writeln!(output).unwrap();
        }

        writeln!(output).unwrap();
        output
    }

    /// @ai:intent Generate chart links section
    /// @ai:effects pure
    fn generate_charts_section(charts: &[String]) -> String {
        let mut output = String::new();
        if charts.is_empty() {
            return output;
        }

        writeln!(output, "## Charts").unwrap();
        writeln!(output).unwrap();
        for chart in charts {
            writeln!(output, "![{}]({})", chart.trim_end_matches(".svg"), chart).unwrap();
        }
        writeln!(output).unwrap();
        output
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownReporterTrait for MarkdownReporter {
    /// @ai:intent Generate Markdown report to file
    /// @ai:effects fs:write
    fn generate(&self, summary: &SummaryTable, charts: &[String], output_path: &Path) -> Result<()> {
        let mut content = String::new();

        content.push_str(&Self::generate_header(summary));
        content.push_str(&Self::generate_table(summary));
        content.push_str(&Self::generate_charts_section(charts));

        std::fs::write(output_path, content)?;
        Ok(())
    }
}
