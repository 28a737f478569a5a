//! @ai:module:intent Report generation for analysis results
//! @ai:module:layer infrastructure
//! @ai:module:public_api ReportGenerator, JsonReporter, MarkdownReporter, HtmlReporter, ChartGenerator

pub mod charts;
pub mod html_report;
pub mod json_report;
pub mod markdown_report;

pub use charts::{ChartGenerator, ChartGeneratorTrait, ChartSource, ChartSpec};
pub use html_report::{HtmlReporter, HtmlReporterTrait};
pub use json_report::{AnalysisReport, JsonReporter, JsonReporterTrait};
pub use markdown_report::{MarkdownReporter, MarkdownReporterTrait};

use crate::config::ChartConfig;
use crate::metrics::Analysis;
use crate::summary::SummaryTable;
use anyhow::Result;
use std::path::Path;

pub const JSON_FILE: &str = "analysis.json";
pub const MARKDOWN_FILE: &str = "summary.md";
pub const HTML_FILE: &str = "summary-table.html";

/// @ai:intent Combined report generator
pub struct ReportGenerator {
    json: JsonReporter,
    markdown: MarkdownReporter,
    html: HtmlReporter,
    charts: ChartGenerator,
}

impl ReportGenerator {
    /// @ai:intent Create a report generator with the given chart canvas
    /// @ai:effects pure
    pub fn new(chart_config: &ChartConfig) -> Self {
        Self {
            json: JsonReporter::new(),
            markdown: MarkdownReporter::new(),
            html: HtmlReporter::new(),
            charts: ChartGenerator::from_config(chart_config),
        }
    }

    /// @ai:intent Generate charts, summary tables and the JSON dump
    /// @ai:post returns the file names written, relative to `output_dir`
    /// @ai:effects fs:write
    pub fn generate_all(
        &self,
        analysis: &Analysis,
        summary: &SummaryTable,
        countries: &[String],
        output_dir: &Path,
    ) -> Result<Vec<String>> {
        std::fs::create_dir_all(output_dir)?;

        let mut generated = self.charts.generate_all(analysis, countries, output_dir)?;

        self.html.generate(summary, &output_dir.join(HTML_FILE))?;
        self.markdown
            .generate(summary, &generated, &output_dir.join(MARKDOWN_FILE))?;
        self.json.generate(
            &AnalysisReport::new(analysis, summary, countries),
            &output_dir.join(JSON_FILE),
        )?;
        generated.extend([HTML_FILE, MARKDOWN_FILE, JSON_FILE].map(String::from));

        tracing::info!("Reports generated in {}", output_dir.display());
        Ok(generated)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new(&ChartConfig::default())
    }
}

/// Integral values print without decimals, others with six; `undefined` otherwise.
pub(crate) fn format_cell(value: Option<f64>, undefined: &str) -> String {
    match value {
        Some(v) if v.is_finite() && v.fract() == 0.0 => format!("{:.0}", v),
        Some(v) if v.is_finite() => format!("{:.6}", v),
        _ => undefined.to_string(),
    }
}
