//! @ai:module:intent HTML rendering of the summary table
//! @ai:module:layer infrastructure
//! @ai:module:public_api HtmlReporter
//! @ai:module:stateless true

use crate::report::format_cell;
use crate::summary::SummaryTable;
use anyhow::Result;
use maud::{html, Markup, DOCTYPE};
use std::path::Path;

/// @ai:intent Trait for HTML summary generation
pub trait HtmlReporterTrait: Send + Sync {
    /// @ai:intent Write the summary table as a standalone HTML page
    fn generate(&self, summary: &SummaryTable, output_path: &Path) -> Result<()>;
}

/// @ai:intent Renders the summary as an HTML table, undefined cells as `NaN`
pub struct HtmlReporter;

impl HtmlReporter {
    /// @ai:intent Create a new HTML reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Build the full HTML document; interpolated text is escaped by maud
    /// @ai:effects pure
    pub fn render(summary: &SummaryTable) -> String {
        let as_of = summary
            .as_of
            .map(|d| d.to_string())
            .unwrap_or_else(|| "n/a".to_string());

        let page: Markup = html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="utf-8";
                    title { "Summary " (as_of) }
                }
                body {
                    table border="1" class="dataframe" {
                        thead {
                            tr {
                                th { "country" }
                                @for column in &summary.columns {
                                    th { (column) }
                                }
                            }
                        }
                        tbody {
                            @for row in &summary.rows {
                                tr {
                                    th { (row.country) }
                                    @for value in &row.values {
                                        td { (format_cell(*value, "NaN")) }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        };
        page.into_string()
    }
}

impl Default for HtmlReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlReporterTrait for HtmlReporter {
    /// @ai:effects fs:write
    fn generate(&self, summary: &SummaryTable, output_path: &Path) -> Result<()> {
        std::fs::write(output_path, Self::render(summary))?;
        Ok(())
    }
}
