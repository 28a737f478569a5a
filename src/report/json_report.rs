//! @ai:module:intent JSON report generation
//! @ai:module:layer infrastructure
//! @ai:module:public_api JsonReporter, AnalysisReport
//! @ai:module:stateless true

use crate::metrics::Analysis;
use crate::summary::SummaryTable;
use anyhow::Result;
use serde::Serialize;
use std::path::Path;

/// @ai:intent Everything one run produced, as serialized to `analysis.json`
#[derive(Debug, Serialize)]
pub struct AnalysisReport<'a> {
    pub generated_at: String,
    pub countries: &'a [String],
    pub summary: &'a SummaryTable,
    pub analysis: &'a Analysis,
}

impl<'a> AnalysisReport<'a> {
    /// @ai:intent Bundle one run's results, stamped with the current time
    /// @ai:effects time
    pub fn new(analysis: &'a Analysis, summary: &'a SummaryTable, countries: &'a [String]) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            countries,
            summary,
            analysis,
        }
    }
}

/// @ai:intent Trait for JSON report generation
pub trait JsonReporterTrait: Send + Sync {
    /// @ai:intent Generate JSON report from one run
    fn generate(&self, report: &AnalysisReport<'_>, output_path: &Path) -> Result<()>;
}

/// @ai:intent Generates JSON reports from analysis results
pub struct JsonReporter;

impl JsonReporter {
    /// @ai:intent Create a new JSON reporter
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonReporterTrait for JsonReporter {
    /// @ai:intent Generate JSON report to file
    /// @ai:effects fs:write
    fn generate(&self, report: &AnalysisReport<'_>, output_path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        std::fs::write(output_path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{MetricsEngine, MetricsEngineTrait};
    use crate::series::{CountryTables, DateAxis, SeriesTable};
    use chrono::NaiveDate;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[test]
    fn test_generate_json_report() {
        let axis = DateAxis::new(vec![
            NaiveDate::from_ymd_opt(2020, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 3, 2).unwrap(),
        ])
        .unwrap();
        let rows: BTreeMap<_, _> = [("Lemuria".to_string(), vec![150, 300])].into();
        let table = SeriesTable::new(axis, rows).unwrap();
        let analysis = MetricsEngine::default()
            .compute(CountryTables {
                confirmed: table.clone(),
                deaths: table.clone(),
                recovered: table,
            })
            .unwrap();
        let summary = analysis.summary().unwrap();
        let countries = vec!["Lemuria".to_string()];

        let temp = TempDir::new().unwrap();
        let output = temp.path().join("analysis.json");
        JsonReporter::new()
            .generate(&AnalysisReport::new(&analysis, &summary, &countries), &output)
            .unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["countries"][0], "Lemuria");
        assert_eq!(value["summary"]["as_of"], "2020-03-02");
        assert_eq!(value["analysis"]["confirmed"]["rows"]["Lemuria"][1], 300);
        assert!(value["analysis"]["confirmed_daily"]["rows"]["Lemuria"][0].is_null());
    }
}
