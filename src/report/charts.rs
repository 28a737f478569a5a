//! @ai:module:intent Multi-line SVG charts of country series
//! @ai:module:layer infrastructure
//! @ai:module:public_api ChartGenerator, ChartGeneratorTrait, ChartSource, ChartSpec

use crate::config::ChartConfig;
use crate::metrics::{Analysis, DayZeroTable};
use crate::series::{SeriesTable, SeriesValue};
use anyhow::{Context, Result};
use plotters::prelude::*;
use std::path::Path;

/// @ai:intent Anything that can be drawn as one line per country
pub trait ChartSource {
    /// One label per x position.
    fn x_labels(&self) -> Vec<String>;

    /// Values of one country, `None` where undefined.
    fn line(&self, country: &str) -> Option<Vec<Option<f64>>>;
}

impl<V: SeriesValue> ChartSource for SeriesTable<V> {
    fn x_labels(&self) -> Vec<String> {
        self.axis()
            .dates()
            .iter()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .collect()
    }

    fn line(&self, country: &str) -> Option<Vec<Option<f64>>> {
        self.get(country)
            .map(|row| row.iter().map(SeriesValue::value).collect())
    }
}

impl ChartSource for DayZeroTable {
    fn x_labels(&self) -> Vec<String> {
        self.offsets().iter().map(|o| o.to_string()).collect()
    }

    fn line(&self, country: &str) -> Option<Vec<Option<f64>>> {
        self.get(country)
            .map(|row| row.iter().map(SeriesValue::value).collect())
    }
}

/// @ai:intent One chart to render: output file, title, axis captions, data
pub struct ChartSpec<'a> {
    pub file_name: &'static str,
    pub title: String,
    pub x_desc: &'static str,
    pub y_desc: &'static str,
    pub source: &'a dyn ChartSource,
}

/// @ai:intent Trait for chart generation
pub trait ChartGeneratorTrait {
    /// @ai:intent Render every chart of an analysis for the selected countries
    fn generate_all(
        &self,
        analysis: &Analysis,
        countries: &[String],
        output_dir: &Path,
    ) -> Result<Vec<String>>;
}

/// @ai:intent Renders series tables with plotters' SVG backend
pub struct ChartGenerator {
    width: u32,
    height: u32,
}

impl ChartGenerator {
    /// @ai:intent Create a chart generator with a canvas size
    /// @ai:effects pure
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn from_config(config: &ChartConfig) -> Self {
        Self::new(config.width, config.height)
    }

    /// @ai:intent List every chart derived from an analysis, titles included
    /// @ai:effects pure
    pub fn chart_specs(analysis: &Analysis) -> Vec<ChartSpec<'_>> {
        let min_deaths = analysis.config.ratio_min_deaths;
        let day_zero = &analysis.config.day_zero;

        vec![
            ChartSpec {
                file_name: "confirmed.svg",
                title: "Number of confirmed".to_string(),
                x_desc: "Date",
                y_desc: "Cases",
                source: &analysis.confirmed,
            },
            ChartSpec {
                file_name: "deaths.svg",
                title: "Number of deaths".to_string(),
                x_desc: "Date",
                y_desc: "Deaths",
                source: &analysis.deaths,
            },
            ChartSpec {
                file_name: "recovered.svg",
                title: "Number of recovered".to_string(),
                x_desc: "Date",
                y_desc: "Recovered",
                source: &analysis.recovered,
            },
            ChartSpec {
                file_name: "deaths_over_confirmed.svg",
                title: format!(
                    "Evolution of ratio (deaths / confirmed), only when more than {} deaths",
                    min_deaths
                ),
                x_desc: "Date",
                y_desc: "Ratio",
                source: &analysis.deaths_over_confirmed,
            },
            ChartSpec {
                file_name: "deaths_over_closed.svg",
                title: format!(
                    "Evolution of ratio (deaths / (deaths + recovered)), only when more than {} deaths",
                    min_deaths
                ),
                x_desc: "Date",
                y_desc: "Ratio",
                source: &analysis.deaths_over_closed,
            },
            ChartSpec {
                file_name: "confirmed_daily.svg",
                title: "Confirmed per country, daily increase".to_string(),
                x_desc: "Date",
                y_desc: "New cases",
                source: &analysis.confirmed_daily,
            },
            ChartSpec {
                file_name: "deaths_daily.svg",
                title: "Deaths per country, daily increase".to_string(),
                x_desc: "Date",
                y_desc: "New deaths",
                source: &analysis.deaths_daily,
            },
            ChartSpec {
                file_name: "recovered_daily.svg",
                title: "Recovered per country, daily increase".to_string(),
                x_desc: "Date",
                y_desc: "New recoveries",
                source: &analysis.recovered_daily,
            },
            ChartSpec {
                file_name: "confirmed_daily_smoothed.svg",
                title: format!(
                    "Confirmed per country, daily increase, exponentially averaged (beta = {}) with bias correction - WARNING: delay as a cost of smoothness",
                    analysis.confirmed_daily_smoothed.beta
                ),
                x_desc: "Date",
                y_desc: "New cases (smoothed)",
                source: &analysis.confirmed_daily_smoothed.bias_corrected,
            },
            ChartSpec {
                file_name: "confirmed_day_zero.svg",
                title: format!(
                    "Confirmed since day zero (first day with at least {} cases)",
                    day_zero.confirmed_threshold
                ),
                x_desc: "Days since day zero",
                y_desc: "Cases",
                source: &analysis.confirmed_day_zero,
            },
            ChartSpec {
                file_name: "deaths_day_zero.svg",
                title: format!(
                    "Deaths since day zero (first day with at least {} deaths)",
                    day_zero.deaths_threshold
                ),
                x_desc: "Days since day zero",
                y_desc: "Deaths",
                source: &analysis.deaths_day_zero,
            },
        ]
    }

    /// @ai:intent Draw one multi-line chart; undefined cells break the line
    /// @ai:effects fs:write
    fn render(&self, spec: &ChartSpec<'_>, countries: &[String], output_path: &Path) -> Result<()> {
        let labels = spec.source.x_labels();
        let lines: Vec<(&str, Vec<Vec<(i32, f64)>>)> = countries
            .iter()
            .filter_map(|c| spec.source.line(c).map(|l| (c.as_str(), segments(&l))))
            .collect();
        let (y_min, y_max) = value_range(lines.iter().map(|(_, segs)| segs.as_slice()));
        let x_max = (labels.len().max(2) - 1) as i32;

        let root = SVGBackend::new(output_path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&spec.title, ("sans-serif", 20))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(0..x_max, y_min..y_max)?;

        chart
            .configure_mesh()
            .x_labels(10)
            .x_desc(spec.x_desc)
            .y_desc(spec.y_desc)
            .x_label_formatter(&|x: &i32| labels.get(*x as usize).cloned().unwrap_or_default())
            .draw()?;

        for (i, (country, segs)) in lines.iter().enumerate() {
            let color = Palette99::pick(i).mix(0.9);
            for (j, seg) in segs.iter().enumerate() {
                let series =
                    chart.draw_series(LineSeries::new(seg.iter().copied(), color.stroke_width(2)))?;
                if j == 0 {
                    series
                        .label(*country)
                        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
                }
            }
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        root.present()?;
        Ok(())
    }
}

impl Default for ChartGenerator {
    fn default() -> Self {
        Self::from_config(&ChartConfig::default())
    }
}

impl ChartGeneratorTrait for ChartGenerator {
    /// @ai:effects fs:write
    fn generate_all(
        &self,
        analysis: &Analysis,
        countries: &[String],
        output_dir: &Path,
    ) -> Result<Vec<String>> {
        std::fs::create_dir_all(output_dir)?;

        let mut generated = Vec::new();
        for spec in Self::chart_specs(analysis) {
            tracing::info!("Plotting graph: {}", spec.title);
            let path = output_dir.join(spec.file_name);
            self.render(&spec, countries, &path)
                .with_context(|| format!("Failed to render {}", path.display()))?;
            generated.push(spec.file_name.to_string());
        }

        Ok(generated)
    }
}

/// Contiguous runs of defined values, as (x index, y) points.
fn segments(values: &[Option<f64>]) -> Vec<Vec<(i32, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();

    for (i, value) in values.iter().enumerate() {
        match value {
            Some(v) if v.is_finite() => current.push((i as i32, *v)),
            _ => {
                if !current.is_empty() {
                    runs.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Y range covering every point, padded so flat or empty charts still draw.
fn value_range<'a, I>(lines: I) -> (f64, f64)
where
    I: Iterator<Item = &'a [Vec<(i32, f64)>]>,
{
    let (min, max) = lines
        .flat_map(|segs| segs.iter().flatten())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, y)| {
            (lo.min(y), hi.max(y))
        });

    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }

    let pad = ((max - min) * 0.05).max(if max == 0.0 { 1.0 } else { max.abs() * 0.05 });
    (min.min(0.0) - if min < 0.0 { pad } else { 0.0 }, max + pad)
}
