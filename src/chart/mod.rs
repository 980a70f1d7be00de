use std::fs;
use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::prelude::*;
use thiserror::Error;
use tracing::info;

use crate::core::{Comparison, ScenarioResult};
use crate::report::{format_amount, group_thousands};

pub const DEFAULT_SIZE: (u32, u32) = (1200, 600);

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("failed to render chart: {0}")]
    Render(String),
    #[error("failed to write chart to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub trait ChartSink {
    fn render(&mut self, comparison: &Comparison) -> Result<(), ChartError>;
}

#[derive(Debug, Clone)]
pub struct SvgChart {
    path: PathBuf,
    currency: String,
    size: (u32, u32),
}

impl SvgChart {
    pub fn new(path: impl Into<PathBuf>, currency: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            currency: currency.into(),
            size: DEFAULT_SIZE,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ChartSink for SvgChart {
    fn render(&mut self, comparison: &Comparison) -> Result<(), ChartError> {
        let svg = render_svg(comparison, &self.currency, self.size)?;
        fs::write(&self.path, svg).map_err(|source| ChartError::Write {
            path: self.path.clone(),
            source,
        })?;
        info!(path = %self.path.display(), "chart written");
        Ok(())
    }
}

pub fn render_svg(
    comparison: &Comparison,
    currency: &str,
    size: (u32, u32),
) -> Result<String, ChartError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        draw_comparison(&root, comparison, currency)?;
    }
    Ok(svg)
}

fn render_error<E: std::fmt::Display>(err: E) -> ChartError {
    ChartError::Render(err.to_string())
}

fn draw_comparison<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    comparison: &Comparison,
    currency: &str,
) -> Result<(), ChartError> {
    root.fill(&WHITE).map_err(render_error)?;
    let panels = root.split_evenly((1, 2));
    for (panel, scenario) in panels.iter().zip(comparison.scenarios()) {
        draw_panel(panel, scenario, currency)?;
    }
    root.present().map_err(render_error)
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    scenario: &ScenarioResult,
    currency: &str,
) -> Result<(), ChartError> {
    let strategy = scenario.strategy;
    let area = area
        .titled(
            &format!("Scenario {}: {}", strategy.scenario_number(), strategy.title()),
            ("sans-serif", 18),
        )
        .map_err(render_error)?;

    let (y_min, y_max) = amount_range(scenario);
    let mut chart = ChartBuilder::on(&area)
        .caption(
            format!(
                "Final Investment: {} {currency}",
                format_amount(scenario.final_investment())
            ),
            ("sans-serif", 15),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(90)
        .build_cartesian_2d(0..scenario.months().max(1), y_min..y_max)
        .map_err(render_error)?;

    let y_desc = format!("Amount ({currency})");
    chart
        .configure_mesh()
        .x_desc("Months")
        .y_desc(y_desc.as_str())
        .y_label_formatter(&|v: &f64| group_thousands(*v, 0))
        .draw()
        .map_err(render_error)?;

    chart
        .draw_series(LineSeries::new(scenario.loan_balances().enumerate(), &RED))
        .map_err(render_error)?
        .label("Loan Balance")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));
    chart
        .draw_series(LineSeries::new(scenario.invested_amounts().enumerate(), &BLUE))
        .map_err(render_error)?
        .label("Investments")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(render_error)
}

/// Y range covering both series, always including zero.
fn amount_range(scenario: &ScenarioResult) -> (f64, f64) {
    let (min, max) = scenario
        .loan_balances()
        .chain(scenario.invested_amounts())
        .filter(|v| v.is_finite())
        .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let padding = (max - min) * 0.05;
    if padding > 0.0 {
        (min - if min < 0.0 { padding } else { 0.0 }, max + padding)
    } else {
        (min, min + 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{SimulationParameters, run_comparison};

    fn sample_comparison() -> Comparison {
        let params =
            SimulationParameters::from_percentages(1_000_000.0, 6.0, 10_000.0, 2_000.0, 6.0, 30);
        run_comparison(&params).expect("valid parameters")
    }

    #[test]
    fn svg_contains_both_panel_titles_and_final_figures() {
        let comparison = sample_comparison();
        let svg = render_svg(&comparison, "SEK", DEFAULT_SIZE).expect("svg renders");

        assert!(svg.contains("<svg"));
        assert!(svg.contains("Scenario 1: Pay off first, invest later"));
        assert!(svg.contains("Scenario 2: Pay interest + minimum amortization, invest the rest"));
        for scenario in comparison.scenarios() {
            let caption = format!(
                "Final Investment: {} SEK",
                format_amount(scenario.final_investment())
            );
            assert!(svg.contains(&caption), "missing caption {caption}");
        }
        assert!(svg.contains("Loan Balance"));
        assert!(svg.contains("Investments"));
        assert!(svg.contains("Months"));
        assert!(svg.contains("Amount (SEK)"));
    }

    #[test]
    fn svg_chart_writes_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("result.svg");
        let mut chart = SvgChart::new(&path, "EUR").with_size(800, 400);

        chart.render(&sample_comparison()).expect("chart renders");

        let contents = fs::read_to_string(chart.path()).expect("chart file exists");
        assert!(contents.contains("Amount (EUR)"));
    }

    #[test]
    fn svg_chart_reports_unwritable_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("missing").join("result.svg");
        let err = SvgChart::new(&path, "SEK")
            .render(&sample_comparison())
            .expect_err("parent directory does not exist");
        assert!(matches!(err, ChartError::Write { .. }));
    }

    #[test]
    fn amount_range_includes_zero_and_pads_top() {
        let comparison = sample_comparison();
        let (lo, hi) = amount_range(&comparison.payoff_first);
        assert_eq!(lo, 0.0);
        assert!(hi > comparison.payoff_first.final_investment());
        assert!(hi > 1_000_000.0);
    }
}
