use std::io::Write;

use serde::Serialize;

use super::{ReportError, ReportSink};
use crate::core::{Comparison, ScenarioSummary, SimulationParameters};

pub struct JsonReport<W: Write> {
    out: W,
    currency: String,
}

impl<W: Write> JsonReport<W> {
    pub fn new(out: W, currency: impl Into<String>) -> Self {
        Self {
            out,
            currency: currency.into(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportDocument<'a> {
    currency: &'a str,
    parameters: &'a SimulationParameters,
    minimum_required_payment: f64,
    scenarios: Vec<ScenarioDocument>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScenarioDocument {
    #[serde(flatten)]
    summary: ScenarioSummary,
    loan_balances: Vec<f64>,
    invested_amounts: Vec<f64>,
}

impl<W: Write> ReportSink for JsonReport<W> {
    fn report(&mut self, comparison: &Comparison) -> Result<(), ReportError> {
        let document = ReportDocument {
            currency: &self.currency,
            parameters: &comparison.parameters,
            minimum_required_payment: comparison.parameters.minimum_required_payment(),
            scenarios: comparison
                .scenarios()
                .into_iter()
                .map(|scenario| ScenarioDocument {
                    summary: scenario.summary(),
                    loan_balances: scenario.loan_balances().collect(),
                    invested_amounts: scenario.invested_amounts().collect(),
                })
                .collect(),
        };
        serde_json::to_writer_pretty(&mut self.out, &document)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}
