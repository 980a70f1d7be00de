use std::io::Write;

use super::{ReportError, ReportSink, format_amount};
use crate::core::{Comparison, ScenarioSummary, SimulationParameters, Strategy};

pub struct TextReport<W: Write> {
    out: W,
    currency: String,
}

impl<W: Write> TextReport<W> {
    pub fn new(out: W, currency: impl Into<String>) -> Self {
        Self {
            out,
            currency: currency.into(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn money(&self, value: f64) -> String {
        format!("{} {}", format_amount(value), self.currency)
    }

    fn optional_money(&self, value: Option<f64>) -> String {
        value
            .map(|v| self.money(v))
            .unwrap_or_else(|| "n/a".to_string())
    }

    fn write_parameters(&mut self, params: &SimulationParameters) -> Result<(), ReportError> {
        let lines = [
            "Simulation Parameters:".to_string(),
            format!("Initial Loan Amount: {}", self.money(params.initial_loan)),
            format!(
                "Annual Interest Rate: {:.2}%",
                params.annual_interest_rate * 100.0
            ),
            format!("Monthly Payment: {}", self.money(params.monthly_payment)),
            format!(
                "Minimum Monthly Amortization: {}",
                self.money(params.minimum_amortization)
            ),
            format!(
                "Annual Investment Return: {:.2}%",
                params.annual_investment_return * 100.0
            ),
            format!("Years: {}", params.horizon_years),
        ];
        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }

    fn write_scenario(
        &mut self,
        params: &SimulationParameters,
        summary: &ScenarioSummary,
    ) -> Result<(), ReportError> {
        let strategy = summary.strategy;
        let description = match strategy {
            Strategy::PayoffFirst => format!(
                "In this scenario, the family pays off the loan first, using the full {} and then invests the amount each month.",
                format_amount(params.monthly_payment)
            ),
            Strategy::MinimumAmortization => "In this scenario, the family pays the interest and minimum amortization on the loan first, and then invests the remaining amount each month.".to_string(),
        };

        writeln!(
            self.out,
            "Scenario {}: {}",
            strategy.scenario_number(),
            strategy.title()
        )?;
        writeln!(self.out, "{description}")?;
        writeln!(
            self.out,
            "Months to pay off loan: {} (monthly payments made)",
            summary.months_to_payoff
        )?;
        if summary.payoff_month_index.is_none() {
            writeln!(
                self.out,
                "Loan not paid off within {} months; remaining balance: {}",
                summary.months,
                self.money(summary.final_loan_balance)
            )?;
        }
        writeln!(
            self.out,
            "First amortization payment: {}",
            self.optional_money(summary.first_amortization)
        )?;
        writeln!(
            self.out,
            "Last amortization payment: {}",
            self.optional_money(summary.last_amortization)
        )?;
        writeln!(
            self.out,
            "First investment amount: {}",
            self.optional_money(summary.first_contribution)
        )?;
        writeln!(
            self.out,
            "Last investment amount: {}",
            self.optional_money(summary.last_contribution)
        )?;
        writeln!(
            self.out,
            "Total interest paid: {}",
            self.money(summary.total_interest_paid)
        )?;
        writeln!(
            self.out,
            "Final Investment Amount: {}",
            self.money(summary.final_investment)
        )?;
        Ok(())
    }
}

impl<W: Write> ReportSink for TextReport<W> {
    fn report(&mut self, comparison: &Comparison) -> Result<(), ReportError> {
        let params = &comparison.parameters;
        self.write_parameters(params)?;
        writeln!(self.out)?;
        writeln!(self.out, "Results:")?;
        for (idx, scenario) in comparison.scenarios().into_iter().enumerate() {
            if idx > 0 {
                writeln!(self.out)?;
            }
            self.write_scenario(params, &scenario.summary())?;
        }
        self.out.flush()?;
        Ok(())
    }
}
