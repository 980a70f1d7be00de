use serde::Serialize;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    PayoffFirst,
    MinimumAmortization,
}

impl Strategy {
    pub fn scenario_number(self) -> u32 {
        match self {
            Strategy::PayoffFirst => 1,
            Strategy::MinimumAmortization => 2,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Strategy::PayoffFirst => "Pay off first, invest later",
            Strategy::MinimumAmortization => "Pay interest + minimum amortization, invest the rest",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationParameters {
    pub initial_loan: f64,
    pub annual_interest_rate: f64,
    pub monthly_payment: f64,
    pub minimum_amortization: f64,
    pub annual_investment_return: f64,
    pub horizon_years: u32,
}

impl SimulationParameters {
    /// Builds parameters from rates quoted in percent (6.0 means 6 %).
    pub fn from_percentages(
        initial_loan: f64,
        interest_rate_percent: f64,
        monthly_payment: f64,
        minimum_amortization: f64,
        investment_return_percent: f64,
        horizon_years: u32,
    ) -> Self {
        Self {
            initial_loan,
            annual_interest_rate: interest_rate_percent / 100.0,
            monthly_payment,
            minimum_amortization,
            annual_investment_return: investment_return_percent / 100.0,
            horizon_years,
        }
    }

    pub fn months(&self) -> usize {
        self.horizon_years as usize * 12
    }

    pub fn monthly_interest_rate(&self) -> f64 {
        self.annual_interest_rate / 12.0
    }

    pub fn monthly_investment_rate(&self) -> f64 {
        self.annual_investment_return / 12.0
    }

    pub fn minimum_required_payment(&self) -> f64 {
        self.minimum_amortization + self.initial_loan * self.monthly_interest_rate()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySnapshot {
    pub loan_balance: f64,
    pub invested_amount: f64,
    pub interest: f64,
    pub amortization: f64,
    pub contribution: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    pub strategy: Strategy,
    pub snapshots: Vec<MonthlySnapshot>,
}

impl ScenarioResult {
    pub fn months(&self) -> usize {
        self.snapshots.len()
    }

    pub fn loan_balances(&self) -> impl Iterator<Item = f64> + '_ {
        self.snapshots.iter().map(|s| s.loan_balance)
    }

    pub fn invested_amounts(&self) -> impl Iterator<Item = f64> + '_ {
        self.snapshots.iter().map(|s| s.invested_amount)
    }

    pub fn payoff_month_index(&self) -> Option<usize> {
        self.snapshots.iter().position(|s| s.loan_balance == 0.0)
    }

    /// Monthly payments made up to and including the payoff month, or the
    /// horizon length when the loan outlives it.
    pub fn months_to_payoff(&self) -> usize {
        self.payoff_month_index()
            .map(|idx| idx + 1)
            .unwrap_or(self.months())
    }

    pub fn final_investment(&self) -> f64 {
        self.snapshots
            .last()
            .map(|s| s.invested_amount)
            .unwrap_or(0.0)
    }

    pub fn summary(&self) -> ScenarioSummary {
        let amortizations = || {
            self.snapshots
                .iter()
                .map(|s| s.amortization)
                .filter(|a| *a > 0.0)
        };
        let contributions = || {
            self.snapshots
                .iter()
                .map(|s| s.contribution)
                .filter(|c| *c != 0.0)
        };

        ScenarioSummary {
            strategy: self.strategy,
            months: self.months(),
            payoff_month_index: self.payoff_month_index(),
            months_to_payoff: self.months_to_payoff(),
            final_investment: self.final_investment(),
            final_loan_balance: self.snapshots.last().map(|s| s.loan_balance).unwrap_or(0.0),
            total_interest_paid: self.snapshots.iter().map(|s| s.interest).sum(),
            first_amortization: amortizations().next(),
            last_amortization: amortizations().last(),
            first_contribution: contributions().next(),
            last_contribution: contributions().last(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSummary {
    pub strategy: Strategy,
    pub months: usize,
    pub payoff_month_index: Option<usize>,
    pub months_to_payoff: usize,
    pub final_investment: f64,
    pub final_loan_balance: f64,
    pub total_interest_paid: f64,
    pub first_amortization: Option<f64>,
    pub last_amortization: Option<f64>,
    pub first_contribution: Option<f64>,
    pub last_contribution: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
    pub parameters: SimulationParameters,
    pub payoff_first: ScenarioResult,
    pub minimum_amortization: ScenarioResult,
}

impl Comparison {
    pub fn scenarios(&self) -> [&ScenarioResult; 2] {
        [&self.payoff_first, &self.minimum_amortization]
    }
}
