use tracing::debug;

use super::error::SimulationError;
use super::types::{Comparison, MonthlySnapshot, ScenarioResult, SimulationParameters, Strategy};

#[derive(Debug, Clone, Copy)]
struct LoanState {
    loan_balance: f64,
    invested_amount: f64,
}

pub fn validate(params: &SimulationParameters) -> Result<(), SimulationError> {
    let minimum_required = params.minimum_required_payment();
    if params.monthly_payment <= minimum_required {
        debug!(
            monthly_payment = params.monthly_payment,
            minimum_required, "monthly payment does not cover interest and minimum amortization"
        );
        return Err(SimulationError::InsufficientPayment {
            monthly_payment: params.monthly_payment,
            minimum_required,
        });
    }
    Ok(())
}

pub fn run_comparison(params: &SimulationParameters) -> Result<Comparison, SimulationError> {
    validate(params)?;
    Ok(Comparison {
        parameters: *params,
        payoff_first: simulate(params, Strategy::PayoffFirst),
        minimum_amortization: simulate(params, Strategy::MinimumAmortization),
    })
}

/// Steps `strategy` through the whole horizon. Does not validate `params`.
pub fn simulate(params: &SimulationParameters, strategy: Strategy) -> ScenarioResult {
    let months = params.months();
    let mut state = LoanState {
        loan_balance: params.initial_loan,
        invested_amount: 0.0,
    };
    let mut snapshots = Vec::with_capacity(months);
    for _ in 0..months {
        snapshots.push(step_month(params, strategy, &mut state));
    }

    let result = ScenarioResult {
        strategy,
        snapshots,
    };
    debug!(
        ?strategy,
        months,
        payoff_month_index = ?result.payoff_month_index(),
        final_investment = result.final_investment(),
        "scenario simulated"
    );
    result
}

fn step_month(
    params: &SimulationParameters,
    strategy: Strategy,
    state: &mut LoanState,
) -> MonthlySnapshot {
    let growth = 1.0 + params.monthly_investment_rate();
    let opening_balance = state.loan_balance;
    let interest = opening_balance * params.monthly_interest_rate();

    let (amortization, contribution) = match strategy {
        Strategy::PayoffFirst => {
            let amortization = params.monthly_payment - interest;
            state.loan_balance = (opening_balance - amortization).max(0.0);
            if state.loan_balance == 0.0 {
                // Overpayment in the payoff month is not carried into the investment.
                (opening_balance, params.monthly_payment)
            } else {
                (amortization, 0.0)
            }
        }
        Strategy::MinimumAmortization => {
            let amortization = params.minimum_amortization.min(opening_balance);
            state.loan_balance = (opening_balance - amortization).max(0.0);
            // Not floored: a shortfall draws down the invested amount.
            (amortization, params.monthly_payment - interest - amortization)
        }
    };
    state.invested_amount = state.invested_amount * growth + contribution;

    MonthlySnapshot {
        loan_balance: state.loan_balance,
        invested_amount: state.invested_amount,
        interest,
        amortization,
        contribution,
    }
}
