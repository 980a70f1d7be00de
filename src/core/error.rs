use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error(
        "Monthly payment must be greater than {minimum_required:.2}, the minimum amortization and interest on the mortgage."
    )]
    InsufficientPayment {
        monthly_payment: f64,
        minimum_required: f64,
    },
}
