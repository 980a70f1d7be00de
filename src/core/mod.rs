mod engine;
mod error;
mod types;

pub use engine::{run_comparison, simulate, validate};
pub use error::SimulationError;
pub use types::{
    Comparison, MonthlySnapshot, ScenarioResult, ScenarioSummary, SimulationParameters, Strategy,
};
