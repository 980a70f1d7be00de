mod error;
mod input;

pub use error::CliError;
pub use input::{ParameterValues, Prompter, RawInputs, SimulationPayload, build_parameters};

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::{debug, info};

use crate::chart::{ChartSink, SvgChart};
use crate::core::{Comparison, run_comparison};
use crate::report::{JsonReport, ReportSink, TextReport};

pub const DEFAULT_CURRENCY: &str = "SEK";

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "mortgage-or-invest",
    about = "Compare paying a loan off first against minimum amortization while investing the rest"
)]
pub struct Cli {
    #[arg(
        long,
        alias = "initial_loan",
        allow_negative_numbers = true,
        help = "Initial loan amount"
    )]
    pub initial_loan: Option<f64>,
    #[arg(
        long,
        alias = "interest_rate",
        allow_negative_numbers = true,
        help = "Annual interest rate in percent"
    )]
    pub interest_rate: Option<f64>,
    #[arg(
        long,
        alias = "monthly_payment",
        allow_negative_numbers = true,
        help = "Monthly payment amount"
    )]
    pub monthly_payment: Option<f64>,
    #[arg(
        long,
        alias = "minimum_amortization",
        allow_negative_numbers = true,
        help = "Minimum monthly amortization"
    )]
    pub minimum_amortization: Option<f64>,
    #[arg(
        long,
        alias = "investment_return",
        allow_negative_numbers = true,
        help = "Annual investment return in percent"
    )]
    pub investment_return: Option<f64>,
    #[arg(long, help = "Number of years to simulate")]
    pub years: Option<u32>,
    #[arg(
        long,
        help = "JSON file with any of the parameters; flags take precedence"
    )]
    pub config: Option<PathBuf>,
    #[arg(long, default_value = "result.svg", help = "Where to write the chart")]
    pub output: PathBuf,
    #[arg(long, help = "Currency label for amounts [default: SEK]")]
    pub currency: Option<String>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    #[arg(long, help = "Skip writing the chart")]
    pub no_chart: bool,
    #[arg(long, help = "Fail instead of prompting for missing parameters")]
    pub no_prompt: bool,
    #[arg(short, long, help = "Enable debug logging")]
    pub verbose: bool,
}

impl Cli {
    pub fn values(&self) -> ParameterValues {
        ParameterValues {
            initial_loan: self.initial_loan,
            interest_rate: self.interest_rate,
            monthly_payment: self.monthly_payment,
            minimum_amortization: self.minimum_amortization,
            investment_return: self.investment_return,
            years: self.years,
        }
    }
}

#[derive(Debug)]
pub struct RunOutcome {
    pub comparison: Comparison,
    pub chart_path: Option<PathBuf>,
}

/// Prompts go to `prompts` so `output` carries nothing but the report.
pub fn run<R: BufRead, W: Write, P: Write>(
    cli: Cli,
    input: &mut R,
    output: &mut W,
    prompts: &mut P,
) -> Result<RunOutcome, CliError> {
    let payload = match &cli.config {
        Some(path) => SimulationPayload::load(path)?,
        None => SimulationPayload::default(),
    };
    let values = cli.values().or(payload.values());
    let currency = cli
        .currency
        .clone()
        .or(payload.currency)
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

    let raw = Prompter::new(input, prompts, !cli.no_prompt).complete(values)?;
    let params = build_parameters(raw)?;
    debug!(?params, "parameters resolved");

    let comparison = run_comparison(&params)?;
    info!(
        payoff_first_months = comparison.payoff_first.months_to_payoff(),
        minimum_amortization_months = comparison.minimum_amortization.months_to_payoff(),
        "simulation finished"
    );

    match cli.format {
        OutputFormat::Text => TextReport::new(&mut *output, currency.as_str()).report(&comparison)?,
        OutputFormat::Json => JsonReport::new(&mut *output, currency.as_str()).report(&comparison)?,
    }

    let chart_path = if cli.no_chart {
        None
    } else {
        let mut chart = SvgChart::new(&cli.output, currency.as_str());
        chart.render(&comparison)?;
        if cli.format == OutputFormat::Text {
            writeln!(output, "\nChart saved to {}", cli.output.display())?;
        }
        Some(cli.output)
    };

    Ok(RunOutcome {
        comparison,
        chart_path,
    })
}
