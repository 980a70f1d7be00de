use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use tracing::debug;

use super::error::CliError;
use crate::core::SimulationParameters;

pub const MAX_YEARS: u32 = 100;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationPayload {
    #[serde(alias = "initial_loan")]
    pub initial_loan: Option<f64>,
    #[serde(alias = "interest_rate")]
    pub interest_rate: Option<f64>,
    #[serde(alias = "monthly_payment")]
    pub monthly_payment: Option<f64>,
    #[serde(alias = "minimum_amortization")]
    pub minimum_amortization: Option<f64>,
    #[serde(alias = "investment_return")]
    pub investment_return: Option<f64>,
    pub years: Option<u32>,
    pub currency: Option<String>,
}

impl SimulationPayload {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let raw = fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| CliError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

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

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ParameterValues {
    pub initial_loan: Option<f64>,
    pub interest_rate: Option<f64>,
    pub monthly_payment: Option<f64>,
    pub minimum_amortization: Option<f64>,
    pub investment_return: Option<f64>,
    pub years: Option<u32>,
}

impl ParameterValues {
    pub fn or(self, fallback: ParameterValues) -> Self {
        Self {
            initial_loan: self.initial_loan.or(fallback.initial_loan),
            interest_rate: self.interest_rate.or(fallback.interest_rate),
            monthly_payment: self.monthly_payment.or(fallback.monthly_payment),
            minimum_amortization: self.minimum_amortization.or(fallback.minimum_amortization),
            investment_return: self.investment_return.or(fallback.investment_return),
            years: self.years.or(fallback.years),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawInputs {
    pub initial_loan: f64,
    pub interest_rate: f64,
    pub monthly_payment: f64,
    pub minimum_amortization: f64,
    pub investment_return: f64,
    pub years: u32,
}

pub struct Prompter<'a, R, W> {
    input: &'a mut R,
    output: &'a mut W,
    enabled: bool,
}

impl<'a, R: BufRead, W: Write> Prompter<'a, R, W> {
    pub fn new(input: &'a mut R, output: &'a mut W, enabled: bool) -> Self {
        Self {
            input,
            output,
            enabled,
        }
    }

    pub fn complete(&mut self, values: ParameterValues) -> Result<RawInputs, CliError> {
        Ok(RawInputs {
            initial_loan: self.value(
                values.initial_loan,
                "--initial-loan",
                "Enter initial loan amount: ",
            )?,
            interest_rate: self.value(
                values.interest_rate,
                "--interest-rate",
                "Enter annual interest rate: ",
            )?,
            monthly_payment: self.value(
                values.monthly_payment,
                "--monthly-payment",
                "Enter monthly payment amount: ",
            )?,
            minimum_amortization: self.value(
                values.minimum_amortization,
                "--minimum-amortization",
                "Enter minimum monthly amortization: ",
            )?,
            investment_return: self.value(
                values.investment_return,
                "--investment-return",
                "Enter annual investment return rate: ",
            )?,
            years: self.value(
                values.years,
                "--years",
                "Enter number of years for the simulation: ",
            )?,
        })
    }

    fn value<T: FromStr>(
        &mut self,
        current: Option<T>,
        flag: &'static str,
        prompt: &'static str,
    ) -> Result<T, CliError> {
        if let Some(v) = current {
            return Ok(v);
        }
        if !self.enabled {
            return Err(CliError::MissingParameter(flag));
        }

        loop {
            write!(self.output, "{prompt}")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(CliError::UnexpectedEof(flag));
            }
            let answer = line.trim();
            match answer.replace('_', "").parse::<T>() {
                Ok(v) => return Ok(v),
                Err(_) => {
                    debug!(flag, answer, "rejected prompt answer");
                    writeln!(self.output, "'{answer}' is not a valid number, try again.")?;
                }
            }
        }
    }
}

pub fn build_parameters(raw: RawInputs) -> Result<SimulationParameters, CliError> {
    for (flag, value) in [
        ("--initial-loan", raw.initial_loan),
        ("--interest-rate", raw.interest_rate),
        ("--monthly-payment", raw.monthly_payment),
        ("--minimum-amortization", raw.minimum_amortization),
        ("--investment-return", raw.investment_return),
    ] {
        if !value.is_finite() {
            return Err(CliError::InvalidArgument {
                flag,
                reason: "must be a finite number",
            });
        }
    }

    if raw.initial_loan <= 0.0 {
        return Err(CliError::InvalidArgument {
            flag: "--initial-loan",
            reason: "must be > 0",
        });
    }

    if raw.interest_rate < 0.0 {
        return Err(CliError::InvalidArgument {
            flag: "--interest-rate",
            reason: "must be >= 0",
        });
    }

    if raw.monthly_payment <= 0.0 {
        return Err(CliError::InvalidArgument {
            flag: "--monthly-payment",
            reason: "must be > 0",
        });
    }

    if raw.minimum_amortization < 0.0 {
        return Err(CliError::InvalidArgument {
            flag: "--minimum-amortization",
            reason: "must be >= 0",
        });
    }

    if raw.investment_return <= -100.0 {
        return Err(CliError::InvalidArgument {
            flag: "--investment-return",
            reason: "must be > -100",
        });
    }

    if !(1..=MAX_YEARS).contains(&raw.years) {
        return Err(CliError::InvalidArgument {
            flag: "--years",
            reason: "must be between 1 and 100",
        });
    }

    Ok(SimulationParameters::from_percentages(
        raw.initial_loan,
        raw.interest_rate,
        raw.monthly_payment,
        raw.minimum_amortization,
        raw.investment_return,
        raw.years,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const EPS: f64 = 1e-12;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn sample_raw() -> RawInputs {
        RawInputs {
            initial_loan: 1_000_000.0,
            interest_rate: 6.0,
            monthly_payment: 10_000.0,
            minimum_amortization: 2_000.0,
            investment_return: 6.0,
            years: 30,
        }
    }

    #[test]
    fn build_parameters_converts_percentages() {
        let params = build_parameters(sample_raw()).expect("valid inputs");
        assert_approx(params.annual_interest_rate, 0.06);
        assert_approx(params.annual_investment_return, 0.06);
        assert_eq!(params.horizon_years, 30);
        assert_eq!(params.months(), 360);
    }

    #[test]
    fn build_parameters_rejects_out_of_range_values() {
        let cases: [(fn(&mut RawInputs), &str); 7] = [
            (|r| r.initial_loan = 0.0, "--initial-loan must be > 0"),
            (|r| r.interest_rate = -0.5, "--interest-rate must be >= 0"),
            (|r| r.monthly_payment = -1.0, "--monthly-payment must be > 0"),
            (|r| r.minimum_amortization = -1.0, "--minimum-amortization must be >= 0"),
            (|r| r.investment_return = -100.0, "--investment-return must be > -100"),
            (|r| r.years = 0, "--years must be between 1 and 100"),
            (|r| r.years = 4_000_000_000, "--years must be between 1 and 100"),
        ];
        for (mutate, expected) in cases {
            let mut raw = sample_raw();
            mutate(&mut raw);
            let err = build_parameters(raw).expect_err("must reject");
            assert_eq!(err.to_string(), expected);
        }
    }

    #[test]
    fn build_parameters_accepts_the_longest_horizon() {
        let mut raw = sample_raw();
        raw.years = MAX_YEARS;
        let params = build_parameters(raw).expect("100 years is allowed");
        assert_eq!(params.months(), 1_200);
    }

    #[test]
    fn build_parameters_rejects_non_finite_values() {
        let mut raw = sample_raw();
        raw.monthly_payment = f64::NAN;
        let err = build_parameters(raw).expect_err("must reject NaN");
        assert!(err.to_string().contains("--monthly-payment"));
    }

    #[test]
    fn prompter_keeps_given_values_and_asks_for_the_rest() {
        let mut input = Cursor::new("250000\n3.5\n");
        let mut output = Vec::new();
        let values = ParameterValues {
            monthly_payment: Some(2_000.0),
            minimum_amortization: Some(500.0),
            investment_return: Some(7.0),
            years: Some(25),
            ..ParameterValues::default()
        };

        let raw = Prompter::new(&mut input, &mut output, true)
            .complete(values)
            .expect("all values collected");

        assert_approx(raw.initial_loan, 250_000.0);
        assert_approx(raw.interest_rate, 3.5);
        assert_approx(raw.monthly_payment, 2_000.0);
        assert_eq!(raw.years, 25);
        let shown = String::from_utf8(output).expect("utf-8 prompts");
        assert_eq!(
            shown,
            "Enter initial loan amount: Enter annual interest rate: "
        );
    }

    #[test]
    fn prompter_retries_until_a_number_is_entered() {
        let mut input = Cursor::new("ten\n\n1_000_000\n");
        let mut output = Vec::new();
        let values = ParameterValues {
            initial_loan: None,
            interest_rate: Some(1.0),
            monthly_payment: Some(1.0),
            minimum_amortization: Some(1.0),
            investment_return: Some(1.0),
            years: Some(1),
        };

        let raw = Prompter::new(&mut input, &mut output, true)
            .complete(values)
            .expect("third answer parses");

        assert_approx(raw.initial_loan, 1_000_000.0);
        let shown = String::from_utf8(output).expect("utf-8 prompts");
        assert_eq!(shown.matches("Enter initial loan amount: ").count(), 3);
        assert!(shown.contains("'ten' is not a valid number"));
    }

    #[test]
    fn prompter_reports_end_of_input() {
        let mut input = Cursor::new("");
        let mut output = Vec::new();
        let err = Prompter::new(&mut input, &mut output, true)
            .complete(ParameterValues::default())
            .expect_err("nothing to read");
        assert!(matches!(err, CliError::UnexpectedEof("--initial-loan")));
    }

    #[test]
    fn disabled_prompter_names_the_missing_flag() {
        let mut input = Cursor::new("1000\n");
        let mut output = Vec::new();
        let values = ParameterValues {
            initial_loan: Some(1_000.0),
            interest_rate: Some(1.0),
            ..ParameterValues::default()
        };
        let err = Prompter::new(&mut input, &mut output, false)
            .complete(values)
            .expect_err("monthly payment is missing");
        assert!(matches!(err, CliError::MissingParameter("--monthly-payment")));
        assert!(output.is_empty());
    }

    #[test]
    fn payload_accepts_camel_and_snake_case_keys() {
        let payload: SimulationPayload = serde_json::from_str(
            r#"{"initialLoan": 500000, "interest_rate": 4.2, "years": 20, "currency": "EUR"}"#,
        )
        .expect("valid payload");
        let values = payload.values();
        assert_eq!(values.initial_loan, Some(500_000.0));
        assert_eq!(values.interest_rate, Some(4.2));
        assert_eq!(values.years, Some(20));
        assert_eq!(values.monthly_payment, None);
        assert_eq!(payload.currency.as_deref(), Some("EUR"));
    }

    #[test]
    fn flag_values_take_precedence_over_payload() {
        let flags = ParameterValues {
            initial_loan: Some(1.0),
            ..ParameterValues::default()
        };
        let file = ParameterValues {
            initial_loan: Some(2.0),
            years: Some(10),
            ..ParameterValues::default()
        };
        let merged = flags.or(file);
        assert_eq!(merged.initial_loan, Some(1.0));
        assert_eq!(merged.years, Some(10));
        assert_eq!(merged.interest_rate, None);
    }

    #[test]
    fn payload_load_reports_missing_and_malformed_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("absent.json");
        assert!(matches!(
            SimulationPayload::load(&missing),
            Err(CliError::ConfigRead { .. })
        ));

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ not json").expect("write fixture");
        assert!(matches!(
            SimulationPayload::load(&broken),
            Err(CliError::ConfigParse { .. })
        ));
    }
}
