use std::io;

use clap::Parser;
use mortgage_or_invest::cli::{self, Cli};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut input = io::stdin().lock();
    let mut output = io::stdout().lock();
    let mut prompts = io::stderr().lock();
    if let Err(e) = cli::run(cli, &mut input, &mut output, &mut prompts) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
