use anyhow::Context;
use clap::Parser;
use std::process;
use tradeflow::Config;
use tradeflow::cli::{args::Args, commands};

fn main() {
    let args = Args::parse();

    if let Err(error) = run(args) {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    args.validate()?;

    let config =
        Config::load(args.config_file.as_deref()).context("Failed to load configuration")?;

    // Flushes the log file on drop
    let _log_guard =
        commands::shared::setup_logging(&args, &config).context("Failed to initialize logging")?;

    commands::run(&args, &config)?;
    Ok(())
}
