//! DSO - modulation waveform backend
//!
//! `dso serve` runs the HTTP endpoint used by the browser frontend;
//! `dso synth` renders a single request to stdout.

mod cli_args;

use std::process::ExitCode;

use clap::Parser;
use dso_server::{render, server};

use cli_args::{Cli, Commands};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(args) => server::run(args.into_config()),
        Commands::Synth(args) => render::run(args.request(), &args.limits(), args.output()),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
