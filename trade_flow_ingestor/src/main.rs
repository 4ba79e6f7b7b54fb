use std::{io, process::ExitCode};

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trade_flow_ingestor::{
    cli::{commands::Cli, run::run_command},
    config::load_config,
};

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("trade_flow_ingestor={}", cli.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let stdout = io::stdout();
    let summary = match run_command(&cli.command, &config, &mut stdout.lock()) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("error [{:?}]: {e}", e.kind());
            return ExitCode::FAILURE;
        }
    };

    for outcome in &summary.outcomes {
        if let Err(e) = &outcome.result {
            eprintln!("{}: error [{:?}]: {e}", outcome.label(), e.kind());
        }
    }
    eprintln!(
        "SUMMARY: {} succeeded, {} failed",
        summary.succeeded(),
        summary.failed()
    );

    if summary.failed() > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
