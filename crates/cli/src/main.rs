// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! jx - job runner CLI

mod commands;
mod error;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{exec, list, schedule};
use error::JxError;
use jx_runbook::{load_runbook, LoadError, Runbook};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "jx", version, about = "jx - run and schedule dependent jobs")]
struct Cli {
    /// Runbook file
    #[arg(short, long, global = true, default_value = "jx.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run jobs now
    Exec(exec::ExecArgs),
    /// List jobs, graphs and triggers
    List(list::ListArgs),
    /// Run triggers until interrupted
    Schedule(schedule::ScheduleArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {}", render(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<bool> {
    let runbook = open_runbook(&cli.config)?;

    match cli.command {
        Commands::Exec(args) => exec::handle(args, &runbook).await,
        Commands::List(args) => list::handle(args, &runbook).map(|()| true),
        Commands::Schedule(args) => schedule::handle(args, &runbook).await.map(|()| true),
    }
}

fn open_runbook(path: &Path) -> Result<Runbook> {
    match load_runbook(path) {
        Ok(runbook) => Ok(runbook),
        Err(LoadError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(JxError::config_not_found(&path.display().to_string()).into())
        }
        Err(e) => Err(e.into()),
    }
}

/// Error and its causes on one line, skipping causes the message already shows
fn render(err: &anyhow::Error) -> String {
    let mut text = err.to_string();
    for cause in err.chain().skip(1) {
        let cause = cause.to_string();
        if !text.contains(&cause) {
            text.push_str(": ");
            text.push_str(&cause);
        }
    }
    text
}

/// Log to stderr, filtered by `JX_LOG` or `RUST_LOG` (default `info`)
fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_env("JX_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
