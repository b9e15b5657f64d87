//! wasm-export-runner: prompt for a module path on stdin, load it, and print
//! the result of each configured export call.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use wasm_export_runner::{run_each, HostRuntime, RunnerConfig};

fn main() -> ExitCode {
    init_tracing();

    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{e:#}"), "run failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> anyhow::Result<()> {
    let config = RunnerConfig::from_env();
    let invocations = config.invocations()?;
    let runtime = HostRuntime::new(&config)?;

    eprintln!("Input wasm file path:");
    let path = read_path(io::stdin().lock()).context("failed to read module path from stdin")?;
    info!(path = path.as_deref().unwrap_or_default(), "module path read");

    let mut stdout = io::stdout().lock();
    run_each(&runtime, path.as_deref(), &invocations, |result| {
        writeln!(stdout, "{result}")?;
        stdout.flush()
    })
}

/// Read the first whitespace-delimited token. None when input ends first.
fn read_path(mut input: impl BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if let Some(token) = line.split_whitespace().next() {
            return Ok(Some(token.to_string()));
        }
    }
}

/// Log to stderr, filtered by WASM_RUNNER_LOG (default: warn).
fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("WASM_RUNNER_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .with(filter)
        .init();
}
