//! # Latchkey CLI
//!
//! Drives a single [`LoginTracker`] from stdin. Each input line is one
//! password guess; each guess produces one JSON outcome line on stdout.
//!
//! ```text
//! $ printf 'x\ny\nsecret\n' | latchkey --username a --password secret
//! {"ok":false,"message":"Attempt 1: Login failed","kind":"failed"}
//! {"ok":false,"message":"Attempt 2: Login failed","kind":"failed"}
//! {"ok":true,"message":"Login successful","kind":"success"}
//! ```
//!
//! Each line is taken verbatim as a string guess. With `--json-guesses` lines
//! are parsed as JSON instead, so `"x"` is the string `x` and `42` is a
//! non-string guess; lines that are not valid JSON stay raw strings. Logs go
//! to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use latchkey::{Credentials, LatchkeyError, LoginTracker};
use latchkey_common::constants::DEFAULT_CONFIG_PATH;

mod config;

use config::AppConfig;

/// Latchkey - login attempt tracker
#[derive(Parser, Debug)]
#[command(name = "latchkey")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Username (overrides config)
    #[arg(short, long, env = "LATCHKEY_USERNAME")]
    username: Option<String>,

    /// Password (overrides config)
    #[arg(short, long, env = "LATCHKEY_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Parse each input line as JSON instead of taking it verbatim
    #[arg(long, default_value = "false")]
    json_guesses: bool,

    /// Print a tracker snapshot after the last guess
    #[arg(long, default_value = "false")]
    summary: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "LOG_LEVEL")]
    log_level: String,

    /// Enable JSON logging output
    #[arg(long, default_value = "false")]
    json_logs: bool,
}

fn main() -> ExitCode {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    init_logging(&args.log_level, args.json_logs);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{:#}", err);
            ExitCode::from(exit_code(&err))
        }
    }
}

/// Process exit code for a failed run: the error's own code for Latchkey
/// errors, 1 for everything else
fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<LatchkeyError>()
        .map(LatchkeyError::exit_code)
        .unwrap_or(1)
}

/// Load configuration and construct the tracker it describes
fn build_tracker(args: &Args) -> Result<LoginTracker> {
    let config = AppConfig::load(&args.config, args)?;

    let credentials = Credentials::from_value(&config.credentials)?;
    let tracker = LoginTracker::with_policy(credentials, config.policy)?;
    info!(
        max_attempts = config.policy.max_attempts,
        max_failures = config.policy.max_failures,
        "Tracker ready, reading guesses from stdin"
    );

    Ok(tracker)
}

fn run(args: &Args) -> Result<()> {
    let mut tracker = build_tracker(args)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        let guess = parse_guess(&line, args.json_guesses);

        let outcome = tracker.attempt(&guess);
        serde_json::to_writer(&mut out, &outcome).context("Failed to write outcome")?;
        writeln!(out).context("Failed to write outcome")?;
    }

    if args.summary {
        serde_json::to_writer(&mut out, &tracker.snapshot())
            .context("Failed to write summary")?;
        writeln!(out).context("Failed to write summary")?;
    }
    out.flush().context("Failed to flush stdout")?;

    info!(
        attempts = tracker.attempt_count(),
        failures = tracker.fail_count(),
        status = ?tracker.status(),
        "Input exhausted"
    );

    Ok(())
}

/// Interpret one input line as a guess. Verbatim by default; in JSON mode the
/// parsed value, falling back to the raw line when it is not valid JSON.
fn parse_guess(line: &str, json: bool) -> Value {
    if !json {
        return Value::String(line.to_string());
    }
    serde_json::from_str(line).unwrap_or_else(|_| Value::String(line.to_string()))
}

/// Initialize structured logging with tracing
fn init_logging(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(io::stderr))
            .init();
    }
}
