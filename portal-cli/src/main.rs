// Command-line runner for portal gate checks
// Prints the gate result as JSON on stdout; redirects go to stderr

mod backend;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use portal_gate::cache::STUDENT_ID_KEY;
use portal_gate::{AccessGate, GateActor, GateConfig, GateResult, LocalCache};

use backend::{open_cache, Backend, StderrNavigator};

/// Run one portal access gate check
///
/// Exit status: 0 when the gate passes, 2 when it denies, 1 on usage or
/// configuration errors.
#[derive(Debug, Parser)]
#[command(name = "portal-gate")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
enum Command {
    /// Admin-only gate
    Admin,

    /// Staff gate (the admin also passes)
    Staff,

    /// Student gate, driven by the remembered student id
    Student,

    /// Remember a student id for later student checks
    RememberStudent {
        #[arg(value_parser = clap::builder::NonEmptyStringValueParser::new())]
        id: String,
    },

    /// Forget the remembered student id
    ForgetStudent,
}

/// Exit status for a finished gate check
fn exit_code(result: &GateResult) -> ExitCode {
    if result.is_denied() {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    }
}

async fn run(command: Command) -> Result<ExitCode> {
    let cache = Arc::new(open_cache()?);

    let check = match command {
        Command::RememberStudent { id } => {
            cache.set(STUDENT_ID_KEY, &id)?;
            println!("{}", json!({ "remembered": id }));
            return Ok(ExitCode::SUCCESS);
        }
        Command::ForgetStudent => {
            cache.remove(STUDENT_ID_KEY)?;
            println!("{}", json!({ "forgotten": true }));
            return Ok(ExitCode::SUCCESS);
        }
        other => other,
    };

    let backend = Backend::from_env()?;
    let gate = AccessGate::new(
        GateConfig::from_env(),
        backend.identity,
        backend.store,
        cache,
        Arc::new(StderrNavigator),
    );
    let handle = GateActor::spawn(gate);

    let result = match check {
        Command::Admin => handle.check_admin().await?,
        Command::Staff => handle.check_staff_or_admin().await?,
        _ => handle.check_student().await?,
    };

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(exit_code(&result))
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "portal_gate=info,portal_sources=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version land here too
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(cli.command).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "portal-gate failed");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}
