//! Regex Role Changer
//!
//! Assigns PT AI project roles to users from a CSV file of regex patterns.

use clap::Parser;
use regex_role_changer::{
    AppError,
    app::{RunOptions, export_memberships, open_session, sync_roles},
    config::{AppConfig, ConfigOverrides, LogFormat, load_config},
    prompt::TerminalPrompter,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Assign PT AI project roles from a CSV of username, role and project name regex
#[derive(Parser, Debug)]
#[command(name = "regex-role-changer")]
#[command(version, about, long_about = None)]
struct Args {
    /// CSV file with username, role and pattern columns (header row is skipped)
    #[arg(required_unless_present = "export")]
    file: Option<PathBuf>,

    /// Print the projects matched by each pattern in the file and exit
    #[arg(long)]
    regcheck: bool,

    /// Skip TLS certificate validation
    #[arg(long)]
    insecure: bool,

    /// Path to configuration file
    #[arg(short, long, env = "RRC_CONFIG")]
    config: Option<String>,

    /// PT AI server URL
    #[arg(long)]
    url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Apply without asking for confirmation
    #[arg(short, long)]
    yes: bool,

    /// Write the current memberships to this CSV file and exit
    #[arg(long, value_name = "OUT_CSV", conflicts_with = "regcheck")]
    export: Option<PathBuf>,
}

fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    let registry = tracing_subscriber::registry().with(filter);

    match config.logging.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let overrides = ConfigOverrides {
        url: args.url.clone(),
        insecure: args.insecure,
        log_level: args.log_level.clone(),
    };
    let config = load_config(args.config.as_deref(), &overrides).map_err(AppError::from)?;
    init_logging(&config);

    info!(version = env!("CARGO_PKG_VERSION"), url = %config.server.url, "Starting");

    let prompter = TerminalPrompter;
    let session = open_session(&config, &prompter).await?;
    println!("\n====== Connected ======\n");

    let mut stdout = std::io::stdout();
    if let Some(path) = &args.export {
        export_memberships(&session, path, &mut stdout).await?;
        return Ok(());
    }

    let Some(csv_path) = args.file else {
        anyhow::bail!("a CSV file is required");
    };
    let options = RunOptions {
        csv_path,
        regcheck: args.regcheck,
        assume_yes: args.yes,
    };
    let outcome = sync_roles(&session, &options, &prompter, &mut stdout).await?;
    info!(?outcome, "Finished");

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERR: {:#}", e);
            let code = e.downcast_ref::<AppError>().map_or(1, AppError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}
