//! `opencap` server binary

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use opencap_web::config::{Config, JWT_SECRET_ENV};
use opencap_web::{logging, server};

#[derive(Debug, Parser)]
#[command(name = "opencap", version, about = "OpenCAP alias server")]
struct Cli {
    /// Configuration file; created with defaults when missing
    #[arg(short, long, env = "OPENCAP_CONFIG", default_value = "opencap.toml")]
    config: PathBuf,
}

#[actix_web::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load_or_init(&cli.config, std::env::var(JWT_SECRET_ENV).ok()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let _guard = match logging::init(&config.log) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    match server::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
