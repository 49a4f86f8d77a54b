use clap::Parser;
use reward_points::args::{Args, Command};
use reward_points::{commands, Config, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().rewards_home().path();

    match args.command() {
        Command::Init(init_args) => commands::init(home, init_args).await?.print(),

        Command::Import(import_args) => commands::import(Config::load(home).await?, import_args)
            .await?
            .print(),

        Command::Serve(serve_args) => commands::serve(Config::load(home).await?, serve_args)
            .await?
            .print(),

        Command::Summary(summary_args) => {
            commands::summary(Config::load(home).await?, summary_args)
                .await?
                .print()
        }
    }
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use the requested level for this crate only, and let
            // request traces through at the same level.
            EnvFilter::new(default_directives(level))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Filter directives for the library, this binary and request tracing, all at `level`.
fn default_directives(level: LevelFilter) -> String {
    let level = level.to_string().to_lowercase();
    format!(
        "{}={level},{}={level},tower_http={level}",
        env!("CARGO_PKG_NAME").replace('-', "_"),
        env!("CARGO_BIN_NAME"),
    )
}
