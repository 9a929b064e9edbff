mod app;
mod color;
mod config;
mod data;
mod error;
mod report;
mod state;
mod ui;

use anyhow::Context;
use clap::Parser;

use app::Server;
use config::{Cli, Settings};
use state::AppState;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let settings = Settings::from_cli(&cli)?;
    log::info!("predictors: {}", settings.predictors.join(", "));
    if !settings.results.is_dir() {
        log::warn!("results directory {} does not exist", settings.results.display());
    }

    let state = AppState::new(settings)?;
    Server::run(state, &cli.host, cli.port, cli.workers)
        .await
        .with_context(|| format!("serving on {}:{}", cli.host, cli.port))
}
