// drugstore - terminal browser for a static drug catalogue
//
// Architecture:
// - Loader (reqwest/tokio): fetches the JSON dataset with bounded retries
// - Catalog: typed records plus the letter/query filter and selection state
// - TUI (ratatui): index, drug list, subdrug list and details panels
// - Assets: minifies the companion static site for deployment
// - CLI (clap): headless search/show, asset build, config management

mod assets;
mod catalog;
mod cli;
mod config;
mod loader;
mod logging;
mod timers;
mod tui;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use loader::{DataLoader, DataSource};
use logging::LogBuffer;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config: env > file > defaults, then the --data flag on top
    let mut config = Config::from_env();
    if let Some(data) = cli.data {
        config.data_source = data;
    }

    // Logs go to the in-app buffer while the browser owns the screen
    let tui_mode = cli.command.is_none();
    let log_buffer = LogBuffer::new();
    let _log_guard = logging::init(&config.logging, tui_mode, &log_buffer);

    match cli.command {
        Some(Commands::Build { root, out }) => cli::handle_build(root, out),
        Some(Commands::Search { letter, query }) => {
            cli::handle_search(&config, letter, &query).await
        }
        Some(Commands::Show { drug, variant }) => cli::handle_show(&config, &drug, variant).await,
        Some(Commands::Config {
            show,
            path,
            reset,
            edit,
        }) => cli::handle_config(&config, show, path, reset, edit),
        None => run_browser(config, log_buffer).await,
    }
}

async fn run_browser(config: Config, log_buffer: LogBuffer) -> Result<()> {
    // First launch writes a commented template to discover settings from
    Config::ensure_config_exists();

    let source = DataSource::resolve(&config.data_source, &config.base_url)
        .with_context(|| format!("Invalid data source '{}'", config.data_source))?;
    let loader = DataLoader::new(source, config.loader.options())
        .context("Failed to create data loader")?;

    tracing::info!("drugstore v{} reading {}", config::VERSION, loader.source());
    tui::run_tui(config, Arc::new(loader), log_buffer).await
}
