use std::fs::File;
use std::sync::Mutex;

use anyhow::{Context, Result};
use bullterm::cli::{Cli, Mode};
use bullterm::client::http_client::HttpPracticeApi;
use bullterm::config::ClientConfig;
use bullterm::core::engine::Engine;
use bullterm::practice::{runner, session::PracticeSession};
use clap::Parser;
use tracing::info;

fn init_logging(config: &ClientConfig) -> Result<()> {
    let file = File::create(&config.log_file)
        .with_context(|| format!("cannot open log file {}", config.log_file.display()))?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(config.log_level)
        .init();
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ClientConfig::from_args(cli.mode(), &cli.global)?;
    init_logging(&config)?;
    info!(mode = ?config.mode, server = %config.server_url, api = %config.api_base, "starting");

    let terminal = ratatui::init();
    let result = match config.mode {
        Mode::Play => Engine::new(config.server_url.clone()).run(terminal).await,
        Mode::Practice => {
            let api = HttpPracticeApi::new(&config.api_base, config.timeout);
            // blocking HTTP; nothing else is scheduled on this runtime in practice mode
            runner::run(PracticeSession::new(api), terminal)
        }
    };

    ratatui::restore();
    result
}
