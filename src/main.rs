mod app;
mod components;
mod config;
mod data;
mod events;
mod logging;
mod theme;
mod utils;
mod validation;

use std::sync::Arc;
use std::time::Duration;

use alloy::signers::local::PrivateKeySigner;
use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use tokio::sync::mpsc;
use tracing::info;

use crate::app::App;
use crate::config::Config;
use crate::data::{DataService, ServiceSettings};
use crate::events::AppEvent;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let config = Config::parse();
    let log_path = logging::init(config.log_file.clone())?;

    let network = config.network();
    eprintln!("Using {} at {}", network.name, network.rpc_url);
    if let Some(ref path) = log_path {
        eprintln!("Logging to {}", path.display());
    }
    info!(network = %network.name, rpc_url = %network.rpc_url, contract = %config.contract, "starting");

    // Create event channel
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    // Connect straight away when a key was supplied; otherwise the prompt asks for one
    if let Some(ref key) = config.private_key {
        let signer: PrivateKeySigner = key
            .trim()
            .parse()
            .map_err(|_| eyre!("--private-key / PRIVATE_KEY is not a valid private key"))?;
        let _ = event_tx.send(AppEvent::ConnectWallet(Box::new(signer)));
    }

    let data_service = Arc::new(DataService::new(
        ServiceSettings {
            network,
            contract: config.contract,
            receipt_poll_interval: Duration::from_millis(config.receipt_poll_ms),
        },
        event_tx,
    ));

    let mut app = App::with_service(data_service, event_rx, config.tick_rate_ms);

    // Initialize terminal
    let terminal = ratatui::init();
    let result = app.run(terminal).await;

    // Restore terminal
    ratatui::restore();

    result
}
