//! # NSG Scanner
//!
//! Runs the block scanner against a node until Ctrl+C.

use std::sync::Arc;

use anyhow::{Context, Result};
use nsg_01_tx_signer::submit_raw_transaction;
use nsg_rpc_client::NsgRpcClient;
use nsg_types::ChainClient;
use scanner_runtime::{build_scanner, open_store, LoggingObserver, RuntimeConfig};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = RuntimeConfig::from_env().context("invalid configuration")?;
    info!(
        server = %config.client.server_api,
        storage = ?config.storage,
        watched = config.watch.len(),
        "starting NSG scanner {}",
        scanner_runtime::VERSION
    );

    let client: Arc<dyn ChainClient> = Arc::new(
        NsgRpcClient::new(config.client.clone()).context("cannot build node client")?,
    );

    if let Some(raw) = &config.submit_raw {
        let txid = submit_raw_transaction(client.as_ref(), raw, config.rpc_retry)
            .await
            .context("broadcast failed")?;
        info!(%txid, "transaction broadcast");
        return Ok(());
    }

    let store = Arc::new(open_store(&config)?);
    let observer = Arc::new(LoggingObserver::new());
    let scanner = Arc::new(build_scanner(&config, client, store, observer.clone()));

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let mut scan_loop = {
        let scanner = scanner.clone();
        tokio::spawn(async move { scanner.run(shutdown_rx).await })
    };

    info!("Scanner is running. Press Ctrl+C to stop.");
    let finished = tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("Initiating graceful shutdown...");
            scanner.stop();
            if let Err(e) = shutdown_tx.send(true) {
                error!("Failed to send shutdown signal: {}", e);
            }
            scan_loop.await
        }
        finished = &mut scan_loop => finished,
    };

    match finished {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(error = %e, "scan loop ended with error"),
        Err(e) => error!(error = %e, "scan loop task failed"),
    }
    info!(
        blocks = observer.blocks_seen(),
        entries = observer.entries_seen(),
        "Shutdown complete"
    );
    Ok(())
}
