//! # Nexus Node Runtime
//!
//! Entry point for the dual-approval checkpoint node.
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging
//! 2. Load and validate configuration from the environment
//! 3. Open the ledger store and wire the components
//! 4. Start the end-of-block handler
//! 5. Wait for Ctrl+C, then signal shutdown

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use shared_bus::{EventFilter, EventTopic};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use node_runtime::{DualApprovalContainer, EndBlockHandler, NodeConfig};

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// The node runtime owning the container and the handler tasks.
struct NodeRuntime {
    container: Arc<DualApprovalContainer>,
    shutdown_tx: tokio::sync::watch::Sender<bool>,
    shutdown_rx: tokio::sync::watch::Receiver<bool>,
}

impl NodeRuntime {
    fn new(config: NodeConfig) -> Result<Self> {
        let container = DualApprovalContainer::new(config)
            .context("Failed to build dual-approval container")?;
        let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

        Ok(Self {
            container: Arc::new(container),
            shutdown_tx,
            shutdown_rx,
        })
    }

    fn start(&self) -> JoinHandle<()> {
        let config = &self.container.config;
        info!("===========================================");
        info!("  Nexus Node Runtime v{}", env!("CARGO_PKG_VERSION"));
        info!("===========================================");
        info!("Storage backend: {:?}", config.storage_backend);
        info!("Data Dir: {:?}", config.data_dir);
        info!(
            "Checkpoint every {} blocks, expiry window {} blocks",
            config.dual_approval.checkpoint_interval, config.dual_approval.expiry_window
        );

        let subscription = self
            .container
            .bus
            .subscribe(EventFilter::topics(vec![EventTopic::BlockProduction]));
        let handler = EndBlockHandler::new(
            Arc::clone(&self.container.trigger),
            self.container.bus.clone(),
        );
        tokio::spawn(handler.run(subscription, self.shutdown_rx.clone()))
    }

    /// Signal the handler and wait for it to finish its current tick.
    async fn shutdown(&self, handler: JoinHandle<()>) {
        info!("Initiating graceful shutdown...");

        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }

        match tokio::time::timeout(SHUTDOWN_TIMEOUT, handler).await {
            Ok(Ok(())) => info!("Shutdown complete"),
            Ok(Err(e)) => error!("End-of-block handler failed: {}", e),
            Err(_) => warn!("End-of-block handler did not stop within {:?}", SHUTDOWN_TIMEOUT),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    nx_telemetry::init_logging(&nx_telemetry::TelemetryConfig::from_env())
        .context("Failed to initialize logging")?;

    let config = NodeConfig::from_env().context("Invalid node configuration")?;

    let runtime = NodeRuntime::new(config)?;
    let handler = runtime.start();

    info!("Node is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    runtime.shutdown(handler).await;

    Ok(())
}
