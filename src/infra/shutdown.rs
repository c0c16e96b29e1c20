//! Process shutdown signal shared by every server loop

use tokio::sync::watch;
use tracing::info;

/// Watch channel flipped to `true` on Ctrl+C
pub fn ctrl_c_shutdown() -> watch::Receiver<bool> {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("shutdown_signal_received");
        let _ = shutdown_tx.send(true);
    });
    shutdown_rx
}
