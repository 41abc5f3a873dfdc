//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use tracing::info;

/// Ensure the log directory exists before the file sink starts appending to it.
pub async fn ensure_env(log_dir: &str) -> anyhow::Result<()> {
    if tokio::fs::metadata(log_dir).await.is_err() {
        info!(%log_dir, "creating log directory");
    }
    tokio::fs::create_dir_all(log_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {log_dir}: {e}"))?;
    Ok(())
}
