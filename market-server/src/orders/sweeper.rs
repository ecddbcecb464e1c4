//! Order expiry sweeper
//!
//! Background task that completes stale orders once per interval. It runs
//! the same idempotent UPDATE as the lazy check on the order read paths,
//! so both may fire in any order without double-completing anything.

use std::time::Duration;

use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use crate::db;

pub struct OrderSweeper {
    pool: PgPool,
    interval: Duration,
    shutdown: CancellationToken,
}

impl OrderSweeper {
    pub fn new(pool: PgPool, interval_secs: u64, shutdown: CancellationToken) -> Self {
        Self {
            pool,
            interval: Duration::from_secs(interval_secs),
            shutdown,
        }
    }

    /// Main loop: sweep once at startup, then once per interval.
    pub async fn run(self) {
        tracing::info!(
            "Order sweeper started (interval {}s)",
            self.interval.as_secs()
        );

        loop {
            self.sweep().await;

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Order sweeper received shutdown signal");
                    return;
                }
            }
        }
    }

    async fn sweep(&self) {
        match db::orders::apply_expiry(&self.pool).await {
            Ok(0) => tracing::debug!("Order sweep: nothing to complete"),
            Ok(n) => tracing::info!("Order sweep completed {} stale order(s)", n),
            Err(e) => tracing::error!("Order sweep failed: {}", e),
        }
    }
}
