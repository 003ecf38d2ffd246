//! Background tasks
//!
//! Periodic maintenance loops. Neither task is load-bearing for
//! correctness: capacity math excludes stale holds on its own, and
//! expired offers simply stop matching. The loops keep stored state
//! honest for operators and admin views.

use crate::core::ServerState;
use chrono::Utc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Running background tasks plus their shared shutdown token
pub struct BackgroundTasks {
    handles: Vec<(&'static str, JoinHandle<()>)>,
    shutdown: CancellationToken,
}

impl BackgroundTasks {
    /// Spawn all periodic tasks for this server
    pub fn start(state: &ServerState) -> Self {
        let shutdown = CancellationToken::new();
        let mut handles = Vec::new();

        let janitor_state = state.clone();
        let janitor_token = shutdown.clone();
        handles.push((
            "hold_janitor",
            tokio::spawn(hold_janitor(janitor_state, janitor_token)),
        ));

        let purge_state = state.clone();
        let purge_token = shutdown.clone();
        handles.push((
            "offer_purge",
            tokio::spawn(offer_purge(purge_state, purge_token)),
        ));

        Self { handles, shutdown }
    }

    /// Cancel every task and wait for it to exit
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        for (name, handle) in self.handles {
            if let Err(e) = handle.await {
                tracing::warn!(task = name, error = %e, "Background task join failed");
            }
        }
    }
}

/// Relabel active holds whose TTL has passed
async fn hold_janitor(state: ServerState, token: CancellationToken) {
    let mut interval =
        tokio::time::interval(Duration::from_secs(state.config.hold_janitor_interval_secs));
    let manager = state.hold_manager();

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = interval.tick() => {
                match manager.expire_due(Utc::now()).await {
                    Ok(relabeled) if relabeled > 0 => {
                        tracing::info!(relabeled, "Hold janitor relabeled stale holds");
                    }
                    Ok(_) => {}
                    Err(e) => tracing::error!(error = %e, "Hold janitor sweep failed"),
                }
            }
        }
    }
    tracing::debug!("Hold janitor stopped");
}

/// Deactivate or delete offers past their end date
async fn offer_purge(state: ServerState, token: CancellationToken) {
    let mut interval =
        tokio::time::interval(Duration::from_secs(state.config.offer_purge_interval_secs));
    let repo = crate::db::repository::OfferRepository::new(state.pool().clone());

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = interval.tick() => {
                let today = Utc::now().date_naive();
                match repo.purge_expired(today).await {
                    Ok((deactivated, deleted)) if deactivated + deleted > 0 => {
                        tracing::info!(deactivated, deleted, "Expired offers purged");
                    }
                    Ok(_) => {}
                    Err(e) => tracing::error!(error = %e, "Offer purge failed"),
                }
            }
        }
    }
    tracing::debug!("Offer purge stopped");
}
