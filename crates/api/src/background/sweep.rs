//! Periodic overdue/reminder sweep.
//!
//! Spawns the two ticket sweep passes on a fixed interval using
//! `tokio::time::interval`. The passes themselves carry a re-entrancy
//! guard, so a slow cycle causes the next one to be skipped, never
//! overlapped.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::tickets::TicketService;

/// Run the sweep loop until `cancel` is triggered.
pub async fn run(service: Arc<TicketService>, interval_secs: u64, cancel: CancellationToken) {
    tracing::info!(interval_secs, "Ticket sweep job started");

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Ticket sweep job stopping");
                break;
            }
            _ = interval.tick() => {
                if let Err(e) = service.check_overdue_tickets().await {
                    tracing::error!(error = %e, "Overdue check failed");
                }
                if let Err(e) = service.send_reminders().await {
                    tracing::error!(error = %e, "Reminder delivery failed");
                }
            }
        }
    }
}
