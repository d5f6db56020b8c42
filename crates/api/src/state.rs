use std::sync::Arc;

use crate::config::ServerConfig;
use crate::tickets::TicketService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`). The ticket
/// service is constructed once at startup and injected here rather than
/// living as a process-wide singleton.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: helpdesk_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Ticket lifecycle service (creation, threading, assignment, sweeps).
    pub tickets: Arc<TicketService>,
}
