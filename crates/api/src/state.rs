use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: motoshop_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Centralized event bus feeding the realtime WebSocket.
    pub event_bus: Arc<motoshop_events::EventBus>,
    /// Outbound bridge to the booking and chat automation webhooks.
    pub automation: Arc<motoshop_events::AutomationClient>,
}
