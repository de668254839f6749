//! Shop event bus and automation integration.
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`, feeding the realtime WebSocket.
//! - [`ShopEvent`] -- the canonical domain event envelope
//!   (`parts.updated`, `booking.completed`, ...).
//! - [`AutomationClient`] -- outbound HTTP bridge to the booking and chat
//!   automation webhooks.

pub mod automation;
pub mod bus;

pub use automation::{AutomationClient, AutomationError};
pub use bus::{EventBus, ShopEvent};
