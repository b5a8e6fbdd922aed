//! Local HTTP/WebSocket surface over the shelfkeeper catalog.

pub mod api;
pub mod metrics;
pub mod state;
