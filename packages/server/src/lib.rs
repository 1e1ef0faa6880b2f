//! Multi-room chat relay.
//!
//! Clients exchange short text envelopes with the relay through named
//! mailboxes. The relay keeps room membership and liveness state, fans room
//! messages out through a worker pool and reclaims clients whose heartbeat
//! stops. A WebSocket gateway exposes the mailboxes to remote clients.

pub mod config;

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
pub mod worker;
