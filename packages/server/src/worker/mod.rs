//! Background workers: the broadcaster pool and the heartbeat monitor.

pub mod broadcaster;
pub mod heartbeat_monitor;

pub use broadcaster::Broadcaster;
pub use heartbeat_monitor::HeartbeatMonitor;
