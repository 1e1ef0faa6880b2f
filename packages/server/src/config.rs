//! Relay configuration.

use std::time::Duration;

use crate::domain::{RoomName, ValueObjectError};

pub const DEFAULT_HEARTBEAT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(15);
pub const DEFAULT_WORKER_COUNT: usize = 32;
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 1024;
pub const DEFAULT_SERVER_MAILBOX_CAPACITY: usize = 1000;
pub const DEFAULT_CLIENT_MAILBOX_CAPACITY: usize = 10;
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
pub const DEFAULT_ROOMS: &[&str] = &["room1", "room2", "room3"];

/// What a bounded task queue does when a push finds it full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OverflowPolicy {
    /// Refuse the new task.
    #[default]
    Reject,
    /// Discard the oldest queued task to admit the new one.
    DropOldest,
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// A client silent for longer than this is reclaimed.
    pub heartbeat_timeout: Duration,
    /// Period of the heartbeat sweep.
    pub sweep_interval: Duration,
    /// Number of broadcaster workers.
    pub worker_count: usize,
    /// Maximum envelope / payload size in bytes, terminator included.
    pub max_message_size: usize,
    /// `None` keeps the broadcast queue unbounded.
    pub queue_capacity: Option<usize>,
    pub overflow_policy: OverflowPolicy,
    pub server_mailbox_capacity: usize,
    pub client_mailbox_capacity: usize,
    /// Bounded receive used by the gateway so it notices shutdown.
    pub poll_interval: Duration,
    /// Rooms that exist from startup.
    pub default_rooms: Vec<String>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            heartbeat_timeout: DEFAULT_HEARTBEAT_TIMEOUT,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            worker_count: DEFAULT_WORKER_COUNT,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            queue_capacity: None,
            overflow_policy: OverflowPolicy::default(),
            server_mailbox_capacity: DEFAULT_SERVER_MAILBOX_CAPACITY,
            client_mailbox_capacity: DEFAULT_CLIENT_MAILBOX_CAPACITY,
            poll_interval: DEFAULT_POLL_INTERVAL,
            default_rooms: DEFAULT_ROOMS.iter().map(|room| room.to_string()).collect(),
        }
    }
}

impl RelayConfig {
    pub fn default_room_names(&self) -> Result<Vec<RoomName>, ValueObjectError> {
        self.default_rooms
            .iter()
            .map(|room| RoomName::new(room.as_str()))
            .collect()
    }

    pub fn heartbeat_timeout_millis(&self) -> i64 {
        i64::try_from(self.heartbeat_timeout.as_millis()).unwrap_or(i64::MAX)
    }
}
