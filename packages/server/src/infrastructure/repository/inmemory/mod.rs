mod heartbeat;
mod room;

pub use heartbeat::InMemoryHeartbeatRepository;
pub use room::InMemoryRoomRepository;
