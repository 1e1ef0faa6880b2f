//! Domain layer: value objects, entities, shared state and the wire grammar.

pub mod command;
pub mod entity;
pub mod error;
pub mod heartbeat;
pub mod publisher;
pub mod registry;
pub mod reply;
pub mod repository;
pub mod transport;
pub mod value_object;

pub use command::{Command, CommandKind, CommandParseError};
pub use entity::{BroadcastTask, NoticeKind, Room, SystemNotice};
pub use error::{PublishError, TransportError, ValueObjectError};
pub use heartbeat::HeartbeatTable;
pub use publisher::BroadcastPublisher;
pub use registry::RoomRegistry;
pub use repository::{HeartbeatRepository, RoomRepository};
pub use transport::{Mailbox, MailboxTransport};
pub use value_object::{
    CLIENT_MAILBOX_PREFIX, ClientName, MailboxAddress, RoomName, SERVER_MAILBOX, Timestamp,
};

#[cfg(test)]
pub use transport::MockMailboxTransport;
