//! UseCase 層
//!
//! プロトコルのコマンドごとに 1 つのユースケースを置きます。
//! 各ユースケースはドメイン層の trait（Repository / Publisher / Transport）にのみ依存します。

mod direct_message;
mod disconnect_client;
pub mod error;
mod join_room;
mod leave_room;
mod list_members;
mod notify_client;
mod record_heartbeat;
mod register_client;
mod send_message;

pub use direct_message::{DirectMessageOutcome, DirectMessageUseCase};
pub use disconnect_client::DisconnectClientUseCase;
pub use error::RegisterError;
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use list_members::ListMembersUseCase;
pub use notify_client::NotifyClientUseCase;
pub use record_heartbeat::RecordHeartbeatUseCase;
pub use register_client::RegisterClientUseCase;
pub use send_message::SendMessageUseCase;
