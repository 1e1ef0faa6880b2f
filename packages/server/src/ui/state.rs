//! Shared state for the HTTP / WebSocket handlers.

use std::{sync::Arc, time::Duration};

use tokio_util::sync::CancellationToken;

use crate::domain::{HeartbeatRepository, MailboxTransport, RoomRepository};

pub struct AppState {
    /// Repository（Room Registry の参照用）
    pub repository: Arc<dyn RoomRepository>,
    /// Heartbeat Table（最終受信時刻の参照用）
    pub heartbeat: Arc<dyn HeartbeatRepository>,
    /// MailboxTransport（クライアントのメールボックスを開く）
    pub transport: Arc<dyn MailboxTransport>,
    pub client_mailbox_capacity: usize,
    /// Bounded receive on the client mailbox.
    pub poll_interval: Duration,
    /// Cancelled when the server starts shutting down.
    pub shutdown: CancellationToken,
}
