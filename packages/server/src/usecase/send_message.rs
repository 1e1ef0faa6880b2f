//! UseCase: ルームへの発言（SAY）
//!
//! 対象ルームはここでは決めず、配信時に送信者の現在のルームから解決する。

use std::sync::Arc;

use crate::domain::{BroadcastPublisher, BroadcastTask, ClientName, PublishError};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    publisher: Arc<dyn BroadcastPublisher>,
}

impl SendMessageUseCase {
    pub fn new(publisher: Arc<dyn BroadcastPublisher>) -> Self {
        Self { publisher }
    }

    /// `payload` はクライアントが送った `[<name>]: <text>` をそのまま使う
    pub async fn execute(&self, sender: ClientName, payload: String) -> Result<(), PublishError> {
        tracing::debug!("Queueing message from '{}'", sender);
        self.publisher
            .publish(BroadcastTask::chat(sender, payload))
            .await
    }
}
