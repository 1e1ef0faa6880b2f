//! UseCase: ルーム退出
//!
//! ## テスト実装の作業記録
//!
//! ### どのような状況を想定しているか
//! - 正常系：在室中のクライアントの退出と通知
//! - エッジケース：未参加のクライアントの退出（何も起きない）

use std::sync::Arc;

use crate::domain::{BroadcastPublisher, ClientName, PublishError, RoomName, RoomRepository};

/// ルーム退出のユースケース
pub struct LeaveRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    publisher: Arc<dyn BroadcastPublisher>,
}

impl LeaveRoomUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        publisher: Arc<dyn BroadcastPublisher>,
    ) -> Self {
        Self {
            repository,
            publisher,
        }
    }

    /// 退出を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Some(room))` - 退出したルーム（通知を投入済み）
    /// * `Ok(None)` - どのルームにもいなかった
    pub async fn execute(&self, client: &ClientName) -> Result<Option<RoomName>, PublishError> {
        let Some(notice) = self.repository.leave(client).await else {
            tracing::debug!("'{}' is not in any room", client);
            return Ok(None);
        };
        tracing::info!("{} left #{}", notice.subject, notice.room);
        let room = notice.room.clone();
        self.publisher.publish(notice.into_task()).await?;
        Ok(Some(room))
    }
}
