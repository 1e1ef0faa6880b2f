//! UseCase: ルーム参加
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 参加による在室移動と join 通知の投入
//!
//! ### どのような状況を想定しているか
//! - 正常系：未参加からの参加
//! - エッジケース：別ルームからの移動（leave 通知は出さない）

use std::sync::Arc;

use crate::domain::{
    BroadcastPublisher, ClientName, PublishError, RoomName, RoomRepository, SystemNotice,
};

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    publisher: Arc<dyn BroadcastPublisher>,
}

impl JoinRoomUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        publisher: Arc<dyn BroadcastPublisher>,
    ) -> Self {
        Self {
            repository,
            publisher,
        }
    }

    /// 参加を実行し、参加通知をルーム宛に投入する
    ///
    /// 在室の移動は通知の投入に失敗しても取り消さない。
    pub async fn execute(
        &self,
        client: ClientName,
        room: RoomName,
    ) -> Result<SystemNotice, PublishError> {
        let notice = self.repository.join(client, room).await;
        tracing::info!("{} joined #{}", notice.subject, notice.room);
        self.publisher.publish(notice.clone().into_task()).await?;
        Ok(notice)
    }
}
