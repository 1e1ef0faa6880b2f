//! UseCase: クライアント切断（QUIT / ハートビート切れ）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectClientUseCase::execute() メソッド
//! - ルームからの退出・登録解除・ハートビート削除・quit 通知
//!
//! ### どのような状況を想定しているか
//! - 正常系：在室中のクライアントの切断
//! - エッジケース：ルームに入っていないクライアントの切断（通知なし）
//! - エッジケース：同じクライアントの二重切断（2 回目は何もしない）
//!
//! ### なぜこのテストが必要か
//! - ハートビート監視は直接の後始末に加えて QUIT をサーバーへ再投入するため、
//!   同じクライアントの切断が 2 回走っても通知が重複してはならない

use std::sync::Arc;

use crate::domain::{BroadcastPublisher, ClientName, HeartbeatRepository, RoomRepository};

/// クライアント切断のユースケース
pub struct DisconnectClientUseCase {
    repository: Arc<dyn RoomRepository>,
    heartbeat: Arc<dyn HeartbeatRepository>,
    publisher: Arc<dyn BroadcastPublisher>,
}

impl DisconnectClientUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        heartbeat: Arc<dyn HeartbeatRepository>,
        publisher: Arc<dyn BroadcastPublisher>,
    ) -> Self {
        Self {
            repository,
            heartbeat,
            publisher,
        }
    }

    /// 切断を実行
    ///
    /// # Returns
    ///
    /// * `true` - このクライアントについて何らかの状態を片付けた
    /// * `false` - 既に片付け済み（何もしていない）
    pub async fn execute(&self, client: &ClientName) -> bool {
        // registry before heartbeat, never nested
        let was_registered = self.repository.mailbox_of(client).await.is_some();
        let notice = self.repository.quit(client).await;
        let had_heartbeat = self.heartbeat.remove(client).await;

        if let Some(notice) = notice {
            tracing::info!("{} has quit (was in #{})", client, notice.room);
            if let Err(e) = self.publisher.publish(notice.into_task()).await {
                tracing::warn!("Dropped quit notice for '{}': {}", client, e);
            }
            return true;
        }

        let cleaned = was_registered || had_heartbeat;
        if cleaned {
            tracing::info!("{} has quit", client);
        } else {
            tracing::debug!("'{}' was already disconnected", client);
        }
        cleaned
    }
}
