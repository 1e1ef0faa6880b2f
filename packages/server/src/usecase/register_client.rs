//! UseCase: クライアント登録
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RegisterClientUseCase::execute() メソッド
//! - 登録済みメールボックスへの追加とハートビートの初期化
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規登録
//! - エッジケース：同じアドレスでの再登録（冪等、ハートビートは更新）
//! - 異常系：クライアント名を含まないアドレス

use std::sync::Arc;

use chatrelay_shared::time::Clock;

use crate::domain::{ClientName, HeartbeatRepository, MailboxAddress, RoomRepository, Timestamp};

use super::error::RegisterError;

/// クライアント登録のユースケース
pub struct RegisterClientUseCase {
    /// Room Registry
    repository: Arc<dyn RoomRepository>,
    /// Heartbeat Table
    heartbeat: Arc<dyn HeartbeatRepository>,
    clock: Arc<dyn Clock>,
}

impl RegisterClientUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        heartbeat: Arc<dyn HeartbeatRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            heartbeat,
            clock,
        }
    }

    /// 登録を実行
    ///
    /// # Returns
    ///
    /// * `Ok(ClientName)` - アドレスから取り出したクライアント名
    /// * `Err(RegisterError)` - アドレスがクライアントを指していない
    pub async fn execute(&self, address: MailboxAddress) -> Result<ClientName, RegisterError> {
        let client = address
            .client_name()
            .ok_or_else(|| RegisterError::InvalidAddress(address.to_string()))?;

        // registry before heartbeat
        if !self.repository.register(address.clone()).await {
            tracing::debug!("Mailbox '{}' was already registered", address);
        }
        self.heartbeat
            .touch(client.clone(), Timestamp::new(self.clock.now_millis()))
            .await;

        tracing::info!("{} has joined the server", address);
        Ok(client)
    }
}
