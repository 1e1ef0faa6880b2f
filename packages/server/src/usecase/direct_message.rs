//! UseCase: ダイレクトメッセージ（DM）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DirectMessageUseCase::execute() メソッド
//! - 宛先への配信と、宛先不明時の送信者への通知
//!
//! ### どのような状況を想定しているか
//! - 正常系：登録済みの宛先への配信
//! - 異常系：未登録の宛先（送信者に not found を返す）
//! - 異常系：登録済みだがメールボックスが消えている宛先
//! - 異常系：DM の書式を付けるとサイズ上限を超える本文（not found ではなくサイズ超過を通知）
//! - エッジケース：送信者自身のメールボックスも無い（通知は諦める）
//!
//! ### なぜこのテストが必要か
//! - 宛先不明の通知はブロードキャストを経由せず、送信者のメールボックスに直接届く必要がある

use std::sync::Arc;

use crate::domain::{ClientName, MailboxTransport, RoomRepository, TransportError, reply};

/// DM の配信結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectMessageOutcome {
    Delivered,
    TargetNotFound,
    TooLarge,
}

/// ダイレクトメッセージのユースケース
pub struct DirectMessageUseCase {
    repository: Arc<dyn RoomRepository>,
    transport: Arc<dyn MailboxTransport>,
}

impl DirectMessageUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, transport: Arc<dyn MailboxTransport>) -> Self {
        Self {
            repository,
            transport,
        }
    }

    /// 宛先のメールボックスへ直接送る（空きが出るまで待つ）
    ///
    /// 宛先が未登録、またはメールボックスが無い・閉じている場合は送信者へ
    /// `[Server]: user '<target>' not found.` を送る。
    /// 整形後の DM がサイズ上限を超える場合はサイズ超過を通知する。
    pub async fn execute(
        &self,
        sender: &ClientName,
        target: &ClientName,
        text: &str,
    ) -> DirectMessageOutcome {
        let (outcome, notice) = match self.repository.mailbox_of(target).await {
            Some(address) => match self
                .transport
                .send(&address, &reply::direct_message(sender, text))
                .await
            {
                Ok(()) => {
                    tracing::debug!("DM from '{}' delivered to '{}'", sender, target);
                    return DirectMessageOutcome::Delivered;
                }
                Err(TransportError::MessageTooLarge { size, max }) => {
                    tracing::warn!(
                        "DM from '{}' to '{}' dropped: {} bytes exceeds {}",
                        sender,
                        target,
                        size,
                        max
                    );
                    (
                        DirectMessageOutcome::TooLarge,
                        reply::message_too_large(target, size, max),
                    )
                }
                Err(e) => {
                    tracing::warn!("Failed to deliver DM from '{}' to '{}': {}", sender, target, e);
                    (
                        DirectMessageOutcome::TargetNotFound,
                        reply::user_not_found(target),
                    )
                }
            },
            None => (
                DirectMessageOutcome::TargetNotFound,
                reply::user_not_found(target),
            ),
        };

        if let Err(e) = self.transport.send(&sender.mailbox(), &notice).await {
            tracing::debug!("Could not notify '{}' about DM to '{}': {}", sender, target, e);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MailboxAddress, MockMailboxTransport, TransportError},
        infrastructure::{
            repository::InMemoryRoomRepository, transport::InMemoryMailboxTransport,
        },
    };

    fn name(raw: &str) -> ClientName {
        ClientName::new(raw).unwrap()
    }

    #[tokio::test]
    async fn test_dm_is_delivered_to_registered_target() {
        // テスト項目: 登録済みの宛先に `[DM from <sender>]: <text>` が届く
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::default());
        let transport = Arc::new(InMemoryMailboxTransport::new(1024));
        repository.register(name("bob").mailbox()).await;
        let mut bob_mailbox = transport.open(&name("bob").mailbox(), 10).await.unwrap();
        let usecase = DirectMessageUseCase::new(repository, transport);

        // when (操作):
        let outcome = usecase
            .execute(&name("alice"), &name("bob"), "hi: there")
            .await;

        // then (期待する結果):
        assert_eq!(outcome, DirectMessageOutcome::Delivered);
        assert_eq!(
            bob_mailbox.recv().await.as_deref(),
            Some("[DM from alice]: hi: there")
        );
    }

    #[tokio::test]
    async fn test_dm_to_unknown_target_notifies_sender() {
        // テスト項目: 未登録の宛先なら送信者に not found が届く
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::default());
        let transport = Arc::new(InMemoryMailboxTransport::new(1024));
        let mut alice_mailbox = transport.open(&name("alice").mailbox(), 10).await.unwrap();
        let usecase = DirectMessageUseCase::new(repository, transport);

        // when (操作):
        let outcome = usecase.execute(&name("alice"), &name("ghost"), "hi").await;

        // then (期待する結果):
        assert_eq!(outcome, DirectMessageOutcome::TargetNotFound);
        assert_eq!(
            alice_mailbox.recv().await.as_deref(),
            Some("[Server]: user 'ghost' not found.")
        );
    }

    #[tokio::test]
    async fn test_dm_send_failure_is_reported_as_not_found() {
        // テスト項目: 登録済みでも送信に失敗したら not found として送信者に通知する
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::default());
        repository.register(name("bob").mailbox()).await;
        let mut transport = MockMailboxTransport::new();
        transport
            .expect_send()
            .withf(|address: &MailboxAddress, _| address.as_str() == "/client_bob")
            .times(1)
            .returning(|address, _| Err(TransportError::NotFound(address.to_string())));
        transport
            .expect_send()
            .withf(|address: &MailboxAddress, payload: &str| {
                address.as_str() == "/client_alice"
                    && payload == "[Server]: user 'bob' not found."
            })
            .times(1)
            .returning(|_, _| Ok(()));
        let usecase = DirectMessageUseCase::new(repository, Arc::new(transport));

        // when (操作):
        let outcome = usecase.execute(&name("alice"), &name("bob"), "hi").await;

        // then (期待する結果):
        assert_eq!(outcome, DirectMessageOutcome::TargetNotFound);
    }

    #[tokio::test]
    async fn test_dm_without_any_mailbox_does_not_fail() {
        // テスト項目: 送信者のメールボックスも無い場合は通知を諦めるだけ
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::default());
        let transport = Arc::new(InMemoryMailboxTransport::new(1024));
        let usecase = DirectMessageUseCase::new(repository, transport);

        // when (操作):
        let outcome = usecase.execute(&name("alice"), &name("ghost"), "hi").await;

        // then (期待する結果):
        assert_eq!(outcome, DirectMessageOutcome::TargetNotFound);
    }

    #[tokio::test]
    async fn test_dm_over_size_limit_is_not_reported_as_not_found() {
        // テスト項目: 整形後にサイズ上限を超える DM は、宛先不明ではなくサイズ超過として通知される
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::default());
        let transport = Arc::new(InMemoryMailboxTransport::new(1024));
        repository.register(name("bob").mailbox()).await;
        let mut alice_mailbox = transport.open(&name("alice").mailbox(), 10).await.unwrap();
        let mut bob_mailbox = transport.open(&name("bob").mailbox(), 10).await.unwrap();
        let usecase = DirectMessageUseCase::new(repository, transport);
        // "[DM from alice]: " (17 bytes) + 1007 bytes + terminator = 1025 bytes
        let text = "x".repeat(1007);

        // when (操作):
        let outcome = usecase.execute(&name("alice"), &name("bob"), &text).await;

        // then (期待する結果):
        assert_eq!(outcome, DirectMessageOutcome::TooLarge);
        assert_eq!(
            alice_mailbox.recv().await.as_deref(),
            Some("[Server]: message to 'bob' is too large (1025 > 1024 bytes).")
        );
        assert_eq!(
            bob_mailbox.recv_timeout(std::time::Duration::from_millis(20)).await,
            Err(TransportError::Timeout)
        );
    }
}
