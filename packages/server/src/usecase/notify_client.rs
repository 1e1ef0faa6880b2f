//! UseCase: サーバーからクライアントへの単発通知
//!
//! 形式エラーの案内など、ブロードキャストを経由しない返信に使う。

use std::sync::Arc;

use crate::domain::{ClientName, MailboxTransport, TransportError};

pub struct NotifyClientUseCase {
    transport: Arc<dyn MailboxTransport>,
}

impl NotifyClientUseCase {
    pub fn new(transport: Arc<dyn MailboxTransport>) -> Self {
        Self { transport }
    }

    /// 相手のメールボックスが満杯なら待たずに諦める
    pub async fn execute(&self, client: &ClientName, text: &str) -> Result<(), TransportError> {
        self.transport.try_send(&client.mailbox(), text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MockMailboxTransport;

    #[tokio::test]
    async fn test_notify_sends_to_client_mailbox() {
        // テスト項目: クライアントのメールボックス宛に非ブロッキングで送る
        // given (前提条件):
        let mut transport = MockMailboxTransport::new();
        transport
            .expect_try_send()
            .withf(|address, payload| {
                address.as_str() == "/client_alice" && payload == "[Server]: hello"
            })
            .times(1)
            .returning(|_, _| Ok(()));
        let usecase = NotifyClientUseCase::new(Arc::new(transport));

        // when (操作):
        let result = usecase
            .execute(&ClientName::new("alice").unwrap(), "[Server]: hello")
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_notify_reports_full_mailbox() {
        // テスト項目: 満杯のメールボックスはエラーとして返る
        // given (前提条件):
        let mut transport = MockMailboxTransport::new();
        transport
            .expect_try_send()
            .returning(|address, _| Err(TransportError::Full(address.to_string())));
        let usecase = NotifyClientUseCase::new(Arc::new(transport));

        // when (操作):
        let result = usecase
            .execute(&ClientName::new("alice").unwrap(), "[Server]: hello")
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(TransportError::Full("/client_alice".to_string()))
        );
    }
}
