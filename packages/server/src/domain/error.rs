//! Domain errors

use thiserror::Error;

/// Value Object の検証エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("client name must not be empty")]
    ClientNameEmpty,

    #[error("client name '{0}' contains invalid character {1:?}")]
    ClientNameInvalidChar(String, char),

    #[error("room name must not be empty")]
    RoomNameEmpty,

    #[error("room name '{0}' contains invalid character {1:?}")]
    RoomNameInvalidChar(String, char),

    #[error("mailbox address '{0}' does not start with the client prefix")]
    MailboxAddressPrefix(String),
}

/// メールボックス転送のエラー
///
/// 送信側では「宛先に届かない」ことを表すだけで、致命的ではない。
/// サーバー自身の受信口を開けない場合のみ起動時に致命的となる。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("mailbox '{0}' not found")]
    NotFound(String),

    #[error("mailbox '{0}' is full")]
    Full(String),

    #[error("mailbox '{0}' is closed")]
    Closed(String),

    #[error("mailbox '{0}' is already open")]
    AddressInUse(String),

    #[error("message of {size} bytes exceeds the {max} byte limit")]
    MessageTooLarge { size: usize, max: usize },

    #[error("receive timed out")]
    Timeout,
}

/// ブロードキャストタスクの投入失敗
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishError {
    #[error("broadcast queue is full (capacity {0})")]
    QueueFull(usize),
}
