//! Mailbox transport trait 定義
//!
//! 名前付きメールボックスの open / send / receive を抽象化します。
//! コアが転送路に要求するのは以下の 3 点のみ:
//!
//! - 受信用の名前付きメールボックスを開く
//! - 上限サイズ付きのメッセージを名前宛に送る（ブロッキング / ノンブロッキング）
//! - タイムアウト付きで受信する

use std::time::Duration;

use async_trait::async_trait;

use super::{error::TransportError, value_object::MailboxAddress};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailboxTransport: Send + Sync {
    /// Open a named mailbox for receiving with the given capacity.
    async fn open(
        &self,
        address: &MailboxAddress,
        capacity: usize,
    ) -> Result<Box<dyn Mailbox>, TransportError>;

    /// Send, waiting for capacity if the mailbox is full.
    async fn send(&self, address: &MailboxAddress, payload: &str) -> Result<(), TransportError>;

    /// Send without waiting; fails with [`TransportError::Full`] if there is no capacity.
    async fn try_send(&self, address: &MailboxAddress, payload: &str)
    -> Result<(), TransportError>;

    /// Remove the named mailbox.
    async fn unlink(&self, address: &MailboxAddress);

    /// Remove the named mailbox only while it is still the one opened as
    /// `mailbox_id`. Returns whether it was removed.
    async fn release(&self, address: &MailboxAddress, mailbox_id: u64) -> bool;
}

/// Receiving end of an opened mailbox.
#[async_trait]
pub trait Mailbox: Send {
    fn address(&self) -> &MailboxAddress;

    /// Identifies this opening of the address; a reopen gets a new id.
    fn id(&self) -> u64;

    /// Next message, or `None` once the mailbox is unlinked.
    async fn recv(&mut self) -> Option<String>;

    /// Like [`Mailbox::recv`] but gives up after `timeout`.
    async fn recv_timeout(&mut self, timeout: Duration) -> Result<String, TransportError>;
}
