//! In-process named mailboxes backed by bounded `tokio::sync::mpsc` channels.
//!
//! Each address maps to the sending half of one channel; the receiving half is
//! handed out by [`MailboxTransport::open`]. Payload size is checked the way a
//! C-string mailbox would count it (payload plus one terminator byte).

use std::{
    collections::HashMap,
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use tokio::sync::{
    RwLock,
    mpsc::{self, error::TrySendError},
};

use crate::domain::{Mailbox, MailboxAddress, MailboxTransport, TransportError};

struct Slot {
    id: u64,
    sender: mpsc::Sender<String>,
}

pub struct InMemoryMailboxTransport {
    mailboxes: RwLock<HashMap<MailboxAddress, Slot>>,
    next_id: AtomicU64,
    max_message_size: usize,
}

impl InMemoryMailboxTransport {
    pub fn new(max_message_size: usize) -> Self {
        Self {
            mailboxes: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            max_message_size,
        }
    }

    fn check_size(&self, payload: &str) -> Result<(), TransportError> {
        let size = payload.len() + 1;
        if size > self.max_message_size {
            return Err(TransportError::MessageTooLarge {
                size,
                max: self.max_message_size,
            });
        }
        Ok(())
    }

    async fn sender(&self, address: &MailboxAddress) -> Result<mpsc::Sender<String>, TransportError> {
        self.mailboxes
            .read()
            .await
            .get(address)
            .map(|slot| slot.sender.clone())
            .ok_or_else(|| TransportError::NotFound(address.to_string()))
    }
}

#[async_trait]
impl MailboxTransport for InMemoryMailboxTransport {
    async fn open(
        &self,
        address: &MailboxAddress,
        capacity: usize,
    ) -> Result<Box<dyn Mailbox>, TransportError> {
        let mut mailboxes = self.mailboxes.write().await;
        if let Some(existing) = mailboxes.get(address)
            && !existing.sender.is_closed()
        {
            return Err(TransportError::AddressInUse(address.to_string()));
        }

        let (tx, rx) = mpsc::channel(capacity.max(1));
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        mailboxes.insert(address.clone(), Slot { id, sender: tx });
        tracing::debug!("Mailbox '{}' opened (capacity {})", address, capacity);

        Ok(Box::new(InMemoryMailbox {
            address: address.clone(),
            id,
            receiver: rx,
        }))
    }

    async fn send(&self, address: &MailboxAddress, payload: &str) -> Result<(), TransportError> {
        self.check_size(payload)?;
        // clone the sender so no lock is held while waiting for capacity
        let sender = self.sender(address).await?;
        sender
            .send(payload.to_string())
            .await
            .map_err(|_| TransportError::Closed(address.to_string()))
    }

    async fn try_send(
        &self,
        address: &MailboxAddress,
        payload: &str,
    ) -> Result<(), TransportError> {
        self.check_size(payload)?;
        let sender = self.sender(address).await?;
        sender.try_send(payload.to_string()).map_err(|e| match e {
            TrySendError::Full(_) => TransportError::Full(address.to_string()),
            TrySendError::Closed(_) => TransportError::Closed(address.to_string()),
        })
    }

    async fn unlink(&self, address: &MailboxAddress) {
        if self.mailboxes.write().await.remove(address).is_some() {
            tracing::debug!("Mailbox '{}' unlinked", address);
        }
    }

    async fn release(&self, address: &MailboxAddress, mailbox_id: u64) -> bool {
        let mut mailboxes = self.mailboxes.write().await;
        match mailboxes.get(address) {
            Some(slot) if slot.id == mailbox_id => {
                mailboxes.remove(address);
                tracing::debug!("Mailbox '{}' released", address);
                true
            }
            Some(_) => {
                tracing::debug!("Mailbox '{}' was reopened; leaving it in place", address);
                false
            }
            None => false,
        }
    }
}

struct InMemoryMailbox {
    address: MailboxAddress,
    id: u64,
    receiver: mpsc::Receiver<String>,
}

#[async_trait]
impl Mailbox for InMemoryMailbox {
    fn address(&self) -> &MailboxAddress {
        &self.address
    }

    fn id(&self) -> u64 {
        self.id
    }

    async fn recv(&mut self) -> Option<String> {
        self.receiver.recv().await
    }

    async fn recv_timeout(&mut self, timeout: Duration) -> Result<String, TransportError> {
        match tokio::time::timeout(timeout, self.receiver.recv()).await {
            Ok(Some(message)) => Ok(message),
            Ok(None) => Err(TransportError::Closed(self.address.to_string())),
            Err(_) => Err(TransportError::Timeout),
        }
    }
}
