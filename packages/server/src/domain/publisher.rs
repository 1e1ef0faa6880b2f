//! Broadcast publisher trait 定義
//!
//! ハンドラはタスクを積むだけで、配信はワーカープールが行う。

use async_trait::async_trait;

use super::{entity::BroadcastTask, error::PublishError};

#[async_trait]
pub trait BroadcastPublisher: Send + Sync {
    /// Enqueue a fan-out job without waiting for delivery.
    async fn publish(&self, task: BroadcastTask) -> Result<(), PublishError>;
}
