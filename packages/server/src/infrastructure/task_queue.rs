//! Blocking multi-producer / multi-consumer FIFO.
//!
//! `push` never waits for capacity and wakes one waiting consumer; `pop` waits
//! until an item is available. Unbounded unless a capacity is configured, in
//! which case the [`OverflowPolicy`] decides what happens to a push into a full queue.

use std::collections::VecDeque;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::{Mutex, Notify};

use crate::{
    config::OverflowPolicy,
    domain::{BroadcastPublisher, BroadcastTask, PublishError},
};

/// Queue of pending fan-out jobs.
pub type BroadcastQueue = TaskQueue<BroadcastTask>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("task queue is full (capacity {0})")]
    Full(usize),
}

pub struct TaskQueue<T> {
    items: Mutex<VecDeque<T>>,
    notify: Notify,
    capacity: Option<usize>,
    overflow: OverflowPolicy,
}

impl<T: Send> TaskQueue<T> {
    /// Unbounded queue.
    pub fn unbounded() -> Self {
        Self::new(None, OverflowPolicy::Reject)
    }

    pub fn new(capacity: Option<usize>, overflow: OverflowPolicy) -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            notify: Notify::new(),
            capacity,
            overflow,
        }
    }

    pub async fn push(&self, item: T) -> Result<(), QueueError> {
        {
            let mut items = self.items.lock().await;
            if let Some(capacity) = self.capacity
                && items.len() >= capacity
            {
                match self.overflow {
                    OverflowPolicy::Reject => return Err(QueueError::Full(capacity)),
                    OverflowPolicy::DropOldest => {
                        items.pop_front();
                        tracing::warn!(
                            "Task queue full (capacity {}), dropped the oldest task",
                            capacity
                        );
                    }
                }
            }
            items.push_back(item);
        }
        self.notify.notify_one();
        Ok(())
    }

    /// Wait for the next item.
    ///
    /// Cancel-safe: an item is only removed on the final, non-suspending step.
    pub async fn pop(&self) -> T {
        loop {
            if let Some(item) = self.items.lock().await.pop_front() {
                return item;
            }
            // a push racing with this check leaves a permit behind, so no wakeup is lost
            self.notify.notified().await;
        }
    }

    pub async fn len(&self) -> usize {
        self.items.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.lock().await.is_empty()
    }
}

#[async_trait]
impl BroadcastPublisher for TaskQueue<BroadcastTask> {
    async fn publish(&self, task: BroadcastTask) -> Result<(), PublishError> {
        self.push(task).await.map_err(|e| match e {
            QueueError::Full(capacity) => PublishError::QueueFull(capacity),
        })
    }
}
