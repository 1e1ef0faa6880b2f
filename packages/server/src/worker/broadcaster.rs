//! Broadcaster worker pool.
//!
//! Every worker pops tasks from the shared [`BroadcastQueue`], resolves the
//! target room and pushes the payload to each member except the sender with a
//! non-blocking send. A full or missing mailbox only loses that one delivery.

use std::sync::Arc;

use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;

use crate::{
    domain::{BroadcastTask, MailboxTransport, RoomRepository},
    infrastructure::task_queue::BroadcastQueue,
};

pub struct Broadcaster {
    queue: Arc<BroadcastQueue>,
    repository: Arc<dyn RoomRepository>,
    transport: Arc<dyn MailboxTransport>,
}

impl Broadcaster {
    pub fn new(
        queue: Arc<BroadcastQueue>,
        repository: Arc<dyn RoomRepository>,
        transport: Arc<dyn MailboxTransport>,
    ) -> Self {
        Self {
            queue,
            repository,
            transport,
        }
    }

    /// Deliver one task and return how many mailboxes accepted it.
    ///
    /// A task without a target room goes to the sender's current room; if the
    /// sender is in no room the task is dropped.
    pub async fn deliver(&self, task: &BroadcastTask) -> usize {
        let room = match &task.target_room {
            Some(room) => Some(room.clone()),
            None => self.repository.room_of(&task.sender).await,
        };
        let Some(room) = room else {
            tracing::debug!("Dropping message from '{}': not in any room", task.sender);
            return 0;
        };
        let Some(members) = self.repository.members_of(&room).await else {
            tracing::debug!("Dropping task for unknown room #{}", room);
            return 0;
        };

        let mut delivered = 0;
        for member in members.iter().filter(|member| **member != task.sender) {
            match self
                .transport
                .try_send(&member.mailbox(), &task.payload)
                .await
            {
                Ok(()) => delivered += 1,
                Err(e) => tracing::debug!("Delivery to '{}' in #{} dropped: {}", member, room, e),
            }
        }
        tracing::trace!(
            "Delivered to {}/{} members of #{}",
            delivered,
            members.len(),
            room
        );
        delivered
    }

    /// Spawn `worker_count` workers plus a supervisor that restarts any worker
    /// that panics. The returned handle completes once every worker has stopped
    /// after `token` is cancelled.
    pub fn spawn_pool(
        self: Arc<Self>,
        worker_count: usize,
        token: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut workers = JoinSet::new();
            for id in 0..worker_count {
                workers.spawn(self.clone().run_worker(id, token.clone()));
            }
            tracing::info!("Broadcaster pool started with {} workers", worker_count);

            let mut next_id = worker_count;
            while let Some(result) = workers.join_next().await {
                match result {
                    Ok(id) => tracing::debug!("Broadcaster worker {} stopped", id),
                    Err(e) if e.is_panic() && !token.is_cancelled() => {
                        tracing::error!("Broadcaster worker panicked, restarting: {}", e);
                        workers.spawn(self.clone().run_worker(next_id, token.clone()));
                        next_id += 1;
                    }
                    Err(e) => tracing::debug!("Broadcaster worker ended: {}", e),
                }
            }
            tracing::info!("Broadcaster pool stopped");
        })
    }

    async fn run_worker(self: Arc<Self>, id: usize, token: CancellationToken) -> usize {
        loop {
            let task = tokio::select! {
                _ = token.cancelled() => break,
                task = self.queue.pop() => task,
            };
            self.deliver(&task).await;
        }
        id
    }
}
