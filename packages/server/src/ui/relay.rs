//! Relay runtime: wires the shared state, workers and dispatcher together.

use std::sync::Arc;

use chatrelay_shared::time::Clock;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{
    config::RelayConfig,
    domain::{
        ClientName, HeartbeatRepository, MailboxAddress, MailboxTransport, RoomRegistry,
        RoomRepository, TransportError, ValueObjectError,
    },
    infrastructure::{
        repository::{InMemoryHeartbeatRepository, InMemoryRoomRepository},
        task_queue::{BroadcastQueue, TaskQueue},
    },
    usecase::DisconnectClientUseCase,
    worker::{Broadcaster, HeartbeatMonitor},
};

use super::dispatcher::Dispatcher;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("failed to open server mailbox: {0}")]
    OpenMailbox(#[source] TransportError),

    #[error("invalid default room: {0}")]
    InvalidRoom(#[from] ValueObjectError),

    #[error("at least one broadcaster worker is required")]
    NoWorkers,

    #[error("heartbeat sweep interval must be non-zero")]
    ZeroSweepInterval,
}

/// Chat relay core
///
/// # Example
///
/// ```ignore
/// let transport = Arc::new(InMemoryMailboxTransport::new(config.max_message_size));
/// let relay = Relay::new(config, transport, Arc::new(SystemClock)).start().await?;
/// // ...
/// relay.shutdown().await;
/// ```
pub struct Relay {
    config: RelayConfig,
    transport: Arc<dyn MailboxTransport>,
    clock: Arc<dyn Clock>,
}

impl Relay {
    pub fn new(
        config: RelayConfig,
        transport: Arc<dyn MailboxTransport>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            transport,
            clock,
        }
    }

    /// Open the server mailbox, seed the default rooms and spawn the
    /// broadcaster pool, the heartbeat monitor and the dispatcher.
    pub async fn start(self) -> Result<RelayHandle, RelayError> {
        if self.config.worker_count == 0 {
            return Err(RelayError::NoWorkers);
        }
        if self.config.sweep_interval.is_zero() {
            return Err(RelayError::ZeroSweepInterval);
        }
        let rooms = self.config.default_room_names()?;

        let server_mailbox = self
            .transport
            .open(&MailboxAddress::server(), self.config.server_mailbox_capacity)
            .await
            .map_err(RelayError::OpenMailbox)?;

        let repository: Arc<dyn RoomRepository> =
            Arc::new(InMemoryRoomRepository::new(RoomRegistry::with_rooms(rooms)));
        let heartbeat: Arc<dyn HeartbeatRepository> = Arc::new(InMemoryHeartbeatRepository::new());
        let queue: Arc<BroadcastQueue> = Arc::new(TaskQueue::new(
            self.config.queue_capacity,
            self.config.overflow_policy,
        ));
        let disconnect = Arc::new(DisconnectClientUseCase::new(
            repository.clone(),
            heartbeat.clone(),
            queue.clone(),
        ));
        let token = CancellationToken::new();
        let mut tasks = Vec::new();

        // 1. Broadcaster pool
        let broadcaster = Arc::new(Broadcaster::new(
            queue.clone(),
            repository.clone(),
            self.transport.clone(),
        ));
        tasks.push(broadcaster.spawn_pool(self.config.worker_count, token.clone()));

        // 2. Heartbeat monitor
        let monitor = Arc::new(HeartbeatMonitor::new(
            heartbeat.clone(),
            disconnect.clone(),
            self.transport.clone(),
            self.clock.clone(),
            self.config.heartbeat_timeout_millis(),
            self.config.sweep_interval,
        ));
        tasks.push(tokio::spawn(monitor.clone().run(token.clone())));

        // 3. Dispatcher
        let dispatcher = Dispatcher::new(
            repository.clone(),
            heartbeat.clone(),
            queue.clone(),
            self.transport.clone(),
            self.clock.clone(),
            disconnect,
            self.config.max_message_size,
        );
        let dispatcher_token = token.clone();
        tasks.push(tokio::spawn(async move {
            dispatcher.run(server_mailbox, dispatcher_token).await;
        }));

        tracing::info!(
            "Relay started: {} workers, rooms [{}]",
            self.config.worker_count,
            self.config.default_rooms.join(", ")
        );

        Ok(RelayHandle {
            config: self.config,
            repository,
            heartbeat,
            transport: self.transport,
            monitor,
            token,
            tasks,
        })
    }
}

/// Handle to a running relay.
pub struct RelayHandle {
    config: RelayConfig,
    repository: Arc<dyn RoomRepository>,
    heartbeat: Arc<dyn HeartbeatRepository>,
    transport: Arc<dyn MailboxTransport>,
    monitor: Arc<HeartbeatMonitor>,
    token: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl RelayHandle {
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    pub fn repository(&self) -> Arc<dyn RoomRepository> {
        self.repository.clone()
    }

    pub fn heartbeat(&self) -> Arc<dyn HeartbeatRepository> {
        self.heartbeat.clone()
    }

    pub fn transport(&self) -> Arc<dyn MailboxTransport> {
        self.transport.clone()
    }

    /// Run one heartbeat sweep now, outside the periodic schedule.
    pub async fn sweep_heartbeats(&self) -> Vec<ClientName> {
        self.monitor.sweep_once().await
    }

    /// Stop every task, wait for them and unlink the server mailbox.
    pub async fn shutdown(self) {
        tracing::info!("Relay shutting down");
        self.token.cancel();
        for task in self.tasks {
            if let Err(e) = task.await {
                tracing::error!("Relay task failed: {}", e);
            }
        }
        self.transport.unlink(&MailboxAddress::server()).await;
        tracing::info!("Relay shutdown complete");
    }
}
