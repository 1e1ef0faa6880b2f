//! Heartbeat monitor.
//!
//! Sweeps the heartbeat table on a fixed period. Every client silent for longer
//! than the timeout is disconnected directly, and a `QUIT:<name>` envelope is
//! also pushed into the server mailbox without waiting. The dispatcher's QUIT
//! handling is idempotent, so the second pass finds nothing left to clean.

use std::{sync::Arc, time::Duration};

use chatrelay_shared::time::Clock;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{
    domain::{ClientName, HeartbeatRepository, MailboxAddress, MailboxTransport, Timestamp},
    usecase::DisconnectClientUseCase,
};

pub struct HeartbeatMonitor {
    heartbeat: Arc<dyn HeartbeatRepository>,
    disconnect: Arc<DisconnectClientUseCase>,
    transport: Arc<dyn MailboxTransport>,
    clock: Arc<dyn Clock>,
    timeout_millis: i64,
    sweep_interval: Duration,
}

impl HeartbeatMonitor {
    pub fn new(
        heartbeat: Arc<dyn HeartbeatRepository>,
        disconnect: Arc<DisconnectClientUseCase>,
        transport: Arc<dyn MailboxTransport>,
        clock: Arc<dyn Clock>,
        timeout_millis: i64,
        sweep_interval: Duration,
    ) -> Self {
        Self {
            heartbeat,
            disconnect,
            transport,
            clock,
            timeout_millis,
            sweep_interval,
        }
    }

    /// Run one sweep and return the clients reclaimed by it.
    pub async fn sweep_once(&self) -> Vec<ClientName> {
        let now = Timestamp::new(self.clock.now_millis());
        let stale = self.heartbeat.sweep(self.timeout_millis, now).await;

        for client in &stale {
            tracing::warn!("Heartbeat timeout for '{}', disconnecting", client);
            self.disconnect.execute(client).await;

            let envelope = format!("QUIT:{}", client);
            if let Err(e) = self
                .transport
                .try_send(&MailboxAddress::server(), &envelope)
                .await
            {
                tracing::debug!("Could not queue '{}' for the dispatcher: {}", envelope, e);
            }
        }
        stale
    }

    /// Sweep every `sweep_interval` until `token` is cancelled. The first sweep
    /// happens one full interval after start.
    pub async fn run(self: Arc<Self>, token: CancellationToken) {
        let mut ticker =
            tokio::time::interval_at(Instant::now() + self.sweep_interval, self.sweep_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(
            "Heartbeat monitor started (sweep every {:?}, timeout {}ms)",
            self.sweep_interval,
            self.timeout_millis
        );

        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => {
                    let reclaimed = self.sweep_once().await;
                    if !reclaimed.is_empty() {
                        tracing::info!("Heartbeat sweep reclaimed {} client(s)", reclaimed.len());
                    }
                }
            }
        }
        tracing::info!("Heartbeat monitor stopped");
    }
}
