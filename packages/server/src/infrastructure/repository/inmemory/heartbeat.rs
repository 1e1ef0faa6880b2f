//! InMemory Heartbeat Repository 実装
//!
//! `HeartbeatTable` を単一の `Mutex` で保護します。書き込みは PING ごと、
//! 一括読み込みは掃除周期ごとなので競合は少ない。

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ClientName, HeartbeatRepository, HeartbeatTable, Timestamp};

#[derive(Default)]
pub struct InMemoryHeartbeatRepository {
    table: Mutex<HeartbeatTable>,
}

impl InMemoryHeartbeatRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HeartbeatRepository for InMemoryHeartbeatRepository {
    async fn touch(&self, client: ClientName, now: Timestamp) {
        self.table.lock().await.touch(client, now);
    }

    async fn sweep(&self, timeout_millis: i64, now: Timestamp) -> Vec<ClientName> {
        self.table.lock().await.sweep(timeout_millis, now)
    }

    async fn remove(&self, client: &ClientName) -> bool {
        self.table.lock().await.remove(client)
    }

    async fn last_seen(&self, client: &ClientName) -> Option<Timestamp> {
        self.table.lock().await.last_seen(client)
    }
}
