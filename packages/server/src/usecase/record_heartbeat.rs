//! UseCase: ハートビート記録（PING）

use std::sync::Arc;

use chatrelay_shared::time::Clock;

use crate::domain::{ClientName, HeartbeatRepository, Timestamp};

pub struct RecordHeartbeatUseCase {
    heartbeat: Arc<dyn HeartbeatRepository>,
    clock: Arc<dyn Clock>,
}

impl RecordHeartbeatUseCase {
    pub fn new(heartbeat: Arc<dyn HeartbeatRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { heartbeat, clock }
    }

    /// 未登録のクライアントでも記録する（次の掃除で回収される）
    pub async fn execute(&self, client: ClientName) -> Timestamp {
        let now = Timestamp::new(self.clock.now_millis());
        tracing::trace!("PING from '{}'", client);
        self.heartbeat.touch(client, now).await;
        now
    }
}
