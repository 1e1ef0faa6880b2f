//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! `RoomRegistry` を `RwLock` で包み、変更系は書き込みロック、参照系は読み込みロックで扱います。
//! ロックガードはスコープを抜けた時点で必ず解放されます。

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{
    ClientName, MailboxAddress, Room, RoomName, RoomRegistry, RoomRepository, SystemNotice,
};

/// インメモリ Room Repository 実装
pub struct InMemoryRoomRepository {
    registry: RwLock<RoomRegistry>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new(registry: RoomRegistry) -> Self {
        Self {
            registry: RwLock::new(registry),
        }
    }
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new(RoomRegistry::new())
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn register(&self, address: MailboxAddress) -> bool {
        self.registry.write().await.register(address)
    }

    async fn join(&self, client: ClientName, room: RoomName) -> SystemNotice {
        self.registry.write().await.join(client, room)
    }

    async fn leave(&self, client: &ClientName) -> Option<SystemNotice> {
        self.registry.write().await.leave(client)
    }

    async fn quit(&self, client: &ClientName) -> Option<SystemNotice> {
        self.registry.write().await.quit(client)
    }

    async fn who(&self, room: &RoomName) -> Vec<ClientName> {
        self.registry.read().await.who(room)
    }

    async fn members_of(&self, room: &RoomName) -> Option<Vec<ClientName>> {
        self.registry.read().await.members_of(room)
    }

    async fn room_of(&self, client: &ClientName) -> Option<RoomName> {
        self.registry.read().await.room_of(client)
    }

    async fn mailbox_of(&self, client: &ClientName) -> Option<MailboxAddress> {
        self.registry.read().await.mailbox_of(client)
    }

    async fn rooms(&self) -> Vec<Room> {
        self.registry.read().await.rooms()
    }
}
