//! UseCase: メンバー一覧（WHO）

use std::sync::Arc;

use crate::domain::{ClientName, MailboxTransport, RoomName, RoomRepository, TransportError, reply};

/// メンバー一覧を要求者のメールボックスへ返すユースケース
pub struct ListMembersUseCase {
    repository: Arc<dyn RoomRepository>,
    transport: Arc<dyn MailboxTransport>,
}

impl ListMembersUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, transport: Arc<dyn MailboxTransport>) -> Self {
        Self {
            repository,
            transport,
        }
    }

    /// 存在しないルームは空として扱う
    pub async fn execute(
        &self,
        client: &ClientName,
        room: &RoomName,
    ) -> Result<Vec<ClientName>, TransportError> {
        let members = self.repository.who(room).await;
        self.transport
            .try_send(&client.mailbox(), &reply::member_list(room, &members))
            .await?;
        Ok(members)
    }
}
