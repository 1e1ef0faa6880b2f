//! Entities

use serde::Serialize;

use super::value_object::{ClientName, RoomName};

/// ルーム
///
/// メンバーは参加順に保持する（表示順を決定的にするため）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Room {
    pub name: RoomName,
    pub members: Vec<ClientName>,
}

impl Room {
    pub fn new(name: RoomName) -> Self {
        Self {
            name,
            members: Vec::new(),
        }
    }

    pub fn contains(&self, client: &ClientName) -> bool {
        self.members.iter().any(|member| member == client)
    }

    /// Add a member unless already present.
    pub fn add_member(&mut self, client: ClientName) {
        if !self.contains(&client) {
            self.members.push(client);
        }
    }

    /// Remove a member; returns whether it was present.
    pub fn remove_member(&mut self, client: &ClientName) -> bool {
        let before = self.members.len();
        self.members.retain(|member| member != client);
        self.members.len() != before
    }
}

/// ブロードキャストタスク
///
/// `target_room` が `None` の場合、配信時に送信者の現在のルームを解決する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastTask {
    pub payload: String,
    pub sender: ClientName,
    pub target_room: Option<RoomName>,
}

impl BroadcastTask {
    /// A chat line whose room is resolved from the sender at delivery time.
    pub fn chat(sender: ClientName, payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            sender,
            target_room: None,
        }
    }
}

/// Kind of membership change announced to a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Joined,
    Left,
    Quit,
}

/// システム通知（join / leave / quit）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemNotice {
    pub kind: NoticeKind,
    pub subject: ClientName,
    pub room: RoomName,
}

impl SystemNotice {
    pub fn new(kind: NoticeKind, subject: ClientName, room: RoomName) -> Self {
        Self {
            kind,
            subject,
            room,
        }
    }

    /// Wire text of the notice.
    pub fn text(&self) -> String {
        match self.kind {
            NoticeKind::Joined => format!("[SYSTEM]: {} has joined #{}", self.subject, self.room),
            NoticeKind::Left => format!("[SYSTEM]: {} has left #{}", self.subject, self.room),
            NoticeKind::Quit => format!("[SYSTEM]: {} has quit", self.subject),
        }
    }

    /// Broadcast the notice to its room on behalf of the subject.
    pub fn into_task(self) -> BroadcastTask {
        BroadcastTask {
            payload: self.text(),
            sender: self.subject,
            target_room: Some(self.room),
        }
    }
}
