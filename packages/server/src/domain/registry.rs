//! Room registry: the single source of truth for "who is where".
//!
//! A client appears in at most one room's member set at any time. Joining a
//! room removes the client from every room first.

use std::collections::{BTreeMap, BTreeSet};

use super::{
    entity::{NoticeKind, Room, SystemNotice},
    value_object::{ClientName, MailboxAddress, RoomName},
};

#[derive(Debug, Default, Clone)]
pub struct RoomRegistry {
    rooms: BTreeMap<RoomName, Room>,
    registered: BTreeSet<MailboxAddress>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the given rooms created up front (empty).
    pub fn with_rooms(rooms: impl IntoIterator<Item = RoomName>) -> Self {
        let mut registry = Self::new();
        for name in rooms {
            registry.rooms.insert(name.clone(), Room::new(name));
        }
        registry
    }

    /// Add a client mailbox to the registered set. Returns `false` if it was already present.
    pub fn register(&mut self, address: MailboxAddress) -> bool {
        self.registered.insert(address)
    }

    pub fn is_registered(&self, client: &ClientName) -> bool {
        self.registered.contains(&client.mailbox())
    }

    /// Mailbox of a registered client.
    pub fn mailbox_of(&self, client: &ClientName) -> Option<MailboxAddress> {
        let address = client.mailbox();
        self.registered.contains(&address).then_some(address)
    }

    /// Move `client` into `room`, creating the room if needed.
    pub fn join(&mut self, client: ClientName, room: RoomName) -> SystemNotice {
        for existing in self.rooms.values_mut() {
            existing.remove_member(&client);
        }
        self.rooms
            .entry(room.clone())
            .or_insert_with(|| Room::new(room.clone()))
            .add_member(client.clone());
        SystemNotice::new(NoticeKind::Joined, client, room)
    }

    /// Remove `client` from the room it occupies.
    pub fn leave(&mut self, client: &ClientName) -> Option<SystemNotice> {
        self.remove_from_rooms(client)
            .map(|room| SystemNotice::new(NoticeKind::Left, client.clone(), room))
    }

    /// Leave semantics plus deregistration of the client's mailbox.
    pub fn quit(&mut self, client: &ClientName) -> Option<SystemNotice> {
        let room = self.remove_from_rooms(client);
        self.registered.remove(&client.mailbox());
        room.map(|room| SystemNotice::new(NoticeKind::Quit, client.clone(), room))
    }

    /// Member snapshot of `room`; empty if the room has no members or does not exist.
    pub fn who(&self, room: &RoomName) -> Vec<ClientName> {
        self.members_of(room).unwrap_or_default()
    }

    /// Member snapshot used to resolve delivery targets.
    pub fn members_of(&self, room: &RoomName) -> Option<Vec<ClientName>> {
        self.rooms.get(room).map(|room| room.members.clone())
    }

    /// First room (in name order) containing `client`.
    pub fn room_of(&self, client: &ClientName) -> Option<RoomName> {
        self.rooms
            .values()
            .find(|room| room.contains(client))
            .map(|room| room.name.clone())
    }

    pub fn rooms(&self) -> Vec<Room> {
        self.rooms.values().cloned().collect()
    }

    pub fn registered_count(&self) -> usize {
        self.registered.len()
    }

    fn remove_from_rooms(&mut self, client: &ClientName) -> Option<RoomName> {
        let mut found = None;
        for room in self.rooms.values_mut() {
            if room.remove_member(client) && found.is_none() {
                found = Some(room.name.clone());
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(raw: &str) -> ClientName {
        ClientName::new(raw).unwrap()
    }

    fn room(raw: &str) -> RoomName {
        RoomName::new(raw).unwrap()
    }

    fn rooms_containing(registry: &RoomRegistry, client: &ClientName) -> usize {
        registry
            .rooms()
            .iter()
            .filter(|room| room.contains(client))
            .count()
    }

    #[test]
    fn test_register_is_idempotent() {
        // テスト項目: 同じアドレスを二度登録しても一件のまま
        // given (前提条件):
        let mut registry = RoomRegistry::new();
        let alice = name("alice");

        // when (操作):
        let first = registry.register(alice.mailbox());
        let second = registry.register(alice.mailbox());

        // then (期待する結果):
        assert!(first);
        assert!(!second);
        assert_eq!(registry.registered_count(), 1);
        assert_eq!(registry.mailbox_of(&alice), Some(alice.mailbox()));
    }

    #[test]
    fn test_join_creates_room_lazily() {
        // テスト項目: 存在しないルームへの参加でルームが作成される
        // given (前提条件):
        let mut registry = RoomRegistry::new();

        // when (操作):
        let notice = registry.join(name("alice"), room("lounge"));

        // then (期待する結果):
        assert_eq!(notice.text(), "[SYSTEM]: alice has joined #lounge");
        assert_eq!(registry.who(&room("lounge")), vec![name("alice")]);
    }

    #[test]
    fn test_join_displaces_prior_room() {
        // テスト項目: 別ルームへの参加で元のルームから外れ、join 通知のみ生成される
        // given (前提条件):
        let mut registry = RoomRegistry::with_rooms([room("room1"), room("room2")]);
        let alice = name("alice");
        registry.join(alice.clone(), room("room1"));

        // when (操作):
        let notice = registry.join(alice.clone(), room("room2"));

        // then (期待する結果):
        assert_eq!(notice.kind, NoticeKind::Joined);
        assert_eq!(notice.room, room("room2"));
        assert!(registry.who(&room("room1")).is_empty());
        assert_eq!(registry.who(&room("room2")), vec![alice.clone()]);
        assert_eq!(rooms_containing(&registry, &alice), 1);
    }

    #[test]
    fn test_rejoin_same_room_keeps_single_membership() {
        // テスト項目: 同じルームに再参加しても重複しない
        // given (前提条件):
        let mut registry = RoomRegistry::new();
        registry.join(name("alice"), room("room1"));

        // when (操作):
        registry.join(name("alice"), room("room1"));

        // then (期待する結果):
        assert_eq!(registry.who(&room("room1")), vec![name("alice")]);
    }

    #[test]
    fn test_leave_returns_room_only_when_found() {
        // テスト項目: 在室していれば退出通知、していなければ None
        // given (前提条件):
        let mut registry = RoomRegistry::new();
        registry.join(name("alice"), room("room1"));

        // when (操作):
        let left = registry.leave(&name("alice"));
        let left_again = registry.leave(&name("alice"));

        // then (期待する結果):
        assert_eq!(left.unwrap().text(), "[SYSTEM]: alice has left #room1");
        assert_eq!(left_again, None);
        // rooms persist once created
        assert_eq!(registry.members_of(&room("room1")), Some(vec![]));
    }

    #[test]
    fn test_quit_removes_membership_and_registration() {
        // テスト項目: quit で在室情報と登録の両方が消え、二度目は何もしない
        // given (前提条件):
        let mut registry = RoomRegistry::new();
        let alice = name("alice");
        registry.register(alice.mailbox());
        registry.join(alice.clone(), room("room1"));

        // when (操作):
        let notice = registry.quit(&alice);
        let second = registry.quit(&alice);

        // then (期待する結果):
        assert_eq!(notice.unwrap().text(), "[SYSTEM]: alice has quit");
        assert_eq!(second, None);
        assert!(!registry.is_registered(&alice));
        assert_eq!(registry.room_of(&alice), None);
    }

    #[test]
    fn test_quit_without_room_still_deregisters() {
        // テスト項目: ルーム未参加で quit しても通知は出ず、登録は解除される
        // given (前提条件):
        let mut registry = RoomRegistry::new();
        let bob = name("bob");
        registry.register(bob.mailbox());

        // when (操作):
        let notice = registry.quit(&bob);

        // then (期待する結果):
        assert_eq!(notice, None);
        assert_eq!(registry.mailbox_of(&bob), None);
    }

    #[test]
    fn test_who_unknown_room_is_empty() {
        // テスト項目: 存在しないルームのメンバー一覧は空
        // given (前提条件):
        let registry = RoomRegistry::new();

        // when (操作):
        let members = registry.who(&room("room9"));

        // then (期待する結果):
        assert!(members.is_empty());
        assert_eq!(registry.members_of(&room("room9")), None);
    }

    #[test]
    fn test_single_room_invariant_over_operation_sequence() {
        // テスト項目: JOIN / LEAVE / QUIT を任意に繰り返しても各クライアントは高々 1 ルーム
        // given (前提条件):
        let mut registry = RoomRegistry::with_rooms([room("room1"), room("room2"), room("room3")]);
        let clients = [name("alice"), name("bob"), name("carol")];
        let targets = [room("room1"), room("room2"), room("room3"), room("room4")];

        // when (操作):
        for step in 0..60usize {
            let client = clients[step % clients.len()].clone();
            match (step * 7) % 5 {
                0 | 1 | 2 => {
                    registry.join(client, targets[(step * 3) % targets.len()].clone());
                }
                3 => {
                    registry.leave(&client);
                }
                _ => {
                    registry.quit(&client);
                }
            }

            // then (期待する結果):
            for client in &clients {
                assert!(rooms_containing(&registry, client) <= 1);
            }
        }
    }
}
