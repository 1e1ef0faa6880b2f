//! Heartbeat table: last-seen timestamp per client.

use std::collections::HashMap;

use super::value_object::{ClientName, Timestamp};

#[derive(Debug, Default, Clone)]
pub struct HeartbeatTable {
    last_seen: HashMap<ClientName, Timestamp>,
}

impl HeartbeatTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set last-seen of `client` to `now`.
    pub fn touch(&mut self, client: ClientName, now: Timestamp) {
        self.last_seen.insert(client, now);
    }

    /// Clients whose last-seen is strictly older than `timeout_millis` at `now`.
    ///
    /// Sorted by name so that cleanup order is deterministic.
    pub fn sweep(&self, timeout_millis: i64, now: Timestamp) -> Vec<ClientName> {
        let mut stale: Vec<ClientName> = self
            .last_seen
            .iter()
            .filter(|(_, seen)| seen.millis_until(now) > timeout_millis)
            .map(|(client, _)| client.clone())
            .collect();
        stale.sort();
        stale
    }

    /// Delete the record; returns whether one existed.
    pub fn remove(&mut self, client: &ClientName) -> bool {
        self.last_seen.remove(client).is_some()
    }

    pub fn last_seen(&self, client: &ClientName) -> Option<Timestamp> {
        self.last_seen.get(client).copied()
    }

    pub fn len(&self) -> usize {
        self.last_seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(raw: &str) -> ClientName {
        ClientName::new(raw).unwrap()
    }

    #[test]
    fn test_touch_refreshes_last_seen() {
        // テスト項目: touch で最終確認時刻が更新される
        // given (前提条件):
        let mut table = HeartbeatTable::new();
        table.touch(name("alice"), Timestamp::new(1_000));

        // when (操作):
        table.touch(name("alice"), Timestamp::new(5_000));

        // then (期待する結果):
        assert_eq!(table.last_seen(&name("alice")), Some(Timestamp::new(5_000)));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_sweep_is_strictly_older_than_timeout() {
        // テスト項目: タイムアウトを「超えた」クライアントのみが検出される
        // given (前提条件):
        let mut table = HeartbeatTable::new();
        table.touch(name("fresh"), Timestamp::new(20_000));
        table.touch(name("edge"), Timestamp::new(10_000));
        table.touch(name("stale"), Timestamp::new(9_999));

        // when (操作):
        let stale = table.sweep(30_000, Timestamp::new(40_000));

        // then (期待する結果):
        assert_eq!(stale, vec![name("stale")]);
    }

    #[test]
    fn test_sweep_does_not_mutate() {
        // テスト項目: sweep は読み取りのみでレコードを削除しない
        // given (前提条件):
        let mut table = HeartbeatTable::new();
        table.touch(name("alice"), Timestamp::new(0));

        // when (操作):
        let first = table.sweep(1_000, Timestamp::new(10_000));
        let second = table.sweep(1_000, Timestamp::new(10_000));

        // then (期待する結果):
        assert_eq!(first, second);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        // テスト項目: 削除は冪等
        // given (前提条件):
        let mut table = HeartbeatTable::new();
        table.touch(name("alice"), Timestamp::new(0));

        // when (操作):
        let removed = table.remove(&name("alice"));
        let removed_again = table.remove(&name("alice"));

        // then (期待する結果):
        assert!(removed);
        assert!(!removed_again);
        assert!(table.is_empty());
    }
}
