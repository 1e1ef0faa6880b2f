//! Value Objects
//!
//! 名前・アドレス・時刻を型で区別し、生成時に検証します。

use std::fmt;

use serde::Serialize;

use super::error::ValueObjectError;

/// Well-known mailbox address owned by the relay server.
pub const SERVER_MAILBOX: &str = "/server";

/// Prefix of every client mailbox address (`/client_<name>`).
pub const CLIENT_MAILBOX_PREFIX: &str = "/client_";

/// クライアント名
///
/// 空文字・空白・制御文字、およびプロトコルの区切り文字 `:` `>` `[` `]` を含まない。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ClientName(String);

impl ClientName {
    pub fn new(value: impl Into<String>) -> Result<Self, ValueObjectError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValueObjectError::ClientNameEmpty);
        }
        if let Some(c) = value
            .chars()
            .find(|c| c.is_whitespace() || c.is_control() || matches!(c, ':' | '>' | '[' | ']'))
        {
            return Err(ValueObjectError::ClientNameInvalidChar(value, c));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// The mailbox this client receives on.
    pub fn mailbox(&self) -> MailboxAddress {
        MailboxAddress(format!("{}{}", CLIENT_MAILBOX_PREFIX, self.0))
    }
}

impl fmt::Display for ClientName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// ルーム名
///
/// 空文字・空白・制御文字、および `:` `>` を含まない。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RoomName(String);

impl RoomName {
    pub fn new(value: impl Into<String>) -> Result<Self, ValueObjectError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValueObjectError::RoomNameEmpty);
        }
        if let Some(c) = value
            .chars()
            .find(|c| c.is_whitespace() || c.is_control() || matches!(c, ':' | '>'))
        {
            return Err(ValueObjectError::RoomNameInvalidChar(value, c));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// メールボックスのアドレス
///
/// サーバーは [`SERVER_MAILBOX`]、クライアントは `/client_<name>` を使う。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MailboxAddress(String);

impl MailboxAddress {
    /// The relay server's own mailbox.
    pub fn server() -> Self {
        Self(SERVER_MAILBOX.to_string())
    }

    /// Parse a client mailbox address of the form `/client_<name>`.
    pub fn client(value: impl Into<String>) -> Result<Self, ValueObjectError> {
        let value = value.into();
        let name = value
            .strip_prefix(CLIENT_MAILBOX_PREFIX)
            .ok_or_else(|| ValueObjectError::MailboxAddressPrefix(value.clone()))?;
        ClientName::new(name)?;
        Ok(Self(value))
    }

    /// Recover the client name from a client address.
    ///
    /// Returns `None` for the server address.
    pub fn client_name(&self) -> Option<ClientName> {
        self.0
            .strip_prefix(CLIENT_MAILBOX_PREFIX)
            .and_then(|name| ClientName::new(name).ok())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MailboxAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unix タイムスタンプ（ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// Milliseconds elapsed from `self` until `later` (negative if `later` is earlier).
    pub fn millis_until(&self, later: Timestamp) -> i64 {
        later.0.saturating_sub(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_name_accepts_plain_name() {
        // テスト項目: 通常の名前から ClientName を生成できる
        // given (前提条件):
        let raw = "alice_01";

        // when (操作):
        let name = ClientName::new(raw);

        // then (期待する結果):
        assert_eq!(name.unwrap().as_str(), "alice_01");
    }

    #[test]
    fn test_client_name_rejects_empty_and_delimiters() {
        // テスト項目: 空文字やプロトコルの区切り文字を含む名前は拒否される
        // given (前提条件):
        let invalid = ["", "al:ice", "bob>room", "[carol]", "dave smith", "eve\n"];

        // when (操作):
        let results: Vec<_> = invalid.iter().map(|raw| ClientName::new(*raw)).collect();

        // then (期待する結果):
        assert_eq!(results[0], Err(ValueObjectError::ClientNameEmpty));
        for result in &results[1..] {
            assert!(matches!(
                result,
                Err(ValueObjectError::ClientNameInvalidChar(_, _))
            ));
        }
    }

    #[test]
    fn test_room_name_rejects_delimiters() {
        // テスト項目: `:` や `>` を含むルーム名は拒否される
        // given (前提条件):

        // when (操作):
        let ok = RoomName::new("room-9");
        let colon = RoomName::new("a:b");
        let empty = RoomName::new("");

        // then (期待する結果):
        assert_eq!(ok.unwrap().as_str(), "room-9");
        assert!(matches!(
            colon,
            Err(ValueObjectError::RoomNameInvalidChar(_, ':'))
        ));
        assert_eq!(empty, Err(ValueObjectError::RoomNameEmpty));
    }

    #[test]
    fn test_mailbox_address_is_derived_from_client_name() {
        // テスト項目: クライアント名からメールボックスアドレスが決定的に導出される
        // given (前提条件):
        let name = ClientName::new("alice").unwrap();

        // when (操作):
        let address = name.mailbox();

        // then (期待する結果):
        assert_eq!(address.as_str(), "/client_alice");
        assert_eq!(address.client_name(), Some(name));
    }

    #[test]
    fn test_mailbox_address_client_requires_prefix() {
        // テスト項目: `/client_` プレフィックスのないアドレスは拒否される
        // given (前提条件):

        // when (操作):
        let missing_prefix = MailboxAddress::client("/other_alice");
        let empty_name = MailboxAddress::client("/client_");

        // then (期待する結果):
        assert!(matches!(
            missing_prefix,
            Err(ValueObjectError::MailboxAddressPrefix(_))
        ));
        assert_eq!(empty_name, Err(ValueObjectError::ClientNameEmpty));
        assert_eq!(MailboxAddress::server().client_name(), None);
    }

    #[test]
    fn test_timestamp_millis_until() {
        // テスト項目: 2 つのタイムスタンプ間の経過ミリ秒を計算できる
        // given (前提条件):
        let earlier = Timestamp::new(1_000);
        let later = Timestamp::new(31_500);

        // when (操作):
        let elapsed = earlier.millis_until(later);

        // then (期待する結果):
        assert_eq!(elapsed, 30_500);
        assert_eq!(later.millis_until(earlier), -30_500);
    }
}
