//! Wire command grammar (client → server).
//!
//! An envelope is parsed once into a [`Command`]; the dispatcher then matches on
//! it exhaustively.

use std::fmt;

use thiserror::Error;

use super::value_object::{ClientName, MailboxAddress, RoomName};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Register,
    Join,
    Say,
    DirectMessage,
    Who,
    Leave,
    Quit,
    Ping,
}

impl CommandKind {
    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "REGISTER" => Some(Self::Register),
            "JOIN" => Some(Self::Join),
            "SAY" => Some(Self::Say),
            "DM" => Some(Self::DirectMessage),
            "WHO" => Some(Self::Who),
            "LEAVE" => Some(Self::Leave),
            "QUIT" => Some(Self::Quit),
            "PING" => Some(Self::Ping),
            _ => None,
        }
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Register => "REGISTER",
            Self::Join => "JOIN",
            Self::Say => "SAY",
            Self::DirectMessage => "DM",
            Self::Who => "WHO",
            Self::Leave => "LEAVE",
            Self::Quit => "QUIT",
            Self::Ping => "PING",
        }
    }

    pub fn usage(&self) -> &'static str {
        match self {
            Self::Register => "REGISTER:/client_<name>",
            Self::Join => "JOIN:<name>:<room>",
            Self::Say => "SAY:[<name>]: <text>",
            Self::DirectMessage => "DM:<sender>:<target>:<text>",
            Self::Who => "WHO:<name>><room>",
            Self::Leave => "LEAVE:<name>",
            Self::Quit => "QUIT:<name>",
            Self::Ping => "PING:<name>",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Register {
        address: MailboxAddress,
    },
    Join {
        client: ClientName,
        room: RoomName,
    },
    /// `payload` is everything after `SAY:`, sender prefix included.
    Say {
        sender: ClientName,
        payload: String,
    },
    DirectMessage {
        sender: ClientName,
        target: ClientName,
        text: String,
    },
    Who {
        client: ClientName,
        room: RoomName,
    },
    Leave {
        client: ClientName,
    },
    Quit {
        client: ClientName,
    },
    Ping {
        client: ClientName,
    },
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::Register { .. } => CommandKind::Register,
            Self::Join { .. } => CommandKind::Join,
            Self::Say { .. } => CommandKind::Say,
            Self::DirectMessage { .. } => CommandKind::DirectMessage,
            Self::Who { .. } => CommandKind::Who,
            Self::Leave { .. } => CommandKind::Leave,
            Self::Quit { .. } => CommandKind::Quit,
            Self::Ping { .. } => CommandKind::Ping,
        }
    }

    /// Parse one envelope. Trailing NUL / CR / LF are ignored.
    pub fn parse(envelope: &str) -> Result<Self, CommandParseError> {
        let envelope = envelope.trim_end_matches(['\0', '\r', '\n']);
        let (prefix, body) = envelope
            .split_once(':')
            .ok_or_else(|| CommandParseError::UnknownCommand(envelope.to_string()))?;
        let kind = CommandKind::from_prefix(prefix)
            .ok_or_else(|| CommandParseError::UnknownCommand(envelope.to_string()))?;

        match kind {
            CommandKind::Register => {
                let address = MailboxAddress::client(body)
                    .map_err(|e| CommandParseError::malformed(kind, None, e))?;
                Ok(Self::Register { address })
            }
            CommandKind::Join => {
                let (client, room) = body.split_once(':').ok_or_else(|| {
                    CommandParseError::malformed(kind, ClientName::new(body).ok(), "missing ':'")
                })?;
                let client = parse_name(kind, client)?;
                let room = RoomName::new(room.trim_start())
                    .map_err(|e| CommandParseError::malformed(kind, Some(client.clone()), e))?;
                Ok(Self::Join { client, room })
            }
            CommandKind::Say => {
                let sender = body
                    .strip_prefix('[')
                    .and_then(|rest| rest.split_once(']'))
                    .map(|(sender, _)| sender)
                    .ok_or_else(|| CommandParseError::malformed(kind, None, "missing '[<name>]'"))?;
                let sender = parse_name(kind, sender)?;
                Ok(Self::Say {
                    sender,
                    payload: body.to_string(),
                })
            }
            CommandKind::DirectMessage => {
                let (sender, rest) = body.split_once(':').ok_or_else(|| {
                    CommandParseError::malformed(kind, ClientName::new(body).ok(), "missing ':'")
                })?;
                let sender = parse_name(kind, sender)?;
                let (target, text) = rest.split_once(':').ok_or_else(|| {
                    CommandParseError::malformed(kind, Some(sender.clone()), "missing ':'")
                })?;
                let target = ClientName::new(target)
                    .map_err(|e| CommandParseError::malformed(kind, Some(sender.clone()), e))?;
                Ok(Self::DirectMessage {
                    sender,
                    target,
                    text: text.to_string(),
                })
            }
            CommandKind::Who => {
                let (client, room) = body.split_once('>').ok_or_else(|| {
                    CommandParseError::malformed(kind, ClientName::new(body).ok(), "missing '>'")
                })?;
                let client = parse_name(kind, client)?;
                let room = RoomName::new(room)
                    .map_err(|e| CommandParseError::malformed(kind, Some(client.clone()), e))?;
                Ok(Self::Who { client, room })
            }
            CommandKind::Leave => Ok(Self::Leave {
                client: parse_name(kind, body)?,
            }),
            CommandKind::Quit => {
                // QUIT:<name>:<mode>; the mode is accepted and ignored
                let client = body.split_once(':').map_or(body, |(client, _)| client);
                Ok(Self::Quit {
                    client: parse_name(kind, client)?,
                })
            }
            CommandKind::Ping => Ok(Self::Ping {
                client: parse_name(kind, body)?,
            }),
        }
    }
}

fn parse_name(kind: CommandKind, raw: &str) -> Result<ClientName, CommandParseError> {
    ClientName::new(raw).map_err(|e| CommandParseError::malformed(kind, None, e))
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("unknown command: {0:?}")]
    UnknownCommand(String),

    #[error("malformed {kind} command: {reason}")]
    Malformed {
        kind: CommandKind,
        /// Requester to notify, when one could be recovered from the envelope.
        reply_to: Option<ClientName>,
        reason: String,
    },
}

impl CommandParseError {
    fn malformed(kind: CommandKind, reply_to: Option<ClientName>, reason: impl ToString) -> Self {
        Self::Malformed {
            kind,
            reply_to,
            reason: reason.to_string(),
        }
    }

    pub fn reply_to(&self) -> Option<&ClientName> {
        match self {
            Self::UnknownCommand(_) => None,
            Self::Malformed { reply_to, .. } => reply_to.as_ref(),
        }
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

    #[test]
    fn test_parse_register() {
        // テスト項目: REGISTER はアドレスをそのまま保持する
        // given (前提条件):
        let envelope = "REGISTER:/client_alice\0";

        // when (操作):
        let command = Command::parse(envelope);

        // then (期待する結果):
        assert_eq!(
            command,
            Ok(Command::Register {
                address: name("alice").mailbox()
            })
        );
    }

    #[test]
    fn test_parse_join_accepts_space_after_delimiter() {
        // テスト項目: `JOIN:<name>: <room>` 形式（区切り後の空白）も受け付ける
        // given (前提条件):
        let compact = "JOIN:alice:room1";
        let spaced = "JOIN:alice: room1\n";

        // when (操作):
        let compact = Command::parse(compact);
        let spaced = Command::parse(spaced);

        // then (期待する結果):
        let expected = Command::Join {
            client: name("alice"),
            room: room("room1"),
        };
        assert_eq!(compact, Ok(expected.clone()));
        assert_eq!(spaced, Ok(expected));
    }

    #[test]
    fn test_parse_say_extracts_bracketed_sender() {
        // テスト項目: SAY は角括弧内から送信者を取り出し、ペイロード全体を保持する
        // given (前提条件):
        let envelope = "SAY:[bob]: hello: world";

        // when (操作):
        let command = Command::parse(envelope).unwrap();

        // then (期待する結果):
        assert_eq!(
            command,
            Command::Say {
                sender: name("bob"),
                payload: "[bob]: hello: world".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_dm_keeps_colons_in_text() {
        // テスト項目: DM 本文中のコロンはそのまま残る
        // given (前提条件):
        let envelope = "DM:alice:bob:meet at 10:30";

        // when (操作):
        let command = Command::parse(envelope).unwrap();

        // then (期待する結果):
        assert_eq!(
            command,
            Command::DirectMessage {
                sender: name("alice"),
                target: name("bob"),
                text: "meet at 10:30".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_who_and_single_name_commands() {
        // テスト項目: WHO / LEAVE / QUIT / PING を解析できる（QUIT のモードは無視）
        // given (前提条件):

        // when (操作):
        let who = Command::parse("WHO:alice>room9").unwrap();
        let leave = Command::parse("LEAVE:alice").unwrap();
        let quit = Command::parse("QUIT:alice:force").unwrap();
        let ping = Command::parse("PING:alice").unwrap();

        // then (期待する結果):
        assert_eq!(
            who,
            Command::Who {
                client: name("alice"),
                room: room("room9")
            }
        );
        assert_eq!(leave.kind(), CommandKind::Leave);
        assert_eq!(
            quit,
            Command::Quit {
                client: name("alice")
            }
        );
        assert_eq!(ping.kind(), CommandKind::Ping);
    }

    #[test]
    fn test_parse_unknown_prefix() {
        // テスト項目: 未知のプレフィックスは UnknownCommand
        // given (前提条件):

        // when (操作):
        let unknown = Command::parse("SHOUT:alice");
        let no_delimiter = Command::parse("hello");

        // then (期待する結果):
        assert_eq!(
            unknown,
            Err(CommandParseError::UnknownCommand("SHOUT:alice".to_string()))
        );
        assert!(matches!(
            no_delimiter,
            Err(CommandParseError::UnknownCommand(_))
        ));
    }

    #[test]
    fn test_malformed_dm_replies_to_sender() {
        // テスト項目: 区切りの足りない DM は送信者を返信先として保持する
        // given (前提条件):
        let envelope = "DM:alice:bob";

        // when (操作):
        let error = Command::parse(envelope).unwrap_err();

        // then (期待する結果):
        assert_eq!(error.reply_to(), Some(&name("alice")));
        assert!(matches!(
            error,
            CommandParseError::Malformed {
                kind: CommandKind::DirectMessage,
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_join_and_who_reply_to_requester() {
        // テスト項目: JOIN / WHO の形式エラーも DM と同じく要求者に返信できる
        // given (前提条件):

        // when (操作):
        let join = Command::parse("JOIN:alice").unwrap_err();
        let who = Command::parse("WHO:alice>").unwrap_err();
        let who_no_delimiter = Command::parse("WHO:alice").unwrap_err();

        // then (期待する結果):
        assert_eq!(join.reply_to(), Some(&name("alice")));
        assert_eq!(who.reply_to(), Some(&name("alice")));
        assert_eq!(who_no_delimiter.reply_to(), Some(&name("alice")));
    }

    #[test]
    fn test_malformed_without_recoverable_requester() {
        // テスト項目: 要求者を特定できない形式エラーは返信先なし
        // given (前提条件):

        // when (操作):
        let say = Command::parse("SAY:no brackets").unwrap_err();
        let register = Command::parse("REGISTER:/server").unwrap_err();
        let ping = Command::parse("PING:").unwrap_err();

        // then (期待する結果):
        assert_eq!(say.reply_to(), None);
        assert_eq!(register.reply_to(), None);
        assert_eq!(ping.reply_to(), None);
    }
}
