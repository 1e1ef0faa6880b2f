//! Server → client payloads that are sent point-to-point rather than broadcast.

use super::{
    command::CommandKind,
    value_object::{ClientName, RoomName},
};

/// `[DM from <sender>]: <text>`
pub fn direct_message(sender: &ClientName, text: &str) -> String {
    format!("[DM from {}]: {}", sender, text)
}

/// `[Server]: user '<target>' not found.`
pub fn user_not_found(target: &ClientName) -> String {
    format!("[Server]: user '{}' not found.", target)
}

/// `[Server]: message to '<target>' is too large (<size> > <max> bytes).`
pub fn message_too_large(target: &ClientName, size: usize, max: usize) -> String {
    format!(
        "[Server]: message to '{}' is too large ({} > {} bytes).",
        target, size, max
    )
}

/// `[Members in #<room>]: a, b, c` or `(empty)`.
pub fn member_list(room: &RoomName, members: &[ClientName]) -> String {
    let listing = if members.is_empty() {
        "(empty)".to_string()
    } else {
        members
            .iter()
            .map(ClientName::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!("[Members in #{}]: {}", room, listing)
}

/// `[Server]: malformed <CMD> command. Usage: <usage>`
pub fn malformed_command(kind: CommandKind) -> String {
    format!(
        "[Server]: malformed {} command. Usage: {}",
        kind,
        kind.usage()
    )
}
