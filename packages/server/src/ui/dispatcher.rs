//! Protocol dispatcher.
//!
//! Consumes envelopes from the server mailbox one at a time, parses each into a
//! [`Command`] and runs the matching use case. Nothing here waits on fan-out:
//! broadcasts go to the task queue and only DM / WHO / error replies are sent
//! point-to-point.

use std::sync::Arc;

use chatrelay_shared::time::Clock;
use tokio_util::sync::CancellationToken;

use crate::{
    domain::{
        BroadcastPublisher, Command, CommandKind, CommandParseError, HeartbeatRepository, Mailbox,
        MailboxTransport, RoomRepository, reply,
    },
    usecase::{
        DirectMessageUseCase, DisconnectClientUseCase, JoinRoomUseCase, LeaveRoomUseCase,
        ListMembersUseCase, NotifyClientUseCase, RecordHeartbeatUseCase, RegisterClientUseCase,
        SendMessageUseCase,
    },
};

pub struct Dispatcher {
    register_client: RegisterClientUseCase,
    join_room: JoinRoomUseCase,
    send_message: SendMessageUseCase,
    direct_message: DirectMessageUseCase,
    list_members: ListMembersUseCase,
    leave_room: LeaveRoomUseCase,
    disconnect_client: Arc<DisconnectClientUseCase>,
    record_heartbeat: RecordHeartbeatUseCase,
    notify_client: NotifyClientUseCase,
    max_message_size: usize,
}

impl Dispatcher {
    /// Wire every use case to the shared collaborators.
    ///
    /// `disconnect_client` is shared with the heartbeat monitor.
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        heartbeat: Arc<dyn HeartbeatRepository>,
        publisher: Arc<dyn BroadcastPublisher>,
        transport: Arc<dyn MailboxTransport>,
        clock: Arc<dyn Clock>,
        disconnect_client: Arc<DisconnectClientUseCase>,
        max_message_size: usize,
    ) -> Self {
        Self {
            register_client: RegisterClientUseCase::new(
                repository.clone(),
                heartbeat.clone(),
                clock.clone(),
            ),
            join_room: JoinRoomUseCase::new(repository.clone(), publisher.clone()),
            send_message: SendMessageUseCase::new(publisher.clone()),
            direct_message: DirectMessageUseCase::new(repository.clone(), transport.clone()),
            list_members: ListMembersUseCase::new(repository.clone(), transport.clone()),
            leave_room: LeaveRoomUseCase::new(repository, publisher),
            disconnect_client,
            record_heartbeat: RecordHeartbeatUseCase::new(heartbeat, clock),
            notify_client: NotifyClientUseCase::new(transport),
            max_message_size,
        }
    }

    /// Handle one envelope. Returns the kind of command that was executed, or
    /// `None` if the envelope was dropped.
    pub async fn dispatch(&self, envelope: &str) -> Option<CommandKind> {
        if envelope.len() + 1 > self.max_message_size {
            tracing::warn!(
                "Dropping oversized envelope ({} bytes, max {})",
                envelope.len() + 1,
                self.max_message_size
            );
            return None;
        }

        let command = match Command::parse(envelope) {
            Ok(command) => command,
            Err(CommandParseError::UnknownCommand(raw)) => {
                tracing::warn!("Unknown command: {:?}", raw);
                return None;
            }
            Err(e) => {
                self.reject_malformed(&e).await;
                return None;
            }
        };

        let kind = command.kind();
        match command {
            Command::Register { address } => {
                if let Err(e) = self.register_client.execute(address).await {
                    tracing::warn!("REGISTER failed: {}", e);
                }
            }
            Command::Join { client, room } => {
                if let Err(e) = self.join_room.execute(client, room).await {
                    tracing::warn!("Join notice dropped: {}", e);
                }
            }
            Command::Say { sender, payload } => {
                if let Err(e) = self.send_message.execute(sender, payload).await {
                    tracing::warn!("Message dropped: {}", e);
                }
            }
            Command::DirectMessage {
                sender,
                target,
                text,
            } => {
                self.direct_message.execute(&sender, &target, &text).await;
            }
            Command::Who { client, room } => {
                if let Err(e) = self.list_members.execute(&client, &room).await {
                    tracing::debug!("WHO reply to '{}' dropped: {}", client, e);
                }
            }
            Command::Leave { client } => {
                if let Err(e) = self.leave_room.execute(&client).await {
                    tracing::warn!("Leave notice dropped: {}", e);
                }
            }
            Command::Quit { client } => {
                self.disconnect_client.execute(&client).await;
            }
            Command::Ping { client } => {
                self.record_heartbeat.execute(client).await;
            }
        }
        Some(kind)
    }

    /// Serve the server mailbox until `token` is cancelled or the mailbox closes.
    pub async fn run(&self, mut mailbox: Box<dyn Mailbox>, token: CancellationToken) {
        tracing::info!("Dispatcher listening on {}", mailbox.address());
        loop {
            let envelope = tokio::select! {
                _ = token.cancelled() => break,
                envelope = mailbox.recv() => match envelope {
                    Some(envelope) => envelope,
                    None => {
                        tracing::warn!("Server mailbox closed");
                        break;
                    }
                },
            };
            tracing::debug!("Received: {:?}", envelope);

            tokio::select! {
                _ = token.cancelled() => break,
                _ = self.dispatch(&envelope) => {}
            }
        }
        tracing::info!("Dispatcher stopped");
    }

    async fn reject_malformed(&self, error: &CommandParseError) {
        let CommandParseError::Malformed { kind, .. } = error else {
            return;
        };
        let Some(client) = error.reply_to() else {
            tracing::warn!("Dropping envelope: {}", error);
            return;
        };
        tracing::warn!("Rejecting envelope from '{}': {}", client, error);
        if let Err(e) = self
            .notify_client
            .execute(client, &reply::malformed_command(*kind))
            .await
        {
            tracing::debug!("Could not notify '{}': {}", client, e);
        }
    }
}
