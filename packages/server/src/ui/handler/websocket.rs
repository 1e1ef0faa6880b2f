//! WebSocket gateway.
//!
//! One socket per client. The gateway owns the client's mailbox while the
//! socket is open: inbound text frames are forwarded verbatim to the server
//! mailbox, and everything delivered to the client mailbox is written back as a
//! text frame. Closing the socket unlinks the mailbox but does not quit the
//! client; a silent client is reclaimed by the heartbeat monitor.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{
    domain::{ClientName, Mailbox, MailboxAddress, TransportError},
    ui::state::AppState,
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub client: String,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    // Convert String -> ClientName (Domain Model)
    let client = match ClientName::new(query.client.clone()) {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!("Invalid client name '{}': {}", query.client, e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    let mailbox = match state
        .transport
        .open(&client.mailbox(), state.client_mailbox_capacity)
        .await
    {
        Ok(mailbox) => mailbox,
        Err(TransportError::AddressInUse(address)) => {
            tracing::warn!(
                "Mailbox '{}' is already in use. Rejecting connection.",
                address
            );
            return Err(StatusCode::CONFLICT);
        }
        Err(e) => {
            tracing::error!("Failed to open mailbox for '{}': {}", client, e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let connection_id = Uuid::new_v4();
    tracing::info!("Client '{}' connected (connection {})", client, connection_id);
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, client, mailbox, connection_id)))
}

/// Spawns a task that drains the client mailbox into the WebSocket sink.
///
/// Uses a bounded receive so that shutdown is noticed even when nothing arrives.
fn pusher_loop(
    mut mailbox: Box<dyn Mailbox>,
    mut sender: SplitSink<WebSocket, Message>,
    poll_interval: Duration,
    shutdown: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while !shutdown.is_cancelled() {
            match mailbox.recv_timeout(poll_interval).await {
                Ok(payload) => {
                    if sender.send(Message::Text(payload.into())).await.is_err() {
                        break;
                    }
                }
                Err(TransportError::Timeout) => continue,
                Err(e) => {
                    tracing::debug!("Mailbox {} stopped: {}", mailbox.address(), e);
                    break;
                }
            }
        }
        let _ = sender.send(Message::Close(None)).await;
    })
}

/// Spawns a task that forwards inbound text frames to the server mailbox.
fn forward_loop(
    mut receiver: SplitStream<WebSocket>,
    state: Arc<AppState>,
    client: ClientName,
    connection_id: Uuid,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let server = MailboxAddress::server();
        loop {
            let message = tokio::select! {
                _ = state.shutdown.cancelled() => break,
                message = receiver.next() => message,
            };
            let message = match message {
                Some(Ok(message)) => message,
                Some(Err(e)) => {
                    tracing::warn!("WebSocket error on connection {}: {}", connection_id, e);
                    break;
                }
                None => break,
            };

            match message {
                Message::Text(text) => {
                    let envelope = text.as_str().trim_end_matches(['\0', '\r', '\n']);
                    if envelope.is_empty() {
                        continue;
                    }
                    match state.transport.send(&server, envelope).await {
                        Ok(()) => {}
                        Err(e @ TransportError::MessageTooLarge { .. }) => {
                            tracing::warn!("Dropping frame from '{}': {}", client, e);
                        }
                        Err(e) => {
                            tracing::warn!("Relay unavailable for '{}': {}", client, e);
                            break;
                        }
                    }
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", client);
                    break;
                }
                _ => {}
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    client: ClientName,
    mailbox: Box<dyn Mailbox>,
    connection_id: Uuid,
) {
    let (sender, receiver) = socket.split();
    let mailbox_id = mailbox.id();

    let mut send_task = pusher_loop(
        mailbox,
        sender,
        state.poll_interval,
        state.shutdown.clone(),
    );
    let mut recv_task = forward_loop(receiver, state.clone(), client.clone(), connection_id);

    tokio::select! {
        _ = &mut recv_task => {}
        _ = &mut send_task => {}
    };

    // release before the pusher drops its receiver
    state.transport.release(&client.mailbox(), mailbox_id).await;
    send_task.abort();
    recv_task.abort();
    tracing::info!(
        "Client '{}' disconnected (connection {})",
        client,
        connection_id
    );
}
