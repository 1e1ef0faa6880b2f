//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use super::{
    handler::{get_room_detail, get_rooms, health_check, websocket_handler},
    relay::RelayHandle,
    signal::shutdown_signal,
    state::AppState,
};

pub type ServerError = Box<dyn std::error::Error + Send + Sync>;

/// WebSocket gateway in front of a running relay
///
/// # Example
///
/// ```ignore
/// let relay = Relay::new(config, transport, clock).start().await?;
/// Server::new(relay).run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    relay: RelayHandle,
}

impl Server {
    pub fn new(relay: RelayHandle) -> Self {
        Self { relay }
    }

    /// Run the server until Ctrl+C / SIGTERM
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), ServerError> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;
        tracing::info!("Connect to: ws://{}/ws?client=<name>", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `signal` resolves, then stop
    /// the relay.
    pub async fn serve(
        self,
        listener: TcpListener,
        signal: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let shutdown = CancellationToken::new();
        let config = self.relay.config();
        let app_state = Arc::new(AppState {
            repository: self.relay.repository(),
            heartbeat: self.relay.heartbeat(),
            transport: self.relay.transport(),
            client_mailbox_capacity: config.client_mailbox_capacity,
            poll_interval: config.poll_interval,
            shutdown: shutdown.clone(),
        });

        // Define handlers
        let app = Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .route("/api/rooms/{room}", get(get_room_detail))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        tracing::info!("Chat relay listening on {}", listener.local_addr()?);

        let signal_shutdown = shutdown.clone();
        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                signal.await;
                signal_shutdown.cancel();
            })
            .await;

        // also reached when serving failed
        shutdown.cancel();
        self.relay.shutdown().await;
        tracing::info!("Server shutdown complete");

        result?;
        Ok(())
    }
}
