use std::path::Path;
use std::sync::Arc;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter, Lines, WriteHalf,
};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{broadcast, mpsc};

use super::protocol::{JsonRpcError, Notification, Request, RequestId, Response};
use crate::api::ApiHandler;

#[derive(Debug, thiserror::Error)]
pub enum IpcServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Connection closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, IpcServerError>;

type Writer = BufWriter<WriteHalf<UnixStream>>;

/// Newline-delimited JSON-RPC over a Unix socket. Each connection is served by
/// its own task, so invocations from different clients run concurrently.
pub struct IpcServer {
    socket_path: String,
    api_handler: Arc<ApiHandler>,
}

impl IpcServer {
    pub fn new(socket_path: String, api_handler: Arc<ApiHandler>) -> Self {
        Self {
            socket_path,
            api_handler,
        }
    }

    pub async fn start(self: Arc<Self>) -> Result<()> {
        let path = Path::new(&self.socket_path);
        if path.exists() {
            std::fs::remove_file(path)?;
        }

        let listener = UnixListener::bind(&self.socket_path)?;
        tracing::info!("IPC server listening on {}", self.socket_path);

        loop {
            match listener.accept().await {
                Ok((stream, _addr)) => {
                    let server = self.clone();
                    tokio::spawn(async move {
                        if let Err(e) = server.handle_connection(stream).await {
                            tracing::error!("Connection error: {}", e);
                        }
                    });
                }
                Err(e) => {
                    tracing::error!("Failed to accept connection: {}", e);
                }
            }
        }
    }

    async fn handle_connection(&self, stream: UnixStream) -> Result<()> {
        tracing::debug!("New client connected");

        let (read_half, write_half) = tokio::io::split(stream);
        let mut lines = BufReader::new(read_half).lines();
        let mut writer = BufWriter::new(write_half);

        let mut event_rx = self.api_handler.subscribe_events();

        let (notif_tx, mut notif_rx) = mpsc::channel::<Notification>(100);
        tokio::spawn(async move {
            loop {
                let event = match event_rx.recv().await {
                    Ok(event) => event,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!("IPC: client lagging, dropped {} events", skipped);
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };

                let notification = match Notification::from_event(&event) {
                    Ok(notification) => notification,
                    Err(e) => {
                        tracing::warn!("IPC: failed to encode event: {}", e);
                        continue;
                    }
                };

                if notif_tx.send(notification).await.is_err() {
                    tracing::debug!("IPC: event forwarder stopping - client disconnected");
                    break;
                }
            }
        });

        loop {
            tokio::select! {
                result = Self::read_line_from(&mut lines) => {
                    match result {
                        Ok(line) => {
                            let response = self.handle_line(&line).await;
                            if let Err(e) = Self::write_json_to(&mut writer, &response).await {
                                tracing::error!("Failed to write response: {}", e);
                                break;
                            }
                        }
                        Err(IpcServerError::Closed) => {
                            tracing::debug!("Client disconnected");
                            break;
                        }
                        Err(e) => {
                            tracing::error!("Failed to read request: {}", e);
                            break;
                        }
                    }
                }
                Some(notification) = notif_rx.recv() => {
                    tracing::debug!("IPC: sending notification {}", notification.method);
                    if let Err(e) = Self::write_json_to(&mut writer, &notification).await {
                        tracing::warn!("Failed to send notification: {}", e);
                        break;
                    }
                }
            }
        }

        Ok(())
    }

    /// Next non-blank line. Blank lines are keepalives. Cancel safe, so it
    /// can sit in a `select!` next to the notification channel.
    async fn read_line_from<R>(lines: &mut Lines<R>) -> Result<String>
    where
        R: AsyncBufRead + Unpin,
    {
        loop {
            match lines.next_line().await? {
                None => return Err(IpcServerError::Closed),
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => return Ok(line),
            }
        }
    }

    async fn write_json_to<T: serde::Serialize>(writer: &mut Writer, message: &T) -> Result<()> {
        let json = serde_json::to_string(message)?;
        writer.write_all(json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
        Ok(())
    }

    async fn handle_line(&self, line: &str) -> Response {
        match serde_json::from_str::<Request>(line.trim()) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => Response::error(JsonRpcError::parse_error(e.to_string()), RequestId::Null),
        }
    }

    async fn handle_request(&self, request: Request) -> Response {
        if let Err(error) = request.validate() {
            return Response::error(error, request.id);
        }

        tracing::debug!("handler: received request: {}", request.method);

        match self
            .api_handler
            .handle(&request.method, request.params)
            .await
        {
            Ok(result) => Response::success(result, request.id),
            Err(error) => {
                tracing::debug!("handler: {} failed: {}", request.method, error);
                Response::error(error.into(), request.id)
            }
        }
    }
}
