//! Jiraa Client Library
//!
//! Talks to the Jiraa daemon over its Unix socket.

pub mod protocol;

use anyhow::Result;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter, WriteHalf};
use tokio::net::UnixStream;
use tokio::sync::{mpsc, Mutex, RwLock};

pub use protocol::{Incoming, Notification, Request, RequestId, Response, ResponseError};

/// Method name of the room message broadcast.
pub const ROOM_MESSAGE_METHOD: &str = "chat.room_message";

#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("Already subscribed to notifications")]
    AlreadySubscribed,

    #[error("Connection closed before a response arrived")]
    NoResponse,

    #[error("RPC error {code}: {message}")]
    Rpc { code: i32, message: String },
}

impl From<ResponseError> for ConnectionError {
    fn from(error: ResponseError) -> Self {
        ConnectionError::Rpc {
            code: error.code,
            message: error.message,
        }
    }
}

type PendingResponses = Arc<RwLock<HashMap<i64, mpsc::Sender<Response>>>>;

struct PersistentConnection {
    writer: Arc<Mutex<BufWriter<WriteHalf<UnixStream>>>>,
    pending_responses: PendingResponses,
}

/// Jiraa daemon client
pub struct JiraaClient {
    socket_path: String,
    request_counter: AtomicI64,
    persistent_conn: Arc<Mutex<Option<PersistentConnection>>>,
}

impl JiraaClient {
    pub fn new(socket_path: impl Into<String>) -> Self {
        Self {
            socket_path: socket_path.into(),
            request_counter: AtomicI64::new(1),
            persistent_conn: Arc::new(Mutex::new(None)),
        }
    }

    /// Opens a persistent connection. Room messages posted by any client are
    /// delivered on the returned receiver; later calls reuse the connection.
    pub async fn subscribe_notifications(&self) -> Result<mpsc::Receiver<Notification>> {
        let mut conn_lock = self.persistent_conn.lock().await;

        if conn_lock.is_some() {
            return Err(ConnectionError::AlreadySubscribed.into());
        }

        let stream = self.connect().await?;
        let (read_half, write_half) = tokio::io::split(stream);
        let writer = Arc::new(Mutex::new(BufWriter::new(write_half)));

        let (notif_tx, notif_rx) = mpsc::channel::<Notification>(100);
        let pending_responses: PendingResponses = Arc::new(RwLock::new(HashMap::new()));

        let pending = pending_responses.clone();
        tokio::spawn(async move {
            let mut reader = BufReader::new(read_half);
            let mut line = String::new();

            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => break,
                    Err(e) => {
                        tracing::debug!("client: read failed: {}", e);
                        break;
                    }
                    Ok(_) => match Incoming::parse(&line) {
                        Ok(Incoming::Notification(notification)) => {
                            let _ = notif_tx.send(notification).await;
                        }
                        Ok(Incoming::Response(response)) => {
                            if let RequestId::Number(id) = response.id {
                                if let Some(tx) = pending.read().await.get(&id) {
                                    let _ = tx.send(response).await;
                                }
                            }
                        }
                        Err(e) => tracing::warn!("client: unreadable line: {}", e),
                    },
                }
            }

            // Dropping the senders wakes any caller still waiting.
            pending.write().await.clear();
        });

        *conn_lock = Some(PersistentConnection {
            writer,
            pending_responses,
        });

        Ok(notif_rx)
    }

    async fn call_persistent(&self, method: &str, params: Option<Value>) -> Result<Value> {
        let conn = {
            let conn_lock = self.persistent_conn.lock().await;
            conn_lock
                .as_ref()
                .map(|c| (c.writer.clone(), c.pending_responses.clone()))
        };

        let Some((writer, pending_responses)) = conn else {
            return self.call_oneshot(method, params).await;
        };

        let request_id = self.next_id();
        let request = Request::new(method, params, RequestId::Number(request_id));

        let (tx, mut rx) = mpsc::channel::<Response>(1);
        pending_responses.write().await.insert(request_id, tx);

        {
            let mut writer = writer.lock().await;
            let request_json = serde_json::to_string(&request)?;
            writer.write_all(request_json.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }

        let response = rx.recv().await;
        pending_responses.write().await.remove(&request_id);

        Self::into_result(response.ok_or(ConnectionError::NoResponse)?)
    }

    async fn call_oneshot(&self, method: &str, params: Option<Value>) -> Result<Value> {
        let mut stream = self.connect().await?;
        let request = Request::new(method, params, RequestId::Number(self.next_id()));

        let request_json = serde_json::to_string(&request)?;
        stream.write_all(request_json.as_bytes()).await?;
        stream.write_all(b"\n").await?;
        stream.flush().await?;

        // The daemon pushes broadcasts on every connection; skip them.
        let mut reader = BufReader::new(stream);
        let mut line = String::new();
        loop {
            line.clear();
            if reader.read_line(&mut line).await? == 0 {
                return Err(ConnectionError::NoResponse.into());
            }
            match Incoming::parse(&line)? {
                Incoming::Response(response) => return Self::into_result(response),
                Incoming::Notification(n) => tracing::trace!("client: skipping {}", n.method),
            }
        }
    }

    fn into_result(response: Response) -> Result<Value> {
        if let Some(error) = response.error {
            return Err(ConnectionError::from(error).into());
        }
        Ok(response.result.unwrap_or(Value::Null))
    }

    async fn connect(&self) -> Result<UnixStream> {
        Ok(UnixStream::connect(&self.socket_path).await?)
    }

    fn next_id(&self) -> i64 {
        self.request_counter.fetch_add(1, Ordering::SeqCst)
    }

    /// Send a request. Uses the persistent connection when one is open.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value> {
        self.call_persistent(method, params).await
    }

    // Command methods

    /// Invoke `/jiraa` as `sender` in `room_id`. Returns `{ outcome, delivery }`.
    pub async fn command_execute(
        &self,
        sender: &str,
        room_id: &str,
        arguments: &[String],
    ) -> Result<Value> {
        self.call(
            "command.execute",
            Some(json!({
                "sender": sender,
                "room_id": room_id,
                "arguments": arguments,
            })),
        )
        .await
    }

    pub async fn command_describe(&self) -> Result<Value> {
        self.call("command.describe", None).await
    }

    // Settings methods

    pub async fn settings_definitions(&self) -> Result<Value> {
        self.call("settings.definitions", None).await
    }

    /// Current values; the token comes back masked.
    pub async fn settings_get(&self) -> Result<Value> {
        self.call("settings.get", None).await
    }

    pub async fn settings_set(&self, id: &str, value: &str) -> Result<Value> {
        self.call(
            "settings.set",
            Some(json!({
                "id": id,
                "value": value,
            })),
        )
        .await
    }

    pub async fn settings_reset(&self) -> Result<Value> {
        self.call("settings.reset", None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::net::UnixListener;

    /// Answers one request per connection with `result: {"echo": method}`.
    async fn echo_server(path: std::path::PathBuf) {
        let listener = UnixListener::bind(path).unwrap();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let (read_half, mut write_half) = tokio::io::split(stream);
                    let mut reader = BufReader::new(read_half);
                    let mut line = String::new();
                    while reader.read_line(&mut line).await.unwrap_or(0) > 0 {
                        let request: Value = serde_json::from_str(&line).unwrap();
                        let reply = if request["method"] == "boom" {
                            json!({"jsonrpc": "2.0", "error": {"code": -32601, "message": "Method not found: boom"}, "id": request["id"]})
                        } else {
                            json!({"jsonrpc": "2.0", "result": {"echo": request["method"], "params": request["params"]}, "id": request["id"]})
                        };
                        let mut out = serde_json::to_string(&reply).unwrap();
                        out.push('\n');
                        write_half.write_all(out.as_bytes()).await.unwrap();
                        line.clear();
                    }
                });
            }
        });
    }

    #[tokio::test]
    async fn test_oneshot_call() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("client.sock");
        echo_server(path.clone()).await;

        let client = JiraaClient::new(path.to_str().unwrap());
        let result = client
            .command_execute("alice", "GENERAL", &["PROJ-1".to_string()])
            .await
            .unwrap();

        assert_eq!(result["echo"], "command.execute");
        assert_eq!(result["params"]["arguments"][0], "PROJ-1");
    }

    #[tokio::test]
    async fn test_persistent_call() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("client.sock");
        echo_server(path.clone()).await;

        let client = JiraaClient::new(path.to_str().unwrap());
        let _rx = client.subscribe_notifications().await.unwrap();

        let result = client.settings_set("jiraalt_url", "https://x").await.unwrap();
        assert_eq!(result["params"]["id"], "jiraalt_url");

        let err = client.subscribe_notifications().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConnectionError>(),
            Some(ConnectionError::AlreadySubscribed)
        ));
    }

    #[tokio::test]
    async fn test_rpc_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("client.sock");
        echo_server(path.clone()).await;

        let client = JiraaClient::new(path.to_str().unwrap());
        let err = client.call("boom", None).await.unwrap_err();
        match err.downcast_ref::<ConnectionError>() {
            Some(ConnectionError::Rpc { code, .. }) => assert_eq!(*code, -32601),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connect_failure() {
        let temp_dir = TempDir::new().unwrap();
        let client = JiraaClient::new(temp_dir.path().join("nobody.sock").to_str().unwrap());
        assert!(client.command_describe().await.is_err());
    }
}
