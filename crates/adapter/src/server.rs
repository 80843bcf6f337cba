//! TCP server for trainer sessions
//!
//! Accepts connections and runs one [`Session`] per connection in its own
//! task. Uses tokio for async networking.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

use crate::protocol::ServerMessage;
use crate::session::Session;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 7878;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Base seed; connection `n` plays seed `base + n` unless hello names one
    pub seed: Option<u32>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            seed: None,
        }
    }
}

impl ServerConfig {
    /// Create from `OBSERIS_HOST`, `OBSERIS_PORT` and `OBSERIS_SEED`
    pub fn from_env() -> Self {
        use std::env;

        let host = env::var("OBSERIS_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = env::var("OBSERIS_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let seed = env::var("OBSERIS_SEED")
            .ok()
            .and_then(|s| s.trim().parse().ok());

        Self { host, port, seed }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid socket address {}:{}", self.host, self.port))
    }

    /// Check if the server is disabled via environment
    pub fn is_disabled() -> bool {
        std::env::var("OBSERIS_DISABLED")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false)
    }
}

/// Start the TCP server and serve until the listener fails
pub async fn run_server(
    config: ServerConfig,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    let bound = listener.local_addr()?;
    println!("[Adapter] TCP server listening on {}", bound);
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let mut session_counter = 0u64;

    loop {
        let (socket, peer) = listener.accept().await?;
        session_counter += 1;
        let session_id = session_counter;
        let base_seed = config.seed;

        println!("[Adapter] Client {} connected from {}", session_id, peer);

        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, session_id, base_seed).await {
                eprintln!("[Adapter] Client {} error: {}", session_id, e);
            }
            println!("[Adapter] Client {} disconnected", session_id);
        });
    }
}

/// Serve one connection: read lines, answer each with exactly one line
async fn handle_client(
    socket: TcpStream,
    session_id: u64,
    base_seed: Option<u32>,
) -> anyhow::Result<()> {
    let (reader, mut writer) = tokio::io::split(socket);
    let mut lines = BufReader::new(reader).lines();
    let mut session = Session::new(session_id, base_seed);
    let mut buf: Vec<u8> = Vec::with_capacity(4096);

    while let Some(line) = lines.next_line().await? {
        let Some(reply) = session.handle_line(&line) else {
            continue;
        };
        if let ServerMessage::Welcome(w) = &reply {
            println!(
                "[Adapter] Client {} handshake ok (seed {})",
                session_id, w.seed
            );
        }

        buf.clear();
        serde_json::to_writer(&mut buf, &reply)?;
        buf.push(b'\n');
        writer.write_all(&buf).await?;
        writer.flush().await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 7878);
        assert_eq!(
            config.socket_addr().unwrap(),
            "127.0.0.1:7878".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_bad_host_is_an_error() {
        let config = ServerConfig {
            host: "not a host".to_string(),
            ..ServerConfig::default()
        };
        assert!(config.socket_addr().is_err());
    }
}
