//! Reference agent server
//!
//! A TCP server speaking the move-delegation protocol, answering each
//! snapshot request with the local planner. Lets the remote control path be
//! exercised end-to-end without an external implementation. Uses tokio for
//! the listener and per-client tasks.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

use crate::agent::protocol::{encode_line, MoveRequest, MoveResponse};
use crate::ai::heuristic::Weights;
use crate::ai::planner::plan_move;
use crate::types::LOOKAHEAD_DISCOUNT;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    pub host: String,
    pub port: u16,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7878,
        }
    }
}

impl AgentConfig {
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();
        let host = env::var("GRIDFALL_AGENT_HOST").unwrap_or(defaults.host);
        let port = env::var("GRIDFALL_AGENT_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);

        Self { host, port }
    }
}

/// Run the agent server. Sends the bound address through `ready_tx` once
/// listening (port 0 picks a free port; tests rely on this).
pub async fn run_agent(
    config: AgentConfig,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("binding {}:{}", config.host, config.port))?;
    let bound = listener.local_addr()?;
    println!("[agent] listening on {}", bound);
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    loop {
        let (socket, addr) = listener.accept().await?;
        println!("[agent] client connected from {}", addr);
        tokio::spawn(async move {
            if let Err(e) = handle_client(socket).await {
                eprintln!("[agent] client {} error: {}", addr, e);
            }
            println!("[agent] client {} disconnected", addr);
        });
    }
}

/// Serve one client: one planner answer per request line. A malformed line
/// is a protocol error; the connection is dropped and the peer may retry.
async fn handle_client(socket: TcpStream) -> anyhow::Result<()> {
    let (reader, mut writer) = socket.into_split();
    let mut reader = BufReader::new(reader);
    let weights = Weights::default();
    let mut line = String::new();

    loop {
        line.clear();
        let bytes = reader.read_line(&mut line).await?;
        if bytes == 0 {
            return Ok(());
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let request: MoveRequest =
            serde_json::from_str(trimmed).context("malformed move request")?;
        let snapshot = request.into_snapshot();

        // An unplaceable snapshot should not occur from a live game; answer
        // neutrally and let the core's clamping cope.
        let response = match plan_move(&snapshot, &weights, LOOKAHEAD_DISCOUNT) {
            Some(plan) => MoveResponse {
                op_x: i64::from(plan.target_col),
                op_rotate: i64::from(plan.rotations),
            },
            None => MoveResponse {
                op_x: 0,
                op_rotate: 0,
            },
        };

        let out = encode_line(&response)?;
        writer.write_all(out.as_bytes()).await?;
        writer.flush().await?;
    }
}
