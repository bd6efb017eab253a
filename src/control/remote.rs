//! Remote agent client
//!
//! Delegates move selection to an external process over TCP, one
//! line-delimited JSON request/response pair per piece. The socket lives on
//! a worker thread so a slow or wedged agent never blocks the tick loop;
//! failures come back as error replies and the connection is re-established
//! opportunistically on the next request, never inside a tick.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use crate::agent::protocol::{encode_line, resolve_response, MoveRequest, MoveResponse};
use crate::control::{MoveSource, PlanError, PlanReply};
use crate::core::PlannerSnapshot;
use crate::types::MovePlan;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7878,
        }
    }
}

impl RemoteConfig {
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

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

struct AgentConn {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

impl AgentConn {
    fn connect(config: &RemoteConfig) -> Result<Self, PlanError> {
        let stream =
            TcpStream::connect(config.addr()).map_err(|e| PlanError::AgentIo(e.to_string()))?;
        let reader_stream = stream
            .try_clone()
            .map_err(|e| PlanError::AgentIo(e.to_string()))?;
        Ok(Self {
            reader: BufReader::new(reader_stream),
            writer: stream,
        })
    }

    /// One request/response round trip.
    fn exchange(&mut self, snapshot: &PlannerSnapshot) -> Result<MovePlan, PlanError> {
        let request = MoveRequest::from_snapshot(snapshot);
        let line = encode_line(&request).map_err(|e| PlanError::AgentProtocol(e.to_string()))?;
        self.writer
            .write_all(line.as_bytes())
            .map_err(|e| PlanError::AgentIo(e.to_string()))?;

        let mut response_line = String::new();
        let bytes = self
            .reader
            .read_line(&mut response_line)
            .map_err(|e| PlanError::AgentIo(e.to_string()))?;
        if bytes == 0 {
            return Err(PlanError::AgentIo("agent closed the connection".to_string()));
        }

        let response: MoveResponse = serde_json::from_str(response_line.trim())
            .map_err(|e| PlanError::AgentProtocol(e.to_string()))?;

        Ok(resolve_response(&response, snapshot.width, &snapshot.current))
    }
}

pub struct RemoteControl {
    request_tx: Sender<PlannerSnapshot>,
    reply_rx: Receiver<PlanReply>,
    pending: Option<u32>,
    _worker: thread::JoinHandle<()>,
}

impl RemoteControl {
    /// Create the client. No connection is made until the first request, and
    /// a dropped connection is retried on the next one.
    pub fn new(config: RemoteConfig) -> Self {
        let (request_tx, request_rx) = mpsc::channel::<PlannerSnapshot>();
        let (reply_tx, reply_rx) = mpsc::channel::<PlanReply>();

        let worker = thread::spawn(move || {
            let mut conn: Option<AgentConn> = None;

            while let Ok(snapshot) = request_rx.recv() {
                let piece_id = snapshot.piece_id;

                if conn.is_none() {
                    match AgentConn::connect(&config) {
                        Ok(c) => conn = Some(c),
                        Err(err) => {
                            if reply_tx
                                .send(PlanReply {
                                    piece_id,
                                    result: Err(err),
                                })
                                .is_err()
                            {
                                break;
                            }
                            continue;
                        }
                    }
                }

                let result = match conn.as_mut() {
                    Some(c) => c.exchange(&snapshot),
                    None => Err(PlanError::AgentIo("not connected".to_string())),
                };
                if result.is_err() {
                    // Drop the broken socket; the next request reconnects.
                    conn = None;
                }

                if reply_tx.send(PlanReply { piece_id, result }).is_err() {
                    break;
                }
            }
        });

        Self {
            request_tx,
            reply_rx,
            pending: None,
            _worker: worker,
        }
    }
}

impl MoveSource for RemoteControl {
    fn request_move(&mut self, snapshot: PlannerSnapshot) {
        self.pending = Some(snapshot.piece_id);
        let _ = self.request_tx.send(snapshot);
    }

    fn try_recv(&mut self) -> Option<PlanReply> {
        match self.reply_rx.try_recv() {
            Ok(reply) => {
                if self.pending == Some(reply.piece_id) {
                    self.pending = None;
                }
                Some(reply)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => self.pending.take().map(|piece_id| PlanReply {
                piece_id,
                result: Err(PlanError::WorkerGone),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::shape::piece_matrix;
    use crate::types::{PieceKind, Rotation};
    use std::time::{Duration, Instant};

    fn snapshot(piece_id: u32) -> PlannerSnapshot {
        PlannerSnapshot {
            piece_id,
            width: 10,
            height: 20,
            cells: vec![vec![0; 10]; 20],
            current: piece_matrix(PieceKind::O, Rotation::R0),
            next: None,
        }
    }

    fn poll_reply(control: &mut RemoteControl) -> PlanReply {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(reply) = control.try_recv() {
                return reply;
            }
            assert!(Instant::now() < deadline, "no reply from worker");
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_connection_failure_is_reported_not_fatal() {
        // Port 1 on localhost should refuse immediately.
        let mut control = RemoteControl::new(RemoteConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
        });
        control.request_move(snapshot(5));

        let reply = poll_reply(&mut control);
        assert_eq!(reply.piece_id, 5);
        assert!(matches!(reply.result, Err(PlanError::AgentIo(_))));

        // The client stays usable for a later retry.
        control.request_move(snapshot(6));
        let reply = poll_reply(&mut control);
        assert_eq!(reply.piece_id, 6);
        assert!(reply.result.is_err());
    }

    #[test]
    fn test_scripted_agent_round_trip() {
        use std::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        // A one-shot agent answering every request with a fixed placement.
        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut writer = stream;
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let request: MoveRequest = serde_json::from_str(line.trim()).unwrap();
            assert_eq!(request.width, 10);
            writer
                .write_all(b"{\"opX\":4,\"opRotate\":1}\n")
                .unwrap();
        });

        let mut control = RemoteControl::new(RemoteConfig {
            host: addr.ip().to_string(),
            port: addr.port(),
        });
        control.request_move(snapshot(11));

        let reply = poll_reply(&mut control);
        assert_eq!(reply.piece_id, 11);
        let plan = reply.result.unwrap();
        assert_eq!(plan.rotations, 1);
        assert_eq!(plan.target_col, 4);

        server.join().unwrap();
    }

    #[test]
    fn test_malformed_response_is_protocol_error() {
        use std::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut writer = stream;
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            writer.write_all(b"not json at all\n").unwrap();
        });

        let mut control = RemoteControl::new(RemoteConfig {
            host: addr.ip().to_string(),
            port: addr.port(),
        });
        control.request_move(snapshot(2));

        let reply = poll_reply(&mut control);
        assert!(matches!(reply.result, Err(PlanError::AgentProtocol(_))));

        server.join().unwrap();
    }
}
