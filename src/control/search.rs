//! Background search worker
//!
//! Runs the exhaustive planner off the simulation's timeline so a slow
//! search never stalls ticking. Requests and replies cross std mpsc
//! channels; the worker owns nothing but its copy of the weights.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use crate::ai::heuristic::Weights;
use crate::ai::planner::plan_move;
use crate::control::{MoveSource, PlanError, PlanReply};
use crate::core::PlannerSnapshot;

pub struct SearchControl {
    request_tx: Sender<PlannerSnapshot>,
    reply_rx: Receiver<PlanReply>,
    /// Piece id of the most recent request, so a dead worker can still be
    /// reported against the right piece.
    pending: Option<u32>,
    _worker: thread::JoinHandle<()>,
}

impl SearchControl {
    pub fn new(weights: Weights, discount: f64) -> Self {
        let (request_tx, request_rx) = mpsc::channel::<PlannerSnapshot>();
        let (reply_tx, reply_rx) = mpsc::channel::<PlanReply>();

        let worker = thread::spawn(move || {
            while let Ok(snapshot) = request_rx.recv() {
                let piece_id = snapshot.piece_id;
                let result = plan_move(&snapshot, &weights, discount).ok_or(PlanError::NoPlacement);
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

impl Default for SearchControl {
    fn default() -> Self {
        Self::new(Weights::default(), crate::types::LOOKAHEAD_DISCOUNT)
    }
}

impl MoveSource for SearchControl {
    fn request_move(&mut self, snapshot: PlannerSnapshot) {
        self.pending = Some(snapshot.piece_id);
        // A failed send means the worker died; the disconnect is reported
        // from try_recv so the error still reaches the host's poll loop.
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
