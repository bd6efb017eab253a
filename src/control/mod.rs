//! Move sources - the pluggable controllers behind the simulation
//!
//! A move source receives read-only snapshots and answers, later, with a
//! plan for the snapshotted piece. Replies cross a channel and are polled by
//! the host on its own timeline; a source never touches game state. Exactly
//! three implementations exist: the no-op human (whose moves arrive as
//! direct intents instead), the background search worker, and the remote
//! agent client.

pub mod remote;
pub mod search;

pub use remote::{RemoteConfig, RemoteControl};
pub use search::SearchControl;

use crate::core::PlannerSnapshot;
use crate::types::MovePlan;

/// Why a move request produced no plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// The search found no feasible placement at all
    NoPlacement,
    /// The worker thread is gone; no further replies will arrive
    WorkerGone,
    /// Socket-level failure talking to the remote agent
    AgentIo(String),
    /// The remote agent answered with something unparsable
    AgentProtocol(String),
}

impl PlanError {
    pub fn code(&self) -> &'static str {
        match self {
            PlanError::NoPlacement => "no_placement",
            PlanError::WorkerGone => "worker_gone",
            PlanError::AgentIo(_) => "agent_io",
            PlanError::AgentProtocol(_) => "agent_protocol",
        }
    }
}

impl std::fmt::Display for PlanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanError::NoPlacement => write!(f, "no feasible placement"),
            PlanError::WorkerGone => write!(f, "planner worker is gone"),
            PlanError::AgentIo(detail) => write!(f, "agent connection failed: {}", detail),
            PlanError::AgentProtocol(detail) => write!(f, "agent protocol error: {}", detail),
        }
    }
}

/// Reply to a move request, tagged with the piece it was computed for so the
/// host can discard replies that outlived their piece.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanReply {
    pub piece_id: u32,
    pub result: Result<MovePlan, PlanError>,
}

/// Asynchronous move-selection capability.
pub trait MoveSource {
    /// Hand a snapshot to the source. Never blocks.
    fn request_move(&mut self, snapshot: PlannerSnapshot);

    /// Poll for a finished reply. Never blocks; the host drains this on its
    /// authoritative timeline.
    fn try_recv(&mut self) -> Option<PlanReply>;
}

/// The human "source": never plans anything, moves arrive as direct intents.
#[derive(Debug, Default)]
pub struct HumanControl;

impl MoveSource for HumanControl {
    fn request_move(&mut self, _snapshot: PlannerSnapshot) {}

    fn try_recv(&mut self) -> Option<PlanReply> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_control_never_replies() {
        let mut human = HumanControl;
        human.request_move(PlannerSnapshot {
            piece_id: 1,
            width: 10,
            height: 20,
            cells: vec![vec![0; 10]; 20],
            current: vec![vec![1, 1], vec![1, 1]],
            next: None,
        });
        assert!(human.try_recv().is_none());
    }

    #[test]
    fn test_plan_error_codes() {
        assert_eq!(PlanError::NoPlacement.code(), "no_placement");
        assert_eq!(PlanError::AgentIo("x".into()).code(), "agent_io");
        assert_eq!(
            PlanError::AgentProtocol("bad json".into()).to_string(),
            "agent protocol error: bad json"
        );
    }
}
