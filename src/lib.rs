//! Gridfall - a falling-block puzzle engine with pluggable move sources.
//!
//! The `core` module owns the deterministic simulation (board, pieces,
//! rotation, tick-driven gravity, locking, scoring). The `ai` module scores
//! settled boards and searches placements; `control` delivers plans from a
//! human, a background search worker, or a remote agent over TCP; `agent`
//! defines the wire protocol and a reference agent server.

pub mod agent;
pub mod ai;
pub mod config;
pub mod control;
pub mod core;
pub mod types;
