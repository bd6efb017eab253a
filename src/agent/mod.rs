//! Agent module - the move-delegation boundary
//!
//! Wire types for the line-delimited JSON protocol and a reference server
//! that answers requests with the local planner.

pub mod protocol;
pub mod server;

pub use protocol::{resolve_response, MoveRequest, MoveResponse};
pub use server::{run_agent, AgentConfig};
