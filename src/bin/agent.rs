//! Reference move agent binary.
//!
//! Listens for snapshot requests and answers each one with the local
//! planner. Address comes from GRIDFALL_AGENT_HOST / GRIDFALL_AGENT_PORT.

use anyhow::Result;

use gridfall::agent::{run_agent, AgentConfig};

#[tokio::main]
async fn main() -> Result<()> {
    run_agent(AgentConfig::from_env(), None).await
}
