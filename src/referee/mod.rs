//! Referee
//!
//! Drives a match between untrusted agents. This is the only layer that
//! is async: agent calls run on blocking workers under a time limit.

pub mod agent;
pub mod isolation;
pub mod observer;
pub mod result;
pub mod session;
pub mod tiles;

pub use agent::{shared, Agent, AgentError, InitialPlacement, SharedAgent};
pub use isolation::{call_agent, AgentCall, AgentFault, AgentReply};
pub use observer::{RefereeObserver, TracingObserver};
pub use result::MatchResult;
pub use session::{MatchPhase, Referee, RefereeConfig, RefereeError, MAX_AGENTS, MIN_AGENTS};
pub use tiles::{deterministic_tiles, ShuffledTiles, TileSource};
