//! Agent Isolation
//!
//! Single boundary every agent call crosses. The call runs on its own
//! detached thread with owned copies of its inputs and reports back over a
//! oneshot channel; the referee stops listening once the time limit passes.
//! An abandoned thread keeps running until the agent returns, but it only
//! holds its own copies and is not owned by any runtime, so it can neither
//! reach referee state nor hold up runtime shutdown.
//!
//! Notifications always reply [`AgentReply::Ack`]; queries turn an agent's
//! `Err` into [`AgentFault::Failed`]. Panics and timeouts are faults for
//! both.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tracing::debug;

use crate::core::{Color, Tile};
use crate::game::state::BoardState;
use crate::referee::agent::{Agent, AgentError, InitialPlacement, SharedAgent};
use crate::referee::result::MatchResult;

/// A request to an agent, carrying owned inputs.
#[derive(Debug, Clone)]
pub enum AgentCall {
    /// Tell the agent its color.
    SetIdentity(Color),
    /// Tell the agent who is playing.
    SetRoster(Vec<Color>),
    /// Ask for a first move.
    InitialMove {
        /// Offered tiles.
        tiles: Vec<Tile>,
        /// Board before the move.
        state: BoardState,
    },
    /// Ask for a later move.
    Move {
        /// Offered tiles.
        tiles: Vec<Tile>,
        /// Board before the move.
        state: BoardState,
    },
    /// Tell the agent how the match ended.
    MatchResult(MatchResult),
}

/// What an agent answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentReply {
    /// A notification was delivered.
    Ack,
    /// Answer to [`AgentCall::InitialMove`].
    InitialPlacement(InitialPlacement),
    /// Answer to [`AgentCall::Move`].
    Tile(Tile),
}

/// Why an agent call did not produce a usable reply.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgentFault {
    /// No answer within the limit.
    #[error("no response within {0:?}")]
    TimedOut(Duration),

    /// The agent panicked.
    #[error("agent panicked: {0}")]
    Panicked(String),

    /// The agent returned an error.
    #[error("agent failed: {0}")]
    Failed(#[from] AgentError),

    /// An earlier panic left the agent's lock poisoned.
    #[error("agent is unusable after an earlier panic")]
    Poisoned,

    /// The reply does not match the request.
    #[error("unexpected reply to {0}")]
    UnexpectedReply(&'static str),

    /// No worker thread could be started for the call.
    #[error("could not start agent worker: {0}")]
    Unavailable(String),
}

impl AgentCall {
    /// Name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            AgentCall::SetIdentity(_) => "set_identity",
            AgentCall::SetRoster(_) => "set_roster",
            AgentCall::InitialMove { .. } => "generate_initial_move",
            AgentCall::Move { .. } => "generate_move",
            AgentCall::MatchResult(_) => "notify_match_result",
        }
    }

    fn dispatch(self, agent: &mut dyn Agent) -> Result<AgentReply, AgentError> {
        match self {
            AgentCall::SetIdentity(color) => {
                agent.set_identity(color);
                Ok(AgentReply::Ack)
            }
            AgentCall::SetRoster(roster) => {
                agent.set_roster(&roster);
                Ok(AgentReply::Ack)
            }
            AgentCall::MatchResult(result) => {
                agent.notify_match_result(&result);
                Ok(AgentReply::Ack)
            }
            AgentCall::InitialMove { tiles, state } => agent
                .generate_initial_move(&tiles, &state)
                .map(AgentReply::InitialPlacement),
            AgentCall::Move { tiles, state } => {
                agent.generate_move(&tiles, &state).map(AgentReply::Tile)
            }
        }
    }
}

impl AgentReply {
    /// The placement, or a fault naming the request.
    pub fn into_initial_placement(self) -> Result<InitialPlacement, AgentFault> {
        match self {
            AgentReply::InitialPlacement(placement) => Ok(placement),
            _ => Err(AgentFault::UnexpectedReply("generate_initial_move")),
        }
    }

    /// The tile, or a fault naming the request.
    pub fn into_tile(self) -> Result<Tile, AgentFault> {
        match self {
            AgentReply::Tile(tile) => Ok(tile),
            _ => Err(AgentFault::UnexpectedReply("generate_move")),
        }
    }
}

/// Run `call` against `agent` with at most `limit` to answer.
pub async fn call_agent(
    agent: &SharedAgent,
    call: AgentCall,
    limit: Duration,
) -> Result<AgentReply, AgentFault> {
    let name = call.name();
    let agent = Arc::clone(agent);
    let (reply_tx, reply_rx) = oneshot::channel();

    // The guard is dropped while unwinding, so a panic poisons the agent.
    let spawned = std::thread::Builder::new()
        .name(format!("agent-{name}"))
        .spawn(move || {
            let result = catch_unwind(AssertUnwindSafe(|| {
                let mut guard = agent.lock().map_err(|_| AgentFault::Poisoned)?;
                call.dispatch(&mut *guard).map_err(AgentFault::Failed)
            }))
            .unwrap_or_else(|payload| Err(AgentFault::Panicked(panic_message(payload))));
            // The referee may have stopped listening.
            let _ = reply_tx.send(result);
        });

    let result = match spawned {
        Err(err) => Err(AgentFault::Unavailable(err.to_string())),
        Ok(_detached) => match tokio::time::timeout(limit, reply_rx).await {
            Err(_) => Err(AgentFault::TimedOut(limit)),
            Ok(Err(_)) => Err(AgentFault::Panicked("worker exited without replying".to_string())),
            Ok(Ok(result)) => result,
        },
    };

    if let Err(fault) = &result {
        debug!(call = name, %fault, "agent call faulted");
    }
    result
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

// =============================================================================
// TESTS
// =============================================================================
