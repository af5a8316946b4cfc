//! Match Referee
//!
//! Runs one match from seating the agents to the final ranking.
//!
//! ```text
//!  Setup ──run_match──► Placement ──► Turns ──► Complete
//!    │                    │             │
//!    │ roster, rules,     │ 3 tiles     │ 2 tiles per live agent,
//!    │ tile source        │ per agent   │ round after round until
//!    │                    │             │ at most one agent is live
//! ```
//!
//! Agents that time out, panic, answer with an error, or break the rules
//! are cheaters: they are removed in a batch at the end of the phase or
//! round, and never ranked. Agents that leave the board in the same round
//! tie with each other.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::core::{Color, Tile};
use crate::game::board::{Board, BoardError};
use crate::game::moves::IntermediateMove;
use crate::game::rules::{RuleChecker, RuleViolation, INITIAL_TILE_CHOICES, TURN_TILE_CHOICES};
use crate::game::state::BoardState;
use crate::referee::agent::SharedAgent;
use crate::referee::isolation::{call_agent, AgentCall, AgentReply};
use crate::referee::observer::{ObserverSet, RefereeObserver};
use crate::referee::result::MatchResult;
use crate::referee::tiles::TileSource;

/// Fewest agents in a match.
pub const MIN_AGENTS: usize = 3;

/// Most agents in a match.
pub const MAX_AGENTS: usize = 5;

/// Default time an agent gets for any single call.
pub const DEFAULT_AGENT_TIMEOUT: Duration = Duration::from_secs(3);

/// Referee configuration.
#[derive(Debug, Clone)]
pub struct RefereeConfig {
    /// Limit on every agent call.
    pub agent_timeout: Duration,
}

impl Default for RefereeConfig {
    fn default() -> Self {
        Self {
            agent_timeout: DEFAULT_AGENT_TIMEOUT,
        }
    }
}

/// Where the match is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    /// Collecting roster, rule checker and tile source.
    Setup,
    /// Agents laying their first tiles.
    Placement,
    /// Rounds of intermediate moves.
    Turns,
    /// Result produced.
    Complete,
}

/// Referee errors.
///
/// Setup mistakes are reported before anything happens. Once the match runs,
/// only a dry tile source or broken board bookkeeping ends it early; agent
/// misbehaviour never does.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RefereeError {
    /// Roster outside the allowed size.
    #[error("there must be between {MIN_AGENTS} and {MAX_AGENTS} players, not {0}.")]
    RosterSize(usize),

    /// Roster set twice.
    #[error("players have already been set for this game.")]
    RosterAlreadySet,

    /// The same agent handle appears in two seats.
    #[error("the same agent cannot take two seats")]
    DuplicateAgent,

    /// Rule checker set twice.
    #[error("a rule checker has already been set for this game.")]
    RuleCheckerAlreadySet,

    /// Tile source set twice.
    #[error("a tile iterator has already been set for this game.")]
    TileSourceAlreadySet,

    /// No roster.
    #[error("must add players before running a game")]
    MissingRoster,

    /// No rule checker.
    #[error("must add a rule checker before running a game")]
    MissingRuleChecker,

    /// No tile source.
    #[error("must add a tile iterator before running a game")]
    MissingTileSource,

    /// Setup attempted, or a second run, after the match started.
    #[error("the match has already started (phase {0:?})")]
    AlreadyStarted(MatchPhase),

    /// The tile source ran out.
    #[error("the tile source ran out of tiles")]
    TilesExhausted,

    /// Board bookkeeping broke.
    #[error("internal board error: {0}")]
    Board(#[from] BoardError),
}

/// One agent and its assigned color.
struct Seat {
    color: Color,
    agent: SharedAgent,
}

/// Referee for a single match.
pub struct Referee {
    id: Uuid,
    config: RefereeConfig,
    phase: MatchPhase,
    /// Everyone seated at the start, in color order.
    seats: Vec<Seat>,
    /// Colors still in the roster.
    seated: BTreeSet<Color>,
    rules: Option<RuleChecker>,
    tiles: Option<Box<dyn TileSource>>,
    observers: ObserverSet,
    board: Board,
    cheaters: BTreeSet<Color>,
    /// Elimination tiers, earliest first.
    tiers: Vec<BTreeSet<Color>>,
}

impl Default for Referee {
    fn default() -> Self {
        Self::new(RefereeConfig::default())
    }
}

impl Referee {
    /// A referee with nothing set up yet.
    pub fn new(config: RefereeConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            config,
            phase: MatchPhase::Setup,
            seats: Vec::new(),
            seated: BTreeSet::new(),
            rules: None,
            tiles: None,
            observers: ObserverSet::default(),
            board: Board::new(),
            cheaters: BTreeSet::new(),
            tiers: Vec::new(),
        }
    }

    // ===== SETUP =====

    /// Seat the agents and assign colors in palette order.
    pub fn set_roster(&mut self, agents: Vec<SharedAgent>) -> Result<Vec<Color>, RefereeError> {
        self.ensure_setup()?;
        if !self.seats.is_empty() {
            return Err(RefereeError::RosterAlreadySet);
        }
        if !(MIN_AGENTS..=MAX_AGENTS).contains(&agents.len()) {
            return Err(RefereeError::RosterSize(agents.len()));
        }
        for (i, agent) in agents.iter().enumerate() {
            let repeated = agents[..i]
                .iter()
                .any(|earlier| std::ptr::addr_eq(Arc::as_ptr(earlier), Arc::as_ptr(agent)));
            if repeated {
                return Err(RefereeError::DuplicateAgent);
            }
        }

        self.seats = Color::ALL
            .into_iter()
            .zip(agents)
            .map(|(color, agent)| Seat { color, agent })
            .collect();
        self.seated = self.seats.iter().map(|seat| seat.color).collect();

        Ok(self.roster())
    }

    /// Set the rule checker.
    pub fn set_rule_checker(&mut self, rules: RuleChecker) -> Result<(), RefereeError> {
        self.ensure_setup()?;
        if self.rules.is_some() {
            return Err(RefereeError::RuleCheckerAlreadySet);
        }
        self.rules = Some(rules);
        Ok(())
    }

    /// Set the tile source.
    pub fn set_tile_source<T: TileSource + 'static>(&mut self, source: T) -> Result<(), RefereeError> {
        self.ensure_setup()?;
        if self.tiles.is_some() {
            return Err(RefereeError::TileSourceAlreadySet);
        }
        self.tiles = Some(Box::new(source));
        Ok(())
    }

    /// Attach an observer.
    pub fn add_observer<O: RefereeObserver + 'static>(&mut self, observer: O) {
        self.observers.add(Box::new(observer));
    }

    // ===== ACCESSORS =====

    /// Match identifier used in logs.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Current phase.
    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    /// Configuration.
    pub fn config(&self) -> &RefereeConfig {
        &self.config
    }

    /// Current board.
    pub fn board_state(&self) -> &BoardState {
        self.board.state()
    }

    /// Agents marked as cheaters so far.
    pub fn cheaters(&self) -> &BTreeSet<Color> {
        &self.cheaters
    }

    // ===== MATCH =====

    /// Play the match to completion.
    #[instrument(name = "match", skip(self), fields(match_id = %self.id))]
    pub async fn run_match(&mut self) -> Result<MatchResult, RefereeError> {
        self.ensure_setup()?;
        if self.seats.is_empty() {
            return Err(RefereeError::MissingRoster);
        }
        let rules = self.rules.ok_or(RefereeError::MissingRuleChecker)?;
        if self.tiles.is_none() {
            return Err(RefereeError::MissingTileSource);
        }

        info!(agents = self.seats.len(), timeout = ?self.config.agent_timeout, "match starting");
        let roster = self.roster();
        self.observers.notify("roster_assembled", |o| o.roster_assembled(&roster));
        self.phase = MatchPhase::Placement;
        self.introduce_agents().await;
        self.run_placement_phase(&rules).await?;

        self.phase = MatchPhase::Turns;
        let mut round = 0u32;
        while self.board.live_agents().len() > 1 {
            round += 1;
            self.run_round(&rules, round).await?;
        }

        self.phase = MatchPhase::Complete;
        let result = self.final_result();
        info!(rounds = round, ranking = ?result.ranking, cheaters = ?result.cheaters, "match complete");
        self.observers.notify("match_completed", |o| o.match_completed(&result));
        self.notify_agents(&result).await;
        Ok(result)
    }

    async fn introduce_agents(&mut self) {
        let roster = self.roster();
        for (color, agent) in self.seated_agents() {
            for call in [AgentCall::SetIdentity(color), AgentCall::SetRoster(roster.clone())] {
                if let Err(fault) = call_agent(&agent, call, self.config.agent_timeout).await {
                    self.mark_cheater(color, &fault);
                    break;
                }
            }
        }
    }

    async fn run_placement_phase(&mut self, rules: &RuleChecker) -> Result<(), RefereeError> {
        for (color, agent) in self.seated_agents() {
            if self.cheaters.contains(&color) {
                continue;
            }

            let tiles = self.draw(INITIAL_TILE_CHOICES)?;
            let state = self.board.state().clone();
            self.observers
                .notify("initial_move_offered", |o| o.initial_move_offered(color, &tiles, &state));

            let call = AgentCall::InitialMove { tiles: tiles.clone(), state: state.clone() };
            let placement = match call_agent(&agent, call, self.config.agent_timeout)
                .await
                .and_then(AgentReply::into_initial_placement)
            {
                Ok(placement) => placement,
                Err(fault) => {
                    self.mark_cheater(color, &fault);
                    continue;
                }
            };

            let mv = placement.into_move(color);
            self.observers
                .notify("initial_move_played", |o| o.initial_move_played(&mv, &tiles, &state));

            if let Err(violation) = rules.validate_initial_move(&state, &tiles, &mv) {
                self.reject(color, violation)?;
                continue;
            }
            self.board.initial_move(&mv)?;
            debug!(%color, position = %mv.position, port = %mv.port, "initial tile placed");
        }

        self.remove_cheaters();
        Ok(())
    }

    async fn run_round(&mut self, rules: &RuleChecker, round: u32) -> Result<(), RefereeError> {
        let alive_at_start = self.board.live_agents();

        for (color, agent) in self.seated_agents() {
            if !self.board.is_live(color) || self.cheaters.contains(&color) {
                continue;
            }

            let tiles = self.draw(TURN_TILE_CHOICES)?;
            let state = self.board.state().clone();
            self.observers
                .notify("intermediate_move_offered", |o| o.intermediate_move_offered(color, &tiles, &state));

            let call = AgentCall::Move { tiles: tiles.clone(), state: state.clone() };
            let tile = match call_agent(&agent, call, self.config.agent_timeout)
                .await
                .and_then(AgentReply::into_tile)
            {
                Ok(tile) => tile,
                Err(fault) => {
                    self.mark_cheater(color, &fault);
                    continue;
                }
            };

            let mv = IntermediateMove::new(tile, color);
            let verdict = rules.validate_move(&state, &tiles, &mv);
            let legal = verdict.is_ok();
            self.observers.notify("intermediate_move_played", |o| {
                o.intermediate_move_played(&mv, &tiles, &state, legal)
            });

            match verdict {
                Ok(()) => {
                    let outcome = self.board.intermediate_move(&mv)?;
                    debug!(round, %color, tile = %mv.tile, events = ?outcome.events, "tile placed");
                }
                Err(violation) => self.reject(color, violation)?,
            }
        }

        let alive_at_end = self.board.live_agents();
        let eliminated: BTreeSet<Color> = alive_at_start
            .difference(&alive_at_end)
            .filter(|color| !self.cheaters.contains(color))
            .copied()
            .collect();

        if !eliminated.is_empty() {
            info!(round, ?eliminated, "agents eliminated");
            let state = self.board.state().clone();
            for &color in &eliminated {
                self.seated.remove(&color);
                self.observers.notify("agent_eliminated", |o| o.agent_eliminated(color, &state));
            }
        }
        self.tiers.push(eliminated);
        self.remove_cheaters();
        Ok(())
    }

    // ===== HELPERS =====

    fn ensure_setup(&self) -> Result<(), RefereeError> {
        match self.phase {
            MatchPhase::Setup => Ok(()),
            phase => Err(RefereeError::AlreadyStarted(phase)),
        }
    }

    /// Every color seated at the start.
    fn roster(&self) -> Vec<Color> {
        self.seats.iter().map(|seat| seat.color).collect()
    }

    /// Seated agents in color order, cloned so the referee can be mutated
    /// while iterating.
    fn seated_agents(&self) -> Vec<(Color, SharedAgent)> {
        self.seats
            .iter()
            .filter(|seat| self.seated.contains(&seat.color))
            .map(|seat| (seat.color, seat.agent.clone()))
            .collect()
    }

    fn draw(&mut self, count: usize) -> Result<Vec<Tile>, RefereeError> {
        self.tiles
            .as_mut()
            .ok_or(RefereeError::MissingTileSource)?
            .draw(count)
            .ok_or(RefereeError::TilesExhausted)
    }

    fn mark_cheater(&mut self, color: Color, reason: &dyn std::fmt::Display) {
        warn!(%color, %reason, "agent marked as cheater");
        self.cheaters.insert(color);
    }

    /// Cheating for bad moves, a hard error for broken bookkeeping.
    fn reject(&mut self, color: Color, violation: RuleViolation) -> Result<(), RefereeError> {
        match violation {
            RuleViolation::Board(err) if err.is_invariant_violation() => Err(err.into()),
            violation => {
                self.mark_cheater(color, &violation);
                Ok(())
            }
        }
    }

    fn remove_cheaters(&mut self) {
        let pending: Vec<Color> = self
            .cheaters
            .iter()
            .copied()
            .filter(|color| self.seated.contains(color))
            .collect();
        for color in pending {
            self.seated.remove(&color);
            self.board.remove_agent(color);
            let state = self.board.state().clone();
            self.observers.notify("cheater_removed", |o| o.cheater_removed(color, &state));
        }
    }

    fn final_result(&mut self) -> MatchResult {
        let mut tiers = std::mem::take(&mut self.tiers);
        tiers.push(self.board.live_agents());
        MatchResult {
            ranking: tiers.into_iter().rev().filter(|tier| !tier.is_empty()).collect(),
            cheaters: self.cheaters.clone(),
        }
    }

    async fn notify_agents(&self, result: &MatchResult) {
        for seat in &self.seats {
            if self.cheaters.contains(&seat.color) {
                continue;
            }
            let call = AgentCall::MatchResult(result.clone());
            if let Err(fault) = call_agent(&seat.agent, call, self.config.agent_timeout).await {
                warn!(color = %seat.color, %fault, "agent did not accept the match result");
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
