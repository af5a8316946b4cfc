//! Reference players
//!
//! [`Player`] turns a [`Strategy`] into an [`Agent`]: it keeps track of its
//! color, the roster and the last result, and hands the strategy the same
//! rule checker the referee uses.

pub mod strategy;

pub use strategy::{ClockwiseStrategy, CounterClockwiseStrategy, SafeStrategy, Strategy};

use crate::core::{Color, Tile};
use crate::game::rules::RuleChecker;
use crate::game::state::BoardState;
use crate::referee::agent::{Agent, AgentError, InitialPlacement};
use crate::referee::result::MatchResult;

/// An agent driven by a strategy.
#[derive(Debug, Default)]
pub struct Player<S> {
    strategy: S,
    rules: RuleChecker,
    color: Option<Color>,
    roster: Vec<Color>,
    last_result: Option<MatchResult>,
}

impl<S: Strategy> Player<S> {
    /// Player using `strategy`.
    pub fn new(strategy: S) -> Self {
        Self {
            strategy,
            rules: RuleChecker::new(),
            color: None,
            roster: Vec::new(),
            last_result: None,
        }
    }

    /// Color assigned by the referee.
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    /// Everyone in the match.
    pub fn roster(&self) -> &[Color] {
        &self.roster
    }

    /// Result of the last match played.
    pub fn last_result(&self) -> Option<&MatchResult> {
        self.last_result.as_ref()
    }

    fn identity(&self) -> Result<Color, AgentError> {
        self.color.ok_or(AgentError::NotIntroduced)
    }
}

impl<S: Strategy> Agent for Player<S> {
    fn set_identity(&mut self, color: Color) {
        self.color = Some(color);
    }

    fn set_roster(&mut self, roster: &[Color]) {
        self.roster = roster.to_vec();
    }

    fn generate_initial_move(
        &mut self,
        tiles: &[Tile],
        state: &BoardState,
    ) -> Result<InitialPlacement, AgentError> {
        let color = self.identity()?;
        self.strategy.initial_move(color, tiles, state)
    }

    fn generate_move(&mut self, tiles: &[Tile], state: &BoardState) -> Result<Tile, AgentError> {
        let color = self.identity()?;
        self.strategy.intermediate_move(color, tiles, state, &self.rules)
    }

    fn notify_match_result(&mut self, result: &MatchResult) {
        self.last_result = Some(result.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_needs_color() {
        let mut player = Player::new(ClockwiseStrategy);
        let tiles = &Tile::catalogue()[..3];

        assert_eq!(
            player.generate_initial_move(tiles, &BoardState::new()),
            Err(AgentError::NotIntroduced)
        );

        player.set_identity(Color::Green);
        player.set_roster(&[Color::White, Color::Black, Color::Green]);
        assert_eq!(player.color(), Some(Color::Green));
        assert_eq!(player.roster().len(), 3);
        assert!(player.generate_initial_move(tiles, &BoardState::new()).is_ok());
    }

    #[test]
    fn test_player_remembers_result() {
        let mut player = Player::new(SafeStrategy);
        assert!(player.last_result().is_none());
        player.notify_match_result(&MatchResult::default());
        assert_eq!(player.last_result(), Some(&MatchResult::default()));
    }
}
