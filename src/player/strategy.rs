//! Move Strategies
//!
//! Deterministic strategies for reference players. Each one scans the
//! board edge in a fixed order for its first tile, then picks later tiles
//! by a simple rule.

use crate::core::position::{MAX_COORD, MIN_COORD};
use crate::core::{BoardPosition, Color, Port, Tile};
use crate::game::constraint::PhysicalConstraintChecker;
use crate::game::moves::IntermediateMove;
use crate::game::rules::{RuleChecker, INITIAL_TILE_CHOICES, TURN_TILE_CHOICES};
use crate::game::state::BoardState;
use crate::referee::agent::{AgentError, InitialPlacement};

/// How a player chooses its moves.
pub trait Strategy: Send {
    /// Choose the first tile, its cell and the starting port.
    fn initial_move(
        &mut self,
        color: Color,
        tiles: &[Tile],
        state: &BoardState,
    ) -> Result<InitialPlacement, AgentError>;

    /// Choose a later tile, rotated as it should be laid.
    fn intermediate_move(
        &mut self,
        color: Color,
        tiles: &[Tile],
        state: &BoardState,
        rules: &RuleChecker,
    ) -> Result<Tile, AgentError>;
}

/// Third tile on the first cell found clockwise from (1, 0), then always
/// the first offered tile as dealt.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClockwiseStrategy;

/// Places like [`ClockwiseStrategy`], then plays the first tile and
/// rotation that neither loops nor leaves the board.
#[derive(Debug, Default, Clone, Copy)]
pub struct SafeStrategy;

/// Third tile on the first cell found counter-clockwise from (0, 1), then
/// the first safe rotation trying the offered tiles last to first.
#[derive(Debug, Default, Clone, Copy)]
pub struct CounterClockwiseStrategy;

impl Strategy for ClockwiseStrategy {
    fn initial_move(
        &mut self,
        _color: Color,
        tiles: &[Tile],
        state: &BoardState,
    ) -> Result<InitialPlacement, AgentError> {
        place_third_tile(tiles, state, clockwise_edge(), &clockwise_ports())
    }

    fn intermediate_move(
        &mut self,
        _color: Color,
        tiles: &[Tile],
        _state: &BoardState,
        _rules: &RuleChecker,
    ) -> Result<Tile, AgentError> {
        check_hand(tiles, TURN_TILE_CHOICES)?;
        Ok(tiles[0])
    }
}

impl Strategy for SafeStrategy {
    fn initial_move(
        &mut self,
        _color: Color,
        tiles: &[Tile],
        state: &BoardState,
    ) -> Result<InitialPlacement, AgentError> {
        place_third_tile(tiles, state, clockwise_edge(), &clockwise_ports())
    }

    fn intermediate_move(
        &mut self,
        color: Color,
        tiles: &[Tile],
        state: &BoardState,
        rules: &RuleChecker,
    ) -> Result<Tile, AgentError> {
        check_hand(tiles, TURN_TILE_CHOICES)?;
        Ok(first_safe_rotation(tiles.iter(), color, state, rules).unwrap_or(tiles[0]))
    }
}

impl Strategy for CounterClockwiseStrategy {
    fn initial_move(
        &mut self,
        _color: Color,
        tiles: &[Tile],
        state: &BoardState,
    ) -> Result<InitialPlacement, AgentError> {
        place_third_tile(tiles, state, counter_clockwise_edge(), &counter_clockwise_ports())
    }

    fn intermediate_move(
        &mut self,
        color: Color,
        tiles: &[Tile],
        state: &BoardState,
        rules: &RuleChecker,
    ) -> Result<Tile, AgentError> {
        check_hand(tiles, TURN_TILE_CHOICES)?;
        Ok(first_safe_rotation(tiles.iter().rev(), color, state, rules).unwrap_or(tiles[1]))
    }
}

fn check_hand(tiles: &[Tile], expected: usize) -> Result<(), AgentError> {
    if tiles.len() != expected {
        return Err(AgentError::WrongTileCount { expected, actual: tiles.len() });
    }
    Ok(())
}

fn place_third_tile(
    tiles: &[Tile],
    state: &BoardState,
    cells: Vec<BoardPosition>,
    ports: &[Port],
) -> Result<InitialPlacement, AgentError> {
    check_hand(tiles, INITIAL_TILE_CHOICES)?;
    let tile = tiles[2];
    cells
        .into_iter()
        .filter(|&cell| PhysicalConstraintChecker::is_valid_initial_position(state, cell).is_ok())
        .find_map(|cell| {
            ports
                .iter()
                .find(|&&port| PhysicalConstraintChecker::is_valid_initial_port(state, cell, port).is_ok())
                .map(|&port| InitialPlacement::new(tile, cell, port))
        })
        .ok_or(AgentError::NoLegalPlacement)
}

/// First tile and rotation that is neither suicidal nor looping. Moves the
/// checker cannot judge count as unsafe.
fn first_safe_rotation<'a>(
    tiles: impl Iterator<Item = &'a Tile>,
    color: Color,
    state: &BoardState,
    rules: &RuleChecker,
) -> Option<Tile> {
    tiles
        .flat_map(|tile| tile.all_rotations())
        .find(|&rotation| {
            matches!(rules.is_move_illegal(state, &IntermediateMove::new(rotation, color)), Ok(false))
        })
}

fn cells(coords: impl Iterator<Item = (u8, u8)>) -> Vec<BoardPosition> {
    coords.filter_map(|(x, y)| BoardPosition::new(x, y).ok()).collect()
}

/// Top row from (1, 0), down the right column, back along the bottom row,
/// up the left column.
fn clockwise_edge() -> Vec<BoardPosition> {
    cells(
        (MIN_COORD + 1..=MAX_COORD)
            .map(|x| (x, MIN_COORD))
            .chain((MIN_COORD..=MAX_COORD).map(|y| (MAX_COORD, y)))
            .chain((MIN_COORD..=MAX_COORD).rev().map(|x| (x, MAX_COORD)))
            .chain((MIN_COORD..=MAX_COORD).rev().map(|y| (MIN_COORD, y))),
    )
}

/// Left column from (0, 1), along the bottom row, up the right column,
/// back along the top row.
fn counter_clockwise_edge() -> Vec<BoardPosition> {
    cells(
        (MIN_COORD + 1..MAX_COORD)
            .map(|y| (MIN_COORD, y))
            .chain((MIN_COORD..=MAX_COORD).map(|x| (x, MAX_COORD)))
            .chain((MIN_COORD..MAX_COORD).rev().map(|y| (MAX_COORD, y)))
            .chain((MIN_COORD + 1..MAX_COORD).rev().map(|x| (x, MIN_COORD))),
    )
}

fn clockwise_ports() -> [Port; 8] {
    Port::ALL
}

/// Top-left first, then the rest counter-clockwise.
fn counter_clockwise_ports() -> [Port; 8] {
    let mut ports = Port::ALL;
    ports[1..].reverse();
    ports
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::Board;
    use crate::game::moves::InitialMove;
    use crate::game::state::Avatar;

    fn pos(x: u8, y: u8) -> BoardPosition {
        BoardPosition::new(x, y).unwrap()
    }

    fn straight() -> Tile {
        Tile::from_indices(&[(0, 5), (1, 4), (2, 7), (3, 6)]).unwrap()
    }

    fn u_turns() -> Tile {
        Tile::from_indices(&[(0, 1), (2, 3), (4, 5), (6, 7)]).unwrap()
    }

    fn hand() -> [Tile; 3] {
        [straight(), u_turns(), Tile::catalogue()[7]]
    }

    #[test]
    fn test_edge_orders() {
        let clockwise = clockwise_edge();
        assert_eq!(clockwise.first(), Some(&pos(1, 0)));
        assert_eq!(clockwise[9], pos(9, 0));
        assert_eq!(clockwise.last(), Some(&pos(0, 0)));

        let counter = counter_clockwise_edge();
        assert_eq!(counter.first(), Some(&pos(0, 1)));
        assert_eq!(counter[8], pos(0, 9));
        assert_eq!(counter.last(), Some(&pos(1, 0)));
        assert_eq!(counter.len(), 8 + 10 + 9 + 8);

        assert_eq!(counter_clockwise_ports()[..3], [Port::TopLeft, Port::LeftTop, Port::LeftBottom]);
    }

    #[test]
    fn test_clockwise_first_move() {
        let placement = ClockwiseStrategy
            .initial_move(Color::White, &hand(), &BoardState::new())
            .unwrap();
        assert_eq!(placement.position, pos(1, 0));
        assert_eq!(placement.port, Port::RightTop);
        assert!(placement.tile.same_orientation(&hand()[2]));
    }

    #[test]
    fn test_clockwise_skips_blocked_cells() {
        let board = Board::from_initial_placements(&[InitialMove::new(
            pos(1, 0),
            straight(),
            Port::RightTop,
            Color::White,
        )])
        .unwrap();

        let placement = SafeStrategy
            .initial_move(Color::Black, &hand(), board.state())
            .unwrap();
        assert_eq!(placement.position, pos(3, 0));
        assert_eq!(placement.port, Port::RightTop);
    }

    #[test]
    fn test_counter_clockwise_first_move() {
        let placement = CounterClockwiseStrategy
            .initial_move(Color::White, &hand(), &BoardState::new())
            .unwrap();
        assert_eq!(placement.position, pos(0, 1));
        assert_eq!(placement.port, Port::TopLeft);
    }

    #[test]
    fn test_wrong_hand_size() {
        assert_eq!(
            ClockwiseStrategy.initial_move(Color::White, &hand()[..2], &BoardState::new()),
            Err(AgentError::WrongTileCount { expected: 3, actual: 2 })
        );
        assert_eq!(
            SafeStrategy.intermediate_move(Color::White, &hand(), &BoardState::new(), &RuleChecker::new()),
            Err(AgentError::WrongTileCount { expected: 2, actual: 3 })
        );
    }

    #[test]
    fn test_safe_strategy_avoids_wall() {
        let state = BoardState::new()
            .with_tile(straight(), pos(8, 0))
            .with_avatar(Color::White, Avatar::new(pos(8, 0), Port::RightTop));
        let rules = RuleChecker::new();

        let clockwise = ClockwiseStrategy
            .intermediate_move(Color::White, &[straight(), u_turns()], &state, &rules)
            .unwrap();
        assert!(clockwise.same_orientation(&straight()));

        let safe = SafeStrategy
            .intermediate_move(Color::White, &[straight(), u_turns()], &state, &rules)
            .unwrap();
        assert_eq!(safe, u_turns());

        let forced = SafeStrategy
            .intermediate_move(Color::White, &[straight(), straight()], &state, &rules)
            .unwrap();
        assert_eq!(forced, straight());
    }

    #[test]
    fn test_counter_clockwise_prefers_last_tile() {
        let corners = Tile::from_indices(&[(0, 7), (1, 2), (3, 4), (5, 6)]).unwrap();
        let state = BoardState::new()
            .with_tile(corners, pos(0, 3))
            .with_avatar(Color::White, Avatar::new(pos(0, 3), Port::RightTop));
        let rules = RuleChecker::new();

        let tile = CounterClockwiseStrategy
            .intermediate_move(Color::White, &[straight(), u_turns()], &state, &rules)
            .unwrap();
        assert_eq!(tile, u_turns());

        let tile = SafeStrategy
            .intermediate_move(Color::White, &[straight(), u_turns()], &state, &rules)
            .unwrap();
        assert_eq!(tile, straight());
    }
}
