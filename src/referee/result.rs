//! Match Results

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::Color;

/// Final standing of a match.
///
/// `ranking[0]` holds the best-placed agents; agents in the same set tied.
/// Cheaters are listed separately and never ranked.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Tiers from best to worst, none empty.
    pub ranking: Vec<BTreeSet<Color>>,
    /// Agents removed for misbehaving.
    pub cheaters: BTreeSet<Color>,
}

impl MatchResult {
    /// Agents in the top tier.
    pub fn winners(&self) -> BTreeSet<Color> {
        self.ranking.first().cloned().unwrap_or_default()
    }

    /// 1-based placement of `color`, `None` for cheaters and strangers.
    pub fn placement_of(&self, color: Color) -> Option<usize> {
        self.ranking
            .iter()
            .position(|tier| tier.contains(&color))
            .map(|index| index + 1)
    }

    /// Whether `color` was removed for cheating.
    pub fn is_cheater(&self, color: Color) -> bool {
        self.cheaters.contains(&color)
    }

    /// Everyone who took part.
    pub fn participants(&self) -> BTreeSet<Color> {
        self.ranking
            .iter()
            .flatten()
            .chain(self.cheaters.iter())
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MatchResult {
        MatchResult {
            ranking: vec![
                BTreeSet::from([Color::Red]),
                BTreeSet::from([Color::White, Color::Black]),
            ],
            cheaters: BTreeSet::from([Color::Green]),
        }
    }

    #[test]
    fn test_queries() {
        let result = sample();
        assert_eq!(result.winners(), BTreeSet::from([Color::Red]));
        assert_eq!(result.placement_of(Color::Black), Some(2));
        assert_eq!(result.placement_of(Color::Green), None);
        assert!(result.is_cheater(Color::Green));
        assert_eq!(result.participants().len(), 4);
        assert!(MatchResult::default().winners().is_empty());
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(
            json,
            r#"{"ranking":[["red"],["white","black"]],"cheaters":["green"]}"#
        );
    }
}
