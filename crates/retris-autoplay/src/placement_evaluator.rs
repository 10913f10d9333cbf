//! Placement evaluation: scoring individual piece placements.
//!
//! A placement is scored from four metrics of the board it produces:
//!
//! ```text
//! score = W_h·aggregate_height + W_l·complete_lines + W_o·holes + W_b·bumpiness
//! ```
//!
//! [`Weights::BASE`] holds the Medium weights; [`Weights::for_difficulty`] scales them
//! for the other difficulties. Higher scores are better.

use std::fmt;

use retris_engine::{Difficulty, PieceKind};
use serde::{Deserialize, Serialize};

use crate::{board_analysis::BoardAnalysis, placement_analysis::PlacementAnalysis};

/// Added when the evaluated piece is the same kind as the held piece.
pub const HELD_KIND_BONUS: f32 = 0.5;

/// Evaluates piece placements by assigning scores.
pub trait PlacementEvaluator: fmt::Debug + Send + Sync {
    /// Evaluates a placement and returns a score (higher is better).
    ///
    /// `held` is the kind currently in the hold slot, if any.
    fn evaluate_placement(&self, analysis: &PlacementAnalysis, held: Option<PieceKind>) -> f32;
}

/// Coefficients of the linear board score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub height: f32,
    pub lines: f32,
    pub holes: f32,
    pub bumpiness: f32,
}

impl Weights {
    pub const BASE: Self = Self {
        height: -0.510_066,
        lines: 0.760_666,
        holes: -0.356_63,
        bumpiness: -0.184_483,
    };

    /// Beginner cares less about height and holes; Expert values lines and
    /// avoids holes more.
    #[must_use]
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        let base = Self::BASE;
        match difficulty {
            Difficulty::Beginner => Self {
                height: base.height * 0.7,
                holes: base.holes * 0.6,
                ..base
            },
            Difficulty::Medium => base,
            Difficulty::Expert => Self {
                lines: base.lines * 1.2,
                holes: base.holes * 1.3,
                ..base
            },
        }
    }

    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn score(&self, analysis: &BoardAnalysis) -> f32 {
        self.height * analysis.aggregate_height() as f32
            + self.lines * analysis.complete_lines() as f32
            + self.holes * analysis.num_holes() as f32
            + self.bumpiness * analysis.bumpiness() as f32
    }
}

/// Weighted board score plus a bonus for matching the held kind.
///
/// # Example
///
/// ```
/// use retris_autoplay::{
///     placement_analysis::PlacementAnalysis,
///     placement_evaluator::{HeuristicPlacementEvaluator, PlacementEvaluator as _, Weights},
/// };
/// use retris_engine::{Board, Piece, PieceKind};
///
/// let evaluator = HeuristicPlacementEvaluator::new(Weights::BASE);
/// let board = Board::EMPTY;
/// let analysis = PlacementAnalysis::from_board(&board, Piece::new(PieceKind::O).dropped(&board));
///
/// let plain = evaluator.evaluate_placement(&analysis, None);
/// let matching = evaluator.evaluate_placement(&analysis, Some(PieceKind::O));
/// assert!(matching > plain);
/// ```
#[derive(Debug, Clone)]
pub struct HeuristicPlacementEvaluator {
    weights: Weights,
}

impl HeuristicPlacementEvaluator {
    #[must_use]
    pub fn new(weights: Weights) -> Self {
        Self { weights }
    }

    #[must_use]
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        Self::new(Weights::for_difficulty(difficulty))
    }

    #[must_use]
    pub fn weights(&self) -> &Weights {
        &self.weights
    }
}

impl PlacementEvaluator for HeuristicPlacementEvaluator {
    #[inline]
    fn evaluate_placement(&self, analysis: &PlacementAnalysis, held: Option<PieceKind>) -> f32 {
        let mut score = self.weights.score(analysis.board_analysis());
        if held == Some(analysis.placement().kind()) {
            score += HELD_KIND_BONUS;
        }
        score
    }
}

#[cfg(test)]
mod tests {
    use retris_engine::Board;

    use super::*;

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 1e-4,
            "expected {expected}, got {actual}"
        );
    }

    fn analysis(board: &str) -> BoardAnalysis {
        BoardAnalysis::new(board.parse::<Board>().unwrap())
    }

    #[test]
    fn test_smooth_placement_beats_line_with_hole_next_to_tall_column() {
        // Same stack before placement: a 7-high column 0 and a bottom row open at column 9.
        // L completes the bottom row but buries a hole at (8, 18)
        let line_with_hole = analysis(
            "\
            I.........\n\
            I.........\n\
            I.........\n\
            I.........\n\
            I.......LL\n\
            I........L\n\
            IIIIIIIIIL",
        );
        // O sits flat next to the tall column
        let smooth = analysis(
            "\
            I.........\n\
            I.........\n\
            I.........\n\
            I.........\n\
            IOO.......\n\
            IOO.......\n\
            IIIIIIIII.",
        );

        assert_eq!(line_with_hole.complete_lines(), 1);
        assert_eq!(line_with_hole.num_holes(), 1);
        let line_score = Weights::BASE.score(&line_with_hole);
        let smooth_score = Weights::BASE.score(&smooth);
        assert_close(line_score, -11.273_148);
        assert_close(smooth_score, -10.982_635);
        assert!(smooth_score > line_score);
    }

    #[test]
    fn test_difficulty_scaling() {
        let base = Weights::BASE;
        assert_eq!(Weights::for_difficulty(Difficulty::Medium), base);

        let beginner = Weights::for_difficulty(Difficulty::Beginner);
        assert_close(beginner.height, base.height * 0.7);
        assert_close(beginner.holes, base.holes * 0.6);
        assert_close(beginner.lines, base.lines);

        let expert = Weights::for_difficulty(Difficulty::Expert);
        assert_close(expert.lines, base.lines * 1.2);
        assert_close(expert.holes, base.holes * 1.3);
        assert_close(expert.bumpiness, base.bumpiness);
    }

    #[test]
    fn test_held_kind_bonus() {
        let evaluator = HeuristicPlacementEvaluator::for_difficulty(Difficulty::Medium);
        let board = Board::EMPTY;
        let placement = retris_engine::Piece::new(PieceKind::T).dropped(&board);
        let analysis = PlacementAnalysis::from_board(&board, placement);
        let plain = evaluator.evaluate_placement(&analysis, Some(PieceKind::I));
        let matching = evaluator.evaluate_placement(&analysis, Some(PieceKind::T));
        assert_close(matching - plain, HELD_KIND_BONUS);
    }
}
