//! Turn evaluation: selecting the move for the current turn.
//!
//! # How It Works
//!
//! 1. **Enumerate Placements** - For rotation counts 0-3 and every column in
//!    [`SEARCH_COLUMNS`], try the piece at the spawn row and skip it if it collides
//! 2. **Score Each Placement** - Drop the piece and score the resulting board with a
//!    [`PlacementEvaluator`]
//! 3. **Select Best** - Keep the first highest-scoring candidate
//! 4. **Hold Decision** - If hold is available and the piece that hold would bring in
//!    scores more than [`HOLD_THRESHOLD`] above the current piece, hold instead
//!
//! # Design: Greedy One-Step Lookahead
//!
//! Only the immediate placement is considered; there is no multi-turn planning.
//!
//! # Usage
//!
//! ```
//! use retris_autoplay::{
//!     placement_evaluator::HeuristicPlacementEvaluator,
//!     turn_evaluator::{TurnEvaluator, TurnPlan},
//! };
//! use retris_engine::{Difficulty, GameField, PieceKind, PieceSequence};
//!
//! let evaluator = TurnEvaluator::new(Box::new(HeuristicPlacementEvaluator::for_difficulty(
//!     Difficulty::Medium,
//! )));
//! let field = GameField::with_source(PieceSequence::repeat(PieceKind::O));
//!
//! let Some(TurnPlan::Place(candidate)) = evaluator.select_best_turn(&field) else {
//!     panic!("an empty board always has a placement");
//! };
//! assert_eq!(candidate.placement.y(), 18);
//! ```

use std::{cmp::Ordering, ops::RangeInclusive};

use retris_engine::{
    Board, GameField, GameSession, LockReport, Piece, PieceKind, SPAWN_Y, SessionError,
};

use crate::{placement_analysis::PlacementAnalysis, placement_evaluator::PlacementEvaluator};

/// Mask origins tried by the search, from three left of the wall to `COLS + 2`.
pub const SEARCH_COLUMNS: RangeInclusive<i32> = -3..=12;

/// How much better the hold-side placement must score before the auto-player holds.
pub const HOLD_THRESHOLD: f32 = 2.0;

/// Best placement found for one piece.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Clockwise rotations to apply from the piece's current orientation.
    pub rotations: usize,
    /// The piece at its landing position.
    pub placement: Piece,
    pub score: f32,
}

impl Candidate {
    /// Target mask origin column.
    #[must_use]
    pub fn column(&self) -> i32 {
        self.placement.x()
    }
}

/// What the auto-player does this turn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TurnPlan {
    /// Use hold and end the turn.
    Hold,
    /// Rotate, walk to the column, then hard drop.
    Place(Candidate),
}

impl TurnPlan {
    /// Carries out the plan through the session's regular piece controls.
    ///
    /// Rotations and steps that collide are skipped; the hard drop locks the piece
    /// wherever it ended up. Returns the lock report for placements, `None` for holds.
    pub fn apply(&self, session: &mut GameSession) -> Result<Option<LockReport>, SessionError> {
        let candidate = match self {
            Self::Hold => {
                session.try_hold()?;
                return Ok(None);
            }
            Self::Place(candidate) => candidate,
        };

        for _ in 0..candidate.rotations {
            _ = session.try_rotate();
        }
        let target = candidate.column();
        loop {
            let moved = match session.field().current_piece().x().cmp(&target) {
                Ordering::Less => session.try_move_right(),
                Ordering::Greater => session.try_move_left(),
                Ordering::Equal => break,
            };
            if moved.is_err() {
                break;
            }
        }
        session.hard_drop().map(Some)
    }
}

/// Selects the best turn for a playfield.
#[derive(Debug)]
pub struct TurnEvaluator<'a> {
    placement_evaluator: Box<dyn PlacementEvaluator + 'a>,
}

impl<'a> TurnEvaluator<'a> {
    #[must_use]
    pub fn new(placement_evaluator: Box<dyn PlacementEvaluator + 'a>) -> Self {
        Self {
            placement_evaluator,
        }
    }

    /// Searches every rotation and column for `piece`.
    ///
    /// Rotations are applied one at a time with wall kicks; a rotation that fails
    /// leaves the orientation unchanged. Returns `None` when every column collides.
    #[must_use]
    pub fn best_placement(
        &self,
        board: &Board,
        piece: Piece,
        held: Option<PieceKind>,
    ) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;
        let mut oriented = piece;
        for rotations in 0..4 {
            if rotations > 0
                && let Some(rotated) = oriented.rotated(board)
            {
                oriented = rotated;
            }
            for column in SEARCH_COLUMNS {
                let spawned = oriented.with_position(column, SPAWN_Y);
                if board.is_colliding(&spawned) {
                    continue;
                }
                let placement = spawned.dropped(board);
                let analysis = PlacementAnalysis::from_board(board, placement);
                let score = self.placement_evaluator.evaluate_placement(&analysis, held);
                if best.is_none_or(|best| score > best.score) {
                    best = Some(Candidate {
                        rotations,
                        placement,
                        score,
                    });
                }
            }
        }
        best
    }

    /// Chooses between placing the current piece and holding.
    ///
    /// Returns `None` when no placement exists and hold is not worth it.
    #[must_use]
    pub fn select_best_turn(&self, field: &GameField) -> Option<TurnPlan> {
        let board = field.board();
        let held = field.held_piece().map(|piece| piece.kind());
        let current = self.best_placement(board, field.current_piece(), held);

        if field.can_hold() {
            let current_score = current.map_or(f32::NEG_INFINITY, |c| c.score);
            let after_hold = self.best_placement(board, field.peek_piece_after_hold(), held);
            if after_hold.is_some_and(|c| c.score > current_score + HOLD_THRESHOLD) {
                return Some(TurnPlan::Hold);
            }
        }

        current.map(TurnPlan::Place)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use retris_engine::{MemoryHighScoreStore, PieceSequence};

    use crate::placement_evaluator::HeuristicPlacementEvaluator;

    use super::*;

    fn evaluator() -> TurnEvaluator<'static> {
        TurnEvaluator::new(Box::new(HeuristicPlacementEvaluator::new(
            crate::placement_evaluator::Weights::BASE,
        )))
    }

    fn field(kinds: &[PieceKind], board: &str) -> GameField {
        GameField::with_source(PieceSequence::new(kinds.iter().copied()))
            .with_board(board.parse().unwrap())
    }

    fn playing(field: GameField) -> GameSession {
        let mut session = GameSession::new(field, MemoryHighScoreStore::new());
        session.update(Duration::from_secs(5));
        session.start_game();
        session
    }

    #[test]
    fn test_o_on_empty_board_goes_to_left_wall() {
        let candidate = evaluator()
            .best_placement(&Board::EMPTY, Piece::new(PieceKind::O), None)
            .unwrap();
        // Both walls leave the least bumpiness; the left one is found first
        assert_eq!(candidate.rotations, 0);
        assert_eq!(candidate.column(), 0);
        assert_eq!(candidate.placement.y(), 18);
    }

    #[test]
    fn test_i_fills_the_well() {
        let board: Board = "\
            IIIIIIIII.\n\
            IIIIIIIII.\n\
            IIIIIIIII.\n\
            IIIIIIIII."
            .parse()
            .unwrap();
        let candidate = evaluator()
            .best_placement(&board, Piece::new(PieceKind::I), None)
            .unwrap();
        assert_eq!(candidate.rotations, 1);
        assert_eq!(candidate.column(), 7);
        assert!((candidate.score - (-17.359_976)).abs() < 1e-4);
    }

    #[test]
    fn test_i_reaches_left_well_from_outside_the_wall() {
        let board = "\
            .IIIIIIIII\n\
            .IIIIIIIII\n\
            .IIIIIIIII\n\
            .IIIIIIIII";
        let field = field(&[PieceKind::I, PieceKind::O], board);
        let Some(TurnPlan::Place(candidate)) = evaluator().select_best_turn(&field) else {
            panic!("expected a placement");
        };
        // The vertical bar sits in mask column 2, so the origin is left of the wall
        assert_eq!(candidate.rotations, 1);
        assert_eq!(candidate.column(), -2);
        assert!((candidate.score - (-17.359_976)).abs() < 1e-4);

        // Starting a game clears the board; the walk itself is what matters here
        let mut session = playing(field);
        let report = TurnPlan::Place(candidate)
            .apply(&mut session)
            .unwrap()
            .unwrap();
        assert!(!report.game_over);
        let board = session.field().board();
        for y in 16..Board::ROWS {
            assert!(board.is_occupied(0, y));
            assert!(!board.is_occupied(1, y));
        }
    }

    /// Scores by piece kind only, so the hold margin can be hit exactly.
    #[derive(Debug)]
    struct KindScore {
        o: f32,
        i: f32,
    }

    impl PlacementEvaluator for KindScore {
        fn evaluate_placement(
            &self,
            analysis: &PlacementAnalysis,
            _held: Option<PieceKind>,
        ) -> f32 {
            match analysis.placement().kind() {
                PieceKind::O => self.o,
                PieceKind::I => self.i,
                _ => 0.0,
            }
        }
    }

    #[test]
    fn test_hold_needs_more_than_threshold() {
        let field = field(&[PieceKind::O, PieceKind::I], "..........");
        let at_threshold = TurnEvaluator::new(Box::new(KindScore { o: 1.0, i: 3.0 }));
        assert!(matches!(
            at_threshold.select_best_turn(&field),
            Some(TurnPlan::Place(c)) if c.placement.kind() == PieceKind::O
        ));
        let above_threshold = TurnEvaluator::new(Box::new(KindScore { o: 1.0, i: 3.25 }));
        assert_eq!(above_threshold.select_best_turn(&field), Some(TurnPlan::Hold));
    }

    #[test]
    fn test_hold_when_next_piece_is_much_better() {
        let board = "\
            OOOOOOOOO.\n\
            OOOOOOOOO.\n\
            OOOOOOOOO.\n\
            OOOOOOOOO.";
        let field = field(&[PieceKind::O, PieceKind::I], board);
        assert_eq!(evaluator().select_best_turn(&field), Some(TurnPlan::Hold));
    }

    #[test]
    fn test_place_when_hold_is_used() {
        let board = "\
            OOOOOOOOO.\n\
            OOOOOOOOO.\n\
            OOOOOOOOO.\n\
            OOOOOOOOO.";
        let mut field = field(&[PieceKind::T, PieceKind::O, PieceKind::I], board);
        // T is held, O becomes current and I is next; hold is spent
        field.hold().unwrap();
        assert!(!field.can_hold());
        let plan = evaluator().select_best_turn(&field);
        assert!(matches!(plan, Some(TurnPlan::Place(c)) if c.placement.kind() == PieceKind::O));
    }

    #[test]
    fn test_no_placement_on_blocked_spawn_rows() {
        let mut board = Board::EMPTY;
        for y in 0..Board::ROWS {
            for x in 0..Board::COLS {
                if (x + y) % 2 == 0 {
                    board.set_cell(x, y, Some(PieceKind::Z));
                }
            }
        }
        let field = GameField::with_source(PieceSequence::repeat(PieceKind::I)).with_board(board);
        assert_eq!(evaluator().select_best_turn(&field), None);
    }

    #[test]
    fn test_apply_walks_and_drops() {
        let mut session = playing(GameField::with_source(PieceSequence::repeat(PieceKind::O)));
        let plan = evaluator().select_best_turn(session.field()).unwrap();
        let report = plan.apply(&mut session).unwrap().unwrap();
        assert!(!report.game_over);
        assert!(session.field().board().is_occupied(0, 19));
        assert!(session.field().board().is_occupied(1, 18));
        assert_eq!(session.stats().completed_pieces(), 1);
    }
}
