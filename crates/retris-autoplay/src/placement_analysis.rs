//! Analysis of board state after piece placement.
//!
//! [`PlacementAnalysis`] pairs a candidate placement with the metrics of the board
//! it would produce. The piece is merged into a scratch copy of the board; full
//! rows stay in place so the evaluator can count them as completed lines.
//!
//! ```
//! use retris_autoplay::placement_analysis::PlacementAnalysis;
//! use retris_engine::{Board, Piece, PieceKind};
//!
//! let board = Board::EMPTY;
//! let placement = Piece::new(PieceKind::I).dropped(&board);
//! let analysis = PlacementAnalysis::from_board(&board, placement);
//!
//! assert_eq!(analysis.board_analysis().aggregate_height(), 4);
//! assert_eq!(analysis.board_analysis().complete_lines(), 0);
//! ```

use retris_engine::{Board, Piece};

use crate::board_analysis::BoardAnalysis;

#[derive(Debug)]
pub struct PlacementAnalysis {
    placement: Piece,
    board_analysis: BoardAnalysis,
}

impl PlacementAnalysis {
    #[must_use]
    pub fn from_board(before_placement: &Board, placement: Piece) -> Self {
        let mut board = before_placement.clone();
        board.fill_piece(&placement);

        Self {
            placement,
            board_analysis: BoardAnalysis::new(board),
        }
    }

    #[must_use]
    pub fn placement(&self) -> &Piece {
        &self.placement
    }

    #[must_use]
    pub fn board_analysis(&self) -> &BoardAnalysis {
        &self.board_analysis
    }
}
