use crate::{
    CompletePieceDropError, HoldError, PieceCollisionError,
    core::{
        board::{Board, ClearedRows},
        piece::Piece,
    },
};

use super::piece_generator::{PieceGenerator, PieceSource};

/// Playfield for one game: the board, the falling piece, the look-ahead piece and hold.
///
/// The field enforces placement rules (no overlapping moves, hold once per lock)
/// but knows nothing about timing or scoring; [`GameSession`](super::GameSession)
/// adds those.
#[derive(Debug)]
pub struct GameField {
    board: Board,
    current: Piece,
    next: Piece,
    held: Option<Piece>,
    can_hold: bool,
    source: Box<dyn PieceSource>,
}

impl Default for GameField {
    fn default() -> Self {
        Self::new()
    }
}

impl GameField {
    /// Creates a field with a randomly seeded [`PieceGenerator`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_source(PieceGenerator::new())
    }

    #[must_use]
    pub fn with_source(source: impl PieceSource + 'static) -> Self {
        let mut source: Box<dyn PieceSource> = Box::new(source);
        let current = Piece::new(source.next_kind());
        let next = Piece::new(source.next_kind());
        Self {
            board: Board::EMPTY,
            current,
            next,
            held: None,
            can_hold: true,
            source,
        }
    }

    /// Replaces the locked cells, keeping the pieces.
    #[must_use]
    pub fn with_board(self, board: Board) -> Self {
        Self { board, ..self }
    }

    /// Starts over on an empty board with fresh pieces from the same source.
    pub fn reset(&mut self) {
        self.board = Board::EMPTY;
        self.current = Piece::new(self.source.next_kind());
        self.next = Piece::new(self.source.next_kind());
        self.held = None;
        self.can_hold = true;
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn current_piece(&self) -> Piece {
        self.current
    }

    #[must_use]
    pub fn next_piece(&self) -> Piece {
        self.next
    }

    #[must_use]
    pub fn held_piece(&self) -> Option<Piece> {
        self.held
    }

    #[must_use]
    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    /// Returns where the current piece would land on a hard drop.
    #[must_use]
    pub fn ghost_piece(&self) -> Piece {
        self.current.dropped(&self.board)
    }

    pub fn set_current_piece(&mut self, piece: Piece) -> Result<(), PieceCollisionError> {
        if self.board.is_colliding(&piece) {
            return Err(PieceCollisionError);
        }
        self.current = piece;
        Ok(())
    }

    /// Rotates the current piece with wall kicks.
    pub fn rotate_current_piece(&mut self) -> Result<(), PieceCollisionError> {
        let rotated = self.current.rotated(&self.board).ok_or(PieceCollisionError)?;
        self.current = rotated;
        Ok(())
    }

    /// Returns the piece that would become current if hold were used now.
    ///
    /// That is the held piece when there is one, otherwise the look-ahead piece.
    #[must_use]
    pub fn peek_piece_after_hold(&self) -> Piece {
        self.held.map_or(self.next, Piece::at_spawn)
    }

    /// Sets the current piece aside.
    ///
    /// The first hold stores the current piece and promotes the look-ahead piece;
    /// later holds swap current and held. Both pieces go back to their spawn
    /// position and keep their orientation. Only one hold is allowed per lock.
    pub fn hold(&mut self) -> Result<(), HoldError> {
        if !self.can_hold {
            return Err(HoldError::HoldAlreadyUsed);
        }
        let stored = self.current.at_spawn();
        self.current = match self.held.replace(stored) {
            Some(held) => held.at_spawn(),
            None => {
                let next = Piece::new(self.source.next_kind());
                std::mem::replace(&mut self.next, next)
            }
        };
        self.can_hold = false;
        Ok(())
    }

    /// Moves the current piece to its landing row and locks it.
    pub fn hard_drop_and_complete(&mut self) -> (ClearedRows, Result<(), CompletePieceDropError>) {
        self.current = self.ghost_piece();
        self.complete_piece_drop()
    }

    /// Locks the current piece where it is, clears full rows and spawns the next piece.
    ///
    /// Hold becomes available again. Returns the cleared rows, and an error when
    /// the new piece overlaps the board (game over).
    pub fn complete_piece_drop(&mut self) -> (ClearedRows, Result<(), CompletePieceDropError>) {
        self.board.fill_piece(&self.current);
        let cleared_rows = self.board.clear_full_rows();

        let next = Piece::new(self.source.next_kind());
        self.current = std::mem::replace(&mut self.next, next);
        self.can_hold = true;

        if self.board.is_colliding(&self.current) {
            return (cleared_rows, Err(CompletePieceDropError::NewPieceCollision));
        }
        (cleared_rows, Ok(()))
    }
}
