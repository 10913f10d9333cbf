//! Property tests for board, piece and session invariants.

use std::time::Duration;

use proptest::prelude::*;
use retris_engine::{
    Board, BoardRow, GameAction, GameField, GameSession, MemoryHighScoreStore, Piece,
    PieceGenerator, PieceKind, PieceSeed,
};

fn piece_kind() -> impl Strategy<Value = PieceKind> {
    prop::sample::select(PieceKind::ALL.to_vec())
}

/// Rows that are either completely full or randomly filled.
fn board() -> impl Strategy<Value = Board> {
    let row = (any::<bool>(), prop::array::uniform10(any::<bool>()));
    prop::collection::vec(row, Board::ROWS).prop_map(|rows| {
        let mut board = Board::EMPTY;
        for (y, (full, cells)) in rows.into_iter().enumerate() {
            for (x, filled) in cells.into_iter().enumerate() {
                if full || filled {
                    board.set_cell(x, y, Some(PieceKind::Z));
                }
            }
        }
        board
    })
}

fn action() -> impl Strategy<Value = GameAction> {
    prop_oneof![
        Just(GameAction::MoveLeft),
        Just(GameAction::MoveRight),
        Just(GameAction::Rotate),
        Just(GameAction::SoftDrop(Duration::from_millis(67))),
        Just(GameAction::HardDrop),
        Just(GameAction::Hold),
    ]
}

proptest! {
    #[test]
    fn four_rotations_in_open_space_restore_the_piece(kind in piece_kind(), x in 2..6_i32, y in 4..14_i32) {
        let board = Board::EMPTY;
        let piece = Piece::new(kind).with_position(x, y);
        let mut rotated = piece;
        for _ in 0..4 {
            rotated = rotated.rotated(&board).unwrap();
            prop_assert_eq!(rotated.position(), piece.position());
        }
        prop_assert_eq!(rotated, piece);
    }

    #[test]
    fn clearing_keeps_partial_rows_in_order(board in board()) {
        let partial_rows: Vec<BoardRow> = board
            .rows()
            .iter()
            .copied()
            .filter(|row| row.iter().any(Option::is_none))
            .collect();
        let full_count = board.count_full_rows();

        let mut cleared = board.clone();
        let rows = cleared.clear_full_rows();
        prop_assert_eq!(rows.len(), full_count);
        prop_assert_eq!(cleared.count_full_rows(), 0);

        // Survivors sit at the bottom in their original order, empties on top
        let (empty, kept) = cleared.rows().split_at(full_count);
        prop_assert!(empty.iter().all(|row| *row == Board::EMPTY_ROW));
        prop_assert_eq!(kept, partial_rows.as_slice());

        prop_assert!(cleared.clear_full_rows().is_empty());
    }

    #[test]
    fn seeded_rollout_keeps_session_consistent(
        seed in any::<[u8; 16]>(),
        actions in prop::collection::vec(action(), 1..300),
    ) {
        let field = GameField::with_source(PieceGenerator::with_seed(PieceSeed::from_bytes(seed)));
        let mut session = GameSession::new(field, MemoryHighScoreStore::new());
        session.update(Duration::from_secs(5));
        session.start_game();

        let mut last_score = 0;
        for action in actions {
            session.apply_action(action);
            session.update(Duration::from_millis(16));

            let stats = session.stats();
            prop_assert!(stats.score() >= last_score);
            last_score = stats.score();
            prop_assert_eq!(stats.level(), 1 + stats.total_cleared_lines() / 10);
            prop_assert_eq!(session.field().board().count_full_rows(), 0);
            prop_assert!(session.high_score() >= stats.score());

            if session.state().is_game_over() {
                break;
            }
            prop_assert!(session.state().is_playing());
            let field = session.field();
            prop_assert!(!field.board().is_colliding(&field.current_piece()));
        }
    }
}
