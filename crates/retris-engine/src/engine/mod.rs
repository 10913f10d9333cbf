//! Game engine logic and state management.
//!
//! This module builds the gameplay on top of the core data structures:
//!
//! - [`GameField`] - Board, falling piece, look-ahead piece and hold
//! - [`GameSession`] - Timing, scoring, events and the screen-level state machine
//! - [`GameStats`] - Score, lines, level and combo
//! - [`PieceGenerator`] - Seeded uniform piece generation
//! - [`HighScoreStore`] - Persistence seam for the high score
//! - [`AutoPlayConfig`] - Auto-player switch, pacing and difficulty
//!
//! # Game Flow
//!
//! 1. The host creates a [`GameSession`] and feeds it frame time via [`GameSession::update`]
//! 2. The splash screen gives way to the main menu, and the player starts a game
//! 3. Input arrives as [`GameAction`]s (move, rotate, drop, hold, pause)
//! 4. Gravity or a hard drop locks the piece; full rows clear and the next piece spawns
//! 5. Repeat until a new piece overlaps the stack (game over)
//!
//! # Example
//!
//! ```
//! use retris_engine::GameField;
//!
//! let mut field = GameField::new();
//!
//! let piece = field.current_piece().left();
//! field.set_current_piece(piece).ok();
//! field.rotate_current_piece().ok();
//!
//! let (cleared_rows, result) = field.hard_drop_and_complete();
//! assert!(cleared_rows.is_empty());
//! assert!(result.is_ok());
//! ```

pub use self::{
    auto_play_config::*, game_event::*, game_field::*, game_session::*, game_stats::*,
    high_score::*, piece_generator::*,
};

mod auto_play_config;
mod game_event;
mod game_field;
mod game_session;
mod game_stats;
mod high_score;
mod piece_generator;
