//! Game rules for retris: pieces, board, scoring, timing and the session state machine.
//!
//! The crate is headless. [`GameSession`] is driven by elapsed time and
//! [`GameAction`]s, and reports back through its accessors and [`GameEvent`]s.
//! Rendering, input and persistence live with the host.
//!
//! - [`core`] - Board and piece geometry
//! - [`engine`] - Playfield, scoring, piece generation and the game session

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("piece colliding when setting falling piece")]
pub struct PieceCollisionError;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum HoldError {
    #[display("hold already used in this turn")]
    HoldAlreadyUsed,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum CompletePieceDropError {
    #[display("new piece colliding when completing piece drop")]
    NewPieceCollision,
}
