//! Board and piece model: the grid of locked cells, piece shapes, collision,
//! rotation with wall kicks, and drop resolution.

pub use self::{board::*, piece::*};

pub(crate) mod board;
pub(crate) mod piece;
