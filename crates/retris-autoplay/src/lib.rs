//! Heuristic auto-player for retris.
//!
//! The auto-player is built in three levels:
//!
//! 1. **Placement Evaluation** ([`placement_evaluator`]) - Scores one placement from
//!    the board it produces: aggregate height, complete lines, holes and bumpiness,
//!    weighted per [`Difficulty`](retris_engine::Difficulty).
//!
//! 2. **Turn Evaluation** ([`turn_evaluator`]) - Searches every rotation and column for
//!    the current piece, and decides whether holding is worth it.
//!
//! 3. **Scheduling** ([`AutoPlayer`]) - Plays one turn per configured delay through the
//!    same session controls a human uses.
//!
//! # Architecture
//!
//! ```text
//! AutoPlayer (timer, difficulty from the session)
//!     ↓ uses
//! TurnEvaluator (search + hold decision)
//!     ↓ uses
//! PlacementEvaluator (score single placement)
//! ```
//!
//! # Supporting Modules
//!
//! - [`board_analysis`] - Lazy-evaluated board metrics
//! - [`placement_analysis`] - Board metrics after merging a candidate placement

pub use self::auto_player::AutoPlayer;

mod auto_player;
pub mod board_analysis;
pub mod placement_analysis;
pub mod placement_evaluator;
pub mod turn_evaluator;
