use super::game_stats::DropScore;

/// Cue raised by the session for audio and presentation layers.
///
/// Events queue up inside [`GameSession`](super::GameSession) until the host drains
/// them with [`GameSession::drain_events`](super::GameSession::drain_events).
/// Nothing in the engine waits on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum GameEvent {
    Moved,
    /// The falling piece changed orientation (never raised for the O-piece).
    Rotated,
    Held,
    Locked,
    /// One to three lines were cleared.
    LinesCleared(DropScore),
    /// Four lines were cleared at once.
    Tetris(DropScore),
    LevelUp {
        level: usize,
    },
    /// The running score passed the stored high score for the first time this game.
    NewHighScore {
        score: u32,
    },
    GameOver {
        score: u32,
    },
}
