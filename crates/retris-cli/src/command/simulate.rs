use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use log::LevelFilter;
use rand::Rng as _;
use retris_autoplay::{AutoPlayer, placement_evaluator::Weights};
use retris_engine::{
    Difficulty, GameField, GameSession, GameStats, MemoryHighScoreStore, PieceGenerator, PieceSeed,
    SPLASH_TIMEOUT,
};
use serde::Serialize;

use crate::{command::GameArg, logger, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    #[clap(flatten)]
    pub(super) game: GameArg,
    /// Stop after this many pieces have locked
    #[clap(long, default_value_t = 1000)]
    max_pieces: usize,
    /// Output file path for the JSON summary (stdout if not specified)
    #[clap(long)]
    output: Option<PathBuf>,
    /// Log level for messages written to stderr
    #[clap(long, default_value_t = LevelFilter::Warn)]
    log_level: LevelFilter,
}

/// Result of one headless game.
#[derive(Debug, Serialize)]
struct SimulationSummary {
    seed: PieceSeed,
    difficulty: Difficulty,
    weights: Weights,
    game_over: bool,
    score: u32,
    lines: usize,
    level: usize,
    pieces: usize,
    max_combo: u32,
    /// Locks by number of lines cleared at once (index 0-4).
    line_cleared_counter: [usize; 5],
}

impl SimulationSummary {
    fn new(seed: PieceSeed, session: &GameSession) -> Self {
        let stats: &GameStats = session.stats();
        let difficulty = session.auto_play().difficulty();
        Self {
            seed,
            difficulty,
            weights: Weights::for_difficulty(difficulty),
            game_over: session.state().is_game_over(),
            score: stats.score(),
            lines: stats.total_cleared_lines(),
            level: stats.level(),
            pieces: stats.completed_pieces(),
            max_combo: stats.max_combo(),
            line_cleared_counter: *stats.line_cleared_counter(),
        }
    }
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        game,
        max_pieces,
        output,
        log_level,
    } = arg;

    logger::init_stderr(*log_level)?;
    let config = game.load_config()?;
    let seed = config.seed.unwrap_or_else(|| rand::rng().random());

    let start = Instant::now();
    let session = simulate(seed, config.auto_play.difficulty(), *max_pieces);
    log::info!(
        "simulated {} pieces in {:.2?}",
        session.stats().completed_pieces(),
        start.elapsed()
    );

    Output::save_json(&SimulationSummary::new(seed, &session), output.as_deref())
}

/// Plays one game with the auto-player until it ends or `max_pieces` have locked.
fn simulate(seed: PieceSeed, difficulty: Difficulty, max_pieces: usize) -> GameSession {
    let field = GameField::with_source(PieceGenerator::with_seed(seed));
    let mut session = GameSession::new(field, MemoryHighScoreStore::new());
    session.auto_play_mut().set_difficulty(difficulty);
    session.update(SPLASH_TIMEOUT + Duration::from_secs(1));
    session.start_game();
    log::info!("simulating seed {seed} at {difficulty}");

    let mut player = AutoPlayer::new();
    while session.state().is_playing() && session.stats().completed_pieces() < max_pieces {
        if player.play_turn(&mut session).is_none() {
            log::warn!(
                "no placement left after {} pieces",
                session.stats().completed_pieces()
            );
            break;
        }
    }
    session
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: PieceSeed = PieceSeed::from_bytes([7; 16]);

    #[test]
    fn test_same_seed_same_game() {
        let a = simulate(SEED, Difficulty::Medium, 60);
        let b = simulate(SEED, Difficulty::Medium, 60);
        assert_eq!(a.stats(), b.stats());
        assert_eq!(a.field().board(), b.field().board());
    }

    #[test]
    fn test_stops_at_piece_limit() {
        let session = simulate(SEED, Difficulty::Expert, 40);
        assert!(session.stats().completed_pieces() <= 40);
        if session.state().is_playing() {
            assert_eq!(session.stats().completed_pieces(), 40);
        }
    }

    #[test]
    fn test_summary_serializes_seed_as_hex() {
        let session = simulate(SEED, Difficulty::Beginner, 5);
        let json = serde_json::to_value(SimulationSummary::new(SEED, &session)).unwrap();
        assert_eq!(json["seed"], "07070707070707070707070707070707");
        assert_eq!(json["difficulty"], "beginner");
        assert_eq!(json["pieces"], 5);
    }
}
