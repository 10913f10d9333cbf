use std::time::Duration;

use retris_engine::GameSession;

use crate::{
    placement_evaluator::HeuristicPlacementEvaluator,
    turn_evaluator::{TurnEvaluator, TurnPlan},
};

/// Plays the session's current piece on a timer.
///
/// The auto-player keeps no game state of its own besides the move timer. Its
/// settings (enabled flag, delay, difficulty) live in the session's
/// [`AutoPlayConfig`](retris_engine::AutoPlayConfig) so the UI can change them.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use retris_autoplay::AutoPlayer;
/// use retris_engine::{GameField, GameSession, MemoryHighScoreStore};
///
/// let mut session = GameSession::new(GameField::new(), MemoryHighScoreStore::new());
/// session.update(Duration::from_secs(5));
/// session.start_game();
/// session.toggle_auto_play();
///
/// let mut player = AutoPlayer::new();
/// let delay = session.auto_play().move_delay();
/// assert!(player.update(&mut session, delay / 2).is_none());
/// assert!(player.update(&mut session, delay / 2).is_some());
/// ```
#[derive(Debug, Default)]
pub struct AutoPlayer {
    timer: Duration,
    seen_enable_count: u32,
}

impl AutoPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the move timer and plays one turn once the configured delay has passed.
    ///
    /// Does nothing unless auto-play is enabled and the game is in progress. The timer
    /// restarts after every turn and whenever auto-play is switched on.
    pub fn update(&mut self, session: &mut GameSession, dt: Duration) -> Option<TurnPlan> {
        let config = session.auto_play();
        if config.enable_count() != self.seen_enable_count {
            self.seen_enable_count = config.enable_count();
            self.timer = Duration::ZERO;
        }
        if !config.is_enabled() || !session.state().is_playing() {
            return None;
        }

        self.timer += dt;
        if self.timer < session.auto_play().move_delay() {
            return None;
        }
        self.timer = Duration::ZERO;
        self.play_turn(session)
    }

    /// Chooses and carries out one turn immediately, ignoring the timer.
    ///
    /// Returns the plan that was carried out, or `None` when the game is not in
    /// progress or no placement exists.
    pub fn play_turn(&mut self, session: &mut GameSession) -> Option<TurnPlan> {
        if !session.state().is_playing() {
            return None;
        }
        let difficulty = session.auto_play().difficulty();
        let evaluator =
            TurnEvaluator::new(Box::new(HeuristicPlacementEvaluator::for_difficulty(difficulty)));
        let Some(plan) = evaluator.select_best_turn(session.field()) else {
            log::debug!(
                "auto-play: no placement for {:?}",
                session.field().current_piece().kind()
            );
            return None;
        };

        match &plan {
            TurnPlan::Hold => log::debug!(
                "auto-play: hold {:?}",
                session.field().current_piece().kind()
            ),
            TurnPlan::Place(candidate) => log::debug!(
                "auto-play: {:?} rotations={} column={} score={:.3}",
                candidate.placement.kind(),
                candidate.rotations,
                candidate.column(),
                candidate.score
            ),
        }
        if let Err(e) = plan.apply(session) {
            log::debug!("auto-play: turn refused: {e}");
        }
        Some(plan)
    }
}
