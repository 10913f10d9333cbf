use std::{time::Duration, vec};

use crate::{
    HoldError, PieceCollisionError,
    core::board::ClearedRows,
};

use super::{
    AutoPlayConfig, GameEvent, GameStats,
    game_field::GameField,
    game_stats::DropScore,
    high_score::HighScoreStore,
};

/// Splash screen gives way to the main menu on its own after this long.
pub const SPLASH_TIMEOUT: Duration = Duration::from_secs(4);
/// Input skips the splash screen only once it has been shown this long.
pub const SPLASH_MIN_DURATION: Duration = Duration::from_secs(1);

/// Soft drop speed in rows per second.
const SOFT_DROP_ROWS_PER_SEC: f32 = 15.0;
/// While soft-dropping, gravity time advances this many times faster.
const SOFT_DROP_GRAVITY_FACTOR: u32 = 10;

/// Screen-level state of a session.
///
/// ```text
/// Splash → MainMenu → Playing ⇄ Paused
///                        ↓         ↓ restart
///                     GameOver → Playing (restart)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum SessionState {
    Splash,
    MainMenu,
    Playing,
    Paused,
    GameOver,
}

/// Discrete input intents accepted by [`GameSession::apply_action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    MoveLeft,
    MoveRight,
    Rotate,
    /// Soft drop held for the given frame time.
    SoftDrop(Duration),
    HardDrop,
    Hold,
    /// Toggles between playing and paused.
    Pause,
    Resume,
    Restart,
    ToggleAutoPlay,
}

impl GameAction {
    /// Actions that steer the falling piece; ignored while auto-play is driving.
    #[must_use]
    pub fn is_piece_control(self) -> bool {
        matches!(
            self,
            Self::MoveLeft
                | Self::MoveRight
                | Self::Rotate
                | Self::SoftDrop(_)
                | Self::HardDrop
                | Self::Hold
        )
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum SessionError {
    #[display("game is not in progress")]
    #[from(skip)]
    NotPlaying,
    #[display("{_0}")]
    PieceCollision(PieceCollisionError),
    #[display("{_0}")]
    Hold(HoldError),
}

/// What happened when a piece locked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockReport {
    pub score: DropScore,
    pub cleared_rows: ClearedRows,
    pub game_over: bool,
}

/// One player's game: the playfield plus timing, scoring, state machine and events.
///
/// The host owns the session, feeds it elapsed time through [`Self::update`] and
/// input through [`Self::apply_action`], and reads it back for rendering. Gameplay
/// operations such as [`Self::try_move_left`] act only in [`SessionState::Playing`].
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use retris_engine::{
///     GameAction, GameField, GameSession, MemoryHighScoreStore, PieceKind, PieceSequence,
///     SessionState,
/// };
///
/// let field = GameField::with_source(PieceSequence::repeat(PieceKind::O));
/// let mut session = GameSession::new(field, MemoryHighScoreStore::new());
/// assert!(session.state().is_splash());
///
/// session.update(Duration::from_secs(5));
/// assert!(session.state().is_main_menu());
///
/// session.start_game();
/// session.apply_action(GameAction::HardDrop);
/// assert_eq!(session.stats().completed_pieces(), 1);
/// assert_eq!(session.state(), SessionState::Playing);
/// ```
#[derive(Debug)]
pub struct GameSession {
    state: SessionState,
    field: GameField,
    stats: GameStats,
    gravity_timer: Duration,
    soft_drop_row: f32,
    soft_dropping: bool,
    splash_elapsed: Duration,
    high_score: u32,
    high_score_beaten: bool,
    high_score_store: Box<dyn HighScoreStore>,
    auto_play: AutoPlayConfig,
    events: Vec<GameEvent>,
}

impl GameSession {
    /// Creates a session on the splash screen.
    ///
    /// Reads the high score once; a failed read counts as 0.
    #[must_use]
    pub fn new(field: GameField, high_score_store: impl HighScoreStore + 'static) -> Self {
        let mut high_score_store: Box<dyn HighScoreStore> = Box::new(high_score_store);
        let high_score = high_score_store.load().unwrap_or_else(|e| {
            log::warn!("failed to load high score, starting from 0: {e}");
            0
        });
        let soft_drop_row = row_as_f32(field.current_piece().y());
        Self {
            state: SessionState::Splash,
            field,
            stats: GameStats::new(),
            gravity_timer: Duration::ZERO,
            soft_drop_row,
            soft_dropping: false,
            splash_elapsed: Duration::ZERO,
            high_score,
            high_score_beaten: false,
            high_score_store,
            auto_play: AutoPlayConfig::default(),
            events: vec![],
        }
    }

    #[must_use]
    pub fn with_auto_play(self, auto_play: AutoPlayConfig) -> Self {
        Self { auto_play, ..self }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn field(&self) -> &GameField {
        &self.field
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    #[must_use]
    pub fn auto_play(&self) -> &AutoPlayConfig {
        &self.auto_play
    }

    pub fn auto_play_mut(&mut self) -> &mut AutoPlayConfig {
        &mut self.auto_play
    }

    #[must_use]
    pub fn gravity_timer(&self) -> Duration {
        self.gravity_timer
    }

    /// Takes every event raised since the last call.
    pub fn drain_events(&mut self) -> vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    /// Advances timers by one frame.
    ///
    /// On the splash screen this counts toward [`SPLASH_TIMEOUT`]; while playing it
    /// runs gravity. Other states ignore time.
    pub fn update(&mut self, dt: Duration) {
        match self.state {
            SessionState::Splash => {
                self.splash_elapsed += dt;
                if self.splash_elapsed >= SPLASH_TIMEOUT {
                    self.state = SessionState::MainMenu;
                }
            }
            SessionState::Playing => self.apply_gravity(dt),
            SessionState::MainMenu | SessionState::Paused | SessionState::GameOver => {}
        }
    }

    /// Leaves the splash screen in response to input.
    ///
    /// Returns `false` (and stays) if the splash has not been up for
    /// [`SPLASH_MIN_DURATION`] yet.
    pub fn acknowledge_splash(&mut self) -> bool {
        if self.state.is_splash() && self.splash_elapsed >= SPLASH_MIN_DURATION {
            self.state = SessionState::MainMenu;
            return true;
        }
        false
    }

    /// Starts a fresh game from the main menu.
    pub fn start_game(&mut self) {
        if self.state.is_main_menu() {
            self.reset_game();
        }
    }

    /// Starts a fresh game from the pause menu or the game-over screen.
    pub fn restart(&mut self) {
        if self.state.is_paused() || self.state.is_game_over() {
            self.reset_game();
        }
    }

    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            SessionState::Playing => SessionState::Paused,
            SessionState::Paused => SessionState::Playing,
            state => state,
        };
    }

    pub fn resume(&mut self) {
        if self.state.is_paused() {
            self.state = SessionState::Playing;
        }
    }

    pub fn toggle_auto_play(&mut self) {
        let enabled = !self.auto_play.is_enabled();
        self.auto_play.set_enabled(enabled);
        log::debug!("auto-play {}", if enabled { "enabled" } else { "disabled" });
    }

    /// Applies one input intent.
    ///
    /// Piece controls are dropped while auto-play is enabled. Refused moves
    /// (collisions, hold already used, wrong state) are ignored.
    pub fn apply_action(&mut self, action: GameAction) {
        if action.is_piece_control() && self.auto_play.is_enabled() {
            return;
        }
        match action {
            GameAction::MoveLeft => {
                _ = self.try_move_left();
            }
            GameAction::MoveRight => {
                _ = self.try_move_right();
            }
            GameAction::Rotate => {
                _ = self.try_rotate();
            }
            GameAction::SoftDrop(dt) => {
                _ = self.soft_drop(dt);
            }
            GameAction::HardDrop => {
                _ = self.hard_drop();
            }
            GameAction::Hold => {
                _ = self.try_hold();
            }
            GameAction::Pause => self.toggle_pause(),
            GameAction::Resume => self.resume(),
            GameAction::Restart => self.restart(),
            GameAction::ToggleAutoPlay => self.toggle_auto_play(),
        }
    }

    pub fn try_move_left(&mut self) -> Result<(), SessionError> {
        self.try_shift(-1)
    }

    pub fn try_move_right(&mut self) -> Result<(), SessionError> {
        self.try_shift(1)
    }

    fn try_shift(&mut self, dx: i32) -> Result<(), SessionError> {
        self.ensure_playing()?;
        let piece = self.field.current_piece().moved(dx, 0);
        self.field.set_current_piece(piece)?;
        self.events.push(GameEvent::Moved);
        Ok(())
    }

    /// Rotates clockwise with wall kicks.
    ///
    /// A rotation that finds no free offset leaves the piece as it was and returns
    /// an error.
    pub fn try_rotate(&mut self) -> Result<(), SessionError> {
        self.ensure_playing()?;
        let before = self.field.current_piece();
        self.field.rotate_current_piece()?;
        let after = self.field.current_piece();
        if after.mask() != before.mask() {
            self.events.push(GameEvent::Rotated);
        }
        if after.y() != before.y() {
            self.soft_drop_row = row_as_f32(after.y());
        }
        Ok(())
    }

    /// Swaps in the held or look-ahead piece at its spawn position.
    ///
    /// A swapped-in piece that overlaps the stack ends the game, the same as a
    /// spawn after a lock.
    pub fn try_hold(&mut self) -> Result<(), SessionError> {
        self.ensure_playing()?;
        self.field.hold()?;
        self.soft_drop_row = row_as_f32(self.field.current_piece().y());
        self.events.push(GameEvent::Held);
        let field = &self.field;
        if field.board().is_colliding(&field.current_piece()) {
            self.enter_game_over();
        }
        Ok(())
    }

    /// Moves the piece down at soft-drop speed for `dt`.
    ///
    /// The fractional row accumulates across frames and the piece follows its
    /// integer part, stopping on the landing row. Gravity also runs faster, so a
    /// landed piece locks soon after.
    #[expect(clippy::cast_possible_truncation)]
    pub fn soft_drop(&mut self, dt: Duration) -> Result<(), SessionError> {
        self.ensure_playing()?;
        let piece = self.field.current_piece();
        if self.soft_drop_row.floor() as i32 != piece.y() {
            self.soft_drop_row = row_as_f32(piece.y());
        }
        self.soft_drop_row += dt.as_secs_f32() * SOFT_DROP_ROWS_PER_SEC;

        let landing_row = piece.drop_row(self.field.board());
        let mut row = self.soft_drop_row.floor() as i32;
        if row >= landing_row {
            row = landing_row;
            self.soft_drop_row = row_as_f32(landing_row);
        }
        if row != piece.y() {
            self.field.set_current_piece(piece.with_position(piece.x(), row))?;
        }

        self.gravity_timer += dt * SOFT_DROP_GRAVITY_FACTOR;
        self.soft_dropping = true;
        Ok(())
    }

    /// Drops the piece to its landing row and locks it.
    pub fn hard_drop(&mut self) -> Result<LockReport, SessionError> {
        self.ensure_playing()?;
        let (cleared_rows, result) = self.field.hard_drop_and_complete();
        Ok(self.finish_lock(cleared_rows, result.is_err()))
    }

    /// Saves the high score; call when the host quits.
    pub fn persist_high_score(&mut self) {
        if let Err(e) = self.high_score_store.save(self.high_score) {
            log::warn!("failed to save high score: {e}");
        }
    }

    fn ensure_playing(&self) -> Result<(), SessionError> {
        if self.state.is_playing() {
            Ok(())
        } else {
            Err(SessionError::NotPlaying)
        }
    }

    fn reset_game(&mut self) {
        self.field.reset();
        self.stats = GameStats::new();
        self.gravity_timer = Duration::ZERO;
        self.soft_drop_row = row_as_f32(self.field.current_piece().y());
        self.soft_dropping = false;
        self.high_score_beaten = false;
        self.events.clear();
        self.state = SessionState::Playing;
        log::info!(
            "game started (auto-play {}, {})",
            if self.auto_play.is_enabled() { "on" } else { "off" },
            self.auto_play.difficulty()
        );
    }

    fn apply_gravity(&mut self, dt: Duration) {
        if !std::mem::take(&mut self.soft_dropping) {
            self.soft_drop_row = row_as_f32(self.field.current_piece().y());
        }

        self.gravity_timer += dt;
        if self.gravity_timer < self.stats.gravity_delay() {
            return;
        }
        self.gravity_timer = Duration::ZERO;

        let piece = self.field.current_piece().down();
        if self.field.set_current_piece(piece).is_ok() {
            self.soft_drop_row = row_as_f32(piece.y());
            return;
        }
        let (cleared_rows, result) = self.field.complete_piece_drop();
        self.finish_lock(cleared_rows, result.is_err());
    }

    fn finish_lock(&mut self, cleared_rows: ClearedRows, game_over: bool) -> LockReport {
        let score = self.stats.complete_piece_drop(cleared_rows.len());
        self.events.push(GameEvent::Locked);
        if score.cleared_lines > 0 {
            self.events.push(if score.is_tetris() {
                GameEvent::Tetris(score)
            } else {
                GameEvent::LinesCleared(score)
            });
        }
        if score.leveled_up {
            let level = self.stats.level();
            log::debug!("level up: {level}");
            self.events.push(GameEvent::LevelUp { level });
        }
        if self.stats.score() > self.high_score {
            self.record_high_score();
        }
        self.soft_drop_row = row_as_f32(self.field.current_piece().y());

        if game_over {
            self.enter_game_over();
        }
        LockReport {
            score,
            cleared_rows,
            game_over,
        }
    }

    fn record_high_score(&mut self) {
        self.high_score = self.stats.score();
        if !std::mem::replace(&mut self.high_score_beaten, true) {
            log::info!("new high score: {}", self.high_score);
            self.events.push(GameEvent::NewHighScore {
                score: self.high_score,
            });
        }
        self.persist_high_score();
    }

    fn enter_game_over(&mut self) {
        let score = self.stats.score();
        log::info!(
            "game over: score {score}, lines {}, pieces {}",
            self.stats.total_cleared_lines(),
            self.stats.completed_pieces()
        );
        self.state = SessionState::GameOver;
        self.auto_play.set_enabled(false);
        self.events.push(GameEvent::GameOver { score });
    }
}

#[expect(clippy::cast_precision_loss)]
fn row_as_f32(row: i32) -> f32 {
    row as f32
}
