use std::time::Duration;

use serde::Serialize;

/// Base points for line clears, indexed by the number of lines cleared at once.
///
/// Multiplied by the current level, then by the combo bonus.
const SCORE_TABLE: [u32; 5] = [0, 100, 300, 500, 800];

const LINES_PER_LEVEL: usize = 10;
const INITIAL_GRAVITY_MILLIS: u64 = 1000;
const GRAVITY_STEP_MILLIS: u64 = 100;
const MIN_GRAVITY_MILLIS: u64 = 100;

/// Outcome of scoring one locked piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DropScore {
    pub cleared_lines: usize,
    pub points: u32,
    /// Combo counter after this lock.
    pub combo: u32,
    pub leveled_up: bool,
}

impl DropScore {
    #[must_use]
    pub fn is_tetris(&self) -> bool {
        self.cleared_lines == 4
    }
}

/// Score, line count, and combo tracking for one game.
///
/// Level and gravity delay are derived from the line count and never stored.
///
/// # Scoring
///
/// - 1/2/3/4 lines: 100/300/500/800 points, multiplied by the level at the time of the lock
/// - Each lock that clears at least one line increments the combo; any other lock resets it
/// - From the second consecutive clear on, points are multiplied by `1 + 0.1 × combo`
///
/// # Example
///
/// ```
/// use retris_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(1);
/// stats.complete_piece_drop(1);
///
/// assert_eq!(stats.score(), 100 + 120);
/// assert_eq!(stats.combo(), 2);
/// assert_eq!(stats.line_cleared_counter()[1], 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameStats {
    score: u32,
    total_cleared_lines: usize,
    combo: u32,
    max_combo: u32,
    completed_pieces: usize,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            total_cleared_lines: 0,
            combo: 0,
            max_combo: 0,
            completed_pieces: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Returns `1 + lines / 10`.
    #[must_use]
    pub const fn level(&self) -> usize {
        level_for_lines(self.total_cleared_lines)
    }

    /// Returns the gravity delay for the current level.
    #[must_use]
    pub const fn gravity_delay(&self) -> Duration {
        gravity_delay_for_level(self.level())
    }

    #[must_use]
    pub const fn combo(&self) -> u32 {
        self.combo
    }

    #[must_use]
    pub const fn max_combo(&self) -> u32 {
        self.max_combo
    }

    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    /// Returns a histogram of locks by the number of lines they cleared (index 0-4).
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Scores one locked piece that cleared `cleared_lines` rows.
    pub fn complete_piece_drop(&mut self, cleared_lines: usize) -> DropScore {
        self.completed_pieces += 1;
        if let Some(count) = self.line_cleared_counter.get_mut(cleared_lines) {
            *count += 1;
        }

        if cleared_lines == 0 {
            self.combo = 0;
            return DropScore {
                cleared_lines,
                points: 0,
                combo: 0,
                leveled_up: false,
            };
        }

        let level_before = self.level();
        self.combo += 1;
        self.max_combo = self.max_combo.max(self.combo);

        let base = SCORE_TABLE[cleared_lines.min(SCORE_TABLE.len() - 1)];
        let level = u32::try_from(level_before).unwrap_or(u32::MAX);
        let mut points = base.saturating_mul(level);
        if self.combo > 1 {
            // Integer form of `points × (1 + 0.1 × combo)`
            points = points.saturating_mul(10 + self.combo) / 10;
        }

        self.score = self.score.saturating_add(points);
        self.total_cleared_lines += cleared_lines;

        DropScore {
            cleared_lines,
            points,
            combo: self.combo,
            leveled_up: self.level() > level_before,
        }
    }
}

#[must_use]
pub const fn level_for_lines(lines: usize) -> usize {
    1 + lines / LINES_PER_LEVEL
}

/// Returns `max(0.1 s, 1.0 s - (level - 1) × 0.1 s)`.
#[must_use]
pub const fn gravity_delay_for_level(level: usize) -> Duration {
    let step = (level.saturating_sub(1) as u64).saturating_mul(GRAVITY_STEP_MILLIS);
    let millis = INITIAL_GRAVITY_MILLIS.saturating_sub(step);
    let millis = if millis < MIN_GRAVITY_MILLIS {
        MIN_GRAVITY_MILLIS
    } else {
        millis
    };
    Duration::from_millis(millis)
}
