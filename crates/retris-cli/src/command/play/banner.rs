use std::time::Duration;

use ratatui::style::{Color, Style};
use retris_engine::GameEvent;

const BANNER_DURATION: Duration = Duration::from_millis(1500);

/// Short-lived message shown above the board after notable game events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    text: String,
    style: Style,
    remaining: Duration,
}

impl Banner {
    fn new(text: impl Into<String>, fg: Color) -> Self {
        Self {
            text: text.into(),
            style: Style::new().fg(fg),
            remaining: BANNER_DURATION,
        }
    }

    /// Returns the banner announcing `event`, if it deserves one.
    ///
    /// Movement, rotation, hold and plain locks are sound cues only.
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        let banner = match event {
            GameEvent::Tetris(score) => Self::new(format!("TETRIS! +{}", score.points), Color::Cyan),
            GameEvent::LinesCleared(score) if score.combo > 1 => Self::new(
                format!("COMBO x{} +{}", score.combo, score.points),
                Color::Magenta,
            ),
            GameEvent::LinesCleared(score) => Self::new(format!("+{}", score.points), Color::White),
            GameEvent::LevelUp { level } => Self::new(format!("LEVEL {level}"), Color::Green),
            GameEvent::NewHighScore { .. } => Self::new("NEW HIGH SCORE!", Color::Yellow),
            GameEvent::GameOver { score } => Self::new(format!("FINAL SCORE {score}"), Color::Red),
            GameEvent::Moved | GameEvent::Rotated | GameEvent::Held | GameEvent::Locked => {
                return None;
            }
        };
        Some(banner)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn style(&self) -> Style {
        self.style
    }

    /// Counts down; returns `false` once the banner has expired.
    pub fn tick(&mut self, dt: Duration) -> bool {
        self.remaining = self.remaining.saturating_sub(dt);
        !self.remaining.is_zero()
    }
}
