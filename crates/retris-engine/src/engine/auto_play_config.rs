use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

/// Strength of the auto-player, which scales its evaluation weights.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[display("BEGINNER")]
    Beginner,
    #[default]
    #[display("MEDIUM")]
    Medium,
    #[display("EXPERT")]
    Expert,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Beginner, Self::Medium, Self::Expert];

    /// One level up, saturating at Expert.
    #[must_use]
    pub const fn harder(self) -> Self {
        match self {
            Self::Beginner => Self::Medium,
            Self::Medium | Self::Expert => Self::Expert,
        }
    }

    /// One level down, saturating at Beginner.
    #[must_use]
    pub const fn easier(self) -> Self {
        match self {
            Self::Beginner | Self::Medium => Self::Beginner,
            Self::Expert => Self::Medium,
        }
    }
}

/// Auto-player settings: on/off, pacing and strength.
///
/// The move delay is kept in whole milliseconds and always lies in
/// [`Self::MIN_MOVE_DELAY_MS`]`..=`[`Self::MAX_MOVE_DELAY_MS`]; setters and
/// deserialization clamp out-of-range values.
///
/// ```
/// use std::time::Duration;
///
/// use retris_engine::AutoPlayConfig;
///
/// let mut config = AutoPlayConfig::default();
/// config.set_move_delay_ms(10);
/// assert_eq!(config.move_delay(), Duration::from_millis(50));
///
/// let config: AutoPlayConfig = serde_json::from_str(r#"{"move_delay_ms": 900}"#).unwrap();
/// assert_eq!(config.move_delay_ms(), 500);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoPlayConfig {
    enabled: bool,
    #[serde(deserialize_with = "deserialize_move_delay_ms")]
    move_delay_ms: u32,
    difficulty: Difficulty,
    #[serde(skip)]
    enable_count: u32,
}

impl Default for AutoPlayConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            move_delay_ms: Self::DEFAULT_MOVE_DELAY_MS,
            difficulty: Difficulty::default(),
            enable_count: 0,
        }
    }
}

fn deserialize_move_delay_ms<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let ms = u32::deserialize(deserializer)?;
    Ok(AutoPlayConfig::clamp_move_delay_ms(ms))
}

impl AutoPlayConfig {
    pub const MIN_MOVE_DELAY_MS: u32 = 50;
    pub const MAX_MOVE_DELAY_MS: u32 = 500;
    pub const DEFAULT_MOVE_DELAY_MS: u32 = 200;
    /// Step used by [`Self::faster`] and [`Self::slower`].
    pub const MOVE_DELAY_STEP_MS: u32 = 10;

    const fn clamp_move_delay_ms(ms: u32) -> u32 {
        if ms < Self::MIN_MOVE_DELAY_MS {
            Self::MIN_MOVE_DELAY_MS
        } else if ms > Self::MAX_MOVE_DELAY_MS {
            Self::MAX_MOVE_DELAY_MS
        } else {
            ms
        }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub const fn set_enabled(&mut self, enabled: bool) {
        if enabled && !self.enabled {
            self.enable_count = self.enable_count.wrapping_add(1);
        }
        self.enabled = enabled;
    }

    /// How many times auto-play has been switched on.
    ///
    /// Changes on every off-to-on switch, so a scheduler polling once per frame
    /// still sees a switch that was undone and redone in between.
    #[must_use]
    pub const fn enable_count(&self) -> u32 {
        self.enable_count
    }

    #[must_use]
    pub const fn move_delay_ms(&self) -> u32 {
        self.move_delay_ms
    }

    #[must_use]
    pub fn move_delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.move_delay_ms))
    }

    pub const fn set_move_delay_ms(&mut self, ms: u32) {
        self.move_delay_ms = Self::clamp_move_delay_ms(ms);
    }

    /// Shortens the delay by one step.
    pub const fn faster(&mut self) {
        self.set_move_delay_ms(self.move_delay_ms.saturating_sub(Self::MOVE_DELAY_STEP_MS));
    }

    /// Lengthens the delay by one step.
    pub const fn slower(&mut self) {
        self.set_move_delay_ms(self.move_delay_ms.saturating_add(Self::MOVE_DELAY_STEP_MS));
    }

    #[must_use]
    pub const fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub const fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_steps_are_clamped() {
        let mut config = AutoPlayConfig::default();
        for _ in 0..100 {
            config.faster();
        }
        assert_eq!(config.move_delay_ms(), AutoPlayConfig::MIN_MOVE_DELAY_MS);
        config.slower();
        assert_eq!(config.move_delay_ms(), 60);
        for _ in 0..100 {
            config.slower();
        }
        assert_eq!(config.move_delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_difficulty_steps_saturate() {
        assert_eq!(Difficulty::Expert.harder(), Difficulty::Expert);
        assert_eq!(Difficulty::Beginner.easier(), Difficulty::Beginner);
        assert_eq!(Difficulty::Beginner.harder().harder(), Difficulty::Expert);
        assert_eq!(Difficulty::Expert.easier().easier(), Difficulty::Beginner);
    }

    #[test]
    fn test_enable_count_tracks_switching_on() {
        let mut config = AutoPlayConfig::default();
        config.set_enabled(true);
        config.set_enabled(true);
        assert_eq!(config.enable_count(), 1);
        config.set_enabled(false);
        config.set_enabled(true);
        assert_eq!(config.enable_count(), 2);
    }

    #[test]
    fn test_labels() {
        let labels: Vec<_> = Difficulty::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(labels, ["BEGINNER", "MEDIUM", "EXPERT"]);
    }

    #[test]
    fn test_config_json() {
        let config: AutoPlayConfig =
            serde_json::from_str(r#"{"enabled": true, "difficulty": "expert"}"#).unwrap();
        assert!(config.is_enabled());
        assert_eq!(config.difficulty(), Difficulty::Expert);
        assert_eq!(
            config.move_delay_ms(),
            AutoPlayConfig::DEFAULT_MOVE_DELAY_MS
        );

        let json = serde_json::to_value(AutoPlayConfig::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"enabled": false, "move_delay_ms": 200, "difficulty": "medium"})
        );
    }
}
