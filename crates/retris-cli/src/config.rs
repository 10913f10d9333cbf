use std::path::{Path, PathBuf};

use retris_engine::{AutoPlayConfig, PieceSeed};
use serde::{Deserialize, Serialize};

use crate::util;

pub const DEFAULT_HIGH_SCORE_FILE: &str = "data/highscore.dat";

/// Settings read from `--config`. Every field is optional in the file.
///
/// ```json
/// {
///   "seed": "000102030405060708090a0b0c0d0e0f",
///   "high_score_file": "data/highscore.dat",
///   "auto_play": { "enabled": true, "move_delay_ms": 120, "difficulty": "expert" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub seed: Option<PieceSeed>,
    pub high_score_file: PathBuf,
    pub auto_play: AutoPlayConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            high_score_file: PathBuf::from(DEFAULT_HIGH_SCORE_FILE),
            auto_play: AutoPlayConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let config: Self = util::read_json_file("config", path)?;
        log::debug!("loaded config from {}: {config:?}", path.display());
        Ok(config)
    }
}
