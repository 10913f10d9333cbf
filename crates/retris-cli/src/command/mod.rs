use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use retris_engine::{Difficulty, PieceSeed};

use crate::config::GameConfig;

use self::{play::PlayArg, simulate::SimulateArg};

mod play;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play in the terminal (default)
    Play(#[clap(flatten)] PlayArg),
    /// Run the auto-player without a terminal and print a JSON summary
    Simulate(#[clap(flatten)] SimulateArg),
}

/// Options shared by every mode that starts a game.
#[derive(Default, Debug, Clone, clap::Args)]
struct GameArg {
    /// Game configuration file (JSON format)
    #[clap(long)]
    config: Option<PathBuf>,
    /// Piece generator seed (32 hex characters)
    #[clap(long)]
    seed: Option<PieceSeed>,
    /// Auto-player difficulty
    #[clap(long, value_enum)]
    difficulty: Option<DifficultyArg>,
}

impl GameArg {
    /// Loads the configuration file, if any, and applies command line overrides.
    fn load_config(&self) -> anyhow::Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(difficulty) = self.difficulty {
            config.auto_play.set_difficulty(difficulty.into());
        }
        Ok(config)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DifficultyArg {
    Beginner,
    Medium,
    Expert,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Beginner => Self::Beginner,
            DifficultyArg::Medium => Self::Medium,
            DifficultyArg::Expert => Self::Expert,
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Simulate(arg) => simulate::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_play() {
        let args = CommandArgs::try_parse_from(["retris"]).unwrap();
        assert!(args.mode.is_none());
    }

    #[test]
    fn test_flags_override_config() {
        let args = CommandArgs::try_parse_from([
            "retris",
            "simulate",
            "--seed",
            "000102030405060708090a0b0c0d0e0f",
            "--difficulty",
            "expert",
        ])
        .unwrap();
        let Some(Mode::Simulate(arg)) = args.mode else {
            panic!("expected simulate mode");
        };
        let config = arg.game.load_config().unwrap();
        assert_eq!(
            config.seed.map(|seed| seed.to_string()).as_deref(),
            Some("000102030405060708090a0b0c0d0e0f")
        );
        assert_eq!(config.auto_play.difficulty(), Difficulty::Expert);
    }

    #[test]
    fn test_invalid_seed_is_rejected() {
        let result = CommandArgs::try_parse_from(["retris", "play", "--seed", "xyz"]);
        assert!(result.is_err());
    }
}
