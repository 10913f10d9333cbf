use std::path::PathBuf;

use log::LevelFilter;
use rand::Rng as _;
use retris_engine::{GameField, GameSession, PieceGenerator};
use retris_runtime::{Runtime, ScreenStack};

use crate::{command::GameArg, high_score::FileHighScoreStore, logger};

use self::screens::GameScreen;

mod banner;
mod menu;
mod screens;

const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    #[clap(flatten)]
    game: GameArg,
    /// High score file (overrides the config file)
    #[clap(long)]
    high_score_file: Option<PathBuf>,
    /// Start with auto-play enabled
    #[clap(long)]
    auto_play: bool,
    /// Write log messages to this file
    #[clap(long)]
    log_file: Option<PathBuf>,
    /// Log level for the log file
    #[clap(long, default_value_t = DEFAULT_LOG_LEVEL)]
    log_level: LevelFilter,
}

// `LevelFilter` has no `Default`; this mirrors the clap defaults above.
impl Default for PlayArg {
    fn default() -> Self {
        Self {
            game: GameArg::default(),
            high_score_file: None,
            auto_play: false,
            log_file: None,
            log_level: DEFAULT_LOG_LEVEL,
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        game,
        high_score_file,
        auto_play,
        log_file,
        log_level,
    } = arg;

    if let Some(log_file) = log_file {
        logger::init_file(log_file, *log_level)?;
    }

    let mut config = game.load_config()?;
    if let Some(path) = high_score_file {
        config.high_score_file.clone_from(path);
    }
    if *auto_play {
        config.auto_play.set_enabled(true);
    }

    let seed = config.seed.unwrap_or_else(|| rand::rng().random());
    log::info!(
        "starting game: seed={seed} high_score_file={}",
        config.high_score_file.display()
    );
    let field = GameField::with_source(PieceGenerator::with_seed(seed));
    let session = GameSession::new(field, FileHighScoreStore::new(&config.high_score_file))
        .with_auto_play(config.auto_play);

    let mut app = ScreenStack::new(Box::new(GameScreen::new(session)));
    Runtime::new().run(&mut app)?;
    log::info!("exiting");
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;

    use crate::command::{CommandArgs, Mode};

    use super::*;

    #[test]
    fn test_default_matches_bare_play_command() {
        let args = CommandArgs::try_parse_from(["retris", "play"]).unwrap();
        let Some(Mode::Play(parsed)) = args.mode else {
            panic!("expected play mode");
        };
        let default = PlayArg::default();
        assert_eq!(default.log_level, LevelFilter::Info);
        assert_eq!(default.log_level, parsed.log_level);
        assert_eq!(default.auto_play, parsed.auto_play);
        assert_eq!(default.high_score_file, parsed.high_score_file);
        assert_eq!(default.log_file, parsed.log_file);
        assert_eq!(default.game.config, parsed.game.config);
        assert_eq!(default.game.difficulty, parsed.game.difficulty);
    }
}
