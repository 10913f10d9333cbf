mod command;
mod config;
mod high_score;
mod logger;
mod ui;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
