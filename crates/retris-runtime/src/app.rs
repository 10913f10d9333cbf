use std::time::Duration;

use crossterm::event::Event;
use ratatui::Frame;

use crate::Runtime;

/// Something [`Runtime::run`] can drive. [`ScreenStack`](crate::ScreenStack) is the
/// usual one.
pub trait App {
    /// Runs once before the first event; the place to pick tick rate and render mode.
    fn init(&mut self, runtime: &mut Runtime);

    /// Checked before every event; `true` ends [`Runtime::run`].
    fn should_exit(&self) -> bool;

    fn handle_event(&mut self, runtime: &mut Runtime, event: Event);

    fn draw(&self, frame: &mut Frame);

    /// Advances the app by `dt`, the time since the previous tick.
    fn update(&mut self, runtime: &mut Runtime, dt: Duration);
}
