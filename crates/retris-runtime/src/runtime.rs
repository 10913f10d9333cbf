use std::{io, time::Duration};

use crate::{
    App,
    event::LoopEvent,
    event_loop::{EventLoop, RenderMode},
};

/// Drives an [`App`] in the terminal.
///
/// Holds only the loop timing, which screens adjust as they come and go, so it can
/// be created without a terminal (screens get one in tests).
#[derive(Debug, Default)]
pub struct Runtime {
    events: EventLoop,
}

impl Runtime {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticks per second; `None` stops ticks, and with them the app's clock.
    pub fn set_tick_rate(&mut self, rate: Option<f64>) {
        self.events
            .set_tick_interval(rate.map(|rate| Duration::from_secs_f64(rate.recip())));
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.events.set_render_mode(mode);
    }

    /// Takes over the terminal and feeds `app` until it asks to exit.
    ///
    /// Ticks go to [`App::update`], render slots to [`App::draw`] and terminal
    /// input to [`App::handle_event`]. The terminal is restored on return, also
    /// when drawing or reading input fails.
    pub fn run(mut self, app: &mut impl App) -> io::Result<()> {
        app.init(&mut self);
        ratatui::run(|terminal| {
            while !app.should_exit() {
                match self.events.next()? {
                    LoopEvent::Tick(dt) => app.update(&mut self, dt),
                    LoopEvent::Render => {
                        terminal.draw(|frame| app.draw(frame))?;
                    }
                    LoopEvent::Input(event) => app.handle_event(&mut self, event),
                }
            }
            Ok(())
        })
    }
}
