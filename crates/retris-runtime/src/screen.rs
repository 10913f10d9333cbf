use std::{fmt, time::Duration};

use crossterm::event::Event;
use ratatui::Frame;

use crate::{App, Runtime};

/// One page of the UI, such as the game itself or a help page shown over it.
///
/// Only the topmost screen of a [`ScreenStack`] receives input, ticks and draw
/// calls. Screens below it are frozen until they are on top again.
///
/// The hooks run in this order:
///
/// ```text
///   pushed or started ─→ on_active ─→ (top of the stack) ─→ on_inactive ─┐
///                            ↑                                           │
///                            └──────── child popped ←─── child pushed ←──┤
///                                                                        │
///                                       popped or exit ─→ on_close ←─────┘
/// ```
///
/// A screen sets the tick rate and render mode it needs in [`on_active`], since
/// the screen it covers may have left different ones behind.
///
/// ```rust
/// use std::time::Duration;
///
/// use crossterm::event::{Event, KeyCode};
/// use ratatui::Frame;
/// use retris_runtime::{RenderMode, Runtime, Screen, ScreenTransition};
///
/// #[derive(Debug, Default)]
/// struct Countdown {
///     left: Duration,
/// }
///
/// impl Screen for Countdown {
///     fn on_active(&mut self, runtime: &mut Runtime) {
///         runtime.set_tick_rate(Some(10.0));
///         runtime.set_render_mode(RenderMode::throttled_from_rate(10.0));
///     }
///
///     fn on_inactive(&mut self, runtime: &mut Runtime) {
///         runtime.set_tick_rate(None);
///     }
///
///     fn on_close(&mut self, _runtime: &mut Runtime) {}
///
///     fn handle_event(&mut self, _runtime: &mut Runtime, event: &Event) -> ScreenTransition {
///         match event.as_key_press_event() {
///             Some(key) if key.code == KeyCode::Esc => ScreenTransition::Pop,
///             _ => ScreenTransition::Stay,
///         }
///     }
///
///     fn update(&mut self, _runtime: &mut Runtime, dt: Duration) {
///         self.left = self.left.saturating_sub(dt);
///     }
///
///     fn draw(&self, frame: &mut Frame) {
///         frame.render_widget(format!("{:.1}", self.left.as_secs_f32()), frame.area());
///     }
/// }
/// ```
///
/// [`on_active`]: Self::on_active
pub trait Screen: fmt::Debug {
    /// The screen is now on top: at startup, when pushed, or when the screen
    /// above it was popped.
    fn on_active(&mut self, runtime: &mut Runtime);

    /// The screen stops being on top. It is either covered by a pushed screen or
    /// about to be closed.
    fn on_inactive(&mut self, runtime: &mut Runtime);

    /// The screen leaves the stack for good (pop or exit). Not called when it is
    /// merely covered.
    fn on_close(&mut self, runtime: &mut Runtime);

    fn handle_event(&mut self, runtime: &mut Runtime, event: &Event) -> ScreenTransition;

    /// Advances the screen by `dt`, the time since the previous tick.
    fn update(&mut self, runtime: &mut Runtime, dt: Duration);

    fn draw(&self, frame: &mut Frame);
}

/// What the stack does after a screen handled an event.
#[derive(Debug)]
pub enum ScreenTransition {
    Stay,
    /// Cover the current screen with a new one.
    Push(Box<dyn Screen>),
    /// Close the current screen and uncover the one below.
    Pop,
    /// Close every screen, top first, and stop the runtime.
    Exit,
}

/// [`App`] made of stacked [`Screen`]s; it exits once the stack is empty.
#[derive(Debug)]
pub struct ScreenStack<'a> {
    screens: Vec<Box<dyn Screen + 'a>>,
}

impl<'a> ScreenStack<'a> {
    #[must_use]
    pub fn new(first: Box<dyn Screen + 'a>) -> Self {
        Self {
            screens: vec![first],
        }
    }

    fn top(&mut self) -> Option<&mut (dyn Screen + 'a)> {
        self.screens.last_mut().map(|screen| &mut **screen)
    }

    fn close_top(&mut self, runtime: &mut Runtime) {
        if let Some(mut screen) = self.screens.pop() {
            screen.on_inactive(runtime);
            screen.on_close(runtime);
        }
    }

    fn apply(&mut self, runtime: &mut Runtime, transition: ScreenTransition) {
        match transition {
            ScreenTransition::Stay => {}
            ScreenTransition::Push(mut screen) => {
                if let Some(covered) = self.top() {
                    covered.on_inactive(runtime);
                }
                screen.on_active(runtime);
                self.screens.push(screen);
            }
            ScreenTransition::Pop => {
                self.close_top(runtime);
                if let Some(uncovered) = self.top() {
                    uncovered.on_active(runtime);
                }
            }
            ScreenTransition::Exit => {
                while !self.screens.is_empty() {
                    self.close_top(runtime);
                }
            }
        }
    }
}

impl App for ScreenStack<'_> {
    fn init(&mut self, runtime: &mut Runtime) {
        if let Some(screen) = self.top() {
            screen.on_active(runtime);
        }
    }

    fn should_exit(&self) -> bool {
        self.screens.is_empty()
    }

    fn handle_event(&mut self, runtime: &mut Runtime, event: Event) {
        if let Some(screen) = self.top() {
            let transition = screen.handle_event(runtime, &event);
            self.apply(runtime, transition);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        if let Some(screen) = self.screens.last() {
            screen.draw(frame);
        }
    }

    fn update(&mut self, runtime: &mut Runtime, dt: Duration) {
        if let Some(screen) = self.top() {
            screen.update(runtime, dt);
        }
    }
}
