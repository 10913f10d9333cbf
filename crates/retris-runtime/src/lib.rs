//! Frame loop for the retris terminal UI.
//!
//! [`Runtime`] owns the terminal and turns time and input into calls on an [`App`]:
//! ticks carry the time elapsed since the previous tick, renders are throttled by a
//! [`RenderMode`], and terminal events are forwarded as they arrive.
//! [`ScreenStack`] is an [`App`] that routes everything to the topmost [`Screen`].

pub use self::{
    app::App,
    event_loop::RenderMode,
    runtime::Runtime,
    screen::{Screen, ScreenStack, ScreenTransition},
};

mod app;
mod event;
mod event_loop;
mod runtime;
mod screen;
