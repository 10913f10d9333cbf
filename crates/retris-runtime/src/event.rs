use std::time::Duration;

use crossterm::event::Event;

/// What the event loop hands to the runtime next.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::From)]
pub(super) enum LoopEvent {
    /// Time to advance the app; carries the time since the previous tick.
    #[from(skip)]
    Tick(Duration),
    Render,
    /// Key press, resize or other terminal input.
    Input(Event),
}
