use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event;

use crate::event::LoopEvent;

/// When the loop asks the app to draw.
#[derive(Debug, Clone, Copy, Default)]
pub enum RenderMode {
    /// Draw once after anything changed: a tick or terminal input.
    #[default]
    OnDirty,
    /// Like [`Self::OnDirty`], but at most once per interval. Changes in between
    /// share one draw.
    Throttled(Duration),
}

impl RenderMode {
    /// [`Self::Throttled`] capped at `rate` frames per second.
    #[must_use]
    pub fn throttled_from_rate(rate: f64) -> Self {
        Self::Throttled(Duration::from_secs_f64(rate.recip()))
    }
}

/// Blocking source of ticks, render slots and terminal input.
///
/// Without a tick interval no ticks are produced, and with nothing dirty under
/// [`RenderMode::OnDirty`] the loop just waits for input.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Option<Duration>,
    render_mode: RenderMode,
    last_tick: Option<Instant>,
    last_render: Option<Instant>,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    pub fn new() -> Self {
        Self {
            tick_interval: None,
            render_mode: RenderMode::default(),
            last_tick: None,
            last_render: None,
            // The first frame is drawn before any input
            dirty: true,
        }
    }

    /// `None` stops ticks. Time spent without ticks is not reported once they resume.
    pub(super) fn set_tick_interval(&mut self, interval: Option<Duration>) {
        if interval.is_none() {
            self.last_tick = None;
        }
        self.tick_interval = interval;
    }

    pub(super) fn set_render_mode(&mut self, render_mode: RenderMode) {
        self.render_mode = render_mode;
    }

    /// Blocks until a tick or render is due, or terminal input arrives.
    pub(super) fn next(&mut self) -> io::Result<LoopEvent> {
        loop {
            let now = Instant::now();
            if let Some(event) = self.poll_timers(now) {
                return Ok(event);
            }

            if let Some(timeout) = self.next_deadline(now)
                && !event::poll(timeout)?
            {
                continue;
            }

            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }

    /// The tick or render due at `now`, ticks first.
    ///
    /// The first tick after ticks are enabled reports one interval; later ticks
    /// report the real time since the previous one.
    fn poll_timers(&mut self, now: Instant) -> Option<LoopEvent> {
        if let Some(interval) = self.tick_interval {
            let elapsed = self
                .last_tick
                .map_or(interval, |last| now.duration_since(last));
            if elapsed >= interval {
                self.last_tick = Some(now);
                self.dirty = true;
                return Some(LoopEvent::Tick(elapsed));
            }
        }

        let render_due = self.dirty
            && match self.render_mode {
                RenderMode::OnDirty => true,
                RenderMode::Throttled(interval) => self
                    .last_render
                    .is_none_or(|last| now.duration_since(last) >= interval),
            };
        if render_due {
            self.last_render = Some(now);
            self.dirty = false;
            return Some(LoopEvent::Render);
        }
        None
    }

    /// How long to wait for input before the next tick or render is due.
    ///
    /// `None` means nothing is scheduled.
    fn next_deadline(&self, now: Instant) -> Option<Duration> {
        let tick_at = self
            .tick_interval
            .map(|interval| self.last_tick.map_or(now, |last| last + interval));
        let render_at = self.dirty.then(|| match self.render_mode {
            RenderMode::OnDirty => now,
            RenderMode::Throttled(interval) => {
                self.last_render.map_or(now, |last| last + interval)
            }
        });
        let due = tick_at.into_iter().chain(render_at).min()?;
        Some(due.saturating_duration_since(now))
    }
}
