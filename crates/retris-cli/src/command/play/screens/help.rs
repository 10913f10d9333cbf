use std::time::Duration;

use crossterm::event::Event;
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::{Line, Text},
    widgets::{Block, Padding, Paragraph},
};
use retris_runtime::{RenderMode, Runtime, Screen, ScreenTransition};

use crate::ui::widgets::{KeyBinding, KeyBindingDisplay, style};

const RULES: &[&str] = &[
    "Pieces fall into a 10 x 20 well.",
    "Fill a whole row to clear it; rows above drop down.",
    "1 / 2 / 3 / 4 rows score 100 / 300 / 500 / 800 x level.",
    "Clearing on consecutive pieces builds a combo bonus.",
    "Every 10 lines raises the level and the fall speed.",
    "Hold sets the current piece aside, once per piece.",
    "Auto-play lets the AI drive; tune it in the settings.",
];

const CONTROLS: &[(&str, &str)] = &[
    ("← →", "Move"),
    ("↑ / X", "Rotate"),
    ("↓", "Soft drop"),
    ("Space", "Hard drop"),
    ("C", "Hold"),
    ("P", "Pause"),
    ("Esc", "Resume"),
    ("Enter", "Restart after game over"),
    ("A", "Toggle auto-play"),
    ("Q", "Quit"),
];

const BINDINGS: &[KeyBinding] = &[(&["Esc", "Enter", "Q"], "Back")];

/// "How to Play" page, pushed over the game screen.
#[derive(Debug, Default)]
pub struct HelpScreen;

impl HelpScreen {
    pub fn new() -> Self {
        Self
    }
}

impl Screen for HelpScreen {
    fn on_active(&mut self, runtime: &mut Runtime) {
        runtime.set_tick_rate(None);
        runtime.set_render_mode(RenderMode::OnDirty);
    }

    fn on_inactive(&mut self, _runtime: &mut Runtime) {}

    fn on_close(&mut self, _runtime: &mut Runtime) {}

    fn handle_event(&mut self, _runtime: &mut Runtime, event: &Event) -> ScreenTransition {
        if event.as_key_press_event().is_some() {
            ScreenTransition::Pop
        } else {
            ScreenTransition::Stay
        }
    }

    fn update(&mut self, _runtime: &mut Runtime, _dt: Duration) {}

    fn draw(&self, frame: &mut Frame) {
        let mut lines: Vec<Line> = RULES.iter().map(|rule| Line::from(*rule)).collect();
        lines.push(Line::default());
        lines.extend(CONTROLS.iter().map(|(keys, action)| {
            Line::from(format!("{keys:>7}  {action}"))
        }));

        let height = u16::try_from(lines.len()).unwrap_or(u16::MAX) + 2;
        let [page_area, help_area] =
            Layout::vertical([Constraint::Length(height), Constraint::Length(1)])
                .areas::<2>(frame.area().centered_horizontally(Constraint::Length(64)));

        let page = Paragraph::new(Text::from(lines)).style(style::DEFAULT).block(
            Block::bordered()
                .title(Line::from("HOW TO PLAY").centered())
                .padding(Padding::horizontal(1))
                .border_style(Style::new().fg(Color::Cyan)),
        );
        frame.render_widget(page, page_area);
        frame.render_widget(KeyBindingDisplay::new(BINDINGS), help_area);
    }
}
