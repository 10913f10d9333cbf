use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::{Color, Style},
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};
use retris_engine::{GameSession, SessionState};

use crate::ui::widgets::{BoardDisplay, PieceDisplay, StatsDisplay, color, style};

/// Board, hold and next previews, and statistics for a session.
#[derive(Debug)]
pub struct SessionDisplay<'a> {
    session: &'a GameSession,
    show_ghost: bool,
    horizontal_padding: u16,
    vertical_padding: u16,
}

impl<'a> SessionDisplay<'a> {
    pub fn new(session: &'a GameSession, show_ghost: bool) -> Self {
        Self {
            session,
            show_ghost,
            horizontal_padding: 1,
            vertical_padding: 0,
        }
    }

    /// Returns the area the board is drawn in, for overlays.
    pub fn board_area(&self, area: Rect) -> Rect {
        self.layout(area).board
    }

    fn border_color(&self) -> Color {
        match self.session.state() {
            SessionState::Playing if self.session.auto_play().is_enabled() => color::MAGENTA,
            SessionState::Playing => color::WHITE,
            SessionState::Paused => color::YELLOW,
            SessionState::GameOver => color::RED,
            SessionState::Splash | SessionState::MainMenu => color::GRAY,
        }
    }

    fn panel(&self, title: &'a str) -> Block<'a> {
        Block::bordered()
            .title(Line::from(title).centered())
            .padding(Padding::symmetric(
                self.horizontal_padding,
                self.vertical_padding,
            ))
            .border_style(self.border_color())
            .style(style::DEFAULT)
    }

    fn panels(&self) -> Panels<'a> {
        let field = self.session.field();
        let playing = self.session.state().is_playing();

        let game_board = {
            let widget = BoardDisplay::new(field.board()).block(
                Block::bordered()
                    .border_style(self.border_color())
                    .style(style::DEFAULT),
            );
            if playing || self.session.state().is_paused() {
                let widget = widget.falling_piece(field.current_piece());
                if self.show_ghost {
                    widget.ghost(field.ghost_piece())
                } else {
                    widget
                }
            } else {
                widget
            }
        };
        let hold_panel = {
            let panel = PieceDisplay::new()
                .dimmed(!field.can_hold())
                .block(self.panel("HOLD"));
            if let Some(piece) = field.held_piece() {
                panel.piece(piece.kind())
            } else {
                panel
            }
        };
        let next_panel = PieceDisplay::new()
            .piece(field.next_piece().kind())
            .block(self.panel("NEXT"));
        let stats = StatsDisplay::new(self.session).block(self.panel("STATS"));
        Panels {
            game_board,
            hold_panel,
            next_panel,
            stats,
        }
    }

    fn layout(&self, area: Rect) -> SessionLayout {
        let Panels {
            game_board,
            hold_panel,
            next_panel,
            stats,
        } = self.panels();

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(u16::max(hold_panel.width(), stats.width())),
            Constraint::Length(game_board.width()),
            Constraint::Length(next_panel.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [hold, stats_area] = Layout::vertical([
            Constraint::Length(hold_panel.height()),
            Constraint::Length(stats.height()),
        ])
        .spacing(1)
        .areas(left_column);
        let hold = hold.layout::<1>(
            &Layout::horizontal([Constraint::Length(hold_panel.width())]).flex(Flex::End),
        )[0];
        let stats_area = stats_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(stats.width())]).flex(Flex::End),
        )[0];

        let [board] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(center_column);
        let [next] =
            Layout::vertical([Constraint::Length(next_panel.height())]).areas(right_column);

        SessionLayout {
            board,
            hold,
            next,
            stats: stats_area,
        }
    }
}

struct Panels<'a> {
    game_board: BoardDisplay<'a>,
    hold_panel: PieceDisplay<'a>,
    next_panel: PieceDisplay<'a>,
    stats: StatsDisplay<'a>,
}

struct SessionLayout {
    board: Rect,
    hold: Rect,
    next: Rect,
    stats: Rect,
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let layout = self.layout(area);
        let panels = self.panels();
        panels.hold_panel.render(layout.hold, buf);
        panels.stats.render(layout.stats, buf);
        panels.game_board.render(layout.board, buf);
        panels.next_panel.render(layout.next, buf);

        if self.session.state().is_game_over() {
            let style = Style::new().fg(color::WHITE).bg(color::RED);
            let block = Block::new().style(style);
            let text = Text::from(vec![
                Line::from("GAME OVER!!"),
                Line::from(format!("SCORE {}", self.session.stats().score())),
            ])
            .style(style)
            .centered();
            let popup = layout
                .board
                .centered(Constraint::Length(layout.board.width), Constraint::Length(4));
            let inner = block.inner(popup);
            Clear.render(popup, buf);
            block.render(popup, buf);
            text.render(inner.centered_vertically(Constraint::Length(2)), buf);
        }
    }
}
