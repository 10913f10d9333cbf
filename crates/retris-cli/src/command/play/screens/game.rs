use std::time::Duration;

use crossterm::event::{Event, KeyCode};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Text},
    widgets::{Block, Padding},
};
use retris_autoplay::AutoPlayer;
use retris_engine::{GameAction, GameSession, SessionState};
use retris_runtime::{RenderMode, Runtime, Screen, ScreenTransition};

use crate::{
    command::play::{
        banner::Banner,
        menu::{MainMenuItem, Menu, PauseMenuItem, SettingsItem},
        screens::HelpScreen,
    },
    ui::widgets::{KeyBinding, KeyBindingDisplay, MenuDisplay, SessionDisplay, color, style},
};

const TICK_RATE: f64 = 60.0;
/// Soft drop time credited per Down key press: one row at 15 rows/s.
const SOFT_DROP_STEP: Duration = Duration::from_millis(67);

const SPLASH_BINDINGS: &[KeyBinding] = &[(&["Any key"], "Continue")];
const MENU_BINDINGS: &[KeyBinding] = &[
    (&["↑", "↓"], "Select"),
    (&["Enter"], "Confirm"),
    (&["Q"], "Quit"),
];
const PLAYING_BINDINGS: &[KeyBinding] = &[
    (&["←", "→"], "Move"),
    (&["↑", "X"], "Rotate"),
    (&["↓"], "Soft Drop"),
    (&["Space"], "Hard Drop"),
    (&["C"], "Hold"),
    (&["P"], "Pause"),
    (&["A"], "Auto-Play"),
    (&["Q"], "Quit"),
];
const AUTO_PLAYING_BINDINGS: &[KeyBinding] = &[
    (&["P"], "Pause"),
    (&["A"], "Take Control"),
    (&["Q"], "Quit"),
];
const PAUSED_BINDINGS: &[KeyBinding] = &[
    (&["↑", "↓"], "Select"),
    (&["Enter"], "Confirm"),
    (&["Esc", "P"], "Resume"),
    (&["A"], "Auto-Play"),
    (&["Q"], "Quit"),
];
const GAME_OVER_BINDINGS: &[KeyBinding] = &[(&["Enter"], "Restart"), (&["Q"], "Quit")];
const SETTINGS_BINDINGS: &[KeyBinding] = &[
    (&["↑", "↓"], "Select"),
    (&["←", "→"], "Adjust"),
    (&["Esc"], "Back"),
];

/// The game itself: splash, menus, play field and the auto-play settings panel.
///
/// Owns the session and the auto-player; everything else only reads the session.
#[derive(Debug)]
pub struct GameScreen {
    session: GameSession,
    auto_player: AutoPlayer,
    main_menu: Menu<MainMenuItem>,
    pause_menu: Menu<PauseMenuItem>,
    settings_menu: Menu<SettingsItem>,
    show_settings: bool,
    banner: Option<Banner>,
}

impl GameScreen {
    pub fn new(session: GameSession) -> Self {
        Self {
            session,
            auto_player: AutoPlayer::new(),
            main_menu: Menu::new(&MainMenuItem::ALL),
            pause_menu: Menu::new(&PauseMenuItem::ALL),
            settings_menu: Menu::new(&SettingsItem::ALL),
            show_settings: false,
            banner: None,
        }
    }

    fn open_settings(&mut self) {
        self.settings_menu.reset();
        self.show_settings = true;
    }

    fn handle_settings_key(&mut self, code: KeyCode) {
        let item = self.settings_menu.selected();
        let config = self.session.auto_play_mut();
        match (item, code) {
            (_, KeyCode::Up) => self.settings_menu.select_previous(),
            (_, KeyCode::Down) => self.settings_menu.select_next(),
            (_, KeyCode::Esc) | (SettingsItem::Back, KeyCode::Enter) => {
                self.show_settings = false;
            }
            (SettingsItem::AutoPlay, KeyCode::Left | KeyCode::Right | KeyCode::Enter) => {
                config.set_enabled(!config.is_enabled());
            }
            (SettingsItem::Difficulty, KeyCode::Left) => {
                config.set_difficulty(config.difficulty().easier());
            }
            (SettingsItem::Difficulty, KeyCode::Right) => {
                config.set_difficulty(config.difficulty().harder());
            }
            (SettingsItem::MoveDelay, KeyCode::Left) => config.faster(),
            (SettingsItem::MoveDelay, KeyCode::Right) => config.slower(),
            _ => {}
        }
    }

    fn handle_main_menu_key(&mut self, code: KeyCode) -> ScreenTransition {
        match code {
            KeyCode::Up => self.main_menu.select_previous(),
            KeyCode::Down => self.main_menu.select_next(),
            KeyCode::Enter => match self.main_menu.selected() {
                MainMenuItem::Play => self.session.start_game(),
                MainMenuItem::AutoPlaySettings => self.open_settings(),
                MainMenuItem::HowToPlay => {
                    return ScreenTransition::Push(Box::new(HelpScreen::new()));
                }
                MainMenuItem::Exit => return ScreenTransition::Exit,
            },
            KeyCode::Char('q') => return ScreenTransition::Exit,
            _ => {}
        }
        ScreenTransition::Stay
    }

    fn handle_playing_key(&mut self, code: KeyCode) -> ScreenTransition {
        let action = match code {
            KeyCode::Left => GameAction::MoveLeft,
            KeyCode::Right => GameAction::MoveRight,
            KeyCode::Up | KeyCode::Char('x') => GameAction::Rotate,
            KeyCode::Down => GameAction::SoftDrop(SOFT_DROP_STEP),
            KeyCode::Char(' ') => GameAction::HardDrop,
            KeyCode::Char('c') => GameAction::Hold,
            KeyCode::Char('p') => {
                self.pause_menu.reset();
                GameAction::Pause
            }
            KeyCode::Char('a') => GameAction::ToggleAutoPlay,
            KeyCode::Char('q') => return ScreenTransition::Exit,
            _ => return ScreenTransition::Stay,
        };
        self.session.apply_action(action);
        ScreenTransition::Stay
    }

    fn handle_paused_key(&mut self, code: KeyCode) -> ScreenTransition {
        match code {
            KeyCode::Up => self.pause_menu.select_previous(),
            KeyCode::Down => self.pause_menu.select_next(),
            KeyCode::Enter => match self.pause_menu.selected() {
                PauseMenuItem::Resume => self.session.apply_action(GameAction::Resume),
                PauseMenuItem::Restart => self.session.apply_action(GameAction::Restart),
                PauseMenuItem::AutoPlaySettings => self.open_settings(),
                PauseMenuItem::Quit => return ScreenTransition::Exit,
            },
            KeyCode::Esc => self.session.apply_action(GameAction::Resume),
            KeyCode::Char('p') => self.session.apply_action(GameAction::Pause),
            KeyCode::Char('a') => self.session.apply_action(GameAction::ToggleAutoPlay),
            KeyCode::Char('q') => return ScreenTransition::Exit,
            _ => {}
        }
        ScreenTransition::Stay
    }

    fn handle_game_over_key(&mut self, code: KeyCode) -> ScreenTransition {
        match code {
            KeyCode::Enter => self.session.apply_action(GameAction::Restart),
            KeyCode::Char('q') => return ScreenTransition::Exit,
            _ => {}
        }
        ScreenTransition::Stay
    }

    fn collect_events(&mut self, dt: Duration) {
        if let Some(banner) = &mut self.banner
            && !banner.tick(dt)
        {
            self.banner = None;
        }
        for event in self.session.drain_events() {
            log::trace!("game event: {event:?}");
            if let Some(banner) = Banner::for_event(&event) {
                self.banner = Some(banner);
            }
        }
    }

    fn key_bindings(&self) -> &'static [KeyBinding<'static>] {
        if self.show_settings {
            return SETTINGS_BINDINGS;
        }
        match self.session.state() {
            SessionState::Splash => SPLASH_BINDINGS,
            SessionState::MainMenu => MENU_BINDINGS,
            SessionState::Playing if self.session.auto_play().is_enabled() => {
                AUTO_PLAYING_BINDINGS
            }
            SessionState::Playing => PLAYING_BINDINGS,
            SessionState::Paused => PAUSED_BINDINGS,
            SessionState::GameOver => GAME_OVER_BINDINGS,
        }
    }

    fn draw_splash(&self, frame: &mut Frame, area: Rect) {
        let title_style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
        let text = Text::from(vec![
            Line::styled("R E T R I S", title_style),
            Line::default(),
            Line::styled("a falling-block puzzle", Style::new().fg(color::GRAY)),
            Line::default(),
            Line::styled(
                format!("HIGH SCORE {}", self.session.high_score()),
                Style::new().fg(color::YELLOW),
            ),
        ])
        .centered();
        frame.render_widget(text, area.centered_vertically(Constraint::Length(5)));
    }

    fn draw_main_menu(&self, frame: &mut Frame, area: Rect) {
        let menu = MenuDisplay::new(self.main_menu.items(), self.main_menu.selected_index())
            .block(menu_block("RETRIS"));
        let [menu_area, score_area] = Layout::vertical([
            Constraint::Length(menu.height()),
            Constraint::Length(1),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area.centered_horizontally(Constraint::Length(menu.width())));
        frame.render_widget(menu, menu_area);
        frame.render_widget(
            Line::styled(
                format!("HIGH SCORE {}", self.session.high_score()),
                Style::new().fg(color::YELLOW),
            )
            .centered(),
            score_area,
        );
    }

    fn draw_session(&self, frame: &mut Frame, area: Rect) {
        let [banner_area, session_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(area);
        let session_display = SessionDisplay::new(&self.session, true);
        let board_area = session_display.board_area(session_area);
        frame.render_widget(&session_display, session_area);

        if let Some(banner) = &self.banner {
            frame.render_widget(
                Line::styled(banner.text(), banner.style().add_modifier(Modifier::BOLD))
                    .centered(),
                banner_area,
            );
        }

        if self.session.state().is_paused() && !self.show_settings {
            let menu = MenuDisplay::new(self.pause_menu.items(), self.pause_menu.selected_index())
                .block(menu_block("PAUSED"));
            let menu_area = board_area.centered(
                Constraint::Length(menu.width()),
                Constraint::Length(menu.height()),
            );
            frame.render_widget(menu, menu_area);
        }
    }

    fn draw_settings(&self, frame: &mut Frame, area: Rect) {
        let config = self.session.auto_play();
        let values = SettingsItem::ALL.map(|item| match item {
            SettingsItem::AutoPlay => {
                Some(if config.is_enabled() { "ON" } else { "OFF" }.to_owned())
            }
            SettingsItem::Difficulty => Some(config.difficulty().to_string()),
            SettingsItem::MoveDelay => Some(format!("{}ms", config.move_delay_ms())),
            SettingsItem::Back => None,
        });
        let menu = MenuDisplay::new(
            self.settings_menu.items(),
            self.settings_menu.selected_index(),
        )
        .values(values)
        .block(menu_block("AUTO-PLAY SETTINGS"));
        let menu_area = area.centered(
            Constraint::Length(menu.width()),
            Constraint::Length(menu.height()),
        );
        frame.render_widget(menu, menu_area);
    }
}

fn menu_block(title: &str) -> Block<'_> {
    Block::bordered()
        .title(Line::from(title).centered())
        .padding(Padding::symmetric(1, 0))
        .border_style(Style::new().fg(color::YELLOW))
        .style(style::DEFAULT)
}

impl Screen for GameScreen {
    fn on_active(&mut self, runtime: &mut Runtime) {
        runtime.set_tick_rate(Some(TICK_RATE));
        runtime.set_render_mode(RenderMode::throttled_from_rate(TICK_RATE));
    }

    fn on_inactive(&mut self, runtime: &mut Runtime) {
        // The game stands still while another screen is on top
        runtime.set_tick_rate(None);
    }

    fn on_close(&mut self, _runtime: &mut Runtime) {
        self.session.persist_high_score();
    }

    fn handle_event(&mut self, _runtime: &mut Runtime, event: &Event) -> ScreenTransition {
        let Some(key) = event.as_key_press_event() else {
            return ScreenTransition::Stay;
        };
        if self.show_settings {
            self.handle_settings_key(key.code);
            return ScreenTransition::Stay;
        }
        match self.session.state() {
            SessionState::Splash => {
                _ = self.session.acknowledge_splash();
                ScreenTransition::Stay
            }
            SessionState::MainMenu => self.handle_main_menu_key(key.code),
            SessionState::Playing => self.handle_playing_key(key.code),
            SessionState::Paused => self.handle_paused_key(key.code),
            SessionState::GameOver => self.handle_game_over_key(key.code),
        }
    }

    fn update(&mut self, _runtime: &mut Runtime, dt: Duration) {
        self.session.update(dt);
        _ = self.auto_player.update(&mut self.session, dt);
        self.collect_events(dt);
    }

    fn draw(&self, frame: &mut Frame) {
        let [main_area, help_area] =
            Layout::vertical([Constraint::Length(24), Constraint::Length(1)])
                .flex(Flex::Center)
                .areas::<2>(frame.area());

        match self.session.state() {
            SessionState::Splash => self.draw_splash(frame, main_area),
            SessionState::MainMenu => self.draw_main_menu(frame, main_area),
            SessionState::Playing | SessionState::Paused | SessionState::GameOver => {
                self.draw_session(frame, main_area);
            }
        }
        if self.show_settings {
            self.draw_settings(frame, main_area);
        }
        frame.render_widget(KeyBindingDisplay::new(self.key_bindings()), help_area);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEvent;
    use retris_engine::{
        Difficulty, GameField, MemoryHighScoreStore, PieceKind, PieceSequence, SPLASH_MIN_DURATION,
    };
    use retris_runtime::{App as _, ScreenStack};

    use super::*;

    fn screen_with_store(store: MemoryHighScoreStore) -> GameScreen {
        let field = GameField::with_source(PieceSequence::new([PieceKind::T, PieceKind::O]));
        GameScreen::new(GameSession::new(field, store))
    }

    fn screen() -> GameScreen {
        screen_with_store(MemoryHighScoreStore::new())
    }

    fn press(screen: &mut GameScreen, code: KeyCode) -> ScreenTransition {
        let mut runtime = Runtime::new();
        screen.handle_event(&mut runtime, &Event::Key(KeyEvent::from(code)))
    }

    fn playing_screen() -> GameScreen {
        let mut screen = screen();
        screen.update(&mut Runtime::new(), SPLASH_MIN_DURATION);
        press(&mut screen, KeyCode::Enter);
        press(&mut screen, KeyCode::Enter);
        assert_eq!(screen.session.state(), SessionState::Playing);
        screen
    }

    #[test]
    fn test_splash_needs_minimum_time() {
        let mut screen = screen();
        press(&mut screen, KeyCode::Enter);
        assert_eq!(screen.session.state(), SessionState::Splash);

        screen.update(&mut Runtime::new(), SPLASH_MIN_DURATION);
        press(&mut screen, KeyCode::Char('k'));
        assert_eq!(screen.session.state(), SessionState::MainMenu);
    }

    #[test]
    fn test_main_menu_items() {
        let mut screen = screen();
        screen.update(&mut Runtime::new(), Duration::from_secs(5));
        assert_eq!(screen.session.state(), SessionState::MainMenu);

        press(&mut screen, KeyCode::Down);
        press(&mut screen, KeyCode::Down);
        assert!(matches!(
            press(&mut screen, KeyCode::Enter),
            ScreenTransition::Push(_)
        ));
        press(&mut screen, KeyCode::Down);
        assert!(matches!(
            press(&mut screen, KeyCode::Enter),
            ScreenTransition::Exit
        ));
    }

    #[test]
    fn test_soft_drop_key_moves_one_row() {
        let mut screen = playing_screen();
        assert_eq!(screen.session.field().current_piece().y(), 0);
        press(&mut screen, KeyCode::Down);
        assert_eq!(screen.session.field().current_piece().y(), 1);
    }

    #[test]
    fn test_pause_menu() {
        let mut screen = playing_screen();
        press(&mut screen, KeyCode::Char(' '));
        assert_eq!(screen.session.stats().completed_pieces(), 1);

        press(&mut screen, KeyCode::Char('p'));
        assert_eq!(screen.session.state(), SessionState::Paused);
        press(&mut screen, KeyCode::Esc);
        assert_eq!(screen.session.state(), SessionState::Playing);

        press(&mut screen, KeyCode::Char('p'));
        press(&mut screen, KeyCode::Down);
        press(&mut screen, KeyCode::Enter);
        assert_eq!(screen.session.state(), SessionState::Playing);
        assert_eq!(screen.session.stats().completed_pieces(), 0);
    }

    #[test]
    fn test_settings_panel_adjusts_auto_play() {
        let mut screen = playing_screen();
        press(&mut screen, KeyCode::Char('p'));
        press(&mut screen, KeyCode::Up);
        press(&mut screen, KeyCode::Up);
        press(&mut screen, KeyCode::Enter);
        assert!(screen.show_settings);

        press(&mut screen, KeyCode::Right);
        assert!(screen.session.auto_play().is_enabled());
        press(&mut screen, KeyCode::Down);
        press(&mut screen, KeyCode::Right);
        press(&mut screen, KeyCode::Right);
        assert_eq!(screen.session.auto_play().difficulty(), Difficulty::Expert);
        press(&mut screen, KeyCode::Down);
        press(&mut screen, KeyCode::Left);
        assert_eq!(screen.session.auto_play().move_delay_ms(), 190);

        press(&mut screen, KeyCode::Esc);
        assert!(!screen.show_settings);
        assert_eq!(screen.session.state(), SessionState::Paused);
    }

    #[test]
    fn test_auto_play_ignores_piece_keys() {
        let mut screen = playing_screen();
        press(&mut screen, KeyCode::Char('a'));
        let before = screen.session.field().current_piece();
        press(&mut screen, KeyCode::Left);
        press(&mut screen, KeyCode::Char(' '));
        assert_eq!(screen.session.field().current_piece(), before);
        assert_eq!(screen.session.stats().completed_pieces(), 0);

        let delay = screen.session.auto_play().move_delay();
        screen.update(&mut Runtime::new(), delay);
        assert_eq!(screen.session.stats().completed_pieces(), 1);
    }

    #[test]
    fn test_close_saves_high_score() {
        let store = MemoryHighScoreStore::with_score(500);
        let mut screen = screen_with_store(store.clone());
        screen.on_close(&mut Runtime::new());
        assert_eq!(store.saved_scores(), [500, 500]);
    }

    #[test]
    fn test_help_page_returns_to_main_menu() {
        let store = MemoryHighScoreStore::with_score(500);
        let mut stack = ScreenStack::new(Box::new(screen_with_store(store.clone())));
        let mut runtime = Runtime::new();
        let key = |code: KeyCode| Event::Key(KeyEvent::from(code));

        stack.init(&mut runtime);
        stack.update(&mut runtime, Duration::from_secs(5));
        stack.handle_event(&mut runtime, key(KeyCode::Down));
        stack.handle_event(&mut runtime, key(KeyCode::Down));
        stack.handle_event(&mut runtime, key(KeyCode::Enter));

        // Any key leaves the help page; 'q' must not reach the game yet
        stack.handle_event(&mut runtime, key(KeyCode::Char('q')));
        assert!(!stack.should_exit());
        assert_eq!(store.saved_scores(), [500]);

        stack.handle_event(&mut runtime, key(KeyCode::Char('q')));
        assert!(stack.should_exit());
        assert_eq!(store.saved_scores(), [500, 500]);
    }
}
