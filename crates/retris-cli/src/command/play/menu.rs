use derive_more::Display;

/// A fixed list of items with a wrapping cursor.
#[derive(Debug, Clone)]
pub struct Menu<T: 'static> {
    items: &'static [T],
    selected: usize,
}

impl<T: Copy> Menu<T> {
    pub const fn new(items: &'static [T]) -> Self {
        Self { items, selected: 0 }
    }

    pub fn items(&self) -> &'static [T] {
        self.items
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> T {
        self.items[self.selected]
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % self.items.len();
    }

    pub fn select_previous(&mut self) {
        self.selected = self
            .selected
            .checked_sub(1)
            .unwrap_or(self.items.len() - 1);
    }

    pub fn reset(&mut self) {
        self.selected = 0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum MainMenuItem {
    #[display("PLAY GAME")]
    Play,
    #[display("AUTO-PLAY SETTINGS")]
    AutoPlaySettings,
    #[display("HOW TO PLAY")]
    HowToPlay,
    #[display("EXIT")]
    Exit,
}

impl MainMenuItem {
    pub const ALL: [Self; 4] = [
        Self::Play,
        Self::AutoPlaySettings,
        Self::HowToPlay,
        Self::Exit,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum PauseMenuItem {
    #[display("RESUME")]
    Resume,
    #[display("RESTART")]
    Restart,
    #[display("AUTO-PLAY SETTINGS")]
    AutoPlaySettings,
    #[display("QUIT")]
    Quit,
}

impl PauseMenuItem {
    pub const ALL: [Self; 4] = [
        Self::Resume,
        Self::Restart,
        Self::AutoPlaySettings,
        Self::Quit,
    ];
}

/// Rows of the auto-play settings panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SettingsItem {
    #[display("AUTO-PLAY")]
    AutoPlay,
    #[display("AI DIFFICULTY")]
    Difficulty,
    #[display("MOVE DELAY")]
    MoveDelay,
    #[display("BACK")]
    Back,
}

impl SettingsItem {
    pub const ALL: [Self; 4] = [
        Self::AutoPlay,
        Self::Difficulty,
        Self::MoveDelay,
        Self::Back,
    ];
}
