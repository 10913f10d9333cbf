use std::{
    fmt, io,
    sync::{Arc, Mutex, PoisonError},
};

/// Persistence seam for the single high-score value.
pub trait HighScoreStore: fmt::Debug + Send {
    /// Reads the stored high score.
    fn load(&mut self) -> Result<u32, HighScoreError>;

    /// Replaces the stored high score.
    fn save(&mut self, score: u32) -> Result<(), HighScoreError>;
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum HighScoreError {
    #[display("high score storage failed: {_0}")]
    Io(io::Error),
    #[display("high score record has {_0} bytes, expected 4")]
    #[from(skip)]
    Corrupt(#[error(not(source))] usize),
}

/// In-memory store, for headless runs and tests.
///
/// Clones share the same value, so a test can keep a handle to a store it has
/// given away.
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScoreStore {
    saved: Arc<Mutex<Vec<u32>>>,
}

impl MemoryHighScoreStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_score(score: u32) -> Self {
        Self {
            saved: Arc::new(Mutex::new(vec![score])),
        }
    }

    /// Every value saved so far, oldest first.
    #[must_use]
    pub fn saved_scores(&self) -> Vec<u32> {
        self.saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn load(&mut self) -> Result<u32, HighScoreError> {
        let saved = self.saved.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(saved.last().copied().unwrap_or(0))
    }

    fn save(&mut self, score: u32) -> Result<(), HighScoreError> {
        self.saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(score);
        Ok(())
    }
}
