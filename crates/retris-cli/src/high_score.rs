use std::{fs, io::ErrorKind, path::PathBuf};

use retris_engine::{HighScoreError, HighScoreStore};

/// High score kept in a file as a single little-endian `u32`.
///
/// A missing file reads as 0. The parent directory is created on the first save.
#[derive(Debug, Clone)]
pub struct FileHighScoreStore {
    path: PathBuf,
}

impl FileHighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn load(&mut self) -> Result<u32, HighScoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        let bytes: [u8; 4] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| HighScoreError::Corrupt(bytes.len()))?;
        Ok(u32::from_le_bytes(bytes))
    }

    fn save(&mut self, score: u32) -> Result<(), HighScoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, score.to_le_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("retris-{name}-{}", std::process::id()));
        _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_missing_file_reads_zero() {
        let dir = scratch_dir("missing");
        let mut store = FileHighScoreStore::new(dir.join("highscore.dat"));
        assert_eq!(store.load().unwrap(), 0);
    }

    #[test]
    fn test_save_creates_directory_and_round_trips() {
        let dir = scratch_dir("save");
        let path = dir.join("data").join("highscore.dat");
        let mut store = FileHighScoreStore::new(&path);
        store.save(4321).unwrap();

        assert_eq!(fs::read(&path).unwrap(), 4321_u32.to_le_bytes());
        assert_eq!(FileHighScoreStore::new(&path).load().unwrap(), 4321);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_wrong_length_is_corrupt() {
        let dir = scratch_dir("corrupt");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("highscore.dat");
        fs::write(&path, [1, 2, 3]).unwrap();

        let err = FileHighScoreStore::new(&path).load().unwrap_err();
        assert!(matches!(err, HighScoreError::Corrupt(3)));
        fs::remove_dir_all(&dir).unwrap();
    }
}
