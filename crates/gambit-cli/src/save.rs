//! Save files: one JSON game snapshot per name inside a save directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use gambit_core::GameSnapshot;
use tracing::info;

use crate::error::{CliError, InputError};

/// A directory of named save files.
#[derive(Debug, Clone)]
pub struct SaveStore {
    dir: PathBuf,
}

impl SaveStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the save called `name`.
    ///
    /// # Errors
    ///
    /// [`InputError::BadSaveName`] unless `name` is non-empty and made only of
    /// ASCII letters, digits, `-` and `_`.
    pub fn path_for(&self, name: &str) -> Result<PathBuf, InputError> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(InputError::BadSaveName {
                name: name.to_string(),
            });
        }
        Ok(self.dir.join(format!("{name}.json")))
    }

    /// Write `snapshot` under `name`, creating the directory if needed.
    /// Returns the path written.
    pub fn save(&self, name: &str, snapshot: &GameSnapshot) -> Result<PathBuf, CliError> {
        let path = self.path_for(name)?;
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&path, json)?;
        info!(path = %path.display(), "game saved");
        Ok(path)
    }

    /// Read the snapshot saved under `name`.
    ///
    /// The snapshot is only decoded here; [`Game::restore`](gambit_core::Game::restore)
    /// validates it.
    pub fn load(&self, name: &str) -> Result<GameSnapshot, CliError> {
        let path = self.path_for(name)?;
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(CliError::SaveNotFound {
                    name: name.to_string(),
                });
            }
            Err(err) => return Err(err.into()),
        };
        let snapshot = serde_json::from_str(&json)?;
        info!(path = %path.display(), "game loaded");
        Ok(snapshot)
    }
}

impl Default for SaveStore {
    fn default() -> Self {
        Self::new("saves")
    }
}
