//! TOML persistence for key bindings.
//!
//! The whole binding set is one file, rewritten on every save:
//!
//! ```toml
//! [[groups]]
//! label = "Keyboard"
//!
//! [[groups.bindings]]
//! action = "Up"
//! display_name = "Up"
//! source = { type = "keyboard_key", code = 82 }
//! ```

use std::path::{Path, PathBuf};

use keybind_core::{BindingGroup, BindingPersistence, PersistError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::config::{config_dir, write_creating_dirs, ConfigError};

#[derive(Debug, Default, Serialize, Deserialize)]
struct BindingsFile {
    #[serde(default)]
    groups: Vec<BindingGroup>,
}

/// Saves and loads binding groups as a TOML file.
#[derive(Debug, Clone)]
pub struct TomlBindingPersistence {
    path: PathBuf,
}

impl TomlBindingPersistence {
    /// Persists to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Persists to `bindings.toml` in the platform config directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoPlatformConfigDir`] if the directory cannot be
    /// determined.
    pub fn in_config_dir() -> Result<Self, ConfigError> {
        Ok(Self::new(config_dir()?.join("bindings.toml")))
    }

    /// The file this instance reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the saved groups; an absent file yields no groups.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] or [`ConfigError::Parse`].
    pub fn load_bindings(&self) -> Result<Vec<BindingGroup>, ConfigError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let file: BindingsFile = toml::from_str(&content)?;
                debug!(path = %self.path.display(), groups = file.groups.len(), "bindings loaded");
                Ok(file.groups)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(ConfigError::Io {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    fn write(&self, groups: &[BindingGroup]) -> Result<(), ConfigError> {
        let file = BindingsFile {
            groups: groups.to_vec(),
        };
        let content = toml::to_string_pretty(&file)?;
        write_creating_dirs(&self.path, &content)
    }
}

impl BindingPersistence for TomlBindingPersistence {
    fn save_bindings(&mut self, groups: &[BindingGroup]) -> Result<(), PersistError> {
        self.write(groups)
            .map_err(|e| PersistError(e.to_string()))?;
        info!(path = %self.path.display(), groups = groups.len(), "bindings written");
        Ok(())
    }
}
