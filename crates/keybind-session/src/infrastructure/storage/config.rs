//! TOML-based configuration for the key binding menu.
//!
//! Reads and writes [`MenuConfig`] in the platform-appropriate config directory:
//! - Windows:  `%APPDATA%\KeyBind\menu.toml`
//! - Linux:    `~/.config/keybind/menu.toml`
//! - macOS:    `~/Library/Application Support/KeyBind/menu.toml`
//!
//! Every field has a serde default, so an empty or partial file (or no file at
//! all) yields a working menu.  Example:
//!
//! ```toml
//! heading = "Key Bindings"
//! screen_width = 800
//!
//! [[cancel_sources]]
//! type = "mouse_button"
//! id = 3
//! ```

use std::path::{Path, PathBuf};

use keybind_core::domain::binding::mouse;
use keybind_core::InputSource;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Failures reading or writing the menu config and binding files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("malformed TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value could not be serialized to TOML.
    #[error("could not encode TOML: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema ─────────────────────────────────────────────────────────────

/// Texts and layout of the key binding menu.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuConfig {
    /// Title suffix; the menu shows `"<device> - <heading>"`.
    #[serde(default = "default_heading")]
    pub heading: String,
    /// Group label that identifies the keyboard.
    #[serde(default = "default_keyboard_label")]
    pub keyboard_label: String,
    /// Help text while browsing.
    #[serde(default = "default_choose_prompt")]
    pub choose_prompt: String,
    /// Help text while waiting for a key.
    #[serde(default = "default_enter_prompt")]
    pub enter_prompt: String,
    /// Fixed number of binding slots per action; derived from `screen_width` if absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_rows: Option<usize>,
    /// Width of the game screen in pixels.
    #[serde(default = "default_screen_width")]
    pub screen_width: u32,
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Inputs that abort a capture instead of being bound.
    #[serde(default = "default_cancel_sources")]
    pub cancel_sources: Vec<InputSource>,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_heading() -> String {
    "Key Bindings".to_string()
}
fn default_keyboard_label() -> String {
    keybind_core::domain::defaults::KEYBOARD_LABEL.to_string()
}
fn default_choose_prompt() -> String {
    "Please select a key to edit".to_string()
}
fn default_enter_prompt() -> String {
    "Please enter a key now".to_string()
}
fn default_screen_width() -> u32 {
    640
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_cancel_sources() -> Vec<InputSource> {
    vec![
        InputSource::MouseButton { id: mouse::LEFT },
        InputSource::MouseButton { id: mouse::RIGHT },
    ]
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            heading: default_heading(),
            keyboard_label: default_keyboard_label(),
            choose_prompt: default_choose_prompt(),
            enter_prompt: default_enter_prompt(),
            visible_rows: None,
            screen_width: default_screen_width(),
            log_level: default_log_level(),
            cancel_sources: default_cancel_sources(),
        }
    }
}

impl MenuConfig {
    /// Binding slots shown per action: `visible_rows` if set, else derived from the
    /// screen width.
    pub fn rows_per_group(&self) -> usize {
        self.visible_rows
            .unwrap_or_else(|| keybind_core::rows_for_screen_width(self.screen_width))
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config files.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the menu config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn menu_config_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("menu.toml"))
}

/// Loads a [`MenuConfig`] from `path`, returning the defaults if the file
/// does not exist yet.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_menu_config(path: &Path) -> Result<MenuConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "menu config not found; using defaults");
            Ok(MenuConfig::default())
        }
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Writes `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_menu_config(path: &Path, config: &MenuConfig) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(config)?;
    write_creating_dirs(path, &content)
}

/// Writes `content` to `path`, creating the parent directory first.
pub(crate) fn write_creating_dirs(path: &Path, content: &str) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves the platform config base directory including the `KeyBind` subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        // %APPDATA% e.g. C:\Users\<user>\AppData\Roaming
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("KeyBind"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("keybind"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("KeyBind")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
