//! Storage infrastructure: menu configuration and binding persistence.
//!
//! - `config` reads and writes the menu's TOML settings and resolves the
//!   platform config directory, falling back to defaults on first run.
//! - `bindings` implements [`keybind_core::BindingPersistence`] on top of a
//!   TOML file in that directory.

pub mod bindings;
pub mod config;
