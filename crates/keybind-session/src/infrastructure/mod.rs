//! Infrastructure layer for the key binding menu.
//!
//! Contains the adapters that touch the outside world: the host engine's input
//! system, the file system, and log output.
//!
//! **Dependency rule**: this layer may depend on `keybind_core`, but the core
//! crate never imports it.

pub mod host_input;
pub mod logging;
pub mod storage;
