//! # keybind-core
//!
//! Shared library for the key binding menu: the binding store with change
//! tracking, cyclic menu navigation, scancode names, and a comment-preserving
//! INI configuration store.
//!
//! It has zero dependencies on game engines, renderers, or input devices.
//! Everything that touches the host engine is expressed as a trait and lives
//! in `keybind-session`.
//!
//! # Architecture overview (for beginners)
//!
//! A game lets the player rebind its logical actions ("Up", "A", "C", ...) to
//! physical inputs: a keyboard key, a mouse button, or a gamepad button or axis.
//! The key binding menu shows the current bindings, waits for the player to
//! press something, and saves the new mapping when the menu closes.
//!
//! This crate (`keybind-core`) is the engine-independent foundation:
//!
//! - **`domain`** – The [`BindingStore`]: an ordered set of binding groups (one
//!   per device), a two-phase capture protocol, and a dirty set that decides
//!   whether anything needs saving at all.  Also the cyclic [`GridCursor`]
//!   used to walk the on-screen grid.
//!
//! - **`ini`** – A small INI reader/writer that rewrites files byte-faithfully,
//!   supports "soft delete" by commenting keys out, and records failures in a
//!   [`Diagnostics`] context instead of raising them.
//!
//! - **`keymap`** – Engine scancodes (identical to USB HID keyboard usage IDs)
//!   and their human-readable key names.

pub mod domain;
pub mod ini;
pub mod keymap;

// Re-export the most-used types at the crate root so callers can write
// `keybind_core::BindingStore` instead of `keybind_core::domain::store::BindingStore`.
pub use domain::binding::{
    AxisDirection, Binding, BindingError, BindingGroup, HatPosition, InputSource,
};
pub use domain::navigation::{advance, rows_for_screen_width, GridCursor};
pub use domain::store::{BindingPersistence, BindingStore, CaptureHandle, FlushOutcome, PersistError};
pub use ini::diagnostics::{DiagnosticReport, Diagnostics};
pub use ini::document::{Entry, IniDocument, Section};
pub use ini::file::ConfigFile;
pub use ini::IniError;
pub use keymap::scancode::Scancode;
