//! Keyboard scancode names.
//!
//! Bindings store raw engine scancodes; this module turns them into the names
//! the binding menu displays.

pub mod scancode;

pub use scancode::{key_name, Scancode};
