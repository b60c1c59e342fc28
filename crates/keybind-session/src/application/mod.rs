//! Application layer for the key binding menu.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (`keybind-core`: bindings, the store, navigation) and the infrastructure
//! (the engine's input system, files on disk).
//!
//! The use case here orchestrates domain objects to fulfil one player goal,
//! "change what a button does", and reaches the outside world only through
//! traits ([`crate::infrastructure::host_input::HostInput`] and
//! [`keybind_core::BindingPersistence`]), so it runs unchanged against mocks.
//!
//! # Sub-modules
//!
//! - **`rebind_session`** – The per-frame state machine behind the menu:
//!   cursor movement, key capture, clearing, hot-plug reset, and the final save.

pub mod rebind_session;
