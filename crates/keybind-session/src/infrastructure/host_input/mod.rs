//! Host engine input adapter.
//!
//! The key binding menu needs four things from the engine it runs in: the
//! bindings currently in effect, a way to switch the input system into "raw"
//! mode (so the next key press is reported instead of being interpreted as a
//! game action), the next raw event while in that mode, and a hot-plug signal
//! when gamepads come or go.
//!
//! # Testability
//!
//! The [`HostInput`] trait lets tests drive a session with scripted events via
//! [`mock::MockHostInput`] instead of a running engine.

use keybind_core::{BindingGroup, InputSource};

pub mod mock;

/// Trait abstracting the engine's input system.
pub trait HostInput {
    /// Routes the next raw input event to [`HostInput::poll_raw_input_event`]
    /// instead of the game's action mapping.
    fn enter_raw_capture_mode(&mut self);

    /// Restores normal action mapping.
    fn exit_raw_capture_mode(&mut self);

    /// The next raw event reported since the last poll, if any.
    ///
    /// Hosts decode engine triggers with [`InputSource::from_raw_trigger`] or
    /// report richer sources (axes, hats) directly.
    fn poll_raw_input_event(&mut self) -> Option<InputSource>;

    /// The bindings currently in effect, one group per device.
    fn current_bindings_snapshot(&self) -> Vec<BindingGroup>;

    /// Returns `true` once after a gamepad was connected or disconnected.
    fn devices_changed(&mut self) -> bool;
}
