//! Mock host input for unit and integration testing.
//!
//! Allows tests to script raw input events and device hot-plugs without a
//! running engine.  Clones share state, so a test can keep one handle while
//! the session owns another.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use keybind_core::domain::defaults::{default_gamepad_group, default_keyboard_group};
use keybind_core::{BindingGroup, InputSource};

use super::HostInput;

#[derive(Debug, Default)]
struct MockState {
    snapshot: Vec<BindingGroup>,
    events: VecDeque<InputSource>,
    devices_changed: bool,
    capturing: bool,
    enter_count: u32,
    exit_count: u32,
    snapshot_count: u32,
}

/// A mock implementation of [`HostInput`] that allows tests to inject events.
#[derive(Debug, Clone, Default)]
pub struct MockHostInput {
    state: Arc<Mutex<MockState>>,
}

impl MockHostInput {
    /// Creates a mock whose engine holds `snapshot`.
    pub fn new(snapshot: Vec<BindingGroup>) -> Self {
        let mock = Self::default();
        mock.set_snapshot(snapshot);
        mock
    }

    /// A keyboard plus one gamepad, both with default bindings.
    pub fn with_default_devices() -> Self {
        Self::new(vec![
            default_keyboard_group(),
            default_gamepad_group("Gamepad 1"),
        ])
    }

    /// Replaces the bindings the engine reports.
    pub fn set_snapshot(&self, snapshot: Vec<BindingGroup>) {
        self.state.lock().expect("lock poisoned").snapshot = snapshot;
    }

    /// Queues a raw event, as if pressed on a device.
    pub fn inject_event(&self, source: InputSource) {
        self.state
            .lock()
            .expect("lock poisoned")
            .events
            .push_back(source);
    }

    /// Signals a gamepad hot-plug; the next `devices_changed` returns `true`.
    pub fn signal_devices_changed(&self) {
        self.state.lock().expect("lock poisoned").devices_changed = true;
    }

    /// Returns `true` while the engine is in raw capture mode.
    pub fn is_capturing(&self) -> bool {
        self.state.lock().expect("lock poisoned").capturing
    }

    /// Number of times raw capture mode was entered.
    pub fn enter_count(&self) -> u32 {
        self.state.lock().expect("lock poisoned").enter_count
    }

    /// Number of times raw capture mode was left.
    pub fn exit_count(&self) -> u32 {
        self.state.lock().expect("lock poisoned").exit_count
    }

    /// Number of times the binding snapshot was taken.
    pub fn snapshot_count(&self) -> u32 {
        self.state.lock().expect("lock poisoned").snapshot_count
    }
}

impl HostInput for MockHostInput {
    fn enter_raw_capture_mode(&mut self) {
        let mut state = self.state.lock().expect("lock poisoned");
        state.capturing = true;
        state.enter_count += 1;
    }

    fn exit_raw_capture_mode(&mut self) {
        let mut state = self.state.lock().expect("lock poisoned");
        state.capturing = false;
        state.exit_count += 1;
    }

    fn poll_raw_input_event(&mut self) -> Option<InputSource> {
        self.state.lock().expect("lock poisoned").events.pop_front()
    }

    fn current_bindings_snapshot(&self) -> Vec<BindingGroup> {
        let mut state = self.state.lock().expect("lock poisoned");
        state.snapshot_count += 1;
        state.snapshot.clone()
    }

    fn devices_changed(&mut self) -> bool {
        std::mem::take(&mut self.state.lock().expect("lock poisoned").devices_changed)
    }
}
