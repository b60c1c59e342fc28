//! Stock action list and default device bindings.
//!
//! These mirror the engine's built-in bindings and are what a fresh install,
//! or a "reset to defaults" action, starts from.

use crate::keymap::Scancode;

use super::binding::{Binding, BindingGroup, InputSource};

/// Logical actions in menu order.
pub const ACTIONS: [&str; 14] = [
    "Up", "Down", "L", "L2", "Left", "Right", "R", "R2", "A", "B", "C", "X", "Y", "Z",
];

/// Label of the keyboard group.
pub const KEYBOARD_LABEL: &str = "Keyboard";

fn keyboard_source(action: &str) -> InputSource {
    let key = match action {
        "Up" => Scancode::Up,
        "Down" => Scancode::Down,
        "Left" => Scancode::Left,
        "Right" => Scancode::Right,
        "C" => Scancode::Space,
        "B" => Scancode::Escape,
        "A" => Scancode::LeftShift,
        "Z" => Scancode::D,
        "L" => Scancode::Q,
        "R" => Scancode::W,
        "X" => Scancode::A,
        "Y" => Scancode::S,
        _ => return InputSource::None,
    };
    InputSource::KeyboardKey { code: key.as_u16() }
}

fn gamepad_source(action: &str) -> InputSource {
    match action {
        "A" => InputSource::GamepadButton { id: 0 },
        "B" => InputSource::GamepadButton { id: 1 },
        "C" => InputSource::GamepadButton { id: 2 },
        "X" => InputSource::GamepadButton { id: 3 },
        "Y" => InputSource::GamepadButton { id: 4 },
        "Z" => InputSource::GamepadButton { id: 5 },
        "L" => InputSource::GamepadButton { id: 6 },
        "R" => InputSource::GamepadButton { id: 7 },
        "Left" => InputSource::GamepadAxisValue { id: 0, value: -1 },
        "Right" => InputSource::GamepadAxisValue { id: 0, value: 1 },
        "Up" => InputSource::GamepadAxisValue { id: 1, value: -1 },
        "Down" => InputSource::GamepadAxisValue { id: 1, value: 1 },
        _ => InputSource::None,
    }
}

fn build_group(label: &str, source_for: fn(&str) -> InputSource) -> BindingGroup {
    ACTIONS
        .iter()
        .map(|action| Binding::new(*action, source_for(action)))
        .fold(BindingGroup::new(label), BindingGroup::with_unique)
}

/// The engine's default keyboard bindings; L2 and R2 start unbound.
pub fn default_keyboard_group() -> BindingGroup {
    build_group(KEYBOARD_LABEL, keyboard_source)
}

/// The engine's default gamepad bindings for a pad called `label`.
pub fn default_gamepad_group(label: &str) -> BindingGroup {
    build_group(label, gamepad_source)
}
