//! Binding entities: input sources, single bindings, and device groups.
//!
//! A [`Binding`] connects one logical action ("Up", "C", ...) to one
//! [`InputSource`].  Bindings are organised in [`BindingGroup`]s, one per
//! device (the keyboard, or one gamepad), and the group order is the on-screen
//! and on-disk order.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::keymap::key_name;

use super::store::PersistError;

/// Errors produced by the binding store.
#[derive(Debug, Error, PartialEq)]
pub enum BindingError {
    /// A group or row index was outside the store.
    #[error("invalid binding index: group {group}, row {row}")]
    InvalidIndex { group: usize, row: usize },

    /// `begin_capture` was called while another capture was still open.
    #[error("a key capture is already active")]
    CaptureAlreadyActive,

    /// The capture handle does not belong to the currently open capture.
    #[error("capture handle is stale or no capture is active")]
    StaleCapture,

    /// An action name appears twice in the same group.
    #[error("duplicate action '{action}' in binding group {group}")]
    DuplicateAction { group: usize, action: String },

    /// A snapshot asked for more rows than a group holds.
    #[error("binding group {group} has {available} rows, {requested} requested")]
    RowsExceedGroup {
        group: usize,
        requested: usize,
        available: usize,
    },

    /// A group has no binding for an action another group lists.
    #[error("binding group {group} has no binding for action '{action}'")]
    MissingAction { group: usize, action: String },

    /// The persistence collaborator failed to save.
    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Direction of a gamepad axis binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisDirection {
    Negative,
    Positive,
}

impl AxisDirection {
    /// Direction encoded by the sign of an axis value; zero counts as positive.
    pub fn from_value(value: i32) -> Self {
        if value < 0 {
            AxisDirection::Negative
        } else {
            AxisDirection::Positive
        }
    }

    fn sign(self) -> char {
        match self {
            AxisDirection::Negative => '-',
            AxisDirection::Positive => '+',
        }
    }
}

/// Position of a gamepad hat switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HatPosition {
    Up,
    Right,
    Down,
    Left,
}

impl HatPosition {
    fn letter(self) -> char {
        match self {
            HatPosition::Up => 'U',
            HatPosition::Right => 'R',
            HatPosition::Down => 'D',
            HatPosition::Left => 'L',
        }
    }
}

/// Engine trigger kind reported for keyboard input.
const TRIGGER_KEYBOARD: i32 = 1;
/// Engine trigger kind reported for gamepad input.
const TRIGGER_GAMEPAD: i32 = 2;

/// Well-known mouse button ids.
pub mod mouse {
    pub const LEFT: u8 = 1;
    pub const MIDDLE: u8 = 2;
    pub const RIGHT: u8 = 3;
    pub const X1: u8 = 4;
    pub const X2: u8 = 5;
}

/// The physical input a binding listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputSource {
    /// Unbound.
    #[default]
    None,
    /// A keyboard key, identified by engine scancode.
    KeyboardKey { code: u16 },
    /// A mouse button (see [`mouse`] for the well-known ids).
    MouseButton { id: u8 },
    /// A gamepad button.
    GamepadButton { id: u8 },
    /// A gamepad axis; the sign of `value` is the direction.
    GamepadAxisValue { id: u8, value: i32 },
    /// A gamepad hat switch position.
    GamepadHat { hat: u8, position: HatPosition },
}

impl InputSource {
    /// Decodes the engine's raw trigger report.
    ///
    /// Kind 1 is a keyboard scancode, kind 2 a gamepad button.  Kind 0 and any
    /// kind this crate does not know decode to [`InputSource::None`] instead of
    /// failing, so an exotic device can never break the binding menu.
    pub fn from_raw_trigger(kind: i32, value: i32) -> Self {
        match kind {
            TRIGGER_KEYBOARD => match u16::try_from(value) {
                Ok(code) => InputSource::KeyboardKey { code },
                Err(_) => InputSource::None,
            },
            TRIGGER_GAMEPAD => match u8::try_from(value) {
                Ok(id) => InputSource::GamepadButton { id },
                Err(_) => InputSource::None,
            },
            _ => InputSource::None,
        }
    }

    /// Returns `true` if this source is [`InputSource::None`].
    pub fn is_none(&self) -> bool {
        matches!(self, InputSource::None)
    }

    /// Name shown in the binding menu; empty for an unbound source.
    pub fn display_name(&self) -> String {
        match *self {
            InputSource::None => String::new(),
            InputSource::KeyboardKey { code } => key_name(code),
            InputSource::MouseButton { id } => match id {
                mouse::LEFT => "Mouse Left".to_string(),
                mouse::MIDDLE => "Mouse Middle".to_string(),
                mouse::RIGHT => "Mouse Right".to_string(),
                mouse::X1 => "Mouse X1".to_string(),
                mouse::X2 => "Mouse X2".to_string(),
                other => format!("Mouse {other}"),
            },
            InputSource::GamepadButton { id } => format!("JS {id}"),
            InputSource::GamepadAxisValue { id, value } => {
                format!("Axis {id}{}", AxisDirection::from_value(value).sign())
            }
            InputSource::GamepadHat { hat, position } => {
                format!("Hat {hat}:{}", position.letter())
            }
        }
    }
}

/// One action bound to one input source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    /// Logical action name, unique within its group.
    pub action: String,
    /// The bound input.
    pub source: InputSource,
    /// Label shown in the menu, kept in sync with `source`.
    pub display_name: String,
}

impl Binding {
    /// Creates a binding whose display name is derived from `source`.
    pub fn new(action: impl Into<String>, source: InputSource) -> Self {
        Self {
            action: action.into(),
            source,
            display_name: source.display_name(),
        }
    }

    /// Replaces the source and refreshes the display name.
    pub fn rebind(&mut self, source: InputSource) {
        self.source = source;
        self.display_name = source.display_name();
    }
}

/// The bindings of one device, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingGroup {
    /// Device label, e.g. `"Keyboard"` or a gamepad name.
    pub label: String,
    bindings: Vec<Binding>,
}

impl BindingGroup {
    /// Creates an empty group.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            bindings: Vec::new(),
        }
    }

    /// Creates a group from existing bindings.
    ///
    /// The group index in the error is always 0; [`BindingStore::new`]
    /// re-validates with the real index.
    ///
    /// [`BindingStore::new`]: super::store::BindingStore::new
    pub fn with_bindings(
        label: impl Into<String>,
        bindings: Vec<Binding>,
    ) -> Result<Self, BindingError> {
        let group = Self {
            label: label.into(),
            bindings,
        };
        group.validate(0)?;
        Ok(group)
    }

    /// Appends a binding, rejecting a duplicate action name.
    pub fn push(&mut self, binding: Binding) -> Result<(), BindingError> {
        if self.position(&binding.action).is_some() {
            return Err(BindingError::DuplicateAction {
                group: 0,
                action: binding.action,
            });
        }
        self.bindings.push(binding);
        Ok(())
    }

    /// Appends a binding whose action is known to be new to the group.
    pub(crate) fn with_unique(mut self, binding: Binding) -> Self {
        debug_assert!(self.position(&binding.action).is_none());
        self.bindings.push(binding);
        self
    }

    /// Bindings in display order.
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Number of rows in this group.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns `true` if the group has no bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Row index of `action`, if present.
    pub fn position(&self, action: &str) -> Option<usize> {
        self.bindings.iter().position(|b| b.action == action)
    }

    /// The binding for `action`, if present.
    pub fn get(&self, action: &str) -> Option<&Binding> {
        self.bindings.iter().find(|b| b.action == action)
    }

    pub(crate) fn row_mut(&mut self, row: usize) -> Option<&mut Binding> {
        self.bindings.get_mut(row)
    }

    /// A copy of this group keeping only the first `rows` bindings.
    pub(crate) fn truncated(&self, rows: usize) -> Self {
        Self {
            label: self.label.clone(),
            bindings: self.bindings.iter().take(rows).cloned().collect(),
        }
    }

    pub(crate) fn validate(&self, group: usize) -> Result<(), BindingError> {
        for (i, binding) in self.bindings.iter().enumerate() {
            if self.bindings[..i].iter().any(|b| b.action == binding.action) {
                return Err(BindingError::DuplicateAction {
                    group,
                    action: binding.action.clone(),
                });
            }
        }
        Ok(())
    }
}
