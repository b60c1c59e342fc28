//! Engine keyboard scancodes and their display names.
//!
//! The host engine reports keyboard input as SDL scancodes.  SDL scancodes are
//! defined to be the USB HID Usage IDs of the Keyboard/Keypad page (0x07), so
//! the same numbers identify a *physical key position* on every platform.
//!
//! # Why scancodes and not characters? (for beginners)
//!
//! A key binding has to survive keyboard layout changes.  The key to the right
//! of Tab produces "q" on QWERTY and "a" on AZERTY, but its scancode is 0x14 on
//! both.  Binding by scancode means the player's muscle memory keeps working
//! whatever layout the operating system is using.
//!
//! The names returned by [`Scancode::name`] follow the engine's key-name table,
//! which is what the player sees in the binding menu ("Left Shift", "Return",
//! "Keypad 0", ...).

use serde::{Deserialize, Serialize};

/// Engine keyboard scancode (USB HID Usage ID, page 0x07).
///
/// The numeric value of each variant is the raw scancode reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum Scancode {
    // Letters (0x04–0x1D)
    A = 0x04,
    B = 0x05,
    C = 0x06,
    D = 0x07,
    E = 0x08,
    F = 0x09,
    G = 0x0A,
    H = 0x0B,
    I = 0x0C,
    J = 0x0D,
    K = 0x0E,
    L = 0x0F,
    M = 0x10,
    N = 0x11,
    O = 0x12,
    P = 0x13,
    Q = 0x14,
    R = 0x15,
    S = 0x16,
    T = 0x17,
    U = 0x18,
    V = 0x19,
    W = 0x1A,
    X = 0x1B,
    Y = 0x1C,
    Z = 0x1D,

    // Digit row (0x1E–0x27)
    Num1 = 0x1E,
    Num2 = 0x1F,
    Num3 = 0x20,
    Num4 = 0x21,
    Num5 = 0x22,
    Num6 = 0x23,
    Num7 = 0x24,
    Num8 = 0x25,
    Num9 = 0x26,
    Num0 = 0x27,

    // Control and punctuation (0x28–0x38)
    Return = 0x28,
    Escape = 0x29,
    Backspace = 0x2A,
    Tab = 0x2B,
    Space = 0x2C,
    Minus = 0x2D,
    Equals = 0x2E,
    LeftBracket = 0x2F,
    RightBracket = 0x30,
    Backslash = 0x31,
    Semicolon = 0x33,
    Apostrophe = 0x34,
    Grave = 0x35,
    Comma = 0x36,
    Period = 0x37,
    Slash = 0x38,
    CapsLock = 0x39,

    // Function keys (0x3A–0x45)
    F1 = 0x3A,
    F2 = 0x3B,
    F3 = 0x3C,
    F4 = 0x3D,
    F5 = 0x3E,
    F6 = 0x3F,
    F7 = 0x40,
    F8 = 0x41,
    F9 = 0x42,
    F10 = 0x43,
    F11 = 0x44,
    F12 = 0x45,

    // Navigation cluster (0x46–0x52)
    PrintScreen = 0x46,
    ScrollLock = 0x47,
    Pause = 0x48,
    Insert = 0x49,
    Home = 0x4A,
    PageUp = 0x4B,
    Delete = 0x4C,
    End = 0x4D,
    PageDown = 0x4E,
    Right = 0x4F,
    Left = 0x50,
    Down = 0x51,
    Up = 0x52,

    // Keypad (0x53–0x63)
    NumLock = 0x53,
    KpDivide = 0x54,
    KpMultiply = 0x55,
    KpMinus = 0x56,
    KpPlus = 0x57,
    KpEnter = 0x58,
    Kp1 = 0x59,
    Kp2 = 0x5A,
    Kp3 = 0x5B,
    Kp4 = 0x5C,
    Kp5 = 0x5D,
    Kp6 = 0x5E,
    Kp7 = 0x5F,
    Kp8 = 0x60,
    Kp9 = 0x61,
    Kp0 = 0x62,
    KpPeriod = 0x63,

    Application = 0x65,

    // Modifiers (0xE0–0xE7)
    LeftCtrl = 0xE0,
    LeftShift = 0xE1,
    LeftAlt = 0xE2,
    LeftGui = 0xE3,
    RightCtrl = 0xE4,
    RightShift = 0xE5,
    RightAlt = 0xE6,
    RightGui = 0xE7,
}

/// Every known scancode with its display name, in scancode order.
const SCANCODE_NAMES: &[(Scancode, &str)] = {
    use Scancode::*;
    &[
        (A, "A"),
        (B, "B"),
        (C, "C"),
        (D, "D"),
        (E, "E"),
        (F, "F"),
        (G, "G"),
        (H, "H"),
        (I, "I"),
        (J, "J"),
        (K, "K"),
        (L, "L"),
        (M, "M"),
        (N, "N"),
        (O, "O"),
        (P, "P"),
        (Q, "Q"),
        (R, "R"),
        (S, "S"),
        (T, "T"),
        (U, "U"),
        (V, "V"),
        (W, "W"),
        (X, "X"),
        (Y, "Y"),
        (Z, "Z"),
        (Num1, "1"),
        (Num2, "2"),
        (Num3, "3"),
        (Num4, "4"),
        (Num5, "5"),
        (Num6, "6"),
        (Num7, "7"),
        (Num8, "8"),
        (Num9, "9"),
        (Num0, "0"),
        (Return, "Return"),
        (Escape, "Escape"),
        (Backspace, "Backspace"),
        (Tab, "Tab"),
        (Space, "Space"),
        (Minus, "-"),
        (Equals, "="),
        (LeftBracket, "["),
        (RightBracket, "]"),
        (Backslash, "\\"),
        (Semicolon, ";"),
        (Apostrophe, "'"),
        (Grave, "`"),
        (Comma, ","),
        (Period, "."),
        (Slash, "/"),
        (CapsLock, "CapsLock"),
        (F1, "F1"),
        (F2, "F2"),
        (F3, "F3"),
        (F4, "F4"),
        (F5, "F5"),
        (F6, "F6"),
        (F7, "F7"),
        (F8, "F8"),
        (F9, "F9"),
        (F10, "F10"),
        (F11, "F11"),
        (F12, "F12"),
        (PrintScreen, "PrintScreen"),
        (ScrollLock, "ScrollLock"),
        (Pause, "Pause"),
        (Insert, "Insert"),
        (Home, "Home"),
        (PageUp, "PageUp"),
        (Delete, "Delete"),
        (End, "End"),
        (PageDown, "PageDown"),
        (Right, "Right"),
        (Left, "Left"),
        (Down, "Down"),
        (Up, "Up"),
        (NumLock, "Numlock"),
        (KpDivide, "Keypad /"),
        (KpMultiply, "Keypad *"),
        (KpMinus, "Keypad -"),
        (KpPlus, "Keypad +"),
        (KpEnter, "Keypad Enter"),
        (Kp1, "Keypad 1"),
        (Kp2, "Keypad 2"),
        (Kp3, "Keypad 3"),
        (Kp4, "Keypad 4"),
        (Kp5, "Keypad 5"),
        (Kp6, "Keypad 6"),
        (Kp7, "Keypad 7"),
        (Kp8, "Keypad 8"),
        (Kp9, "Keypad 9"),
        (Kp0, "Keypad 0"),
        (KpPeriod, "Keypad ."),
        (Application, "Application"),
        (LeftCtrl, "Left Ctrl"),
        (LeftShift, "Left Shift"),
        (LeftAlt, "Left Alt"),
        (LeftGui, "Left GUI"),
        (RightCtrl, "Right Ctrl"),
        (RightShift, "Right Shift"),
        (RightAlt, "Right Alt"),
        (RightGui, "Right GUI"),
    ]
};

impl Scancode {
    /// Converts a raw engine scancode to a [`Scancode`].
    ///
    /// Returns `None` for codes that have no named key.
    pub fn from_u16(value: u16) -> Option<Self> {
        SCANCODE_NAMES
            .iter()
            .map(|&(code, _)| code)
            .find(|code| code.as_u16() == value)
    }

    /// Returns the raw engine scancode.
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    /// Returns the key name shown in the binding menu.
    pub fn name(self) -> &'static str {
        SCANCODE_NAMES
            .iter()
            .find(|&&(code, _)| code == self)
            .map(|&(_, name)| name)
            .unwrap_or("")
    }
}

/// Display name for any raw scancode, including ones without a named key.
pub fn key_name(code: u16) -> String {
    match Scancode::from_u16(code) {
        Some(sc) => sc.name().to_string(),
        None => format!("Key {code}"),
    }
}
