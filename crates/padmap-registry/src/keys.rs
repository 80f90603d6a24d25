//! Keyboard key and extended action codes.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Key code as stored in mapping records.
pub type KeyCode = u8;

/// Padding code for an unbound key slot. Not a valid catalogue name.
pub const NO_KEY: KeyCode = 0;

/// First code of the extended action band.
pub const EXTENDED_ACTION_BASE: KeyCode = 200;

/// Keyboard keys, indexed by key code. Index 0 is the padding entry.
pub const KEYBOARD_KEYS: [&str; 103] = [
    "none", "1", "2", "3", "4", "5", "6", "7", "8", "9", "0", "q", "w", "e", "r", "t", "y", "u",
    "i", "o", "p", "a", "s", "d", "f", "g", "h", "j", "k", "l", "z", "x", "c", "v", "b", "n", "m",
    "F1", "F2", "F3", "F4", "F5", "F6", "F7", "F8", "F9", "F10", "F11", "F12", "ESC", "TAB",
    "BACKSPACE", "ENTER", "SPACE", "LEFTALT", "RIGHTALT", "LEFTCTRL", "RIGHTCTRL", "LEFTSHIFT",
    "RIGHTSHIFT", "CAPSLOCK", "SCROLLLOCK", "NUMLOCK", "GRAVE", "MINUS", "EQUALS", "BACKSLASH",
    "LEFTBRACKET", "RIGHTBRACKET", "SEMICOLON", "QUOTE", "PERIOD", "COMMA", "SLASH",
    "EXTRA_LT_GT", "PRINTSCREEN", "PAUSE", "INSERT", "HOME", "PAGEUP", "DELETE", "END",
    "PAGEDOWN", "LEFT", "UP", "DOWN", "RIGHT", "KP1", "KP2", "KP3", "KP4", "KP5", "KP6", "KP7",
    "KP8", "KP9", "KP0", "KPDIVIDE", "KPMULTIPLY", "KPMINUS", "KPPLUS", "KPENTER", "KPPERIOD",
];

/// Mouse, joystick and frontend actions, numbered from [`EXTENDED_ACTION_BASE`].
pub const EXTENDED_ACTIONS: [&str; 27] = [
    "mouse_move_up",
    "mouse_move_down",
    "mouse_move_left",
    "mouse_move_right",
    "mouse_left_click",
    "mouse_right_click",
    "mouse_middle_click",
    "mouse_speed_up",
    "mouse_speed_down",
    "joy_up",
    "joy_down",
    "joy_left",
    "joy_right",
    "joy_button1",
    "joy_button2",
    "joy_button3",
    "joy_button4",
    "joy_hat_up",
    "joy_hat_down",
    "joy_hat_left",
    "joy_hat_right",
    "joy_2_up",
    "joy_2_down",
    "joy_2_left",
    "joy_2_right",
    "on_screen_keyboard",
    "wheel",
];

static KEY_CODES: LazyLock<HashMap<String, KeyCode>> = LazyLock::new(|| {
    let keyboard = KEYBOARD_KEYS
        .iter()
        .zip(0..=u8::MAX)
        .skip(1)
        .map(|(name, code)| (name.to_ascii_lowercase(), code));
    let actions = EXTENDED_ACTIONS
        .iter()
        .zip(EXTENDED_ACTION_BASE..=u8::MAX)
        .map(|(name, code)| (name.to_ascii_lowercase(), code));
    keyboard.chain(actions).collect()
});

/// Resolve a key or extended action name to its code.
///
/// `none` is deliberately unresolvable: padding is inserted by the compiler,
/// never written by hand.
pub fn key_code(name: &str) -> Option<KeyCode> {
    KEY_CODES.get(&name.trim().to_ascii_lowercase()).copied()
}

/// Canonical name of a key code, including `none` for padding.
pub fn key_name(code: KeyCode) -> Option<&'static str> {
    if code >= EXTENDED_ACTION_BASE {
        EXTENDED_ACTIONS
            .get(usize::from(code - EXTENDED_ACTION_BASE))
            .copied()
    } else {
        KEYBOARD_KEYS.get(usize::from(code)).copied()
    }
}
