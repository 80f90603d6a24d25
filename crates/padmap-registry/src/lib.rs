//! Name registries for padmap catalogues.
//!
//! Two immutable symbol tables, built once on first use:
//!
//! - [`keys`]: keyboard key names and extended action names to key codes
//! - [`inputs`]: pad button, analog half-axis and wheel names to input targets
//!
//! Lookups are case-insensitive. Code values are part of the compiled layout
//! and must never be renumbered.

#![deny(static_mut_refs)]

pub mod inputs;
pub mod keys;

pub use inputs::{
    AXIS_CODES, AxisHalf, BUTTON_CODE_MASK, InputTarget, PAD_BUTTONS, WHEEL_CODE, input_target,
    is_analog_code, target_label,
};
pub use keys::{
    EXTENDED_ACTIONS, EXTENDED_ACTION_BASE, KEYBOARD_KEYS, KeyCode, NO_KEY, key_code, key_name,
};
