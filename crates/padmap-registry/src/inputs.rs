//! Pad input targets: digital buttons, analog half-axes and the wheel.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Digital pad buttons, indexed by button code.
pub const PAD_BUTTONS: [&str; 16] = [
    "b", "y", "select", "start", "up", "down", "left", "right", "a", "x", "l", "r", "l2", "r2",
    "l3", "r3",
];

/// Analog axis codes: left stick X/Y, right stick X/Y.
pub const AXIS_CODES: [u8; 4] = [16, 17, 18, 19];

/// Code of the ordered wheel binding list.
pub const WHEEL_CODE: u8 = 20;

/// Bits of an encoded button byte that carry the target code.
pub const BUTTON_CODE_MASK: u8 = 0x1F;

/// One direction of an analog axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisHalf {
    /// Left or up
    Negative = 0,
    /// Right or down
    Positive = 1,
}

impl AxisHalf {
    /// Position of this half inside an interleaved key pair.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The opposing half.
    pub const fn other(self) -> Self {
        match self {
            AxisHalf::Negative => AxisHalf::Positive,
            AxisHalf::Positive => AxisHalf::Negative,
        }
    }
}

/// Resolved binding target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputTarget {
    /// Digital button, at most one binding per title
    Button(u8),
    /// One half of an analog axis; both halves merge into one record
    AxisHalf {
        /// Axis code (16..=19)
        axis: u8,
        /// Which direction this binding drives
        half: AxisHalf,
    },
    /// Wheel entry; any number per title, kept in catalogue order
    Wheel,
}

impl InputTarget {
    /// Base code written into the low bits of the encoded button byte.
    pub const fn code(self) -> u8 {
        match self {
            InputTarget::Button(code) => code,
            InputTarget::AxisHalf { axis, .. } => axis,
            InputTarget::Wheel => WHEEL_CODE,
        }
    }

    pub const fn is_analog(self) -> bool {
        matches!(self, InputTarget::AxisHalf { .. })
    }
}

/// Analog axes occupy codes 16..=19, i.e. `code >> 2 == 4`.
pub const fn is_analog_code(code: u8) -> bool {
    (code >> 2) == 4
}

static INPUT_TARGETS: LazyLock<HashMap<&'static str, InputTarget>> = LazyLock::new(|| {
    let mut targets: HashMap<&'static str, InputTarget> = PAD_BUTTONS
        .iter()
        .zip(0..=u8::MAX)
        .map(|(name, code)| (*name, InputTarget::Button(code)))
        .collect();

    let halves = [
        ("lstick_left", 16, AxisHalf::Negative),
        ("lstick_right", 16, AxisHalf::Positive),
        ("lstick_up", 17, AxisHalf::Negative),
        ("lstick_down", 17, AxisHalf::Positive),
        ("rstick_left", 18, AxisHalf::Negative),
        ("rstick_right", 18, AxisHalf::Positive),
        ("rstick_up", 19, AxisHalf::Negative),
        ("rstick_down", 19, AxisHalf::Positive),
    ];
    for (name, axis, half) in halves {
        targets.insert(name, InputTarget::AxisHalf { axis, half });
    }
    targets.insert("wheel", InputTarget::Wheel);
    targets
});

/// Resolve a binding target name such as `a`, `lstick_left` or `wheel`.
pub fn input_target(name: &str) -> Option<InputTarget> {
    INPUT_TARGETS
        .get(name.trim().to_ascii_lowercase().as_str())
        .copied()
}

/// Human-readable label of a target code, for diagnostics.
pub fn target_label(code: u8) -> &'static str {
    match code {
        16 => "lstick_x",
        17 => "lstick_y",
        18 => "rstick_x",
        19 => "rstick_y",
        WHEEL_CODE => "wheel",
        _ => PAD_BUTTONS.get(usize::from(code)).copied().unwrap_or("???"),
    }
}
