//! Keys, directions and synthetic input events.
//!
//! padbridge represents everything it hands to the GUI toolkit as an
//! [`InputEvent`]: raw-keyboard presses re-injected by the native hook, and
//! gamepad button/axis/hat edges synthesized by the poller.
//!
//! ## Value conventions
//! - **Keys:** toolkit key codes wrapped in [`Key`]. Letters use their ASCII
//!   upper-case code; special keys live above `0x0100_0000`.
//! - **Axes:** raw signed 16-bit readings. Digital activation is decided by
//!   the binding's center/threshold, never by the driver.
//! - **Hats:** a 4-bit direction mask (Up = 1, Right = 2, Down = 4, Left = 8),
//!   `0` = centered. Diagonals set two bits.
//!
//! Gamepad events carry the logical button(s) their source is bound to at the
//! time the event was built, so the pending-event bookkeeping does not need to
//! consult the binding store again.

use crate::button::{Button, ButtonSet};
use crate::device::DeviceType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Toolkit key code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(pub u32);

impl Key {
    pub const BACKSPACE: Key = Key(0x0100_0003);
    pub const RETURN: Key = Key(0x0100_0004);
    pub const LEFT: Key = Key(0x0100_0012);
    pub const UP: Key = Key(0x0100_0013);
    pub const RIGHT: Key = Key(0x0100_0014);
    pub const DOWN: Key = Key(0x0100_0015);

    pub const A: Key = Key::letter('A');
    pub const S: Key = Key::letter('S');
    pub const X: Key = Key::letter('X');
    pub const Z: Key = Key::letter('Z');

    /// Key code of an ASCII letter (case-insensitive).
    pub const fn letter(c: char) -> Key {
        Key(c.to_ascii_uppercase() as u32)
    }

    #[inline]
    pub fn code(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Key::BACKSPACE => f.write_str("Backspace"),
            Key::RETURN => f.write_str("Return"),
            Key::LEFT => f.write_str("Left"),
            Key::UP => f.write_str("Up"),
            Key::RIGHT => f.write_str("Right"),
            Key::DOWN => f.write_str("Down"),
            Key(c) if (0x20..0x7F).contains(&c) => write!(f, "{}", c as u8 as char),
            Key(c) => write!(f, "Key(0x{c:08x})"),
        }
    }
}

/// Side of an axis' center a reading sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AxisDirection {
    Positive,
    Negative,
}

/// Hat (POV/D-pad) direction mask.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HatDirection(u8);

impl HatDirection {
    pub const CENTERED: HatDirection = HatDirection(0);
    pub const UP: HatDirection = HatDirection(1);
    pub const RIGHT: HatDirection = HatDirection(2);
    pub const DOWN: HatDirection = HatDirection(4);
    pub const LEFT: HatDirection = HatDirection(8);
    pub const UP_RIGHT: HatDirection = HatDirection(1 | 2);
    pub const DOWN_RIGHT: HatDirection = HatDirection(4 | 2);
    pub const DOWN_LEFT: HatDirection = HatDirection(4 | 8);
    pub const UP_LEFT: HatDirection = HatDirection(1 | 8);

    pub fn from_bits(bits: u8) -> Self {
        HatDirection(bits & 0x0F)
    }

    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn is_centered(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn contains(self, other: HatDirection) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    /// Convert an 8-way octant index (`-1` = neutral, `0..7` = Up clockwise).
    pub fn from_octant(octant: i8) -> Self {
        match octant {
            0 => Self::UP,
            1 => Self::UP_RIGHT,
            2 => Self::RIGHT,
            3 => Self::DOWN_RIGHT,
            4 => Self::DOWN,
            5 => Self::DOWN_LEFT,
            6 => Self::LEFT,
            7 => Self::UP_LEFT,
            _ => Self::CENTERED,
        }
    }
}

/// Key press/release, either from the toolkit or re-injected by the native hook.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub pressed: bool,
}

/// A gamepad button went down or up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GamepadButtonEvent {
    pub pressed: bool,
    /// Driver-local button index.
    pub button: usize,
    pub device: DeviceType,
    /// Logical button this physical button was bound to when the event was built.
    pub mapped: Option<Button>,
}

/// An axis crossed its threshold in one direction (or fell back inside it).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GamepadAxisEvent {
    pub axis: usize,
    pub direction: AxisDirection,
    pub above_threshold: bool,
    pub device: DeviceType,
    pub mapped: Option<Button>,
}

/// A hat entered or left a direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GamepadHatEvent {
    pub pressed: bool,
    pub hat: usize,
    pub direction: HatDirection,
    pub device: DeviceType,
    /// Logical buttons bound to the bits of `direction`.
    pub mapped: ButtonSet,
}

/// Every event padbridge posts to the toolkit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    GamepadButton(GamepadButtonEvent),
    GamepadAxis(GamepadAxisEvent),
    GamepadHat(GamepadHatEvent),
}

impl InputEvent {
    /// Logical buttons this event marks (or clears) as pending.
    pub fn platform_keys(&self) -> ButtonSet {
        match self {
            InputEvent::Key(_) => ButtonSet::EMPTY,
            InputEvent::GamepadButton(e) => e.mapped.map(ButtonSet::from).unwrap_or_default(),
            InputEvent::GamepadAxis(e) => e.mapped.map(ButtonSet::from).unwrap_or_default(),
            InputEvent::GamepadHat(e) => e.mapped,
        }
    }

    pub fn is_gamepad(&self) -> bool {
        !matches!(self, InputEvent::Key(_))
    }
}

/// Delivery priority requested from the toolkit queue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EventPriority {
    #[default]
    Normal,
    High,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hat_octants() {
        assert_eq!(HatDirection::from_octant(-1), HatDirection::CENTERED);
        assert_eq!(HatDirection::from_octant(0), HatDirection::UP);
        assert_eq!(HatDirection::from_octant(3), HatDirection::DOWN_RIGHT);
        assert_eq!(HatDirection::from_octant(7), HatDirection::UP_LEFT);
        assert!(HatDirection::UP_LEFT.contains(HatDirection::LEFT));
        assert!(!HatDirection::UP.contains(HatDirection::CENTERED));
    }

    #[test]
    fn letter_keys_are_ascii() {
        assert_eq!(Key::letter('z'), Key::Z);
        assert_eq!(Key::X.code(), 'X' as u32);
        assert_eq!(Key::RETURN.to_string(), "Return");
        assert_eq!(Key::S.to_string(), "S");
    }

    #[test]
    fn platform_keys_per_event_kind() {
        let button = InputEvent::GamepadButton(GamepadButtonEvent {
            pressed: true,
            button: 3,
            device: DeviceType::VIRTUAL,
            mapped: Some(Button::Start),
        });
        assert_eq!(button.platform_keys(), ButtonSet::from(Button::Start));

        let unbound = InputEvent::GamepadAxis(GamepadAxisEvent {
            axis: 0,
            direction: AxisDirection::Negative,
            above_threshold: true,
            device: DeviceType::VIRTUAL,
            mapped: None,
        });
        assert!(unbound.platform_keys().is_empty());

        let key = InputEvent::Key(KeyEvent {
            key: Key::UP,
            pressed: true,
        });
        assert!(key.platform_keys().is_empty());
        assert!(!key.is_gamepad());
    }
}
