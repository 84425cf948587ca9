//! Keyboard driver.
//!
//! Keys arrive as toolkit events rather than by polling, so this driver only
//! contributes its device type and the default keyboard layout.

use crate::binding::InputMap;
use crate::button::Button;
use crate::device::{Capabilities, DeviceType, InputDriver};
use crate::event::Key;

/// Default keyboard layout.
pub const DEFAULT_KEYS: [(Key, Button); 10] = [
    (Key::X, Button::A),
    (Key::Z, Button::B),
    (Key::A, Button::L),
    (Key::S, Button::R),
    (Key::RETURN, Button::Start),
    (Key::BACKSPACE, Button::Select),
    (Key::UP, Button::Up),
    (Key::DOWN, Button::Down),
    (Key::LEFT, Button::Left),
    (Key::RIGHT, Button::Right),
];

#[derive(Debug, Default)]
pub struct KeyboardDriver;

impl KeyboardDriver {
    pub fn new() -> Self {
        KeyboardDriver
    }
}

/// Write [`DEFAULT_KEYS`] into `map`.
pub fn bind_default_keys(map: &mut InputMap) {
    for (key, button) in DEFAULT_KEYS {
        map.bind_key(DeviceType::KEYBOARD, key.code(), button);
    }
}

impl InputDriver for KeyboardDriver {
    fn device_type(&self) -> DeviceType {
        DeviceType::KEYBOARD
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }

    fn name(&self) -> &str {
        "Keyboard"
    }

    fn bind_defaults(&self, map: &mut InputMap) {
        bind_default_keys(map);
    }
}
