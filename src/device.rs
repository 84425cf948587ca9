//! Driver and gamepad abstractions.
//!
//! A driver is the adapter for one input device family (the keyboard, the
//! XInput API, gilrs, ...). Drivers differ in what they can do, so every
//! driver publishes a [`Capabilities`] struct and callers query it before
//! dispatching capability-specific work.
//!
//! Gamepads are owned by their driver. Callers only ever borrow them for the
//! duration of a poll.

use crate::binding::InputMap;
use crate::config::ConfigStore;
use crate::metadata::GamepadMeta;
use std::fmt;

/// Four-character device family code (e.g. `KBD`, `XI`, `GILR`).
///
/// Used as the registry key and as the suffix of configuration sections.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceType(pub u32);

impl DeviceType {
    pub const KEYBOARD: DeviceType = DeviceType::fourcc(*b"KBD\0");
    pub const XINPUT: DeviceType = DeviceType::fourcc(*b"XI\0\0");
    pub const GILRS: DeviceType = DeviceType::fourcc(*b"GILR");
    pub const VIRTUAL: DeviceType = DeviceType::fourcc(*b"VIRT");

    pub const fn fourcc(code: [u8; 4]) -> DeviceType {
        DeviceType(u32::from_be_bytes(code))
    }

    /// Section-safe name: the fourcc with trailing NULs stripped.
    pub fn name(self) -> String {
        self.0
            .to_be_bytes()
            .iter()
            .take_while(|&&b| b != 0)
            .map(|&b| b as char)
            .collect()
    }

    /// Inverse of [`DeviceType::name`]; 1 to 4 ASCII bytes.
    pub fn from_name(name: &str) -> Option<DeviceType> {
        let bytes = name.as_bytes();
        if bytes.is_empty() || bytes.len() > 4 || !name.is_ascii() || bytes.contains(&0) {
            return None;
        }
        let mut code = [0u8; 4];
        code[..bytes.len()].copy_from_slice(bytes);
        Some(DeviceType::fourcc(code))
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl fmt::Debug for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeviceType({})", self.name())
    }
}

/// What a driver supports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// State must be read on a timer (as opposed to arriving as toolkit events).
    pub polling: bool,
    /// Exposes [`Gamepad`]s.
    pub gamepads: bool,
    /// Can act as the sensor driver (rotation source).
    pub sensors: bool,
    pub rumble: bool,
}

/// One connected physical controller.
///
/// Readings are snapshots of the driver's last update; the poller reads them
/// once per tick.
pub trait Gamepad {
    /// Pressed state per driver-local button index.
    fn current_buttons(&self) -> Vec<bool>;
    /// Raw signed readings per axis index.
    fn current_axes(&self) -> Vec<i16>;
    /// Direction per hat index.
    fn current_hats(&self) -> Vec<crate::event::HatDirection>;

    /// Stable identifier (persisted as the preferred device).
    fn name(&self) -> &str;

    /// User-facing label. Defaults to [`Gamepad::name`].
    fn visible_name(&self) -> &str {
        self.name()
    }

    fn metadata(&self) -> GamepadMeta {
        GamepadMeta::default()
    }
}

/// Force-feedback sink handed to the emulation core.
pub trait Rumble {
    fn set_rumble(&mut self, enable: bool);
}

/// Tilt/gyro source handed to the emulation core.
pub trait RotationSource {
    /// Latch a fresh reading.
    fn sample(&mut self);
    fn read_tilt_x(&self) -> i32;
    fn read_tilt_y(&self) -> i32;
    fn read_gyro_z(&self) -> i32;
}

/// Adapter for one input device family.
///
/// Everything except [`InputDriver::device_type`] and
/// [`InputDriver::capabilities`] has a do-nothing default so simple drivers
/// (like the keyboard) only implement what they support.
pub trait InputDriver {
    fn device_type(&self) -> DeviceType;
    fn capabilities(&self) -> Capabilities;
    fn name(&self) -> &str;

    /// Refresh device state (enumerate pads, pump backend events).
    fn update(&mut self) {}

    /// Write this driver's default bindings into `map`.
    fn bind_defaults(&self, _map: &mut InputMap) {}

    fn load_configuration(&mut self, _config: &ConfigStore) {}
    fn save_configuration(&self, _config: &mut ConfigStore) {}

    /// Name of the profile matching the active gamepad, if any.
    fn current_profile(&self) -> Option<String> {
        None
    }

    fn connected_gamepads(&self) -> Vec<&dyn Gamepad> {
        Vec::new()
    }

    fn active_gamepad_index(&self) -> Option<usize> {
        None
    }

    fn set_active_gamepad(&mut self, _index: usize) {}

    fn active_gamepad(&self) -> Option<&dyn Gamepad> {
        let index = self.active_gamepad_index()?;
        self.connected_gamepads().get(index).copied()
    }

    fn rumble(&mut self) -> Option<&mut dyn Rumble> {
        None
    }

    fn rotation_source(&mut self) -> Option<&mut dyn RotationSource> {
        None
    }
}
