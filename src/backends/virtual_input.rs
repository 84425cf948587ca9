//! Scriptable in-memory driver.
//!
//! [`VirtualDriver`] exposes [`VirtualGamepad`]s whose readings are set from
//! code. Pads are cheap handles over shared state, so a host can keep a clone
//! and keep feeding it after the driver has moved into the registry. Useful
//! for input replay, automation and tests.

use crate::binding::{AxisBinding, HatBinding, InputMap};
use crate::button::Button;
use crate::device::{Capabilities, DeviceType, Gamepad, InputDriver, Rumble};
use crate::event::HatDirection;
use crate::profile::find_profile;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Default)]
struct PadState {
    buttons: Vec<bool>,
    axes: Vec<i16>,
    hats: Vec<HatDirection>,
}

/// A gamepad whose readings are set from code.
#[derive(Clone, Debug)]
pub struct VirtualGamepad {
    name: String,
    state: Arc<Mutex<PadState>>,
}

impl VirtualGamepad {
    pub fn new(name: &str, buttons: usize, axes: usize, hats: usize) -> Self {
        Self {
            name: name.to_string(),
            state: Arc::new(Mutex::new(PadState {
                buttons: vec![false; buttons],
                axes: vec![0; axes],
                hats: vec![HatDirection::CENTERED; hats],
            })),
        }
    }

    pub fn set_axis(&self, axis: usize, value: i16) {
        if let Some(a) = self.state.lock().axes.get_mut(axis) {
            *a = value;
        }
    }

    pub fn press_button(&self, button: usize) {
        self.set_button(button, true);
    }

    pub fn release_button(&self, button: usize) {
        self.set_button(button, false);
    }

    pub fn set_button(&self, button: usize, down: bool) {
        if let Some(b) = self.state.lock().buttons.get_mut(button) {
            *b = down;
        }
    }

    pub fn set_hat(&self, hat: usize, direction: HatDirection) {
        if let Some(h) = self.state.lock().hats.get_mut(hat) {
            *h = direction;
        }
    }

    /// Return every element to rest.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.buttons.iter_mut().for_each(|b| *b = false);
        state.axes.iter_mut().for_each(|a| *a = 0);
        state.hats.iter_mut().for_each(|h| *h = HatDirection::CENTERED);
    }
}

impl Gamepad for VirtualGamepad {
    fn current_buttons(&self) -> Vec<bool> {
        self.state.lock().buttons.clone()
    }

    fn current_axes(&self) -> Vec<i16> {
        self.state.lock().axes.clone()
    }

    fn current_hats(&self) -> Vec<HatDirection> {
        self.state.lock().hats.clone()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Rumble sink that records the last requested state.
#[derive(Clone, Debug, Default)]
pub struct RecordingRumble {
    active: Arc<Mutex<bool>>,
}

impl RecordingRumble {
    pub fn is_active(&self) -> bool {
        *self.active.lock()
    }
}

impl Rumble for RecordingRumble {
    fn set_rumble(&mut self, enable: bool) {
        *self.active.lock() = enable;
    }
}

/// Driver over a fixed list of [`VirtualGamepad`]s.
pub struct VirtualDriver {
    device_type: DeviceType,
    capabilities: Capabilities,
    pads: Vec<VirtualGamepad>,
    active: Option<usize>,
    rumble: RecordingRumble,
}

impl VirtualDriver {
    pub fn new(pads: Vec<VirtualGamepad>) -> Self {
        Self {
            device_type: DeviceType::VIRTUAL,
            capabilities: Capabilities {
                polling: true,
                gamepads: true,
                sensors: false,
                rumble: true,
            },
            active: if pads.is_empty() { None } else { Some(0) },
            pads,
            rumble: RecordingRumble::default(),
        }
    }

    /// Register under a different device type (to run several virtual drivers).
    pub fn with_device_type(mut self, device_type: DeviceType) -> Self {
        self.device_type = device_type;
        self
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Handle observing what the core asked the rumble motor to do.
    pub fn rumble_handle(&self) -> RecordingRumble {
        self.rumble.clone()
    }
}

impl InputDriver for VirtualDriver {
    fn device_type(&self) -> DeviceType {
        self.device_type
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn name(&self) -> &str {
        "Virtual"
    }

    /// Button `n` drives logical button `n`; axes 0/1 and hat 0 drive the D-pad.
    fn bind_defaults(&self, map: &mut InputMap) {
        let ty = self.device_type;
        for button in Button::ALL {
            map.bind_key(ty, button.index() as u32, button);
        }
        map.bind_axis(
            ty,
            0,
            AxisBinding {
                positive: Some(Button::Right),
                negative: Some(Button::Left),
                ..AxisBinding::default()
            },
        );
        map.bind_axis(
            ty,
            1,
            AxisBinding {
                positive: Some(Button::Down),
                negative: Some(Button::Up),
                ..AxisBinding::default()
            },
        );
        map.bind_hat(ty, 0, HatBinding::dpad());
    }

    fn current_profile(&self) -> Option<String> {
        let pad = self.active_gamepad()?;
        find_profile(pad.name()).map(|p| p.name.clone())
    }

    fn connected_gamepads(&self) -> Vec<&dyn Gamepad> {
        self.pads.iter().map(|p| p as &dyn Gamepad).collect()
    }

    fn active_gamepad_index(&self) -> Option<usize> {
        self.active
    }

    fn set_active_gamepad(&mut self, index: usize) {
        if index < self.pads.len() {
            self.active = Some(index);
        }
    }

    fn rumble(&mut self) -> Option<&mut dyn Rumble> {
        if self.capabilities.rumble {
            Some(&mut self.rumble)
        } else {
            None
        }
    }
}
