#![cfg(target_os = "windows")]

//! Windows XInput driver.
//!
//! Exposes the four XInput slots as [`Gamepad`]s under
//! [`DeviceType::XINPUT`]. Slots are polled with `XInputGetState` on every
//! [`InputDriver::update`]; only connected slots are listed, and the active
//! pad is tracked by name so a reconnect in another slot does not steal
//! the selection.
//!
//! # Channel layout
//! ## Buttons (10)
//! `0..9`: A, B, X, Y, LB, RB, Back, Start, LThumb, RThumb.
//!
//! ## Axes (6)
//! Raw signed readings, so bindings choose their own center and threshold:
//! - `0`: Left stick X (LX)
//! - `1`: Left stick Y (LY), up is positive
//! - `2`: Right stick X (RX)
//! - `3`: Right stick Y (RY)
//! - `4`: Left trigger (LT) scaled `0..255 -> 0..32640`
//! - `5`: Right trigger (RT) scaled the same way
//!
//! ## Hat (1)
//! - `hat = 0` is the D-pad. Conflicting bits (up+down, left+right) read as
//!   centered.
//!
//! # Rumble
//! [`XInputRumble`] drives both motors of the active slot at full speed.
//!
//! # Debug logging
//! With the `debug-log` feature, the first successful poll after a connect
//! logs an `[XINPUT/CONNECT]` line.

use crate::binding::InputMap;
use crate::device::{Capabilities, DeviceType, Gamepad, InputDriver, Rumble};
use crate::event::HatDirection;
use crate::metadata::GamepadMeta;
use crate::profile::find_profile;

use windows_sys::Win32::UI::Input::XboxController::*;

/// XInput supports at most four controllers.
pub const XUSER_MAX_COUNT: u32 = 4;

const MAX_AXES: usize = 6;

const BUTTON_MAP: [u16; 10] = [
    XINPUT_GAMEPAD_A,
    XINPUT_GAMEPAD_B,
    XINPUT_GAMEPAD_X,
    XINPUT_GAMEPAD_Y,
    XINPUT_GAMEPAD_LEFT_SHOULDER,
    XINPUT_GAMEPAD_RIGHT_SHOULDER,
    XINPUT_GAMEPAD_BACK,
    XINPUT_GAMEPAD_START,
    XINPUT_GAMEPAD_LEFT_THUMB,
    XINPUT_GAMEPAD_RIGHT_THUMB,
];

/// Last reading of one XInput slot.
#[derive(Clone, Debug)]
pub struct XInputPad {
    /// XInput slot index in `0..4`.
    slot: u32,
    name: String,
    buttons: u16,
    axes: [i16; MAX_AXES],
    hat: HatDirection,
}

impl XInputPad {
    fn new(slot: u32) -> Self {
        Self {
            slot,
            name: format!("XInput Controller {slot}"),
            buttons: 0,
            axes: [0; MAX_AXES],
            hat: HatDirection::CENTERED,
        }
    }

    pub fn slot(&self) -> u32 {
        self.slot
    }

    fn apply(&mut self, gp: &XINPUT_GAMEPAD) {
        self.buttons = gp.wButtons;
        self.axes = [
            gp.sThumbLX,
            gp.sThumbLY,
            gp.sThumbRX,
            gp.sThumbRY,
            scale_trigger(gp.bLeftTrigger),
            scale_trigger(gp.bRightTrigger),
        ];
        self.hat = HatDirection::from_octant(compute_hat(gp.wButtons));
    }
}

impl Gamepad for XInputPad {
    fn current_buttons(&self) -> Vec<bool> {
        BUTTON_MAP.iter().map(|&mask| self.buttons & mask != 0).collect()
    }

    fn current_axes(&self) -> Vec<i16> {
        self.axes.to_vec()
    }

    fn current_hats(&self) -> Vec<HatDirection> {
        vec![self.hat]
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn metadata(&self) -> GamepadMeta {
        GamepadMeta {
            bus: Some("xinput".to_string()),
            // Microsoft, conventional
            vid: Some(0x045e),
            pid: None,
            product_string: Some(self.name.clone()),
            slot: Some(self.slot),
        }
    }
}

#[inline]
fn scale_trigger(v: u8) -> i16 {
    i16::from(v) * 128
}

/// Map XInput D-pad bits to an octant: `-1` neutral, `0..7` Up clockwise.
fn compute_hat(buttons: u16) -> i8 {
    let up = buttons & XINPUT_GAMEPAD_DPAD_UP != 0;
    let down = buttons & XINPUT_GAMEPAD_DPAD_DOWN != 0;
    let left = buttons & XINPUT_GAMEPAD_DPAD_LEFT != 0;
    let right = buttons & XINPUT_GAMEPAD_DPAD_RIGHT != 0;

    match (up, down, left, right) {
        (true, false, false, false) => 0,
        (true, false, false, true) => 1,
        (false, false, false, true) => 2,
        (false, true, false, true) => 3,
        (false, true, false, false) => 4,
        (false, true, true, false) => 5,
        (false, false, true, false) => 6,
        (true, false, true, false) => 7,
        _ => -1,
    }
}

/// Rumble sink bound to one XInput slot.
#[derive(Debug, Default)]
pub struct XInputRumble {
    slot: Option<u32>,
}

impl Rumble for XInputRumble {
    fn set_rumble(&mut self, enable: bool) {
        let Some(slot) = self.slot else {
            return;
        };
        let speed = if enable { u16::MAX } else { 0 };
        let mut vibration = XINPUT_VIBRATION {
            wLeftMotorSpeed: speed,
            wRightMotorSpeed: speed,
        };
        let res = unsafe { XInputSetState(slot, &mut vibration) };
        if res != 0 {
            log::debug!("XInputSetState(slot {slot}) failed: {res}");
        }
    }
}

pub struct XInputDriver {
    slots: [XInputPad; XUSER_MAX_COUNT as usize],
    connected: [bool; XUSER_MAX_COUNT as usize],
    active: Option<u32>,
    rumble: XInputRumble,
}

impl Default for XInputDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl XInputDriver {
    pub fn new() -> Self {
        let mut driver = Self {
            slots: [0, 1, 2, 3].map(XInputPad::new),
            connected: [false; XUSER_MAX_COUNT as usize],
            active: None,
            rumble: XInputRumble::default(),
        };
        driver.poll_slots();
        driver
    }

    fn poll_slots(&mut self) {
        for slot in 0..XUSER_MAX_COUNT {
            let i = slot as usize;
            let mut state: XINPUT_STATE = unsafe { std::mem::zeroed() };
            // XInputGetState returns 0 on success.
            let res = unsafe { XInputGetState(slot, &mut state) };
            if res != 0 {
                if self.connected[i] {
                    log::info!("XInput slot {slot} disconnected");
                }
                self.connected[i] = false;
                continue;
            }

            if !self.connected[i] {
                #[cfg(feature = "debug-log")]
                log::debug!("[XINPUT/CONNECT] slot={} packet={}", slot, state.dwPacketNumber);
                log::info!("XInput slot {slot} connected");
                self.connected[i] = true;
            }
            self.slots[i].apply(&state.Gamepad);
        }

        if self.active.map_or(true, |s| !self.connected[s as usize]) {
            self.active = (0..XUSER_MAX_COUNT).find(|&s| self.connected[s as usize]);
        }
        self.rumble.slot = self.active;
    }

    fn connected_slots(&self) -> impl Iterator<Item = &XInputPad> {
        self.slots.iter().filter(|p| self.connected[p.slot as usize])
    }
}

impl InputDriver for XInputDriver {
    fn device_type(&self) -> DeviceType {
        DeviceType::XINPUT
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            polling: true,
            gamepads: true,
            sensors: false,
            rumble: true,
        }
    }

    fn name(&self) -> &str {
        "XInput"
    }

    fn update(&mut self) {
        self.poll_slots();
    }

    fn bind_defaults(&self, map: &mut InputMap) {
        if let Some(bindings) =
            find_profile("XInput Controller").and_then(|p| p.bindings_for(DeviceType::XINPUT))
        {
            map.set_device(DeviceType::XINPUT, bindings);
        }
    }

    fn current_profile(&self) -> Option<String> {
        let pad = self.active_gamepad()?;
        find_profile(pad.name()).map(|p| p.name.clone())
    }

    fn connected_gamepads(&self) -> Vec<&dyn Gamepad> {
        self.connected_slots().map(|p| p as &dyn Gamepad).collect()
    }

    fn active_gamepad_index(&self) -> Option<usize> {
        let active = self.active?;
        self.connected_slots().position(|p| p.slot == active)
    }

    fn set_active_gamepad(&mut self, index: usize) {
        if let Some(slot) = self.connected_slots().nth(index).map(|p| p.slot) {
            self.active = Some(slot);
            self.rumble.slot = Some(slot);
        }
    }

    fn rumble(&mut self) -> Option<&mut dyn Rumble> {
        Some(&mut self.rumble)
    }
}
