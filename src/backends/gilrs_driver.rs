//! Cross-platform gamepad driver on top of `gilrs`.
//!
//! `gilrs` is event driven; [`GilrsDriver::update`] drains its queue and then
//! snapshots every connected pad into a [`GilrsPad`], which is what the poller
//! reads.
//!
//! # Channel layout
//! - Buttons `0..17`: South, East, West, North, LeftTrigger, RightTrigger,
//!   LeftTrigger2, RightTrigger2, Select, Start, Mode, LeftThumb, RightThumb,
//!   DPadUp, DPadDown, DPadLeft, DPadRight.
//! - Axes `0..6`: LeftStickX, LeftStickY, RightStickX, RightStickY, LeftZ,
//!   RightZ, scaled from `[-1, 1]` to `i16` (up is positive on Y).
//! - Hat `0`: the D-pad buttons folded into a direction mask.

use crate::binding::InputMap;
use crate::device::{Capabilities, DeviceType, Gamepad, InputDriver};
use crate::event::HatDirection;
use crate::metadata::GamepadMeta;
use crate::profile::find_profile;
use gilrs::{Axis, Button, Gilrs};

const BUTTONS: [Button; 17] = [
    Button::South,
    Button::East,
    Button::West,
    Button::North,
    Button::LeftTrigger,
    Button::RightTrigger,
    Button::LeftTrigger2,
    Button::RightTrigger2,
    Button::Select,
    Button::Start,
    Button::Mode,
    Button::LeftThumb,
    Button::RightThumb,
    Button::DPadUp,
    Button::DPadDown,
    Button::DPadLeft,
    Button::DPadRight,
];

const AXES: [Axis; 6] = [
    Axis::LeftStickX,
    Axis::LeftStickY,
    Axis::RightStickX,
    Axis::RightStickY,
    Axis::LeftZ,
    Axis::RightZ,
];

/// Snapshot of one gilrs gamepad.
#[derive(Clone, Debug)]
pub struct GilrsPad {
    id: usize,
    name: String,
    visible_name: String,
    meta: GamepadMeta,
    buttons: Vec<bool>,
    axes: Vec<i16>,
    hat: HatDirection,
}

impl Gamepad for GilrsPad {
    fn current_buttons(&self) -> Vec<bool> {
        self.buttons.clone()
    }

    fn current_axes(&self) -> Vec<i16> {
        self.axes.clone()
    }

    fn current_hats(&self) -> Vec<HatDirection> {
        vec![self.hat]
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn visible_name(&self) -> &str {
        &self.visible_name
    }

    fn metadata(&self) -> GamepadMeta {
        self.meta.clone()
    }
}

#[inline]
fn scale_axis(v: f32) -> i16 {
    (v.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16
}

pub struct GilrsDriver {
    gilrs: Gilrs,
    pads: Vec<GilrsPad>,
    active: Option<usize>,
}

impl GilrsDriver {
    pub fn new() -> Option<Self> {
        match Gilrs::new() {
            Ok(gilrs) => {
                let mut driver = Self {
                    gilrs,
                    pads: Vec::new(),
                    active: None,
                };
                driver.refresh();
                Some(driver)
            }
            Err(e) => {
                log::warn!("failed to initialize gilrs: {e}");
                None
            }
        }
    }

    fn refresh(&mut self) {
        let previous = self
            .active
            .and_then(|i| self.pads.get(i))
            .map(|p| p.name.clone());

        self.pads = self
            .gilrs
            .gamepads()
            .filter(|(_, pad)| pad.is_connected())
            .map(|(id, pad)| {
                let buttons: Vec<bool> = BUTTONS.iter().map(|&b| pad.is_pressed(b)).collect();
                let mut hat = 0u8;
                for (i, bit) in [HatDirection::UP, HatDirection::DOWN, HatDirection::LEFT, HatDirection::RIGHT]
                    .into_iter()
                    .enumerate()
                {
                    if buttons[13 + i] {
                        hat |= bit.bits();
                    }
                }
                let id = usize::from(id);
                GilrsPad {
                    id,
                    name: format!("{} #{}", pad.name(), id),
                    visible_name: pad.name().to_string(),
                    meta: GamepadMeta {
                        bus: Some("gilrs".to_string()),
                        vid: pad.vendor_id(),
                        pid: pad.product_id(),
                        product_string: Some(pad.os_name().to_string()),
                        slot: Some(id as u32),
                    },
                    axes: AXES.iter().map(|&a| scale_axis(pad.value(a))).collect(),
                    buttons,
                    hat: HatDirection::from_bits(hat),
                }
            })
            .collect();

        self.active = match previous {
            Some(name) => self.pads.iter().position(|p| p.name == name),
            None => None,
        }
        .or(if self.pads.is_empty() { None } else { Some(0) });
    }
}

impl InputDriver for GilrsDriver {
    fn device_type(&self) -> DeviceType {
        DeviceType::GILRS
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            polling: true,
            gamepads: true,
            sensors: false,
            rumble: false,
        }
    }

    fn name(&self) -> &str {
        "gilrs"
    }

    fn update(&mut self) {
        while let Some(_event) = self.gilrs.next_event() {
            #[cfg(feature = "debug-log")]
            log::trace!("[GILRS] {:?}", _event);
        }
        self.refresh();
    }

    fn bind_defaults(&self, map: &mut InputMap) {
        if let Some(bindings) =
            find_profile("Standard Gamepad").and_then(|p| p.bindings_for(DeviceType::GILRS))
        {
            map.set_device(DeviceType::GILRS, bindings);
        }
    }

    fn current_profile(&self) -> Option<String> {
        let pad = self.active.and_then(|i| self.pads.get(i))?;
        find_profile(&pad.visible_name).map(|p| p.name.clone())
    }

    fn connected_gamepads(&self) -> Vec<&dyn Gamepad> {
        self.pads.iter().map(|p| p as &dyn Gamepad).collect()
    }

    fn active_gamepad_index(&self) -> Option<usize> {
        self.active
    }

    fn set_active_gamepad(&mut self, index: usize) {
        if index < self.pads.len() {
            log::debug!("gilrs: active gamepad {} ({})", index, self.pads[index].id);
            self.active = Some(index);
        }
    }
}
