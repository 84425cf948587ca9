//! Binding store: physical sources → logical buttons.
//!
//! An [`InputMap`] holds one [`DeviceBindings`] table per [`DeviceType`]:
//!
//! - **keys**: one physical key/button code per logical [`Button`]
//!   (binding a button again replaces its previous key),
//! - **axes**: per axis index, a center, a threshold (deadzone) and the
//!   buttons driven on either side,
//! - **hats**: per hat index, the buttons driven by each cardinal direction.
//!
//! [`InputMapper`] is a read-only view over one device type that turns raw
//! gamepad readings into a [`ButtonSet`].
//!
//! # Axis activation
//! A reading `v` is *positive* once `v - center >= threshold` and *negative*
//! once `v - center <= -threshold`. Anything in between is inactive.
//! Unbound axes use center `0` and [`DEFAULT_AXIS_THRESHOLD`].

use crate::button::{Button, ButtonSet};
use crate::device::DeviceType;
use crate::event::{AxisDirection, HatDirection};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Threshold applied to axes without an explicit binding.
pub const DEFAULT_AXIS_THRESHOLD: i32 = 0x4000;

/// Digital mapping of one analog axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisBinding {
    #[serde(default)]
    pub center: i32,
    #[serde(default = "default_threshold")]
    pub threshold: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positive: Option<Button>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative: Option<Button>,
}

fn default_threshold() -> i32 {
    DEFAULT_AXIS_THRESHOLD
}

impl Default for AxisBinding {
    fn default() -> Self {
        Self {
            center: 0,
            threshold: DEFAULT_AXIS_THRESHOLD,
            positive: None,
            negative: None,
        }
    }
}

impl AxisBinding {
    /// Which side of the deadzone `value` falls on, if any.
    pub fn direction(&self, value: i16) -> Option<AxisDirection> {
        axis_direction(value, self.center, self.threshold)
    }

    pub fn button(&self, direction: AxisDirection) -> Option<Button> {
        match direction {
            AxisDirection::Positive => self.positive,
            AxisDirection::Negative => self.negative,
        }
    }
}

/// Center/threshold test shared by bound and unbound axes.
pub fn axis_direction(value: i16, center: i32, threshold: i32) -> Option<AxisDirection> {
    let offset = i32::from(value) - center;
    if offset >= threshold {
        Some(AxisDirection::Positive)
    } else if offset <= -threshold {
        Some(AxisDirection::Negative)
    } else {
        None
    }
}

/// Buttons driven by a hat's four cardinal directions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HatBinding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up: Option<Button>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<Button>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down: Option<Button>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<Button>,
}

impl HatBinding {
    /// The usual D-pad layout.
    pub fn dpad() -> Self {
        Self {
            up: Some(Button::Up),
            right: Some(Button::Right),
            down: Some(Button::Down),
            left: Some(Button::Left),
        }
    }

    pub fn buttons(&self, direction: HatDirection) -> ButtonSet {
        let mut set = ButtonSet::EMPTY;
        let pairs = [
            (HatDirection::UP, self.up),
            (HatDirection::RIGHT, self.right),
            (HatDirection::DOWN, self.down),
            (HatDirection::LEFT, self.left),
        ];
        for (bit, button) in pairs {
            if let (true, Some(b)) = (direction.contains(bit), button) {
                set.insert(b);
            }
        }
        set
    }
}

/// All bindings for one device type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeviceBindings {
    pub keys: BTreeMap<Button, u32>,
    pub axes: BTreeMap<usize, AxisBinding>,
    pub hats: BTreeMap<usize, HatBinding>,
}

impl DeviceBindings {
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty() && self.axes.is_empty() && self.hats.is_empty()
    }

    /// First button (in bit order) bound to `key`.
    pub fn map_key(&self, key: u32) -> Option<Button> {
        self.keys
            .iter()
            .find_map(|(&button, &bound)| (bound == key).then_some(button))
    }

    /// Flatten into the string-keyed shape used by the config file.
    pub fn to_section(&self) -> BindingsSection {
        BindingsSection {
            keys: self
                .keys
                .iter()
                .map(|(b, k)| (b.name().to_string(), *k))
                .collect(),
            axes: self.axes.iter().map(|(i, a)| (i.to_string(), *a)).collect(),
            hats: self.hats.iter().map(|(i, h)| (i.to_string(), *h)).collect(),
        }
    }

    /// Rebuild from a config section. Returns `None` if any entry is malformed.
    pub fn from_section(section: &BindingsSection) -> Option<Self> {
        let mut out = DeviceBindings::default();
        for (name, key) in &section.keys {
            out.keys.insert(Button::from_name(name)?, *key);
        }
        for (idx, axis) in &section.axes {
            out.axes.insert(idx.parse().ok()?, *axis);
        }
        for (idx, hat) in &section.hats {
            out.hats.insert(idx.parse().ok()?, *hat);
        }
        Some(out)
    }
}

/// Serialized form of [`DeviceBindings`] (TOML tables need string keys).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BindingsSection {
    #[serde(default)]
    pub keys: BTreeMap<String, u32>,
    #[serde(default)]
    pub axes: BTreeMap<String, AxisBinding>,
    #[serde(default)]
    pub hats: BTreeMap<String, HatBinding>,
}

/// Per-player binding store.
#[derive(Clone, Debug, Default)]
pub struct InputMap {
    devices: BTreeMap<DeviceType, DeviceBindings>,
}

impl InputMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `key` (a key code or gamepad button index) to `button`.
    pub fn bind_key(&mut self, ty: DeviceType, key: u32, button: Button) {
        self.devices.entry(ty).or_default().keys.insert(button, key);
    }

    pub fn unbind_key(&mut self, ty: DeviceType, button: Button) {
        if let Some(d) = self.devices.get_mut(&ty) {
            d.keys.remove(&button);
        }
    }

    pub fn map_key(&self, ty: DeviceType, key: u32) -> Option<Button> {
        self.devices.get(&ty)?.map_key(key)
    }

    /// Key currently bound to `button`.
    pub fn query_key(&self, ty: DeviceType, button: Button) -> Option<u32> {
        self.devices.get(&ty)?.keys.get(&button).copied()
    }

    pub fn bind_axis(&mut self, ty: DeviceType, axis: usize, binding: AxisBinding) {
        self.devices.entry(ty).or_default().axes.insert(axis, binding);
    }

    pub fn unbind_axis(&mut self, ty: DeviceType, axis: usize) {
        if let Some(d) = self.devices.get_mut(&ty) {
            d.axes.remove(&axis);
        }
    }

    pub fn axis(&self, ty: DeviceType, axis: usize) -> Option<&AxisBinding> {
        self.devices.get(&ty)?.axes.get(&axis)
    }

    pub fn bind_hat(&mut self, ty: DeviceType, hat: usize, binding: HatBinding) {
        self.devices.entry(ty).or_default().hats.insert(hat, binding);
    }

    pub fn hat(&self, ty: DeviceType, hat: usize) -> Option<&HatBinding> {
        self.devices.get(&ty)?.hats.get(&hat)
    }

    pub fn device(&self, ty: DeviceType) -> Option<&DeviceBindings> {
        self.devices.get(&ty)
    }

    /// Replace every binding for `ty`.
    pub fn set_device(&mut self, ty: DeviceType, bindings: DeviceBindings) {
        self.devices.insert(ty, bindings);
    }

    pub fn clear(&mut self, ty: DeviceType) {
        self.devices.remove(&ty);
    }

    pub fn mapper(&self, ty: DeviceType) -> InputMapper<'_> {
        InputMapper { map: self, ty }
    }
}

/// Read-only view of an [`InputMap`] for a single device type.
#[derive(Clone, Copy)]
pub struct InputMapper<'a> {
    map: &'a InputMap,
    ty: DeviceType,
}

impl<'a> InputMapper<'a> {
    pub fn device_type(&self) -> DeviceType {
        self.ty
    }

    fn bindings(&self) -> Option<&'a DeviceBindings> {
        self.map.devices.get(&self.ty)
    }

    pub fn map_key(&self, key: u32) -> Option<Button> {
        self.bindings()?.map_key(key)
    }

    /// Buttons driven by the pressed entries of `buttons`.
    pub fn map_keys(&self, buttons: &[bool]) -> ButtonSet {
        buttons
            .iter()
            .enumerate()
            .filter(|(_, &down)| down)
            .filter_map(|(i, _)| self.map_key(i as u32))
            .collect()
    }

    pub fn axis_center(&self, axis: usize) -> i32 {
        self.bindings()
            .and_then(|b| b.axes.get(&axis))
            .map_or(0, |a| a.center)
    }

    pub fn axis_threshold(&self, axis: usize) -> i32 {
        self.bindings()
            .and_then(|b| b.axes.get(&axis))
            .map_or(DEFAULT_AXIS_THRESHOLD, |a| a.threshold)
    }

    /// Side of the deadzone for `value`, using the binding's center/threshold.
    pub fn axis_direction(&self, axis: usize, value: i16) -> Option<AxisDirection> {
        axis_direction(value, self.axis_center(axis), self.axis_threshold(axis))
    }

    /// Button bound to `axis` in `direction`.
    pub fn map_axis_direction(&self, axis: usize, direction: AxisDirection) -> Option<Button> {
        self.bindings()?.axes.get(&axis)?.button(direction)
    }

    pub fn map_axis(&self, axis: usize, value: i16) -> Option<Button> {
        let binding = self.bindings()?.axes.get(&axis)?;
        binding.button(binding.direction(value)?)
    }

    pub fn map_axes(&self, axes: &[i16]) -> ButtonSet {
        axes.iter()
            .enumerate()
            .filter_map(|(i, &v)| self.map_axis(i, v))
            .collect()
    }

    pub fn map_hat(&self, hat: usize, direction: HatDirection) -> ButtonSet {
        self.bindings()
            .and_then(|b| b.hats.get(&hat))
            .map(|h| h.buttons(direction))
            .unwrap_or_default()
    }

    pub fn map_hats(&self, hats: &[HatDirection]) -> ButtonSet {
        let mut set = ButtonSet::EMPTY;
        for (i, &dir) in hats.iter().enumerate() {
            set |= self.map_hat(i, dir);
        }
        set
    }
}
