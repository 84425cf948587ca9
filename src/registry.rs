//! Driver registry.
//!
//! [`DriverRegistry`] owns every [`InputDriver`] for the lifetime of the
//! controller, keyed by [`DeviceType`]. Lookups for an unknown type return
//! `None`/empty, never an error: callers treat a missing driver as "nothing
//! to do".

use crate::device::{DeviceType, Gamepad, InputDriver};
use std::collections::BTreeMap;

#[derive(Default)]
pub struct DriverRegistry {
    drivers: BTreeMap<DeviceType, Box<dyn InputDriver>>,
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry populated with [`probe_drivers`](crate::backends::probe_drivers).
    pub fn discover() -> Self {
        let mut registry = Self::new();
        for driver in crate::backends::probe_drivers() {
            registry.insert(driver);
        }
        registry
    }

    pub fn add_driver<D: InputDriver + 'static>(&mut self, driver: D) {
        self.insert(Box::new(driver));
    }

    /// Register `driver`, replacing any driver of the same type.
    pub fn insert(&mut self, driver: Box<dyn InputDriver>) {
        let ty = driver.device_type();
        log::debug!("registering driver {} ({ty})", driver.name());
        if self.drivers.insert(ty, driver).is_some() {
            log::warn!("driver for {ty} replaced");
        }
    }

    pub fn contains(&self, ty: DeviceType) -> bool {
        self.drivers.contains_key(&ty)
    }

    pub fn get(&self, ty: DeviceType) -> Option<&dyn InputDriver> {
        self.drivers.get(&ty).map(|d| d.as_ref())
    }

    pub fn get_mut(&mut self, ty: DeviceType) -> Option<&mut (dyn InputDriver + 'static)> {
        self.drivers.get_mut(&ty).map(|d| d.as_mut())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn InputDriver> {
        self.drivers.values().map(|d| d.as_ref())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut (dyn InputDriver + 'static)> {
        self.drivers.values_mut().map(|d| d.as_mut())
    }

    pub fn types(&self) -> Vec<DeviceType> {
        self.drivers.keys().copied().collect()
    }

    /// Types of drivers that must be polled for gamepad state.
    pub fn polled_gamepad_types(&self) -> Vec<DeviceType> {
        self.drivers
            .iter()
            .filter(|(_, d)| {
                let caps = d.capabilities();
                caps.polling && caps.gamepads
            })
            .map(|(&ty, _)| ty)
            .collect()
    }

    /// Active gamepad of the driver for `ty`.
    pub fn gamepad(&self, ty: DeviceType) -> Option<&dyn Gamepad> {
        self.get(ty)?.active_gamepad()
    }

    /// Every gamepad-capable driver's active pad.
    pub fn gamepads(&self) -> Vec<(DeviceType, &dyn Gamepad)> {
        self.drivers
            .iter()
            .filter(|(_, d)| d.capabilities().gamepads)
            .filter_map(|(&ty, d)| d.active_gamepad().map(|pad| (ty, pad)))
            .collect()
    }

    /// Move every driver out, in type order.
    pub fn into_drivers(self) -> Vec<Box<dyn InputDriver>> {
        self.drivers.into_values().collect()
    }

    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }
}
