//! Input drivers for `padbridge`.
//!
//! Implementations of [`InputDriver`](crate::device::InputDriver) for the
//! device families padbridge knows about.
//!
//! # Feature flags
//! - **`xinput`**: the Windows XInput driver (default).
//! - **`gilrs`**: the cross-platform `gilrs` gamepad driver.
//!
//! The keyboard and virtual drivers are always available.

use crate::device::InputDriver;

pub mod keyboard;
pub mod virtual_input;

#[cfg(feature = "gilrs")]
#[cfg_attr(docsrs, doc(cfg(feature = "gilrs")))]
pub mod gilrs_driver;

#[cfg(target_os = "windows")]
#[cfg_attr(docsrs, doc(cfg(target_os = "windows")))]
pub mod windows;

/// Unified discovery across enabled drivers.
///
/// Always returns the keyboard driver first, followed by XInput on Windows
/// (with `xinput`) and gilrs (with `gilrs`, when it initializes).
pub fn probe_drivers() -> Vec<Box<dyn InputDriver>> {
    let mut out: Vec<Box<dyn InputDriver>> = vec![Box::new(keyboard::KeyboardDriver::new())];

    #[cfg(all(feature = "xinput", target_os = "windows"))]
    out.push(Box::new(windows::XInputDriver::new()));

    #[cfg(feature = "gilrs")]
    if let Some(driver) = gilrs_driver::GilrsDriver::new() {
        out.push(Box::new(driver));
    }

    log::debug!(
        "probed drivers: {:?}",
        out.iter().map(|d| d.device_type()).collect::<Vec<_>>()
    );
    out
}
