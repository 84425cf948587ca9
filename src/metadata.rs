//! Gamepad metadata snapshot.
//!
//! [`GamepadMeta`] is a lightweight, cloneable description of a controller
//! suitable for UI display, logging and profile matching. Drivers populate
//! what they know; unknown fields remain `None`.
//!
//! # Conventions
//! - `bus` is a short, human-readable hint like `"usb"`, `"bluetooth"` or `"xinput"`.
//! - `product_string` should be a friendly, user-facing name when available.
//! - `slot` is the driver-local slot (XInput `0..4`, gilrs id) when meaningful.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GamepadMeta {
    /// High-level bus classification.
    pub bus: Option<String>,

    /// USB Vendor ID (VID), if known.
    pub vid: Option<u16>,

    /// USB Product ID (PID), if known.
    pub pid: Option<u16>,

    /// Human-readable product name from the driver/firmware.
    pub product_string: Option<String>,

    /// Driver-local slot index.
    pub slot: Option<u32>,
}
