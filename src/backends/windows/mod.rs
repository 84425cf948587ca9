#![cfg(target_os = "windows")]

//! Windows input backends.
//!
//! - **XInput** controller support ([`XInputDriver`])
//! - **Raw Input** keyboard capture for background input ([`RawKeyboardHook`])
//!
//! Most hosts should not touch these directly. [`probe_drivers`](super::probe_drivers)
//! registers the XInput driver, and
//! [`InputController::register_native_event_filter`](crate::controller::InputController::register_native_event_filter)
//! owns the keyboard hook.

pub mod keyboard_hook;
pub mod raw_input;
#[cfg(feature = "xinput")]
pub mod xinput;

pub use keyboard_hook::RawKeyboardHook;
#[cfg(feature = "xinput")]
pub use xinput::XInputDriver;
