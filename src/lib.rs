//! padbridge: input bindings, gamepad polling and sensor bridging for a
//! handheld emulator frontend.
//!
//! The crate maps keyboard, gamepad and sensor input onto the ten emulated
//! console buttons, persists bindings and named profiles, polls gamepads on a
//! fixed cadence to synthesize press/release events for the focused widget,
//! re-injects keys captured by a native background hook, and hands the
//! emulation core pull-based luminance and camera-image sensors.
//!
//! # Layout
//! - [`button`], [`event`]: logical buttons, toolkit keys and synthetic events.
//! - [`binding`], [`config`], [`profile`]: the binding store and its persistence.
//! - [`device`], [`registry`], [`backends`]: drivers and their registry.
//! - [`poller`], [`pending`], [`snapshot`]: gamepad edge detection.
//! - [`eventbus`], [`hook`]: delivery to the host GUI toolkit.
//! - [`sensor`], `camera`: luminance and image sensors.
//! - [`controller`]: the per-player facade tying it together.
//!
//! # Feature flags
//! - **`xinput`** (default): Windows XInput driver.
//! - **`camera`** (default): camera backends feeding the image sensor.
//! - **`gilrs`**: cross-platform gamepads through `gilrs`.
//! - **`debug-log`**: per-poll and per-packet trace logging.

pub mod backends;
pub mod binding;
pub mod button;
#[cfg(feature = "camera")]
pub mod camera;
pub mod config;
pub mod controller;
pub mod device;
pub mod error;
pub mod event;
pub mod eventbus;
pub mod filtered_listener;
pub mod hook;
pub mod logger;
pub mod metadata;
pub mod pending;
pub mod poller;
pub mod profile;
pub mod registry;
pub mod sensor;
pub mod slots;
pub mod snapshot;

pub use binding::{AxisBinding, DeviceBindings, HatBinding, InputMap, InputMapper};
pub use button::{Button, ButtonSet};
pub use config::{ConfigStore, Options};
pub use controller::InputController;
pub use device::{Capabilities, DeviceType, Gamepad, InputDriver, RotationSource, Rumble};
pub use error::{InputError, Result};
pub use event::*;
pub use eventbus::{EventFilter, FocusRouter, InputEventBus, InputListener, Toolkit, WidgetId};
pub use profile::{find_profile, BindingProfile};
pub use registry::DriverRegistry;
pub use sensor::{ImageFrame, ImageSource, LuminanceSource};
pub use slots::{PlayerSlot, SlotAllocator, MAX_PLAYERS};
