//! Error type shared across the crate.
//!
//! Most of the input layer is infallible by contract (missing drivers are
//! silent no-ops, malformed bindings fall back to defaults). Errors only
//! surface from the edges that touch the filesystem or the OS.

use thiserror::Error;

/// Errors reported by configuration, profile and image I/O.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("invalid profile file: {0}")]
    Profile(#[from] serde_json::Error),

    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),

    /// A camera backend refused to open or start a device.
    #[error("camera error: {0}")]
    Camera(String),

    /// `RegisterRawInputDevices` (or its removal counterpart) failed.
    #[error("raw input registration failed (os error {0})")]
    RawInputRegistration(u32),
}

/// Convenience alias used by fallible public APIs.
pub type Result<T> = std::result::Result<T, InputError>;
