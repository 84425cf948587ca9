//! Persistent configuration store.
//!
//! Bindings, named profiles, preferred gamepads and frontend options live in a
//! single TOML file:
//!
//! ```toml
//! [options]
//! ignore_window_focus = false
//! camera_driver = "native"
//!
//! [input.KBD.keys]
//! A = 88
//! B = 90
//!
//! [input-profile."Xbox 360 Controller".XI.keys]
//! A = 0
//!
//! [preferred.XI]
//! 0 = "XInput Controller 0"
//! ```
//!
//! Binding sections are kept as raw TOML values and only decoded on load, so a
//! malformed section for one device never prevents the rest of the file from
//! loading; it simply reads as "no saved bindings".

use crate::binding::{BindingsSection, DeviceBindings};
use crate::device::DeviceType;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Which camera stack feeds the image sensor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraDriver {
    /// No camera; the image sensor serves the loaded still image.
    None,
    /// The registered [`CameraBackend`](crate::camera::CameraBackend).
    #[default]
    Native,
}

/// Frontend options consulted by the input layer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    /// Deliver gamepad events even when no widget has focus.
    #[serde(default)]
    pub ignore_window_focus: bool,
    /// Camera device id selected by the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<String>,
    #[serde(default)]
    pub camera_driver: CameraDriver,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    options: Options,
    #[serde(default)]
    input: BTreeMap<String, toml::Value>,
    #[serde(default, rename = "input-profile")]
    profiles: BTreeMap<String, BTreeMap<String, toml::Value>>,
    #[serde(default)]
    preferred: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(default)]
    driver: BTreeMap<String, toml::Table>,
}

/// Key-value persistence for bindings and options.
#[derive(Clone, Debug, Default)]
pub struct ConfigStore {
    path: Option<PathBuf>,
    data: ConfigFile,
}

impl ConfigStore {
    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open `path`, starting empty if it does not exist yet.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = if path.exists() {
            let content = fs::read_to_string(&path)?;
            toml::from_str(&content)?
        } else {
            log::info!("no input configuration at {}, starting empty", path.display());
            ConfigFile::default()
        };
        Ok(Self {
            path: Some(path),
            data,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(Self {
            path: None,
            data: toml::from_str(content)?,
        })
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(&self.data)?)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Flush to disk. In-memory stores succeed without doing anything.
    pub fn write(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut out = String::from("# padbridge input configuration\n\n");
        out.push_str(&self.to_toml_string()?);
        fs::write(path, out)?;
        Ok(())
    }

    pub fn options(&self) -> &Options {
        &self.data.options
    }

    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.data.options
    }

    /// Saved bindings for `ty`; `None` when absent or malformed.
    pub fn load_bindings(&self, ty: DeviceType) -> Option<DeviceBindings> {
        decode_section(self.data.input.get(&ty.name())?)
    }

    pub fn save_bindings(&mut self, ty: DeviceType, bindings: &DeviceBindings) -> Result<()> {
        let value = toml::Value::try_from(bindings.to_section())?;
        self.data.input.insert(ty.name(), value);
        Ok(())
    }

    pub fn load_profile(&self, ty: DeviceType, profile: &str) -> Option<DeviceBindings> {
        decode_section(self.data.profiles.get(profile)?.get(&ty.name())?)
    }

    pub fn save_profile(
        &mut self,
        ty: DeviceType,
        profile: &str,
        bindings: &DeviceBindings,
    ) -> Result<()> {
        let value = toml::Value::try_from(bindings.to_section())?;
        self.data
            .profiles
            .entry(profile.to_string())
            .or_default()
            .insert(ty.name(), value);
        Ok(())
    }

    pub fn profile_names(&self) -> impl Iterator<Item = &str> {
        self.data.profiles.keys().map(String::as_str)
    }

    pub fn preferred_device(&self, ty: DeviceType, player: usize) -> Option<&str> {
        self.data
            .preferred
            .get(&ty.name())?
            .get(&player.to_string())
            .map(String::as_str)
    }

    pub fn set_preferred_device(&mut self, ty: DeviceType, player: usize, name: &str) {
        self.data
            .preferred
            .entry(ty.name())
            .or_default()
            .insert(player.to_string(), name.to_string());
    }

    /// Opaque per-driver settings table.
    pub fn driver_settings(&self, ty: DeviceType) -> Option<&toml::Table> {
        self.data.driver.get(&ty.name())
    }

    pub fn set_driver_settings(&mut self, ty: DeviceType, settings: toml::Table) {
        self.data.driver.insert(ty.name(), settings);
    }
}

fn decode_section(value: &toml::Value) -> Option<DeviceBindings> {
    let section: BindingsSection = match value.clone().try_into() {
        Ok(s) => s,
        Err(e) => {
            log::warn!("ignoring malformed binding section: {e}");
            return None;
        }
    };
    DeviceBindings::from_section(&section)
}
