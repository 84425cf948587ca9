//! Named binding profiles.
//!
//! A profile is a reusable binding set that is independent of the per-user
//! configuration. [`InputController::load_profile`](crate::controller::InputController::load_profile)
//! tries the `input-profile` sections of the
//! [`ConfigStore`](crate::config::ConfigStore) first, then the built-in table
//! shipped with the crate. Profiles can also be exported to and imported from
//! JSON files ([`BindingProfile::save_to_file`], [`BindingProfile::load_from_file`]).
//!
//! Built-in entries carry a glob `pattern` (`*`, `?`) matched against the
//! gamepad's name, so one entry covers e.g. every XInput slot.

use crate::binding::{BindingsSection, DeviceBindings, InputMap};
use crate::device::DeviceType;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

/// Serializable profile of input bindings, keyed by device type name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BindingProfile {
    pub name: String,
    /// Glob matched against gamepad names. Absent for user profiles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub bindings: BTreeMap<String, BindingsSection>,
}

impl BindingProfile {
    /// Capture the bindings `map` holds for `types`.
    pub fn capture(name: &str, map: &InputMap, types: &[DeviceType]) -> Self {
        let bindings = types
            .iter()
            .filter_map(|&ty| map.device(ty).map(|b| (ty.name(), b.to_section())))
            .collect();
        Self {
            name: name.to_string(),
            bindings,
            ..Self::default()
        }
    }

    /// Bindings this profile defines for `ty`, if any (and well-formed).
    pub fn bindings_for(&self, ty: DeviceType) -> Option<DeviceBindings> {
        DeviceBindings::from_section(self.bindings.get(&ty.name())?)
    }

    /// Overwrite `map` with every device section of this profile.
    ///
    /// Returns the number of device types applied. Sections naming an unknown
    /// device type or holding malformed entries are skipped.
    pub fn apply(&self, map: &mut InputMap) -> usize {
        let mut applied = 0;
        for (ty_name, section) in &self.bindings {
            let Some(ty) = DeviceType::from_name(ty_name) else {
                log::warn!("profile {:?}: unknown device type {ty_name:?}", self.name);
                continue;
            };
            match DeviceBindings::from_section(section) {
                Some(bindings) => {
                    map.set_device(ty, bindings);
                    applied += 1;
                }
                None => log::warn!("profile {:?}: malformed section for {ty}", self.name),
            }
        }
        applied
    }

    /// Whether this profile's pattern (or, failing that, its name) matches `gamepad`.
    pub fn matches(&self, gamepad: &str) -> bool {
        match &self.pattern {
            Some(p) => glob::Pattern::new(p).map_or(false, |p| p.matches(gamepad)),
            None => self.name == gamepad,
        }
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

static BUILTIN: OnceLock<Vec<BindingProfile>> = OnceLock::new();

/// Profiles shipped with the crate.
pub fn builtin_profiles() -> &'static [BindingProfile] {
    BUILTIN.get_or_init(|| {
        serde_json::from_str(include_str!("profiles.json")).unwrap_or_else(|e| {
            log::error!("built-in profile table is invalid: {e}");
            Vec::new()
        })
    })
}

/// Built-in profile by exact name, or else the first whose pattern matches.
pub fn find_profile(name: &str) -> Option<&'static BindingProfile> {
    let all = builtin_profiles();
    all.iter()
        .find(|p| p.name == name)
        .or_else(|| all.iter().find(|p| p.matches(name)))
}
