//! JSON configuration for excitations
//!
//! Constant boundary values can be kept next to the mesh in a JSON file:
//!
//! ```json
//! {
//!   "voltages": { "inner": 1.0, "outer": 0.0 },
//!   "dielectrics": { "dielectric": 2.0 },
//!   "floating_conductors": {}
//! }
//! ```
//!
//! Position-dependent voltages are closures and can only be assigned from code.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{ExcitationError, Result};
use crate::core::excitation::Excitation;

/// Constant excitations per group name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExcitationConfig {
    /// Fixed electrode voltages
    #[serde(default)]
    pub voltages: BTreeMap<String, f64>,
    /// Relative permittivity of dielectric groups
    #[serde(default)]
    pub dielectrics: BTreeMap<String, f64>,
    /// Total charge of floating conductors
    #[serde(default)]
    pub floating_conductors: BTreeMap<String, f64>,
}

impl ExcitationConfig {
    /// Parse from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| ExcitationError::Config(format!("Failed to parse JSON: {}", e)))
    }

    /// Load from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ExcitationError::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_json_str(&contents)
    }

    /// Serialize to pretty JSON
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ExcitationError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Save to a JSON file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = self.to_json_string()?;
        fs::write(path, json)
            .map_err(|e| ExcitationError::Config(format!("Failed to write config file: {}", e)))
    }

    /// Total number of configured groups
    pub fn len(&self) -> usize {
        self.voltages.len() + self.dielectrics.len() + self.floating_conductors.len()
    }

    /// True if nothing is configured
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Excitation<'_> {
    /// Apply every entry of `config`
    ///
    /// Entries go through the same validation as `add_voltage`, `add_dielectric` and
    /// `add_floating_conductor`, in that order. An unknown name or invalid value in any
    /// section leaves the registry unchanged.
    pub fn apply_config(&mut self, config: &ExcitationConfig) -> Result<()> {
        // Stage on a copy so a rejected entry in any section leaves `self` untouched
        let mut staged = self.clone();
        staged.add_voltage(config.voltages.iter().map(|(n, &v)| (n.as_str(), v)))?;
        staged.add_dielectric(config.dielectrics.iter().map(|(n, &k)| (n.as_str(), k)))?;
        staged.add_floating_conductor(
            config
                .floating_conductors
                .iter()
                .map(|(n, &q)| (n.as_str(), q)),
        )?;

        log::debug!("Applied excitation config with {} entries", config.len());
        *self = staged;
        Ok(())
    }
}
