use anyhow::{Result, anyhow};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use crate::error::SimError;

pub mod scenario;

pub use scenario::*;

/// The set of scenarios an operator can switch between at runtime.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScenarioCatalog {
    /// Key of the scenario active at start-up and after a reset.
    pub default: String,
    #[serde(default)]
    pub seed: Option<u64>,
    /// Spawns are dropped once this many vehicles are alive. Unbounded when unset.
    #[serde(default)]
    pub max_vehicles: Option<usize>,
    pub scenarios: BTreeMap<String, Scenario>,
}

impl ScenarioCatalog {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let catalog = Self::from_toml(&content)?;
        Ok(catalog)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let catalog: ScenarioCatalog = toml::from_str(content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Loads `path`, or falls back to the built-in presets when the file does not exist.
    pub fn load_or_builtin(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load_from_file(path)
        } else {
            warn!("Scenario file {} not found, using built-in scenarios", path.display());
            Ok(Self::builtin())
        }
    }

    pub fn builtin() -> Self {
        let scenarios = BTreeMap::from([
            ("normal".to_string(), Scenario::normal()),
            ("rush_hour".to_string(), Scenario::rush_hour()),
            ("night".to_string(), Scenario::night()),
            ("manual".to_string(), Scenario::manual()),
        ]);

        Self {
            default: "normal".to_string(),
            seed: None,
            max_vehicles: None,
            scenarios,
        }
    }

    pub fn get(&self, key: &str) -> Result<&Scenario, SimError> {
        self.scenarios
            .get(key)
            .ok_or_else(|| SimError::UnknownScenario(key.to_string()))
    }

    pub fn default_scenario(&self) -> Result<&Scenario, SimError> {
        self.get(&self.default)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.scenarios.keys().map(String::as_str)
    }
}

impl Default for ScenarioCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Validate for ScenarioCatalog {
    fn validate(&self) -> Result<()> {
        if self.scenarios.is_empty() {
            return Err(anyhow!("At least one scenario must be defined"));
        }

        if !self.scenarios.contains_key(&self.default) {
            return Err(anyhow!("Default scenario '{}' is not defined", self.default));
        }

        if self.max_vehicles == Some(0) {
            return Err(anyhow!("max_vehicles must be greater than zero when set"));
        }

        for scenario in self.scenarios.values() {
            scenario.validate()?;
        }

        Ok(())
    }
}

pub trait Validate {
    fn validate(&self) -> Result<()>;
}
