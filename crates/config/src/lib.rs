//! Configuration models and loaders for ship catalogs.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Ship definition parsed from a catalog entry.
///
/// Thrust limits are ordered `[x, y, z]` in the ship-local frame (+X right, +Y up,
/// +Z forward) and given in newtons.
#[derive(Debug, Deserialize, Clone)]
pub struct ShipConfig {
    pub name: String,
    pub mass_kg: f64,
    pub max_thrust_n: [f64; 3],
    pub min_thrust_n: [f64; 3],
    #[serde(default = "default_afterburner_factor")]
    pub afterburner_factor: f64,
    #[serde(default)]
    pub controller: ControllerSettings,
}

/// Controller tuning attached to a ship entry.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ControllerSettings {
    pub mode: ThrustModeConfig,
    pub clamp_anti_drift_ratio: f64,
    pub spacebrake_prioritizes_power: bool,
    pub update_interval_s: f64,
    pub scheduling: SchedulingConfig,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            mode: ThrustModeConfig::default(),
            clamp_anti_drift_ratio: 1.0,
            spacebrake_prioritizes_power: true,
            update_interval_s: 0.05,
            scheduling: SchedulingConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ThrustModeConfig {
    MaxThrust,
    Stable,
    #[default]
    AntiDriftStable,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SchedulingConfig {
    #[default]
    Reactive,
    EventDriven,
}

fn default_afterburner_factor() -> f64 {
    1.0
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Load ship configurations from a directory of TOML files, a single TOML file, or a YAML list.
pub fn load_ship_configs<P: AsRef<Path>>(path: P) -> Result<Vec<ShipConfig>, ConfigError> {
    load_records(path)
}

/// Parse a single ship entry from TOML text.
pub fn parse_ship_toml(contents: &str) -> Result<ShipConfig, ConfigError> {
    Ok(toml::from_str(contents)?)
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_dir() {
        read_dir_records(path)
    } else if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut records = Vec::new();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().map(|ext| ext == "toml").unwrap_or(false))
        .collect();
    entries.sort();
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        let record: T = toml::from_str(&contents)?;
        records.push(record);
    }
    Ok(records)
}
