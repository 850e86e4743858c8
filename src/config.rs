//! User configuration: built-in defaults + optional TOML file.
//!
//! - `PortalConfig::default()` → built-in tolerances and display settings
//! - `PortalConfig::from_toml_file(path)` → load a user file
//! - `PortalConfig::load(cli_path)` → `--config`, else ~/.qportal/config.toml if present

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::qsim::SimConfig;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    pub simulator: SimulatorSection,
    pub display: DisplaySection,
    pub batch: BatchSection,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorSection {
    pub tolerance: f64,
    pub purity_tolerance: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    pub precision: usize,
    pub color: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSection {
    pub count: usize,
    pub seed: u64,
}

impl Default for SimulatorSection {
    fn default() -> Self {
        let sim = SimConfig::default();
        Self { tolerance: sim.tolerance, purity_tolerance: sim.purity_tolerance }
    }
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self { precision: 4, color: true }
    }
}

impl Default for BatchSection {
    fn default() -> Self {
        Self { count: 100, seed: 2024 }
    }
}

impl PortalConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let txt = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&txt).with_context(|| format!("parsing {}", path.display()))
    }

    /// An explicit path must exist; the default location is optional.
    pub fn load(cli_path: &Option<PathBuf>) -> Result<Self> {
        if let Some(p) = cli_path {
            return Self::from_toml_file(p);
        }
        match default_config_path() {
            Some(p) if p.exists() => Self::from_toml_file(&p),
            _ => Ok(Self::default()),
        }
    }

    pub fn sim(&self) -> SimConfig {
        SimConfig {
            tolerance: self.simulator.tolerance,
            purity_tolerance: self.simulator.purity_tolerance,
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    // ~/.qportal/config.toml (C:\Users\you\.qportal\config.toml on Windows)
    dirs_next::home_dir().map(|h| h.join(".qportal").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("config.toml");
        fs::write(&p, "[display]\nprecision = 6\n").unwrap();
        let cfg = PortalConfig::from_toml_file(&p).unwrap();
        assert_eq!(cfg.display.precision, 6);
        assert!(cfg.display.color);
        assert_eq!(cfg.simulator, SimulatorSection::default());
    }

    #[test]
    fn roundtrips_through_toml() {
        let mut cfg = PortalConfig::default();
        cfg.batch.seed = 9;
        cfg.simulator.tolerance = 1e-6;
        let txt = toml::to_string(&cfg).unwrap();
        let back: PortalConfig = toml::from_str(&txt).unwrap();
        assert_eq!(back, cfg);
        assert_eq!(back.sim().tolerance, 1e-6);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = PortalConfig::load(&Some(dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("reading"));
    }
}
