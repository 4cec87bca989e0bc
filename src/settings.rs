//! Combat tuning settings
//!
//! Simulation-wide numbers that are not part of any single weapon's
//! `EffectSpec`. Stored as RON so balance passes don't need a rebuild.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Slowest fixed simulation rate accepted
pub const MIN_FIXED_HZ: f64 = 1.0;
/// Fastest fixed simulation rate accepted
pub const MAX_FIXED_HZ: f64 = 1000.0;

fn default_fixed_hz() -> f64 {
    60.0
}

fn default_burn_tick_interval() -> f32 {
    0.5
}

fn default_poison_tick_interval() -> f32 {
    1.0
}

#[derive(Resource, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CombatSettings {
    /// Fixed simulation rate (ticks per second)
    #[serde(default = "default_fixed_hz")]
    pub fixed_hz: f64,
    /// Seconds between burn damage ticks
    #[serde(default = "default_burn_tick_interval")]
    pub burn_tick_interval: f32,
    /// Seconds between poison damage ticks
    #[serde(default = "default_poison_tick_interval")]
    pub poison_tick_interval: f32,
}

impl Default for CombatSettings {
    fn default() -> Self {
        Self {
            fixed_hz: default_fixed_hz(),
            burn_tick_interval: default_burn_tick_interval(),
            poison_tick_interval: default_poison_tick_interval(),
        }
    }
}

impl CombatSettings {
    /// Length of one fixed tick in seconds
    pub fn fixed_step_secs(&self) -> f64 {
        1.0 / self.fixed_hz
    }

    /// Parse settings from a RON string and validate them
    pub fn from_ron(contents: &str) -> Result<Self, String> {
        let settings: CombatSettings =
            ron::from_str(contents).map_err(|e| format!("Failed to parse settings: {}", e))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a RON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read settings file {:?}: {}", path, e))?;
        Self::from_ron(&contents)
    }

    /// Load settings from `path`, or return defaults if there is no path or it can't be used
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            info!("No settings file given, using defaults");
            return Self::default();
        };

        match Self::load_from_file(path) {
            Ok(settings) => {
                info!("Loaded combat settings from {:?}", path);
                settings
            }
            Err(e) => {
                warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }

    /// Save settings to a RON file
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let contents = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;
        fs::write(path, contents).map_err(|e| format!("Failed to write {:?}: {}", path, e))?;
        info!("Saved combat settings to {:?}", path);
        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<(), String> {
        if !(MIN_FIXED_HZ..=MAX_FIXED_HZ).contains(&self.fixed_hz) {
            return Err(format!(
                "fixed_hz must be within {}-{}, got {}",
                MIN_FIXED_HZ, MAX_FIXED_HZ, self.fixed_hz
            ));
        }
        if !self.burn_tick_interval.is_finite() || self.burn_tick_interval <= 0.0 {
            return Err(format!(
                "burn_tick_interval must be positive, got {}",
                self.burn_tick_interval
            ));
        }
        if !self.poison_tick_interval.is_finite() || self.poison_tick_interval <= 0.0 {
            return Err(format!(
                "poison_tick_interval must be positive, got {}",
                self.poison_tick_interval
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = CombatSettings::default();
        assert!(settings.validate().is_ok());
        assert!((settings.fixed_step_secs() - 1.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_partial_ron_fills_defaults() {
        let settings = CombatSettings::from_ron("(poison_tick_interval: 0.25)").unwrap();

        assert_eq!(settings.poison_tick_interval, 0.25);
        assert_eq!(settings.burn_tick_interval, 0.5);
        assert_eq!(settings.fixed_hz, 60.0);
    }

    #[test]
    fn test_rejects_non_positive_values() {
        let err = CombatSettings::from_ron("(fixed_hz: 0.0)").unwrap_err();
        assert!(err.contains("fixed_hz"), "unexpected error: {}", err);

        let err = CombatSettings::from_ron("(burn_tick_interval: -1.0)").unwrap_err();
        assert!(err.contains("burn_tick_interval"), "unexpected error: {}", err);
    }

    #[test]
    fn test_rejects_out_of_range_fixed_hz() {
        for ron in ["(fixed_hz: 1e-20)", "(fixed_hz: 0.5)", "(fixed_hz: 1e9)", "(fixed_hz: inf)"] {
            let err = CombatSettings::from_ron(ron).unwrap_err();
            assert!(err.contains("fixed_hz"), "{} gave unexpected error: {}", ron, err);
        }

        // Bounds are inclusive
        assert!(CombatSettings::from_ron("(fixed_hz: 1.0)").is_ok());
        assert!(CombatSettings::from_ron("(fixed_hz: 1000.0)").is_ok());
    }

    #[test]
    fn test_rejects_malformed_ron() {
        let err = CombatSettings::from_ron("(fixed_hz: \"fast\")").unwrap_err();
        assert!(err.starts_with("Failed to parse settings"), "unexpected error: {}", err);
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!(
            "survivalsim-settings-{}.ron",
            std::process::id()
        ));
        let settings = CombatSettings {
            fixed_hz: 30.0,
            burn_tick_interval: 0.25,
            poison_tick_interval: 0.75,
        };

        settings.save(&path).unwrap();
        let loaded = CombatSettings::load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let path = Path::new("/definitely/not/here/settings.ron");
        assert!(CombatSettings::load_from_file(path).is_err());
        assert_eq!(CombatSettings::load_or_default(Some(path)), CombatSettings::default());
    }
}
