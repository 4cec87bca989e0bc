//! JSON configuration parsing for scenario runs
//!
//! A scenario is a roster of entities plus a timeline of scripted actions
//! (hits with on-hit effects, heals, cleanses, kills).

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::effects::kind::EffectSpec;

/// Largest roster a scenario may spawn
pub const MAX_SCENARIO_ENTITIES: usize = 256;

/// Scenario configuration loaded from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Scenario name, used in logs and the report
    #[serde(default = "default_name")]
    pub name: String,
    /// Simulated duration in seconds
    #[serde(default = "default_duration")]
    pub duration_secs: f32,
    /// Random seed for deterministic reproduction of effect procs
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Entities to spawn, referenced by index from actions
    pub entities: Vec<ScenarioEntity>,
    /// Scripted actions, applied when simulation time reaches `at_secs`
    #[serde(default)]
    pub actions: Vec<ScenarioAction>,
}

/// One spawned entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioEntity {
    pub name: String,
    pub max_health: f32,
    /// Base movement speed; entities without one can't be slowed or stunned
    #[serde(default)]
    pub speed: Option<f32>,
    #[serde(default)]
    pub allow_overheal: bool,
}

/// A scripted action. Entity references are indices into `entities`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ScenarioAction {
    /// Direct damage followed by the weapon's on-hit effects
    Hit {
        at_secs: f32,
        target: usize,
        #[serde(default)]
        attacker: Option<usize>,
        #[serde(default)]
        damage: f32,
        #[serde(default)]
        effects: Vec<EffectSpec>,
    },
    Heal {
        at_secs: f32,
        target: usize,
        amount: f32,
    },
    /// Remove every status effect from the target
    Cleanse { at_secs: f32, target: usize },
    Kill {
        at_secs: f32,
        target: usize,
        #[serde(default)]
        attacker: Option<usize>,
    },
}

impl ScenarioAction {
    /// Simulation time at which the action fires
    pub fn at_secs(&self) -> f32 {
        match self {
            ScenarioAction::Hit { at_secs, .. }
            | ScenarioAction::Heal { at_secs, .. }
            | ScenarioAction::Cleanse { at_secs, .. }
            | ScenarioAction::Kill { at_secs, .. } => *at_secs,
        }
    }

    /// Every entity index the action references
    fn entity_refs(&self) -> Vec<usize> {
        match self {
            ScenarioAction::Hit { target, attacker, .. } | ScenarioAction::Kill { target, attacker, .. } => {
                std::iter::once(*target).chain(*attacker).collect()
            }
            ScenarioAction::Heal { target, .. } | ScenarioAction::Cleanse { target, .. } => vec![*target],
        }
    }
}

fn default_name() -> String {
    "Unnamed scenario".to_string()
}

fn default_duration() -> f32 {
    10.0
}

impl ScenarioConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read scenario file: {}", e))?;

        Self::from_json(&contents)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(contents: &str) -> Result<Self, String> {
        let config: ScenarioConfig = serde_json::from_str(contents)
            .map_err(|e| format!("Failed to parse JSON: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        // Validate roster
        if self.entities.is_empty() || self.entities.len() > MAX_SCENARIO_ENTITIES {
            return Err(format!(
                "entities must have 1-{} members, got {}",
                MAX_SCENARIO_ENTITIES,
                self.entities.len()
            ));
        }
        for entity in &self.entities {
            if !entity.max_health.is_finite() || entity.max_health <= 0.0 {
                return Err(format!(
                    "entity '{}' max_health must be positive, got {}",
                    entity.name, entity.max_health
                ));
            }
            if let Some(speed) = entity.speed {
                if !speed.is_finite() || speed < 0.0 {
                    return Err(format!("entity '{}' speed must be non-negative, got {}", entity.name, speed));
                }
            }
        }

        // Validate duration
        if !self.duration_secs.is_finite() || self.duration_secs <= 0.0 {
            return Err("duration_secs must be positive".to_string());
        }

        // Validate actions
        for (i, action) in self.actions.iter().enumerate() {
            let at_secs = action.at_secs();
            if !at_secs.is_finite() || at_secs < 0.0 {
                return Err(format!("action {} has invalid at_secs {}", i, at_secs));
            }
            for index in action.entity_refs() {
                if index >= self.entities.len() {
                    return Err(format!(
                        "action {} references entity {} which is out of range ({} entities)",
                        i,
                        index,
                        self.entities.len()
                    ));
                }
            }
        }

        Ok(())
    }
}
