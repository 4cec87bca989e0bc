//! SurvivalSim - combat simulation core
//!
//! Health ledgers, a damage bus with death notifications, and timed status
//! effects (burn, poison, slow, stun) on the Bevy ECS.
//!
//! This library exposes the core modules for the headless runner and tests.

pub mod cli;
pub mod combat;
pub mod effects;
pub mod headless;
pub mod settings;

// Re-export commonly used types
pub use combat::log::{CombatLog, CombatLogEventType};
pub use combat::{CombatPlugin, CombatSystemSet, DamageBus, Health};
pub use effects::{EffectApplicator, EffectSpec, StatusEffectsPlugin};
pub use headless::{run_scenario, ScenarioConfig, ScenarioResult};
pub use settings::CombatSettings;
