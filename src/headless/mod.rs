//! Headless scenario runs
//!
//! Drives the combat core from a scripted JSON scenario without any
//! graphical output, for automated testing and balance checks.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release -- scenarios/poison.json --settings scenarios/combat.ron --output report.json
//! ```
//!
//! ## JSON Configuration
//!
//! ```json
//! {
//!   "name": "Poisoned ghoul",
//!   "duration_secs": 6.0,
//!   "random_seed": 42,
//!   "entities": [
//!     { "name": "Hunter", "max_health": 50.0, "speed": 4.0 },
//!     { "name": "Ghoul", "max_health": 100.0, "speed": 3.0 }
//!   ],
//!   "actions": [
//!     { "type": "Hit", "at_secs": 0.0, "target": 1, "attacker": 0, "damage": 5.0,
//!       "effects": [ { "kind": "Poison", "chance": 0.5, "duration": 5.0, "intensity": 9.0 } ] },
//!     { "type": "Cleanse", "at_secs": 3.0, "target": 1 }
//!   ]
//! }
//! ```

pub mod config;
pub mod runner;

pub use config::{ScenarioAction, ScenarioConfig, ScenarioEntity};
pub use runner::{run_scenario, run_scenario_with_log, DeathRecord, EntityReport, ScenarioResult};
