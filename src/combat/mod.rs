//! Combat system
//!
//! Implements the damage side of the combat core:
//! - Health ledger per entity
//! - Damage bus (damage, healing, kills) and its notifications
//! - Listener registry for synchronous subscribers
//! - Combat logging

use bevy::prelude::*;

pub mod bus;
pub mod events;
pub mod health;
pub mod listeners;
pub mod log;
pub mod rng;

pub use bus::DamageBus;
pub use events::{CombatEvent, DamageApplied, EntityDied, HealingApplied};
pub use health::Health;
pub use listeners::{CombatListeners, ListenerId};
pub use rng::GameRng;

use crate::effects::events::{EffectAttached, EffectRemoved};
use self::log::{record_combat_log, CombatLog};

/// Fixed-tick phases of the combat core, run in declaration order
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombatSystemSet {
    /// Advance the simulation clock
    Clock,
    /// Direct hits from projectiles and melee checks
    Hits,
    /// Status effect scheduler
    StatusEffects,
    /// Logging and other read-only consumers of this tick's events
    Bookkeeping,
}

/// Fixed-step time since the simulation started
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct SimulationClock {
    pub ticks: u64,
    pub elapsed: f32,
}

/// Plugin for the combat system
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app
            // Combat events
            .add_event::<DamageApplied>()
            .add_event::<EntityDied>()
            .add_event::<HealingApplied>()
            // Read by the combat log; also registered by StatusEffectsPlugin
            .add_event::<EffectAttached>()
            .add_event::<EffectRemoved>()
            // Resources
            .init_resource::<CombatListeners>()
            .init_resource::<CombatLog>()
            .init_resource::<SimulationClock>()
            .init_resource::<GameRng>()
            .configure_sets(
                FixedUpdate,
                (
                    CombatSystemSet::Clock,
                    CombatSystemSet::Hits,
                    CombatSystemSet::StatusEffects,
                    CombatSystemSet::Bookkeeping,
                )
                    .chain(),
            )
            // Systems
            .add_systems(
                FixedUpdate,
                (
                    advance_simulation_clock.in_set(CombatSystemSet::Clock),
                    record_combat_log.in_set(CombatSystemSet::Bookkeeping),
                ),
            );
    }
}

/// Count fixed ticks and accumulate fixed time
pub fn advance_simulation_clock(time: Res<Time>, mut clock: ResMut<SimulationClock>) {
    clock.ticks += 1;
    clock.elapsed += time.delta_secs();
}
