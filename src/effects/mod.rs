//! Status effects
//!
//! Burn, poison, slow and stun layered onto entities by weapon hits:
//! - `kind`: authored weapon effect configuration
//! - `records`/`store`: per-entity effect table
//! - `applicator`: proc rolls and stacking rules
//! - `scheduler`: per-tick advance, periodic damage, expiry and restoration

use bevy::prelude::*;

pub mod applicator;
pub mod events;
pub mod kind;
pub mod movement;
pub mod records;
pub mod scheduler;
pub mod store;

pub use applicator::EffectApplicator;
pub use events::{EffectAttached, EffectRemovalReason, EffectRemoved};
pub use kind::{EffectKind, EffectSpec, StatusKind};
pub use movement::{Locomotion, MovementSpeed};
pub use records::{DamageOverTime, EffectSlots, Poison, Slow, Stun, TickClock};
pub use scheduler::tick_status_effects;
pub use store::EffectStore;

use crate::combat::CombatSystemSet;
use crate::settings::CombatSettings;

/// Plugin for status effects. Expects [`CombatPlugin`](crate::combat::CombatPlugin)
/// to be added as well (damage bus, system sets, RNG).
pub struct StatusEffectsPlugin;

impl Plugin for StatusEffectsPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<EffectAttached>()
            .add_event::<EffectRemoved>()
            .init_resource::<EffectStore>()
            .init_resource::<CombatSettings>()
            .add_systems(
                FixedUpdate,
                tick_status_effects.in_set(CombatSystemSet::StatusEffects),
            );
    }
}
