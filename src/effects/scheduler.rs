//! Effect scheduler
//!
//! One pass per fixed tick over every entity holding effect records, in a
//! fixed kind order:
//!
//! 1. Burn (damage over time) ticks
//! 2. Poison ticks, each stacked instance on its own clock
//! 3. Slow application and countdown
//! 4. Stun application and countdown
//! 5. Expiry sweep with stat restoration
//!
//! Periodic damage goes through the [`DamageBus`] so ticks produce the same
//! `DamageApplied`/`EntityDied` notifications as direct hits.

use bevy::ecs::entity::Entities;
use bevy::prelude::*;

use crate::combat::bus::DamageBus;

use super::events::{EffectRemovalReason, EffectRemoved};
use super::movement::{Locomotion, MovementSpeed};
use super::kind::StatusKind;
use super::store::EffectStore;

/// Advance, tick and retire every status effect in the simulation.
///
/// Runs in `FixedUpdate`, so `Time` is the fixed clock and `dt` is constant.
pub fn tick_status_effects(
    time: Res<Time>,
    entities: &Entities,
    mut store: ResMut<EffectStore>,
    mut bus: DamageBus,
    mut speeds: Query<&mut MovementSpeed>,
    mut locomotion: Query<&mut Locomotion>,
    mut removed: EventWriter<EffectRemoved>,
) {
    let dt = time.delta_secs();
    if store.is_empty() {
        return;
    }

    // Phase 1: burn
    for (entity, slots) in store.iter_mut() {
        let Some(burn) = slots.damage_over_time.as_mut() else {
            continue;
        };
        let due = burn.clock.advance(dt);
        for _ in 0..due {
            bus.apply_damage(entity, burn.tick_damage(), burn.source);
        }
    }

    // Phase 2: poison
    for (entity, slots) in store.iter_mut() {
        for poison in slots.poisons.iter_mut() {
            let due = poison.clock.advance(dt);
            for _ in 0..due {
                bus.apply_damage(entity, poison.tick_damage(), poison.source);
            }
        }
    }

    // Phase 3: slow
    for (entity, slots) in store.iter_mut() {
        let Some(slow) = slots.slow.as_mut() else {
            continue;
        };
        if !slow.applied {
            if let Ok(mut speed) = speeds.get_mut(entity) {
                slow.apply(&mut speed);
                debug!("Slow applied to {:?}: speed {:.2} -> {:.2}", entity, slow.original_speed, speed.speed);
            }
        }
        slow.remaining -= dt;
    }

    // Phase 4: stun
    for (entity, slots) in store.iter_mut() {
        let Some(stun) = slots.stun.as_mut() else {
            continue;
        };
        if !stun.applied {
            if let Ok(mut movement) = locomotion.get_mut(entity) {
                stun.apply(&mut movement);
                debug!("Stun applied to {:?}", entity);
            }
        }
        stun.remaining -= dt;
    }

    // Phase 5: expiry sweep
    for entity in store.entities() {
        if !entities.contains(entity) {
            // Owner despawned: nothing left to restore
            if let Some(slots) = store.take(entity) {
                debug!("Dropped {} effect(s) of despawned {:?}", slots.count(), entity);
            }
            continue;
        }

        if !bus.can_take_damage(entity) {
            let Some(slots) = store.take(entity) else {
                continue;
            };
            let mut speed = speeds.get_mut(entity).ok();
            let mut movement = locomotion.get_mut(entity).ok();
            slots.restore_stats(speed.as_deref_mut(), movement.as_deref_mut());
            for kind in slots.kinds() {
                removed.send(EffectRemoved {
                    target: entity,
                    kind,
                    reason: EffectRemovalReason::OwnerDied,
                });
            }
            continue;
        }

        let Some(slots) = store.get_mut(entity) else {
            continue;
        };
        let mut expired: Vec<StatusKind> = Vec::new();

        if slots.damage_over_time.is_some_and(|burn| burn.clock.is_expired()) {
            slots.damage_over_time = None;
            expired.push(StatusKind::DamageOverTime);
        }

        let poisons_before = slots.poisons.len();
        slots.poisons.retain(|poison| !poison.clock.is_expired());
        expired.extend((slots.poisons.len()..poisons_before).map(|_| StatusKind::Poison));

        if let Some(slow) = slots.slow.filter(|slow| slow.remaining <= 0.0) {
            if let Ok(mut speed) = speeds.get_mut(entity) {
                slow.restore(&mut speed);
            }
            slots.slow = None;
            expired.push(StatusKind::Slow);
        }

        if let Some(stun) = slots.stun.filter(|stun| stun.remaining <= 0.0) {
            if let Ok(mut movement) = locomotion.get_mut(entity) {
                stun.release(&mut movement);
            }
            slots.stun = None;
            expired.push(StatusKind::Stun);
        }

        for kind in expired {
            removed.send(EffectRemoved {
                target: entity,
                kind,
                reason: EffectRemovalReason::Expired,
            });
        }
    }

    store.prune_empty();
}
