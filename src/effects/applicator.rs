//! Effect applicator
//!
//! Decides whether a weapon's on-hit effects stick and writes the resulting
//! records into the [`EffectStore`]. Stacking rules per record kind:
//!
//! - Burn (damage over time): one record, reapplication refreshes it
//! - Poison: every successful proc adds an independent record
//! - Slow/Freeze: one record; duration extends to the longer one, and the
//!   multiplier only changes when the new one is strictly stronger
//! - Stun: one record; duration extends to the longer one, never sums

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::combat::health::Health;
use crate::combat::rng::GameRng;
use crate::settings::CombatSettings;

use super::events::{EffectAttached, EffectRemovalReason, EffectRemoved};
use super::movement::{Locomotion, MovementSpeed};
use super::records::{DamageOverTime, EffectSlots, Poison, Slow, Stun};
use super::kind::{EffectSpec, StatusKind};
use super::store::EffectStore;

#[derive(SystemParam)]
pub struct EffectApplicator<'w, 's> {
    store: ResMut<'w, EffectStore>,
    rng: ResMut<'w, GameRng>,
    settings: Res<'w, CombatSettings>,
    ledgers: Query<'w, 's, &'static Health>,
    speeds: Query<'w, 's, &'static mut MovementSpeed>,
    locomotion: Query<'w, 's, &'static mut Locomotion>,
    attached: EventWriter<'w, EffectAttached>,
    removed: EventWriter<'w, EffectRemoved>,
}

impl EffectApplicator<'_, '_> {
    /// Roll `spec.chance` once and, on success, attach or refresh the effect.
    ///
    /// Returns false without rolling when the target is missing, has no
    /// health ledger, is dead, the kind is `None`, or the duration is not
    /// positive. Slow and Stun also need the target's movement components.
    pub fn apply_weapon_effect(&mut self, spec: &EffectSpec, target: Entity, source: Option<Entity>) -> bool {
        if !self.is_valid_target(target) {
            return false;
        }
        let Some(kind) = spec.kind.status() else {
            return false;
        };
        if !(spec.duration > 0.0) {
            return false;
        }
        if !self.rng.roll(spec.chance) {
            return false;
        }

        let refreshed = match kind {
            StatusKind::DamageOverTime => Some(self.attach_damage_over_time(spec, target, source)),
            StatusKind::Poison => Some(self.attach_poison(spec, target, source)),
            StatusKind::Slow => self.attach_slow(spec, target, source),
            StatusKind::Stun => self.attach_stun(spec, target, source),
        };

        let Some(refreshed) = refreshed else {
            return false;
        };
        self.attached.send(EffectAttached {
            target,
            source,
            kind,
            refreshed,
        });
        true
    }

    /// Independent roll per effect; returns how many stuck
    pub fn apply_weapon_effects(&mut self, specs: &[EffectSpec], target: Entity, source: Option<Entity>) -> usize {
        specs
            .iter()
            .filter(|spec| self.apply_weapon_effect(spec, target, source))
            .count()
    }

    /// Cleanse: remove every record on `target`, restoring speed and
    /// movement exactly as natural expiry would. Returns the number removed.
    pub fn remove_all_effects(&mut self, target: Entity) -> usize {
        let Some(slots) = self.store.take(target) else {
            return 0;
        };

        let mut speed = self.speeds.get_mut(target).ok();
        let mut locomotion = self.locomotion.get_mut(target).ok();
        slots.restore_stats(speed.as_deref_mut(), locomotion.as_deref_mut());

        let kinds = slots.kinds();
        for kind in kinds.iter().copied() {
            self.removed.send(EffectRemoved {
                target,
                kind,
                reason: EffectRemovalReason::Cleansed,
            });
        }

        debug!("Cleansed {} effect(s) from {:?}", kinds.len(), target);
        kinds.len()
    }

    /// Records currently attached to `target`
    pub fn active_effects(&self, target: Entity) -> Option<&EffectSlots> {
        self.store.get(target)
    }

    fn is_valid_target(&self, target: Entity) -> bool {
        self.ledgers
            .get(target)
            .map(|health| health.is_alive())
            .unwrap_or(false)
    }

    /// Returns whether an existing record was refreshed
    fn attach_damage_over_time(&mut self, spec: &EffectSpec, target: Entity, source: Option<Entity>) -> bool {
        let interval = self.settings.burn_tick_interval;
        let slots = self.store.slots_mut(target);

        match slots.damage_over_time.as_mut() {
            Some(burn) => {
                burn.dps = spec.intensity;
                burn.duration = spec.duration;
                burn.source = source;
                burn.clock.refresh(spec.duration);
                true
            }
            None => {
                slots.damage_over_time = Some(DamageOverTime::new(spec.intensity, spec.duration, interval, source));
                false
            }
        }
    }

    fn attach_poison(&mut self, spec: &EffectSpec, target: Entity, source: Option<Entity>) -> bool {
        let interval = self.settings.poison_tick_interval;
        self.store
            .slots_mut(target)
            .poisons
            .push(Poison::new(spec.intensity, spec.duration, interval, source));
        false
    }

    fn attach_slow(&mut self, spec: &EffectSpec, target: Entity, source: Option<Entity>) -> Option<bool> {
        let multiplier = spec.speed_multiplier();
        let mut speed = self.speeds.get_mut(target).ok();

        if let Some(slow) = self.store.get_mut(target).and_then(|slots| slots.slow.as_mut()) {
            slow.remaining = slow.remaining.max(spec.duration);
            if multiplier < slow.multiplier {
                slow.multiplier = multiplier;
                slow.source = source;
                // Recompute from the preserved speed so slows never compound
                if slow.applied {
                    if let Some(speed) = speed.as_deref_mut() {
                        speed.speed = slow.slowed_speed();
                    }
                }
            }
            return Some(true);
        }

        // A first slow needs a live speed to capture
        let original_speed = speed?.speed;
        self.store.slots_mut(target).slow = Some(Slow::new(multiplier, spec.duration, original_speed, source));
        Some(false)
    }

    fn attach_stun(&mut self, spec: &EffectSpec, target: Entity, source: Option<Entity>) -> Option<bool> {
        if !self.locomotion.contains(target) {
            return None;
        }
        let slots = self.store.slots_mut(target);

        match slots.stun.as_mut() {
            Some(stun) => {
                stun.remaining = stun.remaining.max(spec.duration);
                Some(true)
            }
            None => {
                slots.stun = Some(Stun::new(spec.duration, source));
                Some(false)
            }
        }
    }
}
