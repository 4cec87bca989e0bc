//! Damage bus
//!
//! Single entry point for every damage, heal and kill in the simulation.
//! Implemented as a system parameter so hit-resolution systems get
//! synchronous return values (`died`, `actual_healed`) while events still
//! flow through the `World`:
//!
//! ```ignore
//! fn resolve_hits(mut bus: DamageBus, hits: Res<PendingHits>) {
//!     for hit in hits.iter() {
//!         if bus.apply_damage(hit.target, hit.damage, Some(hit.attacker)) {
//!             // this hit was the killing blow
//!         }
//!     }
//! }
//! ```
//!
//! Systems that also attach status effects should wrap `DamageBus` and
//! `EffectApplicator` in a `ParamSet`, since both touch `Health`.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use super::events::{CombatEvent, DamageApplied, EntityDied, HealingApplied};
use super::health::Health;
use super::listeners::CombatListeners;

#[derive(SystemParam)]
pub struct DamageBus<'w, 's> {
    ledgers: Query<'w, 's, &'static mut Health>,
    damage_applied: EventWriter<'w, DamageApplied>,
    entity_died: EventWriter<'w, EntityDied>,
    healing_applied: EventWriter<'w, HealingApplied>,
    listeners: ResMut<'w, CombatListeners>,
}

impl DamageBus<'_, '_> {
    /// Apply `amount` damage to `target`.
    ///
    /// Returns true only if this call moved the target from alive to dead.
    /// Invalid targets, targets without a [`Health`], dead targets and
    /// non-positive amounts are silent no-ops returning false.
    ///
    /// `DamageApplied` is emitted for every call that changed health, and is
    /// always emitted before the `EntityDied` of the same call.
    pub fn apply_damage(&mut self, target: Entity, amount: f32, source: Option<Entity>) -> bool {
        if !(amount > 0.0) {
            return false;
        }
        let Ok(mut health) = self.ledgers.get_mut(target) else {
            return false;
        };

        let was_alive = health.is_alive();
        if !health.take_damage(amount) {
            return false;
        }
        let died = was_alive && health.is_dead();
        let health_after = health.current();

        let applied = DamageApplied {
            target,
            source,
            amount,
            health_after,
        };
        self.damage_applied.send(applied);
        self.listeners.publish(&CombatEvent::DamageApplied(applied));

        if died {
            self.announce_death(target, source);
        }
        died
    }

    /// Heal `target` and return the amount actually restored (0 for dead or
    /// invalid targets).
    pub fn apply_healing(&mut self, target: Entity, amount: f32, source: Option<Entity>) -> f32 {
        let Ok(mut health) = self.ledgers.get_mut(target) else {
            return 0.0;
        };

        let healed = health.heal(amount);
        if healed > 0.0 {
            self.healing_applied.send(HealingApplied {
                target,
                source,
                amount: healed,
            });
        }
        healed
    }

    /// Force `target` to 0 health. `EntityDied` fires only if it was alive.
    pub fn kill_entity(&mut self, target: Entity, source: Option<Entity>) {
        let Ok(mut health) = self.ledgers.get_mut(target) else {
            return;
        };

        if health.kill() {
            self.announce_death(target, source);
        }
    }

    /// Change `target`'s max health through its ledger. See [`Health::set_max_health`].
    pub fn set_max_health(&mut self, target: Entity, new_max: f32, rescale_current: bool) -> bool {
        self.ledgers
            .get_mut(target)
            .map(|mut health| health.set_max_health(new_max, rescale_current))
            .unwrap_or(false)
    }

    /// True if `target` has a ledger and is alive
    pub fn can_take_damage(&self, target: Entity) -> bool {
        self.ledgers
            .get(target)
            .map(|health| health.is_alive())
            .unwrap_or(false)
    }

    pub fn current_health(&self, target: Entity) -> f32 {
        self.ledgers.get(target).map(|h| h.current()).unwrap_or(0.0)
    }

    pub fn max_health(&self, target: Entity) -> f32 {
        self.ledgers.get(target).map(|h| h.max()).unwrap_or(0.0)
    }

    /// `current / max` in `[0, 1]` (above 1 with overheal); 0 for invalid targets
    pub fn health_percentage(&self, target: Entity) -> f32 {
        self.ledgers.get(target).map(|h| h.percentage()).unwrap_or(0.0)
    }

    fn announce_death(&mut self, entity: Entity, killer: Option<Entity>) {
        let died = EntityDied { entity, killer };
        self.entity_died.send(died);
        self.listeners.publish(&CombatEvent::EntityDied(died));

        debug!("Entity {:?} died (killer: {:?})", entity, killer);
    }
}
