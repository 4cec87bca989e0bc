//! Combat events
//!
//! Notifications emitted by the [`DamageBus`](super::bus::DamageBus).
//! `DamageApplied` and `EntityDied` are the only signals collaborators outside
//! the core (loot, HUD, spawn director) rely on. Each is sent both as a Bevy
//! event for ECS readers and through [`CombatListeners`](super::listeners::CombatListeners)
//! for synchronous subscribers.

use bevy::prelude::*;

/// Event fired whenever a damage call changed a target's health
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageApplied {
    /// Entity receiving the damage
    pub target: Entity,
    /// Entity responsible for the damage (None for environmental damage)
    pub source: Option<Entity>,
    /// Amount requested by the caller
    pub amount: f32,
    /// Target health after the hit
    pub health_after: f32,
}

/// Event fired exactly once per entity, on the alive → dead transition
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDied {
    /// Entity that died
    pub entity: Entity,
    /// Entity credited with the kill
    pub killer: Option<Entity>,
}

/// Event fired when healing actually restored health
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct HealingApplied {
    pub target: Entity,
    pub source: Option<Entity>,
    /// Amount actually restored (after clamping)
    pub amount: f32,
}

/// Envelope delivered to registered combat listeners, in emission order
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CombatEvent {
    DamageApplied(DamageApplied),
    EntityDied(EntityDied),
}

impl CombatEvent {
    /// The entity the notification is about
    pub fn subject(&self) -> Entity {
        match self {
            CombatEvent::DamageApplied(event) => event.target,
            CombatEvent::EntityDied(event) => event.entity,
        }
    }
}
