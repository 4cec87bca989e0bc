//! Status effect records
//!
//! Plain data describing one active effect instance. Records are created by
//! the [`EffectApplicator`](super::applicator::EffectApplicator), advanced by
//! [`tick_status_effects`](super::scheduler::tick_status_effects) and dropped
//! by its expiry sweep or by a cleanse.

use bevy::prelude::*;
use smallvec::SmallVec;

use super::movement::{Locomotion, MovementSpeed};
use super::kind::StatusKind;

/// Ticks that come due within this margin of the current step fire on it.
/// Absorbs f32 drift from summing many fixed deltas.
pub const TICK_EPSILON: f32 = 1e-4;

/// Floor for configured tick intervals
pub const MIN_TICK_INTERVAL: f32 = 0.01;

/// Shared clock for periodic damage.
///
/// `elapsed` and `remaining` are both driven by the same `advance` call, so
/// the tick schedule and the expiry countdown cannot drift apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickClock {
    pub interval: f32,
    /// Time since the record was attached
    pub elapsed: f32,
    /// `elapsed` value at which the next tick fires
    pub next_tick: f32,
    /// Time until expiry (<= 0 means expired)
    pub remaining: f32,
}

impl TickClock {
    pub fn new(duration: f32, interval: f32) -> Self {
        let interval = interval.max(MIN_TICK_INTERVAL);
        Self {
            interval,
            elapsed: 0.0,
            next_tick: interval,
            remaining: duration,
        }
    }

    /// Advance by one step and return how many ticks came due.
    ///
    /// Ticks scheduled after the record's expiry instant are never counted,
    /// however large `dt` is.
    pub fn advance(&mut self, dt: f32) -> u32 {
        if !(dt > 0.0) {
            return 0;
        }

        let live = self.remaining > 0.0;
        let expires_at = self.elapsed + self.remaining;
        self.elapsed += dt;
        self.remaining -= dt;
        if !live {
            return 0;
        }

        let horizon = self.elapsed.min(expires_at) + TICK_EPSILON;
        let mut due = 0;
        while self.next_tick <= horizon {
            due += 1;
            self.next_tick += self.interval;
        }
        due
    }

    /// Restart the expiry countdown, keeping the tick phase
    pub fn refresh(&mut self, duration: f32) {
        self.remaining = duration;
    }

    pub fn is_expired(&self) -> bool {
        self.remaining <= 0.0
    }
}

/// Single-instance damage over time (burn). Reapplication refreshes it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageOverTime {
    pub dps: f32,
    pub duration: f32,
    pub clock: TickClock,
    pub source: Option<Entity>,
}

impl DamageOverTime {
    pub fn new(dps: f32, duration: f32, tick_interval: f32, source: Option<Entity>) -> Self {
        Self {
            dps,
            duration,
            clock: TickClock::new(duration, tick_interval),
            source,
        }
    }

    /// Damage dealt by one tick
    pub fn tick_damage(&self) -> f32 {
        self.dps * self.clock.interval
    }

    pub fn remaining(&self) -> f32 {
        self.clock.remaining
    }
}

/// Stacking damage over time; each instance keeps its own clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Poison {
    pub dps: f32,
    pub clock: TickClock,
    pub source: Option<Entity>,
}

impl Poison {
    pub fn new(dps: f32, duration: f32, tick_interval: f32, source: Option<Entity>) -> Self {
        Self {
            dps,
            clock: TickClock::new(duration, tick_interval),
            source,
        }
    }

    pub fn tick_damage(&self) -> f32 {
        self.dps * self.clock.interval
    }

    pub fn remaining(&self) -> f32 {
        self.clock.remaining
    }
}

/// Speed reduction. `original_speed` is the speed seen before any slow was
/// applied and is what expiry restores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slow {
    pub multiplier: f32,
    pub remaining: f32,
    pub original_speed: f32,
    /// Whether the multiplier has been written to the live speed
    pub applied: bool,
    pub source: Option<Entity>,
}

impl Slow {
    pub fn new(multiplier: f32, duration: f32, original_speed: f32, source: Option<Entity>) -> Self {
        Self {
            multiplier,
            remaining: duration,
            original_speed,
            applied: false,
            source,
        }
    }

    /// Speed the entity should move at while this slow is applied
    pub fn slowed_speed(&self) -> f32 {
        self.original_speed * self.multiplier
    }

    /// Write the multiplier to the live speed (first scheduler tick)
    pub fn apply(&mut self, speed: &mut MovementSpeed) {
        if self.applied {
            return;
        }
        self.original_speed = speed.speed;
        speed.speed = self.slowed_speed();
        self.applied = true;
    }

    /// Put the live speed back. Only an applied slow ever touched it.
    pub fn restore(&self, speed: &mut MovementSpeed) {
        if self.applied {
            speed.speed = self.original_speed;
        }
    }
}

/// Movement suspension. Refresh extends to the longer duration, never sums.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stun {
    pub remaining: f32,
    pub applied: bool,
    pub source: Option<Entity>,
}

impl Stun {
    pub fn new(duration: f32, source: Option<Entity>) -> Self {
        Self {
            remaining: duration,
            applied: false,
            source,
        }
    }

    pub fn apply(&mut self, locomotion: &mut Locomotion) {
        if self.applied {
            return;
        }
        locomotion.suspend();
        self.applied = true;
    }

    pub fn release(&self, locomotion: &mut Locomotion) {
        if self.applied {
            locomotion.resume();
        }
    }
}

/// Every effect record attached to one entity: fixed slots for the
/// single-instance kinds plus a growable stack of poisons.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectSlots {
    pub damage_over_time: Option<DamageOverTime>,
    pub poisons: SmallVec<[Poison; 4]>,
    pub slow: Option<Slow>,
    pub stun: Option<Stun>,
}

impl EffectSlots {
    pub fn is_empty(&self) -> bool {
        self.damage_over_time.is_none()
            && self.poisons.is_empty()
            && self.slow.is_none()
            && self.stun.is_none()
    }

    /// Number of live records (each poison counts separately)
    pub fn count(&self) -> usize {
        usize::from(self.damage_over_time.is_some())
            + self.poisons.len()
            + usize::from(self.slow.is_some())
            + usize::from(self.stun.is_some())
    }

    /// One entry per record, in scheduler processing order
    pub fn kinds(&self) -> Vec<StatusKind> {
        let mut kinds = Vec::with_capacity(self.count());
        if self.damage_over_time.is_some() {
            kinds.push(StatusKind::DamageOverTime);
        }
        kinds.extend(self.poisons.iter().map(|_| StatusKind::Poison));
        if self.slow.is_some() {
            kinds.push(StatusKind::Slow);
        }
        if self.stun.is_some() {
            kinds.push(StatusKind::Stun);
        }
        kinds
    }

    /// Undo every stat change made by these records (slowed speed, stun)
    pub fn restore_stats(&self, speed: Option<&mut MovementSpeed>, locomotion: Option<&mut Locomotion>) {
        if let (Some(slow), Some(speed)) = (&self.slow, speed) {
            slow.restore(speed);
        }
        if let (Some(stun), Some(locomotion)) = (&self.stun, locomotion) {
            stun.release(locomotion);
        }
    }
}
