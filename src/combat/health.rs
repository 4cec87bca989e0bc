//! Health ledger
//!
//! Per-entity hit points and the dead flag. All mutation goes through
//! [`Health::take_damage`], [`Health::heal`], [`Health::kill`] and
//! [`Health::set_max_health`]; gameplay code should reach those through the
//! [`DamageBus`](super::bus::DamageBus) so events are emitted.
//!
//! Invariants:
//! - `0 <= current <= max` unless `allow_overheal` is set
//! - `dead` is set exactly once, when `current` reaches 0, and never cleared

use bevy::prelude::*;

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Health {
    current: f32,
    max: f32,
    dead: bool,
    /// Healing may push `current` above `max`
    pub allow_overheal: bool,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Health {
    /// Full health at `max`. A non-positive `max` yields a ledger that reads
    /// as 0% health but is not dead until damaged or killed.
    pub fn new(max: f32) -> Self {
        let max = if max.is_finite() { max.max(0.0) } else { 0.0 };
        Self {
            current: max,
            max,
            dead: false,
            allow_overheal: false,
        }
    }

    pub fn with_overheal(mut self, allow: bool) -> Self {
        self.allow_overheal = allow;
        self
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    /// `current / max`, or 0 when `max <= 0`.
    pub fn percentage(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            self.current / self.max
        }
    }

    /// Subtract `amount`, flooring at 0. Returns whether health changed.
    ///
    /// No-op when already dead or when `amount` is not a positive number.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if self.dead || !(amount > 0.0) {
            return false;
        }

        self.current = (self.current - amount).max(0.0);
        if self.current <= 0.0 {
            self.dead = true;
        }
        true
    }

    /// Add `amount` and return how much was actually applied.
    ///
    /// Clamped to `max` unless overheal is allowed; a ledger already above
    /// `max` (overheal since disabled) is never pulled down by healing.
    pub fn heal(&mut self, amount: f32) -> f32 {
        if self.dead || !(amount > 0.0) {
            return 0.0;
        }

        let before = self.current;
        let mut after = before + amount;
        if !self.allow_overheal {
            after = after.min(self.max.max(before));
        }
        self.current = after;
        after - before
    }

    /// Force health to 0. Returns true only if this call killed the entity.
    pub fn kill(&mut self) -> bool {
        if self.dead {
            return false;
        }
        self.current = 0.0;
        self.dead = true;
        true
    }

    /// Change `max`. With `rescale_current` the health percentage is kept,
    /// otherwise `current` is only clamped down when it now exceeds `max`.
    /// The clamp applies to overhealed ledgers too.
    ///
    /// Returns false (and changes nothing) when dead or when `new_max` is
    /// not a positive finite number.
    pub fn set_max_health(&mut self, new_max: f32, rescale_current: bool) -> bool {
        if self.dead || !new_max.is_finite() || new_max <= 0.0 {
            return false;
        }

        if rescale_current && self.max > 0.0 {
            self.current = self.current / self.max * new_max;
        } else {
            self.current = self.current.min(new_max);
        }
        self.max = new_max;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_floors_at_zero_and_kills_once() {
        let mut health = Health::new(100.0);

        assert!(health.take_damage(30.0));
        assert_eq!(health.current(), 70.0);
        assert!(health.is_alive());

        assert!(health.take_damage(150.0));
        assert_eq!(health.current(), 0.0);
        assert!(health.is_dead());

        // Dead ledgers ignore everything
        assert!(!health.take_damage(10.0));
        assert_eq!(health.heal(50.0), 0.0);
        assert!(!health.kill());
        assert!(!health.set_max_health(200.0, true));
        assert_eq!(health.current(), 0.0);
        assert_eq!(health.max(), 100.0);
    }

    #[test]
    fn test_non_positive_damage_is_ignored() {
        let mut health = Health::new(50.0);

        assert!(!health.take_damage(0.0));
        assert!(!health.take_damage(-5.0));
        assert!(!health.take_damage(f32::NAN));
        assert_eq!(health.current(), 50.0);
    }

    #[test]
    fn test_heal_clamps_to_max_and_reports_actual() {
        let mut health = Health::new(100.0);
        health.take_damage(20.0);

        assert_eq!(health.heal(5.0), 5.0);
        assert_eq!(health.heal(50.0), 15.0, "Only the missing 15 should apply");
        assert_eq!(health.current(), 100.0);
        assert_eq!(health.heal(-10.0), 0.0);
    }

    #[test]
    fn test_overheal_allows_exceeding_max() {
        let mut health = Health::new(100.0).with_overheal(true);

        assert_eq!(health.heal(25.0), 25.0);
        assert_eq!(health.current(), 125.0);
        assert_eq!(health.percentage(), 1.25);
    }

    #[test]
    fn test_kill_transitions_once() {
        let mut health = Health::new(80.0);

        assert!(health.kill());
        assert_eq!(health.current(), 0.0);
        assert!(health.is_dead());
        assert!(!health.kill());
    }

    #[test]
    fn test_set_max_health_rescales_percentage() {
        let mut health = Health::new(100.0);
        health.take_damage(50.0);

        assert!(health.set_max_health(200.0, true));
        assert_eq!(health.max(), 200.0);
        assert_eq!(health.current(), 100.0);
        assert_eq!(health.percentage(), 0.5);
    }

    #[test]
    fn test_set_max_health_clamps_without_rescale() {
        let mut health = Health::new(100.0);

        assert!(health.set_max_health(60.0, false));
        assert_eq!(health.current(), 60.0);

        // Raising max without rescale leaves current alone
        assert!(health.set_max_health(120.0, false));
        assert_eq!(health.current(), 60.0);

        assert!(!health.set_max_health(0.0, false));
        assert!(!health.set_max_health(f32::INFINITY, true));
        assert_eq!(health.max(), 120.0);
    }

    #[test]
    fn test_lowering_max_clamps_overhealed_ledger() {
        let mut health = Health::new(100.0).with_overheal(true);
        health.heal(50.0);
        assert_eq!(health.current(), 150.0);

        assert!(health.set_max_health(120.0, false));
        assert_eq!(health.current(), 120.0);
        assert_eq!(health.max(), 120.0);
    }

    #[test]
    fn test_percentage_guards_zero_max() {
        let health = Health::new(0.0);
        assert_eq!(health.percentage(), 0.0);
        assert!(health.is_alive());
    }
}
