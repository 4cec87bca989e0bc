//! Weapon effect configuration
//!
//! Authored per weapon or projectile (RON/JSON), never mutated at runtime.

use serde::{Deserialize, Serialize};

/// Kind of status effect a weapon can inflict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EffectKind {
    #[default]
    None,
    Burn,
    Poison,
    Slow,
    Stun,
    Freeze,
}

impl EffectKind {
    /// Which record slot this kind writes to (None for `EffectKind::None`)
    pub fn status(&self) -> Option<StatusKind> {
        match self {
            EffectKind::None => None,
            EffectKind::Burn => Some(StatusKind::DamageOverTime),
            EffectKind::Poison => Some(StatusKind::Poison),
            EffectKind::Slow | EffectKind::Freeze => Some(StatusKind::Slow),
            EffectKind::Stun => Some(StatusKind::Stun),
        }
    }
}

/// Record kinds held by the effect store, in scheduler processing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatusKind {
    /// Single-instance damage over time (burn)
    DamageOverTime,
    /// Stacking damage over time
    Poison,
    Slow,
    Stun,
}

impl StatusKind {
    pub fn name(&self) -> &'static str {
        match self {
            StatusKind::DamageOverTime => "Burn",
            StatusKind::Poison => "Poison",
            StatusKind::Slow => "Slow",
            StatusKind::Stun => "Stun",
        }
    }
}

fn default_chance() -> f32 {
    1.0
}

/// One on-hit effect of a weapon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectSpec {
    pub kind: EffectKind,
    /// Proc chance in [0, 1]
    #[serde(default = "default_chance")]
    pub chance: f32,
    /// Seconds the effect lasts
    pub duration: f32,
    /// Meaning depends on kind:
    /// - Burn/Poison: damage per second
    /// - Slow/Freeze: speed multiplier (0.7 = 30% slower)
    /// - Stun: unused
    #[serde(default)]
    pub intensity: f32,
}

impl EffectSpec {
    pub fn new(kind: EffectKind, chance: f32, duration: f32, intensity: f32) -> Self {
        Self {
            kind,
            chance,
            duration,
            intensity,
        }
    }

    pub fn burn(dps: f32, duration: f32) -> Self {
        Self::new(EffectKind::Burn, 1.0, duration, dps)
    }

    pub fn poison(dps: f32, duration: f32) -> Self {
        Self::new(EffectKind::Poison, 1.0, duration, dps)
    }

    pub fn slow(multiplier: f32, duration: f32) -> Self {
        Self::new(EffectKind::Slow, 1.0, duration, multiplier)
    }

    pub fn freeze(multiplier: f32, duration: f32) -> Self {
        Self::new(EffectKind::Freeze, 1.0, duration, multiplier)
    }

    pub fn stun(duration: f32) -> Self {
        Self::new(EffectKind::Stun, 1.0, duration, 0.0)
    }

    pub fn with_chance(mut self, chance: f32) -> Self {
        self.chance = chance;
        self
    }

    /// Speed multiplier for Slow/Freeze, clamped to [0, 1]
    pub fn speed_multiplier(&self) -> f32 {
        if self.intensity.is_finite() {
            self.intensity.clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_maps_to_record_slot() {
        assert_eq!(EffectKind::None.status(), None);
        assert_eq!(EffectKind::Burn.status(), Some(StatusKind::DamageOverTime));
        assert_eq!(EffectKind::Poison.status(), Some(StatusKind::Poison));
        assert_eq!(EffectKind::Slow.status(), Some(StatusKind::Slow));
        assert_eq!(EffectKind::Freeze.status(), Some(StatusKind::Slow));
        assert_eq!(EffectKind::Stun.status(), Some(StatusKind::Stun));
    }

    #[test]
    fn test_spec_parses_from_ron_with_defaults() {
        let spec: EffectSpec = ron::from_str("(kind: Slow, duration: 3.0, intensity: 0.6)").unwrap();

        assert_eq!(spec.kind, EffectKind::Slow);
        assert_eq!(spec.chance, 1.0, "chance should default to always");
        assert_eq!(spec.speed_multiplier(), 0.6);
    }

    #[test]
    fn test_speed_multiplier_is_clamped() {
        assert_eq!(EffectSpec::slow(1.5, 1.0).speed_multiplier(), 1.0);
        assert_eq!(EffectSpec::freeze(-0.2, 1.0).speed_multiplier(), 0.0);
        assert_eq!(EffectSpec::slow(f32::NAN, 1.0).speed_multiplier(), 1.0);
    }
}
