//! Movement stats touched by status effects
//!
//! The movement controller lives outside the combat core; these components
//! are the only surface effects write to. Slow owns `MovementSpeed::speed`
//! while active, Stun owns `Locomotion::suspended`. The two never overlap.

use bevy::prelude::*;

/// Live movement speed (world units per second)
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct MovementSpeed {
    pub speed: f32,
}

impl MovementSpeed {
    pub fn new(speed: f32) -> Self {
        Self { speed }
    }
}

impl Default for MovementSpeed {
    fn default() -> Self {
        Self { speed: 3.5 }
    }
}

/// Autonomous movement switch read by the movement/AI controller
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Locomotion {
    suspended: bool,
}

impl Locomotion {
    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Stop autonomous movement (stun applied)
    pub fn suspend(&mut self) {
        self.suspended = true;
    }

    /// Resume autonomous movement (stun expired or cleansed)
    pub fn resume(&mut self) {
        self.suspended = false;
    }
}
