//! Status effect lifecycle events (combat log and UI feedback)

use bevy::prelude::*;

use super::kind::StatusKind;

/// Event fired when an effect record is created or refreshed
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectAttached {
    pub target: Entity,
    pub source: Option<Entity>,
    pub kind: StatusKind,
    /// True when an existing single-instance record was refreshed
    pub refreshed: bool,
}

/// Event fired when an effect record is removed
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectRemoved {
    pub target: Entity,
    pub kind: StatusKind,
    pub reason: EffectRemovalReason,
}

/// Why an effect record was removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectRemovalReason {
    /// Duration ran out
    Expired,
    /// Removed by a cleanse
    Cleansed,
    /// Owner died while the effect was active
    OwnerDied,
}
