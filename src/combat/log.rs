//! Combat logging
//!
//! Records damage, healing, deaths and status effect changes for scenario
//! reports and post-run analysis.

use bevy::prelude::*;
use serde::Serialize;

use crate::effects::events::{EffectAttached, EffectRemovalReason, EffectRemoved};

use super::events::{DamageApplied, EntityDied, HealingApplied};
use super::SimulationClock;

/// A single entry in the combat log
#[derive(Debug, Clone, Serialize)]
pub struct CombatLogEntry {
    /// Timestamp in simulation time (seconds since start)
    pub timestamp: f32,
    /// The type of event
    pub event_type: CombatLogEventType,
    /// Human-readable description of the event
    pub message: String,
    /// Structured payload for queries (absent for free-form entries)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<StructuredEventData>,
}

/// Types of combat log events for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CombatLogEventType {
    /// Damage dealt
    Damage,
    /// Healing done
    Healing,
    /// Entity died
    Death,
    /// Status effect attached or refreshed
    EffectApplied,
    /// Status effect expired, cleansed or dropped with its owner
    EffectRemoved,
    /// Scenario event (start, end, scripted action)
    ScenarioEvent,
}

/// Queryable payload of a log entry, keyed by entity labels
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum StructuredEventData {
    Damage {
        target: String,
        source: Option<String>,
        amount: f32,
        health_after: f32,
    },
    Healing {
        target: String,
        source: Option<String>,
        amount: f32,
    },
    Death {
        victim: String,
        killer: Option<String>,
    },
}

/// The combat log resource storing all events
#[derive(Resource, Default)]
pub struct CombatLog {
    /// All log entries in chronological order
    pub entries: Vec<CombatLogEntry>,
    /// Current simulation time
    pub match_time: f32,
}

impl CombatLog {
    /// Clear the log for a new run
    pub fn clear(&mut self) {
        self.entries.clear();
        self.match_time = 0.0;
    }

    /// Add a new entry to the log
    pub fn log(&mut self, event_type: CombatLogEventType, message: String) {
        self.push(event_type, message, None);
    }

    /// Log a damage event with structured data
    pub fn log_damage(&mut self, target: &str, source: Option<&str>, amount: f32, health_after: f32) {
        let message = match source {
            Some(source) => format!("{} hits {} for {:.1} ({:.1} HP left)", source, target, amount, health_after),
            None => format!("{} takes {:.1} damage ({:.1} HP left)", target, amount, health_after),
        };
        self.push(
            CombatLogEventType::Damage,
            message,
            Some(StructuredEventData::Damage {
                target: target.to_string(),
                source: source.map(str::to_string),
                amount,
                health_after,
            }),
        );
    }

    /// Log a healing event with structured data
    pub fn log_healing(&mut self, target: &str, source: Option<&str>, amount: f32) {
        let message = match source {
            Some(source) => format!("{} heals {} for {:.1}", source, target, amount),
            None => format!("{} is healed for {:.1}", target, amount),
        };
        self.push(
            CombatLogEventType::Healing,
            message,
            Some(StructuredEventData::Healing {
                target: target.to_string(),
                source: source.map(str::to_string),
                amount,
            }),
        );
    }

    /// Log a death with structured data
    pub fn log_death(&mut self, victim: &str, killer: Option<&str>) {
        let message = match killer {
            Some(killer) => format!("{} has been killed by {}", victim, killer),
            None => format!("{} has died", victim),
        };
        self.push(
            CombatLogEventType::Death,
            message,
            Some(StructuredEventData::Death {
                victim: victim.to_string(),
                killer: killer.map(str::to_string),
            }),
        );
    }

    fn push(&mut self, event_type: CombatLogEventType, message: String, data: Option<StructuredEventData>) {
        self.entries.push(CombatLogEntry {
            timestamp: self.match_time,
            event_type,
            message,
            data,
        });
    }

    /// Get entries filtered by event type
    pub fn filter_by_type(&self, event_type: CombatLogEventType) -> Vec<&CombatLogEntry> {
        self.entries
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Get only HP-changing events (damage and healing)
    pub fn hp_changes_only(&self) -> Vec<&CombatLogEntry> {
        self.entries
            .iter()
            .filter(|e| {
                matches!(
                    e.event_type,
                    CombatLogEventType::Damage | CombatLogEventType::Healing
                )
            })
            .collect()
    }

    /// Get the last N entries
    pub fn recent(&self, count: usize) -> Vec<&CombatLogEntry> {
        self.entries.iter().rev().take(count).rev().collect()
    }

    /// Total damage taken by the entity with this label
    pub fn damage_taken_by(&self, label: &str) -> f32 {
        self.entries
            .iter()
            .filter_map(|e| match &e.data {
                Some(StructuredEventData::Damage { target, amount, .. }) if target == label => Some(*amount),
                _ => None,
            })
            .sum()
    }

    /// Number of deaths credited to the entity with this label
    pub fn killing_blows_by(&self, label: &str) -> usize {
        self.entries
            .iter()
            .filter(|e| {
                matches!(
                    &e.data,
                    Some(StructuredEventData::Death { killer: Some(killer), .. }) if killer == label
                )
            })
            .count()
    }

    /// (victim, killer) pairs in the order the deaths happened
    pub fn deaths(&self) -> Vec<(&str, Option<&str>)> {
        self.entries
            .iter()
            .filter_map(|e| match &e.data {
                Some(StructuredEventData::Death { victim, killer }) => Some((victim.as_str(), killer.as_deref())),
                _ => None,
            })
            .collect()
    }
}

/// Display label for an entity: its `Name`, or the raw id
pub fn entity_label(names: &Query<&Name>, entity: Entity) -> String {
    names
        .get(entity)
        .map(|name| name.as_str().to_string())
        .unwrap_or_else(|_| format!("{:?}", entity))
}

/// Turn this tick's combat events into log entries
///
/// Entries from one tick are grouped by kind rather than interleaved:
/// damage, healing, effects applied, deaths, then effects removed. Emission
/// order within a kind is kept. Subscribers on [`CombatListeners`] see the
/// exact emission order.
///
/// [`CombatListeners`]: super::listeners::CombatListeners
pub fn record_combat_log(
    clock: Res<SimulationClock>,
    names: Query<&Name>,
    mut combat_log: ResMut<CombatLog>,
    mut damage_events: EventReader<DamageApplied>,
    mut healing_events: EventReader<HealingApplied>,
    mut attached_events: EventReader<EffectAttached>,
    mut death_events: EventReader<EntityDied>,
    mut removed_events: EventReader<EffectRemoved>,
) {
    combat_log.match_time = clock.elapsed;

    for event in damage_events.read() {
        let target = entity_label(&names, event.target);
        let source = event.source.map(|source| entity_label(&names, source));
        combat_log.log_damage(&target, source.as_deref(), event.amount, event.health_after);
    }

    for event in healing_events.read() {
        let target = entity_label(&names, event.target);
        let source = event.source.map(|source| entity_label(&names, source));
        combat_log.log_healing(&target, source.as_deref(), event.amount);
    }

    for event in attached_events.read() {
        let target = entity_label(&names, event.target);
        let verb = if event.refreshed { "refreshed on" } else { "applied to" };
        combat_log.log(
            CombatLogEventType::EffectApplied,
            format!("{} {} {}", event.kind.name(), verb, target),
        );
    }

    for event in death_events.read() {
        let victim = entity_label(&names, event.entity);
        let killer = event.killer.map(|killer| entity_label(&names, killer));
        combat_log.log_death(&victim, killer.as_deref());
    }

    for event in removed_events.read() {
        let target = entity_label(&names, event.target);
        let how = match event.reason {
            EffectRemovalReason::Expired => "expired on",
            EffectRemovalReason::Cleansed => "cleansed from",
            EffectRemovalReason::OwnerDied => "ended with the death of",
        };
        combat_log.log(
            CombatLogEventType::EffectRemoved,
            format!("{} {} {}", event.kind.name(), how, target),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_taken_sums_only_matching_target() {
        let mut log = CombatLog::default();
        log.log_damage("Ghoul", Some("Hunter"), 10.0, 90.0);
        log.log_damage("Ghoul", None, 2.5, 87.5);
        log.log_damage("Hunter", Some("Ghoul"), 4.0, 46.0);

        assert_eq!(log.damage_taken_by("Ghoul"), 12.5);
        assert_eq!(log.damage_taken_by("Hunter"), 4.0);
        assert_eq!(log.damage_taken_by("Nobody"), 0.0);
    }

    #[test]
    fn test_deaths_and_killing_blows() {
        let mut log = CombatLog::default();
        log.log_death("Ghoul", Some("Hunter"));
        log.log_death("Bat", None);
        log.log_death("Rat", Some("Hunter"));

        assert_eq!(log.killing_blows_by("Hunter"), 2);
        assert_eq!(
            log.deaths(),
            vec![("Ghoul", Some("Hunter")), ("Bat", None), ("Rat", Some("Hunter"))]
        );
    }

    #[test]
    fn test_filters_and_recent() {
        let mut log = CombatLog::default();
        log.log(CombatLogEventType::ScenarioEvent, "start".to_string());
        log.log_damage("Ghoul", None, 1.0, 9.0);
        log.log_healing("Ghoul", None, 1.0);
        log.log(CombatLogEventType::EffectApplied, "Slow applied to Ghoul".to_string());

        assert_eq!(log.hp_changes_only().len(), 2);
        assert_eq!(log.filter_by_type(CombatLogEventType::ScenarioEvent).len(), 1);

        let recent = log.recent(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[1].event_type, CombatLogEventType::EffectApplied);
    }

    #[test]
    fn test_entries_use_current_match_time() {
        let mut log = CombatLog::default();
        log.match_time = 1.5;
        log.log_death("Ghoul", None);

        assert_eq!(log.entries[0].timestamp, 1.5);

        log.clear();
        assert!(log.entries.is_empty());
        assert_eq!(log.match_time, 0.0);
    }
}
