//! Integration tests for combat log recording
//!
//! These tests verify that record_combat_log correctly:
//! - Labels entries with entity names
//! - Records deaths with their killer
//! - Records status effect attach and removal
//! - Stamps entries with simulation time

use bevy::ecs::system::RunSystemOnce;
use bevy::prelude::*;
use bevy::time::TimePlugin;

use survivalsim::combat::bus::DamageBus;
use survivalsim::combat::log::{record_combat_log, CombatLog, CombatLogEventType};
use survivalsim::combat::{CombatPlugin, GameRng, Health, SimulationClock};
use survivalsim::effects::{EffectApplicator, EffectSpec, Locomotion, MovementSpeed, StatusEffectsPlugin};

fn create_test_app() -> App {
    let mut app = App::new();
    app.add_plugins((TimePlugin, CombatPlugin, StatusEffectsPlugin))
        .insert_resource(GameRng::from_seed(7));
    app
}

fn spawn_named(app: &mut App, name: &str, max_health: f32) -> Entity {
    app.world_mut()
        .spawn((
            Name::new(name.to_string()),
            Health::new(max_health),
            MovementSpeed::new(4.0),
            Locomotion::default(),
        ))
        .id()
}

fn record(app: &mut App) {
    app.world_mut().run_system_once(record_combat_log).unwrap();
}

// =============================================================================
// Damage and Death Recording
// =============================================================================

#[test]
fn test_damage_and_death_are_labelled() {
    let mut app = create_test_app();
    let hunter = spawn_named(&mut app, "Hunter", 50.0);
    let ghoul = spawn_named(&mut app, "Ghoul", 30.0);

    app.world_mut()
        .run_system_once(move |mut bus: DamageBus| {
            bus.apply_damage(ghoul, 12.0, Some(hunter));
            bus.apply_damage(ghoul, 40.0, Some(hunter));
        })
        .unwrap();
    record(&mut app);

    let log = app.world().resource::<CombatLog>();
    assert_eq!(log.filter_by_type(CombatLogEventType::Damage).len(), 2);
    assert_eq!(log.damage_taken_by("Ghoul"), 52.0);
    assert_eq!(log.killing_blows_by("Hunter"), 1);
    assert_eq!(log.deaths(), vec![("Ghoul", Some("Hunter"))]);

    let death = &log.filter_by_type(CombatLogEventType::Death)[0];
    assert_eq!(death.message, "Ghoul has been killed by Hunter");
}

#[test]
fn test_unnamed_entities_fall_back_to_ids() {
    let mut app = create_test_app();
    let target = app.world_mut().spawn(Health::new(10.0)).id();

    app.world_mut()
        .run_system_once(move |mut bus: DamageBus| {
            bus.apply_damage(target, 3.0, None);
        })
        .unwrap();
    record(&mut app);

    let log = app.world().resource::<CombatLog>();
    assert_eq!(log.damage_taken_by(&format!("{:?}", target)), 3.0);
}

#[test]
fn test_healing_is_recorded() {
    let mut app = create_test_app();
    let knight = spawn_named(&mut app, "Knight", 100.0);

    app.world_mut()
        .run_system_once(move |mut bus: DamageBus| {
            bus.apply_damage(knight, 20.0, None);
            bus.apply_healing(knight, 15.0, None);
            bus.apply_healing(knight, 15.0, None);
        })
        .unwrap();
    record(&mut app);

    let log = app.world().resource::<CombatLog>();
    assert_eq!(log.hp_changes_only().len(), 3);
    let heals = log.filter_by_type(CombatLogEventType::Healing);
    assert_eq!(heals[0].message, "Knight is healed for 15.0");
    assert_eq!(heals[1].message, "Knight is healed for 5.0");
}

// =============================================================================
// Effect Recording
// =============================================================================

#[test]
fn test_effect_attach_and_cleanse_are_recorded() {
    let mut app = create_test_app();
    let bat = spawn_named(&mut app, "Bat", 20.0);

    app.world_mut()
        .run_system_once(move |mut effects: EffectApplicator| {
            effects.apply_weapon_effect(&EffectSpec::stun(2.0), bat, None);
            effects.apply_weapon_effect(&EffectSpec::stun(3.0), bat, None);
            effects.remove_all_effects(bat);
        })
        .unwrap();
    record(&mut app);

    let log = app.world().resource::<CombatLog>();
    let applied: Vec<&str> = log
        .filter_by_type(CombatLogEventType::EffectApplied)
        .iter()
        .map(|e| e.message.as_str())
        .collect();
    assert_eq!(applied, vec!["Stun applied to Bat", "Stun refreshed on Bat"]);

    let removed = log.filter_by_type(CombatLogEventType::EffectRemoved);
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].message, "Stun cleansed from Bat");
}

#[test]
fn test_entries_use_simulation_time() {
    let mut app = create_test_app();
    let ghoul = spawn_named(&mut app, "Ghoul", 30.0);

    app.world_mut().resource_mut::<SimulationClock>().elapsed = 2.5;
    app.world_mut()
        .run_system_once(move |mut bus: DamageBus| {
            bus.apply_damage(ghoul, 1.0, None);
        })
        .unwrap();
    record(&mut app);

    let log = app.world().resource::<CombatLog>();
    assert_eq!(log.entries[0].timestamp, 2.5);
}

#[test]
fn test_entries_within_a_tick_are_grouped_by_kind() {
    let mut app = create_test_app();
    let knight = spawn_named(&mut app, "Knight", 100.0);
    app.world_mut()
        .get_mut::<Health>(knight)
        .unwrap()
        .take_damage(30.0);

    // Emitted as: stun, cleanse, heal, hit
    app.world_mut()
        .run_system_once(move |mut effects: EffectApplicator| {
            effects.apply_weapon_effect(&EffectSpec::stun(1.0), knight, None);
            effects.remove_all_effects(knight);
        })
        .unwrap();
    app.world_mut()
        .run_system_once(move |mut bus: DamageBus| {
            bus.apply_healing(knight, 10.0, None);
            bus.apply_damage(knight, 5.0, None);
        })
        .unwrap();
    record(&mut app);

    let log = app.world().resource::<CombatLog>();
    let kinds: Vec<CombatLogEventType> = log.entries.iter().map(|e| e.event_type).collect();
    assert_eq!(
        kinds,
        vec![
            CombatLogEventType::Damage,
            CombatLogEventType::Healing,
            CombatLogEventType::EffectApplied,
            CombatLogEventType::EffectRemoved,
        ]
    );
}
