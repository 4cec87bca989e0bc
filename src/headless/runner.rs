//! Headless scenario execution
//!
//! Runs a scripted scenario on a `MinimalPlugins` app, stepping time by
//! exactly one fixed tick per update so runs are reproducible.

use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::combat::bus::DamageBus;
use crate::combat::events::CombatEvent;
use crate::combat::health::Health;
use crate::combat::listeners::CombatListeners;
use crate::combat::log::{entity_label, CombatLog, CombatLogEventType};
use crate::combat::rng::GameRng;
use crate::combat::{CombatPlugin, CombatSystemSet, SimulationClock};
use crate::effects::applicator::EffectApplicator;
use crate::effects::movement::{Locomotion, MovementSpeed};
use crate::effects::kind::StatusKind;
use crate::effects::store::EffectStore;
use crate::effects::StatusEffectsPlugin;
use crate::settings::CombatSettings;

use super::config::{ScenarioAction, ScenarioConfig};

/// Slack when comparing an action's `at_secs` to accumulated simulation time
const ACTION_TIME_EPSILON: f32 = 1e-4;

/// Result of a completed scenario run
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub scenario: String,
    /// Fixed ticks simulated
    pub ticks: u64,
    pub elapsed_secs: f32,
    /// Seed the effect rolls used (None if entropy-seeded)
    pub random_seed: Option<u64>,
    pub entities: Vec<EntityReport>,
    /// Deaths in the order they were announced
    pub deaths: Vec<DeathRecord>,
    /// Formatted combat log lines
    pub combat_log: Vec<String>,
}

/// Final state of one scenario entity
#[derive(Debug, Clone, Serialize)]
pub struct EntityReport {
    pub name: String,
    pub max_health: f32,
    pub final_health: f32,
    pub dead: bool,
    /// Sum of all damage applied to the entity
    pub damage_taken: f32,
    /// Current movement speed (None if the entity has none)
    pub speed: Option<f32>,
    pub movement_suspended: bool,
    pub active_effects: Vec<StatusKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeathRecord {
    pub victim: String,
    pub killer: Option<String>,
}

impl ScenarioResult {
    pub fn entity(&self, name: &str) -> Option<&EntityReport> {
        self.entities.iter().find(|e| e.name == name)
    }
}

/// Scripted actions, sorted by time, with a cursor to the next one due
#[derive(Resource, Debug, Default)]
pub struct ScenarioScript {
    actions: Vec<ScenarioAction>,
    next: usize,
}

impl ScenarioScript {
    pub fn new(mut actions: Vec<ScenarioAction>) -> Self {
        // Stable sort keeps authoring order for simultaneous actions
        actions.sort_by(|a, b| a.at_secs().total_cmp(&b.at_secs()));
        Self { actions, next: 0 }
    }
}

/// Spawned entities, indexed like `ScenarioConfig::entities`
#[derive(Resource, Debug, Default, Clone)]
pub struct ScenarioRoster(pub Vec<Entity>);

impl ScenarioRoster {
    pub fn entity(&self, index: usize) -> Option<Entity> {
        self.0.get(index).copied()
    }
}

/// Fire every scripted action whose time has come
pub fn apply_scripted_actions(
    clock: Res<SimulationClock>,
    roster: Res<ScenarioRoster>,
    names: Query<&Name>,
    mut script: ResMut<ScenarioScript>,
    mut combat_log: ResMut<CombatLog>,
    mut hits: ParamSet<(DamageBus, EffectApplicator)>,
) {
    combat_log.match_time = clock.elapsed;

    while let Some(action) = script.actions.get(script.next) {
        if action.at_secs() > clock.elapsed + ACTION_TIME_EPSILON {
            break;
        }
        let action = action.clone();
        script.next += 1;

        let Some(target) = roster.entity(action_target(&action)) else {
            warn!("Skipping scripted action with unknown target: {:?}", action);
            continue;
        };
        let label = entity_label(&names, target);

        match action {
            ScenarioAction::Hit {
                attacker,
                damage,
                effects,
                ..
            } => {
                let attacker = attacker.and_then(|i| roster.entity(i));
                hits.p0().apply_damage(target, damage, attacker);
                let stuck = hits.p1().apply_weapon_effects(&effects, target, attacker);
                debug!("Hit on {}: {:.1} damage, {}/{} effect(s) stuck", label, damage, stuck, effects.len());
            }
            ScenarioAction::Heal { amount, .. } => {
                hits.p0().apply_healing(target, amount, None);
            }
            ScenarioAction::Cleanse { .. } => {
                let removed = hits.p1().remove_all_effects(target);
                combat_log.log(
                    CombatLogEventType::ScenarioEvent,
                    format!("Cleanse on {} removed {} effect(s)", label, removed),
                );
            }
            ScenarioAction::Kill { attacker, .. } => {
                let attacker = attacker.and_then(|i| roster.entity(i));
                hits.p0().kill_entity(target, attacker);
            }
        }
    }
}

fn action_target(action: &ScenarioAction) -> usize {
    match action {
        ScenarioAction::Hit { target, .. }
        | ScenarioAction::Heal { target, .. }
        | ScenarioAction::Cleanse { target, .. }
        | ScenarioAction::Kill { target, .. } => *target,
    }
}

/// Build the scenario app: plugins, fixed clock, seeded RNG and roster
fn build_scenario_app(
    config: &ScenarioConfig,
    settings: &CombatSettings,
    log: Option<LogPlugin>,
) -> Result<App, String> {
    let step = Duration::try_from_secs_f64(settings.fixed_step_secs())
        .map_err(|e| format!("Invalid fixed step for {} Hz: {}", settings.fixed_hz, e))?;

    let mut app = App::new();
    if let Some(log) = log {
        app.add_plugins(log);
    }
    app.add_plugins(MinimalPlugins)
        .add_plugins((CombatPlugin, StatusEffectsPlugin))
        .insert_resource(settings.clone())
        .insert_resource(Time::<Fixed>::from_duration(step))
        .insert_resource(TimeUpdateStrategy::ManualDuration(step))
        .insert_resource(ScenarioScript::new(config.actions.clone()))
        .add_systems(FixedUpdate, apply_scripted_actions.in_set(CombatSystemSet::Hits));

    let game_rng = match config.random_seed {
        Some(seed) => {
            info!("Using deterministic RNG with seed: {}", seed);
            GameRng::from_seed(seed)
        }
        None => {
            info!("Using non-deterministic RNG (no seed provided)");
            GameRng::from_entropy()
        }
    };
    app.insert_resource(game_rng);

    let world = app.world_mut();
    let roster = config
        .entities
        .iter()
        .map(|entity| {
            let mut spawned = world.spawn((
                Name::new(entity.name.clone()),
                Health::new(entity.max_health).with_overheal(entity.allow_overheal),
            ));
            if let Some(speed) = entity.speed {
                spawned.insert((MovementSpeed::new(speed), Locomotion::default()));
            }
            spawned.id()
        })
        .collect();
    world.insert_resource(ScenarioRoster(roster));

    app.finish();
    app.cleanup();
    Ok(app)
}

/// Run a scenario to completion and report the final state
pub fn run_scenario(config: &ScenarioConfig, settings: &CombatSettings) -> Result<ScenarioResult, String> {
    run_scenario_with_log(config, settings, None)
}

/// [`run_scenario`] with `log` added to the scenario app.
///
/// `LogPlugin` installs a process-wide subscriber, so only the first one
/// added in a process takes effect; later ones are ignored with a warning.
pub fn run_scenario_with_log(
    config: &ScenarioConfig,
    settings: &CombatSettings,
    log: Option<LogPlugin>,
) -> Result<ScenarioResult, String> {
    config.validate()?;
    settings.validate()?;

    let mut app = build_scenario_app(config, settings, log)?;
    info!(
        "Starting scenario '{}': {} entities, {} actions, {:.1}s",
        config.name,
        config.entities.len(),
        config.actions.len(),
        config.duration_secs
    );

    // Record notifications in emission order for the death report
    let recorded: Arc<Mutex<Vec<CombatEvent>>> = Arc::default();
    let sink = Arc::clone(&recorded);
    let listener = app
        .world_mut()
        .resource_mut::<CombatListeners>()
        .subscribe(move |event: &CombatEvent| {
            if let Ok(mut events) = sink.lock() {
                events.push(*event);
            }
        });

    app.world_mut().resource_mut::<CombatLog>().log(
        CombatLogEventType::ScenarioEvent,
        format!("Scenario '{}' started", config.name),
    );

    let target_ticks = (config.duration_secs as f64 * settings.fixed_hz - 1e-6).ceil().max(1.0) as u64;
    // The first update only primes the clock; allow a few extra for that
    let max_updates = target_ticks + 8;
    let mut updates = 0;
    while app.world().resource::<SimulationClock>().ticks < target_ticks {
        if updates >= max_updates {
            return Err(format!(
                "Scenario '{}' stalled after {} updates ({} of {} ticks)",
                config.name,
                updates,
                app.world().resource::<SimulationClock>().ticks,
                target_ticks
            ));
        }
        app.update();
        updates += 1;
    }

    app.world_mut()
        .resource_mut::<CombatListeners>()
        .unsubscribe(listener);

    let clock = *app.world().resource::<SimulationClock>();
    {
        let mut combat_log = app.world_mut().resource_mut::<CombatLog>();
        combat_log.match_time = clock.elapsed;
        combat_log.log(
            CombatLogEventType::ScenarioEvent,
            format!("Scenario '{}' finished after {} ticks", config.name, clock.ticks),
        );
    }

    let events = recorded
        .lock()
        .map(|events| events.clone())
        .map_err(|e| format!("Combat listener state poisoned: {}", e))?;

    let result = build_scenario_result(&app, config, clock, &events);
    info!(
        "Scenario '{}' complete: {} death(s) in {:.2}s",
        result.scenario,
        result.deaths.len(),
        result.elapsed_secs
    );
    Ok(result)
}

fn build_scenario_result(
    app: &App,
    config: &ScenarioConfig,
    clock: SimulationClock,
    events: &[CombatEvent],
) -> ScenarioResult {
    let world = app.world();
    let roster = world.resource::<ScenarioRoster>();
    let store = world.resource::<EffectStore>();

    let label = |entity: Entity| -> String {
        roster
            .0
            .iter()
            .position(|e| *e == entity)
            .and_then(|i| config.entities.get(i))
            .map(|spawned| spawned.name.clone())
            .unwrap_or_else(|| format!("{:?}", entity))
    };

    let entities = roster
        .0
        .iter()
        .zip(&config.entities)
        .map(|(&entity, spawned)| {
            let health = world.get::<Health>(entity);
            let damage_taken = events
                .iter()
                .filter_map(|event| match event {
                    CombatEvent::DamageApplied(hit) if hit.target == entity => Some(hit.amount),
                    _ => None,
                })
                .sum();

            EntityReport {
                name: spawned.name.clone(),
                max_health: health.map(|h| h.max()).unwrap_or(0.0),
                final_health: health.map(|h| h.current()).unwrap_or(0.0),
                dead: health.map(|h| h.is_dead()).unwrap_or(true),
                damage_taken,
                speed: world.get::<MovementSpeed>(entity).map(|s| s.speed),
                movement_suspended: world
                    .get::<Locomotion>(entity)
                    .map(|l| l.is_suspended())
                    .unwrap_or(false),
                active_effects: store.get(entity).map(|slots| slots.kinds()).unwrap_or_default(),
            }
        })
        .collect();

    let deaths = events
        .iter()
        .filter_map(|event| match event {
            CombatEvent::EntityDied(died) => Some(DeathRecord {
                victim: label(died.entity),
                killer: died.killer.map(&label),
            }),
            _ => None,
        })
        .collect();

    let combat_log = world
        .resource::<CombatLog>()
        .entries
        .iter()
        .map(|entry| format!("[{:>7.2}s] {}", entry.timestamp, entry.message))
        .collect();

    ScenarioResult {
        scenario: config.name.clone(),
        ticks: clock.ticks,
        elapsed_secs: clock.elapsed,
        random_seed: world.resource::<GameRng>().seed,
        entities,
        deaths,
        combat_log,
    }
}
