//! SurvivalSim - headless combat scenario runner
//!
//! Loads a scenario, runs it on the combat core and prints or saves the
//! JSON report.

use bevy::log::LogPlugin;
use bevy::prelude::*;
use std::process::ExitCode;

use survivalsim::cli::{self, Args};
use survivalsim::headless::{run_scenario_with_log, ScenarioConfig};
use survivalsim::settings::CombatSettings;

fn main() -> ExitCode {
    let args = cli::parse_args();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), String> {
    let mut config = ScenarioConfig::load_from_file(&args.scenario)?;
    if let Some(seed) = args.seed {
        config.random_seed = Some(seed);
    }

    let settings = match &args.settings {
        Some(path) => CombatSettings::load_from_file(path)?,
        None => CombatSettings::default(),
    };

    println!("Running scenario '{}'...", config.name);
    println!("  Entities: {}", config.entities.len());
    println!("  Actions: {}", config.actions.len());
    println!("  Duration: {:.1}s at {:.0} Hz", config.duration_secs, settings.fixed_hz);

    let log = LogPlugin {
        level: args.log_level(),
        ..default()
    };
    let result = run_scenario_with_log(&config, &settings, Some(log))?;
    let report = serde_json::to_string_pretty(&result)
        .map_err(|e| format!("Failed to serialize report: {}", e))?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, report)
                .map_err(|e| format!("Failed to write report to {:?}: {}", path, e))?;
            println!("Scenario complete. Report saved to: {}", path.display());
        }
        None => println!("{}", report),
    }

    Ok(())
}
