//! Command-line interface for the scenario runner

use bevy::log::Level;
use clap::Parser;
use std::path::PathBuf;

/// Headless combat scenario simulator
#[derive(Parser, Debug)]
#[command(name = "survivalsim")]
#[command(about = "Run scripted combat scenarios headlessly")]
#[command(version)]
pub struct Args {
    /// Scenario JSON file to run
    #[arg(value_name = "SCENARIO")]
    pub scenario: PathBuf,

    /// Combat settings RON file (defaults are used if omitted)
    #[arg(long, value_name = "SETTINGS_FILE")]
    pub settings: Option<PathBuf>,

    /// Write the JSON report here instead of stdout
    #[arg(long, value_name = "OUTPUT_PATH")]
    pub output: Option<PathBuf>,

    /// Override the scenario's random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Most verbose level the scenario app logs at
    pub fn log_level(&self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        }
    }
}

pub fn parse_args() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_command_line() {
        let args = Args::try_parse_from([
            "survivalsim",
            "scenario.json",
            "--settings",
            "combat.ron",
            "--output",
            "report.json",
            "--seed",
            "42",
            "-v",
        ])
        .unwrap();

        assert_eq!(args.scenario, PathBuf::from("scenario.json"));
        assert_eq!(args.settings, Some(PathBuf::from("combat.ron")));
        assert_eq!(args.output, Some(PathBuf::from("report.json")));
        assert_eq!(args.seed, Some(42));
        assert!(args.verbose);
        assert_eq!(args.log_level(), Level::DEBUG);
    }

    #[test]
    fn test_quiet_by_default() {
        let args = Args::try_parse_from(["survivalsim", "scenario.json"]).unwrap();
        assert!(!args.verbose);
        assert_eq!(args.log_level(), Level::INFO);
        assert_eq!(args.seed, None);
    }

    #[test]
    fn test_scenario_is_required() {
        assert!(Args::try_parse_from(["survivalsim"]).is_err());
    }
}
