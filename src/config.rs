//! Command line and runtime settings.
//!
//! The defaults reproduce the classic layout of the visualizer: a 20 by 50 grid with the start
//! on row 10, column 15 and the finish on row 10, column 35.

use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::{grid::Coord, pathfinding::Relaxation};

/// Default number of grid rows.
pub const DEFAULT_HEIGHT: usize = 20;

/// Default number of grid columns.
pub const DEFAULT_WIDTH: usize = 50;

/// Default start cell.
pub const DEFAULT_START: Coord = Coord::new(10, 15);

/// Default finish cell.
pub const DEFAULT_FINISH: Coord = Coord::new(10, 35);

/// Default interval in milliseconds between two settled cells of the replay.
pub const DEFAULT_VISITED_DELAY_MS: u64 = 10;

/// Default interval in milliseconds between two path cells of the replay.
pub const DEFAULT_PATH_DELAY_MS: u64 = 50;

/// Settings the application is started with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Number of grid rows.
    pub height: usize,
    /// Number of grid columns.
    pub width: usize,
    /// Start cell of every search.
    pub start: Coord,
    /// Finish cell of every search.
    pub finish: Coord,
    /// Interval between two settled cells of the replay.
    pub visited_delay: Duration,
    /// Interval between two path cells of the replay.
    pub path_delay: Duration,
    /// Relaxation policy of the engine.
    pub relaxation: Relaxation,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            height: DEFAULT_HEIGHT,
            width: DEFAULT_WIDTH,
            start: DEFAULT_START,
            finish: DEFAULT_FINISH,
            visited_delay: Duration::from_millis(DEFAULT_VISITED_DELAY_MS),
            path_delay: Duration::from_millis(DEFAULT_PATH_DELAY_MS),
            relaxation: Relaxation::default(),
        }
    }
}

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Number of grid rows.
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    pub height: usize,
    /// Number of grid columns.
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: usize,
    /// Start cell, written as `row,col`.
    #[arg(long, default_value = "10,15", value_parser = parse_coord)]
    pub start: Coord,
    /// Finish cell, written as `row,col`.
    #[arg(long, default_value = "10,35", value_parser = parse_coord)]
    pub finish: Coord,
    /// Milliseconds between two settled cells of the replay.
    #[arg(long, default_value_t = DEFAULT_VISITED_DELAY_MS)]
    pub visited_delay_ms: u64,
    /// Milliseconds between two path cells of the replay.
    #[arg(long, default_value_t = DEFAULT_PATH_DELAY_MS)]
    pub path_delay_ms: u64,
    /// How settled cells update their neighbours.
    #[arg(long, value_enum, default_value_t = Relaxation::Overwrite)]
    pub relaxation: Relaxation,
    /// Append tracing output to this file; nothing is logged otherwise.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Returns the settings described by the arguments.
    #[must_use]
    pub const fn settings(&self) -> Settings {
        Settings {
            height: self.height,
            width: self.width,
            start: self.start,
            finish: self.finish,
            visited_delay: Duration::from_millis(self.visited_delay_ms),
            path_delay: Duration::from_millis(self.path_delay_ms),
            relaxation: self.relaxation,
        }
    }
}

/// Parses a `row,col` coordinate argument.
fn parse_coord(text: &str) -> Result<Coord, String> {
    text.parse::<Coord>().map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_match_classic_layout() {
        let settings = Settings::default();

        assert_eq!(settings.height, 20);
        assert_eq!(settings.width, 50);
        assert_eq!(settings.start, Coord::new(10, 15));
        assert_eq!(settings.finish, Coord::new(10, 35));
        assert_eq!(settings.visited_delay, Duration::from_millis(10));
        assert_eq!(settings.path_delay, Duration::from_millis(50));
        assert_eq!(settings.relaxation, Relaxation::Overwrite);
    }

    #[test]
    fn test_cli_defaults_match_settings() {
        let cli = Cli::try_parse_from(["dijkstrui"]).expect("empty command line should parse");

        assert_eq!(cli.settings(), Settings::default());
        assert_eq!(cli.log_file, None);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::try_parse_from([
            "dijkstrui",
            "--height",
            "8",
            "--width",
            "12",
            "--start",
            "1,2",
            "--finish",
            "7,11",
            "--visited-delay-ms",
            "0",
            "--path-delay-ms",
            "5",
            "--relaxation",
            "improve",
            "--log-file",
            "run.log",
        ])
        .expect("command line should parse");

        let settings = cli.settings();
        assert_eq!(settings.height, 8);
        assert_eq!(settings.width, 12);
        assert_eq!(settings.start, Coord::new(1, 2));
        assert_eq!(settings.finish, Coord::new(7, 11));
        assert_eq!(settings.visited_delay, Duration::ZERO);
        assert_eq!(settings.path_delay, Duration::from_millis(5));
        assert_eq!(settings.relaxation, Relaxation::Improve);
        assert_eq!(cli.log_file, Some(PathBuf::from("run.log")));
    }

    #[test]
    fn test_cli_rejects_bad_coordinates() {
        assert!(Cli::try_parse_from(["dijkstrui", "--start", "10"]).is_err());
        assert!(Cli::try_parse_from(["dijkstrui", "--finish", "x,1"]).is_err());
        assert!(Cli::try_parse_from(["dijkstrui", "--relaxation", "sometimes"]).is_err());
    }
}
