use std::{fs, path::Path};

use anyhow::{Context as _, Result};
use maze_escape_core::{Difficulty, GridSize, SessionConfig};
use serde::Deserialize;

use crate::args::{Args, DifficultyArg};

/// Optional launch defaults loaded from a TOML overrides file.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub(crate) struct FileOverrides {
    /// Difficulty preset named in the file.
    pub difficulty: Option<Difficulty>,
    /// Number of grid columns.
    pub columns: Option<u32>,
    /// Number of grid rows.
    pub rows: Option<u32>,
    /// Cell edge length in pixels.
    pub cell_size: Option<f32>,
    /// Run-wide seed.
    pub seed: Option<u64>,
    /// Whether enemies roam the maze.
    pub enemies: Option<bool>,
    /// Whether power-ups are placed.
    pub power_ups: Option<bool>,
    /// Whether mouse steering is enabled.
    pub mouse: Option<bool>,
}

impl FileOverrides {
    /// Loads overrides from the TOML file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file at {}", path.display()))?;
        parse_overrides(&contents)
            .with_context(|| format!("failed to parse config file at {}", path.display()))
    }
}

fn parse_overrides(contents: &str) -> Result<FileOverrides> {
    toml::from_str(contents).context("failed to parse toml contents")
}

/// Fully resolved launch settings.
///
/// Command-line flags beat file values, and file values beat the preset's
/// defaults.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Settings {
    /// Difficulty preset driving session defaults and population counts.
    pub difficulty: Difficulty,
    /// Grid dimensions after overrides.
    pub size: GridSize,
    /// Cell edge length after overrides.
    pub cell_size: f32,
    /// Explicitly requested run-wide seed, if any.
    pub seed: Option<u64>,
    /// Whether enemies roam the maze.
    pub enemies: bool,
    /// Whether power-ups are placed.
    pub power_ups: bool,
    /// Whether mouse steering is enabled.
    pub mouse_steering: bool,
}

impl Settings {
    /// Resolves settings from the parsed arguments and file overrides.
    pub(crate) fn resolve(args: &Args, file: &FileOverrides) -> Self {
        let difficulty = args
            .difficulty
            .map(DifficultyArg::preset)
            .or(file.difficulty)
            .unwrap_or(Difficulty::Medium);
        let preset = difficulty.session_config(0);

        let columns = args
            .columns
            .or(file.columns)
            .unwrap_or_else(|| preset.size().columns());
        let rows = args
            .rows
            .or(file.rows)
            .unwrap_or_else(|| preset.size().rows());
        let cell_size = args
            .cell_size
            .or(file.cell_size)
            .unwrap_or_else(|| preset.cell_size());

        Self {
            difficulty,
            size: GridSize::new(columns, rows),
            cell_size,
            seed: args.seed.or(file.seed),
            enemies: args.enemies || file.enemies.unwrap_or(false),
            power_ups: !args.no_power_ups && file.power_ups.unwrap_or(true),
            mouse_steering: args.mouse || file.mouse.unwrap_or(false),
        }
    }

    /// Builds the session configuration around a derived session seed.
    pub(crate) fn session_config(&self, session_seed: u64) -> SessionConfig {
        self.difficulty
            .session_config(session_seed)
            .with_size(self.size)
            .with_cell_size(self.cell_size)
    }
}
