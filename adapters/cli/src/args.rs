use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use maze_escape_core::Difficulty;

/// Command-line options accepted by the Maze Escape binary.
#[derive(Clone, Debug, Parser)]
#[command(name = "maze-escape", about = "Escape procedurally carved mazes")]
pub(crate) struct Args {
    /// Difficulty preset selecting grid dimensions and population counts.
    #[arg(long, value_enum)]
    pub difficulty: Option<DifficultyArg>,

    /// Overrides the preset's number of grid columns.
    #[arg(long)]
    pub columns: Option<u32>,

    /// Overrides the preset's number of grid rows.
    #[arg(long)]
    pub rows: Option<u32>,

    /// Overrides the preset's cell edge length in pixels.
    #[arg(long)]
    pub cell_size: Option<f32>,

    /// Seed for the whole run; drawn from OS entropy when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Path to a TOML file providing defaults for the options above.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Replays the session captured in a share code.
    #[arg(long, value_name = "CODE")]
    pub share_code: Option<String>,

    /// Populates the maze with wandering enemies.
    #[arg(long)]
    pub enemies: bool,

    /// Skips power-up placement.
    #[arg(long)]
    pub no_power_ups: bool,

    /// Steers the player toward the mouse cursor alongside the keys.
    #[arg(long)]
    pub mouse: bool,
}

/// Difficulty presets selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum DifficultyArg {
    /// Small grid, large cells, one slow enemy.
    Easy,
    /// The default grid with the full enemy roster.
    Medium,
    /// Large grid, small cells, the densest population.
    Hard,
}

impl DifficultyArg {
    /// Maps the flag onto the core preset.
    pub(crate) fn preset(self) -> Difficulty {
        match self {
            Self::Easy => Difficulty::Easy,
            Self::Medium => Difficulty::Medium,
            Self::Hard => Difficulty::Hard,
        }
    }
}
