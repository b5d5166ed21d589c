#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic power-up placement proposals for freshly carved mazes.

use maze_escape_core::{CellCoord, Command, Difficulty, Event, Maze, PowerUpKind};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Placement attempts allowed per power-up before giving up on it.
const PLACEMENT_ATTEMPTS: u32 = 100;

/// Configuration parameters required to construct the power-ups system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
    spawn_count: u32,
}

impl Config {
    /// Creates a new configuration with an explicit placement count.
    #[must_use]
    pub const fn new(rng_seed: u64, spawn_count: u32) -> Self {
        Self {
            rng_seed,
            spawn_count,
        }
    }

    /// Creates the configuration a difficulty preset asks for.
    #[must_use]
    pub const fn for_difficulty(difficulty: Difficulty, rng_seed: u64) -> Self {
        Self {
            rng_seed,
            spawn_count: difficulty.power_up_count(),
        }
    }
}

/// Pure system that proposes power-up placements after maze regeneration.
///
/// Proposals are validated by the world; collection and effect bookkeeping
/// live entirely in the world.
#[derive(Debug)]
pub struct PowerUps {
    rng: ChaCha8Rng,
    spawn_count: u32,
}

impl PowerUps {
    /// Creates a new power-ups system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            spawn_count: config.spawn_count,
        }
    }

    /// Consumes events and the maze view to emit placement commands.
    pub fn handle(&mut self, events: &[Event], maze: &Maze, out: &mut Vec<Command>) {
        for event in events {
            if let Event::MazeRegenerated { .. } = event {
                self.propose_placements(maze, out);
            }
        }
    }

    fn propose_placements(&mut self, maze: &Maze, out: &mut Vec<Command>) {
        let size = maze.grid().size();
        if size.cell_count() == 0 {
            return;
        }

        let mut chosen: Vec<CellCoord> = Vec::with_capacity(self.spawn_count as usize);

        for _ in 0..self.spawn_count {
            let mut placed = None;

            for _ in 0..PLACEMENT_ATTEMPTS {
                let column = self.rng.gen_range(0..size.columns());
                let row = self.rng.gen_range(0..size.rows());
                let cell = CellCoord::new(column, row);

                if cell == maze.entry() || cell == maze.exit() {
                    continue;
                }
                if chosen.contains(&cell) {
                    continue;
                }

                placed = Some(cell);
                break;
            }

            let Some(cell) = placed else {
                continue;
            };

            chosen.push(cell);
            let kind = PowerUpKind::ALL[self.rng.gen_range(0..PowerUpKind::ALL.len())];
            out.push(Command::SpawnPowerUp { cell, kind });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_escape_core::{GridSize, MazeGrid};
    use maze_escape_system_generation::generate;

    fn carved_maze(columns: u32, rows: u32, seed: u64) -> Maze {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        generate(GridSize::new(columns, rows), &mut rng).expect("valid dimensions")
    }

    fn regenerated(maze: &Maze) -> Event {
        Event::MazeRegenerated {
            size: maze.grid().size(),
        }
    }

    #[test]
    fn difficulty_configs_scale_the_placement_count() {
        assert_eq!(Config::for_difficulty(Difficulty::Easy, 0).spawn_count, 3);
        assert_eq!(Config::for_difficulty(Difficulty::Medium, 0).spawn_count, 5);
        assert_eq!(Config::for_difficulty(Difficulty::Hard, 0).spawn_count, 7);
    }

    #[test]
    fn regeneration_proposes_distinct_in_bounds_placements() {
        let maze = carved_maze(15, 10, 0x33);
        let mut system = PowerUps::new(Config::for_difficulty(Difficulty::Hard, 0x44));
        let mut commands = Vec::new();

        system.handle(&[regenerated(&maze)], &maze, &mut commands);

        assert_eq!(commands.len(), 7);

        let mut cells = Vec::new();
        for command in &commands {
            let Command::SpawnPowerUp { cell, kind } = command else {
                panic!("unexpected proposal {command:?}");
            };
            assert!(maze.grid().size().contains(*cell), "{cell:?}");
            assert_ne!(*cell, maze.entry());
            assert_ne!(*cell, maze.exit());
            assert!(!cells.contains(cell), "duplicate placement {cell:?}");
            assert!(PowerUpKind::ALL.contains(kind));
            cells.push(*cell);
        }
    }

    #[test]
    fn identical_seeds_propose_identical_placements() {
        let maze = carved_maze(15, 10, 2);

        let mut first = Vec::new();
        PowerUps::new(Config::new(6, 5)).handle(&[regenerated(&maze)], &maze, &mut first);

        let mut second = Vec::new();
        PowerUps::new(Config::new(6, 5)).handle(&[regenerated(&maze)], &maze, &mut second);

        assert_eq!(first, second);
    }

    #[test]
    fn exhausted_attempts_drop_the_placement() {
        // A 1x1 maze has no cell besides the shared entry and exit.
        let grid = MazeGrid::new(GridSize::new(1, 1));
        let maze = Maze::new(grid, CellCoord::new(0, 0), CellCoord::new(0, 0));
        let mut system = PowerUps::new(Config::new(5, 3));
        let mut commands = Vec::new();

        system.handle(&[regenerated(&maze)], &maze, &mut commands);

        assert!(commands.is_empty());
    }

    #[test]
    fn unrelated_events_are_ignored() {
        let maze = carved_maze(15, 10, 8);
        let mut system = PowerUps::new(Config::for_difficulty(Difficulty::Easy, 8));
        let mut commands = Vec::new();

        system.handle(
            &[Event::TickAdvanced { tick_index: 3 }, Event::ExitReached],
            &maze,
            &mut commands,
        );

        assert!(commands.is_empty());
    }
}
