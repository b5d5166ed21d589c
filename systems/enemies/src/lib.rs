#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic enemy placement and random-walk stepping proposals.

use maze_escape_core::{
    CellCoord, Command, Difficulty, Direction, EnemyKind, EnemyView, Event, Maze,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Spawn placements this far (Manhattan) or closer to the entry are rejected.
const ENTRY_EXCLUSION_DISTANCE: u32 = 5;
/// Placement attempts allowed per enemy before giving up on it.
const PLACEMENT_ATTEMPTS: u32 = 100;

/// Configuration parameters required to construct the enemies system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
    spawn_count: u32,
    kinds: &'static [EnemyKind],
}

impl Config {
    /// Creates a new configuration from an explicit roster.
    #[must_use]
    pub const fn new(rng_seed: u64, spawn_count: u32, kinds: &'static [EnemyKind]) -> Self {
        Self {
            rng_seed,
            spawn_count,
            kinds,
        }
    }

    /// Creates the configuration a difficulty preset asks for.
    #[must_use]
    pub const fn for_difficulty(difficulty: Difficulty, rng_seed: u64) -> Self {
        Self {
            rng_seed,
            spawn_count: difficulty.enemy_count(),
            kinds: difficulty.enemy_kinds(),
        }
    }
}

/// Pure system that proposes enemy spawn and step commands.
///
/// Every proposal is validated by the world; the system itself never mutates
/// session state.
#[derive(Debug)]
pub struct Enemies {
    rng: ChaCha8Rng,
    spawn_count: u32,
    kinds: &'static [EnemyKind],
}

impl Enemies {
    /// Creates a new enemies system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            spawn_count: config.spawn_count,
            kinds: config.kinds,
        }
    }

    /// Consumes events and immutable views to emit enemy commands.
    ///
    /// A regenerated maze triggers placement proposals; each advanced tick
    /// triggers step proposals for every enemy whose cadence is ready.
    pub fn handle(
        &mut self,
        events: &[Event],
        maze: &Maze,
        enemies: &EnemyView,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::MazeRegenerated { .. } => self.propose_spawns(maze, out),
                Event::TickAdvanced { .. } => self.propose_steps(maze, enemies, out),
                _ => {}
            }
        }
    }

    fn propose_spawns(&mut self, maze: &Maze, out: &mut Vec<Command>) {
        let size = maze.grid().size();
        if size.columns() <= 2 || size.rows() <= 2 || self.kinds.is_empty() {
            return;
        }

        let mut chosen: Vec<CellCoord> = Vec::with_capacity(self.spawn_count as usize);

        for _ in 0..self.spawn_count {
            let mut placed = None;

            for _ in 0..PLACEMENT_ATTEMPTS {
                let column = self.rng.gen_range(1..size.columns() - 1);
                let row = self.rng.gen_range(1..size.rows() - 1);
                let cell = CellCoord::new(column, row);

                if cell == maze.entry() || cell == maze.exit() {
                    continue;
                }
                if cell.manhattan_distance(maze.entry()) <= ENTRY_EXCLUSION_DISTANCE {
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
            let kind = self.kinds[self.rng.gen_range(0..self.kinds.len())];
            out.push(Command::SpawnEnemy { cell, kind });
        }
    }

    fn propose_steps(&mut self, maze: &Maze, enemies: &EnemyView, out: &mut Vec<Command>) {
        for snapshot in enemies.iter() {
            if !snapshot.ready_for_step {
                continue;
            }

            let continues = maze
                .grid()
                .open_passages(snapshot.cell)
                .any(|(direction, _)| direction == snapshot.heading);
            if continues {
                out.push(Command::StepEnemy {
                    enemy_id: snapshot.id,
                    direction: snapshot.heading,
                });
                continue;
            }

            let mut open: [Option<Direction>; 4] = [None; 4];
            let mut count = 0;
            for (direction, _) in maze.grid().open_passages(snapshot.cell) {
                open[count] = Some(direction);
                count += 1;
            }

            if count == 0 {
                continue;
            }

            if let Some(direction) = open[self.rng.gen_range(0..count)] {
                out.push(Command::StepEnemy {
                    enemy_id: snapshot.id,
                    direction,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_escape_core::{EnemyId, EnemySnapshot, GridSize, MazeGrid};
    use maze_escape_system_generation::generate;

    fn carved_maze(columns: u32, rows: u32, seed: u64) -> Maze {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        generate(GridSize::new(columns, rows), &mut rng).expect("valid dimensions")
    }

    fn corridor_maze() -> Maze {
        let mut grid = MazeGrid::new(GridSize::new(3, 1));
        assert!(grid.carve_between(CellCoord::new(0, 0), CellCoord::new(1, 0)));
        assert!(grid.carve_between(CellCoord::new(1, 0), CellCoord::new(2, 0)));
        Maze::new(grid, CellCoord::new(0, 0), CellCoord::new(2, 0))
    }

    fn snapshot(cell: CellCoord, heading: Direction, ready: bool) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(0),
            cell,
            kind: EnemyKind::Slow,
            heading,
            ready_for_step: ready,
        }
    }

    #[test]
    fn difficulty_configs_carry_the_preset_roster() {
        let easy = Config::for_difficulty(Difficulty::Easy, 1);
        let hard = Config::for_difficulty(Difficulty::Hard, 1);

        assert_eq!(easy.spawn_count, 1);
        assert_eq!(easy.kinds, &[EnemyKind::Slow]);
        assert_eq!(hard.spawn_count, 4);
        assert_eq!(hard.kinds, &EnemyKind::ALL);
    }

    #[test]
    fn regeneration_proposes_valid_interior_spawns() {
        let maze = carved_maze(20, 15, 0x11);
        let mut system = Enemies::new(Config::for_difficulty(Difficulty::Hard, 0x22));
        let mut commands = Vec::new();

        system.handle(
            &[Event::MazeRegenerated {
                size: maze.grid().size(),
            }],
            &maze,
            &EnemyView::default(),
            &mut commands,
        );

        assert_eq!(commands.len(), 4);

        let mut cells = Vec::new();
        for command in &commands {
            let Command::SpawnEnemy { cell, kind } = command else {
                panic!("unexpected proposal {command:?}");
            };
            assert!(cell.column() >= 1 && cell.column() <= 18, "{cell:?}");
            assert!(cell.row() >= 1 && cell.row() <= 13, "{cell:?}");
            assert!(cell.manhattan_distance(maze.entry()) > 5, "{cell:?}");
            assert!(!cells.contains(cell), "duplicate placement {cell:?}");
            assert!(EnemyKind::ALL.contains(kind));
            cells.push(*cell);
        }
    }

    #[test]
    fn identical_seeds_propose_identical_spawns() {
        let maze = carved_maze(20, 15, 7);
        let event = Event::MazeRegenerated {
            size: maze.grid().size(),
        };

        let mut first = Vec::new();
        Enemies::new(Config::for_difficulty(Difficulty::Medium, 5)).handle(
            &[event.clone()],
            &maze,
            &EnemyView::default(),
            &mut first,
        );

        let mut second = Vec::new();
        Enemies::new(Config::for_difficulty(Difficulty::Medium, 5)).handle(
            &[event],
            &maze,
            &EnemyView::default(),
            &mut second,
        );

        assert_eq!(first, second);
    }

    #[test]
    fn grids_without_interior_cells_propose_nothing() {
        let maze = corridor_maze();
        let mut system = Enemies::new(Config::for_difficulty(Difficulty::Easy, 3));
        let mut commands = Vec::new();

        system.handle(
            &[Event::MazeRegenerated {
                size: maze.grid().size(),
            }],
            &maze,
            &EnemyView::default(),
            &mut commands,
        );

        assert!(commands.is_empty());
    }

    #[test]
    fn ready_enemies_continue_their_heading_through_open_walls() {
        let maze = corridor_maze();
        let view = EnemyView::from_snapshots(vec![snapshot(
            CellCoord::new(1, 0),
            Direction::East,
            true,
        )]);
        let mut system = Enemies::new(Config::new(0, 0, &EnemyKind::ALL));
        let mut commands = Vec::new();

        system.handle(
            &[Event::TickAdvanced { tick_index: 1 }],
            &maze,
            &view,
            &mut commands,
        );

        assert_eq!(
            commands,
            vec![Command::StepEnemy {
                enemy_id: EnemyId::new(0),
                direction: Direction::East,
            }]
        );
    }

    #[test]
    fn blocked_headings_fall_back_to_an_open_direction() {
        let maze = corridor_maze();
        let view = EnemyView::from_snapshots(vec![snapshot(
            CellCoord::new(1, 0),
            Direction::North,
            true,
        )]);
        let mut system = Enemies::new(Config::new(9, 0, &EnemyKind::ALL));
        let mut commands = Vec::new();

        system.handle(
            &[Event::TickAdvanced { tick_index: 1 }],
            &maze,
            &view,
            &mut commands,
        );

        assert_eq!(commands.len(), 1);
        let Command::StepEnemy { direction, .. } = &commands[0] else {
            panic!("unexpected proposal {:?}", commands[0]);
        };
        assert!(matches!(*direction, Direction::East | Direction::West));
    }

    #[test]
    fn unready_enemies_stay_put() {
        let maze = corridor_maze();
        let view = EnemyView::from_snapshots(vec![snapshot(
            CellCoord::new(1, 0),
            Direction::East,
            false,
        )]);
        let mut system = Enemies::new(Config::new(0, 0, &EnemyKind::ALL));
        let mut commands = Vec::new();

        system.handle(
            &[Event::TickAdvanced { tick_index: 1 }],
            &maze,
            &view,
            &mut commands,
        );

        assert!(commands.is_empty());
    }

    #[test]
    fn unrelated_events_are_ignored() {
        let maze = corridor_maze();
        let mut system = Enemies::new(Config::for_difficulty(Difficulty::Medium, 1));
        let mut commands = Vec::new();

        let events = [
            Event::ExitReached,
            Event::PhaseChanged {
                phase: maze_escape_core::GamePhase::Won,
            },
        ];
        system.handle(&events, &maze, &EnemyView::default(), &mut commands);

        assert!(commands.is_empty());
    }
}
