#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for Maze Escape.

use maze_escape_core::{
    CellCoord, Command, Direction, EnemyId, EnemyKind, Event, GamePhase, GridSize, IntentSet,
    Maze, MazeGrid, PixelPosition, PowerUpId, PowerUpKind, PowerUpSnapshot, SessionConfig,
    Velocity, RNG_STREAM_GENERATION, WELCOME_BANNER,
};
use maze_escape_system_generation::{derive_stream_seed, exit_distances, generate, DistanceField};
use maze_escape_system_movement::{occupying_cell, resolve_tick, Metrics};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// The player spawns this fraction of a cell inside the entry on both axes.
const ENTRY_SPAWN_DIVISOR: f32 = 3.0;

/// Represents the authoritative Maze Escape session state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: SessionConfig,
    maze: Maze,
    distances: DistanceField,
    player: Player,
    enemies: Vec<Enemy>,
    power_ups: Vec<PowerUp>,
    effects: Effects,
    phase: GamePhase,
    tick_index: u64,
    next_enemy_id: u32,
    next_power_up_id: u32,
}

impl World {
    /// Creates a new world awaiting its first session configuration.
    ///
    /// The maze starts empty and the phase starts paused; only
    /// [`Command::ConfigureSession`] has any effect until a session begins.
    #[must_use]
    pub fn new() -> Self {
        let maze = Maze::new(
            MazeGrid::new(GridSize::new(0, 0)),
            CellCoord::new(0, 0),
            CellCoord::new(0, 0),
        );
        Self {
            banner: WELCOME_BANNER,
            config: SessionConfig::default(),
            distances: exit_distances(&maze),
            maze,
            player: Player::at(PixelPosition::new(0.0, 0.0)),
            enemies: Vec::new(),
            power_ups: Vec::new(),
            effects: Effects::default(),
            phase: GamePhase::Paused,
            tick_index: 0,
            next_enemy_id: 0,
            next_power_up_id: 0,
        }
    }

    fn effective_speed(&self) -> f32 {
        let base = self.config.player_speed();
        let boosted = if self.effects.speed_ticks_left > 0 {
            base * self.effects.speed_multiplier
        } else {
            base
        };
        // The clamp only guards one wall-thickness band per tick, so boosts
        // never push the speed past it.
        boosted.min(self.config.wall_thickness())
    }

    fn metrics(&self) -> Metrics {
        Metrics::new(
            self.config.cell_size(),
            self.config.wall_thickness(),
            self.config.player_size(),
            self.effective_speed(),
        )
    }

    fn player_cell(&self) -> Option<CellCoord> {
        occupying_cell(
            self.player.position,
            self.config.cell_size(),
            self.maze.grid().size(),
        )
    }

    fn can_place_enemy(&self, cell: CellCoord) -> bool {
        self.maze.grid().size().contains(cell)
            && cell != self.maze.entry()
            && cell != self.maze.exit()
            && !self.enemies.iter().any(|enemy| enemy.cell == cell)
    }

    fn can_place_power_up(&self, cell: CellCoord) -> bool {
        self.maze.grid().size().contains(cell)
            && cell != self.maze.entry()
            && cell != self.maze.exit()
            && !self.power_ups.iter().any(|power_up| power_up.cell == cell)
    }

    fn initial_heading(&self, cell: CellCoord) -> Direction {
        self.maze
            .grid()
            .open_passages(cell)
            .map(|(direction, _)| direction)
            .next()
            .unwrap_or(Direction::North)
    }

    fn apply_effect(&mut self, kind: PowerUpKind) {
        match kind {
            PowerUpKind::Speed => {
                self.effects.speed_ticks_left = kind.effect_ticks();
                self.effects.speed_multiplier = kind.speed_multiplier();
            }
            PowerUpKind::Hint => self.effects.hint_revealed = true,
            PowerUpKind::Time => {
                self.effects.time_bonus_seconds = self
                    .effects
                    .time_bonus_seconds
                    .saturating_add(kind.time_bonus_seconds());
            }
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureSession { config } => {
            if config.validate().is_err() {
                return;
            }

            let stream_seed = derive_stream_seed(config.seed(), RNG_STREAM_GENERATION);
            let mut rng = ChaCha8Rng::seed_from_u64(stream_seed);
            let Ok(maze) = generate(config.size(), &mut rng) else {
                return;
            };

            let spawn = entry_spawn(&config, maze.entry());
            world.distances = exit_distances(&maze);
            world.maze = maze;
            world.config = config;
            world.player = Player::at(spawn);
            world.enemies.clear();
            world.power_ups.clear();
            world.effects = Effects::default();
            world.tick_index = 0;
            world.next_enemy_id = 0;
            world.next_power_up_id = 0;
            world.phase = GamePhase::Playing;

            out_events.push(Event::SessionConfigured {
                size: config.size(),
            });
            out_events.push(Event::MazeRegenerated {
                size: config.size(),
            });
            out_events.push(Event::PhaseChanged {
                phase: GamePhase::Playing,
            });
        }
        Command::Press { direction } => {
            if world.phase == GamePhase::Playing {
                world.player.intents.hold(direction);
            }
        }
        Command::Release { direction } => {
            if world.phase == GamePhase::Playing {
                world.player.intents.release(direction);
            }
        }
        Command::Tick => {
            if world.phase != GamePhase::Playing {
                return;
            }

            world.tick_index = world.tick_index.saturating_add(1);

            let resolution = resolve_tick(
                world.player.intents,
                world.player.position,
                &world.maze,
                world.metrics(),
            );
            world.player.intents = resolution.intents();
            world.player.velocity = resolution.velocity();
            world.player.position = resolution.position();

            for direction in resolution.blocked() {
                out_events.push(Event::MovementBlocked { direction });
            }
            if !resolution.velocity().is_zero() {
                out_events.push(Event::PlayerMoved {
                    position: resolution.position(),
                });
            }

            for enemy in world.enemies.iter_mut() {
                enemy.ticks_since_step = enemy.ticks_since_step.saturating_add(1);
            }

            if world.effects.speed_ticks_left > 0 {
                world.effects.speed_ticks_left -= 1;
            }

            if let Some(cell) = resolution.cell() {
                if let Some(index) = world
                    .power_ups
                    .iter()
                    .position(|power_up| power_up.cell == cell)
                {
                    let collected = world.power_ups.remove(index);
                    world.apply_effect(collected.kind);
                    out_events.push(Event::PowerUpCollected {
                        power_up_id: collected.id,
                        kind: collected.kind,
                    });
                }

                let caught = world
                    .enemies
                    .iter()
                    .find(|enemy| enemy.cell == cell)
                    .map(|enemy| enemy.id);
                if let Some(enemy_id) = caught {
                    world.player.position = entry_spawn(&world.config, world.maze.entry());
                    world.player.velocity = Velocity::ZERO;
                    out_events.push(Event::PlayerCaught { enemy_id });
                }
            }

            if world.player_cell() == Some(world.maze.exit()) {
                world.phase = GamePhase::Won;
                out_events.push(Event::ExitReached);
                out_events.push(Event::PhaseChanged {
                    phase: GamePhase::Won,
                });
            }

            out_events.push(Event::TickAdvanced {
                tick_index: world.tick_index,
            });
        }
        Command::Pause => {
            if world.phase == GamePhase::Playing {
                world.phase = GamePhase::Paused;
                out_events.push(Event::PhaseChanged {
                    phase: GamePhase::Paused,
                });
            }
        }
        Command::Resume => {
            if world.phase == GamePhase::Paused {
                world.phase = GamePhase::Playing;
                out_events.push(Event::PhaseChanged {
                    phase: GamePhase::Playing,
                });
            }
        }
        Command::SpawnEnemy { cell, kind } => {
            if !world.can_place_enemy(cell) {
                return;
            }

            let heading = world.initial_heading(cell);
            let enemy_id = EnemyId::new(world.next_enemy_id);
            world.next_enemy_id = world.next_enemy_id.saturating_add(1);
            world.enemies.push(Enemy {
                id: enemy_id,
                cell,
                kind,
                heading,
                ticks_since_step: 0,
            });
            out_events.push(Event::EnemySpawned {
                enemy_id,
                cell,
                kind,
            });
        }
        Command::StepEnemy { enemy_id, direction } => {
            if world.phase != GamePhase::Playing {
                return;
            }

            let Some(enemy) = world.enemies.iter_mut().find(|enemy| enemy.id == enemy_id)
            else {
                return;
            };

            if !enemy.ready_for_step() {
                return;
            }

            let from = enemy.cell;
            let destination = world
                .maze
                .grid()
                .open_passages(from)
                .find(|(open, _)| *open == direction);
            let Some((_, to)) = destination else {
                return;
            };

            enemy.cell = to;
            enemy.heading = direction;
            enemy.ticks_since_step = 0;
            out_events.push(Event::EnemyAdvanced { enemy_id, from, to });
        }
        Command::SpawnPowerUp { cell, kind } => {
            if !world.can_place_power_up(cell) {
                return;
            }

            let power_up_id = PowerUpId::new(world.next_power_up_id);
            world.next_power_up_id = world.next_power_up_id.saturating_add(1);
            world.power_ups.push(PowerUp {
                id: power_up_id,
                cell,
                kind,
            });
            out_events.push(Event::PowerUpSpawned {
                power_up_id,
                cell,
                kind,
            });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use maze_escape_core::{
        CellCoord, EnemySnapshot, EnemyView, GamePhase, Maze, PlayerSnapshot, PowerUpView,
    };
    use maze_escape_system_generation::shortest_path;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the current maze layout.
    #[must_use]
    pub fn maze(world: &World) -> &Maze {
        &world.maze
    }

    /// Lifecycle phase the session is currently in.
    #[must_use]
    pub fn phase(world: &World) -> GamePhase {
        world.phase
    }

    /// Index of the last completed tick, zero before the first tick.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Captures the pixel metrics governing the current session.
    #[must_use]
    pub fn metrics(world: &World) -> MetricsView {
        MetricsView {
            cell_size: world.config.cell_size(),
            wall_thickness: world.config.wall_thickness(),
            player_size: world.config.player_size(),
            effective_speed: world.effective_speed(),
        }
    }

    /// Captures a read-only snapshot of the player.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            position: world.player.position,
            cell: world.player_cell(),
            intents: world.player.intents,
            velocity: world.player.velocity,
        }
    }

    /// Captures a read-only view of the enemies inhabiting the maze.
    #[must_use]
    pub fn enemies(world: &World) -> EnemyView {
        let snapshots = world
            .enemies
            .iter()
            .map(|enemy| EnemySnapshot {
                id: enemy.id,
                cell: enemy.cell,
                kind: enemy.kind,
                heading: enemy.heading,
                ready_for_step: enemy.ready_for_step(),
            })
            .collect();
        EnemyView::from_snapshots(snapshots)
    }

    /// Captures a read-only view of the uncollected power-ups.
    #[must_use]
    pub fn power_ups(world: &World) -> PowerUpView {
        let snapshots = world
            .power_ups
            .iter()
            .map(|power_up| power_up.snapshot())
            .collect();
        PowerUpView::from_snapshots(snapshots)
    }

    /// Captures the effects currently acting on the session.
    #[must_use]
    pub fn active_effects(world: &World) -> EffectsView {
        EffectsView {
            speed_ticks_left: world.effects.speed_ticks_left,
            speed_multiplier: world.effects.speed_multiplier,
            hint_revealed: world.effects.hint_revealed,
            time_bonus_seconds: world.effects.time_bonus_seconds,
        }
    }

    /// Cells from the player's occupying cell to the exit while the hint is
    /// revealed; empty otherwise.
    #[must_use]
    pub fn hint_path(world: &World) -> Vec<CellCoord> {
        if !world.effects.hint_revealed {
            return Vec::new();
        }

        let Some(cell) = world.player_cell() else {
            return Vec::new();
        };

        shortest_path(&world.maze, &world.distances, cell)
    }

    /// Pixel metrics captured for the current session.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct MetricsView {
        /// Edge length of a square cell in pixels.
        pub cell_size: f32,
        /// Thickness of the wall collision band in pixels.
        pub wall_thickness: f32,
        /// Edge length of the player's square hit-box in pixels.
        pub player_size: f32,
        /// Player speed for the next tick after active effects.
        pub effective_speed: f32,
    }

    /// Effects currently acting on the session.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct EffectsView {
        /// Ticks remaining on the active speed boost, zero when idle.
        pub speed_ticks_left: u64,
        /// Multiplier the boost applies while its timer runs.
        pub speed_multiplier: f32,
        /// Indicates whether the exit hint stays revealed.
        pub hint_revealed: bool,
        /// Seconds of clock credit accumulated from collected time bonuses.
        pub time_bonus_seconds: u64,
    }
}

#[derive(Clone, Copy, Debug)]
struct Player {
    position: PixelPosition,
    intents: IntentSet,
    velocity: Velocity,
}

impl Player {
    fn at(position: PixelPosition) -> Self {
        Self {
            position,
            intents: IntentSet::none(),
            velocity: Velocity::ZERO,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Enemy {
    id: EnemyId,
    cell: CellCoord,
    kind: EnemyKind,
    heading: Direction,
    ticks_since_step: u64,
}

impl Enemy {
    fn ready_for_step(&self) -> bool {
        self.ticks_since_step >= self.kind.step_interval()
    }
}

#[derive(Clone, Copy, Debug)]
struct PowerUp {
    id: PowerUpId,
    cell: CellCoord,
    kind: PowerUpKind,
}

impl PowerUp {
    fn snapshot(&self) -> PowerUpSnapshot {
        PowerUpSnapshot {
            id: self.id,
            cell: self.cell,
            kind: self.kind,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Effects {
    speed_ticks_left: u64,
    speed_multiplier: f32,
    hint_revealed: bool,
    time_bonus_seconds: u64,
}

impl Default for Effects {
    fn default() -> Self {
        Self {
            speed_ticks_left: 0,
            speed_multiplier: 1.0,
            hint_revealed: false,
            time_bonus_seconds: 0,
        }
    }
}

fn entry_spawn(config: &SessionConfig, entry: CellCoord) -> PixelPosition {
    let offset = config.cell_size() / ENTRY_SPAWN_DIVISOR;
    PixelPosition::new(
        entry.column() as f32 * config.cell_size() + offset,
        entry.row() as f32 * config.cell_size() + offset,
    )
}
