#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Escape engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Maze Escape.";

/// Label feeding the seed derivation for the maze carving stream.
pub const RNG_STREAM_GENERATION: &str = "maze-escape.generation";
/// Label feeding the seed derivation for the enemy placement stream.
pub const RNG_STREAM_ENEMIES: &str = "maze-escape.enemies";
/// Label feeding the seed derivation for the power-up placement stream.
pub const RNG_STREAM_POWER_UPS: &str = "maze-escape.power-ups";

/// Describes the lifecycle phase of a running session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GamePhase {
    /// The simulation advances and the player responds to input.
    Playing,
    /// The simulation is frozen; only resume and reconfigure are honoured.
    Paused,
    /// The player reached the exit; the session waits for a restart.
    Won,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Rebuilds the session from the provided configuration.
    ConfigureSession {
        /// Dimensions, metrics, and seed for the new session.
        config: SessionConfig,
    },
    /// Records that the player started holding a movement direction.
    Press {
        /// Direction the player began pressing toward.
        direction: Direction,
    },
    /// Records that the player stopped holding a movement direction.
    Release {
        /// Direction the player released.
        direction: Direction,
    },
    /// Advances the simulation by a single frame.
    Tick,
    /// Freezes a playing session.
    Pause,
    /// Unfreezes a paused session.
    Resume,
    /// Requests that an enemy be inserted into the maze.
    SpawnEnemy {
        /// Cell the enemy should occupy after spawning.
        cell: CellCoord,
        /// Behavioural kind of the spawned enemy.
        kind: EnemyKind,
    },
    /// Requests that an enemy advance a single cell in the given direction.
    StepEnemy {
        /// Identifier of the enemy attempting to move.
        enemy_id: EnemyId,
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Requests that a power-up be placed into the maze.
    SpawnPowerUp {
        /// Cell the power-up should occupy.
        cell: CellCoord,
        /// Effect granted when the power-up is collected.
        kind: PowerUpKind,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a configuration was accepted and a session began.
    SessionConfigured {
        /// Grid dimensions of the freshly configured session.
        size: GridSize,
    },
    /// Announces that a new maze layout replaced the previous one.
    MazeRegenerated {
        /// Grid dimensions of the carved maze.
        size: GridSize,
    },
    /// Indicates that the simulation advanced by one frame.
    TickAdvanced {
        /// Index of the tick that just completed, starting at one.
        tick_index: u64,
    },
    /// Reports that the player's position changed during the tick.
    PlayerMoved {
        /// Player position after integration, in maze-local pixels.
        position: PixelPosition,
    },
    /// Reports that a held intent was suppressed by a solid wall.
    MovementBlocked {
        /// Direction whose intent flag was cleared.
        direction: Direction,
    },
    /// Announces that the session entered a new lifecycle phase.
    PhaseChanged {
        /// Phase that became active after processing commands.
        phase: GamePhase,
    },
    /// Announces that the player's occupying cell reached the exit.
    ExitReached,
    /// Confirms that an enemy was created in the maze.
    EnemySpawned {
        /// Identifier assigned to the newly spawned enemy.
        enemy_id: EnemyId,
        /// Cell the enemy occupies after spawning.
        cell: CellCoord,
        /// Behavioural kind applied to the enemy.
        kind: EnemyKind,
    },
    /// Confirms that an enemy successfully moved between two cells.
    EnemyAdvanced {
        /// Identifier of the enemy that advanced.
        enemy_id: EnemyId,
        /// Cell the enemy occupied before moving.
        from: CellCoord,
        /// Cell the enemy occupies after completing the move.
        to: CellCoord,
    },
    /// Reports that an enemy caught the player, who respawned at the entry.
    PlayerCaught {
        /// Identifier of the enemy that shared the player's cell.
        enemy_id: EnemyId,
    },
    /// Confirms that a power-up was placed into the maze.
    PowerUpSpawned {
        /// Identifier assigned to the power-up.
        power_up_id: PowerUpId,
        /// Cell the power-up occupies.
        cell: CellCoord,
        /// Effect granted on collection.
        kind: PowerUpKind,
    },
    /// Confirms that the player collected a power-up.
    PowerUpCollected {
        /// Identifier of the collected power-up.
        power_up_id: PowerUpId,
        /// Effect that was applied to the session.
        kind: PowerUpKind,
    },
}

/// Cardinal directions in screen space.
///
/// North faces decreasing rows (the top wall of a cell), East faces
/// increasing columns, South faces increasing rows, and West faces
/// decreasing columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward decreasing row indices.
    North,
    /// Toward increasing column indices.
    East,
    /// Toward increasing row indices.
    South,
    /// Toward decreasing column indices.
    West,
}

impl Direction {
    /// Every direction in the fixed probe order used throughout the engine.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Returns the direction facing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a power-up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PowerUpId(u32);

impl PowerUpId {
    /// Creates a new power-up identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }
}

/// Dimensions of a rectangular cell grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    columns: u32,
    rows: u32,
}

impl GridSize {
    /// Creates a new grid size descriptor.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells contained in the grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let columns = usize::try_from(self.columns).unwrap_or(0);
        let rows = usize::try_from(self.rows).unwrap_or(0);
        columns.checked_mul(rows).unwrap_or(0)
    }

    /// Reports whether the coordinate lies within the grid bounds.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }
}

/// Wall flags for a single cell, one per cardinal direction.
///
/// A freshly built grid seals every cell; carving and border openings are the
/// only operations that remove walls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Walls {
    north: bool,
    east: bool,
    south: bool,
    west: bool,
}

impl Walls {
    /// Returns a cell with all four walls solid.
    #[must_use]
    pub const fn sealed() -> Self {
        Self {
            north: true,
            east: true,
            south: true,
            west: true,
        }
    }

    /// Reports whether the wall facing the provided direction is solid.
    #[must_use]
    pub const fn is_solid(&self, direction: Direction) -> bool {
        match direction {
            Direction::North => self.north,
            Direction::East => self.east,
            Direction::South => self.south,
            Direction::West => self.west,
        }
    }

    /// Removes the wall facing the provided direction.
    pub fn open(&mut self, direction: Direction) {
        match direction {
            Direction::North => self.north = false,
            Direction::East => self.east = false,
            Direction::South => self.south = false,
            Direction::West => self.west = false,
        }
    }

    /// Number of solid walls remaining on the cell.
    #[must_use]
    pub fn solid_count(&self) -> usize {
        Direction::ALL
            .into_iter()
            .filter(|direction| self.is_solid(*direction))
            .count()
    }

    /// Iterator over the directions whose walls have been removed.
    pub fn open_directions(self) -> impl Iterator<Item = Direction> {
        Direction::ALL
            .into_iter()
            .filter(move |direction| !self.is_solid(*direction))
    }
}

impl Default for Walls {
    fn default() -> Self {
        Self::sealed()
    }
}

/// Dense row-major grid of per-cell wall flags.
///
/// Cells are stored at `column + row * columns`. Interior walls only change
/// through [`MazeGrid::carve_between`], which removes the shared wall from
/// both adjacent cells, so the wall between two in-bounds neighbours is
/// always open on both sides or solid on both sides.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazeGrid {
    size: GridSize,
    cells: Vec<Walls>,
}

impl MazeGrid {
    /// Creates a grid of the provided size with every cell sealed.
    #[must_use]
    pub fn new(size: GridSize) -> Self {
        Self {
            size,
            cells: vec![Walls::sealed(); size.cell_count()],
        }
    }

    /// Dimensions of the grid.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Wall flags for the provided cell, or `None` when it is out of bounds.
    #[must_use]
    pub fn walls_at(&self, cell: CellCoord) -> Option<Walls> {
        self.index(cell)
            .and_then(|index| self.cells.get(index))
            .copied()
    }

    /// In-bounds neighbour of the cell in the provided direction.
    #[must_use]
    pub fn neighbor(&self, cell: CellCoord, direction: Direction) -> Option<CellCoord> {
        if !self.size.contains(cell) {
            return None;
        }

        let candidate = match direction {
            Direction::North => CellCoord::new(cell.column(), cell.row().checked_sub(1)?),
            Direction::East => CellCoord::new(cell.column().checked_add(1)?, cell.row()),
            Direction::South => CellCoord::new(cell.column(), cell.row().checked_add(1)?),
            Direction::West => CellCoord::new(cell.column().checked_sub(1)?, cell.row()),
        };

        self.size.contains(candidate).then_some(candidate)
    }

    /// Removes the shared wall between two cardinal neighbours.
    ///
    /// Returns `false` and leaves the grid untouched when the cells are not
    /// in-bounds cardinal neighbours.
    pub fn carve_between(&mut self, a: CellCoord, b: CellCoord) -> bool {
        let Some(direction) = self.direction_between(a, b) else {
            return false;
        };

        let Some(a_index) = self.index(a) else {
            return false;
        };
        let Some(b_index) = self.index(b) else {
            return false;
        };

        self.cells[a_index].open(direction);
        self.cells[b_index].open(direction.opposite());
        true
    }

    /// Opens an outward-facing boundary wall, as used for entry and exit.
    ///
    /// Returns `false` when the wall faces an in-bounds neighbour, since
    /// opening only one side of an interior wall would break symmetry.
    pub fn open_border(&mut self, cell: CellCoord, direction: Direction) -> bool {
        if !self.size.contains(cell) {
            return false;
        }

        if self.neighbor(cell, direction).is_some() {
            return false;
        }

        let Some(index) = self.index(cell) else {
            return false;
        };

        self.cells[index].open(direction);
        true
    }

    /// Iterator over every coordinate in row-major order.
    pub fn cell_coords(&self) -> impl Iterator<Item = CellCoord> {
        let columns = self.size.columns();
        let rows = self.size.rows();
        (0..rows).flat_map(move |row| (0..columns).map(move |column| CellCoord::new(column, row)))
    }

    /// Open passages leading out of the cell, paired with their destinations.
    ///
    /// Border openings are excluded; only passages toward in-bounds
    /// neighbours are produced.
    pub fn open_passages(
        &self,
        cell: CellCoord,
    ) -> impl Iterator<Item = (Direction, CellCoord)> + '_ {
        let walls = self.walls_at(cell);
        Direction::ALL.into_iter().filter_map(move |direction| {
            let walls = walls?;
            if walls.is_solid(direction) {
                return None;
            }
            let neighbor = self.neighbor(cell, direction)?;
            Some((direction, neighbor))
        })
    }

    /// Number of interior wall pairs that have been carved open.
    ///
    /// Each opening is counted once by scanning East and South walls toward
    /// in-bounds neighbours.
    #[must_use]
    pub fn open_wall_pairs(&self) -> usize {
        self.cell_coords()
            .map(|cell| {
                let Some(walls) = self.walls_at(cell) else {
                    return 0;
                };
                let east = usize::from(
                    !walls.is_solid(Direction::East)
                        && self.neighbor(cell, Direction::East).is_some(),
                );
                let south = usize::from(
                    !walls.is_solid(Direction::South)
                        && self.neighbor(cell, Direction::South).is_some(),
                );
                east + south
            })
            .sum()
    }

    fn direction_between(&self, a: CellCoord, b: CellCoord) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|direction| self.neighbor(a, *direction) == Some(b))
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.size.contains(cell) {
            return None;
        }

        let column = usize::try_from(cell.column()).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        let width = usize::try_from(self.size.columns()).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

/// Carved maze layout together with its entry and exit openings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    grid: MazeGrid,
    entry: CellCoord,
    exit: CellCoord,
}

impl Maze {
    /// Wraps a carved grid with its entry and exit cells.
    #[must_use]
    pub const fn new(grid: MazeGrid, entry: CellCoord, exit: CellCoord) -> Self {
        Self { grid, entry, exit }
    }

    /// Wall layout of the maze.
    #[must_use]
    pub const fn grid(&self) -> &MazeGrid {
        &self.grid
    }

    /// Cell holding the opened entry border.
    #[must_use]
    pub const fn entry(&self) -> CellCoord {
        self.entry
    }

    /// Cell holding the opened exit border.
    #[must_use]
    pub const fn exit(&self) -> CellCoord {
        self.exit
    }
}

/// Continuous position of the player's top-left corner in maze-local pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PixelPosition {
    x: f32,
    y: f32,
}

impl PixelPosition {
    /// Creates a new pixel position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal component in pixels.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical component in pixels.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Returns the position displaced by the provided deltas.
    #[must_use]
    pub fn translated(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Per-tick pixel velocity derived from the surviving intents.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Velocity {
    dx: f32,
    dy: f32,
}

impl Velocity {
    /// The resting velocity.
    pub const ZERO: Velocity = Velocity { dx: 0.0, dy: 0.0 };

    /// Creates a velocity from per-axis pixel deltas.
    #[must_use]
    pub const fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    /// Horizontal delta in pixels per tick.
    #[must_use]
    pub const fn dx(&self) -> f32 {
        self.dx
    }

    /// Vertical delta in pixels per tick.
    #[must_use]
    pub const fn dy(&self) -> f32 {
        self.dy
    }

    /// Reports whether both components are zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }
}

/// Held movement intent flags, one per cardinal direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct IntentSet {
    north: bool,
    east: bool,
    south: bool,
    west: bool,
}

impl IntentSet {
    /// Returns a set with no direction held.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            north: false,
            east: false,
            south: false,
            west: false,
        }
    }

    /// Marks the direction as held.
    pub fn hold(&mut self, direction: Direction) {
        self.set(direction, true);
    }

    /// Marks the direction as released.
    pub fn release(&mut self, direction: Direction) {
        self.set(direction, false);
    }

    /// Reports whether the direction is currently held.
    #[must_use]
    pub const fn is_held(&self, direction: Direction) -> bool {
        match direction {
            Direction::North => self.north,
            Direction::East => self.east,
            Direction::South => self.south,
            Direction::West => self.west,
        }
    }

    /// Reports whether any direction is held.
    #[must_use]
    pub fn any_held(&self) -> bool {
        Direction::ALL
            .into_iter()
            .any(|direction| self.is_held(direction))
    }

    fn set(&mut self, direction: Direction, held: bool) {
        match direction {
            Direction::North => self.north = held,
            Direction::East => self.east = held,
            Direction::South => self.south = held,
            Direction::West => self.west = held,
        }
    }
}

/// Behavioural kinds of maze enemies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    /// Ambles through the maze at the slowest cadence.
    Slow,
    /// Rushes through the maze at twice the slow cadence.
    Fast,
    /// Walks corridors at an intermediate cadence.
    Patrol,
}

impl EnemyKind {
    /// Every enemy kind in spawn-selection order.
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Slow, EnemyKind::Fast, EnemyKind::Patrol];

    /// Number of ticks an enemy of this kind waits between steps.
    #[must_use]
    pub const fn step_interval(self) -> u64 {
        match self {
            Self::Slow => 60,
            Self::Fast => 30,
            Self::Patrol => 45,
        }
    }
}

/// Effects granted by collectable power-ups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PowerUpKind {
    /// Temporarily multiplies the player's movement speed.
    Speed,
    /// Permanently reveals the path from the player to the exit.
    Hint,
    /// Grants a one-off time bonus observed by the session clock.
    Time,
}

impl PowerUpKind {
    /// Every power-up kind in spawn-selection order.
    pub const ALL: [PowerUpKind; 3] = [PowerUpKind::Speed, PowerUpKind::Hint, PowerUpKind::Time];

    /// Speed multiplier applied while the effect is active.
    ///
    /// Kinds without a speed component report a neutral multiplier.
    #[must_use]
    pub const fn speed_multiplier(self) -> f32 {
        match self {
            Self::Speed => 2.0,
            Self::Hint | Self::Time => 1.0,
        }
    }

    /// Number of ticks the effect lasts after collection.
    ///
    /// Instantaneous and permanent effects report zero.
    #[must_use]
    pub const fn effect_ticks(self) -> u64 {
        match self {
            Self::Speed => 300,
            Self::Hint | Self::Time => 0,
        }
    }

    /// Seconds credited to the session clock on collection.
    #[must_use]
    pub const fn time_bonus_seconds(self) -> u64 {
        match self {
            Self::Time => 10,
            Self::Speed | Self::Hint => 0,
        }
    }
}

/// Built-in difficulty presets bundling grid, metric, and population tuning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Small grid with large cells and a single slow enemy.
    Easy,
    /// The default grid with the full enemy roster.
    Medium,
    /// Large grid with small cells and the densest population.
    Hard,
}

impl Difficulty {
    /// Builds the session configuration for this preset around a seed.
    #[must_use]
    pub const fn session_config(self, seed: u64) -> SessionConfig {
        let (columns, rows, cell_size) = match self {
            Self::Easy => (15, 10, 35.0),
            Self::Medium => (20, 15, 30.0),
            Self::Hard => (30, 20, 25.0),
        };

        SessionConfig {
            size: GridSize::new(columns, rows),
            cell_size,
            wall_thickness: 4.0,
            player_size: 10.0,
            player_speed: 4.0,
            seed,
        }
    }

    /// Number of enemies placed by this preset.
    #[must_use]
    pub const fn enemy_count(self) -> u32 {
        match self {
            Self::Easy => 1,
            Self::Medium => 2,
            Self::Hard => 4,
        }
    }

    /// Enemy kinds eligible for placement under this preset.
    #[must_use]
    pub const fn enemy_kinds(self) -> &'static [EnemyKind] {
        match self {
            Self::Easy => &[EnemyKind::Slow],
            Self::Medium | Self::Hard => &EnemyKind::ALL,
        }
    }

    /// Number of power-ups placed by this preset.
    #[must_use]
    pub const fn power_up_count(self) -> u32 {
        match self {
            Self::Easy => 3,
            Self::Medium => 5,
            Self::Hard => 7,
        }
    }
}

/// Dimensions, metrics, and seed describing one maze session.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    size: GridSize,
    cell_size: f32,
    wall_thickness: f32,
    player_size: f32,
    player_speed: f32,
    seed: u64,
}

impl SessionConfig {
    /// Creates a configuration from explicit values.
    #[must_use]
    pub const fn new(
        size: GridSize,
        cell_size: f32,
        wall_thickness: f32,
        player_size: f32,
        player_speed: f32,
        seed: u64,
    ) -> Self {
        Self {
            size,
            cell_size,
            wall_thickness,
            player_size,
            player_speed,
            seed,
        }
    }

    /// Grid dimensions of the session.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Edge length of a square cell in pixels.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Thickness of the wall collision band in pixels.
    #[must_use]
    pub const fn wall_thickness(&self) -> f32 {
        self.wall_thickness
    }

    /// Edge length of the player's square hit-box in pixels.
    #[must_use]
    pub const fn player_size(&self) -> f32 {
        self.player_size
    }

    /// Base player speed in pixels per tick.
    #[must_use]
    pub const fn player_speed(&self) -> f32 {
        self.player_speed
    }

    /// Seed feeding the session's deterministic random streams.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the configuration with a different seed.
    #[must_use]
    pub fn with_seed(self, seed: u64) -> Self {
        Self { seed, ..self }
    }

    /// Returns the configuration with different grid dimensions.
    #[must_use]
    pub fn with_size(self, size: GridSize) -> Self {
        Self { size, ..self }
    }

    /// Returns the configuration with a different cell size.
    #[must_use]
    pub fn with_cell_size(self, cell_size: f32) -> Self {
        Self { cell_size, ..self }
    }

    /// Checks the configuration against the engine's invariants.
    ///
    /// The speed bound exists because the collision clamp only guards one
    /// wall-thickness band per tick; a faster player could cross a solid
    /// wall between two clamp checks.
    pub fn validate(&self) -> Result<(), SessionConfigError> {
        if self.size.columns() == 0 || self.size.rows() == 0 {
            return Err(SessionConfigError::InvalidDimensions {
                columns: self.size.columns(),
                rows: self.size.rows(),
            });
        }

        if self.cell_size <= 0.0 {
            return Err(SessionConfigError::NonPositiveCellSize {
                cell_size: self.cell_size,
            });
        }

        if self.player_size <= 0.0 {
            return Err(SessionConfigError::NonPositivePlayerSize {
                player_size: self.player_size,
            });
        }

        if self.player_speed <= 0.0 {
            return Err(SessionConfigError::NonPositivePlayerSpeed {
                player_speed: self.player_speed,
            });
        }

        if self.player_speed > self.wall_thickness {
            return Err(SessionConfigError::SpeedExceedsWallThickness {
                player_speed: self.player_speed,
                wall_thickness: self.wall_thickness,
            });
        }

        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Difficulty::Medium.session_config(0)
    }
}

/// Reasons a maze could not be generated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum GenerationError {
    /// One or both grid dimensions were zero.
    #[error("maze dimensions {columns}x{rows} must both be at least one cell")]
    InvalidDimensions {
        /// Requested number of columns.
        columns: u32,
        /// Requested number of rows.
        rows: u32,
    },
}

/// Reasons a session configuration was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum SessionConfigError {
    /// One or both grid dimensions were zero.
    #[error("session dimensions {columns}x{rows} must both be at least one cell")]
    InvalidDimensions {
        /// Requested number of columns.
        columns: u32,
        /// Requested number of rows.
        rows: u32,
    },
    /// The cell size was zero or negative.
    #[error("cell size {cell_size} must be positive")]
    NonPositiveCellSize {
        /// Rejected cell size in pixels.
        cell_size: f32,
    },
    /// The player hit-box size was zero or negative.
    #[error("player size {player_size} must be positive")]
    NonPositivePlayerSize {
        /// Rejected player size in pixels.
        player_size: f32,
    },
    /// The player speed was zero or negative.
    #[error("player speed {player_speed} must be positive")]
    NonPositivePlayerSpeed {
        /// Rejected speed in pixels per tick.
        player_speed: f32,
    },
    /// The player speed exceeded the wall collision band.
    #[error(
        "player speed {player_speed} exceeds wall thickness {wall_thickness}; \
         the clamp cannot prevent tunnelling"
    )]
    SpeedExceedsWallThickness {
        /// Configured speed in pixels per tick.
        player_speed: f32,
        /// Configured wall thickness in pixels.
        wall_thickness: f32,
    },
}

/// Immutable representation of the player's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Continuous position of the player's top-left corner.
    pub position: PixelPosition,
    /// Cell the position maps into, when it lies within the grid.
    pub cell: Option<CellCoord>,
    /// Intent flags as they survived the last clamp.
    pub intents: IntentSet,
    /// Velocity applied during the last integration step.
    pub velocity: Velocity,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Grid cell currently occupied by the enemy.
    pub cell: CellCoord,
    /// Behavioural kind of the enemy.
    pub kind: EnemyKind,
    /// Direction the enemy last travelled toward.
    pub heading: Direction,
    /// Indicates whether the enemy accrued enough ticks to step.
    pub ready_for_step: bool,
}

/// Read-only snapshot describing all enemies within the maze.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a placed power-up used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PowerUpSnapshot {
    /// Unique identifier assigned to the power-up.
    pub id: PowerUpId,
    /// Grid cell the power-up occupies.
    pub cell: CellCoord,
    /// Effect granted on collection.
    pub kind: PowerUpKind,
}

/// Read-only snapshot describing all uncollected power-ups.
#[derive(Clone, Debug, Default)]
pub struct PowerUpView {
    snapshots: Vec<PowerUpSnapshot>,
}

impl PowerUpView {
    /// Creates a new power-up view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<PowerUpSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &PowerUpSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<PowerUpSnapshot> {
        self.snapshots
    }
}
