#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Maze Escape adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use maze_escape_core::{CellCoord, Direction, GamePhase, GridSize, IntentSet, Maze, Walls};
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Dead zone radius in pixels inside which mouse steering stays idle.
pub const MOUSE_STEER_DEAD_ZONE: f32 = 5.0;

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Directions held by the player during this frame.
    pub held: IntentSet,
    /// Cursor position expressed in maze-local pixels, when known.
    pub cursor_maze_space: Option<Vec2>,
    /// Whether mouse steering contributed to the held directions.
    pub mouse_steering: bool,
    /// Whether the adapter observed a pause toggle press this frame.
    pub pause_pressed: bool,
    /// Whether the adapter observed a restart press this frame.
    pub restart_pressed: bool,
    /// Whether the adapter observed a quit press this frame.
    pub quit_pressed: bool,
}

/// Translates the cursor offset from the player's centre into held directions.
///
/// The dominant axis wins; offsets within the dead zone produce no holds, so
/// the player rests once the cursor sits on top of them.
#[must_use]
pub fn steer_intents(player_center: Vec2, cursor: Vec2, dead_zone: f32) -> IntentSet {
    let offset = cursor - player_center;
    let mut intents = IntentSet::none();

    if offset.x.abs() >= offset.y.abs() {
        if offset.x.abs() > dead_zone {
            intents.hold(if offset.x > 0.0 {
                Direction::East
            } else {
                Direction::West
            });
        }
    } else if offset.y.abs() > dead_zone {
        intents.hold(if offset.y > 0.0 {
            Direction::South
        } else {
            Direction::North
        });
    }

    intents
}

/// Maze-local line segment tracing one solid wall edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallSegment {
    /// Segment start expressed in maze-local pixels.
    pub from: Vec2,
    /// Segment end expressed in maze-local pixels.
    pub to: Vec2,
}

impl WallSegment {
    /// Creates a new wall segment descriptor.
    #[must_use]
    pub const fn new(from: Vec2, to: Vec2) -> Self {
        Self { from, to }
    }
}

/// Validated drawing description of a carved maze.
///
/// Wall flags are stored row-major; border openings carved at the entry and
/// exit are already reflected in the flags, so the segment iterator leaves
/// gaps there without special casing.
#[derive(Clone, Debug, PartialEq)]
pub struct MazePresentation {
    /// Number of columns contained in the maze.
    pub columns: u32,
    /// Number of rows contained in the maze.
    pub rows: u32,
    /// Side length of a single cell expressed in maze-local pixels.
    pub cell_size: f32,
    /// Thickness used when stroking wall segments.
    pub wall_thickness: f32,
    /// Row-major wall flags for every cell.
    pub cells: Vec<Walls>,
    /// Cell whose North border is carved open.
    pub entry: CellCoord,
    /// Cell whose South border is carved open.
    pub exit: CellCoord,
    /// Color used when stroking wall segments.
    pub wall_color: Color,
}

impl MazePresentation {
    /// Creates a new maze descriptor.
    ///
    /// Returns an error when the metrics are degenerate, the wall flags do
    /// not cover the grid, or the entry/exit markers fall outside it.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        columns: u32,
        rows: u32,
        cell_size: f32,
        wall_thickness: f32,
        cells: Vec<Walls>,
        entry: CellCoord,
        exit: CellCoord,
        wall_color: Color,
    ) -> std::result::Result<Self, RenderingError> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(RenderingError::InvalidCellSize { cell_size });
        }
        if !wall_thickness.is_finite() || wall_thickness < 0.0 {
            return Err(RenderingError::InvalidWallThickness { wall_thickness });
        }

        let expected = columns as usize * rows as usize;
        if cells.len() != expected {
            return Err(RenderingError::CellCountMismatch {
                expected,
                actual: cells.len(),
            });
        }

        let size = GridSize::new(columns, rows);
        if !size.contains(entry) {
            return Err(RenderingError::CellOutOfBounds { cell: entry });
        }
        if !size.contains(exit) {
            return Err(RenderingError::CellOutOfBounds { cell: exit });
        }

        Ok(Self {
            columns,
            rows,
            cell_size,
            wall_thickness,
            cells,
            entry,
            exit,
            wall_color,
        })
    }

    /// Builds a descriptor mirroring the wall flags of a carved maze.
    pub fn from_maze(
        maze: &Maze,
        cell_size: f32,
        wall_thickness: f32,
        wall_color: Color,
    ) -> std::result::Result<Self, RenderingError> {
        let size = maze.grid().size();
        let cells = maze
            .grid()
            .cell_coords()
            .map(|cell| maze.grid().walls_at(cell).unwrap_or(Walls::sealed()))
            .collect();

        Self::new(
            size.columns(),
            size.rows(),
            cell_size,
            wall_thickness,
            cells,
            maze.entry(),
            maze.exit(),
            wall_color,
        )
    }

    /// Total width of the maze expressed in maze-local pixels.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.cell_size
    }

    /// Total height of the maze expressed in maze-local pixels.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.cell_size
    }

    /// Top-left corner of the cell expressed in maze-local pixels.
    #[must_use]
    pub fn cell_origin(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(
            cell.column() as f32 * self.cell_size,
            cell.row() as f32 * self.cell_size,
        )
    }

    /// Centre of the cell expressed in maze-local pixels.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> Vec2 {
        self.cell_origin(cell) + Vec2::splat(self.cell_size * 0.5)
    }

    /// Wall flags for the cell, if it lies within the maze.
    #[must_use]
    pub fn walls_at(&self, cell: CellCoord) -> Option<Walls> {
        if !GridSize::new(self.columns, self.rows).contains(cell) {
            return None;
        }

        let index = (cell.row() * self.columns + cell.column()) as usize;
        self.cells.get(index).copied()
    }

    /// Maze-local line segments for every solid wall edge.
    ///
    /// Interior walls are emitted once, from the cell on their North/West
    /// side; East and South edges are emitted only along the maze boundary.
    pub fn wall_segments(&self) -> impl Iterator<Item = WallSegment> + '_ {
        let columns = self.columns;
        let rows = self.rows;
        let cell_size = self.cell_size;

        self.cells.iter().enumerate().flat_map(move |(index, walls)| {
            let column = index as u32 % columns;
            let row = index as u32 / columns;
            let x0 = column as f32 * cell_size;
            let y0 = row as f32 * cell_size;
            let x1 = x0 + cell_size;
            let y1 = y0 + cell_size;

            let north = walls
                .is_solid(Direction::North)
                .then(|| WallSegment::new(Vec2::new(x0, y0), Vec2::new(x1, y0)));
            let west = walls
                .is_solid(Direction::West)
                .then(|| WallSegment::new(Vec2::new(x0, y0), Vec2::new(x0, y1)));
            let east = (column + 1 == columns && walls.is_solid(Direction::East))
                .then(|| WallSegment::new(Vec2::new(x1, y0), Vec2::new(x1, y1)));
            let south = (row + 1 == rows && walls.is_solid(Direction::South))
                .then(|| WallSegment::new(Vec2::new(x0, y1), Vec2::new(x1, y1)));

            [north, west, east, south].into_iter().flatten()
        })
    }
}

/// Player drawn as a filled square at its maze-local pixel position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerPresentation {
    /// Top-left corner of the player square in maze-local pixels.
    pub position: Vec2,
    /// Side length of the player square in maze-local pixels.
    pub size: f32,
    /// Fill color of the player square.
    pub color: Color,
}

impl PlayerPresentation {
    /// Creates a new player descriptor.
    #[must_use]
    pub const fn new(position: Vec2, size: f32, color: Color) -> Self {
        Self {
            position,
            size,
            color,
        }
    }
}

/// Enemy drawn as a filled circle centred in its cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyPresentation {
    /// Cell occupied by the enemy.
    pub cell: CellCoord,
    /// Fill color of the enemy's body.
    pub color: Color,
}

impl EnemyPresentation {
    /// Creates a new enemy descriptor.
    #[must_use]
    pub const fn new(cell: CellCoord, color: Color) -> Self {
        Self { cell, color }
    }
}

/// Power-up drawn as a small outlined circle centred in its cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PowerUpPresentation {
    /// Cell occupied by the power-up.
    pub cell: CellCoord,
    /// Fill color of the power-up marker.
    pub color: Color,
}

impl PowerUpPresentation {
    /// Creates a new power-up descriptor.
    #[must_use]
    pub const fn new(cell: CellCoord, color: Color) -> Self {
        Self { cell, color }
    }
}

/// Path cells highlighted after the player collects a hint.
#[derive(Clone, Debug, PartialEq)]
pub struct HintPresentation {
    /// Cells along the revealed path, ordered from the player to the exit.
    pub cells: Vec<CellCoord>,
    /// Fill color of the path dots.
    pub color: Color,
}

impl HintPresentation {
    /// Creates a new hint descriptor.
    #[must_use]
    pub const fn new(cells: Vec<CellCoord>, color: Color) -> Self {
        Self { cells, color }
    }

    /// Determines whether the hint reveals any cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Scene description combining the maze and its inhabitants.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Maze that composes the play area.
    pub maze: MazePresentation,
    /// Player rendered inside the maze.
    pub player: PlayerPresentation,
    /// Enemies currently visible within the maze.
    pub enemies: Vec<EnemyPresentation>,
    /// Power-ups currently visible within the maze.
    pub power_ups: Vec<PowerUpPresentation>,
    /// Hint path revealed by a collected hint, empty otherwise.
    pub hint: HintPresentation,
    /// Lifecycle phase driving paused/won overlays.
    pub phase: GamePhase,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(
        maze: MazePresentation,
        player: PlayerPresentation,
        enemies: Vec<EnemyPresentation>,
        power_ups: Vec<PowerUpPresentation>,
        hint: HintPresentation,
        phase: GamePhase,
    ) -> Self {
        Self {
            maze,
            player,
            enemies,
            power_ups,
            hint,
            phase,
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Initial window size in physical pixels.
    pub window_size: Vec2,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, window_size: Vec2, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            window_size,
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Maze Escape scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame delta
    /// and per-frame input captured by the adapter, and may mutate the scene
    /// before it is rendered, allowing adapters to animate world snapshots
    /// deterministically.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Cell size must be positive to avoid a zero-sized maze.
    InvalidCellSize {
        /// Provided cell size that failed validation.
        cell_size: f32,
    },
    /// Wall thickness must not be negative.
    InvalidWallThickness {
        /// Provided wall thickness that failed validation.
        wall_thickness: f32,
    },
    /// Wall flags must cover every cell of the grid exactly once.
    CellCountMismatch {
        /// Number of cells implied by the grid dimensions.
        expected: usize,
        /// Number of wall flags actually provided.
        actual: usize,
    },
    /// Entry and exit markers must lie within the grid.
    CellOutOfBounds {
        /// Marker cell that fell outside the grid.
        cell: CellCoord,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCellSize { cell_size } => {
                write!(f, "cell_size must be positive (received {cell_size})")
            }
            Self::InvalidWallThickness { wall_thickness } => {
                write!(
                    f,
                    "wall_thickness must not be negative (received {wall_thickness})"
                )
            }
            Self::CellCountMismatch { expected, actual } => {
                write!(
                    f,
                    "wall flags must cover {expected} cells (received {actual})"
                )
            }
            Self::CellOutOfBounds { cell } => {
                write!(
                    f,
                    "marker cell ({}, {}) lies outside the grid",
                    cell.column(),
                    cell.row()
                )
            }
        }
    }
}

impl Error for RenderingError {}
