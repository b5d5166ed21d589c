#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure collision clamping and velocity resolution for the player.

use maze_escape_core::{
    CellCoord, Direction, GridSize, IntentSet, Maze, PixelPosition, Velocity, Walls,
};

/// Pixel metrics consumed by the movement resolver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Metrics {
    cell_size: f32,
    wall_thickness: f32,
    player_size: f32,
    speed: f32,
}

impl Metrics {
    /// Creates the metric bundle for one tick of resolution.
    ///
    /// `speed` is the effective speed after any active boost.
    #[must_use]
    pub const fn new(cell_size: f32, wall_thickness: f32, player_size: f32, speed: f32) -> Self {
        Self {
            cell_size,
            wall_thickness,
            player_size,
            speed,
        }
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

    /// Effective player speed in pixels per tick.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }
}

/// Result of clamping held intents against the occupying cell's walls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClampOutcome {
    intents: IntentSet,
    blocked: [Option<Direction>; 4],
}

impl ClampOutcome {
    /// Intent flags that survived the clamp.
    #[must_use]
    pub const fn intents(&self) -> IntentSet {
        self.intents
    }

    /// Directions whose intents were cleared this tick, in probe order.
    pub fn blocked(&self) -> impl Iterator<Item = Direction> + '_ {
        self.blocked.iter().flatten().copied()
    }
}

/// Complete per-tick movement resolution for the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickResolution {
    intents: IntentSet,
    velocity: Velocity,
    position: PixelPosition,
    cell: Option<CellCoord>,
    blocked: [Option<Direction>; 4],
    clamp_skipped: bool,
}

impl TickResolution {
    /// Intent flags after the clamp, to be written back to the player.
    #[must_use]
    pub const fn intents(&self) -> IntentSet {
        self.intents
    }

    /// Velocity that was integrated this tick.
    #[must_use]
    pub const fn velocity(&self) -> Velocity {
        self.velocity
    }

    /// Player position after integration.
    #[must_use]
    pub const fn position(&self) -> PixelPosition {
        self.position
    }

    /// Cell containing the post-integration position, if any.
    #[must_use]
    pub const fn cell(&self) -> Option<CellCoord> {
        self.cell
    }

    /// Directions whose intents were cleared this tick, in probe order.
    pub fn blocked(&self) -> impl Iterator<Item = Direction> + '_ {
        self.blocked.iter().flatten().copied()
    }

    /// Reports whether the clamp was skipped because the pre-move position
    /// mapped to no cell.
    #[must_use]
    pub const fn clamp_skipped(&self) -> bool {
        self.clamp_skipped
    }
}

/// Maps a pixel position to the cell containing it.
///
/// Positions left of or above the grid map to `None`, as do positions at or
/// beyond the far edges. The lookup is a plain integer divide by the cell
/// size, mirroring how the player's hit-box anchors to its top-left corner.
#[must_use]
pub fn occupying_cell(
    position: PixelPosition,
    cell_size: f32,
    size: GridSize,
) -> Option<CellCoord> {
    if cell_size <= 0.0 {
        return None;
    }

    if position.x() < 0.0 || position.y() < 0.0 {
        return None;
    }

    let column = (position.x() / cell_size) as u32;
    let row = (position.y() / cell_size) as u32;
    let cell = CellCoord::new(column, row);

    size.contains(cell).then_some(cell)
}

/// Clears held intents that press into a solid wall of the occupying cell.
///
/// An intent is suppressed when its wall is solid and the player sits within
/// one wall thickness of that boundary: the near edges compare against the
/// cell origin plus the band, the far edges against the cell extent minus
/// the player size and the band. Cleared flags stay cleared until the player
/// releases and presses the direction again.
#[must_use]
pub fn clamp_intents(
    intents: IntentSet,
    position: PixelPosition,
    walls: Walls,
    cell: CellCoord,
    metrics: Metrics,
) -> ClampOutcome {
    let origin_x = cell.column() as f32 * metrics.cell_size();
    let origin_y = cell.row() as f32 * metrics.cell_size();
    let near_band = metrics.wall_thickness();
    let far_band = metrics.cell_size() - (metrics.player_size() + metrics.wall_thickness());

    let mut surviving = intents;
    let mut blocked = [None; 4];
    let mut blocked_count = 0;

    for direction in Direction::ALL {
        if !intents.is_held(direction) || !walls.is_solid(direction) {
            continue;
        }

        let pressed_into_band = match direction {
            Direction::North => position.y() <= origin_y + near_band,
            Direction::East => position.x() >= origin_x + far_band,
            Direction::South => position.y() >= origin_y + far_band,
            Direction::West => position.x() <= origin_x + near_band,
        };

        if pressed_into_band {
            surviving.release(direction);
            blocked[blocked_count] = Some(direction);
            blocked_count += 1;
        }
    }

    ClampOutcome {
        intents: surviving,
        blocked,
    }
}

/// Derives the per-tick velocity from the surviving intents.
///
/// Each axis moves at the provided speed only when exactly one of its two
/// directions is held; opposing intents cancel to zero.
#[must_use]
pub fn velocity(intents: IntentSet, speed: f32) -> Velocity {
    let mut dx = 0.0;
    let mut dy = 0.0;

    if intents.is_held(Direction::West) && !intents.is_held(Direction::East) {
        dx = -speed;
    }
    if intents.is_held(Direction::East) && !intents.is_held(Direction::West) {
        dx = speed;
    }
    if intents.is_held(Direction::North) && !intents.is_held(Direction::South) {
        dy = -speed;
    }
    if intents.is_held(Direction::South) && !intents.is_held(Direction::North) {
        dy = speed;
    }

    Velocity::new(dx, dy)
}

/// Runs the full per-tick pipeline: clamp, derive velocity, integrate.
///
/// When the pre-move position maps to no cell the clamp is skipped for the
/// tick and movement proceeds unchecked; the resolution records the miss so
/// callers can observe it.
#[must_use]
pub fn resolve_tick(
    intents: IntentSet,
    position: PixelPosition,
    maze: &Maze,
    metrics: Metrics,
) -> TickResolution {
    let size = maze.grid().size();
    let clamp_input = occupying_cell(position, metrics.cell_size(), size)
        .and_then(|cell| maze.grid().walls_at(cell).map(|walls| (cell, walls)));

    let (surviving, blocked) = match clamp_input {
        Some((cell, walls)) => {
            let outcome = clamp_intents(intents, position, walls, cell, metrics);
            (outcome.intents, outcome.blocked)
        }
        None => (intents, [None; 4]),
    };

    let applied = velocity(surviving, metrics.speed());
    let position = position.translated(applied.dx(), applied.dy());
    let cell = occupying_cell(position, metrics.cell_size(), size);

    TickResolution {
        intents: surviving,
        velocity: applied,
        position,
        cell,
        blocked,
        clamp_skipped: clamp_input.is_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_escape_core::MazeGrid;

    fn metrics() -> Metrics {
        Metrics::new(30.0, 4.0, 10.0, 4.0)
    }

    fn sealed_maze(columns: u32, rows: u32) -> Maze {
        let size = GridSize::new(columns, rows);
        let exit = CellCoord::new(columns - 1, rows - 1);
        Maze::new(MazeGrid::new(size), CellCoord::new(0, 0), exit)
    }

    fn holding(directions: &[Direction]) -> IntentSet {
        let mut intents = IntentSet::none();
        for direction in directions {
            intents.hold(*direction);
        }
        intents
    }

    #[test]
    fn occupying_cell_divides_by_cell_size() {
        let size = GridSize::new(3, 2);

        assert_eq!(
            occupying_cell(PixelPosition::new(0.0, 0.0), 30.0, size),
            Some(CellCoord::new(0, 0))
        );
        assert_eq!(
            occupying_cell(PixelPosition::new(29.9, 30.0), 30.0, size),
            Some(CellCoord::new(0, 1))
        );
        assert_eq!(
            occupying_cell(PixelPosition::new(65.0, 10.0), 30.0, size),
            Some(CellCoord::new(2, 0))
        );
    }

    #[test]
    fn occupying_cell_rejects_positions_outside_the_grid() {
        let size = GridSize::new(3, 2);

        assert_eq!(occupying_cell(PixelPosition::new(-0.1, 5.0), 30.0, size), None);
        assert_eq!(occupying_cell(PixelPosition::new(5.0, -3.0), 30.0, size), None);
        assert_eq!(occupying_cell(PixelPosition::new(90.0, 5.0), 30.0, size), None);
        assert_eq!(occupying_cell(PixelPosition::new(5.0, 60.0), 30.0, size), None);
    }

    #[test]
    fn opposing_intents_cancel_to_zero_velocity() {
        let both = holding(&[Direction::West, Direction::East]);
        assert_eq!(velocity(both, 4.0), Velocity::ZERO);

        let vertical = holding(&[Direction::North, Direction::South]);
        assert_eq!(velocity(vertical, 4.0), Velocity::ZERO);
    }

    #[test]
    fn single_intent_moves_at_full_speed() {
        assert_eq!(
            velocity(holding(&[Direction::East]), 4.0),
            Velocity::new(4.0, 0.0)
        );
        assert_eq!(
            velocity(holding(&[Direction::North]), 4.0),
            Velocity::new(0.0, -4.0)
        );
        assert_eq!(
            velocity(holding(&[Direction::South, Direction::East]), 2.0),
            Velocity::new(2.0, 2.0)
        );
    }

    #[test]
    fn clamp_clears_intents_pressed_into_near_walls() {
        let walls = Walls::sealed();
        let cell = CellCoord::new(0, 0);
        let intents = holding(&[Direction::West, Direction::North]);

        let outcome = clamp_intents(
            intents,
            PixelPosition::new(4.0, 3.0),
            walls,
            cell,
            metrics(),
        );

        assert!(!outcome.intents().is_held(Direction::West));
        assert!(!outcome.intents().is_held(Direction::North));
        assert_eq!(
            outcome.blocked().collect::<Vec<_>>(),
            vec![Direction::North, Direction::West]
        );
    }

    #[test]
    fn clamp_clears_intents_pressed_into_far_walls() {
        let walls = Walls::sealed();
        let cell = CellCoord::new(1, 1);
        let intents = holding(&[Direction::East, Direction::South]);

        // Far band sits at origin + 30 - (10 + 4) = origin + 16.
        let outcome = clamp_intents(
            intents,
            PixelPosition::new(46.0, 47.5),
            walls,
            cell,
            metrics(),
        );

        assert!(!outcome.intents().is_held(Direction::East));
        assert!(!outcome.intents().is_held(Direction::South));
    }

    #[test]
    fn clamp_ignores_open_walls() {
        let mut walls = Walls::sealed();
        walls.open(Direction::East);
        let cell = CellCoord::new(0, 0);

        let outcome = clamp_intents(
            holding(&[Direction::East]),
            PixelPosition::new(16.0, 10.0),
            walls,
            cell,
            metrics(),
        );

        assert!(outcome.intents().is_held(Direction::East));
        assert_eq!(outcome.blocked().count(), 0);
    }

    #[test]
    fn clamp_ignores_walls_outside_the_band() {
        let walls = Walls::sealed();
        let cell = CellCoord::new(0, 0);

        let outcome = clamp_intents(
            holding(&[Direction::East]),
            PixelPosition::new(12.0, 10.0),
            walls,
            cell,
            metrics(),
        );

        assert!(outcome.intents().is_held(Direction::East));
    }

    #[test]
    fn resolve_tick_integrates_the_surviving_velocity() {
        let maze = sealed_maze(1, 1);
        let resolution = resolve_tick(
            holding(&[Direction::East]),
            PixelPosition::new(10.0, 10.0),
            &maze,
            metrics(),
        );

        assert_eq!(resolution.velocity(), Velocity::new(4.0, 0.0));
        assert_eq!(resolution.position(), PixelPosition::new(14.0, 10.0));
        assert_eq!(resolution.cell(), Some(CellCoord::new(0, 0)));
        assert!(!resolution.clamp_skipped());
    }

    #[test]
    fn resolve_tick_stops_the_player_inside_the_cell() {
        let maze = sealed_maze(1, 1);
        let mut position = PixelPosition::new(10.0, 10.0);

        for _ in 0..10 {
            // Re-press each tick to model a key held against the wall.
            let resolution = resolve_tick(
                holding(&[Direction::East]),
                position,
                &maze,
                metrics(),
            );
            position = resolution.position();
            // One overshoot step past the 16 px band edge is possible, but
            // the player's right edge never reaches the 30 px boundary.
            assert!(
                position.x() + 10.0 < 30.0,
                "player crossed the solid wall at {position:?}"
            );
        }

        // 10 -> 14 -> 18, then the clamp holds the player in place.
        assert_eq!(position.x(), 18.0);
    }

    #[test]
    fn resolve_tick_passes_through_open_walls() {
        let size = GridSize::new(2, 1);
        let mut grid = MazeGrid::new(size);
        assert!(grid.carve_between(CellCoord::new(0, 0), CellCoord::new(1, 0)));
        let maze = Maze::new(grid, CellCoord::new(0, 0), CellCoord::new(1, 0));

        let mut position = PixelPosition::new(12.0, 10.0);
        for _ in 0..5 {
            position = resolve_tick(holding(&[Direction::East]), position, &maze, metrics())
                .position();
        }

        assert_eq!(position.x(), 32.0);
        assert_eq!(
            occupying_cell(position, 30.0, size),
            Some(CellCoord::new(1, 0))
        );
    }

    #[test]
    fn resolve_tick_clears_the_blocked_intent_for_the_rest_of_the_hold() {
        let maze = sealed_maze(1, 1);
        let first = resolve_tick(
            holding(&[Direction::West]),
            PixelPosition::new(4.0, 10.0),
            &maze,
            metrics(),
        );

        assert_eq!(first.blocked().collect::<Vec<_>>(), vec![Direction::West]);
        assert_eq!(first.velocity(), Velocity::ZERO);
        assert_eq!(first.position(), PixelPosition::new(4.0, 10.0));

        // The cleared flag no longer produces motion on later ticks.
        let second = resolve_tick(first.intents(), first.position(), &maze, metrics());
        assert_eq!(second.velocity(), Velocity::ZERO);
        assert_eq!(second.blocked().count(), 0);
    }

    #[test]
    fn resolve_tick_skips_the_clamp_outside_the_grid() {
        let maze = sealed_maze(1, 1);
        let resolution = resolve_tick(
            holding(&[Direction::West]),
            PixelPosition::new(-10.0, -10.0),
            &maze,
            metrics(),
        );

        assert!(resolution.clamp_skipped());
        assert_eq!(resolution.velocity(), Velocity::new(-4.0, 0.0));
        assert_eq!(resolution.position(), PixelPosition::new(-14.0, -10.0));
        assert_eq!(resolution.cell(), None);
    }
}
