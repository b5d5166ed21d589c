#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomized depth-first maze carving and breadth-first solving.

use std::collections::VecDeque;

use maze_escape_core::{CellCoord, Direction, GenerationError, GridSize, Maze, MazeGrid};
use rand::Rng;
use sha2::{Digest, Sha256};

/// Carves a perfect maze of the requested size.
///
/// The walk starts at the top-left cell and runs a randomized depth-first
/// search with an explicit backtracking stack: unvisited cardinal neighbours
/// are probed in fixed order, one is chosen uniformly through the injected
/// RNG, the shared wall pair is carved, and dead ends pop the stack until
/// every cell has been reached. Afterwards the entry's outward North border
/// and the exit's outward South border are opened.
///
/// Returns [`GenerationError::InvalidDimensions`] before any allocation when
/// either dimension is zero. The same seed and size always reproduce the
/// identical maze.
pub fn generate<R: Rng>(size: GridSize, rng: &mut R) -> Result<Maze, GenerationError> {
    if size.columns() == 0 || size.rows() == 0 {
        return Err(GenerationError::InvalidDimensions {
            columns: size.columns(),
            rows: size.rows(),
        });
    }

    let mut grid = MazeGrid::new(size);
    let mut visited = vec![false; size.cell_count()];
    let mut stack = Vec::new();
    let mut current = CellCoord::new(0, 0);
    let mut carved_count = 1_usize;

    while carved_count != size.cell_count() {
        mark_visited(&mut visited, size, current);

        if let Some(next) = unvisited_neighbor(&grid, &visited, current, rng) {
            mark_visited(&mut visited, size, next);
            carved_count += 1;
            stack.push(current);
            let carved = grid.carve_between(current, next);
            debug_assert!(carved, "chosen cells are always cardinal neighbours");
            current = next;
        } else if let Some(previous) = stack.pop() {
            current = previous;
        } else {
            debug_assert!(
                false,
                "backtracking stack drained before the grid was fully carved"
            );
            break;
        }
    }

    let entry = CellCoord::new(0, 0);
    let exit = CellCoord::new(size.columns() - 1, size.rows() - 1);
    let entry_opened = grid.open_border(entry, Direction::North);
    let exit_opened = grid.open_border(exit, Direction::South);
    debug_assert!(
        entry_opened && exit_opened,
        "entry and exit borders always face outward"
    );

    Ok(Maze::new(grid, entry, exit))
}

/// Dense grid of step distances seeded from the maze exit.
///
/// Distances default to `u16::MAX` for unreachable cells so callers can
/// distinguish disconnected regions from traversable ones. In a freshly
/// generated maze every cell is reachable.
#[derive(Clone, Debug)]
pub struct DistanceField {
    size: GridSize,
    distances: Vec<u16>,
}

impl DistanceField {
    /// Dimensions of the field in cells.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Distance recorded for the provided cell, if it lies within the field.
    #[must_use]
    pub fn distance(&self, cell: CellCoord) -> Option<u16> {
        flat_index(self.size, cell).and_then(|index| self.distances.get(index).copied())
    }
}

/// Builds the exit distance field with a breadth-first search that only
/// crosses open walls.
#[must_use]
pub fn exit_distances(maze: &Maze) -> DistanceField {
    let size = maze.grid().size();
    let mut distances = vec![u16::MAX; size.cell_count()];
    let mut queue = VecDeque::new();

    if let Some(index) = flat_index(size, maze.exit()) {
        distances[index] = 0;
        queue.push_back(maze.exit());
    }

    while let Some(cell) = queue.pop_front() {
        let Some(cell_index) = flat_index(size, cell) else {
            continue;
        };
        let current = distances[cell_index];

        if current >= u16::MAX.saturating_sub(1) {
            continue;
        }

        let next = current + 1;

        for (_, neighbor) in maze.grid().open_passages(cell) {
            let Some(neighbor_index) = flat_index(size, neighbor) else {
                continue;
            };

            if distances[neighbor_index] <= next {
                continue;
            }

            distances[neighbor_index] = next;
            queue.push_back(neighbor);
        }
    }

    DistanceField { size, distances }
}

/// Walks the distance gradient from the provided cell down to the exit.
///
/// The distances must have been built from the same maze. Returns an empty
/// path when the starting cell is out of bounds or unreachable; otherwise the
/// path starts at `from` and ends at the exit.
#[must_use]
pub fn shortest_path(maze: &Maze, distances: &DistanceField, from: CellCoord) -> Vec<CellCoord> {
    let Some(mut remaining) = distances.distance(from) else {
        return Vec::new();
    };

    if remaining == u16::MAX {
        return Vec::new();
    }

    let mut path = vec![from];
    let mut current = from;

    while remaining > 0 {
        let closer = maze
            .grid()
            .open_passages(current)
            .filter_map(|(_, neighbor)| {
                let distance = distances.distance(neighbor)?;
                (distance < remaining).then_some((neighbor, distance))
            })
            .min_by_key(|(_, distance)| *distance);

        let Some((next, next_distance)) = closer else {
            break;
        };

        path.push(next);
        current = next;
        remaining = next_distance;
    }

    path
}

/// Derives the seed for one session from the global seed and a session index.
///
/// Restarting under a fixed global seed walks the session index forward, so
/// every restart carves a fresh maze while the whole run stays reproducible.
#[must_use]
pub fn derive_session_seed(global_seed: u64, session_index: u32) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(global_seed.to_le_bytes());
    hasher.update(session_index.to_le_bytes());
    finalize_seed(hasher)
}

/// Derives a labeled stream seed from a session seed.
///
/// Each subsystem draws from its own stream (the `RNG_STREAM_*` labels in
/// the core crate) so that consuming randomness in one subsystem never
/// perturbs another.
#[must_use]
pub fn derive_stream_seed(session_seed: u64, label: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(session_seed.to_le_bytes());
    hasher.update(label.as_bytes());
    finalize_seed(hasher)
}

fn finalize_seed(hasher: Sha256) -> u64 {
    let digest = hasher.finalize();
    let bytes: [u8; 8] = digest[0..8].try_into().expect("sha256 digest slice length");
    u64::from_le_bytes(bytes)
}

fn unvisited_neighbor<R: Rng>(
    grid: &MazeGrid,
    visited: &[bool],
    cell: CellCoord,
    rng: &mut R,
) -> Option<CellCoord> {
    let mut candidates = [None; 4];
    let mut count = 0;

    for direction in Direction::ALL {
        let Some(neighbor) = grid.neighbor(cell, direction) else {
            continue;
        };

        if is_visited(visited, grid.size(), neighbor) {
            continue;
        }

        candidates[count] = Some(neighbor);
        count += 1;
    }

    if count == 0 {
        return None;
    }

    candidates[rng.gen_range(0..count)]
}

fn mark_visited(visited: &mut [bool], size: GridSize, cell: CellCoord) {
    if let Some(index) = flat_index(size, cell) {
        visited[index] = true;
    }
}

fn is_visited(visited: &[bool], size: GridSize, cell: CellCoord) -> bool {
    flat_index(size, cell)
        .and_then(|index| visited.get(index).copied())
        .unwrap_or(true)
}

fn flat_index(size: GridSize, cell: CellCoord) -> Option<usize> {
    if !size.contains(cell) {
        return None;
    }

    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    let width = usize::try_from(size.columns()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn carve(columns: u32, rows: u32, seed: u64) -> Maze {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        generate(GridSize::new(columns, rows), &mut rng).expect("valid dimensions")
    }

    fn border_openings(maze: &Maze) -> Vec<(CellCoord, Direction)> {
        let grid = maze.grid();
        let mut openings = Vec::new();
        for cell in grid.cell_coords() {
            let walls = grid.walls_at(cell).expect("iterated cells are in bounds");
            for direction in Direction::ALL {
                if !walls.is_solid(direction) && grid.neighbor(cell, direction).is_none() {
                    openings.push((cell, direction));
                }
            }
        }
        openings
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        assert_eq!(
            generate(GridSize::new(0, 5), &mut rng),
            Err(GenerationError::InvalidDimensions {
                columns: 0,
                rows: 5
            })
        );
        assert_eq!(
            generate(GridSize::new(5, 0), &mut rng),
            Err(GenerationError::InvalidDimensions {
                columns: 5,
                rows: 0
            })
        );
    }

    #[test]
    fn three_by_three_maze_carves_eight_wall_pairs() {
        let maze = carve(3, 3, 0x5eed);
        assert_eq!(maze.grid().open_wall_pairs(), 8);
    }

    #[test]
    fn carved_maze_opens_exactly_one_wall_pair_per_extra_cell() {
        let maze = carve(20, 15, 42);
        assert_eq!(maze.grid().open_wall_pairs(), 20 * 15 - 1);
    }

    #[test]
    fn every_cell_is_reachable_from_the_exit() {
        let maze = carve(12, 9, 7);
        let distances = exit_distances(&maze);

        for cell in maze.grid().cell_coords() {
            let distance = distances.distance(cell).expect("cell in bounds");
            assert_ne!(distance, u16::MAX, "cell {cell:?} is unreachable");
        }
    }

    #[test]
    fn interior_walls_stay_symmetric() {
        let maze = carve(8, 8, 99);
        let grid = maze.grid();

        for cell in grid.cell_coords() {
            let walls = grid.walls_at(cell).expect("cell in bounds");
            for direction in Direction::ALL {
                let Some(neighbor) = grid.neighbor(cell, direction) else {
                    continue;
                };
                let neighbor_walls = grid.walls_at(neighbor).expect("neighbour in bounds");
                assert_eq!(
                    walls.is_solid(direction),
                    neighbor_walls.is_solid(direction.opposite()),
                    "asymmetric wall between {cell:?} and {neighbor:?}"
                );
            }
        }
    }

    #[test]
    fn entry_and_exit_are_the_only_border_openings() {
        let maze = carve(10, 6, 1234);
        let openings = border_openings(&maze);

        assert_eq!(
            openings,
            vec![
                (maze.entry(), Direction::North),
                (maze.exit(), Direction::South),
            ]
        );
        assert_eq!(maze.entry(), CellCoord::new(0, 0));
        assert_eq!(maze.exit(), CellCoord::new(9, 5));
    }

    #[test]
    fn identical_seeds_reproduce_identical_mazes() {
        let first = carve(16, 12, 0xdead_beef);
        let second = carve(16, 12, 0xdead_beef);
        assert_eq!(first, second);
    }

    #[test]
    fn single_cell_maze_has_no_interior_openings() {
        let maze = carve(1, 1, 3);
        let walls = maze
            .grid()
            .walls_at(CellCoord::new(0, 0))
            .expect("the only cell");

        assert_eq!(maze.grid().open_wall_pairs(), 0);
        assert_eq!(maze.entry(), maze.exit());
        assert!(!walls.is_solid(Direction::North));
        assert!(!walls.is_solid(Direction::South));
        assert!(walls.is_solid(Direction::East));
        assert!(walls.is_solid(Direction::West));
    }

    #[test]
    fn shortest_path_descends_to_the_exit() {
        let maze = carve(9, 7, 0xabc);
        let distances = exit_distances(&maze);
        let path = shortest_path(&maze, &distances, maze.entry());

        assert_eq!(path.first().copied(), Some(maze.entry()));
        assert_eq!(path.last().copied(), Some(maze.exit()));

        for pair in path.windows(2) {
            assert_eq!(pair[0].manhattan_distance(pair[1]), 1);
            let walls = maze.grid().walls_at(pair[0]).expect("path cell in bounds");
            let open_toward_next = maze
                .grid()
                .open_passages(pair[0])
                .any(|(_, neighbor)| neighbor == pair[1]);
            assert!(
                open_toward_next,
                "path crosses a solid wall between {:?} and {:?} ({walls:?})",
                pair[0], pair[1]
            );
        }

        let entry_distance = distances.distance(maze.entry()).expect("entry in bounds");
        assert_eq!(path.len(), usize::from(entry_distance) + 1);
    }

    #[test]
    fn shortest_path_from_the_exit_is_the_exit_itself() {
        let maze = carve(1, 1, 0);
        let distances = exit_distances(&maze);
        let path = shortest_path(&maze, &distances, maze.exit());
        assert_eq!(path, vec![maze.exit()]);
    }

    #[test]
    fn out_of_bounds_start_yields_an_empty_path() {
        let maze = carve(4, 4, 11);
        let distances = exit_distances(&maze);
        assert!(shortest_path(&maze, &distances, CellCoord::new(9, 9)).is_empty());
    }

    #[test]
    fn empty_mazes_yield_an_empty_distance_field() {
        // Unconfigured worlds hold a 0x0 maze until the first session begins.
        let maze = Maze::new(
            MazeGrid::new(GridSize::new(0, 0)),
            CellCoord::new(0, 0),
            CellCoord::new(0, 0),
        );
        let distances = exit_distances(&maze);

        assert_eq!(distances.size(), GridSize::new(0, 0));
        assert_eq!(distances.distance(CellCoord::new(0, 0)), None);
        assert!(shortest_path(&maze, &distances, CellCoord::new(0, 0)).is_empty());
    }

    #[test]
    fn session_seeds_differ_per_session_index() {
        let first = derive_session_seed(42, 0);
        let second = derive_session_seed(42, 1);

        assert_ne!(first, second);
        assert_eq!(first, derive_session_seed(42, 0));
    }

    #[test]
    fn stream_seeds_differ_per_label() {
        let session = derive_session_seed(7, 0);
        let generation = derive_stream_seed(session, "stream-a");
        let enemies = derive_stream_seed(session, "stream-b");

        assert_ne!(generation, enemies);
        assert_eq!(generation, derive_stream_seed(session, "stream-a"));
    }
}
