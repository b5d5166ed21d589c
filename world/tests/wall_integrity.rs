use maze_escape_core::{Command, Difficulty, Direction};
use maze_escape_world::{self as world, query, World};

/// Blind scripted walk across the hard preset: every cell transition must
/// cross an open wall, and the player must stay inside the grid. The script
/// never pushes North, so the open entry border cannot let it drift out of
/// the top row; reaching the exit freezes the session before its South
/// border could.
#[test]
fn scripted_walk_never_crosses_a_solid_wall() {
    let script = [
        (Direction::East, 40),
        (Direction::South, 40),
        (Direction::East, 30),
        (Direction::South, 30),
        (Direction::West, 20),
        (Direction::South, 40),
        (Direction::East, 60),
        (Direction::West, 25),
        (Direction::South, 80),
        (Direction::East, 40),
    ];

    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ConfigureSession {
            config: Difficulty::Hard.session_config(9),
        },
        &mut events,
    );

    let mut previous_cell = query::player(&world).cell;
    let mut transitions = 0;

    for (direction, ticks) in script {
        world::apply(&mut world, Command::Press { direction }, &mut events);

        for _ in 0..ticks {
            world::apply(&mut world, Command::Tick, &mut events);
            let player = query::player(&world);

            assert!(
                player.cell.is_some(),
                "player left the grid at {:?}",
                player.position
            );

            if let (Some(from), Some(to)) = (previous_cell, player.cell) {
                if from != to {
                    transitions += 1;
                    assert_eq!(
                        from.manhattan_distance(to),
                        1,
                        "player skipped from {from:?} to {to:?} in one tick"
                    );
                    let open = query::maze(&world)
                        .grid()
                        .open_passages(from)
                        .any(|(_, neighbor)| neighbor == to);
                    assert!(open, "player crossed a solid wall from {from:?} to {to:?}");
                }
            }

            previous_cell = player.cell;
        }

        world::apply(&mut world, Command::Release { direction }, &mut events);
    }

    assert!(transitions > 0, "the scripted walk never changed cells");
}
