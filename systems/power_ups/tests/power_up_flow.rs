//! Integration coverage for power-up proposals pumped through a live world.

use maze_escape_core::{Command, Difficulty, Event};
use maze_escape_system_power_ups::{Config, PowerUps};
use maze_escape_world::{self as world, query, World};

#[test]
fn proposals_survive_world_validation() {
    let mut world = World::new();
    let mut system = PowerUps::new(Config::for_difficulty(Difficulty::Hard, 0xdab));

    let mut configure_events = Vec::new();
    world::apply(
        &mut world,
        Command::ConfigureSession {
            config: Difficulty::Hard.session_config(13),
        },
        &mut configure_events,
    );

    let mut proposals = Vec::new();
    system.handle(&configure_events, query::maze(&world), &mut proposals);
    assert_eq!(proposals.len(), 7);

    let mut spawned = 0;
    for command in proposals {
        let mut events = Vec::new();
        world::apply(&mut world, command, &mut events);
        spawned += events
            .iter()
            .filter(|event| matches!(event, Event::PowerUpSpawned { .. }))
            .count();
    }

    assert_eq!(spawned, 7, "every proposed placement must pass validation");
    assert_eq!(query::power_ups(&world).iter().count(), 7);
}

#[test]
fn placements_stay_stable_across_replays() {
    let run = || {
        let mut world = World::new();
        let mut system = PowerUps::new(Config::for_difficulty(Difficulty::Medium, 0xcafe));

        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::ConfigureSession {
                config: Difficulty::Medium.session_config(77),
            },
            &mut events,
        );

        let mut proposals = Vec::new();
        system.handle(&events, query::maze(&world), &mut proposals);
        proposals
    };

    assert_eq!(run(), run(), "placements diverged between replays");
}
