#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Maze Escape experience.

mod args;
mod config;
mod seed;
mod share_code;

use anyhow::{Context as _, Result};
use clap::Parser as _;
use glam::Vec2;
use maze_escape_core::{
    Command, Direction, EnemyKind, Event, GamePhase, IntentSet, PowerUpKind, SessionConfig,
};
use maze_escape_rendering::{
    Color, EnemyPresentation, HintPresentation, MazePresentation, PlayerPresentation,
    PowerUpPresentation, Presentation, RenderingBackend as _, Scene,
};
use maze_escape_rendering_macroquad::MacroquadBackend;
use maze_escape_system_enemies::{Config as EnemiesConfig, Enemies};
use maze_escape_system_power_ups::{Config as PowerUpsConfig, PowerUps};
use maze_escape_world::{self as world, query, World};

use crate::{
    args::Args,
    config::{FileOverrides, Settings},
    seed::CompanionSeeds,
    share_code::ShareCode,
};

/// Margin kept around the maze when sizing the window.
const WINDOW_MARGIN: f32 = 40.0;

/// Simulation cadence: one tick per frame at the display rate.
const TICKS_PER_SECOND: u64 = 60;

const CLEAR_COLOR: Color = Color::from_rgb_u8(18, 20, 28);
const WALL_COLOR: Color = Color::from_rgb_u8(198, 202, 212);
const PLAYER_COLOR: Color = Color::from_rgb_u8(82, 144, 244);
const HINT_COLOR: Color = Color::from_rgb_u8(240, 206, 120);

/// Entry point for the Maze Escape command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    let file = match args.config.as_deref() {
        Some(path) => FileOverrides::load(path)?,
        None => FileOverrides::default(),
    };
    let settings = Settings::resolve(&args, &file);

    let global_seed = seed::resolve_global_seed(settings.seed);
    let mut session_index: u32 = 0;

    let first_config = match args.share_code.as_deref() {
        Some(code) => {
            ShareCode::decode(code)
                .context("failed to decode share code")?
                .config
        }
        None => {
            let config = settings.session_config(seed::session_seed(global_seed, session_index));
            config
                .validate()
                .context("resolved session configuration is invalid")?;
            config
        }
    };

    let mut world = World::new();
    let (mut enemies, mut power_ups) = boot_session(&mut world, &settings, first_config);

    println!("{}", query::welcome_banner(&world));
    println!("Arrows or WASD move, P pauses, R restarts, Q quits.");
    announce_session(first_config);

    let metrics = query::metrics(&world);
    let maze = MazePresentation::from_maze(
        query::maze(&world),
        metrics.cell_size,
        metrics.wall_thickness,
        WALL_COLOR,
    )
    .context("failed to build the maze presentation")?;
    let window_size = Vec2::new(
        maze.width() + 2.0 * WINDOW_MARGIN,
        maze.height() + 2.0 * WINDOW_MARGIN,
    );

    let scene = Scene::new(
        maze,
        player_presentation(&world),
        enemy_presentations(&world),
        power_up_presentations(&world),
        hint_presentation(&world),
        query::phase(&world),
    );
    let presentation = Presentation::new("Maze Escape", window_size, CLEAR_COLOR, scene);

    let backend = MacroquadBackend::new().with_mouse_steering(settings.mouse_steering);
    let mut previous_held = IntentSet::default();

    backend.run(presentation, move |_frame_dt, input, scene| {
        let mut frame_events = Vec::new();

        if input.restart_pressed {
            session_index = session_index.saturating_add(1);
            let config = settings.session_config(seed::session_seed(global_seed, session_index));
            match config.validate() {
                Ok(()) => {
                    let (next_enemies, next_power_ups) =
                        boot_session(&mut world, &settings, config);
                    enemies = next_enemies;
                    power_ups = next_power_ups;
                    previous_held = IntentSet::default();
                    refresh_maze_presentation(scene, &world);
                    announce_session(config);
                }
                Err(error) => eprintln!("restart rejected: {error}"),
            }
        }

        if input.pause_pressed {
            let toggle = match query::phase(&world) {
                GamePhase::Playing => Some(Command::Pause),
                GamePhase::Paused => Some(Command::Resume),
                GamePhase::Won => None,
            };
            if let Some(command) = toggle {
                world::apply(&mut world, command, &mut frame_events);
            }
        }

        for direction in Direction::ALL {
            let held = input.held.is_held(direction);
            let was_held = previous_held.is_held(direction);
            if held && !was_held {
                world::apply(&mut world, Command::Press { direction }, &mut frame_events);
            } else if !held && was_held {
                world::apply(&mut world, Command::Release { direction }, &mut frame_events);
            }
        }
        previous_held = input.held;

        world::apply(&mut world, Command::Tick, &mut frame_events);

        let follow_up = pump_systems(
            &mut world,
            enemies.as_mut(),
            power_ups.as_mut(),
            &frame_events,
        );
        for event in frame_events.iter().chain(follow_up.iter()) {
            report_event(event, &world);
        }

        refresh_scene(scene, &world);
    })
}

/// Reconfigures the world for one session and primes its companion systems.
fn boot_session(
    world: &mut World,
    settings: &Settings,
    config: SessionConfig,
) -> (Option<Enemies>, Option<PowerUps>) {
    let mut events = Vec::new();
    world::apply(world, Command::ConfigureSession { config }, &mut events);

    let seeds = CompanionSeeds::for_session(config.seed());
    let mut enemies = settings
        .enemies
        .then(|| Enemies::new(EnemiesConfig::for_difficulty(settings.difficulty, seeds.enemies)));
    let mut power_ups = settings.power_ups.then(|| {
        PowerUps::new(PowerUpsConfig::for_difficulty(
            settings.difficulty,
            seeds.power_ups,
        ))
    });

    let _ = pump_systems(world, enemies.as_mut(), power_ups.as_mut(), &events);
    (enemies, power_ups)
}

/// Routes world events through the enabled systems and applies their proposals.
fn pump_systems(
    world: &mut World,
    enemies: Option<&mut Enemies>,
    power_ups: Option<&mut PowerUps>,
    events: &[Event],
) -> Vec<Event> {
    let mut proposals = Vec::new();
    if let Some(system) = enemies {
        system.handle(
            events,
            query::maze(world),
            &query::enemies(world),
            &mut proposals,
        );
    }
    if let Some(system) = power_ups {
        system.handle(events, query::maze(world), &mut proposals);
    }

    let mut emitted = Vec::new();
    for command in proposals {
        world::apply(world, command, &mut emitted);
    }
    emitted
}

fn announce_session(config: SessionConfig) {
    println!(
        "New {}x{} maze from seed {}.",
        config.size().columns(),
        config.size().rows(),
        config.seed()
    );
    println!("Share code: {}", ShareCode { config }.encode());
}

fn report_event(event: &Event, world: &World) {
    match event {
        Event::ExitReached => {
            let ticks = query::tick_index(world);
            let credit = query::active_effects(world).time_bonus_seconds;
            if credit == 0 {
                println!("Escaped the maze in {ticks} ticks! Press R for a fresh one.");
            } else {
                let elapsed = (ticks / TICKS_PER_SECOND).saturating_sub(credit);
                println!(
                    "Escaped the maze in {ticks} ticks ({elapsed}s after {credit}s of time \
                     credit)! Press R for a fresh one."
                );
            }
        }
        Event::PlayerCaught { enemy_id } => {
            println!(
                "Caught by enemy {}; back to the entry.",
                enemy_id.get()
            );
        }
        Event::PowerUpCollected { kind, .. } => {
            println!("Collected a {} power-up.", power_up_label(*kind));
        }
        _ => {}
    }
}

fn refresh_scene(scene: &mut Scene, world: &World) {
    scene.player = player_presentation(world);
    scene.enemies = enemy_presentations(world);
    scene.power_ups = power_up_presentations(world);
    scene.hint = hint_presentation(world);
    scene.phase = query::phase(world);
}

fn refresh_maze_presentation(scene: &mut Scene, world: &World) {
    let metrics = query::metrics(world);
    match MazePresentation::from_maze(
        query::maze(world),
        metrics.cell_size,
        metrics.wall_thickness,
        WALL_COLOR,
    ) {
        Ok(maze) => scene.maze = maze,
        Err(error) => eprintln!("maze presentation rejected: {error}"),
    }
}

fn player_presentation(world: &World) -> PlayerPresentation {
    let metrics = query::metrics(world);
    let snapshot = query::player(world);
    PlayerPresentation::new(
        Vec2::new(snapshot.position.x(), snapshot.position.y()),
        metrics.player_size,
        PLAYER_COLOR,
    )
}

fn enemy_presentations(world: &World) -> Vec<EnemyPresentation> {
    query::enemies(world)
        .iter()
        .map(|enemy| EnemyPresentation::new(enemy.cell, enemy_color(enemy.kind)))
        .collect()
}

fn power_up_presentations(world: &World) -> Vec<PowerUpPresentation> {
    query::power_ups(world)
        .iter()
        .map(|power_up| PowerUpPresentation::new(power_up.cell, power_up_color(power_up.kind)))
        .collect()
}

fn hint_presentation(world: &World) -> HintPresentation {
    HintPresentation::new(query::hint_path(world), HINT_COLOR)
}

const fn enemy_color(kind: EnemyKind) -> Color {
    match kind {
        EnemyKind::Slow => Color::from_rgb_u8(204, 84, 74),
        EnemyKind::Fast => Color::from_rgb_u8(235, 121, 47),
        EnemyKind::Patrol => Color::from_rgb_u8(186, 91, 196),
    }
}

const fn power_up_color(kind: PowerUpKind) -> Color {
    match kind {
        PowerUpKind::Speed => Color::from_rgb_u8(86, 196, 137),
        PowerUpKind::Hint => Color::from_rgb_u8(240, 206, 120),
        PowerUpKind::Time => Color::from_rgb_u8(108, 178, 235),
    }
}

fn power_up_label(kind: PowerUpKind) -> &'static str {
    match kind {
        PowerUpKind::Speed => "speed",
        PowerUpKind::Hint => "hint",
        PowerUpKind::Time => "time",
    }
}
