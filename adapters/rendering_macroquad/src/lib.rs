#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Maze Escape.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature. Consumers that need sound playback can opt back
//! in by enabling `macroquad/audio` in their own `Cargo.toml` dependency
//! specification.

use anyhow::Result;
use glam::Vec2;
use macroquad::input::{is_key_down, is_key_pressed, mouse_position, KeyCode};
use maze_escape_core::{Direction, GamePhase, IntentSet};
use maze_escape_rendering::{
    steer_intents, Color, EnemyPresentation, FrameInput, HintPresentation, MazePresentation,
    PlayerPresentation, PowerUpPresentation, Presentation, RenderingBackend, Scene,
    MOUSE_STEER_DEAD_ZONE,
};
use std::time::Duration;

/// Snapshot of keyboard state observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardState {
    /// Arrow keys and WASD sampled as held directions.
    held: IntentSet,
    /// `P` or `Escape` toggles pause.
    pause_pressed: bool,
    /// `R` restarts the session with a fresh maze.
    restart_pressed: bool,
    /// `Q` quits the game loop.
    quit_pressed: bool,
}

impl KeyboardState {
    fn poll() -> Self {
        let mut held = IntentSet::none();
        if is_key_down(KeyCode::Up) || is_key_down(KeyCode::W) {
            held.hold(Direction::North);
        }
        if is_key_down(KeyCode::Right) || is_key_down(KeyCode::D) {
            held.hold(Direction::East);
        }
        if is_key_down(KeyCode::Down) || is_key_down(KeyCode::S) {
            held.hold(Direction::South);
        }
        if is_key_down(KeyCode::Left) || is_key_down(KeyCode::A) {
            held.hold(Direction::West);
        }

        Self {
            held,
            pause_pressed: is_key_pressed(KeyCode::P) || is_key_pressed(KeyCode::Escape),
            restart_pressed: is_key_pressed(KeyCode::R),
            quit_pressed: is_key_pressed(KeyCode::Q),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Clone, Copy, Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    mouse_steering: bool,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            mouse_steering: false,
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend prints frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Configures whether the cursor steers the player alongside the keyboard.
    #[must_use]
    pub fn with_mouse_steering(mut self, enabled: bool) -> Self {
        self.mouse_steering = enabled;
        self
    }
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    /// Records a rendered frame and returns the average once one second has elapsed.
    fn record_frame(&mut self, frame: Duration) -> Option<f32> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        self.elapsed = Duration::ZERO;
        let frames = self.frames;
        self.frames = 0;

        if seconds <= f32::EPSILON {
            return None;
        }
        Some(frames as f32 / seconds)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            mouse_steering,
        } = self;

        let Presentation {
            window_title,
            window_size,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: window_size.x.max(1.0) as i32,
            window_height: window_size.y.max(1.0) as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let background = to_macroquad_color(clear_color);
            let mut scene = scene;
            let mut fps_counter = FpsCounter::default();

            loop {
                let keyboard = KeyboardState::poll();
                if keyboard.quit_pressed {
                    break;
                }

                macroquad::window::clear_background(background);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();
                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));

                let metrics = SceneMetrics::from_scene(&scene, screen_width, screen_height);
                let frame_input = gather_frame_input(&scene, &metrics, keyboard, mouse_steering);

                update_scene(frame_dt, frame_input, &mut scene);

                // A restart can swap in a maze with different dimensions.
                let metrics = SceneMetrics::from_scene(&scene, screen_width, screen_height);
                draw_scene(&scene, &metrics);
                draw_phase_overlay(scene.phase, screen_width, screen_height);

                let fps = fps_counter.record_frame(frame_dt);
                if show_fps {
                    if let Some(per_second) = fps {
                        println!("FPS: {per_second:.2}");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Scale and centering offsets that map maze-local pixels onto the window.
#[derive(Clone, Copy, Debug)]
struct SceneMetrics {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
}

impl SceneMetrics {
    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let world_width = scene.maze.width();
        let world_height = scene.maze.height();

        let scale = if world_width <= f32::EPSILON || world_height <= f32::EPSILON {
            1.0
        } else {
            (screen_width / world_width).min(screen_height / world_height)
        };

        Self {
            scale,
            offset_x: (screen_width - world_width * scale) * 0.5,
            offset_y: (screen_height - world_height * scale) * 0.5,
        }
    }

    fn to_screen(&self, position: Vec2) -> Vec2 {
        Vec2::new(
            self.offset_x + position.x * self.scale,
            self.offset_y + position.y * self.scale,
        )
    }

    fn to_maze(&self, position: Vec2) -> Option<Vec2> {
        if self.scale <= f32::EPSILON {
            return None;
        }

        Some(Vec2::new(
            (position.x - self.offset_x) / self.scale,
            (position.y - self.offset_y) / self.scale,
        ))
    }
}

fn gather_frame_input(
    scene: &Scene,
    metrics: &SceneMetrics,
    keyboard: KeyboardState,
    mouse_steering: bool,
) -> FrameInput {
    let (cursor_x, cursor_y) = mouse_position();
    gather_frame_input_from_observations(
        scene,
        metrics,
        Vec2::new(cursor_x, cursor_y),
        keyboard,
        mouse_steering,
    )
}

fn gather_frame_input_from_observations(
    scene: &Scene,
    metrics: &SceneMetrics,
    cursor_position: Vec2,
    keyboard: KeyboardState,
    mouse_steering: bool,
) -> FrameInput {
    let cursor_maze_space = metrics.to_maze(cursor_position);

    let mut input = FrameInput {
        held: keyboard.held,
        cursor_maze_space,
        mouse_steering: false,
        pause_pressed: keyboard.pause_pressed,
        restart_pressed: keyboard.restart_pressed,
        quit_pressed: keyboard.quit_pressed,
    };

    if mouse_steering && scene.phase == GamePhase::Playing {
        if let Some(cursor) = cursor_maze_space {
            let player_center = scene.player.position + Vec2::splat(scene.player.size * 0.5);
            let steered = steer_intents(player_center, cursor, MOUSE_STEER_DEAD_ZONE);
            if steered.any_held() {
                input.held = merge_intents(input.held, steered);
                input.mouse_steering = true;
            }
        }
    }

    input
}

fn merge_intents(keyboard: IntentSet, steered: IntentSet) -> IntentSet {
    let mut merged = keyboard;
    for direction in Direction::ALL {
        if steered.is_held(direction) {
            merged.hold(direction);
        }
    }
    merged
}

fn draw_scene(scene: &Scene, metrics: &SceneMetrics) {
    draw_maze_walls(&scene.maze, metrics);
    draw_border_markers(&scene.maze, metrics);
    draw_hint_path(&scene.maze, &scene.hint, metrics);
    draw_power_ups(&scene.maze, &scene.power_ups, metrics);
    draw_enemies(&scene.maze, &scene.enemies, metrics);
    draw_player(&scene.player, metrics);
}

fn draw_maze_walls(maze: &MazePresentation, metrics: &SceneMetrics) {
    let thickness = (maze.wall_thickness * metrics.scale).max(1.0);
    let color = to_macroquad_color(maze.wall_color);

    for segment in maze.wall_segments() {
        let from = metrics.to_screen(segment.from);
        let to = metrics.to_screen(segment.to);
        macroquad::shapes::draw_line(from.x, from.y, to.x, to.y, thickness, color);
    }
}

fn draw_border_markers(maze: &MazePresentation, metrics: &SceneMetrics) {
    let width = maze.cell_size * metrics.scale;
    let depth = (maze.wall_thickness * metrics.scale).max(1.0);

    let entry = metrics.to_screen(maze.cell_origin(maze.entry));
    macroquad::shapes::draw_rectangle(
        entry.x,
        entry.y,
        width,
        depth,
        to_macroquad_color(Color::from_rgb_u8(74, 170, 96)),
    );

    let exit = metrics.to_screen(maze.cell_origin(maze.exit));
    let cell_height = maze.cell_size * metrics.scale;
    macroquad::shapes::draw_rectangle(
        exit.x,
        exit.y + cell_height - depth,
        width,
        depth,
        to_macroquad_color(Color::from_rgb_u8(222, 152, 44)),
    );
}

fn draw_hint_path(maze: &MazePresentation, hint: &HintPresentation, metrics: &SceneMetrics) {
    if hint.is_empty() {
        return;
    }

    let radius = (maze.cell_size * metrics.scale * 0.12).max(1.0);
    let color = to_macroquad_color(hint.color);

    for cell in &hint.cells {
        let center = metrics.to_screen(maze.cell_center(*cell));
        macroquad::shapes::draw_circle(center.x, center.y, radius, color);
    }
}

fn draw_power_ups(
    maze: &MazePresentation,
    power_ups: &[PowerUpPresentation],
    metrics: &SceneMetrics,
) {
    let radius = (maze.cell_size * metrics.scale * 0.22).max(1.0);
    let outline_thickness = (radius * 0.3).max(1.0);

    for power_up in power_ups {
        let center = metrics.to_screen(maze.cell_center(power_up.cell));
        let fill = Color::new(
            power_up.color.red,
            power_up.color.green,
            power_up.color.blue,
            0.85,
        );
        let outline = power_up.color.lighten(0.4);

        macroquad::shapes::draw_circle(center.x, center.y, radius, to_macroquad_color(fill));
        macroquad::shapes::draw_circle_lines(
            center.x,
            center.y,
            radius,
            outline_thickness,
            to_macroquad_color(outline),
        );
    }
}

fn draw_enemies(maze: &MazePresentation, enemies: &[EnemyPresentation], metrics: &SceneMetrics) {
    let radius = (maze.cell_size * metrics.scale * 0.32).max(1.0);
    let outline_thickness = (radius * 0.2).max(1.0);

    for enemy in enemies {
        let center = metrics.to_screen(maze.cell_center(enemy.cell));
        macroquad::shapes::draw_circle(
            center.x,
            center.y,
            radius,
            to_macroquad_color(enemy.color),
        );
        macroquad::shapes::draw_circle_lines(
            center.x,
            center.y,
            radius,
            outline_thickness,
            macroquad::color::BLACK,
        );
    }
}

fn draw_player(player: &PlayerPresentation, metrics: &SceneMetrics) {
    let origin = metrics.to_screen(player.position);
    let side = player.size * metrics.scale;
    let outline_thickness = (side * 0.15).max(1.0);

    macroquad::shapes::draw_rectangle(
        origin.x,
        origin.y,
        side,
        side,
        to_macroquad_color(player.color),
    );
    macroquad::shapes::draw_rectangle_lines(
        origin.x,
        origin.y,
        side,
        side,
        outline_thickness,
        to_macroquad_color(player.color.lighten(0.5)),
    );
}

fn draw_phase_overlay(phase: GamePhase, screen_width: f32, screen_height: f32) {
    let tint = match phase {
        GamePhase::Playing => return,
        GamePhase::Paused => Color::new(0.05, 0.05, 0.12, 0.55),
        GamePhase::Won => Color::new(1.0, 0.84, 0.25, 0.28),
    };

    macroquad::shapes::draw_rectangle(
        0.0,
        0.0,
        screen_width,
        screen_height,
        to_macroquad_color(tint),
    );
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_escape_core::{CellCoord, GridSize, Maze, MazeGrid};

    fn corridor_scene(phase: GamePhase) -> Scene {
        let mut grid = MazeGrid::new(GridSize::new(2, 1));
        assert!(grid.carve_between(CellCoord::new(0, 0), CellCoord::new(1, 0)));
        assert!(grid.open_border(CellCoord::new(0, 0), Direction::North));
        assert!(grid.open_border(CellCoord::new(1, 0), Direction::South));
        let maze = Maze::new(grid, CellCoord::new(0, 0), CellCoord::new(1, 0));

        let presentation =
            MazePresentation::from_maze(&maze, 30.0, 4.0, Color::from_rgb_u8(40, 40, 40))
                .expect("valid corridor");

        Scene::new(
            presentation,
            PlayerPresentation::new(Vec2::new(10.0, 10.0), 10.0, Color::from_rgb_u8(80, 120, 220)),
            Vec::new(),
            Vec::new(),
            HintPresentation::new(Vec::new(), Color::from_rgb_u8(240, 220, 90)),
            phase,
        )
    }

    fn keyboard(held: IntentSet) -> KeyboardState {
        KeyboardState {
            held,
            ..KeyboardState::default()
        }
    }

    #[test]
    fn scene_metrics_center_the_maze_in_the_window() {
        let scene = corridor_scene(GamePhase::Playing);
        let metrics = SceneMetrics::from_scene(&scene, 600.0, 600.0);

        assert!((metrics.scale - 10.0).abs() < 1e-6);
        assert!((metrics.offset_x - 0.0).abs() < 1e-6);
        assert!((metrics.offset_y - 150.0).abs() < 1e-6);

        let round_trip = metrics
            .to_maze(metrics.to_screen(Vec2::new(12.0, 7.0)))
            .expect("scale is positive");
        assert!((round_trip - Vec2::new(12.0, 7.0)).length() < 1e-4);
    }

    #[test]
    fn keyboard_input_passes_through_untouched_without_mouse_steering() {
        let scene = corridor_scene(GamePhase::Playing);
        let metrics = SceneMetrics::from_scene(&scene, 600.0, 600.0);

        let mut held = IntentSet::none();
        held.hold(Direction::East);
        let mut state = keyboard(held);
        state.pause_pressed = true;

        let input = gather_frame_input_from_observations(
            &scene,
            &metrics,
            Vec2::new(300.0, 300.0),
            state,
            false,
        );

        assert_eq!(input.held, held);
        assert!(!input.mouse_steering);
        assert!(input.pause_pressed);
        assert!(!input.restart_pressed);
        assert!(input.cursor_maze_space.is_some());
    }

    #[test]
    fn mouse_steering_merges_the_dominant_axis_hold() {
        let scene = corridor_scene(GamePhase::Playing);
        let metrics = SceneMetrics::from_scene(&scene, 600.0, 600.0);

        // Player centre sits at maze (15, 15); aim well to the East of it.
        let cursor_screen = metrics.to_screen(Vec2::new(45.0, 16.0));
        let input = gather_frame_input_from_observations(
            &scene,
            &metrics,
            cursor_screen,
            keyboard(IntentSet::none()),
            true,
        );

        assert!(input.mouse_steering);
        assert!(input.held.is_held(Direction::East));
        assert!(!input.held.is_held(Direction::South));
    }

    #[test]
    fn mouse_steering_stays_idle_outside_the_playing_phase() {
        let scene = corridor_scene(GamePhase::Won);
        let metrics = SceneMetrics::from_scene(&scene, 600.0, 600.0);

        let cursor_screen = metrics.to_screen(Vec2::new(45.0, 16.0));
        let input = gather_frame_input_from_observations(
            &scene,
            &metrics,
            cursor_screen,
            keyboard(IntentSet::none()),
            true,
        );

        assert!(!input.mouse_steering);
        assert!(!input.held.any_held());
    }

    #[test]
    fn fps_counter_reports_once_per_second() {
        let mut counter = FpsCounter::default();

        for _ in 0..59 {
            assert!(counter.record_frame(Duration::from_millis(16)).is_none());
        }
        let average = counter
            .record_frame(Duration::from_millis(64))
            .expect("one second elapsed");
        assert!(average > 0.0);
    }
}
