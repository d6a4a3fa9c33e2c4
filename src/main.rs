//! Tilewander main entry point.
//!
//! A top-down tile exploration game written in Rust using:
//! - **raylib** for windowing, input and drawing
//! - **bevy_ecs** for entity-component-system architecture
//!
//! # Main Loop
//!
//! 1. Parse the command line, load `config.ini` (defaults on error)
//! 2. Initialize the raylib window and the ECS world with its resources
//! 3. Register state hooks and observers, enter `Setup` (loads the map)
//! 4. Every frame: poll input, run the frame schedule, draw
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --map assets/maps/meadow.json
//! ```

// Do not create console on Windows
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use bevy_ecs::prelude::*;
use clap::Parser;
use log::{error, info, warn};

use tilewander::events::gamestate::{GameStateChangedEvent, observe_gamestate_change_event};
use tilewander::events::switchdebug::switch_debug_observer;
use tilewander::game;
use tilewander::resources::gameconfig::GameConfig;
use tilewander::resources::gamestate::{GameState, GameStates, NextGameState};
use tilewander::resources::input::VirtualPadLayout;
use tilewander::resources::screensize::ScreenSize;
use tilewander::resources::systemsstore::SystemsStore;
use tilewander::resources::tilemap::TileMap;
use tilewander::systems::frame::{
    aggregate_input, dispatch_motion_events, frame_schedule, init_frame_resources,
};
use tilewander::systems::gamestate::check_pending_state;
use tilewander::systems::input::{update_input_state, update_virtual_pad};
use tilewander::systems::render::render_system;
use tilewander::systems::time::update_world_time;

/// Size of one on-screen control button, in pixels.
const PAD_BUTTON: f32 = 56.0;

/// Tilewander, a little walk across a tile map.
#[derive(Parser)]
#[command(version, about = "Walk the meadow, find every item, reach the house.")]
struct Cli {
    /// INI configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Map file to play, overriding `[map] path` from the configuration.
    #[arg(long, value_name = "PATH")]
    map: Option<PathBuf>,

    /// Load and validate the map, print a summary and exit.
    #[arg(long)]
    check_map: bool,
}

fn check_map(path: &Path) -> ExitCode {
    match TileMap::load(path) {
        Ok(map) => {
            println!(
                "{}: {}x{} cells of {}px, spawn {}, goal {}, {} collectibles, {} labels",
                path.display(),
                map.width(),
                map.height(),
                map.tile_size(),
                map.player_spawn(),
                map.goal_anchor()
                    .map_or_else(|| "none".to_string(), |c| c.to_string()),
                map.collectibles().len(),
                map.labels().len()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GameConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        warn!("{e}; using defaults");
    }
    if let Some(map) = cli.map {
        config.map_path = map;
    }

    // Early-exit: validate the map (no window needed)
    if cli.check_map {
        return check_map(&config.map_path);
    }

    info!("Starting tilewander");
    // --------------- Raylib window ---------------
    let (window_width, window_height) = config.window_size();
    let mut builder = raylib::init();
    builder
        .size(window_width as i32, window_height as i32)
        .title("Tilewander");
    if config.vsync {
        builder.vsync();
    }
    let (mut rl, thread) = builder.build();
    rl.set_target_fps(config.target_fps);
    // Disable ESC to exit
    rl.set_exit_key(None);

    // --------------- ECS world + resources ---------------
    let mut world = World::new();
    init_frame_resources(&mut world);
    world.insert_resource(config.motion_tuning());
    world.insert_resource(ScreenSize {
        w: config.viewport_width as i32,
        h: config.viewport_height as i32,
    });
    world.insert_resource(VirtualPadLayout::for_viewport(
        rl.get_screen_width() as f32,
        rl.get_screen_height() as f32,
        PAD_BUTTON,
    ));
    world.insert_resource(config);
    world.insert_resource(GameState::new());
    world.insert_resource(NextGameState::new());
    world.insert_non_send_resource(rl);
    world.insert_non_send_resource(thread);

    game::init_session(&mut world);
    world.add_observer(observe_gamestate_change_event);
    world.add_observer(switch_debug_observer);

    let mut systems_store = SystemsStore::new();
    systems_store.register(&mut world, "setup", game::setup);
    systems_store.register(&mut world, "enter_play", game::enter_play);
    systems_store.register(&mut world, "enter_ending", game::enter_ending);
    systems_store.register(&mut world, "quit_game", game::quit_game);
    world.insert_resource(systems_store);
    world.flush();

    // Enter Setup immediately
    world.resource_mut::<NextGameState>().set(GameStates::Setup);
    world.trigger(GameStateChangedEvent {});
    world.flush();

    let mut update = frame_schedule();
    update.add_systems((update_input_state, update_virtual_pad).before(aggregate_input));
    game::add_session_systems(&mut update);
    // State changes requested by this tick's observers apply before drawing
    update.add_systems(
        check_pending_state
            .after(dispatch_motion_events)
            .after(game::update_notice),
    );
    update.add_systems(render_system.after(check_pending_state));

    // --------------- Main loop ---------------
    while !world
        .non_send_resource::<raylib::RaylibHandle>()
        .window_should_close()
        && world.resource::<GameState>().get() != &GameStates::Quitting
    {
        let dt = world
            .non_send_resource::<raylib::RaylibHandle>()
            .get_frame_time();
        update_world_time(&mut world, dt);

        update.run(&mut world);

        world.clear_trackers();
    }

    if world.resource::<GameState>().get() == &GameStates::Quitting
        && !world.contains_resource::<TileMap>()
    {
        error!("Exited without a map");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
