//! Session layer integration tests: pickups, the goal door, the secret
//! prompt, dialogs pausing the game and the state hooks.

use std::path::PathBuf;

use bevy_ecs::prelude::*;

use tilewander::components::character::{Character, Player};
use tilewander::events::gamestate::{GameStateChangedEvent, observe_gamestate_change_event};
use tilewander::events::input::InputEvent;
use tilewander::game::{
    self, ActiveDialog, ActiveNotice, CollectedItems, Dialog, LOCKED_NOTICE_SECONDS,
};
use tilewander::resources::collision::{can_enter, map_goal_door};
use tilewander::resources::gameconfig::{GameConfig, MotionTuning};
use tilewander::resources::gamestate::{GameState, GameStates, NextGameState, Paused};
use tilewander::resources::input::{Control, VirtualPad};
use tilewander::resources::screensize::ScreenSize;
use tilewander::resources::systemsstore::SystemsStore;
use tilewander::resources::tilemap::{Cell, Collectible, TileKind, TileMap};
use tilewander::systems::frame::{dispatch_motion_events, frame_schedule, init_frame_resources};
use tilewander::systems::gamestate::check_pending_state;
use tilewander::systems::time::update_world_time;

const HALF_STEP: f32 = 0.125;

fn meadow_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/maps/meadow.json")
}

/// World wired the way the binary wires it, minus the window.
fn base_world(config: GameConfig) -> (World, Schedule) {
    let mut world = World::new();
    init_frame_resources(&mut world);
    world.insert_resource(MotionTuning {
        step_duration: 0.25,
        walk_frame_interval: 0.0625,
        jump_duration: 0.5,
        jump_height: 24.0,
    });
    world.insert_resource(ScreenSize { w: 320, h: 320 });
    world.insert_resource(config);
    world.insert_resource(GameState::new());
    world.insert_resource(NextGameState::new());

    game::init_session(&mut world);
    world.add_observer(observe_gamestate_change_event);

    let mut store = SystemsStore::new();
    store.register(&mut world, "setup", game::setup);
    store.register(&mut world, "enter_play", game::enter_play);
    store.register(&mut world, "enter_ending", game::enter_ending);
    store.register(&mut world, "quit_game", game::quit_game);
    world.insert_resource(store);
    world.flush();

    let mut schedule = frame_schedule();
    game::add_session_systems(&mut schedule);
    schedule.add_systems(
        check_pending_state
            .after(dispatch_motion_events)
            .after(game::update_notice),
    );
    (world, schedule)
}

/// A playing scene on a hand-built map.
fn playing_world(map: TileMap) -> (World, Schedule) {
    let (mut world, schedule) = base_world(GameConfig::new());
    world.resource_mut::<GameState>().set(GameStates::Playing);
    {
        let mut commands = world.commands();
        game::start_scene(&mut commands, map);
    }
    world.flush();
    (world, schedule)
}

fn tick(world: &mut World, schedule: &mut Schedule, dt: f32) {
    update_world_time(world, dt);
    schedule.run(world);
}

fn hold(world: &mut World, control: Control, held: bool) {
    world.resource_mut::<VirtualPad>().set(control, held);
}

/// Tap a direction and let the single step run to completion.
fn walk(world: &mut World, schedule: &mut Schedule, direction: Control) {
    hold(world, direction, true);
    tick(world, schedule, 0.0);
    hold(world, direction, false);
    tick(world, schedule, HALF_STEP);
    tick(world, schedule, HALF_STEP);
}

fn press_action(world: &mut World) {
    world.trigger(InputEvent {
        action: Control::Action,
        pressed: true,
    });
    world.flush();
}

fn player(world: &mut World) -> Option<Character> {
    world
        .query_filtered::<&Character, With<Player>>()
        .single(world)
        .ok()
        .copied()
}

fn state(world: &World) -> GameStates {
    world.resource::<GameState>().get().clone()
}

fn grass_with_spawn(spawn: Cell) -> TileMap {
    let mut map = TileMap::new_filled(10, 10, 32, TileKind::Grass).unwrap();
    map.set_spawn(spawn).unwrap();
    map
}

fn house_map(spawn: Cell, items: &[(i32, i32, u32)]) -> TileMap {
    let mut map = grass_with_spawn(spawn);
    map.place_object(Cell::new(0, 0), TileKind::House).unwrap();
    map.set_goal_anchor(Cell::new(0, 0)).unwrap();
    for (col, row, index) in items {
        map.add_collectible(Collectible {
            cell: Cell::new(*col, *row),
            index: *index,
        })
        .unwrap();
    }
    map
}

// =============================================================================
// Pickups and dialogs
// =============================================================================

#[test]
fn stepping_on_an_item_collects_it_and_pauses_until_dismissed() {
    let mut map = grass_with_spawn(Cell::new(5, 5));
    map.add_collectible(Collectible {
        cell: Cell::new(6, 5),
        index: 0,
    })
    .unwrap();
    map.add_collectible(Collectible {
        cell: Cell::new(2, 2),
        index: 1,
    })
    .unwrap();
    let (mut world, mut schedule) = playing_world(map);

    walk(&mut world, &mut schedule, Control::Right);
    assert_eq!(player(&mut world).unwrap().cell, Cell::new(6, 5));
    assert!(world.resource::<CollectedItems>().0.contains(&0));
    assert_eq!(world.resource::<CollectedItems>().count(), 1);
    assert_eq!(
        world.resource::<ActiveDialog>().0,
        Some(Dialog::Collected { index: 0 })
    );

    // dialog open: the next ticks are frozen
    hold(&mut world, Control::Up, true);
    for _ in 0..4 {
        tick(&mut world, &mut schedule, HALF_STEP);
    }
    assert!(world.resource::<Paused>().0);
    assert!(!player(&mut world).unwrap().is_stepping());

    press_action(&mut world);
    assert_eq!(world.resource::<ActiveDialog>().0, None);
    tick(&mut world, &mut schedule, 0.0);
    assert!(!world.resource::<Paused>().0);
    assert!(player(&mut world).unwrap().is_stepping());
}

#[test]
fn an_item_is_collected_only_once() {
    let mut map = grass_with_spawn(Cell::new(5, 5));
    map.add_collectible(Collectible {
        cell: Cell::new(6, 5),
        index: 3,
    })
    .unwrap();
    let (mut world, mut schedule) = playing_world(map);

    walk(&mut world, &mut schedule, Control::Right);
    press_action(&mut world);
    walk(&mut world, &mut schedule, Control::Left);
    walk(&mut world, &mut schedule, Control::Right);

    assert_eq!(player(&mut world).unwrap().cell, Cell::new(6, 5));
    assert_eq!(world.resource::<CollectedItems>().count(), 1);
    assert_eq!(world.resource::<ActiveDialog>().0, None);
}

#[test]
fn jumping_next_to_water_opens_the_secret_prompt() {
    let mut map = grass_with_spawn(Cell::new(6, 5));
    map.set_ground(Cell::new(7, 5), TileKind::Water).unwrap();
    let (mut world, mut schedule) = playing_world(map);

    hold(&mut world, Control::Jump, true);
    tick(&mut world, &mut schedule, 0.0);
    assert_eq!(world.resource::<ActiveDialog>().0, Some(Dialog::Secret));
}

#[test]
fn jumping_away_from_water_does_nothing() {
    let mut map = grass_with_spawn(Cell::new(3, 3));
    map.set_ground(Cell::new(7, 5), TileKind::Water).unwrap();
    let (mut world, mut schedule) = playing_world(map);

    hold(&mut world, Control::Jump, true);
    tick(&mut world, &mut schedule, 0.0);
    assert!(player(&mut world).unwrap().is_jumping());
    assert_eq!(world.resource::<ActiveDialog>().0, None);
}

// =============================================================================
// Goal door
// =============================================================================

#[test]
fn locked_door_posts_a_notice_that_leaving_cancels() {
    let (mut world, mut schedule) = playing_world(house_map(Cell::new(1, 4), &[(8, 8, 0)]));

    walk(&mut world, &mut schedule, Control::Up);
    assert_eq!(player(&mut world).unwrap().cell, Cell::new(1, 3));
    assert_eq!(state(&world), GameStates::Playing);
    let notice = world.resource::<ActiveNotice>().0.clone().unwrap();
    assert_eq!(notice.cell, Cell::new(1, 3));
    assert!(notice.text.contains("locked"));

    // gone as soon as the step off the door starts, not when it lands
    hold(&mut world, Control::Down, true);
    tick(&mut world, &mut schedule, 0.0);
    hold(&mut world, Control::Down, false);
    assert!(player(&mut world).unwrap().is_stepping());
    assert_eq!(player(&mut world).unwrap().cell, Cell::new(1, 3));
    assert!(world.resource::<ActiveNotice>().0.is_none());

    tick(&mut world, &mut schedule, HALF_STEP);
    tick(&mut world, &mut schedule, HALF_STEP);
    assert_eq!(player(&mut world).unwrap().cell, Cell::new(1, 4));
    assert!(world.resource::<ActiveNotice>().0.is_none());
}

#[test]
fn blocked_turn_on_the_door_keeps_the_notice() {
    let (mut world, mut schedule) = playing_world(house_map(Cell::new(1, 4), &[(8, 8, 0)]));

    walk(&mut world, &mut schedule, Control::Up);
    assert!(world.resource::<ActiveNotice>().0.is_some());

    // the house wall above the door blocks, so no step starts
    hold(&mut world, Control::Up, true);
    tick(&mut world, &mut schedule, 0.0);
    assert!(!player(&mut world).unwrap().is_stepping());
    assert!(world.resource::<ActiveNotice>().0.is_some());
}

#[test]
fn locked_notice_expires_on_its_own() {
    let (mut world, mut schedule) = playing_world(house_map(Cell::new(1, 4), &[(8, 8, 0)]));

    walk(&mut world, &mut schedule, Control::Up);
    assert!(world.resource::<ActiveNotice>().0.is_some());

    tick(&mut world, &mut schedule, LOCKED_NOTICE_SECONDS / 2.0);
    assert!(world.resource::<ActiveNotice>().0.is_some());
    tick(&mut world, &mut schedule, LOCKED_NOTICE_SECONDS / 2.0);
    assert!(world.resource::<ActiveNotice>().0.is_none());
}

#[test]
fn collecting_everything_then_reaching_the_door_ends_the_game() {
    let (mut world, mut schedule) = playing_world(house_map(Cell::new(1, 5), &[(1, 4, 0)]));

    walk(&mut world, &mut schedule, Control::Up);
    assert_eq!(
        world.resource::<ActiveDialog>().0,
        Some(Dialog::Collected { index: 0 })
    );
    press_action(&mut world);

    walk(&mut world, &mut schedule, Control::Up);
    tick(&mut world, &mut schedule, 0.0);

    assert_eq!(state(&world), GameStates::Ending);
    assert!(player(&mut world).is_none());
    assert!(world.resource::<ActiveNotice>().0.is_none());

    // any further ticks are inert
    hold(&mut world, Control::Down, true);
    tick(&mut world, &mut schedule, HALF_STEP);
    assert_eq!(state(&world), GameStates::Ending);

    press_action(&mut world);
    tick(&mut world, &mut schedule, 0.0);
    assert_eq!(state(&world), GameStates::Quitting);
}

#[test]
fn action_on_the_door_enters_only_when_everything_is_collected() {
    let (mut world, mut schedule) = playing_world(house_map(Cell::new(1, 3), &[(5, 5, 0)]));

    press_action(&mut world);
    tick(&mut world, &mut schedule, 0.0);
    assert_eq!(state(&world), GameStates::Playing);

    world.resource_mut::<CollectedItems>().0.insert(0);
    press_action(&mut world);
    tick(&mut world, &mut schedule, 0.0);
    assert_eq!(state(&world), GameStates::Ending);
}

// =============================================================================
// State hooks and the shipped map
// =============================================================================

#[test]
fn shipped_meadow_map_is_valid_and_playable() {
    let map = TileMap::load(meadow_path()).unwrap();
    assert_eq!((map.width(), map.height(), map.tile_size()), (40, 30, 32));
    assert_eq!(map.player_spawn(), Cell::new(19, 28));
    assert_eq!(map.goal_anchor(), Some(Cell::new(18, 2)));
    assert_eq!(map_goal_door(&map), Some(Cell::new(19, 5)));
    assert_eq!(map.collectibles().len(), 10);

    assert!(can_enter(&map, map.player_spawn()));
    assert!(can_enter(&map, Cell::new(19, 5)));
    for item in map.collectibles() {
        assert!(can_enter(&map, item.cell), "item {} at {}", item.index, item.cell);
    }
    assert!(map.ground_at(Cell::new(7, 15)).unwrap().is_water());
}

#[test]
fn setup_hook_loads_the_map_and_starts_playing() {
    let mut config = GameConfig::new();
    config.map_path = meadow_path();
    let (mut world, mut schedule) = base_world(config);

    world.resource_mut::<NextGameState>().set(GameStates::Setup);
    world.trigger(GameStateChangedEvent {});
    world.flush();
    assert!(world.contains_resource::<TileMap>());
    assert_eq!(player(&mut world).unwrap().cell, Cell::new(19, 28));

    tick(&mut world, &mut schedule, 0.0);
    assert_eq!(state(&world), GameStates::Playing);
    assert_eq!(world.resource::<MotionTuning>(), &MotionTuning::default());

    hold(&mut world, Control::Up, true);
    tick(&mut world, &mut schedule, 0.0);
    assert!(player(&mut world).unwrap().is_stepping());
}

#[test]
fn setup_with_a_missing_map_quits() {
    let mut config = GameConfig::new();
    config.map_path = PathBuf::from("/definitely/not/here/map.json");
    let (mut world, mut schedule) = base_world(config);

    world.resource_mut::<NextGameState>().set(GameStates::Setup);
    world.trigger(GameStateChangedEvent {});
    world.flush();
    tick(&mut world, &mut schedule, 0.0);

    assert_eq!(state(&world), GameStates::Quitting);
    assert!(!world.contains_resource::<TileMap>());
}
