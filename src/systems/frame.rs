//! Frame scheduler.
//!
//! One call to [`Schedule::run`] on the schedule built by [`frame_schedule`]
//! is one logical tick. Within a tick the core systems run strictly in this
//! order:
//!
//! 1. [`aggregate_input`] – keyboard OR virtual pad into [`ControlState`]
//! 2. [`tween_character_system`] – advance in-flight steps/jumps, completions
//! 3. [`character_controller`] – start new steps/jumps from the controls
//! 4. [`update_camera`] – camera offset and visible range
//! 5. [`dispatch_motion_events`] – buffered [`MotionMessage`]s become
//!    observer events
//!
//! so observers never see a camera computed from stale motion state. The
//! whole chain only runs while the game is [`GameStates::Playing`]; a
//! [`Paused`] signal is honoured by the motion systems themselves.
//!
//! [`GameStates::Playing`]: crate::resources::gamestate::GameStates::Playing
use bevy_ecs::prelude::*;
use log::info;

use crate::components::character::{Character, Player};
use crate::components::mapposition::MapPosition;
use crate::events::motion::{
    CellEnteredEvent, JumpTriggeredEvent, MotionMessage, MoveCompletedEvent,
};
use crate::resources::camera2d::{GameCamera, VisibleRange};
use crate::resources::gameconfig::MotionTuning;
use crate::resources::gamestate::Paused;
use crate::resources::input::{ControlState, InputState, VirtualPad};
use crate::resources::tilemap::TileMap;
use crate::resources::worldtime::WorldTime;
use crate::systems::camera::update_camera;
use crate::systems::controller::character_controller;
use crate::systems::gamestate::state_is_playing;
use crate::systems::tween::tween_character_system;

/// Build the per-tick schedule of the core.
pub fn frame_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            aggregate_input,
            tween_character_system,
            character_controller,
            update_camera,
            dispatch_motion_events,
        )
            .chain()
            .run_if(state_is_playing),
    );
    schedule
}

/// Insert every resource the frame schedule reads, keeping any already
/// present. The map and the viewport size are scene data and must be
/// inserted by the caller.
pub fn init_frame_resources(world: &mut World) {
    world.init_resource::<WorldTime>();
    world.init_resource::<Paused>();
    world.init_resource::<MotionTuning>();
    world.init_resource::<InputState>();
    world.init_resource::<VirtualPad>();
    world.init_resource::<ControlState>();
    world.init_resource::<GameCamera>();
    world.init_resource::<VisibleRange>();
    world.init_resource::<Messages<MotionMessage>>();
}

/// Sample both input sources once for this tick.
pub fn aggregate_input(
    keyboard: Res<InputState>,
    pad: Res<VirtualPad>,
    mut controls: ResMut<ControlState>,
) {
    controls.sample(&keyboard, &pad);
}

/// Turn this tick's motion messages into observer events, in write order.
pub fn dispatch_motion_events(
    mut messages: ResMut<Messages<MotionMessage>>,
    mut commands: Commands,
) {
    for message in messages.drain() {
        match message {
            MotionMessage::StepCompleted { entity, cell } => {
                commands.trigger(MoveCompletedEvent { entity, cell });
                commands.trigger(CellEnteredEvent { entity, cell });
            }
            MotionMessage::JumpStarted { entity, cell } => {
                commands.trigger(JumpTriggeredEvent { entity, cell });
            }
        }
    }
}

/// Spawn the player character idle on the map's spawn cell.
pub fn spawn_player(commands: &mut Commands, map: &TileMap) -> Entity {
    let spawn = map.player_spawn();
    commands
        .spawn((
            Player,
            Character::new(spawn),
            MapPosition::from_cell(spawn, map.tile_size()),
        ))
        .id()
}

/// Stop the scene: despawn characters, drop pending motion messages and
/// reset camera, controls and pause.
///
/// In-flight steps and jumps vanish with their character, so no completion
/// event is ever fired for them.
pub fn teardown_scene(world: &mut World) {
    let characters: Vec<Entity> = world
        .query_filtered::<Entity, With<Character>>()
        .iter(world)
        .collect();
    for entity in &characters {
        world.despawn(*entity);
    }
    if let Some(mut messages) = world.get_resource_mut::<Messages<MotionMessage>>() {
        messages.clear();
    }
    if let Some(mut controls) = world.get_resource_mut::<ControlState>() {
        controls.clear();
    }
    world.insert_resource(GameCamera::default());
    world.insert_resource(VisibleRange::default());
    world.insert_resource(Paused(false));
    info!("Scene torn down ({} character(s) removed)", characters.len());
}
