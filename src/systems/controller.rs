//! Character motion controller.
//!
//! Turns the sampled [`ControlState`] into new motion for the [`Player`]:
//!
//! - **Idle** (no step in flight): the first held direction in the order
//!   up > down > left > right sets the facing, whether or not the move is
//!   allowed. If [`can_enter`] approves the neighbouring cell a
//!   [`StepTween`] starts; otherwise nothing else happens.
//! - **Jump**: a rising edge of the jump control starts a [`JumpArc`] unless
//!   one is already in flight. This is independent of stepping, so a jump
//!   may start mid-step. The reported cell is the grid cell at that moment.
//!
//! Advancing and completing motion is done by
//! [`tween_character_system`](crate::systems::tween::tween_character_system).
use bevy_ecs::prelude::*;
use log::debug;

use crate::components::character::{Character, Facing, Player};
use crate::components::tween::{JumpArc, StepTween};
use crate::events::motion::MotionMessage;
use crate::resources::collision::can_enter;
use crate::resources::gameconfig::MotionTuning;
use crate::resources::gamestate::Paused;
use crate::resources::input::{Control, ControlState};
use crate::resources::tilemap::TileMap;

pub fn character_controller(
    controls: Res<ControlState>,
    paused: Res<Paused>,
    tuning: Res<MotionTuning>,
    map: Res<TileMap>,
    mut query: Query<(Entity, &mut Character), With<Player>>,
    mut motion: MessageWriter<MotionMessage>,
) {
    if paused.0 {
        return;
    }

    for (entity, mut character) in query.iter_mut() {
        if !character.is_stepping()
            && let Some(facing) = controls.direction().and_then(Facing::from_control)
        {
            character.facing = facing;
            let from = character.cell;
            let to = facing.next_cell(from);
            if can_enter(&map, to) {
                debug!("Step {:?} from {} to {}", facing, from, to);
                character.step = Some(StepTween::new(from, to, tuning.step_duration));
            } else {
                debug!("Step {:?} from {} blocked", facing, from);
            }
        }

        if controls.just_pressed(Control::Jump) && !character.is_jumping() {
            debug!("Jump at {}", character.cell);
            character.jump = Some(JumpArc::new(tuning.jump_duration, tuning.jump_height));
            motion.write(MotionMessage::JumpStarted {
                entity,
                cell: character.cell,
            });
        }
    }
}
