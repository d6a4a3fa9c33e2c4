//! Tween maths and the in-flight motion system.
//!
//! [`tween_character_system`] advances the step tween and the jump arc of
//! every [`Character`] by the frame's `delta`, writes the interpolated pixel
//! position and reports completed steps as
//! [`MotionMessage::StepCompleted`]. It never starts motion; that is the
//! controller's job and runs right after it in the frame schedule, so a step
//! started this tick gets its first progress on the next one.

use bevy_ecs::prelude::*;
use log::debug;
use raylib::math::Vector2;

use crate::components::character::Character;
use crate::components::mapposition::{MapPosition, cell_to_pixel};
use crate::events::motion::MotionMessage;
use crate::resources::gameconfig::MotionTuning;
use crate::resources::gamestate::Paused;
use crate::resources::tilemap::TileMap;
use crate::resources::worldtime::WorldTime;

/// Number of frames in the walk cycle.
pub const WALK_FRAMES: u8 = 4;

/// Linearly interpolate between two 2D vectors.
pub fn lerp_v2(a: Vector2, b: Vector2, t: f32) -> Vector2 {
    Vector2 {
        x: a.x + (b.x - a.x) * t,
        y: a.y + (b.y - a.y) * t,
    }
}

/// Height of the jump arc after `elapsed` seconds: `height * sin(pi * t / duration)`.
///
/// Zero outside `0..=duration`, peak `height` at the midpoint.
pub fn jump_offset(elapsed: f32, duration: f32, height: f32) -> f32 {
    if duration <= 0.0 || elapsed <= 0.0 || elapsed >= duration {
        return 0.0;
    }
    height * (std::f32::consts::PI * elapsed / duration).sin()
}

/// Walk-cycle frame after `elapsed` seconds of stepping.
pub fn walk_frame(elapsed: f32, interval: f32) -> u8 {
    if interval <= 0.0 || elapsed <= 0.0 {
        return 0;
    }
    ((elapsed / interval).floor() as u64 % WALK_FRAMES as u64) as u8
}

/// Advance in-flight steps and jumps.
///
/// Does nothing while [`Paused`] is set: time spent paused is simply not
/// accumulated, so a frozen step resumes exactly where it stopped.
pub fn tween_character_system(
    world_time: Res<WorldTime>,
    paused: Res<Paused>,
    tuning: Res<MotionTuning>,
    map: Res<TileMap>,
    mut query: Query<(Entity, &mut Character, &mut MapPosition)>,
    mut motion: MessageWriter<MotionMessage>,
) {
    if paused.0 {
        return;
    }
    let dt = world_time.delta.max(0.0);
    let tile_size = map.tile_size();

    for (entity, mut character, mut position) in query.iter_mut() {
        if let Some(mut step) = character.step {
            step.elapsed += dt;
            if step.is_finished() {
                // snap, no residual interpolation error
                position.pos = cell_to_pixel(step.to, tile_size);
                character.cell = step.to;
                character.step = None;
                character.walk_frame = 0;
                debug!("Step completed at {}", step.to);
                motion.write(MotionMessage::StepCompleted {
                    entity,
                    cell: step.to,
                });
            } else {
                let from = cell_to_pixel(step.from, tile_size);
                let to = cell_to_pixel(step.to, tile_size);
                position.pos = lerp_v2(from, to, step.progress());
                character.walk_frame = walk_frame(step.elapsed, tuning.walk_frame_interval);
                character.step = Some(step);
            }
        }

        if let Some(mut jump) = character.jump {
            jump.elapsed += dt;
            if jump.is_finished() {
                character.jump = None;
                debug!("Landed at {}", character.cell);
            } else {
                character.jump = Some(jump);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_lerp_v2_midpoint() {
        let a = Vector2 { x: 160.0, y: 160.0 };
        let b = Vector2 { x: 192.0, y: 160.0 };
        let m = lerp_v2(a, b, 0.5);
        assert!(approx_eq(m.x, 176.0));
        assert!(approx_eq(m.y, 160.0));
    }

    #[test]
    fn test_jump_arc_returns_to_baseline() {
        let (d, h) = (0.4, 24.0);
        assert_eq!(jump_offset(0.0, d, h), 0.0);
        assert_eq!(jump_offset(d, d, h), 0.0);
        assert!(approx_eq(jump_offset(d / 2.0, d, h), h));
        assert!(jump_offset(0.1, d, h) > 0.0);
        assert!(jump_offset(0.1, d, h) < h);
        assert!(approx_eq(jump_offset(0.1, d, h), jump_offset(0.3, d, h)));
    }

    #[test]
    fn test_walk_frame_cycles_every_interval() {
        assert_eq!(walk_frame(0.0, 0.08), 0);
        assert_eq!(walk_frame(0.05, 0.08), 0);
        assert_eq!(walk_frame(0.09, 0.08), 1);
        assert_eq!(walk_frame(0.17, 0.08), 2);
        assert_eq!(walk_frame(0.25, 0.08), 3);
        assert_eq!(walk_frame(0.33, 0.08), 0);
        assert_eq!(walk_frame(0.5, 0.0), 0);
    }
}
