//! Character kinematic state.
//!
//! The grid cell is authoritative; the pixel position lives in
//! [`MapPosition`](super::mapposition::MapPosition) and is derived from it.
//! Only the motion systems write this component, everyone else reads it.
use bevy_ecs::prelude::Component;

use crate::components::tween::{JumpArc, StepTween};
use crate::resources::input::Control;
use crate::resources::tilemap::Cell;
use crate::systems::tween::jump_offset;

/// One of the four directions the character can face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Facing {
    /// Facing for a directional control; `None` for action buttons.
    pub fn from_control(control: Control) -> Option<Facing> {
        match control {
            Control::Up => Some(Facing::Up),
            Control::Down => Some(Facing::Down),
            Control::Left => Some(Facing::Left),
            Control::Right => Some(Facing::Right),
            Control::Action | Control::Jump => None,
        }
    }

    /// Grid delta `(dcol, drow)` of one step in this direction.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Facing::Up => (0, -1),
            Facing::Down => (0, 1),
            Facing::Left => (-1, 0),
            Facing::Right => (1, 0),
        }
    }

    pub fn next_cell(self, from: Cell) -> Cell {
        let (dcol, drow) = self.delta();
        from.offset(dcol, drow)
    }
}

/// Coarse motion phase, for rendering and diagnostics.
///
/// A jump may overlap a step; in that case the phase reports `Stepping`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionPhase {
    Idle,
    Stepping,
    Jumping,
}

/// Marks the entity driven by the player's controls.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Player;

#[derive(Component, Clone, Copy, Debug)]
pub struct Character {
    /// Grid cell. Updated to the target only when a step completes.
    pub cell: Cell,
    pub facing: Facing,
    pub step: Option<StepTween>,
    pub jump: Option<JumpArc>,
    /// Walk cycle frame in 0..4. Always 0 while idle.
    pub walk_frame: u8,
}

impl Character {
    pub fn new(cell: Cell) -> Self {
        Character {
            cell,
            facing: Facing::default(),
            step: None,
            jump: None,
            walk_frame: 0,
        }
    }

    pub fn phase(&self) -> MotionPhase {
        if self.step.is_some() {
            MotionPhase::Stepping
        } else if self.jump.is_some() {
            MotionPhase::Jumping
        } else {
            MotionPhase::Idle
        }
    }

    pub fn is_stepping(&self) -> bool {
        self.step.is_some()
    }

    pub fn is_jumping(&self) -> bool {
        self.jump.is_some()
    }

    /// 0.0 when no step is in flight.
    pub fn step_progress(&self) -> f32 {
        self.step.map_or(0.0, |s| s.progress())
    }

    pub fn jump_progress(&self) -> f32 {
        self.jump.map_or(0.0, |j| j.progress())
    }

    /// Current height above the ground in pixels.
    pub fn jump_offset(&self) -> f32 {
        self.jump
            .map_or(0.0, |j| jump_offset(j.elapsed, j.duration, j.height))
    }
}
