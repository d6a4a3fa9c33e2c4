//! Outbound motion events.
//!
//! The motion systems never call external logic directly. During a tick they
//! write [`MotionMessage`]s; once the camera has been recomputed,
//! [`dispatch_motion_events`](crate::systems::frame::dispatch_motion_events)
//! drains them and triggers the observer events below, in the order the
//! messages were written. A completed step yields a [`MoveCompletedEvent`]
//! followed by a [`CellEnteredEvent`] for the same cell.
use bevy_ecs::message::Message;
use bevy_ecs::prelude::*;

use crate::resources::tilemap::Cell;

/// Buffered motion outcome, written by the tween and controller systems.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionMessage {
    /// A step finished and the grid cell is now `cell`.
    StepCompleted { entity: Entity, cell: Cell },
    /// A jump started while the grid cell was `cell`.
    JumpStarted { entity: Entity, cell: Cell },
}

/// A step completed; `cell` is the new grid cell.
///
/// The session layer checks for collectibles on it.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveCompletedEvent {
    pub entity: Entity,
    pub cell: Cell,
}

/// The character entered `cell`. Fired right after [`MoveCompletedEvent`];
/// the goal trigger listens to this one.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellEnteredEvent {
    pub entity: Entity,
    pub cell: Cell,
}

/// A jump started. `cell` is the grid cell at that moment, which is the
/// origin of any step still in flight.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpTriggeredEvent {
    pub entity: Entity,
    pub cell: Cell,
}
