//! Input action events.
//!
//! [`InputEvent`] is triggered by the raylib polling system when the primary
//! action or the jump button is pressed or released on the keyboard. The
//! session layer uses action presses to dismiss dialogs and to enter the
//! goal structure.
//!
//! Gameplay motion does not use these events: it samples
//! [`ControlState`](crate::resources::input::ControlState) once per tick.

use bevy_ecs::prelude::*;

use crate::resources::input::Control;

/// Emitted when a control is pressed or released.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    /// The control that changed.
    pub action: Control,
    /// Whether it was pressed (true) or released (false).
    pub pressed: bool,
}
