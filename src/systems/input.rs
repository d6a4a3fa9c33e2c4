//! Input polling systems (raylib).
//!
//! - [`update_input_state`] reads the keyboard into
//!   [`InputState`](crate::resources::input::InputState), toggles the debug
//!   overlay on F11 and triggers [`InputEvent`]s for the action and jump
//!   buttons.
//! - [`update_virtual_pad`] hit-tests touch points and the left mouse button
//!   against the on-screen controls and writes
//!   [`VirtualPad`](crate::resources::input::VirtualPad).
//!
//! Both only produce source state; the merge into `ControlState` happens in
//! the frame schedule.
use arrayvec::ArrayVec;
use bevy_ecs::prelude::*;
use raylib::prelude::{KeyboardKey, MouseButton, Vector2};

use crate::events::input::InputEvent;
use crate::events::switchdebug::SwitchDebugEvent;
use crate::resources::input::{Control, InputState, VirtualPad, VirtualPadLayout};

/// Buttons whose press/release edges are announced as [`InputEvent`]s.
const EVENT_CONTROLS: [Control; 2] = [Control::Action, Control::Jump];

/// Simultaneous pointers we look at. Extra touches are ignored.
const MAX_POINTERS: usize = 8;

fn key_down(rl: &raylib::RaylibHandle, key: KeyboardKey) -> bool {
    key != KeyboardKey::KEY_NULL && rl.is_key_down(key)
}

/// Poll raylib for keyboard input and update the `InputState` resource.
pub fn update_input_state(
    mut input: ResMut<InputState>,
    rl: NonSend<raylib::RaylibHandle>,
    mut commands: Commands,
) {
    for control in Control::ALL {
        let state = input.get_mut(control);
        let down = key_down(&rl, state.key_binding) || key_down(&rl, state.alt_binding);
        state.set(down);
    }
    let debug_down = key_down(&rl, input.mode_debug.key_binding);
    input.mode_debug.set(debug_down);

    if input.mode_debug.just_pressed {
        commands.trigger(SwitchDebugEvent {});
    }

    for control in EVENT_CONTROLS {
        let state = input.get(control);
        if state.just_pressed {
            commands.trigger(InputEvent {
                action: control,
                pressed: true,
            });
        } else if state.just_released {
            commands.trigger(InputEvent {
                action: control,
                pressed: false,
            });
        }
    }
}

/// Poll touch points and the mouse and update the `VirtualPad` resource.
///
/// When no pointer is down at all every virtual control is released, so a
/// lost touch-end cannot leave a direction stuck.
pub fn update_virtual_pad(
    mut pad: ResMut<VirtualPad>,
    layout: Res<VirtualPadLayout>,
    rl: NonSend<raylib::RaylibHandle>,
    mut commands: Commands,
) {
    let mut pointers: ArrayVec<Vector2, MAX_POINTERS> = ArrayVec::new();
    let touches = rl.get_touch_point_count().max(0) as u32;
    for i in 0..touches {
        if pointers.try_push(rl.get_touch_position(i)).is_err() {
            break;
        }
    }
    if rl.is_mouse_button_down(MouseButton::MOUSE_BUTTON_LEFT) {
        let _ = pointers.try_push(rl.get_mouse_position());
    }

    let previous = *pad;
    pad.release_all();
    for p in &pointers {
        if let Some(control) = layout.hit_test(p.x, p.y) {
            pad.set(control, true);
        }
    }

    for control in EVENT_CONTROLS {
        let (was, is) = (previous.is_held(control), pad.is_held(control));
        if was != is {
            commands.trigger(InputEvent {
                action: control,
                pressed: is,
            });
        }
    }
}
