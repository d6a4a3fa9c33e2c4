//! Input resources.
//!
//! Two independent sources feed the game:
//! - [`InputState`] – keyboard keys, written by the raylib polling system
//! - [`VirtualPad`] – on-screen D-pad and buttons driven by touch or mouse
//!
//! Neither is read by gameplay directly. Once per tick the first system of
//! the frame schedule merges them into [`ControlState`] (keyboard OR pad),
//! which is what the character controller samples.
use bevy_ecs::prelude::*;
use raylib::prelude::*;

/// Logical controls understood by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Up,
    Down,
    Left,
    Right,
    Action,
    Jump,
}

impl Control {
    pub const ALL: [Control; 6] = [
        Control::Up,
        Control::Down,
        Control::Left,
        Control::Right,
        Control::Action,
        Control::Jump,
    ];

    /// Directions in the order the controller checks them.
    pub const DIRECTIONS: [Control; 4] = [Control::Up, Control::Down, Control::Left, Control::Right];

    const fn slot(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy)]
/// Boolean key state with its keyboard bindings.
pub struct BoolState {
    /// Whether either bound key is held this frame.
    pub active: bool,
    /// Whether the key went down this frame.
    pub just_pressed: bool,
    /// Whether the key went up this frame.
    pub just_released: bool,

    pub key_binding: KeyboardKey,
    /// Second key for the same control (arrow keys next to WASD).
    pub alt_binding: KeyboardKey,
}

impl Default for BoolState {
    fn default() -> Self {
        Self::bound(KeyboardKey::KEY_NULL, KeyboardKey::KEY_NULL)
    }
}

impl BoolState {
    pub fn bound(key_binding: KeyboardKey, alt_binding: KeyboardKey) -> Self {
        Self {
            active: false,
            just_pressed: false,
            just_released: false,
            key_binding,
            alt_binding,
        }
    }

    /// Record the held state for this frame and derive the edges.
    pub fn set(&mut self, down: bool) {
        self.just_pressed = down && !self.active;
        self.just_released = !down && self.active;
        self.active = down;
    }
}

/// Resource capturing the per-frame keyboard state.
#[derive(Resource, Debug, Clone)]
pub struct InputState {
    pub up: BoolState,
    pub down: BoolState,
    pub left: BoolState,
    pub right: BoolState,
    pub action: BoolState,
    pub jump: BoolState,
    pub mode_debug: BoolState,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            up: BoolState::bound(KeyboardKey::KEY_W, KeyboardKey::KEY_UP),
            down: BoolState::bound(KeyboardKey::KEY_S, KeyboardKey::KEY_DOWN),
            left: BoolState::bound(KeyboardKey::KEY_A, KeyboardKey::KEY_LEFT),
            right: BoolState::bound(KeyboardKey::KEY_D, KeyboardKey::KEY_RIGHT),
            action: BoolState::bound(KeyboardKey::KEY_ENTER, KeyboardKey::KEY_E),
            jump: BoolState::bound(KeyboardKey::KEY_SPACE, KeyboardKey::KEY_J),
            mode_debug: BoolState::bound(KeyboardKey::KEY_F11, KeyboardKey::KEY_NULL),
        }
    }
}

impl InputState {
    pub fn get(&self, control: Control) -> &BoolState {
        match control {
            Control::Up => &self.up,
            Control::Down => &self.down,
            Control::Left => &self.left,
            Control::Right => &self.right,
            Control::Action => &self.action,
            Control::Jump => &self.jump,
        }
    }

    pub fn get_mut(&mut self, control: Control) -> &mut BoolState {
        match control {
            Control::Up => &mut self.up,
            Control::Down => &mut self.down,
            Control::Left => &mut self.left,
            Control::Right => &mut self.right,
            Control::Action => &mut self.action,
            Control::Jump => &mut self.jump,
        }
    }
}

/// Held flags written by the on-screen controls.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct VirtualPad {
    held: [bool; 6],
}

impl VirtualPad {
    pub fn set(&mut self, control: Control, pressed: bool) {
        self.held[control.slot()] = pressed;
    }

    pub fn is_held(&self, control: Control) -> bool {
        self.held[control.slot()]
    }

    /// Fail-safe for missed touch-end events: drop every virtual press.
    pub fn release_all(&mut self) {
        self.held = [false; 6];
    }
}

/// Axis-aligned screen rectangle of one on-screen button.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PadRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl PadRect {
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.w && py >= self.y && py < self.y + self.h
    }
}

/// Where the on-screen controls sit: a D-pad in the bottom-left corner and
/// the action/jump buttons in the bottom-right one.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct VirtualPadLayout {
    buttons: [(Control, PadRect); 6],
}

impl VirtualPadLayout {
    pub fn for_viewport(width: f32, height: f32, button: f32) -> Self {
        let margin = button * 0.5;
        // centre cell of the 3x3 D-pad grid
        let cx = margin + button;
        let cy = height - margin - 2.0 * button;
        let rect = |x: f32, y: f32| PadRect {
            x,
            y,
            w: button,
            h: button,
        };
        Self {
            buttons: [
                (Control::Up, rect(cx, cy - button)),
                (Control::Down, rect(cx, cy + button)),
                (Control::Left, rect(cx - button, cy)),
                (Control::Right, rect(cx + button, cy)),
                (
                    Control::Action,
                    rect(width - margin - 2.0 * button, height - margin - button),
                ),
                (
                    Control::Jump,
                    rect(width - margin - button, height - margin - 2.0 * button),
                ),
            ],
        }
    }

    pub fn buttons(&self) -> &[(Control, PadRect)] {
        &self.buttons
    }

    /// Control under a screen point, if any.
    pub fn hit_test(&self, px: f32, py: f32) -> Option<Control> {
        self.buttons
            .iter()
            .find(|(_, r)| r.contains(px, py))
            .map(|(c, _)| *c)
    }
}

/// Merged view of both sources, sampled once per tick.
///
/// Keeps the previous tick's values so rising edges can be detected without
/// depending on the keyboard's own edge flags.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct ControlState {
    held: [bool; 6],
    previous: [bool; 6],
}

impl ControlState {
    /// Take this tick's snapshot: keyboard OR virtual pad, per control.
    pub fn sample(&mut self, keyboard: &InputState, pad: &VirtualPad) {
        self.previous = self.held;
        for control in Control::ALL {
            self.held[control.slot()] = keyboard.get(control).active || pad.is_held(control);
        }
    }

    pub fn is_held(&self, control: Control) -> bool {
        self.held[control.slot()]
    }

    /// Held now but not on the previous sample.
    pub fn just_pressed(&self, control: Control) -> bool {
        self.held[control.slot()] && !self.previous[control.slot()]
    }

    /// First held direction in priority order up > down > left > right.
    pub fn direction(&self) -> Option<Control> {
        Control::DIRECTIONS.into_iter().find(|c| self.is_held(*c))
    }

    /// Forget everything, including the previous sample.
    pub fn clear(&mut self) {
        *self = ControlState::default();
    }
}
