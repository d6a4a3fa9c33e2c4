//! Viewport size resource.
//!
//! The on-screen pixel window through which the map is observed. Camera
//! clamping and culling both read it.

use bevy_ecs::prelude::Resource;

/// Viewport size in pixels.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct ScreenSize {
    /// Width in pixels.
    pub w: i32,
    /// Height in pixels.
    pub h: i32,
}

impl ScreenSize {
    pub fn as_f32(&self) -> (f32, f32) {
        (self.w as f32, self.h as f32)
    }
}
