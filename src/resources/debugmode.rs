//! Debug toggle resource.
//!
//! The mere presence of this resource enables the debug overlay (camera
//! offset, visible range, grid cell, motion phase). Remove it to hide it.

use bevy_ecs::prelude::Resource;

/// Marker resource: when present, the renderer draws the debug overlay.
#[derive(Resource, Clone, Copy)]
pub struct DebugMode {}
