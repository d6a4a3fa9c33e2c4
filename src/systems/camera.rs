//! Camera and viewport culling system.
use bevy_ecs::prelude::*;

use crate::components::character::Player;
use crate::components::mapposition::MapPosition;
use crate::resources::camera2d::{GameCamera, VisibleRange, camera_offset, visible_range};
use crate::resources::screensize::ScreenSize;
use crate::resources::tilemap::TileMap;

/// Recompute the camera offset from the player's current pixel position,
/// then the visible cell range from the camera.
///
/// Leaves both untouched when there is no player.
pub fn update_camera(
    map: Res<TileMap>,
    screen: Res<ScreenSize>,
    player: Query<&MapPosition, With<Player>>,
    mut camera: ResMut<GameCamera>,
    mut range: ResMut<VisibleRange>,
) {
    let Ok(position) = player.single() else {
        return;
    };
    let tile_size = map.tile_size() as f32;
    let viewport = screen.as_f32();
    camera.offset = camera_offset(position.pos, map.pixel_size(), viewport, tile_size);
    *range = visible_range(camera.offset, viewport, tile_size);
}
