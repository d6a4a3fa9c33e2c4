//! Pixel position of an entity in map space.
//!
//! For the character this is the continuous, derived position: grid cell
//! times tile size when idle, interpolated while a step is in flight. The
//! jump offset is kept separately on [`Character`](super::character::Character)
//! and only applied when drawing.
use bevy_ecs::prelude::Component;
use raylib::prelude::Vector2;

use crate::resources::tilemap::Cell;

#[derive(Component, Clone, Copy, Debug)]
pub struct MapPosition {
    pub pos: Vector2,
}

impl MapPosition {
    /// Top-left corner of `cell`.
    pub fn from_cell(cell: Cell, tile_size: u32) -> Self {
        MapPosition {
            pos: cell_to_pixel(cell, tile_size),
        }
    }
}

/// Pixel coordinates of the top-left corner of `cell`.
pub fn cell_to_pixel(cell: Cell, tile_size: u32) -> Vector2 {
    let ts = tile_size as f32;
    Vector2 {
        x: cell.col as f32 * ts,
        y: cell.row as f32 * ts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cell_is_exact_multiple_of_tile_size() {
        let mp = MapPosition::from_cell(Cell::new(6, 5), 32);
        assert_eq!(mp.pos.x, 192.0);
        assert_eq!(mp.pos.y, 160.0);
    }
}
