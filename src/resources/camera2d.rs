//! Camera and viewport culling resources.
//!
//! [`GameCamera`] holds the pixel offset of the view into the map and
//! [`VisibleRange`] the block of cells the renderer should draw. Both are
//! recomputed every tick by [`crate::systems::camera::update_camera`] from the
//! character's pixel position; nothing else writes them.

use bevy_ecs::prelude::Resource;
use raylib::prelude::{Camera2D, Vector2};

use crate::resources::tilemap::Cell;

/// Pixel offset of the top-left corner of the view, in map space.
#[derive(Resource, Debug, Clone, Copy)]
pub struct GameCamera {
    pub offset: Vector2,
}

impl Default for GameCamera {
    fn default() -> Self {
        GameCamera {
            offset: Vector2 { x: 0.0, y: 0.0 },
        }
    }
}

impl GameCamera {
    /// Equivalent raylib camera: map space shifted by `-offset`, no zoom.
    pub fn to_raylib(&self) -> Camera2D {
        Camera2D {
            offset: Vector2 { x: 0.0, y: 0.0 },
            target: self.offset,
            rotation: 0.0,
            zoom: 1.0,
        }
    }
}

/// Cells to draw this frame, half-open on the end side.
///
/// `start_*` is never negative; `end_*` is not clamped to the map, consumers
/// must bound-check.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibleRange {
    pub start_col: i32,
    pub start_row: i32,
    pub end_col: i32,
    pub end_row: i32,
}

impl VisibleRange {
    pub fn contains(&self, cell: Cell) -> bool {
        cell.col >= self.start_col
            && cell.col < self.end_col
            && cell.row >= self.start_row
            && cell.row < self.end_row
    }

    /// Cells of the range that fall inside a `width × height` map, row-major.
    pub fn cells_within(&self, width: u32, height: u32) -> impl Iterator<Item = Cell> {
        let end_col = self.end_col.min(width as i32);
        let end_row = self.end_row.min(height as i32);
        let start_col = self.start_col;
        (self.start_row..end_row)
            .flat_map(move |row| (start_col..end_col).map(move |col| Cell::new(col, row)))
    }
}

/// Camera offset centring the character sprite, clamped to the map.
///
/// Per axis: `max(0, min(ideal, map - viewport))`. The lower bound is applied
/// last, so a map smaller than the viewport pins the offset to 0.
pub fn camera_offset(
    player_px: Vector2,
    map_px: (f32, f32),
    viewport: (f32, f32),
    tile_size: f32,
) -> Vector2 {
    let axis = |pos: f32, map: f32, view: f32| {
        let ideal = pos + tile_size / 2.0 - view / 2.0;
        let max = map - view;
        0.0_f32.max(ideal.min(max))
    };
    Vector2 {
        x: axis(player_px.x, map_px.0, viewport.0),
        y: axis(player_px.y, map_px.1, viewport.1),
    }
}

/// Cells covered by the viewport at `offset`, with one cell of margin before
/// and two after to hide partial-tile scroll.
pub fn visible_range(offset: Vector2, viewport: (f32, f32), tile_size: f32) -> VisibleRange {
    let start_col = (offset.x / tile_size).floor() as i32 - 1;
    let start_row = (offset.y / tile_size).floor() as i32 - 1;
    let end_col = start_col + (viewport.0 / tile_size).ceil() as i32 + 2;
    let end_row = start_row + (viewport.1 / tile_size).ceil() as i32 + 2;
    VisibleRange {
        start_col: start_col.max(0),
        start_row: start_row.max(0),
        end_col,
        end_row,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, y: f32) -> Vector2 {
        Vector2 { x, y }
    }

    #[test]
    fn test_camera_centres_player_in_the_middle_of_the_map() {
        // 40x30 map of 32px tiles, 960x704 viewport, player at (19, 15)
        let off = camera_offset(v(608.0, 480.0), (1280.0, 960.0), (960.0, 704.0), 32.0);
        assert_eq!(off.x, 608.0 + 16.0 - 480.0);
        assert_eq!(off.y, 480.0 + 16.0 - 352.0);
    }

    #[test]
    fn test_camera_clamps_to_map_edges() {
        let off = camera_offset(v(0.0, 0.0), (1280.0, 960.0), (960.0, 704.0), 32.0);
        assert_eq!((off.x, off.y), (0.0, 0.0));
        let off = camera_offset(v(1248.0, 928.0), (1280.0, 960.0), (960.0, 704.0), 32.0);
        assert_eq!((off.x, off.y), (320.0, 256.0));
    }

    #[test]
    fn test_camera_is_zero_when_map_equals_viewport() {
        for px in [0.0, 100.0, 287.0, 448.0, 608.0] {
            let off = camera_offset(v(px, px), (640.0, 640.0), (640.0, 640.0), 32.0);
            assert_eq!((off.x, off.y), (0.0, 0.0), "player at {px}");
        }
    }

    #[test]
    fn test_camera_never_goes_negative_when_map_is_smaller_than_viewport() {
        let off = camera_offset(v(64.0, 64.0), (320.0, 320.0), (640.0, 480.0), 32.0);
        assert_eq!((off.x, off.y), (0.0, 0.0));
    }

    #[test]
    fn test_visible_range_margins() {
        let range = visible_range(v(0.0, 0.0), (960.0, 704.0), 32.0);
        assert_eq!(
            range,
            VisibleRange {
                start_col: 0,
                start_row: 0,
                end_col: 31,
                end_row: 23,
            }
        );

        let range = visible_range(v(144.0, 40.0), (960.0, 704.0), 32.0);
        assert_eq!(range.start_col, 3);
        assert_eq!(range.start_row, 0);
        assert_eq!(range.end_col, 3 + 30 + 2);
        assert_eq!(range.end_row, 22 + 2);
    }

    #[test]
    fn test_visible_range_end_is_not_clamped_but_cells_are() {
        let range = visible_range(v(320.0, 256.0), (960.0, 704.0), 32.0);
        assert_eq!(range.end_col, 9 + 30 + 2);
        assert!(range.end_col > 40);
        let cells: Vec<Cell> = range.cells_within(40, 30).collect();
        assert!(cells.iter().all(|c| c.col < 40 && c.row < 30));
        assert_eq!(cells.len(), (40 - 9) * (30 - 7));
        assert!(range.contains(Cell::new(9, 7)));
        assert!(!range.contains(Cell::new(8, 7)));
    }
}
