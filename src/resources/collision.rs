//! Collision oracle.
//!
//! Pure predicates over an immutable [`TileMap`] plus caller-supplied sets.
//! Nothing in here mutates state: the set of already collected items is owned
//! by the session layer and handed in through the [`CollectedLookup`]
//! capability.

use std::collections::HashSet;

use rustc_hash::FxHashSet;

use crate::resources::tilemap::{Cell, TileMap};

/// Read-only view of which collectible indices are already taken.
pub trait CollectedLookup {
    fn is_collected(&self, index: u32) -> bool;
}

impl CollectedLookup for FxHashSet<u32> {
    fn is_collected(&self, index: u32) -> bool {
        self.contains(&index)
    }
}

impl CollectedLookup for HashSet<u32> {
    fn is_collected(&self, index: u32) -> bool {
        self.contains(&index)
    }
}

impl CollectedLookup for [u32] {
    fn is_collected(&self, index: u32) -> bool {
        self.contains(&index)
    }
}

/// Nothing collected yet.
pub struct NoneCollected;

impl CollectedLookup for NoneCollected {
    fn is_collected(&self, _index: u32) -> bool {
        false
    }
}

/// Whether the character may step onto `target`.
///
/// Bounds are checked first, then the layered walkability of the tile grid.
pub fn can_enter(map: &TileMap, target: Cell) -> bool {
    map.contains(target) && map.is_walkable(target)
}

/// First collectible on `cell` that is not excluded, by its index.
pub fn collectible_at<C>(map: &TileMap, cell: Cell, excluded: &C) -> Option<u32>
where
    C: CollectedLookup + ?Sized,
{
    map.collectibles()
        .iter()
        .find(|c| c.cell == cell && !excluded.is_collected(c.index))
        .map(|c| c.index)
}

/// Entrance of a structure: horizontally centred, one row below its south
/// edge.
pub fn goal_door(goal_anchor: Cell, footprint: (u32, u32)) -> Cell {
    let (w, h) = footprint;
    goal_anchor.offset((w / 2) as i32, h as i32)
}

pub fn is_goal_reached(cell: Cell, goal_anchor: Cell, footprint: (u32, u32)) -> bool {
    cell == goal_door(goal_anchor, footprint)
}

/// Door cell of the map's goal structure, if the map has one.
pub fn map_goal_door(map: &TileMap) -> Option<Cell> {
    let anchor = map.goal_anchor()?;
    let footprint = map.goal_footprint()?;
    Some(goal_door(anchor, footprint))
}

/// Whether any orthogonal neighbour of `cell` is water on the ground layer.
pub fn is_adjacent_to_water(map: &TileMap, cell: Cell) -> bool {
    cell.neighbors()
        .iter()
        .any(|n| map.ground_at(*n).is_some_and(|kind| kind.is_water()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::tilemap::{Collectible, TileKind};

    fn map_with_items() -> TileMap {
        let mut map = TileMap::new_filled(10, 10, 32, TileKind::Grass).unwrap();
        for (col, row, index) in [(2, 2, 0), (5, 5, 1), (5, 5, 2)] {
            map.add_collectible(Collectible {
                cell: Cell::new(col, row),
                index,
            })
            .unwrap();
        }
        map
    }

    #[test]
    fn test_can_enter_rejects_outside_map() {
        let map = map_with_items();
        assert!(!can_enter(&map, Cell::new(-1, 5)));
        assert!(!can_enter(&map, Cell::new(10, 5)));
        assert!(!can_enter(&map, Cell::new(5, 10)));
        assert!(can_enter(&map, Cell::new(9, 9)));
    }

    #[test]
    fn test_collectible_at_skips_excluded() {
        let map = map_with_items();
        assert_eq!(collectible_at(&map, Cell::new(2, 2), &NoneCollected), Some(0));
        assert_eq!(collectible_at(&map, Cell::new(3, 2), &NoneCollected), None);

        let mut taken = FxHashSet::default();
        taken.insert(1);
        assert_eq!(collectible_at(&map, Cell::new(5, 5), &taken), Some(2));
        taken.insert(2);
        assert_eq!(collectible_at(&map, Cell::new(5, 5), &taken), None);

        let slice: &[u32] = &[0];
        assert_eq!(collectible_at(&map, Cell::new(2, 2), slice), None);
    }

    #[test]
    fn test_queries_are_repeatable() {
        let map = map_with_items();
        let taken: HashSet<u32> = [0].into_iter().collect();
        for _ in 0..3 {
            assert!(can_enter(&map, Cell::new(4, 4)));
            assert_eq!(collectible_at(&map, Cell::new(5, 5), &taken), Some(1));
            assert!(is_goal_reached(Cell::new(1, 3), Cell::new(0, 0), (3, 3)));
        }
    }

    #[test]
    fn test_goal_is_only_the_centre_bottom_door() {
        let anchor = Cell::new(0, 0);
        assert!(is_goal_reached(Cell::new(1, 3), anchor, (3, 3)));
        assert!(!is_goal_reached(Cell::new(0, 3), anchor, (3, 3)));
        assert!(!is_goal_reached(Cell::new(2, 3), anchor, (3, 3)));
        assert!(!is_goal_reached(Cell::new(1, 2), anchor, (3, 3)));
    }

    #[test]
    fn test_map_goal_door_uses_structure_footprint() {
        let mut map = TileMap::new_filled(10, 10, 32, TileKind::Grass).unwrap();
        assert_eq!(map_goal_door(&map), None);
        map.place_object(Cell::new(4, 1), TileKind::House).unwrap();
        map.set_goal_anchor(Cell::new(4, 1)).unwrap();
        assert_eq!(map_goal_door(&map), Some(Cell::new(5, 4)));
    }

    #[test]
    fn test_water_adjacency_is_orthogonal_only() {
        let mut map = TileMap::new_filled(5, 5, 32, TileKind::Grass).unwrap();
        map.set_ground(Cell::new(2, 2), TileKind::Water).unwrap();
        assert!(is_adjacent_to_water(&map, Cell::new(2, 1)));
        assert!(is_adjacent_to_water(&map, Cell::new(1, 2)));
        assert!(is_adjacent_to_water(&map, Cell::new(3, 2)));
        assert!(is_adjacent_to_water(&map, Cell::new(2, 3)));
        assert!(!is_adjacent_to_water(&map, Cell::new(1, 1)));
        assert!(!is_adjacent_to_water(&map, Cell::new(2, 2)));
        assert!(!is_adjacent_to_water(&map, Cell::new(0, 0)));
    }

    #[test]
    fn test_water_adjacency_far_off_the_map_is_false() {
        let mut map = TileMap::new_filled(5, 5, 32, TileKind::Grass).unwrap();
        map.set_ground(Cell::new(4, 0), TileKind::Water).unwrap();
        assert!(!is_adjacent_to_water(&map, Cell::new(i32::MAX, 0)));
        assert!(!is_adjacent_to_water(&map, Cell::new(i32::MIN, i32::MIN)));
        assert!(is_adjacent_to_water(&map, Cell::new(5, 0)));
    }
}
