//! Tile grid model.
//!
//! A [`TileMap`] is a `width × height` grid with three stacked layers:
//! - **ground** – always populated, one [`TileKind`] per cell
//! - **objects** – sparse; a kind stored at a cell is the *anchor* (top-left)
//!   of an object whose footprint may cover several cells
//! - **overhead** – sparse, drawn above the character, never blocks
//!
//! Maps are immutable once handed to the core. Every constructor and mutator
//! here validates its input so the collision queries can assume a well-formed
//! grid (no footprint runs off the edge, ground never empty).
//!
//! Maps are usually loaded from JSON (see [`MapFile`]), where each layer is a
//! list of row strings using the symbols of [`TileKind::from_symbol`].

use std::fmt;
use std::path::{Path, PathBuf};

use arrayvec::ArrayVec;
use bevy_ecs::prelude::Resource;
use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Integer grid coordinate, 0-indexed from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

impl Cell {
    pub const fn new(col: i32, row: i32) -> Self {
        Cell { col, row }
    }

    /// Cell displaced by `(dcol, drow)`, saturating at the `i32` range.
    pub const fn offset(self, dcol: i32, drow: i32) -> Self {
        Cell {
            col: self.col.saturating_add(dcol),
            row: self.row.saturating_add(drow),
        }
    }

    /// The four orthogonal neighbours: up, down, left, right.
    pub const fn neighbors(self) -> [Cell; 4] {
        [
            self.offset(0, -1),
            self.offset(0, 1),
            self.offset(-1, 0),
            self.offset(1, 0),
        ]
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// Every kind of tile a map can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    // Ground
    Grass,
    GrassFlowers,
    DirtPath,
    PavedPath,
    Water,
    /// Plain grass marking where a collectible was authored.
    HeartSpawn,
    // Objects
    Tree,
    Bush,
    Rock,
    Fence,
    House,
}

/// Static attributes of a [`TileKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileDef {
    pub walkable: bool,
    /// `(width_cells, height_cells)` covered from the anchor cell.
    pub footprint: (u32, u32),
    pub visual_key: &'static str,
}

impl TileKind {
    /// Largest footprint of any kind; bounds the anchor scan in
    /// [`TileMap::occupants`].
    pub const MAX_FOOTPRINT: (u32, u32) = (3, 3);

    pub const fn def(self) -> TileDef {
        let (walkable, footprint, visual_key) = match self {
            TileKind::Grass => (true, (1, 1), "grass"),
            TileKind::GrassFlowers => (true, (1, 1), "grass_flowers"),
            TileKind::DirtPath => (true, (1, 1), "dirt_path"),
            TileKind::PavedPath => (true, (1, 1), "paved_path"),
            TileKind::Water => (false, (1, 1), "water"),
            TileKind::HeartSpawn => (true, (1, 1), "grass"),
            TileKind::Tree => (false, (1, 2), "tree"),
            TileKind::Bush => (false, (1, 1), "bush"),
            TileKind::Rock => (false, (1, 1), "rock"),
            TileKind::Fence => (false, (1, 1), "fence"),
            TileKind::House => (false, (3, 3), "house"),
        };
        TileDef {
            walkable,
            footprint,
            visual_key,
        }
    }

    pub const fn is_walkable(self) -> bool {
        self.def().walkable
    }

    pub const fn footprint(self) -> (u32, u32) {
        self.def().footprint
    }

    pub const fn visual_key(self) -> &'static str {
        self.def().visual_key
    }

    /// Whether this kind belongs on the ground layer (the rest are objects).
    pub const fn is_ground(self) -> bool {
        matches!(
            self,
            TileKind::Grass
                | TileKind::GrassFlowers
                | TileKind::DirtPath
                | TileKind::PavedPath
                | TileKind::Water
                | TileKind::HeartSpawn
        )
    }

    pub const fn is_water(self) -> bool {
        matches!(self, TileKind::Water)
    }

    /// Parse a map-file symbol. `'.'` (empty) is not a kind and yields `None`.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        let kind = match symbol {
            'g' => TileKind::Grass,
            'f' => TileKind::GrassFlowers,
            'd' => TileKind::DirtPath,
            'p' => TileKind::PavedPath,
            'w' => TileKind::Water,
            'h' => TileKind::HeartSpawn,
            'T' => TileKind::Tree,
            'B' => TileKind::Bush,
            'R' => TileKind::Rock,
            'F' => TileKind::Fence,
            'H' => TileKind::House,
            _ => return None,
        };
        Some(kind)
    }

    pub const fn symbol(self) -> char {
        match self {
            TileKind::Grass => 'g',
            TileKind::GrassFlowers => 'f',
            TileKind::DirtPath => 'd',
            TileKind::PavedPath => 'p',
            TileKind::Water => 'w',
            TileKind::HeartSpawn => 'h',
            TileKind::Tree => 'T',
            TileKind::Bush => 'B',
            TileKind::Rock => 'R',
            TileKind::Fence => 'F',
            TileKind::House => 'H',
        }
    }
}

/// Symbol for an empty cell on the object and overhead layers.
pub const EMPTY_SYMBOL: char = '.';

/// A fixed-position pickup. Whether it was collected is tracked elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collectible {
    #[serde(flatten)]
    pub cell: Cell,
    pub index: u32,
}

/// Decorative text drawn on the map (street names). Never blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    #[serde(flatten)]
    pub cell: Cell,
    /// Degrees, 0 = horizontal.
    #[serde(default)]
    pub rotation: f32,
}

/// Errors raised while building or loading a [`TileMap`].
#[derive(Debug, Error)]
pub enum MapError {
    #[error("failed to read map file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid map JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("map must have a non-zero size, got {width}x{height}")]
    ZeroSize { width: u32, height: u32 },
    #[error("tile size must be non-zero")]
    ZeroTileSize,
    #[error("map of {width}x{height} cells of {tile_size}px is too large")]
    TooLarge {
        width: u32,
        height: u32,
        tile_size: u32,
    },
    #[error("{layer} layer has {actual} rows, expected {expected}")]
    RowCount {
        layer: &'static str,
        expected: u32,
        actual: usize,
    },
    #[error("{layer} layer row {row} has {actual} cells, expected {expected}")]
    RowWidth {
        layer: &'static str,
        row: usize,
        expected: u32,
        actual: usize,
    },
    #[error("unknown tile symbol '{symbol}' in {layer} layer at {cell}")]
    UnknownSymbol {
        layer: &'static str,
        symbol: char,
        cell: Cell,
    },
    #[error("ground cell {0} is empty")]
    EmptyGround(Cell),
    #[error("{kind:?} cannot be placed on the {layer} layer")]
    WrongLayer { kind: TileKind, layer: &'static str },
    #[error("{kind:?} anchored at {anchor} runs off the map edge")]
    FootprintOutOfBounds { kind: TileKind, anchor: Cell },
    #[error("{what} at {cell} is outside the map")]
    OutOfBounds { what: &'static str, cell: Cell },
    #[error("goal anchor {0} does not hold a multi-cell structure")]
    GoalWithoutStructure(Cell),
    #[error("collectible index {0} is used more than once")]
    DuplicateCollectible(u32),
}

/// Most cells a map may hold.
pub const MAX_CELLS: u32 = 1 << 22;

/// Reject empty or oversized dimensions and return the cell count. The pixel
/// extent of each side must also fit in a `u32`.
fn check_dimensions(width: u32, height: u32, tile_size: u32) -> Result<usize, MapError> {
    if width == 0 || height == 0 {
        return Err(MapError::ZeroSize { width, height });
    }
    if tile_size == 0 {
        return Err(MapError::ZeroTileSize);
    }
    let cells = width
        .checked_mul(height)
        .filter(|cells| *cells <= MAX_CELLS);
    let fits_pixels =
        width.checked_mul(tile_size).is_some() && height.checked_mul(tile_size).is_some();
    match cells {
        Some(cells) if fits_pixels => Ok(cells as usize),
        _ => Err(MapError::TooLarge {
            width,
            height,
            tile_size,
        }),
    }
}

/// On-disk map description. See the module docs for the symbol table.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MapFile {
    pub tile_size: u32,
    pub width: u32,
    pub height: u32,
    pub ground: Vec<String>,
    #[serde(default)]
    pub objects: Vec<String>,
    #[serde(default)]
    pub overhead: Vec<String>,
    pub player_spawn: Cell,
    #[serde(default)]
    pub goal_anchor: Option<Cell>,
    #[serde(default)]
    pub collectibles: Vec<Collectible>,
    #[serde(default)]
    pub labels: Vec<Label>,
}

/// The static map the core walks on.
#[derive(Resource, Debug, Clone)]
pub struct TileMap {
    width: u32,
    height: u32,
    tile_size: u32,
    ground: Vec<TileKind>,
    objects: Vec<Option<TileKind>>,
    overhead: Vec<Option<TileKind>>,
    player_spawn: Cell,
    goal_anchor: Option<Cell>,
    collectibles: Vec<Collectible>,
    labels: Vec<Label>,
}

impl TileMap {
    /// Create a map whose ground is entirely `ground`, with empty object and
    /// overhead layers and the spawn at `(0, 0)`.
    pub fn new_filled(
        width: u32,
        height: u32,
        tile_size: u32,
        ground: TileKind,
    ) -> Result<Self, MapError> {
        let len = check_dimensions(width, height, tile_size)?;
        if !ground.is_ground() {
            return Err(MapError::WrongLayer {
                kind: ground,
                layer: "ground",
            });
        }
        Ok(TileMap {
            width,
            height,
            tile_size,
            ground: vec![ground; len],
            objects: vec![None; len],
            overhead: vec![None; len],
            player_spawn: Cell::new(0, 0),
            goal_anchor: None,
            collectibles: Vec::new(),
            labels: Vec::new(),
        })
    }

    /// Build and validate a map from its file description.
    pub fn from_file(file: MapFile) -> Result<Self, MapError> {
        check_dimensions(file.width, file.height, file.tile_size)?;
        let ground = parse_layer("ground", &file.ground, file.width, file.height)?;
        let mut map = TileMap::new_filled(file.width, file.height, file.tile_size, TileKind::Grass)?;
        for (cell, kind) in ground {
            match kind {
                Some(kind) => map.set_ground(cell, kind)?,
                None => return Err(MapError::EmptyGround(cell)),
            }
        }
        if !file.objects.is_empty() {
            for (cell, kind) in parse_layer("objects", &file.objects, file.width, file.height)? {
                if let Some(kind) = kind {
                    map.place_object(cell, kind)?;
                }
            }
        }
        if !file.overhead.is_empty() {
            for (cell, kind) in parse_layer("overhead", &file.overhead, file.width, file.height)? {
                if let Some(kind) = kind {
                    map.place_overhead(cell, kind)?;
                }
            }
        }

        map.set_spawn(file.player_spawn)?;
        if let Some(anchor) = file.goal_anchor {
            map.set_goal_anchor(anchor)?;
        }
        for collectible in file.collectibles {
            map.add_collectible(collectible)?;
        }
        for label in file.labels {
            map.add_label(label)?;
        }
        Ok(map)
    }

    pub fn from_json_str(json: &str) -> Result<Self, MapError> {
        let file: MapFile = serde_json::from_str(json)?;
        TileMap::from_file(file)
    }

    /// Read, parse and validate a JSON map file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| MapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let map = TileMap::from_json_str(&json)?;
        info!(
            "Loaded map {}: {}x{} cells, {} collectibles",
            path.display(),
            map.width,
            map.height,
            map.collectibles.len()
        );
        Ok(map)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Map size in pixels.
    pub fn pixel_size(&self) -> (f32, f32) {
        let ts = self.tile_size as f32;
        (self.width as f32 * ts, self.height as f32 * ts)
    }

    pub fn player_spawn(&self) -> Cell {
        self.player_spawn
    }

    pub fn goal_anchor(&self) -> Option<Cell> {
        self.goal_anchor
    }

    /// Footprint of the structure sitting on the goal anchor.
    pub fn goal_footprint(&self) -> Option<(u32, u32)> {
        self.goal_anchor
            .and_then(|anchor| self.object_at(anchor))
            .map(TileKind::footprint)
    }

    pub fn collectibles(&self) -> &[Collectible] {
        &self.collectibles
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Whether `cell` lies within `[0, width) × [0, height)`.
    pub fn contains(&self, cell: Cell) -> bool {
        cell.col >= 0
            && cell.row >= 0
            && (cell.col as u32) < self.width
            && (cell.row as u32) < self.height
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        self.contains(cell)
            .then(|| cell.row as usize * self.width as usize + cell.col as usize)
    }

    pub fn ground_at(&self, cell: Cell) -> Option<TileKind> {
        self.index(cell).map(|i| self.ground[i])
    }

    /// The object anchored exactly at `cell`, ignoring footprints.
    pub fn object_at(&self, cell: Cell) -> Option<TileKind> {
        self.index(cell).and_then(|i| self.objects[i])
    }

    pub fn overhead_at(&self, cell: Cell) -> Option<TileKind> {
        self.index(cell).and_then(|i| self.overhead[i])
    }

    /// All objects whose footprint covers `cell`, as `(anchor, kind)` pairs.
    ///
    /// Anchors are searched up to `MAX_FOOTPRINT - 1` rows and columns before
    /// the queried cell.
    pub fn occupants(&self, cell: Cell) -> ArrayVec<(Cell, TileKind), 9> {
        let mut found = ArrayVec::new();
        if !self.contains(cell) {
            return found;
        }
        let (max_w, max_h) = TileKind::MAX_FOOTPRINT;
        let first_row = (cell.row - (max_h as i32 - 1)).max(0);
        let first_col = (cell.col - (max_w as i32 - 1)).max(0);
        for row in first_row..=cell.row {
            for col in first_col..=cell.col {
                let anchor = Cell::new(col, row);
                let Some(kind) = self.object_at(anchor) else {
                    continue;
                };
                let (w, h) = kind.footprint();
                if cell.col < col + w as i32 && cell.row < row + h as i32 {
                    found.push((anchor, kind));
                }
            }
        }
        found
    }

    /// A cell is walkable iff it is on the map, its ground tile is walkable
    /// and no object covering it is non-walkable.
    pub fn is_walkable(&self, cell: Cell) -> bool {
        let Some(ground) = self.ground_at(cell) else {
            return false;
        };
        ground.is_walkable()
            && self
                .occupants(cell)
                .iter()
                .all(|(_, kind)| kind.is_walkable())
    }

    pub fn set_ground(&mut self, cell: Cell, kind: TileKind) -> Result<(), MapError> {
        if !kind.is_ground() {
            return Err(MapError::WrongLayer {
                kind,
                layer: "ground",
            });
        }
        let i = self.index(cell).ok_or(MapError::OutOfBounds {
            what: "ground tile",
            cell,
        })?;
        self.ground[i] = kind;
        Ok(())
    }

    /// Anchor an object at `anchor`. Its whole footprint must fit on the map.
    pub fn place_object(&mut self, anchor: Cell, kind: TileKind) -> Result<(), MapError> {
        let i = self.checked_object_slot(anchor, kind, "objects")?;
        self.objects[i] = Some(kind);
        Ok(())
    }

    pub fn place_overhead(&mut self, anchor: Cell, kind: TileKind) -> Result<(), MapError> {
        let i = self.checked_object_slot(anchor, kind, "overhead")?;
        self.overhead[i] = Some(kind);
        Ok(())
    }

    fn checked_object_slot(
        &self,
        anchor: Cell,
        kind: TileKind,
        layer: &'static str,
    ) -> Result<usize, MapError> {
        if kind.is_ground() {
            return Err(MapError::WrongLayer { kind, layer });
        }
        let i = self.index(anchor).ok_or(MapError::OutOfBounds {
            what: "object anchor",
            cell: anchor,
        })?;
        let (w, h) = kind.footprint();
        let far_corner = anchor.offset(w as i32 - 1, h as i32 - 1);
        if !self.contains(far_corner) {
            return Err(MapError::FootprintOutOfBounds { kind, anchor });
        }
        Ok(i)
    }

    pub fn set_spawn(&mut self, cell: Cell) -> Result<(), MapError> {
        if !self.contains(cell) {
            return Err(MapError::OutOfBounds {
                what: "player spawn",
                cell,
            });
        }
        self.player_spawn = cell;
        Ok(())
    }

    /// Mark the structure anchored at `anchor` as the goal. A multi-cell
    /// object must already be placed there.
    pub fn set_goal_anchor(&mut self, anchor: Cell) -> Result<(), MapError> {
        if !self.contains(anchor) {
            return Err(MapError::OutOfBounds {
                what: "goal anchor",
                cell: anchor,
            });
        }
        let multi_cell = self
            .object_at(anchor)
            .is_some_and(|kind| kind.footprint() != (1, 1));
        if !multi_cell {
            return Err(MapError::GoalWithoutStructure(anchor));
        }
        self.goal_anchor = Some(anchor);
        Ok(())
    }

    pub fn add_collectible(&mut self, collectible: Collectible) -> Result<(), MapError> {
        if !self.contains(collectible.cell) {
            return Err(MapError::OutOfBounds {
                what: "collectible",
                cell: collectible.cell,
            });
        }
        if self.collectibles.iter().any(|c| c.index == collectible.index) {
            return Err(MapError::DuplicateCollectible(collectible.index));
        }
        self.collectibles.push(collectible);
        Ok(())
    }

    pub fn add_label(&mut self, label: Label) -> Result<(), MapError> {
        if !self.contains(label.cell) {
            return Err(MapError::OutOfBounds {
                what: "label",
                cell: label.cell,
            });
        }
        self.labels.push(label);
        Ok(())
    }
}

/// Parse a layer's row strings into `(cell, kind)` pairs in row-major order.
fn parse_layer(
    layer: &'static str,
    rows: &[String],
    width: u32,
    height: u32,
) -> Result<Vec<(Cell, Option<TileKind>)>, MapError> {
    if rows.len() != height as usize {
        return Err(MapError::RowCount {
            layer,
            expected: height,
            actual: rows.len(),
        });
    }
    let mut cells = Vec::with_capacity(rows.len() * width as usize);
    for (row, line) in rows.iter().enumerate() {
        let count = line.chars().count();
        if count != width as usize {
            return Err(MapError::RowWidth {
                layer,
                row,
                expected: width,
                actual: count,
            });
        }
        for (col, symbol) in line.chars().enumerate() {
            let cell = Cell::new(col as i32, row as i32);
            if symbol == EMPTY_SYMBOL {
                cells.push((cell, None));
                continue;
            }
            let kind = TileKind::from_symbol(symbol).ok_or(MapError::UnknownSymbol {
                layer,
                symbol,
                cell,
            })?;
            cells.push((cell, Some(kind)));
        }
    }
    Ok(cells)
}
