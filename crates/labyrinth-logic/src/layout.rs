//! The layout generator: rooms + edges in, one tile per window cell out.
//!
//! ```
//! use labyrinth_logic::config::{GridWindow, LayoutConfig};
//! use labyrinth_logic::coords::GridPos;
//! use labyrinth_logic::layout::generate_layout;
//! use labyrinth_logic::room::{EdgeMap, Room, RoomMap};
//! use labyrinth_logic::tiles::TileType;
//!
//! let origin = GridPos::new(0, 0);
//! let mut rooms = RoomMap::new();
//! rooms.insert(origin, Room { owner: Some("guest".into()), ..Room::empty(origin) });
//!
//! let layout = generate_layout(&rooms, &EdgeMap::new(), GridWindow::zero_based(1), &LayoutConfig::default());
//! assert_eq!(layout.get(origin).unwrap().kind, TileType::DoorFrame);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{GridWindow, LayoutConfig};
use crate::constants::TILE_SIZE;
use crate::coords::GridPos;
use crate::raster::CellActivity;
use crate::room::{EdgeMap, RoomMap};
use crate::tiles::{resolve_tile, Connections, Rotation, Tile, TileType};
use crate::vibe::Variant;

/// A dense tile map over one window.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    window: GridWindow,
    tiles: BTreeMap<GridPos, Tile>,
}

/// Compute the tile for every coordinate in `window`.
///
/// Pure: the same snapshot always yields the same layout. Cells activated
/// outside the window influence their in-window neighbors but are not
/// emitted themselves.
pub fn generate_layout(
    rooms: &RoomMap,
    edges: &EdgeMap,
    window: GridWindow,
    config: &LayoutConfig,
) -> Layout {
    let activity = CellActivity::accumulate(rooms, edges, config);

    let tiles: BTreeMap<GridPos, Tile> = window
        .coords()
        .map(|pos| (pos, resolve_tile(pos, &activity, rooms)))
        .collect();

    let layout = Layout { window, tiles };
    log::debug!(
        "layout {:?} size {}: {} active cells, {} edges rasterized, {} skipped, {} non-void tiles",
        window.mode,
        window.size,
        activity.active_count(),
        activity.rasterized_edges,
        activity.skipped_edges,
        layout.non_void().count()
    );
    layout
}

/// World placement of a tile for renderers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileTransform {
    /// `(x * TILE_SIZE, 0, y * TILE_SIZE)`
    pub translation: [f32; 3],
    /// Rotation about the vertical axis.
    pub yaw_radians: f32,
}

impl Layout {
    pub fn window(&self) -> GridWindow {
        self.window
    }

    pub fn get(&self, pos: GridPos) -> Option<&Tile> {
        self.tiles.get(&pos)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tiles a renderer builds geometry for.
    pub fn non_void(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values().filter(|t| !t.kind.is_void())
    }

    pub fn count(&self, kind: TileType) -> usize {
        self.tiles.values().filter(|t| t.kind == kind).count()
    }

    pub fn world_transform(&self, pos: GridPos) -> Option<TileTransform> {
        self.get(pos).map(|t| TileTransform {
            translation: [t.pos.x as f32 * TILE_SIZE, 0.0, t.pos.y as f32 * TILE_SIZE],
            yaw_radians: t.rotation.radians(),
        })
    }

    /// Wire records keyed `"x-y"`.
    pub fn to_records(&self) -> BTreeMap<GridPos, TileRecord> {
        self.tiles
            .iter()
            .map(|(pos, tile)| (*pos, TileRecord::from(tile)))
            .collect()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.to_records())
    }

    /// One character per cell, one line per row (north at the top).
    pub fn ascii(&self) -> String {
        let (start, end) = (self.window.start(), self.window.end());
        let mut out = String::with_capacity(self.window.area() * 4);
        for y in start..end {
            for x in start..end {
                out.push(self.get(GridPos::new(x, y)).map_or(' ', glyph));
            }
            out.push('\n');
        }
        out
    }
}

fn glyph(tile: &Tile) -> char {
    match (tile.kind, tile.rotation) {
        (TileType::Void, _) => '.',
        (TileType::DoorFrame, _) => '#',
        (TileType::X, _) => '+',
        (TileType::T, _) => 'T',
        (TileType::Straight, Rotation::R0 | Rotation::R180) => '|',
        (TileType::Straight, _) => '-',
        (TileType::Corner, Rotation::R0) => '└',
        (TileType::Corner, Rotation::R90) => '┌',
        (TileType::Corner, Rotation::R180) => '┐',
        (TileType::Corner, Rotation::R270) => '┘',
        (TileType::HallEnd, _) => 'o',
    }
}

/// A tile as renderers and the collision layer receive it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileRecord {
    pub id: GridPos,
    pub x: i32,
    pub y: i32,
    #[serde(rename = "type")]
    pub kind: TileType,
    pub rotation: u16,
    pub connections: Connections,
    pub traffic_strength: f32,
    pub variant: Variant,
}

impl From<&Tile> for TileRecord {
    fn from(t: &Tile) -> Self {
        Self {
            id: t.pos,
            x: t.pos.x,
            y: t.pos.y,
            kind: t.kind,
            rotation: t.rotation.degrees(),
            connections: t.connections,
            traffic_strength: t.traffic_strength,
            variant: t.variant,
        }
    }
}
