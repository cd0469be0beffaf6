//! Tile shapes and the auto-tiling decision table.
//!
//! A cell opens toward every active orthogonal neighbor. Claimed rooms become
//! door frames with whatever openings that gives them; other active cells are
//! classified by how many sides are open:
//!
//! | open | shape      | rotation                                   |
//! |------|------------|--------------------------------------------|
//! | 4    | `X`        | 0                                          |
//! | 3    | `T`        | closed N→180, E→270, S→0, W→90             |
//! | 2    | `Straight` | N+S→0, E+W→90                              |
//! | 2    | `Corner`   | N+E→0, E+S→90, S+W→180, W+N→270            |
//! | 1    | `HallEnd`  | open N→0, E→90, S→180, W→270               |
//! | 0    | `Void`     | isolated blip, keeps its traffic and style |
//!
//! Rows are checked top to bottom; within a row directions are tried in
//! N, E, S, W order and the first match wins.

use serde::{Deserialize, Serialize};

use crate::coords::{Direction, GridPos};
use crate::raster::CellActivity;
use crate::room::{claimed_room, RoomMap};
use crate::vibe::Variant;

/// Shape of a resolved cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TileType {
    Void,
    Straight,
    Corner,
    T,
    X,
    DoorFrame,
    HallEnd,
}

impl TileType {
    pub fn is_void(self) -> bool {
        self == TileType::Void
    }
}

/// Quarter-turn rotation about the vertical axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 90,
            Rotation::R180 => 180,
            Rotation::R270 => 270,
        }
    }

    pub fn radians(self) -> f32 {
        (self.degrees() as f32).to_radians()
    }

    pub fn from_degrees(degrees: u16) -> Option<Rotation> {
        match degrees {
            0 => Some(Rotation::R0),
            90 => Some(Rotation::R90),
            180 => Some(Rotation::R180),
            270 => Some(Rotation::R270),
            _ => None,
        }
    }
}

/// Which sides of a tile are open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Connections {
    #[serde(rename = "N")]
    pub n: bool,
    #[serde(rename = "E")]
    pub e: bool,
    #[serde(rename = "S")]
    pub s: bool,
    #[serde(rename = "W")]
    pub w: bool,
}

impl Connections {
    pub const CLOSED: Connections = Connections {
        n: false,
        e: false,
        s: false,
        w: false,
    };

    pub fn from_fn(mut open: impl FnMut(Direction) -> bool) -> Self {
        Self {
            n: open(Direction::N),
            e: open(Direction::E),
            s: open(Direction::S),
            w: open(Direction::W),
        }
    }

    pub fn is_open(&self, dir: Direction) -> bool {
        match dir {
            Direction::N => self.n,
            Direction::E => self.e,
            Direction::S => self.s,
            Direction::W => self.w,
        }
    }

    pub fn count(&self) -> usize {
        Direction::ALL.iter().filter(|&&d| self.is_open(d)).count()
    }

    pub fn open_dirs(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL.into_iter().filter(|&d| self.is_open(d))
    }
}

/// A resolved grid cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub pos: GridPos,
    pub kind: TileType,
    pub rotation: Rotation,
    pub connections: Connections,
    /// Accumulated traffic in [0, 1].
    pub traffic_strength: f32,
    pub variant: Variant,
}

impl Tile {
    pub fn void(pos: GridPos) -> Self {
        Self {
            pos,
            kind: TileType::Void,
            rotation: Rotation::R0,
            connections: Connections::CLOSED,
            traffic_strength: 0.0,
            variant: Variant::Neutral,
        }
    }
}

/// Shape and rotation of a corridor cell from its open sides.
pub fn classify(c: &Connections) -> (TileType, Rotation) {
    match c.count() {
        4 => (TileType::X, Rotation::R0),
        3 => {
            let rotation = if !c.n {
                Rotation::R180
            } else if !c.e {
                Rotation::R270
            } else if !c.s {
                Rotation::R0
            } else {
                Rotation::R90
            };
            (TileType::T, rotation)
        }
        2 => {
            if c.n && c.s {
                (TileType::Straight, Rotation::R0)
            } else if c.e && c.w {
                (TileType::Straight, Rotation::R90)
            } else {
                let rotation = if c.n && c.e {
                    Rotation::R0
                } else if c.e && c.s {
                    Rotation::R90
                } else if c.s && c.w {
                    Rotation::R180
                } else {
                    Rotation::R270
                };
                (TileType::Corner, rotation)
            }
        }
        1 => {
            let rotation = if c.n {
                Rotation::R0
            } else if c.e {
                Rotation::R90
            } else if c.s {
                Rotation::R180
            } else {
                Rotation::R270
            };
            (TileType::HallEnd, rotation)
        }
        _ => (TileType::Void, Rotation::R0),
    }
}

/// Resolve one coordinate against the accumulated activity.
pub fn resolve_tile(pos: GridPos, activity: &CellActivity<'_>, rooms: &RoomMap) -> Tile {
    if !activity.is_active(pos) {
        return Tile::void(pos);
    }

    let connections = Connections::from_fn(|d| activity.is_active(pos.neighbor(d)));

    let (kind, rotation) = if claimed_room(rooms, pos).is_some() {
        (TileType::DoorFrame, Rotation::R0)
    } else {
        classify(&connections)
    };

    Tile {
        pos,
        kind,
        rotation,
        connections,
        traffic_strength: activity.traffic(pos),
        variant: Variant::from_vibe(activity.influence(pos)),
    }
}
