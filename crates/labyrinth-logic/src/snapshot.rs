//! Wire format of room/edge snapshots and boundary validation.
//!
//! Rooms arrive keyed `"<x>-<y>"`, edges keyed `"<from>-><to>"`. Extra
//! fields the content pipeline attaches to rooms (images, assets, ...) are
//! ignored. Everything is checked here so the generator can stay total.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::coords::{EdgeKey, GridPos, KeyParseError};
use crate::room::{Edge, EdgeMap, Room, RoomMap};
use crate::vibe::{validate_vibe, Condition, VibeError, VibeVector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coords {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRecord {
    pub id: String,
    pub coords: Coords,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vibe_vector: Option<VibeVector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub from: String,
    pub to: String,
    pub traffic: f32,
}

/// A whole snapshot as exchanged with the state owner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotRecord {
    pub rooms: BTreeMap<String, RoomRecord>,
    pub edges: BTreeMap<String, EdgeRecord>,
}

/// Malformed or invalid snapshot data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SnapshotError {
    #[error("snapshot JSON error: {0}")]
    Json(String),
    #[error(transparent)]
    Key(#[from] KeyParseError),
    #[error("room key {key:?} does not match its coordinates {pos}")]
    RoomKeyMismatch { key: String, pos: GridPos },
    #[error("edge key {key:?} does not match its endpoints {endpoints}")]
    EdgeKeyMismatch { key: String, endpoints: EdgeKey },
    #[error("edge {edge} has invalid traffic {traffic}")]
    InvalidTraffic { edge: EdgeKey, traffic: f32 },
    #[error("room {room} has an invalid vibe ({} problems)", .errors.len())]
    InvalidVibe { room: GridPos, errors: Vec<VibeError> },
}

impl From<serde_json::Error> for SnapshotError {
    fn from(e: serde_json::Error) -> Self {
        SnapshotError::Json(e.to_string())
    }
}

/// Check a typed snapshot, returning every problem found.
pub fn validate_snapshot(rooms: &RoomMap, edges: &EdgeMap) -> Vec<SnapshotError> {
    let mut errors = Vec::new();

    for (key, room) in rooms {
        if *key != room.pos {
            errors.push(SnapshotError::RoomKeyMismatch {
                key: key.to_string(),
                pos: room.pos,
            });
        }
        if let Some(vibe) = &room.vibe {
            let problems = validate_vibe(vibe);
            if !problems.is_empty() {
                errors.push(SnapshotError::InvalidVibe {
                    room: room.pos,
                    errors: problems,
                });
            }
        }
    }
    for (key, edge) in edges {
        if *key != edge.key() {
            errors.push(SnapshotError::EdgeKeyMismatch {
                key: key.to_string(),
                endpoints: edge.key(),
            });
        }
        if !edge.has_valid_traffic() {
            errors.push(SnapshotError::InvalidTraffic {
                edge: edge.key(),
                traffic: edge.traffic,
            });
        }
    }

    errors
}

/// Convert wire records into typed maps, then validate them.
pub fn from_record(record: SnapshotRecord) -> Result<(RoomMap, EdgeMap), SnapshotError> {
    let mut rooms = RoomMap::new();
    for (key, r) in record.rooms {
        let pos: GridPos = key.parse()?;
        let id: GridPos = r.id.parse()?;
        if pos != GridPos::new(r.coords.x, r.coords.y) || id != pos {
            return Err(SnapshotError::RoomKeyMismatch { key, pos: id });
        }
        rooms.insert(
            pos,
            Room {
                pos,
                owner: r.owner,
                vibe: r.vibe_vector,
                condition: r.condition,
            },
        );
    }

    let mut edges = EdgeMap::new();
    for (key, e) in record.edges {
        let parsed: EdgeKey = key.parse()?;
        let edge = Edge::new(e.from.parse()?, e.to.parse()?, e.traffic);
        if parsed != edge.key() {
            return Err(SnapshotError::EdgeKeyMismatch {
                key,
                endpoints: edge.key(),
            });
        }
        edges.insert(parsed, edge);
    }

    match validate_snapshot(&rooms, &edges).into_iter().next() {
        Some(err) => Err(err),
        None => Ok((rooms, edges)),
    }
}

/// Convert typed maps back to wire records.
pub fn to_record(rooms: &RoomMap, edges: &EdgeMap) -> SnapshotRecord {
    SnapshotRecord {
        rooms: rooms
            .values()
            .map(|r| {
                (
                    r.pos.to_string(),
                    RoomRecord {
                        id: r.pos.to_string(),
                        coords: Coords {
                            x: r.pos.x,
                            y: r.pos.y,
                        },
                        owner: r.owner.clone(),
                        vibe_vector: r.vibe.clone(),
                        condition: r.condition,
                    },
                )
            })
            .collect(),
        edges: edges
            .values()
            .map(|e| {
                (
                    e.key().to_string(),
                    EdgeRecord {
                        from: e.from.to_string(),
                        to: e.to.to_string(),
                        traffic: e.traffic,
                    },
                )
            })
            .collect(),
    }
}

/// Parse a JSON snapshot `{"rooms": {...}, "edges": {...}}`.
pub fn parse_snapshot(json: &str) -> Result<(RoomMap, EdgeMap), SnapshotError> {
    let record: SnapshotRecord = serde_json::from_str(json)?;
    from_record(record)
}
