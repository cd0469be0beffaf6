//! Rooms and traffic edges, the inputs of the layout generator.

use std::collections::BTreeMap;

use crate::coords::{EdgeKey, GridPos};
use crate::vibe::{Condition, VariantKey, VibeVector};

/// Snapshot of every room, keyed by its cell.
pub type RoomMap = BTreeMap<GridPos, Room>;

/// Snapshot of every traffic edge, keyed by `(from, to)`.
pub type EdgeMap = BTreeMap<EdgeKey, Edge>;

/// A user-customizable cell. Unclaimed rooms carry no owner and no vibe.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub pos: GridPos,
    pub owner: Option<String>,
    pub vibe: Option<VibeVector>,
    pub condition: Option<Condition>,
}

impl Room {
    pub fn empty(pos: GridPos) -> Self {
        Self {
            pos,
            owner: None,
            vibe: None,
            condition: None,
        }
    }

    pub fn is_claimed(&self) -> bool {
        self.owner.is_some()
    }

    /// Asset variant for rooms that carry a vibe.
    pub fn variant_key(&self) -> Option<VariantKey> {
        self.vibe
            .as_ref()
            .map(|v| VariantKey::new(v, self.condition))
    }
}

/// Directed traffic between two cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub from: GridPos,
    pub to: GridPos,
    /// Non-negative; the state container caps it.
    pub traffic: f32,
}

impl Edge {
    pub fn new(from: GridPos, to: GridPos, traffic: f32) -> Self {
        Self { from, to, traffic }
    }

    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(self.from, self.to)
    }

    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }

    /// Finite and non-negative.
    pub fn has_valid_traffic(&self) -> bool {
        self.traffic.is_finite() && self.traffic >= 0.0
    }
}

/// Claimed room lookup; anything missing or unowned is unclaimed.
pub fn claimed_room(rooms: &RoomMap, pos: GridPos) -> Option<&Room> {
    rooms.get(&pos).filter(|r| r.is_claimed())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_room_is_unclaimed() {
        let r = Room::empty(GridPos::new(1, 2));
        assert!(!r.is_claimed());
        assert!(r.vibe.is_none());
        assert_eq!(r.variant_key(), None);
    }

    #[test]
    fn variant_key_uses_room_condition() {
        let r = Room {
            owner: Some("guest".to_string()),
            vibe: Some(VibeVector::fallback()),
            condition: Some(Condition::Dusty),
            ..Room::empty(GridPos::ORIGIN)
        };
        assert_eq!(r.variant_key().map(|k| k.to_string()).as_deref(), Some("cool-dusty"));
    }

    #[test]
    fn edge_key_and_validity() {
        let e = Edge::new(GridPos::new(0, 0), GridPos::new(1, 0), 0.5);
        assert_eq!(e.key().to_string(), "0-0->1-0");
        assert!(e.has_valid_traffic());
        assert!(!e.is_self_loop());
        assert!(!Edge::new(e.from, e.from, -0.1).has_valid_traffic());
        assert!(!Edge::new(e.from, e.from, f32::NAN).has_valid_traffic());
        assert!(Edge::new(e.from, e.from, 0.0).is_self_loop());
    }

    #[test]
    fn claimed_room_lookup() {
        let mut rooms = RoomMap::new();
        let a = GridPos::new(0, 0);
        let b = GridPos::new(1, 0);
        rooms.insert(a, Room::empty(a));
        rooms.insert(
            b,
            Room {
                owner: Some("guest".to_string()),
                ..Room::empty(b)
            },
        );
        assert!(claimed_room(&rooms, a).is_none());
        assert!(claimed_room(&rooms, b).is_some());
        assert!(claimed_room(&rooms, GridPos::new(9, 9)).is_none());
    }
}
