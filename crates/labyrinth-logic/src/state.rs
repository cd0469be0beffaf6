//! The single-writer room/edge state container.
//!
//! All writes go through `&mut self`, so callers serialize them by
//! construction; the layout is recomputed from an immutable borrow after
//! every write. Traffic is the only quantity that changes on its own:
//! it climbs with observed transitions and decays back toward zero.

use thiserror::Error;

use crate::config::{GridWindow, LayoutConfig, StateConfig};
use crate::coords::{EdgeKey, GridPos};
use crate::layout::{generate_layout, Layout};
use crate::room::{Edge, EdgeMap, Room, RoomMap};
use crate::snapshot::{self, SnapshotError};
use crate::vibe::{validate_vibe, Condition, VibeError, VibeVector};

/// Rejected state mutation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StateError {
    #[error("owner name is empty")]
    EmptyOwner,
    #[error("invalid vibe vector ({} problems)", .0.len())]
    InvalidVibe(Vec<VibeError>),
    #[error("no room at {0}")]
    UnknownRoom(GridPos),
    #[error("traffic delta {0} is not finite")]
    InvalidDelta(f32),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabyrinthState {
    rooms: RoomMap,
    edges: EdgeMap,
    config: StateConfig,
}

impl LabyrinthState {
    pub fn new(config: StateConfig) -> Self {
        Self {
            rooms: RoomMap::new(),
            edges: EdgeMap::new(),
            config,
        }
    }

    /// One empty room for every cell of `window`.
    pub fn with_window(window: GridWindow, config: StateConfig) -> Self {
        let mut state = Self::new(config);
        for pos in window.coords() {
            state.rooms.insert(pos, Room::empty(pos));
        }
        state
    }

    pub fn from_json(json: &str, config: StateConfig) -> Result<Self, SnapshotError> {
        let (rooms, edges) = snapshot::parse_snapshot(json)?;
        Ok(Self {
            rooms,
            edges,
            config,
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&snapshot::to_record(&self.rooms, &self.edges))
    }

    pub fn rooms(&self) -> &RoomMap {
        &self.rooms
    }

    pub fn edges(&self) -> &EdgeMap {
        &self.edges
    }

    pub fn config(&self) -> &StateConfig {
        &self.config
    }

    pub fn room(&self, pos: GridPos) -> Option<&Room> {
        self.rooms.get(&pos)
    }

    pub fn traffic(&self, from: GridPos, to: GridPos) -> f32 {
        self.edges
            .get(&EdgeKey::new(from, to))
            .map_or(0.0, |e| e.traffic)
    }

    /// Attach an owner and vibe to a room, creating the room if needed.
    ///
    /// Without an explicit condition the room's wear follows its entropy.
    pub fn claim_room(
        &mut self,
        pos: GridPos,
        owner: impl Into<String>,
        vibe: VibeVector,
        condition: Option<Condition>,
    ) -> Result<&Room, StateError> {
        let owner = owner.into();
        if owner.trim().is_empty() {
            return Err(StateError::EmptyOwner);
        }
        let problems = validate_vibe(&vibe);
        if !problems.is_empty() {
            return Err(StateError::InvalidVibe(problems));
        }

        log::info!("room {} claimed by {} ({})", pos, owner, vibe.mood_tag);
        let room = self.rooms.entry(pos).or_insert_with(|| Room::empty(pos));
        room.condition = Some(condition.unwrap_or_else(|| Condition::from_entropy(vibe.entropy)));
        room.owner = Some(owner);
        room.vibe = Some(vibe);
        Ok(room)
    }

    /// Clear a room's owner and aesthetics; the cell itself stays.
    pub fn reset_room(&mut self, pos: GridPos) -> Result<(), StateError> {
        let room = self
            .rooms
            .get_mut(&pos)
            .ok_or(StateError::UnknownRoom(pos))?;
        room.owner = None;
        room.vibe = None;
        room.condition = None;
        log::info!("room {} reset", pos);
        Ok(())
    }

    /// Adjust the traffic on `from -> to`, keeping it within `[0, cap]`.
    /// Returns the new value.
    pub fn update_traffic(
        &mut self,
        from: GridPos,
        to: GridPos,
        delta: f32,
    ) -> Result<f32, StateError> {
        if !delta.is_finite() {
            return Err(StateError::InvalidDelta(delta));
        }
        let cap = self.config.traffic_cap;
        let edge = self
            .edges
            .entry(EdgeKey::new(from, to))
            .or_insert_with(|| Edge::new(from, to, 0.0));
        edge.traffic = (edge.traffic + delta).clamp(0.0, cap);
        Ok(edge.traffic)
    }

    /// Decay every edge by `decay_rate * elapsed_secs` and drop edges that
    /// reach zero. Returns the number of edges removed.
    pub fn decay_traffic(&mut self, elapsed_secs: f32) -> usize {
        if !elapsed_secs.is_finite() || elapsed_secs <= 0.0 {
            return 0;
        }
        let amount = self.config.decay_rate * elapsed_secs;
        for edge in self.edges.values_mut() {
            edge.traffic = (edge.traffic - amount).max(0.0);
        }
        let before = self.edges.len();
        self.edges.retain(|_, e| e.traffic > 0.0);
        let removed = before - self.edges.len();
        if removed > 0 {
            log::debug!("decay removed {} edges, {} remain", removed, self.edges.len());
        }
        removed
    }

    pub fn validate(&self) -> Vec<SnapshotError> {
        snapshot::validate_snapshot(&self.rooms, &self.edges)
    }

    pub fn layout(&self, window: GridWindow, config: &LayoutConfig) -> Layout {
        generate_layout(&self.rooms, &self.edges, window, config)
    }
}
