//! Active-cell registration and edge rasterization.
//!
//! Claimed rooms seed the active set at full strength. Every edge above the
//! noise floor is walked as an L-shaped Manhattan path (x first, then y),
//! activating each cell on the way and depositing `traffic * raster_weight`.
//! Influence (the vibe a hallway cell is styled after) is first-writer-wins:
//! rooms claim their own cell, then edges in key order fill the gaps.

use std::collections::{HashMap, HashSet};

use crate::config::LayoutConfig;
use crate::coords::GridPos;
use crate::room::{claimed_room, EdgeMap, RoomMap};
use crate::vibe::VibeVector;

/// Cells visited walking from `from` to `to`, both inclusive.
#[derive(Debug, Clone)]
pub struct ManhattanPath {
    cur: GridPos,
    to: GridPos,
    done: bool,
}

pub fn manhattan_path(from: GridPos, to: GridPos) -> ManhattanPath {
    ManhattanPath {
        cur: from,
        to,
        done: false,
    }
}

impl Iterator for ManhattanPath {
    type Item = GridPos;

    fn next(&mut self) -> Option<GridPos> {
        if self.done {
            return None;
        }
        let here = self.cur;
        if here == self.to {
            self.done = true;
        } else if here.x != self.to.x {
            self.cur.x += (self.to.x - here.x).signum();
        } else {
            self.cur.y += (self.to.y - here.y).signum();
        }
        Some(here)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = if self.done {
            0
        } else {
            self.cur.manhattan_distance(self.to) as usize + 1
        };
        (n, Some(n))
    }
}

impl ExactSizeIterator for ManhattanPath {}

/// Intermediate state shared by the tile resolver.
#[derive(Debug, Default)]
pub struct CellActivity<'a> {
    active: HashSet<GridPos>,
    traffic: HashMap<GridPos, f32>,
    influence: HashMap<GridPos, &'a VibeVector>,
    /// Edges that activated at least one cell.
    pub rasterized_edges: usize,
    /// Edges dropped by the noise floor or for invalid traffic.
    pub skipped_edges: usize,
}

impl<'a> CellActivity<'a> {
    /// Run the registration and rasterization phases over a snapshot.
    pub fn accumulate(rooms: &'a RoomMap, edges: &EdgeMap, config: &LayoutConfig) -> Self {
        let mut acc = CellActivity::default();

        for room in rooms.values().filter(|r| r.is_claimed()) {
            acc.active.insert(room.pos);
            acc.traffic.insert(room.pos, 1.0);
            if let Some(vibe) = room.vibe.as_ref() {
                acc.influence.insert(room.pos, vibe);
            }
        }

        acc.active.extend(config.safe_zone_cells());

        for edge in edges.values() {
            if !edge.has_valid_traffic() {
                log::warn!(
                    "skipping edge {} with invalid traffic {}",
                    edge.key(),
                    edge.traffic
                );
                acc.skipped_edges += 1;
                continue;
            }
            if edge.traffic < config.noise_floor {
                acc.skipped_edges += 1;
                continue;
            }

            let contribution = edge.traffic * config.raster_weight;
            let source_vibe = room_vibe(rooms, edge.from);
            let dest_vibe = room_vibe(rooms, edge.to);

            for cell in manhattan_path(edge.from, edge.to) {
                acc.active.insert(cell);
                let strength = acc.traffic.entry(cell).or_insert(0.0);
                *strength = config.accumulation.combine(*strength, contribution);

                // Nearer endpoint dominates; ties go to the source.
                let near_source =
                    cell.manhattan_distance(edge.from) <= cell.manhattan_distance(edge.to);
                let inherited = if near_source {
                    source_vibe.or(dest_vibe)
                } else {
                    dest_vibe.or(source_vibe)
                };
                if let Some(vibe) = inherited {
                    acc.influence.entry(cell).or_insert(vibe);
                }
            }
            acc.rasterized_edges += 1;
        }

        acc
    }

    pub fn is_active(&self, pos: GridPos) -> bool {
        self.active.contains(&pos)
    }

    /// Accumulated strength in [0, 1]; 0 for untouched cells.
    pub fn traffic(&self, pos: GridPos) -> f32 {
        self.traffic.get(&pos).copied().unwrap_or(0.0)
    }

    pub fn influence(&self, pos: GridPos) -> Option<&'a VibeVector> {
        self.influence.get(&pos).copied()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

fn room_vibe(rooms: &RoomMap, pos: GridPos) -> Option<&VibeVector> {
    claimed_room(rooms, pos).and_then(|r| r.vibe.as_ref())
}
