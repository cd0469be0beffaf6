//! Turns player movement into traffic on directed edges.
//!
//! Each time the player's cell changes, the transition `previous -> current`
//! gains one `step_delta`. Staying inside a cell records nothing.

use crate::collision::cell_at;
use crate::coords::GridPos;
use crate::state::{LabyrinthState, StateError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrafficTracker {
    last: Option<GridPos>,
}

impl TrafficTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell seen on the previous observation.
    pub fn last_cell(&self) -> Option<GridPos> {
        self.last
    }

    /// Feed a world position. Returns the crossed transition, if any.
    pub fn observe(&mut self, x: f32, z: f32) -> Option<(GridPos, GridPos)> {
        let cell = cell_at(x, z);
        match self.last.replace(cell) {
            Some(prev) if prev != cell => Some((prev, cell)),
            _ => None,
        }
    }

    /// Observe and record any crossing in `state`.
    /// Returns the edge's new traffic when a crossing happened.
    pub fn track(
        &mut self,
        state: &mut LabyrinthState,
        x: f32,
        z: f32,
    ) -> Result<Option<f32>, StateError> {
        let Some((from, to)) = self.observe(x, z) else {
            return Ok(None);
        };
        let step = state.config().step_delta;
        let traffic = state.update_traffic(from, to, step)?;
        log::trace!("traffic {} -> {} now {:.2}", from, to, traffic);
        Ok(Some(traffic))
    }

    /// Forget the last cell, e.g. after a teleport.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
