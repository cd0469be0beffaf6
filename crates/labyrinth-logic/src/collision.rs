//! Player collision against tile connection flags.
//!
//! Algorithm: "locate then clamp"
//! 1. Find the tile under the target position (`floor(pos / TILE_SIZE + 0.5)`)
//! 2. Missing or void tile: refuse the move, stay where we were
//! 3. For each closed side, clamp the target to `TILE_SIZE / 2 - radius`
//!    from the tile center on that axis (smooth wall slide)
//! 4. Open sides let the player walk straight into the neighbor

use crate::constants::TILE_SIZE;
use crate::coords::{Direction, GridPos};
use crate::layout::Layout;

/// A point in world space. The grid lies on the `x`/`z` plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorldPos {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl WorldPos {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Result of attempting to move the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveResult {
    /// Nothing in the way.
    Free(WorldPos),
    /// Hit at least one closed side; the blocked axis was clamped.
    WallSlide(WorldPos),
    /// Target is outside the corridor network; position unchanged.
    Blocked(WorldPos),
}

impl MoveResult {
    pub fn position(&self) -> WorldPos {
        match *self {
            MoveResult::Free(p) | MoveResult::WallSlide(p) | MoveResult::Blocked(p) => p,
        }
    }

    pub fn is_free(&self) -> bool {
        matches!(self, MoveResult::Free(_))
    }
}

/// Grid cell containing a world position.
pub fn cell_at(x: f32, z: f32) -> GridPos {
    GridPos::new(
        (x / TILE_SIZE + 0.5).floor() as i32,
        (z / TILE_SIZE + 0.5).floor() as i32,
    )
}

/// Resolve a move from `current` toward `target`.
pub fn check_collision(
    current: WorldPos,
    target: WorldPos,
    layout: &Layout,
    player_radius: f32,
) -> MoveResult {
    let cell = cell_at(target.x, target.z);
    let tile = match layout.get(cell) {
        Some(t) if !t.kind.is_void() => t,
        _ => return MoveResult::Blocked(current),
    };

    let center_x = cell.x as f32 * TILE_SIZE;
    let center_z = cell.y as f32 * TILE_SIZE;
    let local_x = target.x - center_x;
    let local_z = target.z - center_z;
    let limit = TILE_SIZE / 2.0 - player_radius;

    let mut out = target;
    let mut clamped = false;
    let open = |d| tile.connections.is_open(d);

    if !open(Direction::N) && local_z < -limit {
        out.z = center_z - limit;
        clamped = true;
    }
    if !open(Direction::S) && local_z > limit {
        out.z = center_z + limit;
        clamped = true;
    }
    if !open(Direction::W) && local_x < -limit {
        out.x = center_x - limit;
        clamped = true;
    }
    if !open(Direction::E) && local_x > limit {
        out.x = center_x + limit;
        clamped = true;
    }

    if clamped {
        MoveResult::WallSlide(out)
    } else {
        MoveResult::Free(out)
    }
}
