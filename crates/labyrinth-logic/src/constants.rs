//! World-space constants shared by the layout's consumers.

/// World units per grid cell.
pub const TILE_SIZE: f32 = 4.0;

/// Collision radius of the player capsule.
pub const DEFAULT_PLAYER_RADIUS: f32 = 0.4;

/// Longest frame step fed to time-driven effects, in seconds.
pub const MAX_FRAME_DELTA: f32 = 0.1;
