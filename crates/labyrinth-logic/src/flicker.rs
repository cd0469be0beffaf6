//! Deterministic light flicker for rooms with a high `flicker` channel.
//!
//! The clock is advanced by frame time instead of wall-clock timers, so the
//! same room fed the same tick sequence always produces the same lights.

use crate::constants::MAX_FRAME_DELTA;
use crate::coords::GridPos;
use crate::room::Room;

/// Light intensity when not flickering.
pub const BASE_INTENSITY: f32 = 0.5;

/// Rooms at or below this `flicker` value keep steady lights.
pub const FLICKER_THRESHOLD: f32 = 0.3;

const MIN_INTERVAL: f32 = 0.05;
const INTERVAL_SPREAD: f32 = 0.2;

#[derive(Debug, Clone, PartialEq)]
pub struct FlickerClock {
    seed: u64,
    flicker: f32,
    draws: u64,
    until_next: f32,
    intensity: f32,
}

impl FlickerClock {
    pub fn new(pos: GridPos, flicker: f32) -> Self {
        let seed = ((pos.x as u32 as u64) << 32) | pos.y as u32 as u64;
        let flicker = if flicker.is_finite() {
            flicker.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            seed,
            flicker,
            draws: 0,
            until_next: MIN_INTERVAL + hash01(seed, 0) * INTERVAL_SPREAD,
            intensity: BASE_INTENSITY,
        }
    }

    /// Clock for a room; unclaimed rooms never flicker.
    pub fn for_room(room: &Room) -> Self {
        Self::new(room.pos, room.vibe.as_ref().map_or(0.0, |v| v.flicker))
    }

    pub fn is_active(&self) -> bool {
        self.flicker > FLICKER_THRESHOLD
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Advance by `dt` seconds (capped at one frame) and return the intensity.
    pub fn tick(&mut self, dt: f32) -> f32 {
        if !self.is_active() {
            return BASE_INTENSITY;
        }
        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DELTA)
        } else {
            0.0
        };

        self.until_next -= dt;
        while self.until_next <= 0.0 {
            self.draw();
        }
        self.intensity
    }

    fn draw(&mut self) {
        self.draws += 1;
        let base = self.draws * 3;
        self.intensity = if hash01(self.seed, base) < self.flicker * 0.5 {
            hash01(self.seed, base + 1) * 2.0
        } else {
            BASE_INTENSITY
        };
        self.until_next += MIN_INTERVAL + hash01(self.seed, base + 2) * INTERVAL_SPREAD;
    }
}

/// Deterministic hash in `0.0..1.0`.
fn hash01(seed: u64, index: u64) -> f32 {
    let mut h = seed
        .wrapping_mul(6364136223846793005)
        .wrapping_add(index);
    h ^= h >> 33;
    h = h.wrapping_mul(0xff51afd7ed558ccd);
    h ^= h >> 33;
    (h % 1000) as f32 / 1000.0
}
