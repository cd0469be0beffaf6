//! Pure corridor layout logic for the labyrinth.
//!
//! Rooms and player traffic go in; a grid of auto-tiled corridor pieces
//! comes out. Nothing here touches a renderer, a network or a clock:
//! functions take plain data and return results, so the same snapshot
//! always produces the same map.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`collision`] | Player movement clamped against tile connection flags |
//! | [`config`] | Generator tunables, grid windows, state knobs |
//! | [`constants`] | World-space sizes shared with renderers |
//! | [`coords`] | Grid positions, directions, `"x-y"` / `"a->b"` keys |
//! | [`flicker`] | Deterministic light flicker per room |
//! | [`layout`] | The generator and the resulting tile map |
//! | [`raster`] | Manhattan rasterization and per-cell traffic accumulation |
//! | [`room`] | Rooms, directed traffic edges |
//! | [`snapshot`] | Wire format and boundary validation |
//! | [`state`] | Single-writer room/edge container with traffic decay |
//! | [`tiles`] | Tile types, rotations, the connection decision table |
//! | [`traffic`] | Movement-to-traffic tracking |
//! | [`vibe`] | Aesthetic vectors, condition bands, tile variants |

pub mod collision;
pub mod config;
pub mod constants;
pub mod coords;
pub mod flicker;
pub mod layout;
pub mod raster;
pub mod room;
pub mod snapshot;
pub mod state;
pub mod tiles;
pub mod traffic;
pub mod vibe;
