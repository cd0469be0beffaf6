//! Grid coordinates, compass directions and the composite keys used to
//! address rooms, edges and tiles.
//!
//! Positions are an ordered `(x, y)` pair of `i32`. The `"x-y"` string form
//! only exists at the JSON boundary; its parser accepts negative components
//! (`"-1--2"` is `(-1, -2)`), which a plain split on `-` cannot.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A cell on the labyrinth grid. `y` grows toward the south.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const ORIGIN: GridPos = GridPos { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The orthogonal neighbor one step in `dir`.
    pub fn neighbor(self, dir: Direction) -> GridPos {
        let (dx, dy) = dir.offset();
        GridPos::new(self.x + dx, self.y + dy)
    }

    /// All four orthogonal neighbors in N, E, S, W order.
    pub fn neighbors(self) -> impl Iterator<Item = (Direction, GridPos)> {
        Direction::ALL.into_iter().map(move |d| (d, self.neighbor(d)))
    }

    pub fn manhattan_distance(self, other: GridPos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.x, self.y)
    }
}

/// Malformed `"x-y"` or `"from->to"` key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyParseError {
    #[error("malformed grid key {0:?}, expected \"<x>-<y>\"")]
    GridKey(String),
    #[error("malformed edge key {0:?}, expected \"<x>-<y>-><x>-<y>\"")]
    EdgeKey(String),
}

impl FromStr for GridPos {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || KeyParseError::GridKey(s.to_string());
        // Separator is the first '-' after the x component's optional sign.
        let sep = s
            .char_indices()
            .skip(1)
            .find(|&(_, c)| c == '-')
            .map(|(i, _)| i)
            .ok_or_else(bad)?;
        let x = s[..sep].parse::<i32>().map_err(|_| bad())?;
        let y = s[sep + 1..].parse::<i32>().map_err(|_| bad())?;
        Ok(GridPos::new(x, y))
    }
}

impl Serialize for GridPos {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GridPos {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Compass direction on the grid. North is `-y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    N,
    E,
    S,
    W,
}

impl Direction {
    /// Priority order used by every tie-break in the tile resolver.
    pub const ALL: [Direction; 4] = [Direction::N, Direction::E, Direction::S, Direction::W];

    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::N => (0, -1),
            Direction::E => (1, 0),
            Direction::S => (0, 1),
            Direction::W => (-1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::N => Direction::S,
            Direction::E => Direction::W,
            Direction::S => Direction::N,
            Direction::W => Direction::E,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::N => "N",
            Direction::E => "E",
            Direction::S => "S",
            Direction::W => "W",
        }
    }
}

/// Key of a directed traffic edge, `"<from>-><to>"` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    pub from: GridPos,
    pub to: GridPos,
}

impl EdgeKey {
    pub const fn new(from: GridPos, to: GridPos) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from, self.to)
    }
}

impl FromStr for EdgeKey {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || KeyParseError::EdgeKey(s.to_string());
        let (from, to) = s.split_once("->").ok_or_else(bad)?;
        let from = from.parse().map_err(|_| bad())?;
        let to = to.parse().map_err(|_| bad())?;
        Ok(EdgeKey::new(from, to))
    }
}

impl Serialize for EdgeKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EdgeKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_wire_format() {
        assert_eq!(GridPos::new(3, 7).to_string(), "3-7");
        assert_eq!(GridPos::new(-1, -2).to_string(), "-1--2");
    }

    #[test]
    fn parse_positive_and_negative_keys() {
        assert_eq!("3-7".parse::<GridPos>().unwrap(), GridPos::new(3, 7));
        assert_eq!("-1--2".parse::<GridPos>().unwrap(), GridPos::new(-1, -2));
        assert_eq!("4--5".parse::<GridPos>().unwrap(), GridPos::new(4, -5));
        assert_eq!("-4-5".parse::<GridPos>().unwrap(), GridPos::new(-4, 5));
    }

    #[test]
    fn parse_rejects_garbage() {
        for bad in ["", "3", "-3", "a-b", "3-", "3-4-5", "--"] {
            assert!(bad.parse::<GridPos>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn negative_keys_survive_display_parse() {
        for x in -3..=3 {
            for y in -3..=3 {
                let p = GridPos::new(x, y);
                assert_eq!(p.to_string().parse::<GridPos>().unwrap(), p);
            }
        }
    }

    #[test]
    fn neighbor_offsets() {
        let p = GridPos::new(2, 2);
        assert_eq!(p.neighbor(Direction::N), GridPos::new(2, 1));
        assert_eq!(p.neighbor(Direction::E), GridPos::new(3, 2));
        assert_eq!(p.neighbor(Direction::S), GridPos::new(2, 3));
        assert_eq!(p.neighbor(Direction::W), GridPos::new(1, 2));
    }

    #[test]
    fn neighbors_in_priority_order() {
        let dirs: Vec<Direction> = GridPos::ORIGIN.neighbors().map(|(d, _)| d).collect();
        assert_eq!(dirs, Direction::ALL.to_vec());
    }

    #[test]
    fn opposite_is_involution() {
        for d in Direction::ALL {
            assert_eq!(d.opposite().opposite(), d);
            let (dx, dy) = d.offset();
            let (ox, oy) = d.opposite().offset();
            assert_eq!((dx + ox, dy + oy), (0, 0));
        }
    }

    #[test]
    fn edge_key_wire_format() {
        let key = EdgeKey::new(GridPos::new(-1, 0), GridPos::new(2, -3));
        assert_eq!(key.to_string(), "-1-0->2--3");
        assert_eq!("-1-0->2--3".parse::<EdgeKey>().unwrap(), key);
        assert!("1-0=>2-3".parse::<EdgeKey>().is_err());
    }

    #[test]
    fn distances() {
        let a = GridPos::new(-2, 1);
        assert_eq!(a.manhattan_distance(GridPos::new(1, -1)), 5);
    }

    #[test]
    fn serde_uses_string_form() {
        let json = serde_json::to_string(&GridPos::new(-1, 4)).unwrap();
        assert_eq!(json, "\"-1-4\"");
        let back: GridPos = serde_json::from_str(&json).unwrap();
        assert_eq!(back, GridPos::new(-1, 4));
    }
}
