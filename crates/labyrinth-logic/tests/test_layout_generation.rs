//! Integration tests for the layout pipeline.
//!
//! Exercises: snapshot → CellActivity → tile resolution → Layout,
//! plus the state container driving it. Every scenario runs under both
//! accumulation policies.

use labyrinth_logic::config::{Accumulation, GridWindow, LayoutConfig, StateConfig};
use labyrinth_logic::coords::{Direction, EdgeKey, GridPos};
use labyrinth_logic::layout::{generate_layout, Layout};
use labyrinth_logic::raster::CellActivity;
use labyrinth_logic::room::{Edge, EdgeMap, Room, RoomMap};
use labyrinth_logic::snapshot::parse_snapshot;
use labyrinth_logic::state::LabyrinthState;
use labyrinth_logic::tiles::{Connections, Rotation, Tile, TileType};
use labyrinth_logic::vibe::{Variant, VibeVector};
use proptest::prelude::*;

const SAMPLE_JSON: &str = include_str!("../../../data/sample_labyrinth.json");

const POLICIES: [Accumulation; 2] = [Accumulation::Additive, Accumulation::Max];

// ── Helpers ────────────────────────────────────────────────────────────

fn p(x: i32, y: i32) -> GridPos {
    GridPos::new(x, y)
}

fn config(accumulation: Accumulation) -> LayoutConfig {
    LayoutConfig {
        accumulation,
        ..LayoutConfig::default()
    }
}

fn claimed(positions: &[GridPos]) -> RoomMap {
    positions
        .iter()
        .map(|&pos| {
            (
                pos,
                Room {
                    owner: Some("guest".to_string()),
                    vibe: Some(VibeVector::fallback()),
                    ..Room::empty(pos)
                },
            )
        })
        .collect()
}

fn edges(list: &[(GridPos, GridPos, f32)]) -> EdgeMap {
    list.iter()
        .map(|&(from, to, traffic)| (EdgeKey::new(from, to), Edge::new(from, to, traffic)))
        .collect()
}

fn tile(layout: &Layout, x: i32, y: i32) -> &Tile {
    layout
        .get(p(x, y))
        .unwrap_or_else(|| panic!("no tile at {x},{y}"))
}

// ── Decision table scenarios ───────────────────────────────────────────

#[test]
fn single_claimed_room_is_closed_door() {
    for policy in POLICIES {
        let layout = generate_layout(
            &claimed(&[p(0, 0)]),
            &EdgeMap::new(),
            GridWindow::zero_based(1),
            &config(policy),
        );
        assert_eq!(layout.len(), 1);
        let t = tile(&layout, 0, 0);
        assert_eq!(t.kind, TileType::DoorFrame, "{policy:?}");
        assert_eq!(t.rotation, Rotation::R0);
        assert_eq!(t.connections, Connections::CLOSED);
        assert_eq!(t.traffic_strength, 1.0);
    }
}

#[test]
fn two_rooms_joined_by_straight_corridor() {
    for policy in POLICIES {
        let layout = generate_layout(
            &claimed(&[p(0, 0), p(3, 0)]),
            &edges(&[(p(0, 0), p(3, 0), 1.0)]),
            GridWindow::zero_based(4),
            &config(policy),
        );
        for x in [1, 2] {
            let t = tile(&layout, x, 0);
            assert_eq!(t.kind, TileType::Straight, "{policy:?} at x={x}");
            assert_eq!(t.rotation, Rotation::R90);
            assert!(t.connections.e && t.connections.w);
            assert!(!t.connections.n && !t.connections.s);
            assert!((t.traffic_strength - 0.1).abs() < 1e-6);
        }
        assert_eq!(tile(&layout, 0, 0).kind, TileType::DoorFrame);
        assert_eq!(tile(&layout, 3, 0).kind, TileType::DoorFrame);
        assert_eq!(tile(&layout, 0, 0).traffic_strength, 1.0);
        assert_eq!(layout.non_void().count(), 4);
    }
}

#[test]
fn hub_between_four_rooms_is_crossroads() {
    for policy in POLICIES {
        let layout = generate_layout(
            &claimed(&[p(0, -1), p(1, 0), p(0, 1), p(-1, 0)]),
            &edges(&[(p(-1, 0), p(1, 0), 1.0), (p(0, -1), p(0, 1), 1.0)]),
            GridWindow::centered(3),
            &config(policy),
        );
        let hub = tile(&layout, 0, 0);
        assert_eq!(hub.kind, TileType::X, "{policy:?}");
        assert_eq!(hub.rotation, Rotation::R0);
        assert_eq!(hub.connections.count(), 4);
        assert_eq!(layout.count(TileType::DoorFrame), 4);
        assert_eq!(layout.count(TileType::Void), 4);
    }
}

#[test]
fn accumulation_policies_differ_on_shared_cells() {
    let rooms = claimed(&[p(-1, 0), p(1, 0), p(0, -1), p(0, 1)]);
    let e = edges(&[(p(-1, 0), p(1, 0), 1.0), (p(0, -1), p(0, 1), 1.0)]);
    let window = GridWindow::centered(3);

    let additive = generate_layout(&rooms, &e, window, &config(Accumulation::Additive));
    let max = generate_layout(&rooms, &e, window, &config(Accumulation::Max));

    assert!((tile(&additive, 0, 0).traffic_strength - 0.2).abs() < 1e-6);
    assert!((tile(&max, 0, 0).traffic_strength - 0.1).abs() < 1e-6);
}

#[test]
fn edge_below_noise_floor_leaves_no_trace() {
    for policy in POLICIES {
        let layout = generate_layout(
            &RoomMap::new(),
            &edges(&[(p(0, 0), p(3, 3), 0.05)]),
            GridWindow::zero_based(4),
            &config(policy),
        );
        assert_eq!(layout.non_void().count(), 0, "{policy:?}");
        assert!(layout.iter().all(|t| t.traffic_strength == 0.0));
    }
}

#[test]
fn edge_at_noise_floor_is_kept() {
    let layout = generate_layout(
        &RoomMap::new(),
        &edges(&[(p(0, 0), p(2, 0), 0.1)]),
        GridWindow::zero_based(3),
        &LayoutConfig::default(),
    );
    assert_eq!(layout.non_void().count(), 3);
}

#[test]
fn self_loop_edge_marks_a_single_cell() {
    for policy in POLICIES {
        let cfg = config(policy);
        let rooms = RoomMap::new();
        let e = edges(&[(p(2, 2), p(2, 2), 0.8)]);

        let activity = CellActivity::accumulate(&rooms, &e, &cfg);
        assert_eq!(activity.active_count(), 1, "{policy:?}");
        assert!(activity.is_active(p(2, 2)));
        assert!((activity.traffic(p(2, 2)) - 0.8 * cfg.raster_weight).abs() < 1e-6);

        let layout = generate_layout(&rooms, &e, GridWindow::zero_based(5), &cfg);
        let blip = tile(&layout, 2, 2);
        assert_eq!(blip.kind, TileType::Void);
        assert_eq!(blip.connections, Connections::CLOSED);
        assert_eq!(blip.rotation, Rotation::R0);
        assert!((blip.traffic_strength - 0.08).abs() < 1e-6, "{policy:?}");
        assert_eq!(layout.non_void().count(), 0);
        assert!(layout
            .iter()
            .filter(|t| t.pos != p(2, 2))
            .all(|t| t.traffic_strength == 0.0));
    }
}

#[test]
fn reset_room_reverts_to_void() {
    for policy in POLICIES {
        let window = GridWindow::zero_based(2);
        let mut state = LabyrinthState::with_window(window, StateConfig::default());
        state
            .claim_room(p(1, 1), "guest", VibeVector::fallback(), None)
            .unwrap();
        assert_eq!(
            tile(&state.layout(window, &config(policy)), 1, 1).kind,
            TileType::DoorFrame
        );

        state.reset_room(p(1, 1)).unwrap();
        let layout = state.layout(window, &config(policy));
        assert_eq!(*tile(&layout, 1, 1), Tile::void(p(1, 1)), "{policy:?}");
    }
}

#[test]
fn reset_room_with_traffic_becomes_corridor() {
    let window = GridWindow::zero_based(3);
    let mut state = LabyrinthState::with_window(window, StateConfig::default());
    state
        .claim_room(p(0, 0), "guest", VibeVector::fallback(), None)
        .unwrap();
    state.update_traffic(p(0, 0), p(2, 0), 1.0).unwrap();
    state.reset_room(p(0, 0)).unwrap();

    let layout = state.layout(window, &LayoutConfig::default());
    let t = tile(&layout, 0, 0);
    assert_eq!(t.kind, TileType::HallEnd);
    assert_eq!(t.rotation, Rotation::R90);
}

#[test]
fn safe_zone_keeps_origin_walkable() {
    for policy in POLICIES {
        let layout = generate_layout(
            &RoomMap::new(),
            &EdgeMap::new(),
            GridWindow::centered(5),
            &LayoutConfig {
                safe_zone_radius: Some(1),
                ..config(policy)
            },
        );
        assert_eq!(tile(&layout, 0, 0).kind, TileType::X);
        assert_eq!(tile(&layout, 1, 1).kind, TileType::Corner);
        assert_eq!(tile(&layout, 0, 0).traffic_strength, 0.0);
        assert_eq!(layout.non_void().count(), 9);
    }
}

#[test]
fn hallway_inherits_nearest_room_style() {
    let mut rooms = claimed(&[p(0, 0)]);
    let warm = VibeVector {
        warmth: 0.9,
        entropy: 0.1,
        ..VibeVector::fallback()
    };
    rooms.insert(
        p(4, 0),
        Room {
            owner: Some("other".to_string()),
            vibe: Some(warm),
            ..Room::empty(p(4, 0))
        },
    );
    let layout = generate_layout(
        &rooms,
        &edges(&[(p(0, 0), p(4, 0), 1.0)]),
        GridWindow::zero_based(5),
        &LayoutConfig::default(),
    );
    let fallback_variant = Variant::from_vibe(Some(&VibeVector::fallback()));
    assert_eq!(tile(&layout, 1, 0).variant, fallback_variant);
    assert_eq!(tile(&layout, 2, 0).variant, fallback_variant);
    assert_eq!(tile(&layout, 3, 0).variant, Variant::WarmClean);
}

#[test]
fn sample_snapshot_generates_consistent_map() {
    let (rooms, e) = parse_snapshot(SAMPLE_JSON).expect("sample snapshot parses");
    let window = GridWindow::zero_based(12);
    let layout = generate_layout(&rooms, &e, window, &LayoutConfig::default());

    assert_eq!(layout.len(), window.area());
    let claimed_count = rooms.values().filter(|r| r.is_claimed()).count();
    assert_eq!(layout.count(TileType::DoorFrame), claimed_count);
    assert!(layout.non_void().count() > claimed_count);
}

// ── Properties ─────────────────────────────────────────────────────────

fn pos_strategy() -> impl Strategy<Value = GridPos> {
    (-5i32..5, -5i32..5).prop_map(|(x, y)| GridPos::new(x, y))
}

fn snapshot_strategy() -> impl Strategy<Value = (RoomMap, EdgeMap)> {
    (
        prop::collection::vec(pos_strategy(), 0..6),
        prop::collection::vec((pos_strategy(), pos_strategy(), 0.0f32..1.0), 0..8),
    )
        .prop_map(|(rooms, list)| (claimed(&rooms), edges(&list)))
}

fn policy_strategy() -> impl Strategy<Value = Accumulation> {
    prop_oneof![Just(Accumulation::Additive), Just(Accumulation::Max)]
}

fn window_strategy() -> impl Strategy<Value = GridWindow> {
    (any::<bool>(), 1u32..9).prop_map(|(centered, size)| {
        if centered {
            GridWindow::centered(size)
        } else {
            GridWindow::zero_based(size)
        }
    })
}

proptest! {
    #[test]
    fn generation_is_deterministic(
        (rooms, e) in snapshot_strategy(),
        policy in policy_strategy(),
        window in window_strategy(),
    ) {
        let a = generate_layout(&rooms, &e, window, &config(policy));
        let b = generate_layout(&rooms, &e, window, &config(policy));
        prop_assert_eq!(a, b);
    }

    #[test]
    fn layout_covers_exactly_the_window(
        (rooms, e) in snapshot_strategy(),
        policy in policy_strategy(),
        window in window_strategy(),
    ) {
        let layout = generate_layout(&rooms, &e, window, &config(policy));
        prop_assert_eq!(layout.len(), window.area());
        for pos in window.coords() {
            prop_assert!(layout.get(pos).is_some(), "missing {}", pos);
        }
        prop_assert!(layout.iter().all(|t| window.contains(t.pos)));
    }

    #[test]
    fn inactive_cells_are_plain_void(
        (rooms, e) in snapshot_strategy(),
        policy in policy_strategy(),
    ) {
        let cfg = config(policy);
        let window = GridWindow::centered(10);
        let activity = CellActivity::accumulate(&rooms, &e, &cfg);
        let layout = generate_layout(&rooms, &e, window, &cfg);
        for t in layout.iter().filter(|t| !activity.is_active(t.pos)) {
            prop_assert_eq!(t, &Tile::void(t.pos));
        }
        for t in layout.iter().filter(|t| t.kind == TileType::Void) {
            prop_assert_eq!(t.connections, Connections::CLOSED);
            prop_assert_eq!(t.rotation, Rotation::R0);
        }
    }

    #[test]
    fn connections_are_symmetric(
        (rooms, e) in snapshot_strategy(),
        policy in policy_strategy(),
    ) {
        let layout = generate_layout(&rooms, &e, GridWindow::centered(10), &config(policy));
        for t in layout.iter() {
            for dir in [Direction::E, Direction::S] {
                if let Some(other) = layout.get(t.pos.neighbor(dir)) {
                    prop_assert_eq!(
                        t.connections.is_open(dir),
                        other.connections.is_open(dir.opposite()),
                        "{} {:?} vs {}", t.pos, dir, other.pos
                    );
                }
            }
        }
    }

    #[test]
    fn traffic_strength_stays_in_unit_range(
        (rooms, e) in snapshot_strategy(),
        policy in policy_strategy(),
    ) {
        let layout = generate_layout(&rooms, &e, GridWindow::centered(10), &config(policy));
        prop_assert!(layout.iter().all(|t| (0.0..=1.0).contains(&t.traffic_strength)));
    }
}
