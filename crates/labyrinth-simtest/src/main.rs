//! Labyrinth Headless Layout Harness
//!
//! Validates the layout logic end to end without a renderer: decision
//! table scenarios, the bundled sample snapshot, random-walk traffic and
//! collision. Runs entirely in-process.
//!
//! Usage:
//!   cargo run -p labyrinth-simtest
//!   cargo run -p labyrinth-simtest -- --verbose
//!
//! Set `RUST_LOG=debug` to see generator summaries.

use labyrinth_logic::collision::{cell_at, check_collision, MoveResult, WorldPos};
use labyrinth_logic::config::{
    validate_config, validate_state_config, Accumulation, GridWindow, LayoutConfig, StateConfig,
};
use labyrinth_logic::constants::{DEFAULT_PLAYER_RADIUS, TILE_SIZE};
use labyrinth_logic::coords::{Direction, EdgeKey, GridPos};
use labyrinth_logic::flicker::FlickerClock;
use labyrinth_logic::layout::{generate_layout, Layout};
use labyrinth_logic::room::{Edge, EdgeMap, Room, RoomMap};
use labyrinth_logic::state::LabyrinthState;
use labyrinth_logic::tiles::{Rotation, TileType};
use labyrinth_logic::traffic::TrafficTracker;
use labyrinth_logic::vibe::VibeVector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

// ── Sample snapshot (same wire format the state owner sends) ────────────
const SAMPLE_JSON: &str = include_str!("../../../data/sample_labyrinth.json");

const GRID_SIZE: u32 = 12;
const WALK_SEED: u64 = 42;
const WALK_STEPS: usize = 2_000;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn check(name: &str, passed: bool, detail: impl Into<String>) -> TestResult {
    TestResult {
        name: name.into(),
        passed,
        detail: detail.into(),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Labyrinth Layout Harness ===\n");

    let mut results = Vec::new();

    // 1. Default configuration
    results.extend(validate_defaults());

    // 2. Decision table scenarios, under both accumulation policies
    for policy in [Accumulation::Additive, Accumulation::Max] {
        results.extend(validate_scenarios(policy));
    }

    // 3. Sample snapshot
    let state = match LabyrinthState::from_json(SAMPLE_JSON, StateConfig::default()) {
        Ok(s) => s,
        Err(e) => {
            results.push(check("sample_parse", false, format!("snapshot error: {e}")));
            report(&results, verbose);
            return;
        }
    };
    results.extend(validate_sample(&state, verbose));

    // 4. Collision against the sample map
    results.extend(validate_collision(&state));

    // 5. Random-walk traffic and decay
    results.extend(validate_random_walk(state, verbose));

    // 6. Flicker clocks
    results.extend(validate_flicker());

    report(&results, verbose);
}

fn report(results: &[TestResult], verbose: bool) {
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Defaults ─────────────────────────────────────────────────────────

fn validate_defaults() -> Vec<TestResult> {
    println!("--- Defaults ---");
    let layout_errors = validate_config(&LayoutConfig::default());
    let state_errors = validate_state_config(&StateConfig::default());
    vec![
        check(
            "default_layout_config",
            layout_errors.is_empty(),
            format!("{layout_errors:?}"),
        ),
        check(
            "default_state_config",
            state_errors.is_empty(),
            format!("{state_errors:?}"),
        ),
    ]
}

// ── 2. Scenarios ────────────────────────────────────────────────────────

fn claimed(positions: &[GridPos]) -> RoomMap {
    positions
        .iter()
        .map(|&pos| {
            (
                pos,
                Room {
                    owner: Some("harness".to_string()),
                    vibe: Some(VibeVector::fallback()),
                    ..Room::empty(pos)
                },
            )
        })
        .collect()
}

fn edge_map(list: &[(GridPos, GridPos, f32)]) -> EdgeMap {
    list.iter()
        .map(|&(a, b, t)| (EdgeKey::new(a, b), Edge::new(a, b, t)))
        .collect()
}

fn validate_scenarios(policy: Accumulation) -> Vec<TestResult> {
    println!("--- Scenarios ({policy:?}) ---");
    let config = LayoutConfig {
        accumulation: policy,
        ..LayoutConfig::default()
    };
    let p = GridPos::new;
    let mut results = Vec::new();

    // Lone door
    let layout = generate_layout(
        &claimed(&[p(0, 0)]),
        &EdgeMap::new(),
        GridWindow::zero_based(1),
        &config,
    );
    let door_ok = layout.get(p(0, 0)).is_some_and(|t| {
        t.kind == TileType::DoorFrame && t.connections.count() == 0 && t.traffic_strength == 1.0
    });
    results.push(check(
        "lone_door",
        door_ok,
        format!("{:?}", layout.get(p(0, 0))),
    ));

    // Straight corridor between two doors
    let layout = generate_layout(
        &claimed(&[p(0, 0), p(3, 0)]),
        &edge_map(&[(p(0, 0), p(3, 0), 1.0)]),
        GridWindow::zero_based(4),
        &config,
    );
    let straight_ok = [p(1, 0), p(2, 0)].iter().all(|&pos| {
        layout
            .get(pos)
            .is_some_and(|t| t.kind == TileType::Straight && t.rotation == Rotation::R90)
    });
    results.push(check(
        "straight_corridor",
        straight_ok,
        layout.ascii().lines().next().unwrap_or_default().to_string(),
    ));

    // Crossroads hub
    let layout = generate_layout(
        &claimed(&[p(0, -1), p(1, 0), p(0, 1), p(-1, 0)]),
        &edge_map(&[(p(-1, 0), p(1, 0), 1.0), (p(0, -1), p(0, 1), 1.0)]),
        GridWindow::centered(3),
        &config,
    );
    let hub = layout.get(p(0, 0));
    results.push(check(
        "crossroads_hub",
        hub.is_some_and(|t| t.kind == TileType::X && t.rotation == Rotation::R0),
        format!("{:?}", hub.map(|t| t.kind)),
    ));

    // Noise floor
    let layout = generate_layout(
        &RoomMap::new(),
        &edge_map(&[(p(0, 0), p(3, 3), 0.05)]),
        GridWindow::zero_based(4),
        &config,
    );
    let quiet = layout.non_void().count();
    results.push(check(
        "noise_floor",
        quiet == 0,
        format!("{quiet} non-void tiles from a 0.05 edge"),
    ));

    results
}

// ── 3. Sample snapshot ──────────────────────────────────────────────────

fn validate_sample(state: &LabyrinthState, verbose: bool) -> Vec<TestResult> {
    println!("--- Sample Snapshot ---");
    let mut results = Vec::new();
    let window = GridWindow::zero_based(GRID_SIZE);
    let config = LayoutConfig::default();

    let problems = state.validate();
    results.push(check(
        "sample_valid",
        problems.is_empty(),
        format!(
            "{} rooms, {} edges, {} problems",
            state.rooms().len(),
            state.edges().len(),
            problems.len()
        ),
    ));

    let layout = state.layout(window, &config);
    results.push(check(
        "sample_coverage",
        layout.len() == window.area() && window.coords().all(|pos| layout.get(pos).is_some()),
        format!("{} tiles for a {}x{} window", layout.len(), GRID_SIZE, GRID_SIZE),
    ));

    let again = state.layout(window, &config);
    results.push(check(
        "sample_deterministic",
        layout == again,
        "two generations compared",
    ));

    let claimed = state.rooms().values().filter(|r| r.is_claimed()).count();
    let doors = layout.count(TileType::DoorFrame);
    results.push(check(
        "sample_doors",
        doors == claimed,
        format!("{doors} door frames for {claimed} claimed rooms"),
    ));

    let asymmetric = asymmetric_pairs(&layout);
    results.push(check(
        "sample_symmetric_connections",
        asymmetric == 0,
        format!("{asymmetric} mismatched neighbor pairs"),
    ));

    let void_ok = layout
        .iter()
        .filter(|t| t.kind == TileType::Void)
        .all(|t| t.connections.count() == 0 && t.rotation == Rotation::R0);
    results.push(check("sample_void_closed", void_ok, "void tiles closed"));

    let keys: Vec<String> = state
        .rooms()
        .values()
        .filter_map(|r| r.variant_key().map(|k| format!("{}={}", r.pos, k)))
        .collect();
    let expected = ["2-2=cool-modern", "5-8=neutral-modern", "8-3=warm-abandoned"];
    results.push(check(
        "sample_variant_keys",
        keys == expected,
        keys.join(", "),
    ));

    if verbose {
        println!("  Layout ({} non-void):", layout.non_void().count());
        for line in layout.ascii().lines() {
            println!("    {line}");
        }
    }

    results
}

fn asymmetric_pairs(layout: &Layout) -> usize {
    layout
        .iter()
        .flat_map(|t| [Direction::E, Direction::S].map(|d| (t, d)))
        .filter(|(t, d)| {
            layout.get(t.pos.neighbor(*d)).is_some_and(|other| {
                t.connections.is_open(*d) != other.connections.is_open(d.opposite())
            })
        })
        .count()
}

// ── 4. Collision ────────────────────────────────────────────────────────

fn center(pos: GridPos) -> WorldPos {
    WorldPos::new(pos.x as f32 * TILE_SIZE, 1.6, pos.y as f32 * TILE_SIZE)
}

fn validate_collision(state: &LabyrinthState) -> Vec<TestResult> {
    println!("--- Collision ---");
    let layout = state.layout(GridWindow::zero_based(GRID_SIZE), &LayoutConfig::default());
    let mut results = Vec::new();

    let mut centers_free = 0;
    let mut walls_held = 0;
    let mut failures = Vec::new();
    for tile in layout.non_void() {
        let here = center(tile.pos);
        if check_collision(here, here, &layout, DEFAULT_PLAYER_RADIUS).is_free() {
            centers_free += 1;
        } else {
            failures.push(format!("center {}", tile.pos));
        }

        // Push almost to the edge of each closed side.
        for dir in Direction::ALL.into_iter().filter(|&d| !tile.connections.is_open(d)) {
            let (dx, dz) = dir.offset();
            let reach = TILE_SIZE / 2.0 - 0.1;
            let target = WorldPos::new(here.x + dx as f32 * reach, here.y, here.z + dz as f32 * reach);
            match check_collision(here, target, &layout, DEFAULT_PLAYER_RADIUS) {
                MoveResult::WallSlide(_) => walls_held += 1,
                other => failures.push(format!("{} {}: {:?}", tile.pos, dir.as_str(), other)),
            }
        }
    }
    results.push(check(
        "collision_walls",
        failures.is_empty(),
        if failures.is_empty() {
            format!("{centers_free} centers free, {walls_held} walls held")
        } else {
            failures.join(", ")
        },
    ));

    let void_pos = layout.iter().find(|t| t.kind == TileType::Void).map(|t| t.pos);
    let blocked = void_pos.map_or(true, |pos| {
        let start = center(GridPos::new(-10, -10));
        check_collision(start, center(pos), &layout, DEFAULT_PLAYER_RADIUS)
            == MoveResult::Blocked(start)
    });
    results.push(check(
        "collision_void_blocks",
        blocked,
        format!("void probe at {void_pos:?}"),
    ));

    results
}

// ── 5. Random walk ──────────────────────────────────────────────────────

fn validate_random_walk(mut state: LabyrinthState, verbose: bool) -> Vec<TestResult> {
    println!("--- Random Walk ---");
    let window = GridWindow::zero_based(GRID_SIZE);
    let config = LayoutConfig::default();
    let layout = state.layout(window, &config);
    let mut results = Vec::new();

    let Some(start) = layout
        .iter()
        .find(|t| t.kind == TileType::DoorFrame)
        .map(|t| t.pos)
    else {
        results.push(check("walk_start", false, "no door to start from"));
        return results;
    };

    let mut rng = StdRng::seed_from_u64(WALK_SEED);
    let mut tracker = TrafficTracker::new();
    let mut pos = center(start);
    let mut crossings = 0;
    let mut errors = 0;
    tracker.observe(pos.x, pos.z);

    for _ in 0..WALK_STEPS {
        let Some(tile) = layout.get(cell_at(pos.x, pos.z)) else {
            break;
        };
        let open: Vec<Direction> = tile.connections.open_dirs().collect();
        if open.is_empty() {
            break;
        }
        let (dx, dz) = open[rng.gen_range(0..open.len())].offset();
        let target = WorldPos::new(
            pos.x + dx as f32 * TILE_SIZE,
            pos.y,
            pos.z + dz as f32 * TILE_SIZE,
        );
        let step = check_collision(pos, target, &layout, DEFAULT_PLAYER_RADIUS);
        pos = step.position();
        match tracker.track(&mut state, pos.x, pos.z) {
            Ok(Some(_)) => crossings += 1,
            Ok(None) => {}
            Err(e) => {
                log::warn!("tracking failed: {e}");
                errors += 1;
            }
        }
    }

    let cap = state.config().traffic_cap;
    let max_traffic = state.edges().values().map(|e| e.traffic).fold(0.0, f32::max);
    results.push(check(
        "walk_traffic_capped",
        errors == 0 && crossings > 0 && max_traffic <= cap,
        format!(
            "{crossings} crossings, {} edges, max traffic {max_traffic:.2}",
            state.edges().len()
        ),
    ));

    // Walking only between active neighbors cannot grow the network.
    let after = state.layout(window, &config);
    let same_shape = layout
        .iter()
        .zip(after.iter())
        .all(|(a, b)| a.kind == b.kind && a.rotation == b.rotation);
    results.push(check(
        "walk_shape_stable",
        same_shape,
        format!(
            "{} -> {} non-void tiles",
            layout.non_void().count(),
            after.non_void().count()
        ),
    ));

    if verbose {
        println!("  Busiest edges after walk:");
        let mut busiest: Vec<_> = state.edges().values().collect();
        busiest.sort_by(|a, b| b.traffic.total_cmp(&a.traffic));
        for e in busiest.iter().take(5) {
            println!("    {:12} {:.2}", e.key().to_string(), e.traffic);
        }
    }

    let removed = state.decay_traffic(1.0 / state.config().decay_rate.max(f32::EPSILON) + 1.0);
    let decayed = state.layout(window, &config);
    results.push(check(
        "decay_clears_traffic",
        state.edges().is_empty() && decayed.non_void().count() == decayed.count(TileType::DoorFrame),
        format!("{removed} edges removed"),
    ));

    results
}

// ── 6. Flicker ──────────────────────────────────────────────────────────

fn validate_flicker() -> Vec<TestResult> {
    println!("--- Flicker ---");
    let room = Room {
        owner: Some("harness".to_string()),
        vibe: Some(VibeVector {
            flicker: 0.9,
            ..VibeVector::fallback()
        }),
        ..Room::empty(GridPos::new(3, 4))
    };
    let run = || {
        let mut clock = FlickerClock::for_room(&room);
        (0..600).map(|_| clock.tick(1.0 / 60.0)).collect::<Vec<f32>>()
    };
    let a = run();
    let b = run();
    let changes = a.windows(2).filter(|w| w[0] != w[1]).count();

    let calm = FlickerClock::for_room(&Room::empty(GridPos::ORIGIN));

    vec![
        check(
            "flicker_deterministic",
            a == b && changes > 0,
            format!("{changes} intensity changes over 10s"),
        ),
        check("flicker_calm_room", !calm.is_active(), "unclaimed room steady"),
    ]
}
