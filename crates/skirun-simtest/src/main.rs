//! SkiRun Headless Race Harness
//!
//! Drives the race logic frame by frame without an engine.
//! Runs entirely in-process — no rendering, no physics, no audio device.
//!
//! Usage:
//!   cargo run -p skirun-simtest
//!   cargo run -p skirun-simtest -- --verbose
//!   cargo run -p skirun-simtest -- --leaderboard scores.json
//!
//! Set `RUST_LOG=debug` to see the logic crate's own logging.

use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;
use skirun_logic::checkpoint::CheckpointTrigger;
use skirun_logic::config::GameConfig;
use skirun_logic::constants::text_keys;
use skirun_logic::door::{Door, DoorState, DoorTrigger, DoorTriggerOutcome};
use skirun_logic::inventory::{KeyPickup, KeyRing};
use skirun_logic::leaderboard::{self, MemoryStore};
use skirun_logic::localization::{LocalizationDatabase, LocalizedText, Localizer};
use skirun_logic::playlist::{AudioOutput, Playlist};
use skirun_logic::race::{
    CheckpointOutcome, OrderMapping, RacePhase, RaceProgressTracker, RaceResult, RaceWorld,
};
use skirun_logic::route::{Pose, Route, RouteSelection, RouteSet};
use skirun_logic::session::GameSession;

// ── Fixtures (same JSON a game build ships) ─────────────────────────────
const ROUTES_JSON: &str = include_str!("../../../data/routes.json");
const LOCALIZATION_JSON: &str = include_str!("../../../data/localization.json");

/// Fixed frame step, 50 Hz.
const DT: f32 = 0.02;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

struct Args {
    verbose: bool,
    leaderboard: Option<PathBuf>,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let leaderboard = args
        .iter()
        .position(|a| a == "--leaderboard")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from);
    Args {
        verbose: args.iter().any(|a| a == "--verbose"),
        leaderboard,
    }
}

fn main() {
    env_logger::init();
    let args = parse_args();
    println!("=== SkiRun Race Harness ===\n");

    let config = GameConfig::default();
    let mut results = Vec::new();

    // 1. Route fixture validation
    let routes = match RouteSet::from_json(ROUTES_JSON) {
        Ok(r) => r,
        Err(e) => {
            println!("  ✗ routes_parse: {}", e);
            std::process::exit(1);
        }
    };
    results.extend(validate_routes(&routes, args.verbose));

    // 2. Scripted races on every route
    results.extend(validate_races(&routes, &config, args.verbose));

    // 3. Session + leaderboard
    results.extend(validate_session(&routes, &config, args.leaderboard.as_ref()));

    // 4. Key and door puzzle
    results.extend(validate_doors(&config));

    // 5. Music playlist
    results.extend(validate_playlist(&routes, &config));

    // 6. Localization database
    results.extend(validate_localization(args.verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || args.verbose {
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

// ── Simulated world ─────────────────────────────────────────────────────

/// One route's worth of scene: runner pose and checkpoint volumes.
struct SimWorld {
    runner: Option<Pose>,
    volumes: Vec<CheckpointTrigger>,
}

impl SimWorld {
    fn for_route(route: &Route) -> Self {
        Self {
            runner: None,
            volumes: route
                .checkpoints
                .iter()
                .map(|cp| CheckpointTrigger::new(cp.index))
                .collect(),
        }
    }

    /// Player overlaps the first live volume carrying `index`.
    fn cross(&mut self, index: i32) -> Option<i32> {
        self.volumes
            .iter_mut()
            .find(|v| v.index == index && v.is_active())
            .and_then(|v| v.on_overlap(true))
    }
}

impl RaceWorld for SimWorld {
    fn place_runner(&mut self, pose: &Pose) -> bool {
        self.runner = Some(*pose);
        true
    }

    fn deactivate_checkpoint(&mut self, slot: usize) {
        match self.volumes.get_mut(slot) {
            Some(v) => v.deactivate(),
            None => log::warn!("No checkpoint volume in slot {}", slot),
        }
    }
}

/// Outcome of a scripted run.
struct RunReport {
    phase: RacePhase,
    outcomes: Vec<CheckpointOutcome>,
    reported: Vec<RaceResult>,
    tracker: RaceProgressTracker,
    world: SimWorld,
}

/// Load `selection`, then cross `script` with `frames_between` frames before
/// each crossing.
fn run_script(
    routes: &RouteSet,
    selection: RouteSelection,
    max_chances: i32,
    script: &[i32],
    frames_between: usize,
) -> Option<RunReport> {
    let route = routes.select(selection).ok()?;
    let mut world = SimWorld::for_route(route);
    let mut tracker = RaceProgressTracker::new(max_chances);
    tracker.begin_selected(routes, selection, &mut world).ok()?;

    let mut reported: Vec<RaceResult> = Vec::new();
    let mut outcomes = Vec::new();
    for &index in script {
        for _ in 0..frames_between {
            tracker.advance_timer(DT);
        }
        match world.cross(index) {
            Some(hit) => {
                outcomes.push(tracker.on_checkpoint_reached(hit, &mut world, &mut reported))
            }
            // Unplaced index: deliver it anyway, the tracker must shrug it off.
            None if !world.volumes.iter().any(|v| v.index == index) => {
                outcomes.push(tracker.on_checkpoint_reached(index, &mut world, &mut reported))
            }
            None => {}
        }
    }
    Some(RunReport {
        phase: tracker.phase(),
        outcomes,
        reported,
        tracker,
        world,
    })
}

fn sorted_indices(route: &Route) -> Vec<i32> {
    let mut indices: Vec<i32> = route.checkpoints.iter().map(|c| c.index).collect();
    indices.sort();
    indices
}

// ── 1. Routes ───────────────────────────────────────────────────────────

fn validate_routes(routes: &RouteSet, verbose: bool) -> Vec<TestResult> {
    println!("--- Routes ---");
    let mut results = Vec::new();

    results.push(TestResult {
        name: "routes_not_empty".into(),
        passed: !routes.is_empty(),
        detail: format!("{} routes loaded", routes.len()),
    });

    for (i, slot) in routes.routes.iter().enumerate() {
        let Some(route) = slot else {
            results.push(TestResult {
                name: format!("route_{}_present", i),
                passed: false,
                detail: "route slot is empty".into(),
            });
            continue;
        };
        let mapping = OrderMapping::build(&route.checkpoints);
        if verbose {
            println!(
                "  {}: {} checkpoints, indices {:?}",
                route.name,
                route.checkpoints.len(),
                sorted_indices(route)
            );
        }
        results.push(TestResult {
            name: format!("route_{}_has_checkpoints", i),
            passed: !route.checkpoints.is_empty(),
            detail: format!("'{}' has {} checkpoints", route.name, route.checkpoints.len()),
        });
        results.push(TestResult {
            name: format!("route_{}_unique_indices", i),
            passed: mapping.duplicates().is_empty(),
            detail: if mapping.duplicates().is_empty() {
                "all logical indices unique".into()
            } else {
                format!("duplicate indices {:?}", mapping.duplicates())
            },
        });
    }

    // Menu selections outside the route list clamp instead of failing
    let clamped_high = routes.clamp_index(RouteSelection(99));
    let clamped_low = routes.clamp_index(RouteSelection(-1));
    results.push(TestResult {
        name: "route_selection_clamps".into(),
        passed: clamped_high == Some(routes.len().saturating_sub(1)) && clamped_low == Some(0),
        detail: format!("99 → {:?}, -1 → {:?}", clamped_high, clamped_low),
    });

    results
}

// ── 2. Races ────────────────────────────────────────────────────────────

fn validate_races(routes: &RouteSet, config: &GameConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Races ---");
    let mut results = Vec::new();
    let max_chances = config.race.max_chances;

    for (i, route) in routes.routes.iter().enumerate() {
        let Some(route) = route else { continue };
        let selection = RouteSelection(i as i64);
        let in_order = sorted_indices(route);
        let n = in_order.len();

        // Clean run
        match run_script(routes, selection, max_chances, &in_order, 150) {
            Some(run) => {
                let finished = run.phase == RacePhase::Finished
                    && run.tracker.current_order() == n
                    && run.reported.len() == 1
                    && run.reported[0].success;
                if verbose {
                    println!(
                        "  {}: clean run in {:.2}s",
                        route.name,
                        run.tracker.timer()
                    );
                }
                results.push(TestResult {
                    name: format!("race_{}_clean_run_finishes", i),
                    passed: finished,
                    detail: format!(
                        "phase {:?}, order {}/{}, reported {}",
                        run.phase,
                        run.tracker.current_order(),
                        n,
                        run.reported.len()
                    ),
                });
                results.push(TestResult {
                    name: format!("race_{}_runner_at_start", i),
                    passed: run.world.runner == Some(route.start),
                    detail: format!("runner at {:?}", run.world.runner.map(|p| p.position)),
                });
                results.push(TestResult {
                    name: format!("race_{}_volumes_consumed", i),
                    passed: run.world.volumes.iter().all(|v| !v.is_active()),
                    detail: "every checkpoint volume disabled".into(),
                });
            }
            None => results.push(TestResult {
                name: format!("race_{}_clean_run_finishes", i),
                passed: false,
                detail: "route failed to load".into(),
            }),
        }

        if n < 3 {
            continue;
        }

        // One skipped checkpoint costs one chance and keeps racing
        let skip_one = [in_order[0], in_order[2]];
        if let Some(run) = run_script(routes, selection, max_chances, &skip_one, 10) {
            let ok = run.phase == RacePhase::Running
                && run.tracker.chances() == max_chances - 1
                && run.tracker.current_order() == 3;
            results.push(TestResult {
                name: format!("race_{}_single_skip_penalized", i),
                passed: ok,
                detail: format!(
                    "chances {}, order {}",
                    run.tracker.chances(),
                    run.tracker.current_order()
                ),
            });
        }

        // Jumping straight to the last checkpoint burns the budget
        let reckless = [in_order[n - 1]];
        if let Some(run) = run_script(routes, selection, max_chances, &reckless, 10) {
            let expected = if (n as i32 - 1) >= max_chances {
                RacePhase::Failed
            } else {
                RacePhase::Running
            };
            results.push(TestResult {
                name: format!("race_{}_reckless_jump", i),
                passed: run.phase == expected,
                detail: format!("{} skipped → {:?}", n - 1, run.phase),
            });
        }

        // Unknown indices change nothing
        let unknown = [in_order[0], -999];
        if let Some(run) = run_script(routes, selection, max_chances, &unknown, 1) {
            let ok = run.outcomes.last() == Some(&CheckpointOutcome::Unknown)
                && run.tracker.current_order() == 1
                && run.tracker.chances() == max_chances;
            results.push(TestResult {
                name: format!("race_{}_unknown_ignored", i),
                passed: ok,
                detail: format!("last outcome {:?}", run.outcomes.last()),
            });
        }
    }

    // Empty route refuses to start
    let empty = RouteSet::new(vec![Route::new("Unbuilt", Pose::default(), &[])]);
    let mut world = SimWorld::for_route(&Route::new("Unbuilt", Pose::default(), &[]));
    let mut tracker = RaceProgressTracker::new(max_chances);
    let err = tracker.begin_selected(&empty, RouteSelection(0), &mut world);
    results.push(TestResult {
        name: "race_empty_route_rejected".into(),
        passed: err.is_err() && tracker.phase() == RacePhase::NotStarted,
        detail: match err {
            Err(e) => format!("rejected: {}", e),
            Ok(()) => "accepted an empty route".into(),
        },
    });

    results
}

// ── 3. Session & leaderboard ────────────────────────────────────────────

fn validate_session(
    routes: &RouteSet,
    config: &GameConfig,
    leaderboard_path: Option<&PathBuf>,
) -> Vec<TestResult> {
    println!("--- Session & Leaderboard ---");
    let mut results = Vec::new();

    let mut store = match leaderboard_path.map(std::fs::read_to_string) {
        Some(Ok(json)) => match MemoryStore::from_json(&json) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("Ignoring unreadable leaderboard file: {}", e);
                MemoryStore::new()
            }
        },
        _ => MemoryStore::new(),
    };
    let before = leaderboard::load_scores(&store).len();

    let selection = RouteSelection(0);
    let Ok(route) = routes.select(selection) else {
        results.push(TestResult {
            name: "session_route".into(),
            passed: false,
            detail: "no route to race".into(),
        });
        return results;
    };
    let mut world = SimWorld::for_route(route);
    let mut tracker = RaceProgressTracker::new(config.race.max_chances);
    let mut session = GameSession::new(config.session.clone());
    if tracker.begin_selected(routes, selection, &mut world).is_err() {
        return results;
    }

    // Host loop: sit in the pause menu for a while mid-run, then finish.
    let frame = |tracker: &mut RaceProgressTracker, session: &mut GameSession| {
        let dt = DT * session.time_scale();
        tracker.advance_timer(dt);
        session.tick(dt);
    };
    for (step, &index) in sorted_indices(route).iter().enumerate() {
        if step == 1 {
            session.toggle_pause();
            for _ in 0..250 {
                frame(&mut tracker, &mut session);
            }
            session.resume();
        }
        for _ in 0..100 {
            frame(&mut tracker, &mut session);
        }
        if let Some(hit) = world.cross(index) {
            tracker.on_checkpoint_reached(hit, &mut world, &mut session);
        }
    }

    let result = session.result();
    results.push(TestResult {
        name: "session_receives_result".into(),
        passed: result.is_some(),
        detail: format!("{:?}", result),
    });
    results.push(TestResult {
        name: "session_pause_froze_clock".into(),
        passed: (session.elapsed() - tracker.timer()).abs() < 1e-3,
        detail: format!(
            "session {:.2}s vs race {:.2}s",
            session.elapsed(),
            tracker.timer()
        ),
    });

    let localizer = match LocalizationDatabase::from_json(LOCALIZATION_JSON) {
        Ok(db) => Localizer::new(db),
        Err(_) => Localizer::empty(),
    };
    if let Some(text) = session.finish_text(&localizer) {
        println!("  {}", text.replace('\n', " | "));
    }

    let (_, board) = session.submit_score(Some("sim"), &mut store, config.leaderboard.max_entries);
    results.push(TestResult {
        name: "leaderboard_saved".into(),
        passed: board.iter().any(|e| e.name == "SIM")
            || board.len() == config.leaderboard.max_entries,
        detail: format!("{} → {} entries", before, board.len()),
    });
    results.push(TestResult {
        name: "leaderboard_sorted".into(),
        passed: board.windows(2).all(|w| w[0].time <= w[1].time),
        detail: "times ascending".into(),
    });
    let empty_text = localizer.get(text_keys::LEADERBOARD_EMPTY, "No scores yet.");
    print!("{}", leaderboard::render(&board, &empty_text));

    if let Some(path) = leaderboard_path {
        let written = store
            .to_json()
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(path, json).map_err(|e| e.to_string()));
        results.push(TestResult {
            name: "leaderboard_persisted".into(),
            passed: written.is_ok(),
            detail: match written {
                Ok(()) => format!("written to {}", path.display()),
                Err(e) => e,
            },
        });
    }

    results
}

// ── 4. Doors ────────────────────────────────────────────────────────────

fn validate_doors(config: &GameConfig) -> Vec<TestResult> {
    println!("--- Keys & Doors ---");
    let mut results = Vec::new();

    let mut ring = KeyRing::new();
    let mut pickup = KeyPickup::new("KeyA");
    let trigger = DoorTrigger::new("KeyA");
    let mut door = Door::new("KeyA", [10.0, 0.0, 5.0], &config.door);

    let locked = trigger.on_overlap(true, Some(&ring), &mut door);
    results.push(TestResult {
        name: "door_locked_without_key".into(),
        passed: locked == DoorTriggerOutcome::Locked && door.state() == DoorState::Closed,
        detail: format!("{:?}", locked),
    });

    let taken = pickup.on_overlap(true, Some(&mut ring));
    let taken_twice = pickup.on_overlap(true, Some(&mut ring));
    results.push(TestResult {
        name: "key_pickup_once".into(),
        passed: taken && !taken_twice && ring.has_key("KeyA"),
        detail: format!("first {}, second {}", taken, taken_twice),
    });

    let unlocked = trigger.on_overlap(true, Some(&ring), &mut door);
    let frames = (config.door.open_duration / DT).ceil() as usize + 1;
    let mut halfway = None;
    for frame in 0..frames {
        door.tick(DT);
        if frame == frames / 2 {
            halfway = Some(door.position()[1]);
        }
    }
    results.push(TestResult {
        name: "door_opens_with_key".into(),
        passed: unlocked == DoorTriggerOutcome::Unlocked && door.is_open(),
        detail: format!("{:?} after {} frames", door.state(), frames),
    });
    results.push(TestResult {
        name: "door_slides_up".into(),
        passed: halfway.is_some_and(|y| y > 0.0 && y < config.door.open_height)
            && door.position()[1] == config.door.open_height,
        detail: format!(
            "mid {:?}, final {:.2}",
            halfway,
            door.position()[1]
        ),
    });

    results
}

// ── 5. Playlist ─────────────────────────────────────────────────────────

/// Audio source whose tracks last a fixed number of frames.
struct FrameClock {
    track_frames: usize,
    remaining: usize,
    history: Vec<usize>,
}

impl AudioOutput for FrameClock {
    fn play(&mut self, track: usize) {
        self.history.push(track);
        self.remaining = self.track_frames;
    }
    fn pause(&mut self) {}
    fn resume(&mut self) {}
    fn stop(&mut self) {
        self.remaining = 0;
    }
    fn set_volume(&mut self, _volume: f32) {}
    fn is_playing(&self) -> bool {
        self.remaining > 0
    }
}

impl FrameClock {
    fn advance(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }
}

fn validate_playlist(routes: &RouteSet, config: &GameConfig) -> Vec<TestResult> {
    println!("--- Playlist ---");
    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(42);

    let mut out = FrameClock {
        track_frames: 30,
        remaining: 0,
        history: Vec::new(),
    };
    let mut playlist = Playlist::new(3, &config.playlist);
    playlist.start(&mut out);
    for _ in 0..200 {
        out.advance();
        playlist.tick(&mut out, &mut rng);
    }
    results.push(TestResult {
        name: "playlist_cycles".into(),
        passed: out.history.starts_with(&[0, 1, 2, 0]),
        detail: format!("{:?}", out.history),
    });

    // Full host frame: clocks, overlaps, music. The race end stops the music.
    let Some(route) = routes.select(RouteSelection(0)).ok() else {
        return results;
    };
    let script = sorted_indices(route);
    let mut world = SimWorld::for_route(route);
    let mut tracker = RaceProgressTracker::new(config.race.max_chances);
    let mut session = GameSession::new(config.session.clone());
    if tracker
        .begin_selected(routes, RouteSelection(0), &mut world)
        .is_err()
    {
        return results;
    }
    let mut out = FrameClock {
        track_frames: 30,
        remaining: 0,
        history: Vec::new(),
    };
    let mut playlist = Playlist::new(3, &config.playlist);
    playlist.start(&mut out);

    let mut stopped_at = None;
    for frame in 0..400 {
        let dt = DT * session.time_scale();
        tracker.advance_timer(dt);
        session.tick(dt);
        if frame % 40 == 39 {
            if let Some(hit) = script.get(frame / 40).and_then(|&i| world.cross(i)) {
                tracker.on_checkpoint_reached(hit, &mut world, &mut session);
                if tracker.phase().is_terminal() && stopped_at.is_none() {
                    playlist.stop(&mut out);
                    stopped_at = Some(out.history.len());
                }
            }
        }
        out.advance();
        playlist.tick(&mut out, &mut rng);
    }
    results.push(TestResult {
        name: "playlist_stops_on_race_end".into(),
        passed: tracker.phase() == RacePhase::Finished
            && playlist.is_stopped()
            && stopped_at == Some(out.history.len()),
        detail: format!(
            "phase {:?}, {:?} tracks at finish, {} at end",
            tracker.phase(),
            stopped_at,
            out.history.len()
        ),
    });

    results
}

// ── 6. Localization ─────────────────────────────────────────────────────

fn validate_localization(verbose: bool) -> Vec<TestResult> {
    println!("--- Localization ---");
    let mut results = Vec::new();

    let db = match LocalizationDatabase::from_json(LOCALIZATION_JSON) {
        Ok(db) => db,
        Err(e) => {
            results.push(TestResult {
                name: "localization_parse".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            return results;
        }
    };

    results.push(TestResult {
        name: "localization_languages".into(),
        passed: !db.languages.is_empty(),
        detail: db
            .languages
            .iter()
            .map(|l| l.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    });

    let missing = db.missing_keys();
    results.push(TestResult {
        name: "localization_complete".into(),
        passed: missing.is_empty(),
        detail: if missing.is_empty() {
            format!("{} keys in every language", db.all_keys().len())
        } else {
            format!("{} untranslated: {:?}", missing.len(), missing)
        },
    });

    let mut localizer = Localizer::new(db);
    let label = LocalizedText::new(text_keys::FINISH_SUCCESS, "FINISH");
    let mut seen = Vec::new();
    for idx in 0..localizer.database().languages.len() {
        localizer.set_language(idx);
        seen.push(label.resolve(&localizer));
    }
    if verbose {
        println!("  finish label: {:?}", seen);
    }
    let distinct = {
        let mut s = seen.clone();
        s.sort();
        s.dedup();
        s.len()
    };
    results.push(TestResult {
        name: "localization_switches".into(),
        passed: distinct == seen.len(),
        detail: format!("{} languages, {} distinct labels", seen.len(), distinct),
    });

    results
}
