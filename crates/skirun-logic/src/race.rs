//! Race progress tracking — checkpoint order, skip penalties, race lifecycle.
//!
//! A route's checkpoints carry level-designed logical indices (10, 11, 12 or
//! 20..27, not necessarily contiguous). At race start they are sorted into a
//! race order, and the tracker then expects them to be crossed in that order.
//!
//! # Skips
//!
//! Crossing a checkpoint other than the expected one costs
//! `|order - expected|` chances. If chances remain, the crossed checkpoint is
//! treated as consumed and the tracker resumes expecting the one after it.
//! When chances reach zero the race fails.
//!
//! A skip never finishes the race, even when the forced progress lands on
//! the last checkpoint; only an in-order crossing of the final checkpoint
//! does.
//!
//! ```
//! use skirun_logic::race::{
//!     CheckpointOutcome, RacePhase, RaceProgressTracker, RaceResult, RaceWorld,
//! };
//! use skirun_logic::route::{Pose, Route};
//!
//! struct NoWorld;
//! impl RaceWorld for NoWorld {
//!     fn place_runner(&mut self, _pose: &Pose) -> bool { true }
//!     fn deactivate_checkpoint(&mut self, _slot: usize) {}
//! }
//!
//! let route = Route::new("Blue", Pose::default(), &[10, 11, 12]);
//! let mut tracker = RaceProgressTracker::new(3);
//! tracker.begin_route(&route, &mut NoWorld).unwrap();
//! tracker.start_race().unwrap();
//!
//! let mut results: Vec<RaceResult> = Vec::new();
//! tracker.on_checkpoint_reached(10, &mut NoWorld, &mut results);
//! let outcome = tracker.on_checkpoint_reached(12, &mut NoWorld, &mut results);
//! assert!(matches!(outcome, CheckpointOutcome::Skipped { missed: 1, chances_left: 2, .. }));
//! assert_eq!(tracker.phase(), RacePhase::Running);
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MAX_CHANCES;
use crate::error::{GameError, Result};
use crate::route::{CheckpointDef, Pose, Route, RouteSelection, RouteSet};

// ============================================================================
// COLLABORATORS
// ============================================================================

/// The scene the race runs in.
pub trait RaceWorld {
    /// Teleport the runner to a route's start pose. Returns `false` when the
    /// world has no runner to move.
    fn place_runner(&mut self, pose: &Pose) -> bool;
    /// Disable the checkpoint at `slot` (its position in `Route::checkpoints`).
    fn deactivate_checkpoint(&mut self, slot: usize);
}

/// Receives the terminal result, exactly once per race.
pub trait RaceResultSink {
    fn report_race_result(&mut self, success: bool, elapsed_seconds: f32);
}

/// Collects results in order. Handy for hosts that poll instead of react.
impl RaceResultSink for Vec<RaceResult> {
    fn report_race_result(&mut self, success: bool, elapsed_seconds: f32) {
        self.push(RaceResult {
            success,
            elapsed_seconds,
        });
    }
}

// ============================================================================
// STATE
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RacePhase {
    #[default]
    NotStarted,
    Running,
    Finished,
    Failed,
}

impl RacePhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, RacePhase::Finished | RacePhase::Failed)
    }
}

/// Terminal result of a race.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RaceResult {
    pub success: bool,
    pub elapsed_seconds: f32,
}

/// Mutable per-race state. Replaced wholesale on every new race.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RaceState {
    /// Order of the next checkpoint the runner must reach.
    pub current_order: usize,
    /// Remaining skip budget. May go negative on the failing skip.
    pub chances: i32,
    /// Seconds elapsed while running.
    pub timer: f32,
    pub phase: RacePhase,
}

/// What a checkpoint crossing did to the race.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CheckpointOutcome {
    /// Race is not running; nothing changed.
    Ignored,
    /// Index is not part of the loaded route; nothing changed.
    Unknown,
    /// The expected checkpoint was crossed.
    Advanced { order: usize },
    /// Checkpoints were skipped; progress was forced past `order`.
    Skipped {
        order: usize,
        missed: usize,
        chances_left: i32,
    },
    Finished(RaceResult),
    Failed(RaceResult),
}

// ============================================================================
// ORDER MAPPING
// ============================================================================

/// Logical index → race order.
///
/// Built by a stable sort on logical index. The order assigned is the
/// checkpoint's position in the sorted list; on a duplicated index the first
/// occurrence keeps its order and later ones are left out of the map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderMapping {
    orders: HashMap<i32, usize>,
    duplicates: Vec<i32>,
}

impl OrderMapping {
    pub fn build(checkpoints: &[CheckpointDef]) -> Self {
        let mut sorted: Vec<i32> = checkpoints.iter().map(|cp| cp.index).collect();
        sorted.sort();

        let mut orders = HashMap::with_capacity(sorted.len());
        let mut duplicates = Vec::new();
        for (order, index) in sorted.into_iter().enumerate() {
            if orders.contains_key(&index) {
                duplicates.push(index);
            } else {
                orders.insert(index, order);
            }
        }
        Self { orders, duplicates }
    }

    pub fn order_of(&self, index: i32) -> Option<usize> {
        self.orders.get(&index).copied()
    }

    /// Number of distinct logical indices mapped.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Logical indices that appeared more than once (one entry per extra copy).
    pub fn duplicates(&self) -> &[i32] {
        &self.duplicates
    }
}

/// Route data the tracker keeps for the current race.
#[derive(Debug, Clone)]
struct LoadedRoute {
    name: String,
    mapping: OrderMapping,
    /// Logical indices in scene order, for deactivation lookups.
    slots: Vec<i32>,
}

impl LoadedRoute {
    fn total_checkpoints(&self) -> usize {
        self.slots.len()
    }

    fn first_slot_of(&self, index: i32) -> Option<usize> {
        self.slots.iter().position(|&i| i == index)
    }
}

// ============================================================================
// TRACKER
// ============================================================================

/// Owns the checkpoint order and race state for one route at a time.
#[derive(Debug, Clone)]
pub struct RaceProgressTracker {
    max_chances: i32,
    route: Option<LoadedRoute>,
    state: RaceState,
}

impl Default for RaceProgressTracker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHANCES)
    }
}

impl RaceProgressTracker {
    pub fn new(max_chances: i32) -> Self {
        Self {
            max_chances,
            route: None,
            state: RaceState::default(),
        }
    }

    /// Load a route: build its order mapping and place the runner at its start.
    ///
    /// Discards any previous race. On error the tracker is left without a
    /// route and `start_race` will refuse to run.
    pub fn begin_route(&mut self, route: &Route, world: &mut impl RaceWorld) -> Result<()> {
        self.route = None;
        self.state = RaceState::default();

        if route.checkpoints.is_empty() {
            log::error!("No checkpoints found under route '{}'", route.name);
            return Err(GameError::EmptyRoute {
                name: route.name.clone(),
            });
        }

        let mapping = OrderMapping::build(&route.checkpoints);
        for index in mapping.duplicates() {
            log::warn!(
                "Duplicate checkpoint index {} in route '{}'",
                index,
                route.name
            );
        }

        let loaded = LoadedRoute {
            name: route.name.clone(),
            mapping,
            slots: route.checkpoints.iter().map(|cp| cp.index).collect(),
        };
        log::info!(
            "Using route '{}' with {} checkpoints",
            loaded.name,
            loaded.total_checkpoints()
        );
        self.route = Some(loaded);

        if !world.place_runner(&route.start) {
            log::warn!(
                "No runner in the world; route '{}' loaded without placing one",
                route.name
            );
        }
        Ok(())
    }

    /// Resolve the menu's selection, load that route and start the race.
    pub fn begin_selected(
        &mut self,
        routes: &RouteSet,
        selection: RouteSelection,
        world: &mut impl RaceWorld,
    ) -> Result<()> {
        let route = match routes.select(selection) {
            Ok(route) => route,
            Err(err) => {
                self.route = None;
                self.state = RaceState::default();
                return Err(err);
            }
        };
        self.begin_route(route, world)?;
        self.start_race()
    }

    /// Reset timer, progress and chances, and start running.
    ///
    /// Calling this mid-race restarts the race on the same route.
    pub fn start_race(&mut self) -> Result<()> {
        let Some(route) = &self.route else {
            log::error!("Race start requested before a route was loaded");
            return Err(GameError::RouteNotLoaded);
        };
        self.state = RaceState {
            current_order: 0,
            chances: self.max_chances,
            timer: 0.0,
            phase: RacePhase::Running,
        };
        log::info!(
            "Race started. Total checkpoints: {}",
            route.total_checkpoints()
        );
        Ok(())
    }

    /// Per-tick clock. Only counts while running.
    pub fn advance_timer(&mut self, delta_seconds: f32) {
        if self.state.phase == RacePhase::Running {
            self.state.timer += delta_seconds;
        }
    }

    /// Handle the runner crossing the checkpoint with logical index `index`.
    pub fn on_checkpoint_reached(
        &mut self,
        index: i32,
        world: &mut impl RaceWorld,
        sink: &mut impl RaceResultSink,
    ) -> CheckpointOutcome {
        log::debug!("Checkpoint hit with index: {}", index);

        if self.state.phase != RacePhase::Running {
            return CheckpointOutcome::Ignored;
        }
        let Some(route) = &self.route else {
            return CheckpointOutcome::Ignored;
        };
        let Some(order) = route.mapping.order_of(index) else {
            log::warn!("Unknown checkpoint index {}", index);
            return CheckpointOutcome::Unknown;
        };
        let total = route.total_checkpoints();
        let slot = route.first_slot_of(index);

        log::debug!(
            "Converted to order: {}, expected order: {}",
            order,
            self.state.current_order
        );

        if order == self.state.current_order {
            self.state.current_order += 1;
            if let Some(slot) = slot {
                world.deactivate_checkpoint(slot);
            }
            if self.state.current_order >= total {
                return CheckpointOutcome::Finished(self.finish(true, sink));
            }
            return CheckpointOutcome::Advanced { order };
        }

        let missed = order.abs_diff(self.state.current_order);
        self.state.chances -= missed as i32;
        log::info!(
            "Skipped {} checkpoint(s). Chances left: {}",
            missed,
            self.state.chances
        );

        if self.state.chances <= 0 {
            return CheckpointOutcome::Failed(self.finish(false, sink));
        }

        // Treat the crossed checkpoint as consumed, even if it was behind us.
        self.state.current_order = order + 1;
        if let Some(slot) = slot {
            world.deactivate_checkpoint(slot);
        }
        CheckpointOutcome::Skipped {
            order,
            missed,
            chances_left: self.state.chances,
        }
    }

    fn finish(&mut self, success: bool, sink: &mut impl RaceResultSink) -> RaceResult {
        let result = RaceResult {
            success,
            elapsed_seconds: self.state.timer,
        };
        if success {
            self.state.phase = RacePhase::Finished;
            log::info!("Finished in {:.2} seconds", self.state.timer);
        } else {
            self.state.phase = RacePhase::Failed;
            log::info!("Failed: no chances left");
        }
        sink.report_race_result(result.success, result.elapsed_seconds);
        result
    }

    pub fn state(&self) -> &RaceState {
        &self.state
    }

    pub fn phase(&self) -> RacePhase {
        self.state.phase
    }

    pub fn current_order(&self) -> usize {
        self.state.current_order
    }

    pub fn chances(&self) -> i32 {
        self.state.chances
    }

    pub fn timer(&self) -> f32 {
        self.state.timer
    }

    pub fn max_chances(&self) -> i32 {
        self.max_chances
    }

    /// Checkpoints physically present on the loaded route (0 if none).
    pub fn total_checkpoints(&self) -> usize {
        self.route.as_ref().map_or(0, LoadedRoute::total_checkpoints)
    }

    pub fn route_name(&self) -> Option<&str> {
        self.route.as_ref().map(|r| r.name.as_str())
    }

    pub fn mapping(&self) -> Option<&OrderMapping> {
        self.route.as_ref().map(|r| &r.mapping)
    }
}
