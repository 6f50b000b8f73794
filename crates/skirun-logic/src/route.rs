//! Routes, start poses, and the menu's route selection.
//!
//! A `RouteSet` holds every route placed in the game scene. The title menu
//! picks one by index; the race clamps that index into range before use.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// Position plus orientation (quaternion, xyzw).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: [f32; 3],
    #[serde(default = "identity_rotation")]
    pub rotation: [f32; 4],
}

fn identity_rotation() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

impl Pose {
    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: [x, y, z],
            rotation: identity_rotation(),
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::at(0.0, 0.0, 0.0)
    }
}

/// A checkpoint as placed by level design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointDef {
    /// Logical index, e.g. 10, 11, 12 or 20..27. Need not be contiguous.
    pub index: i32,
}

/// A named route: start pose plus its checkpoints in scene order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub name: String,
    pub start: Pose,
    pub checkpoints: Vec<CheckpointDef>,
}

impl Route {
    pub fn new(name: impl Into<String>, start: Pose, indices: &[i32]) -> Self {
        Self {
            name: name.into(),
            start,
            checkpoints: indices.iter().map(|&index| CheckpointDef { index }).collect(),
        }
    }
}

/// Index chosen on the route select page. Defaults to the first route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSelection(pub i64);

/// Every route available in the game scene.
///
/// A `None` slot is a route whose scene references were never wired up.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteSet {
    pub routes: Vec<Option<Route>>,
}

impl RouteSet {
    pub fn new(routes: Vec<Route>) -> Self {
        Self {
            routes: routes.into_iter().map(Some).collect(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Clamp a menu selection into `0..len`.
    pub fn clamp_index(&self, selection: RouteSelection) -> Option<usize> {
        if self.routes.is_empty() {
            return None;
        }
        let last = self.routes.len() as i64 - 1;
        Some(selection.0.clamp(0, last) as usize)
    }

    /// Resolve the selected route, clamping out-of-range selections.
    pub fn select(&self, selection: RouteSelection) -> Result<&Route> {
        let Some(index) = self.clamp_index(selection) else {
            log::error!("No routes configured.");
            return Err(GameError::NoRoutes);
        };
        log::info!("Using route index = {}", index);
        match &self.routes[index] {
            Some(route) => Ok(route),
            None => {
                log::error!("Route data not set correctly for index {}", index);
                Err(GameError::RouteMissing { index })
            }
        }
    }
}
