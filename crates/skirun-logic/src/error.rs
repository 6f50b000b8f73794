//! Error type shared by the logic crate.
//!
//! Only configuration problems are errors. Gameplay irregularities such as an
//! unknown or duplicated checkpoint index are logged and surfaced as data.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("no routes configured")]
    NoRoutes,
    #[error("route data not set correctly for index {index}")]
    RouteMissing { index: usize },
    #[error("no checkpoints found under route '{name}'")]
    EmptyRoute { name: String },
    #[error("race started before a route was loaded")]
    RouteNotLoaded,
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, GameError>;

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        GameError::Config(err.to_string())
    }
}
