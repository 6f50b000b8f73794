//! Pure race logic for SkiRun.
//!
//! This crate contains the game rules that are independent of any engine,
//! renderer, or file system. Types take plain data and talk to the world
//! through small collaborator traits, so every rule is unit-testable and the
//! same code can sit behind any engine's frame loop.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`checkpoint`] | Checkpoint volumes with one-shot trigger suppression |
//! | [`config`] | Game tunables (chances, leaderboard size, door timing, audio) |
//! | [`constants`] | Store keys, placeholders, localization keys |
//! | [`controls`] | Walk/ski mode toggle, tutorial panel |
//! | [`door`] | Key-locked sliding doors as a timed state machine |
//! | [`error`] | Configuration error type |
//! | [`feedback`] | Speed-driven slide and heartbeat sound levels |
//! | [`inventory`] | Collected keys and key pickups |
//! | [`leaderboard`] | Top-10 times in a key-value store |
//! | [`localization`] | Language database and text lookup |
//! | [`playlist`] | Background music sequencing |
//! | [`race`] | Checkpoint order, skip penalties, race lifecycle |
//! | [`route`] | Routes, start poses, route selection |
//! | [`session`] | Pause, finish screen, score submission |

pub mod checkpoint;
pub mod config;
pub mod constants;
pub mod controls;
pub mod door;
pub mod error;
pub mod feedback;
pub mod inventory;
pub mod leaderboard;
pub mod localization;
pub mod playlist;
pub mod race;
pub mod route;
pub mod session;

pub use error::{GameError, Result};
