//! Checkpoint trigger volumes.
//!
//! The tracker has no notion of "already fired"; each trigger suppresses its
//! own repeat overlaps and forwards only the first player crossing.

/// Runtime state of one checkpoint volume in the world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointTrigger {
    pub index: i32,
    visited: bool,
    active: bool,
}

impl CheckpointTrigger {
    pub fn new(index: i32) -> Self {
        Self {
            index,
            visited: false,
            active: true,
        }
    }

    /// Handle an overlap. Returns the logical index to report to the race
    /// tracker, or `None` if the overlap should be ignored.
    pub fn on_overlap(&mut self, is_player: bool) -> Option<i32> {
        if !is_player || self.visited {
            return None;
        }
        self.visited = true;
        // Hide the volume and its collider once crossed.
        self.active = false;
        Some(self.index)
    }

    /// Disable the checkpoint after the tracker has consumed it.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn is_visited(&self) -> bool {
        self.visited
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_player_overlap_reports_index() {
        let mut cp = CheckpointTrigger::new(12);
        assert_eq!(cp.on_overlap(true), Some(12));
        assert!(cp.is_visited());
        assert!(!cp.is_active());
    }

    #[test]
    fn repeat_overlap_suppressed() {
        let mut cp = CheckpointTrigger::new(12);
        cp.on_overlap(true);
        assert_eq!(cp.on_overlap(true), None);
    }

    #[test]
    fn non_player_ignored() {
        let mut cp = CheckpointTrigger::new(3);
        assert_eq!(cp.on_overlap(false), None);
        assert!(!cp.is_visited());
        assert!(cp.is_active());
        // The player can still trigger it afterwards.
        assert_eq!(cp.on_overlap(true), Some(3));
    }

    #[test]
    fn deactivate_keeps_visited_flag() {
        let mut cp = CheckpointTrigger::new(1);
        cp.deactivate();
        assert!(!cp.is_active());
        assert!(!cp.is_visited());
    }
}
