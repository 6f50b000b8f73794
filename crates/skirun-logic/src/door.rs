//! Key-locked sliding doors.
//!
//! A door opens by sliding straight up over a fixed duration. The slide is a
//! plain state machine advanced once per frame:
//!
//! ```text
//! Closed ──try_open(key)──▶ Opening { elapsed } ──tick…──▶ Open
//! ```

use crate::config::DoorConfig;
use crate::constants::DEFAULT_KEY_ID;
use crate::inventory::KeyRing;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DoorState {
    Closed,
    Opening { elapsed: f32 },
    Open,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Door {
    pub required_key: String,
    closed_position: [f32; 3],
    open_height: f32,
    open_duration: f32,
    state: DoorState,
}

impl Door {
    pub fn new(required_key: impl Into<String>, closed_position: [f32; 3], cfg: &DoorConfig) -> Self {
        Self {
            required_key: required_key.into(),
            closed_position,
            open_height: cfg.open_height,
            open_duration: cfg.open_duration,
            state: DoorState::Closed,
        }
    }

    /// Start opening if closed and `key_id` fits. Returns whether it started.
    pub fn try_open(&mut self, key_id: &str) -> bool {
        if self.state != DoorState::Closed || key_id != self.required_key {
            return false;
        }
        self.state = DoorState::Opening { elapsed: 0.0 };
        true
    }

    pub fn tick(&mut self, dt: f32) {
        if let DoorState::Opening { elapsed } = self.state {
            let elapsed = elapsed + dt;
            self.state = if elapsed >= self.open_duration {
                DoorState::Open
            } else {
                DoorState::Opening { elapsed }
            };
        }
    }

    /// Slide progress in `0.0..=1.0`.
    pub fn progress(&self) -> f32 {
        match self.state {
            DoorState::Closed => 0.0,
            DoorState::Opening { .. } if self.open_duration <= 0.0 => 1.0,
            DoorState::Opening { elapsed } => (elapsed / self.open_duration).clamp(0.0, 1.0),
            DoorState::Open => 1.0,
        }
    }

    pub fn position(&self) -> [f32; 3] {
        let [x, y, z] = self.closed_position;
        [x, y + self.open_height * self.progress(), z]
    }

    pub fn state(&self) -> DoorState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == DoorState::Open
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorTriggerOutcome {
    /// Not the player, or the player has no inventory.
    Ignored,
    /// The player lacks the key.
    Locked,
    /// The key fits; the door was asked to open.
    Unlocked,
}

/// Volume in front of a door that opens it for a key holder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoorTrigger {
    pub required_key: String,
}

impl Default for DoorTrigger {
    fn default() -> Self {
        Self {
            required_key: DEFAULT_KEY_ID.to_string(),
        }
    }
}

impl DoorTrigger {
    pub fn new(required_key: impl Into<String>) -> Self {
        Self {
            required_key: required_key.into(),
        }
    }

    pub fn on_overlap(
        &self,
        is_player: bool,
        inventory: Option<&KeyRing>,
        door: &mut Door,
    ) -> DoorTriggerOutcome {
        let Some(ring) = inventory.filter(|_| is_player) else {
            return DoorTriggerOutcome::Ignored;
        };
        if ring.has_key(&self.required_key) {
            door.try_open(&self.required_key);
            DoorTriggerOutcome::Unlocked
        } else {
            log::info!("Door locked. Need key: {}", self.required_key);
            DoorTriggerOutcome::Locked
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn door() -> Door {
        Door::new("KeyA", [0.0, 1.0, 0.0], &DoorConfig::default())
    }

    #[test]
    fn wrong_key_stays_closed() {
        let mut d = door();
        assert!(!d.try_open("KeyB"));
        assert_eq!(d.state(), DoorState::Closed);
    }

    #[test]
    fn opens_over_duration() {
        let mut d = door();
        assert!(d.try_open("KeyA"));
        d.tick(0.5);
        assert_eq!(d.progress(), 0.5);
        assert_eq!(d.position(), [0.0, 2.5, 0.0]);
        d.tick(0.5);
        assert!(d.is_open());
        assert_eq!(d.position(), [0.0, 4.0, 0.0]);
    }

    #[test]
    fn overshoot_snaps_open() {
        let mut d = door();
        d.try_open("KeyA");
        d.tick(3.0);
        assert_eq!(d.state(), DoorState::Open);
        assert_eq!(d.progress(), 1.0);
    }

    #[test]
    fn cannot_restart_while_opening_or_open() {
        let mut d = door();
        d.try_open("KeyA");
        d.tick(0.25);
        assert!(!d.try_open("KeyA"));
        assert_eq!(d.state(), DoorState::Opening { elapsed: 0.25 });
        d.tick(1.0);
        assert!(!d.try_open("KeyA"));
    }

    #[test]
    fn zero_duration_opens_on_first_tick() {
        let cfg = DoorConfig {
            open_duration: 0.0,
            ..DoorConfig::default()
        };
        let mut d = Door::new("KeyA", [0.0; 3], &cfg);
        d.try_open("KeyA");
        d.tick(0.0);
        assert!(d.is_open());
    }

    #[test]
    fn closed_door_ignores_ticks() {
        let mut d = door();
        d.tick(5.0);
        assert_eq!(d.state(), DoorState::Closed);
        assert_eq!(d.position(), [0.0, 1.0, 0.0]);
    }

    #[test]
    fn trigger_needs_key() {
        let trigger = DoorTrigger::default();
        let mut d = door();
        let mut ring = KeyRing::new();
        assert_eq!(
            trigger.on_overlap(true, Some(&ring), &mut d),
            DoorTriggerOutcome::Locked
        );
        ring.add_key("KeyA");
        assert_eq!(
            trigger.on_overlap(true, Some(&ring), &mut d),
            DoorTriggerOutcome::Unlocked
        );
        assert!(matches!(d.state(), DoorState::Opening { .. }));
    }

    #[test]
    fn trigger_ignores_non_players() {
        let trigger = DoorTrigger::new("KeyA");
        let mut d = door();
        let mut ring = KeyRing::new();
        ring.add_key("KeyA");
        assert_eq!(
            trigger.on_overlap(false, Some(&ring), &mut d),
            DoorTriggerOutcome::Ignored
        );
        assert_eq!(
            trigger.on_overlap(true, None, &mut d),
            DoorTriggerOutcome::Ignored
        );
        assert_eq!(d.state(), DoorState::Closed);
    }
}
