//! Collected keys and the pickups that grant them.

use std::collections::HashSet;

use crate::constants::DEFAULT_KEY_ID;

/// Key ids the player has collected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyRing {
    keys: HashSet<String>,
}

impl KeyRing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_key(&mut self, key_id: &str) {
        self.keys.insert(key_id.to_string());
        log::info!("Collected key: {}", key_id);
    }

    pub fn has_key(&self, key_id: &str) -> bool {
        self.keys.contains(key_id)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// A key lying in the world. Gone once picked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPickup {
    pub key_id: String,
    consumed: bool,
}

impl Default for KeyPickup {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_ID)
    }
}

impl KeyPickup {
    pub fn new(key_id: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            consumed: false,
        }
    }

    /// Give the key to an overlapping player. Returns whether it was taken.
    pub fn on_overlap(&mut self, is_player: bool, inventory: Option<&mut KeyRing>) -> bool {
        if self.consumed {
            return false;
        }
        let Some(ring) = inventory.filter(|_| is_player) else {
            log::debug!("Key pickup conditions not met for {}", self.key_id);
            return false;
        };
        ring.add_key(&self.key_id);
        self.consumed = true;
        true
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }
}
