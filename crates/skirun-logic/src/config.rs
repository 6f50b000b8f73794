//! Game tunables, loadable from JSON.
//!
//! Every section falls back to its defaults when omitted, so a config file
//! only needs the values it overrides:
//!
//! ```
//! use skirun_logic::config::GameConfig;
//!
//! let cfg = GameConfig::from_json(r#"{ "race": { "max_chances": 5 } }"#).unwrap();
//! assert_eq!(cfg.race.max_chances, 5);
//! assert_eq!(cfg.leaderboard.max_entries, 10);
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::{ANONYMOUS_NAME, DEFAULT_MAX_CHANCES, LEADERBOARD_MAX_ENTRIES, NAME_LENGTH};
use crate::error::{GameError, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub race: RaceConfig,
    pub session: SessionConfig,
    pub leaderboard: LeaderboardConfig,
    pub door: DoorConfig,
    pub playlist: PlaylistConfig,
    pub audio: AudioConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    /// Chances granted at race start; skipped checkpoints spend them.
    pub max_chances: i32,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            max_chances: DEFAULT_MAX_CHANCES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub name_length: usize,
    pub anonymous_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            name_length: NAME_LENGTH,
            anonymous_name: ANONYMOUS_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaderboardConfig {
    pub max_entries: usize,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            max_entries: LEADERBOARD_MAX_ENTRIES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoorConfig {
    /// How far the door rises when open.
    pub open_height: f32,
    /// Seconds the opening slide takes.
    pub open_duration: f32,
}

impl Default for DoorConfig {
    fn default() -> Self {
        Self {
            open_height: 3.0,
            open_duration: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaylistConfig {
    pub play_in_order: bool,
    pub loop_playlist: bool,
}

impl Default for PlaylistConfig {
    fn default() -> Self {
        Self {
            play_in_order: true,
            loop_playlist: true,
        }
    }
}

/// Speed-driven sound tunables for the runner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub slide: SlideAudioConfig,
    pub heartbeat: HeartbeatAudioConfig,
    pub pulse: PulseConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideAudioConfig {
    /// Below this speed the slide loop is silent.
    pub min_speed: f32,
    pub max_speed: f32,
    pub max_volume: f32,
}

impl Default for SlideAudioConfig {
    fn default() -> Self {
        Self {
            min_speed: 0.5,
            max_speed: 15.0,
            max_volume: 0.8,
        }
    }
}

/// Heartbeat that switches on above a speed threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeartbeatAudioConfig {
    pub min_speed: f32,
    pub max_speed: f32,
    pub base_volume: f32,
    pub max_volume: f32,
    pub base_pitch: f32,
    pub max_pitch: f32,
}

impl Default for HeartbeatAudioConfig {
    fn default() -> Self {
        Self {
            min_speed: 3.0,
            max_speed: 20.0,
            base_volume: 0.1,
            max_volume: 0.9,
            base_pitch: 1.0,
            max_pitch: 1.8,
        }
    }
}

/// Always-on heartbeat that eases toward a speed-driven target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseConfig {
    pub normal_pitch: f32,
    pub max_pitch: f32,
    pub normal_volume: f32,
    pub max_volume: f32,
    /// Speed at which pitch and volume reach their maximum.
    pub tense_speed: f32,
    /// Easing rate per second.
    pub lerp_speed: f32,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            normal_pitch: 1.0,
            max_pitch: 2.0,
            normal_volume: 0.4,
            max_volume: 1.0,
            tense_speed: 8.0,
            lerp_speed: 5.0,
        }
    }
}

impl GameConfig {
    /// Parse a config, filling omitted fields with defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: GameConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the game logic cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.race.max_chances <= 0 {
            return Err(GameError::Config(format!(
                "race.max_chances must be positive, got {}",
                self.race.max_chances
            )));
        }
        if self.leaderboard.max_entries == 0 {
            return Err(GameError::Config(
                "leaderboard.max_entries must be at least 1".into(),
            ));
        }
        if self.session.name_length == 0 {
            return Err(GameError::Config(
                "session.name_length must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_game_rules() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.race.max_chances, 3);
        assert_eq!(cfg.leaderboard.max_entries, 10);
        assert_eq!(cfg.session.name_length, 3);
        assert_eq!(cfg.session.anonymous_name, "???");
        assert!(cfg.playlist.play_in_order);
        assert!(cfg.playlist.loop_playlist);
        assert_eq!(cfg.audio.slide.max_speed, 15.0);
        assert_eq!(cfg.audio.heartbeat.min_speed, 3.0);
        assert_eq!(cfg.audio.pulse.tense_speed, 8.0);
    }

    #[test]
    fn nested_audio_section_overrides_one_field() {
        let cfg = GameConfig::from_json(r#"{ "audio": { "pulse": { "lerp_speed": 2.0 } } }"#)
            .unwrap();
        assert_eq!(cfg.audio.pulse.lerp_speed, 2.0);
        assert_eq!(cfg.audio.pulse.max_pitch, 2.0);
        assert_eq!(cfg.audio.slide, SlideAudioConfig::default());
    }

    #[test]
    fn empty_object_is_default() {
        let cfg = GameConfig::from_json("{}").unwrap();
        assert_eq!(cfg, GameConfig::default());
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let cfg = GameConfig::from_json(r#"{ "door": { "open_duration": 2.5 } }"#).unwrap();
        assert_eq!(cfg.door.open_duration, 2.5);
        assert_eq!(cfg.door.open_height, 3.0);
    }

    #[test]
    fn malformed_json_is_config_error() {
        let err = GameConfig::from_json("{ race: ").unwrap_err();
        assert!(matches!(err, GameError::Config(_)));
    }

    #[test]
    fn zero_chances_rejected() {
        let err = GameConfig::from_json(r#"{ "race": { "max_chances": 0 } }"#).unwrap_err();
        assert!(matches!(err, GameError::Config(_)));
    }
}
