//! Speed-driven sound levels for the runner: ski slide loop and heartbeat.
//!
//! Only the numbers live here. The host estimates speed (or hands positions
//! to [`HeartbeatPulse`]) and pushes the resulting levels into its audio
//! sources each frame.

use crate::config::{HeartbeatAudioConfig, PulseConfig, SlideAudioConfig};

/// Volume and pitch for one looping source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioLevel {
    pub volume: f32,
    pub pitch: f32,
}

/// Position of `value` between `a` and `b`, clamped to 0..=1. Zero when the
/// range is empty.
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if a == b {
        return 0.0;
    }
    ((value - a) / (b - a)).clamp(0.0, 1.0)
}

/// Clamped linear interpolation.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Ground speed from two frame positions; height change is ignored.
pub fn horizontal_speed(previous: [f32; 3], current: [f32; 3], dt: f32) -> f32 {
    let dx = current[0] - previous[0];
    let dz = current[2] - previous[2];
    (dx * dx + dz * dz).sqrt() / dt.max(0.0001)
}

/// Slide loop volume. Silent while airborne or at crawling speed.
pub fn slide_volume(speed: f32, grounded: bool, cfg: &SlideAudioConfig) -> f32 {
    if !grounded || speed <= cfg.min_speed {
        return 0.0;
    }
    inverse_lerp(cfg.min_speed, cfg.max_speed, speed) * cfg.max_volume
}

/// Heartbeat level. At or below `min_speed` it is muted at base pitch.
pub fn heartbeat_level(speed: f32, cfg: &HeartbeatAudioConfig) -> AudioLevel {
    if speed <= cfg.min_speed {
        return AudioLevel {
            volume: 0.0,
            pitch: cfg.base_pitch,
        };
    }
    let t = inverse_lerp(cfg.min_speed, cfg.max_speed, speed);
    AudioLevel {
        volume: lerp(cfg.base_volume, cfg.max_volume, t),
        pitch: lerp(cfg.base_pitch, cfg.max_pitch, t),
    }
}

/// Heartbeat that eases toward its target instead of jumping.
#[derive(Debug, Clone, PartialEq)]
pub struct HeartbeatPulse {
    level: AudioLevel,
    last_position: [f32; 3],
}

impl HeartbeatPulse {
    pub fn new(start_position: [f32; 3], cfg: &PulseConfig) -> Self {
        Self {
            level: AudioLevel {
                volume: cfg.normal_volume,
                pitch: cfg.normal_pitch,
            },
            last_position: start_position,
        }
    }

    /// Feed this frame's position; returns the smoothed level.
    pub fn update(&mut self, position: [f32; 3], dt: f32, cfg: &PulseConfig) -> AudioLevel {
        let speed = horizontal_speed(self.last_position, position, dt);
        self.last_position = position;

        let t = inverse_lerp(0.0, cfg.tense_speed, speed);
        let target_pitch = lerp(cfg.normal_pitch, cfg.max_pitch, t);
        let target_volume = lerp(cfg.normal_volume, cfg.max_volume, t);

        let step = dt * cfg.lerp_speed;
        self.level.pitch = lerp(self.level.pitch, target_pitch, step);
        self.level.volume = lerp(self.level.volume, target_volume, step);
        self.level
    }

    pub fn level(&self) -> AudioLevel {
        self.level
    }
}
