//! Input-toggled player state: walk/ski mode and the tutorial panel.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementMode {
    #[default]
    Walk,
    Ski,
}

/// Ski-mode motion state the host's controller integrates each frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkiMotion {
    pub mode: MovementMode,
    /// Scalar speed along the slope.
    pub ski_speed: f32,
    pub vertical_velocity: f32,
    pub airborne: bool,
}

impl SkiMotion {
    /// Flip between walking and skiing. Leaving ski mode drops all momentum.
    pub fn toggle(&mut self) -> MovementMode {
        self.mode = match self.mode {
            MovementMode::Walk => MovementMode::Ski,
            MovementMode::Ski => {
                self.ski_speed = 0.0;
                self.vertical_velocity = 0.0;
                self.airborne = false;
                MovementMode::Walk
            }
        };
        log::debug!("Movement mode: {:?}", self.mode);
        self.mode
    }

    pub fn is_skiing(&self) -> bool {
        self.mode == MovementMode::Ski
    }

    /// Skis and poles are shown only while skiing.
    pub fn shows_ski_gear(&self) -> bool {
        self.is_skiing()
    }
}

/// Instruction panel shown at scene start until the close key is pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TutorialPanel {
    visible: bool,
}

impl Default for TutorialPanel {
    fn default() -> Self {
        Self { visible: true }
    }
}

impl TutorialPanel {
    /// Returns whether this press dismissed the panel.
    pub fn on_close_key(&mut self) -> bool {
        let dismissed = self.visible;
        self.visible = false;
        dismissed
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}
