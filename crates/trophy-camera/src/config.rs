//! Sequencer settings.

use serde::{Deserialize, Serialize};

use crate::selection::SelectionPolicy;
use crate::tweens::EaseType;

/// Tuning for the camera tour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequencerConfig {
    /// Fade-in/fade-out window between motions, in seconds
    pub fade_duration: f32,
    /// Curve used for the fades
    pub fade_ease: EaseType,
    /// How the next motion is chosen
    pub policy: SelectionPolicy,
    /// Fixed seed for the shuffled order (random when unset)
    pub seed: Option<u64>,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            fade_duration: 0.2,
            fade_ease: EaseType::Linear,
            policy: SelectionPolicy::ShuffledPool,
            seed: None,
        }
    }
}

impl SequencerConfig {
    /// Fade duration with invalid values replaced by zero.
    pub fn fade_seconds(&self) -> f32 {
        if self.fade_duration.is_finite() {
            self.fade_duration.max(0.0)
        } else {
            0.0
        }
    }
}
