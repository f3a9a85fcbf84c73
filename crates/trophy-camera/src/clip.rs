//! Motion clips: a named, fixed-duration pair of camera tracks.

use glam::{Quat, Vec3};
use thiserror::Error;

use crate::track::{OrientationTrack, PositionTrack, TrackError};

/// Which camera property a track animates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackTarget {
    Position,
    Orientation,
}

impl std::fmt::Display for TrackTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackTarget::Position => write!(f, ".position"),
            TrackTarget::Orientation => write!(f, ".quaternion"),
        }
    }
}

/// A motion definition that cannot be turned into a playable clip.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClipError {
    #[error("clip '{name}' has invalid duration {duration}")]
    InvalidDuration { name: String, duration: f32 },

    #[error("clip '{name}' {target} track: {source}")]
    Track {
        name: String,
        target: TrackTarget,
        #[source]
        source: TrackError,
    },
}

/// Immutable camera motion.
///
/// Built fresh by a catalog entry every time it is selected and dropped
/// once its playback ends or is interrupted.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionClip {
    name: String,
    duration: f32,
    position: PositionTrack,
    orientation: OrientationTrack,
}

impl MotionClip {
    pub fn new(
        name: impl Into<String>,
        duration: f32,
        position: PositionTrack,
        orientation: OrientationTrack,
    ) -> Result<Self, ClipError> {
        let name = name.into();
        if !duration.is_finite() || duration <= 0.0 {
            return Err(ClipError::InvalidDuration { name, duration });
        }
        Ok(Self {
            name,
            duration,
            position,
            orientation,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Length in seconds (always > 0).
    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn position_track(&self) -> &PositionTrack {
        &self.position
    }

    pub fn orientation_track(&self) -> &OrientationTrack {
        &self.orientation
    }

    /// Camera pose at `t` seconds into the clip.
    pub fn pose_at(&self, t: f32) -> (Vec3, Quat) {
        (self.position.sample(t), self.orientation.sample(t))
    }
}
