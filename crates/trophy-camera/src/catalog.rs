//! The fixed set of camera motions the tour draws from.
//!
//! Motions are plain data (`MotionDef`) so alternative catalogs can be
//! loaded from RON. Each definition is a factory: `build` turns it into a
//! fresh [`MotionClip`] for the live camera.

use std::sync::Arc;

use glam::{Quat, Vec3};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::CameraRig;
use crate::clip::{ClipError, MotionClip, TrackTarget};
use crate::track::{normalize_orientation, KeyframeTrack};

/// Errors raised while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse motion catalog: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("motion catalog is empty")]
    Empty,

    #[error("motion {index} is invalid: {source}")]
    InvalidMotion {
        index: usize,
        #[source]
        source: ClipError,
    },
}

/// One camera motion: keyframe data plus how to anchor it to the camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionDef {
    pub name: String,
    /// Clip length in seconds
    pub duration: f32,
    /// `(time, [x, y, z])` keys
    pub position: Vec<(f32, [f32; 3])>,
    /// `(time, [x, y, z, w])` keys, normalized when built
    pub orientation: Vec<(f32, [f32; 4])>,
    /// Replace the first key with the camera's current pose
    #[serde(default)]
    pub start_from_camera: bool,
}

impl MotionDef {
    /// Produce a new clip for the given camera.
    pub fn build(&self, camera: &CameraRig) -> Result<MotionClip, ClipError> {
        let mut position =
            KeyframeTrack::from_keys(self.position.iter().map(|&(t, v)| (t, Vec3::from_array(v))))
                .map_err(|source| ClipError::Track {
                    name: self.name.clone(),
                    target: TrackTarget::Position,
                    source,
                })?;
        let mut orientation = KeyframeTrack::from_keys(
            self.orientation
                .iter()
                .map(|&(t, q)| (t, normalize_orientation(Quat::from_array(q)))),
        )
        .map_err(|source| ClipError::Track {
            name: self.name.clone(),
            target: TrackTarget::Orientation,
            source,
        })?;

        if self.start_from_camera {
            position.set_first_value(camera.position);
            orientation.set_first_value(normalize_orientation(camera.orientation));
        }

        MotionClip::new(self.name.clone(), self.duration, position, orientation)
    }
}

/// Ordered, immutable collection of motions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    motions: Vec<MotionDef>,
}

static REFERENCE: Lazy<Arc<Catalog>> = Lazy::new(|| Arc::new(Catalog::new(reference_motions())));

impl Catalog {
    /// Wrap a list of motions. Definitions are checked when they are built.
    pub fn new(motions: Vec<MotionDef>) -> Self {
        Self { motions }
    }

    /// The five built-in trophy motions, shared process-wide.
    pub fn reference() -> Arc<Catalog> {
        Arc::clone(&REFERENCE)
    }

    /// Parse a catalog from RON and check every motion builds.
    pub fn from_ron(text: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = ron::from_str(text)?;
        if catalog.motions.is_empty() {
            return Err(CatalogError::Empty);
        }
        let probe = CameraRig::default();
        for (index, motion) in catalog.motions.iter().enumerate() {
            motion
                .build(&probe)
                .map_err(|source| CatalogError::InvalidMotion { index, source })?;
        }
        log::info!("Loaded motion catalog with {} motions", catalog.len());
        Ok(catalog)
    }

    pub fn get(&self, index: usize) -> Option<&MotionDef> {
        self.motions.get(index)
    }

    pub fn len(&self) -> usize {
        self.motions.len()
    }

    /// Alias of [`Catalog::len`].
    pub fn size(&self) -> usize {
        self.len()
    }

    pub fn is_empty(&self) -> bool {
        self.motions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MotionDef> {
        self.motions.iter()
    }
}

fn motion(
    name: &str,
    duration: f32,
    position: [[f32; 3]; 2],
    orientation: [[f32; 4]; 2],
) -> MotionDef {
    MotionDef {
        name: name.to_string(),
        duration,
        position: vec![(0.0, position[0]), (duration, position[1])],
        orientation: vec![(0.0, orientation[0]), (duration, orientation[1])],
        start_from_camera: false,
    }
}

fn reference_motions() -> Vec<MotionDef> {
    vec![
        motion(
            "CircularOrbit",
            6.0,
            [[2.0, 1.0, 8.0], [5.0, 2.5, -1.0]],
            [[0.0, 0.055, 0.0, 1.0], [0.0, 0.7771, 0.0, 0.7071]],
        ),
        motion(
            "SideSweep",
            6.0,
            [[0.0, 0.5, 9.0], [1.25, 0.55, 3.9]],
            [[0.0, 0.0, 0.5, 1.0], [0.2, -0.01, 0.2, 0.9071]],
        ),
        // Zero start quaternion resolves to identity
        motion(
            "LowAngle",
            6.0,
            [[-0.2, 2.5, 5.0], [3.8, 1.2, 2.0]],
            [[0.0, 0.0, 0.0, 0.0], [0.0, 0.45, 0.0, 1.0]],
        ),
        motion(
            "HighAngleOverview",
            6.0,
            [[1.5, 0.75, 3.0], [2.4, 0.75, 2.0]],
            [[0.0, 0.21, 0.0, 1.0], [0.0, 0.5, 0.0, 1.0]],
        ),
        motion(
            "CloseUp",
            6.0,
            [[0.25, 0.8, 2.2], [0.9, 2.2, 1.0]],
            [[0.0, 0.0, 0.0, 1.0], [0.9, 0.55, 0.25, 1.55]],
        ),
    ]
}
