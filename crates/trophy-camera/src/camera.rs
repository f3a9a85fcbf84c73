//! Camera handle driven by the mixer.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position and orientation of the scene camera.
///
/// The host owns the rig and copies its pose onto the renderer's camera
/// after every frame. Motions only ever touch it through the mixer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraRig {
    /// World-space position
    pub position: Vec3,
    /// World-space orientation (unit quaternion)
    pub orientation: Quat,
    /// Vertical field of view in degrees (informational, not animated)
    pub fov_degrees: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new(Vec3::new(200.0, 50.0, 50.0), 45.0)
    }
}

impl CameraRig {
    /// Create a camera at the given position with identity orientation.
    pub fn new(position: Vec3, fov_degrees: f32) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
            fov_degrees,
        }
    }

    /// Set position and orientation in one step.
    pub fn set_pose(&mut self, position: Vec3, orientation: Quat) {
        self.position = position;
        self.orientation = orientation;
    }

    /// Position as array (for handing to JS).
    pub fn position_array(&self) -> [f32; 3] {
        self.position.to_array()
    }

    /// Orientation as `[x, y, z, w]`.
    pub fn orientation_array(&self) -> [f32; 4] {
        self.orientation.to_array()
    }
}
