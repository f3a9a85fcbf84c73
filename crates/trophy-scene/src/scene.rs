//! Scene host that owns the camera and drives the tour.

use std::sync::Arc;

use trophy_camera::{
    CameraRig, CameraSequencer, Catalog, InteractionKind, InteractionSurface, SequencerState,
};

use crate::config::SceneConfig;

/// Trophy showcase scene: one camera, one sequencer.
pub struct TrophyScene {
    config: SceneConfig,
    camera: CameraRig,
    sequencer: CameraSequencer,
}

impl TrophyScene {
    pub fn new(config: SceneConfig, catalog: Arc<Catalog>) -> Self {
        let camera = config.camera.rig();
        let sequencer = CameraSequencer::new(catalog, config.sequencer.clone());
        Self {
            config,
            camera,
            sequencer,
        }
    }

    /// Scene with compiled defaults and the built-in motions.
    pub fn with_defaults() -> Self {
        Self::new(SceneConfig::default(), Catalog::reference())
    }

    /// Hook up the surface and play the first motion.
    pub fn start(&mut self, surface: &mut impl InteractionSurface) {
        self.sequencer.init(&self.camera, surface);
    }

    /// Advance one rendered frame.
    pub fn tick(&mut self, dt: f32) {
        self.sequencer.on_frame(dt, &mut self.camera);
    }

    /// Forward a user interaction. Returns true when it started a new motion.
    pub fn interact(&mut self, kind: InteractionKind) -> bool {
        self.sequencer.on_interaction(kind, &self.camera).is_some()
    }

    pub fn dispose(&mut self, surface: &mut impl InteractionSurface) {
        self.sequencer.dispose(surface);
    }

    pub fn is_running(&self) -> bool {
        matches!(
            self.sequencer.state(),
            SequencerState::Idle | SequencerState::Playing | SequencerState::Transitioning
        )
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn sequencer(&self) -> &CameraSequencer {
        &self.sequencer
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }
}
