//! Camera tour: plays catalog motions back-to-back on one mixer.
//!
//! Lifecycle driven by the host:
//! - `init` once the camera exists: creates the mixer, attaches the
//!   surface listeners and starts the first motion.
//! - `on_frame` every rendered frame with the frame delta.
//! - `on_interaction` on click / touch end: cut to the next motion.
//! - `dispose` on teardown: stops playback and detaches everything.
//!
//! A finished event only advances the tour when it belongs to the action
//! currently tracked as active; events from replaced actions are dropped.

use std::sync::Arc;

use rand_xoshiro::Xoshiro256StarStar;
use thiserror::Error;

use crate::camera::CameraRig;
use crate::catalog::Catalog;
use crate::clip::ClipError;
use crate::config::SequencerConfig;
use crate::mixer::{ActionId, CameraMixer, ListenerId, LoopMode, MixerEvent};
use crate::rng::{tour_rng, PickRng};
use crate::selection::{SelectionError, SelectionPolicy, Selector};
use crate::surface::{InteractionKind, InteractionSurface};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    /// No mixer yet
    Uninitialized,
    /// Mixer created, nothing playing
    Idle,
    Playing,
    /// Switching motions (only observable inside a transition)
    Transitioning,
    /// Torn down; every entry point is a no-op
    Disposed,
}

/// What caused a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionCause {
    Start,
    Finished,
    Interaction(InteractionKind),
}

#[derive(Debug, Error)]
pub enum SequencerError {
    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("motion {index} rejected: {source}")]
    InvalidMotion {
        index: usize,
        #[source]
        source: ClipError,
    },

    #[error("selected index {index} is outside the catalog (size {size})")]
    MissingEntry { index: usize, size: usize },

    #[error("camera sequencer has no mixer")]
    NotInitialized,
}

/// The motion currently driving the camera.
#[derive(Debug, Clone, PartialEq)]
struct ActiveMotion {
    action: ActionId,
    index: usize,
    name: String,
}

pub struct CameraSequencer<R: PickRng = Xoshiro256StarStar> {
    catalog: Arc<Catalog>,
    config: SequencerConfig,
    selector: Selector,
    rng: R,
    mixer: Option<CameraMixer>,
    finished_listener: Option<ListenerId>,
    attached: Vec<InteractionKind>,
    active: Option<ActiveMotion>,
    state: SequencerState,
    transitions: u64,
}

impl CameraSequencer<Xoshiro256StarStar> {
    /// Sequencer seeded from `config.seed`, or from entropy when unset.
    pub fn new(catalog: Arc<Catalog>, config: SequencerConfig) -> Self {
        let rng = tour_rng(config.seed);
        Self::with_rng(catalog, config, rng)
    }
}

impl<R: PickRng> CameraSequencer<R> {
    pub fn with_rng(catalog: Arc<Catalog>, config: SequencerConfig, rng: R) -> Self {
        let selector = Selector::new(config.policy);
        Self {
            catalog,
            config,
            selector,
            rng,
            mixer: None,
            finished_listener: None,
            attached: Vec::new(),
            active: None,
            state: SequencerState::Uninitialized,
            transitions: 0,
        }
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.selector.policy()
    }

    pub fn mixer(&self) -> Option<&CameraMixer> {
        self.mixer.as_ref()
    }

    /// Action of the motion currently driving the camera.
    pub fn active_action(&self) -> Option<ActionId> {
        self.active.as_ref().map(|a| a.action)
    }

    pub fn current_clip_name(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.name.as_str())
    }

    /// Catalog index of the active motion.
    pub fn last_index(&self) -> Option<usize> {
        self.active.as_ref().map(|a| a.index)
    }

    /// Number of motions started so far.
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Interaction kinds currently attached on the surface.
    pub fn attached_listeners(&self) -> &[InteractionKind] {
        &self.attached
    }

    /// Create the mixer, attach interaction listeners and start the tour.
    ///
    /// Repeated calls are no-ops.
    pub fn init(&mut self, camera: &CameraRig, surface: &mut impl InteractionSurface) {
        match self.state {
            SequencerState::Uninitialized => {}
            SequencerState::Disposed => {
                log::warn!("Camera sequencer init after dispose ignored");
                return;
            }
            _ => return,
        }

        let mut mixer = CameraMixer::new(self.config.fade_ease);
        self.finished_listener = Some(mixer.add_finished_listener());
        self.mixer = Some(mixer);
        self.state = SequencerState::Idle;

        for kind in InteractionKind::ALL {
            match surface.attach(kind) {
                Ok(()) => self.attached.push(kind),
                Err(e) => log::warn!("Camera tour will not react to {}: {e}", kind.event_name()),
            }
        }

        log::info!(
            "Camera sequencer initialized ({} motions, {:?})",
            self.catalog.len(),
            self.selector.policy()
        );

        self.transition(TransitionCause::Start, camera);
    }

    /// Advance playback by `dt` seconds and handle finished motions.
    ///
    /// No-op before `init` and after `dispose`.
    pub fn on_frame(&mut self, dt: f32, camera: &mut CameraRig) {
        if self.state == SequencerState::Disposed {
            return;
        }
        let Some(mixer) = self.mixer.as_mut() else {
            return;
        };
        mixer.update(dt, camera);

        while let Some(event) = self.mixer.as_mut().and_then(CameraMixer::poll_event) {
            match event {
                MixerEvent::Finished(action) => {
                    self.on_action_finished(action, camera);
                }
            }
        }
    }

    /// Cut to the next motion immediately.
    ///
    /// Returns the newly started action.
    pub fn on_interaction(&mut self, kind: InteractionKind, camera: &CameraRig) -> Option<ActionId> {
        match self.state {
            SequencerState::Idle | SequencerState::Playing => {
                self.transition(TransitionCause::Interaction(kind), camera)
            }
            _ => None,
        }
    }

    /// Handle a finished event from the mixer.
    ///
    /// Only the tracked active action advances the tour.
    pub fn on_action_finished(&mut self, action: ActionId, camera: &CameraRig) -> Option<ActionId> {
        if self.state != SequencerState::Playing || self.active_action() != Some(action) {
            log::trace!("Ignoring finished event for stale action {action:?}");
            return None;
        }
        self.transition(TransitionCause::Finished, camera)
    }

    /// Stop playback and detach every listener. Idempotent.
    pub fn dispose(&mut self, surface: &mut impl InteractionSurface) {
        if self.state == SequencerState::Disposed {
            return;
        }

        if let Some(mut mixer) = self.mixer.take() {
            mixer.stop_all_action();
            if let Some(listener) = self.finished_listener.take() {
                mixer.remove_finished_listener(listener);
            }
        }
        for kind in self.attached.drain(..) {
            surface.detach(kind);
        }
        self.active = None;
        self.state = SequencerState::Disposed;

        log::info!(
            "Camera sequencer disposed after {} transitions",
            self.transitions
        );
    }

    /// Switch to the next motion, logging instead of failing.
    fn transition(&mut self, cause: TransitionCause, camera: &CameraRig) -> Option<ActionId> {
        let resume = self.state;
        self.state = SequencerState::Transitioning;

        match self.start_next(camera) {
            Ok(action) => {
                self.state = SequencerState::Playing;
                log::debug!(
                    "Camera motion {:?} -> '{}' (#{}, {:?})",
                    cause,
                    self.current_clip_name().unwrap_or_default(),
                    self.last_index().unwrap_or_default(),
                    action
                );
                Some(action)
            }
            Err(e) => {
                self.state = resume;
                if matches!(e, SequencerError::Selection(_)) {
                    log::error!("Camera transition skipped: {e}");
                } else {
                    log::warn!("Camera transition skipped: {e}");
                }
                None
            }
        }
    }

    fn start_next(&mut self, camera: &CameraRig) -> Result<ActionId, SequencerError> {
        if self.mixer.is_none() {
            return Err(SequencerError::NotInitialized);
        }
        let size = self.catalog.len();
        let index = self.selector.pick(size, &mut self.rng)?;
        let motion = self
            .catalog
            .get(index)
            .ok_or(SequencerError::MissingEntry { index, size })?;
        let clip = motion
            .build(camera)
            .map_err(|source| SequencerError::InvalidMotion { index, source })?;
        let name = clip.name().to_string();

        let Some(mixer) = self.mixer.as_mut() else {
            return Err(SequencerError::NotInitialized);
        };
        let fade = self.config.fade_seconds();

        // Fire-and-forget: the old action fades out on its own
        if let Some(previous) = self.active.take() {
            if let Some(action) = mixer.action_mut(previous.action) {
                action.fade_out(fade);
            }
        }

        let action = mixer.clip_action(clip);
        if let Some(handle) = mixer.action_mut(action) {
            handle
                .set_loop(LoopMode::Once)
                .set_clamp_when_finished(false)
                .fade_in(fade)
                .play();
        }

        self.active = Some(ActiveMotion {
            action,
            index,
            name,
        });
        self.transitions += 1;
        Ok(action)
    }
}
