//! Keyframe playback for the camera.
//!
//! A `CameraMixer` owns every action created from a clip, advances them by
//! the frame delta, blends their weighted poses onto the [`CameraRig`] and
//! queues a [`MixerEvent::Finished`] when a play-once action reaches its end.

use std::collections::VecDeque;

use crate::camera::CameraRig;
use crate::clip::MotionClip;
use crate::tweens::{EaseType, Fade};

/// Handle to one action on a mixer. Never reused within a mixer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(u64);

/// Handle to a registered finished-listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopMode {
    /// Play to the end once, then finish
    #[default]
    Once,
    /// Wrap around forever
    Repeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionState {
    /// Created, `play()` not called yet
    Scheduled,
    Playing,
    /// Finished but holding its final pose (`clamp_when_finished`)
    Clamped,
    /// Finished without clamping; no longer contributes
    Finished,
    /// Stopped explicitly or faded out to zero weight
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MixerEvent {
    /// A play-once action reached the end of its clip
    Finished(ActionId),
}

/// One clip being played by the mixer.
#[derive(Debug, Clone)]
pub struct Action {
    id: ActionId,
    clip: MotionClip,
    loop_mode: LoopMode,
    clamp_when_finished: bool,
    state: ActionState,
    /// Playback position in seconds
    time: f32,
    /// Weight when no fade is running
    weight: f32,
    fade: Option<Fade>,
    easing: EaseType,
}

impl Action {
    fn new(id: ActionId, clip: MotionClip, easing: EaseType) -> Self {
        Self {
            id,
            clip,
            loop_mode: LoopMode::Once,
            clamp_when_finished: false,
            state: ActionState::Scheduled,
            time: 0.0,
            weight: 1.0,
            fade: None,
            easing,
        }
    }

    pub fn id(&self) -> ActionId {
        self.id
    }

    pub fn clip(&self) -> &MotionClip {
        &self.clip
    }

    pub fn state(&self) -> ActionState {
        self.state
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    pub fn clamp_when_finished(&self) -> bool {
        self.clamp_when_finished
    }

    /// Current blend weight, including any running fade.
    pub fn weight(&self) -> f32 {
        self.fade.map_or(self.weight, |fade| fade.value())
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    /// Whether the action still drives the camera.
    pub fn is_running(&self) -> bool {
        matches!(self.state, ActionState::Playing | ActionState::Clamped)
    }

    pub fn set_loop(&mut self, mode: LoopMode) -> &mut Self {
        self.loop_mode = mode;
        self
    }

    pub fn set_clamp_when_finished(&mut self, clamp: bool) -> &mut Self {
        self.clamp_when_finished = clamp;
        self
    }

    /// Ramp the weight from 0 to 1 over `duration` seconds.
    pub fn fade_in(&mut self, duration: f32) -> &mut Self {
        self.fade = Some(Fade::new(0.0, 1.0, duration, self.easing));
        self
    }

    /// Ramp the weight to 0 over `duration` seconds, then stop.
    pub fn fade_out(&mut self, duration: f32) -> &mut Self {
        self.fade = Some(Fade::new(self.weight(), 0.0, duration, self.easing));
        self
    }

    /// Start (or restart) playback.
    pub fn play(&mut self) -> &mut Self {
        match self.state {
            ActionState::Scheduled | ActionState::Playing => {}
            ActionState::Clamped | ActionState::Finished | ActionState::Stopped => {
                self.time = 0.0;
            }
        }
        self.state = ActionState::Playing;
        self
    }

    pub fn stop(&mut self) -> &mut Self {
        self.state = ActionState::Stopped;
        self.fade = None;
        self
    }

    /// Advance fade and playback time.
    ///
    /// Returns the weight to blend with this frame and whether a play-once
    /// action reached its end.
    fn advance(&mut self, dt: f32) -> (f32, bool) {
        if !self.is_running() {
            return (0.0, false);
        }

        if let Some(fade) = self.fade.as_mut() {
            if !fade.update(dt) {
                let target = fade.target();
                self.fade = None;
                self.weight = target;
                if target <= 0.0 {
                    self.state = ActionState::Stopped;
                    return (0.0, false);
                }
            }
        }

        if self.state == ActionState::Clamped {
            return (self.weight(), false);
        }

        let duration = self.clip.duration();
        self.time += dt;
        match self.loop_mode {
            LoopMode::Repeat => {
                self.time = self.time.rem_euclid(duration);
                (self.weight(), false)
            }
            LoopMode::Once if self.time >= duration => {
                self.time = duration;
                if self.clamp_when_finished {
                    self.state = ActionState::Clamped;
                    (self.weight(), true)
                } else {
                    self.state = ActionState::Finished;
                    (0.0, true)
                }
            }
            LoopMode::Once => (self.weight(), false),
        }
    }
}

/// Animation mixer bound to the scene camera.
#[derive(Debug)]
pub struct CameraMixer {
    actions: Vec<Action>,
    next_action: u64,
    listeners: Vec<ListenerId>,
    next_listener: u64,
    events: VecDeque<MixerEvent>,
    easing: EaseType,
    /// Total time advanced, in seconds
    time: f64,
}

impl Default for CameraMixer {
    fn default() -> Self {
        Self::new(EaseType::Linear)
    }
}

impl CameraMixer {
    /// Create a mixer whose fades use the given easing curve.
    pub fn new(easing: EaseType) -> Self {
        Self {
            actions: Vec::new(),
            next_action: 0,
            listeners: Vec::new(),
            next_listener: 0,
            events: VecDeque::new(),
            easing,
            time: 0.0,
        }
    }

    /// Create a new, not yet playing, action for `clip`.
    pub fn clip_action(&mut self, clip: MotionClip) -> ActionId {
        let id = ActionId(self.next_action);
        self.next_action += 1;
        self.actions.push(Action::new(id, clip, self.easing));
        id
    }

    pub fn action(&self, id: ActionId) -> Option<&Action> {
        self.actions.iter().find(|a| a.id == id)
    }

    pub fn action_mut(&mut self, id: ActionId) -> Option<&mut Action> {
        self.actions.iter_mut().find(|a| a.id == id)
    }

    /// Actions currently driving the camera.
    pub fn running_actions(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter().filter(|a| a.is_running())
    }

    pub fn stop_all_action(&mut self) {
        for action in &mut self.actions {
            action.stop();
        }
        self.actions.clear();
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Register interest in finished events. Events are only queued while
    /// at least one listener is registered.
    pub fn add_finished_listener(&mut self) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push(id);
        id
    }

    /// Returns `false` if the listener was not registered.
    pub fn remove_finished_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|&l| l != id);
        if self.listeners.is_empty() {
            self.events.clear();
        }
        self.listeners.len() != before
    }

    pub fn has_listeners(&self) -> bool {
        !self.listeners.is_empty()
    }

    /// Take the oldest queued event.
    pub fn poll_event(&mut self) -> Option<MixerEvent> {
        self.events.pop_front()
    }

    /// Advance all actions by `dt` seconds and write the blended pose.
    ///
    /// When the summed weight is below one the remainder keeps the camera's
    /// current pose, so fades ease in from wherever the camera is.
    pub fn update(&mut self, dt: f32, camera: &mut CameraRig) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.time += dt as f64;

        let mut total = 0.0f32;
        let mut position = camera.position;
        let mut orientation = camera.orientation;

        for action in &mut self.actions {
            let (weight, finished) = action.advance(dt);
            if weight > 0.0 {
                let (p, q) = action.clip.pose_at(action.time);
                if total == 0.0 {
                    position = p;
                    orientation = q;
                } else {
                    let t = weight / (total + weight);
                    position = position.lerp(p, t);
                    orientation = orientation.slerp(q, t);
                }
                total += weight;
            }
            if finished && !self.listeners.is_empty() {
                self.events.push_back(MixerEvent::Finished(action.id));
            }
        }

        self.actions
            .retain(|a| !matches!(a.state, ActionState::Finished | ActionState::Stopped));

        if total <= 0.0 {
            return;
        }
        if total < 1.0 {
            position = camera.position.lerp(position, total);
            orientation = camera.orientation.slerp(orientation, total);
        }
        camera.set_pose(position, orientation.normalize());
    }
}
