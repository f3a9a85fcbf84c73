//! Integration tests for the camera tour
//!
//! Drive a `CameraSequencer` the way a host render loop does: init once,
//! tick every frame, inject interactions, dispose.

use std::sync::Arc;

use glam::Vec3;
use trophy_camera::{
    ActionId, CameraRig, CameraSequencer, Catalog, HeadlessSurface, InteractionKind,
    InteractionSurface, MotionDef, SelectionPolicy, SequencerConfig, SequencerState, SurfaceError,
};

const FRAME: f32 = 0.1;

fn config(policy: SelectionPolicy, seed: u64) -> SequencerConfig {
    SequencerConfig {
        policy,
        seed: Some(seed),
        ..Default::default()
    }
}

fn started(policy: SelectionPolicy, seed: u64) -> (CameraSequencer, HeadlessSurface, CameraRig) {
    let mut seq = CameraSequencer::new(Catalog::reference(), config(policy, seed));
    let mut surface = HeadlessSurface::new();
    let camera = CameraRig::default();
    seq.init(&camera, &mut surface);
    (seq, surface, camera)
}

/// Collect the index of every motion started by `count` clicks (plus the first).
fn click_through(seq: &mut CameraSequencer, camera: &CameraRig, count: usize) -> Vec<usize> {
    let mut picks = vec![seq.last_index().unwrap()];
    for _ in 0..count {
        seq.on_interaction(InteractionKind::Click, camera)
            .expect("transition");
        picks.push(seq.last_index().unwrap());
    }
    picks
}

fn broken_motion(name: &str) -> MotionDef {
    MotionDef {
        name: name.to_string(),
        duration: 0.0,
        position: vec![(0.0, [0.0, 0.0, 0.0])],
        orientation: vec![(0.0, [0.0, 0.0, 0.0, 1.0])],
        start_from_camera: false,
    }
}

/// Surface that refuses touch listeners.
#[derive(Default)]
struct MouseOnlySurface {
    attached: Vec<InteractionKind>,
}

impl InteractionSurface for MouseOnlySurface {
    fn attach(&mut self, kind: InteractionKind) -> Result<(), SurfaceError> {
        match kind {
            InteractionKind::Click => {
                self.attached.push(kind);
                Ok(())
            }
            InteractionKind::TouchEnd => Err(SurfaceError::Attach {
                event: kind.event_name(),
                reason: "touch not supported".to_string(),
            }),
        }
    }

    fn detach(&mut self, kind: InteractionKind) {
        self.attached.retain(|&k| k != kind);
    }
}

// ============================================================================
// Selection properties
// ============================================================================

#[test]
fn test_round_robin_scenario_seven_transitions() {
    let (mut seq, _surface, camera) = started(SelectionPolicy::RoundRobin, 1);
    let picks = click_through(&mut seq, &camera, 6);
    assert_eq!(picks, vec![0, 1, 2, 3, 4, 0, 1]);
}

#[test]
fn test_round_robin_index_is_transition_count_mod_size() {
    let (mut seq, _surface, camera) = started(SelectionPolicy::RoundRobin, 1);
    let picks = click_through(&mut seq, &camera, 30);
    for (k, index) in picks.into_iter().enumerate() {
        assert_eq!(index, k % 5);
    }
}

#[test]
fn test_no_consecutive_repeats_for_any_policy() {
    for policy in [SelectionPolicy::RoundRobin, SelectionPolicy::ShuffledPool] {
        for seed in 0..20 {
            let (mut seq, _surface, camera) = started(policy, seed);
            let picks = click_through(&mut seq, &camera, 40);
            for pair in picks.windows(2) {
                assert_ne!(pair[0], pair[1], "{policy:?} seed {seed}: {picks:?}");
            }
        }
    }
}

#[test]
fn test_shuffled_cycles_show_every_motion_once() {
    for seed in 0..20 {
        let (mut seq, _surface, camera) = started(SelectionPolicy::ShuffledPool, seed);
        let picks = click_through(&mut seq, &camera, 24);

        for cycle in picks.chunks(5) {
            let mut sorted = cycle.to_vec();
            sorted.sort();
            assert_eq!(sorted, vec![0, 1, 2, 3, 4], "seed {seed}: {picks:?}");
        }
    }
}

#[test]
fn test_same_seed_same_tour() {
    let (mut a, _sa, camera) = started(SelectionPolicy::ShuffledPool, 42);
    let (mut b, _sb, _) = started(SelectionPolicy::ShuffledPool, 42);
    assert_eq!(
        click_through(&mut a, &camera, 12),
        click_through(&mut b, &camera, 12)
    );
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_frame_before_init_is_noop() {
    let mut seq = CameraSequencer::new(Catalog::reference(), SequencerConfig::default());
    let mut camera = CameraRig::default();
    let before = camera;

    seq.on_frame(0.016, &mut camera);

    assert_eq!(camera, before);
    assert_eq!(seq.state(), SequencerState::Uninitialized);
    assert!(seq.mixer().is_none());
    assert_eq!(seq.transitions(), 0);
}

#[test]
fn test_interaction_before_init_is_ignored() {
    let mut seq = CameraSequencer::new(Catalog::reference(), SequencerConfig::default());
    let camera = CameraRig::default();
    assert_eq!(seq.on_interaction(InteractionKind::Click, &camera), None);
    assert_eq!(seq.state(), SequencerState::Uninitialized);
}

#[test]
fn test_frames_move_the_camera() {
    let (mut seq, _surface, mut camera) = started(SelectionPolicy::RoundRobin, 1);
    let start = camera.position;

    for _ in 0..10 {
        seq.on_frame(FRAME, &mut camera);
    }

    assert_ne!(camera.position, start);
    // Fade-in is over: camera follows the orbit clip exactly
    let clip = Catalog::reference().get(0).unwrap().build(&camera).unwrap();
    let action = seq.mixer().unwrap().action(seq.active_action().unwrap()).unwrap();
    let (expected, _) = clip.pose_at(action.time());
    assert!((camera.position - expected).length() < 1e-3);
}

#[test]
fn test_natural_completion_advances_tour() {
    let (mut seq, _surface, mut camera) = started(SelectionPolicy::RoundRobin, 1);
    let first = seq.active_action().unwrap();

    // 6 second clip at 10 fps, with a few frames of slack
    for _ in 0..65 {
        seq.on_frame(FRAME, &mut camera);
    }

    assert_eq!(seq.transitions(), 2);
    assert_ne!(seq.active_action(), Some(first));
    assert_eq!(seq.last_index(), Some(1));
    assert_eq!(seq.state(), SequencerState::Playing);
}

#[test]
fn test_tour_loops_indefinitely() {
    let (mut seq, _surface, mut camera) = started(SelectionPolicy::ShuffledPool, 5);

    // Roughly ten clips worth of frames
    for _ in 0..620 {
        seq.on_frame(FRAME, &mut camera);
    }

    assert!(seq.transitions() >= 10);
    assert_eq!(seq.state(), SequencerState::Playing);
    // Old actions are dropped once they finish or fade out
    assert!(seq.mixer().unwrap().running_actions().count() <= 2);
}

#[test]
fn test_dispose_twice_is_noop() {
    let (mut seq, mut surface, _camera) = started(SelectionPolicy::ShuffledPool, 2);

    seq.dispose(&mut surface);
    assert_eq!(seq.state(), SequencerState::Disposed);
    let transitions = seq.transitions();

    seq.dispose(&mut surface);
    assert_eq!(seq.state(), SequencerState::Disposed);
    assert_eq!(seq.transitions(), transitions);
}

#[test]
fn test_dispose_before_init() {
    let mut seq = CameraSequencer::new(Catalog::reference(), SequencerConfig::default());
    let mut surface = HeadlessSurface::new();
    seq.dispose(&mut surface);
    assert_eq!(seq.state(), SequencerState::Disposed);

    // A disposed sequencer cannot be revived
    seq.init(&CameraRig::default(), &mut surface);
    assert_eq!(seq.state(), SequencerState::Disposed);
    assert!(surface.attached().is_empty());
}

#[test]
fn test_dispose_detaches_all_listeners() {
    let (mut seq, mut surface, _camera) = started(SelectionPolicy::RoundRobin, 1);
    assert_eq!(surface.attached().len(), 2);

    seq.dispose(&mut surface);

    assert!(surface.attached().is_empty());
    assert!(seq.attached_listeners().is_empty());
    assert!(seq.mixer().is_none());
    assert_eq!(seq.active_action(), None);
}

#[test]
fn test_partial_surface_still_plays() {
    let mut seq = CameraSequencer::new(Catalog::reference(), config(SelectionPolicy::RoundRobin, 1));
    let mut surface = MouseOnlySurface::default();
    let camera = CameraRig::default();

    seq.init(&camera, &mut surface);

    assert_eq!(seq.state(), SequencerState::Playing);
    assert_eq!(seq.attached_listeners(), &[InteractionKind::Click]);

    seq.dispose(&mut surface);
    assert!(surface.attached.is_empty());
}

// ============================================================================
// Events
// ============================================================================

#[test]
fn test_stale_finished_event_changes_nothing() {
    let (mut seq, _surface, camera) = started(SelectionPolicy::RoundRobin, 1);
    let old = seq.active_action().unwrap();
    seq.on_interaction(InteractionKind::TouchEnd, &camera).unwrap();

    let active = seq.active_action();
    let index = seq.last_index();
    let transitions = seq.transitions();

    assert_eq!(seq.on_action_finished(old, &camera), None);

    assert_eq!(seq.active_action(), active);
    assert_eq!(seq.last_index(), index);
    assert_eq!(seq.transitions(), transitions);
    assert_eq!(seq.state(), SequencerState::Playing);
}

#[test]
fn test_finished_event_for_active_action_advances() {
    let (mut seq, _surface, camera) = started(SelectionPolicy::RoundRobin, 1);
    let active = seq.active_action().unwrap();

    let next = seq.on_action_finished(active, &camera);

    assert!(next.is_some());
    assert_eq!(seq.active_action(), next);
    assert_eq!(seq.last_index(), Some(1));
}

#[test]
fn test_duplicate_finished_event_advances_once() {
    let (mut seq, _surface, mut camera) = started(SelectionPolicy::RoundRobin, 1);
    let active = seq.active_action().unwrap();

    // Host delivers the event, then the same frame's tick runs
    seq.on_action_finished(active, &camera);
    seq.on_action_finished(active, &camera);
    seq.on_frame(FRAME, &mut camera);

    assert_eq!(seq.transitions(), 2);
    assert_eq!(seq.last_index(), Some(1));
}

#[test]
fn test_interaction_interrupts_running_clip() {
    let (mut seq, _surface, mut camera) = started(SelectionPolicy::ShuffledPool, 11);
    let interrupted = seq.active_action().unwrap();
    let interrupted_name = seq.current_clip_name().unwrap().to_string();

    // 0.05s into a 6 second clip
    seq.on_frame(0.05, &mut camera);
    let replacement = seq.on_interaction(InteractionKind::Click, &camera).unwrap();

    assert_ne!(replacement, interrupted);
    assert_eq!(seq.active_action(), Some(replacement));
    assert_ne!(seq.current_clip_name().unwrap(), interrupted_name);

    // The interrupted action fades out instead of stopping dead
    let old = seq.mixer().unwrap().action(interrupted).unwrap();
    assert!(old.is_fading());

    // Its late finished event is ignored
    assert_eq!(seq.on_action_finished(interrupted, &camera), None);
    assert_eq!(seq.active_action(), Some(replacement));

    // After the fade window only the new action remains
    for _ in 0..5 {
        seq.on_frame(FRAME, &mut camera);
    }
    let running: Vec<ActionId> = seq.mixer().unwrap().running_actions().map(|a| a.id()).collect();
    assert_eq!(running, vec![replacement]);
}

#[test]
fn test_rapid_clicks_each_supersede() {
    let (mut seq, _surface, mut camera) = started(SelectionPolicy::RoundRobin, 1);

    let mut previous = seq.active_action().unwrap();
    for _ in 0..10 {
        let next = seq.on_interaction(InteractionKind::Click, &camera).unwrap();
        assert_ne!(next, previous);
        assert_eq!(seq.on_action_finished(previous, &camera), None);
        previous = next;
    }
    assert_eq!(seq.transitions(), 11);

    seq.on_frame(FRAME, &mut camera);
    assert_eq!(seq.active_action(), Some(previous));
}

#[test]
fn test_teardown_mid_fade_blocks_further_transitions() {
    let (mut seq, mut surface, mut camera) = started(SelectionPolicy::RoundRobin, 1);
    let first = seq.active_action().unwrap();
    seq.on_interaction(InteractionKind::Click, &camera).unwrap();
    let second = seq.active_action().unwrap();

    // Mid fade: both actions still contribute
    seq.on_frame(0.1, &mut camera);
    assert_eq!(seq.mixer().unwrap().running_actions().count(), 2);

    seq.dispose(&mut surface);
    let transitions = seq.transitions();
    let pose = camera;

    // A finished event queued before teardown arrives late
    assert_eq!(seq.on_action_finished(second, &camera), None);
    assert_eq!(seq.on_action_finished(first, &camera), None);
    assert_eq!(seq.on_interaction(InteractionKind::Click, &camera), None);
    seq.on_frame(10.0, &mut camera);

    assert_eq!(seq.transitions(), transitions);
    assert_eq!(camera, pose);
    assert!(surface.attached().is_empty());
    assert_eq!(seq.state(), SequencerState::Disposed);
}

// ============================================================================
// Failure handling
// ============================================================================

#[test]
fn test_broken_motion_keeps_previous_action() {
    let good = Catalog::reference().get(0).unwrap().clone();
    let catalog = Arc::new(Catalog::new(vec![good, broken_motion("Broken")]));
    let mut seq = CameraSequencer::new(catalog, config(SelectionPolicy::RoundRobin, 1));
    let mut surface = HeadlessSurface::new();
    let camera = CameraRig::default();

    seq.init(&camera, &mut surface);
    let playing = seq.active_action().unwrap();

    // Round robin lands on the broken entry: nothing changes
    assert_eq!(seq.on_interaction(InteractionKind::Click, &camera), None);
    assert_eq!(seq.active_action(), Some(playing));
    assert_eq!(seq.state(), SequencerState::Playing);
    assert!(seq.mixer().unwrap().action(playing).unwrap().is_running());

    // The tour moves past it on the next trigger
    let next = seq.on_interaction(InteractionKind::Click, &camera);
    assert!(next.is_some());
    assert_eq!(seq.last_index(), Some(0));
}

#[test]
fn test_broken_first_motion_stays_idle() {
    let catalog = Arc::new(Catalog::new(vec![broken_motion("A"), broken_motion("B")]));
    let mut seq = CameraSequencer::new(catalog, config(SelectionPolicy::ShuffledPool, 1));
    let mut surface = HeadlessSurface::new();
    let mut camera = CameraRig::default();
    let pose = camera;

    seq.init(&camera, &mut surface);
    assert_eq!(seq.state(), SequencerState::Idle);
    assert_eq!(seq.active_action(), None);

    seq.on_frame(FRAME, &mut camera);
    assert_eq!(camera, pose);
    assert_eq!(seq.on_interaction(InteractionKind::Click, &camera), None);
    assert_eq!(seq.state(), SequencerState::Idle);
}

#[test]
fn test_single_motion_catalog_skips_repeat() {
    let only = Catalog::reference().get(3).unwrap().clone();
    let catalog = Arc::new(Catalog::new(vec![only]));

    for policy in [SelectionPolicy::RoundRobin, SelectionPolicy::ShuffledPool] {
        let mut seq = CameraSequencer::new(Arc::clone(&catalog), config(policy, 1));
        let mut surface = HeadlessSurface::new();
        let camera = CameraRig::default();

        seq.init(&camera, &mut surface);
        let playing = seq.active_action();
        assert!(playing.is_some());

        assert_eq!(seq.on_interaction(InteractionKind::Click, &camera), None);
        assert_eq!(seq.active_action(), playing);
        assert_eq!(seq.state(), SequencerState::Playing);
    }
}

#[test]
fn test_empty_catalog_never_plays() {
    let mut seq = CameraSequencer::new(
        Arc::new(Catalog::new(Vec::new())),
        SequencerConfig::default(),
    );
    let mut surface = HeadlessSurface::new();
    seq.init(&CameraRig::default(), &mut surface);
    assert_eq!(seq.state(), SequencerState::Idle);
    assert_eq!(seq.current_clip_name(), None);
}

#[test]
fn test_motion_anchored_to_camera_starts_at_camera() {
    let mut def = Catalog::reference().get(2).unwrap().clone();
    def.start_from_camera = true;
    let catalog = Arc::new(Catalog::new(vec![def, Catalog::reference().get(4).unwrap().clone()]));

    let config = SequencerConfig {
        fade_duration: 0.0,
        ..config(SelectionPolicy::RoundRobin, 1)
    };
    let mut seq = CameraSequencer::new(catalog, config);
    let mut surface = HeadlessSurface::new();
    let mut camera = CameraRig::new(Vec3::new(3.0, 3.0, 3.0), 45.0);

    seq.init(&camera, &mut surface);
    let action = seq.mixer().unwrap().action(seq.active_action().unwrap()).unwrap();
    assert_eq!(
        action.clip().position_track().values()[0],
        Vec3::new(3.0, 3.0, 3.0)
    );

    // Halfway between the camera and the LowAngle end key
    seq.on_frame(3.0, &mut camera);
    assert!((camera.position - Vec3::new(3.4, 2.1, 2.5)).length() < 1e-4);
}
