//! Headless playback of a tour, used by the CLI and tests.

use std::fmt;

use trophy_camera::{HeadlessSurface, InteractionKind};

use crate::scene::TrophyScene;

/// What started a motion during a simulated tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Start,
    Finished,
    Click,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Trigger::Start => "start",
            Trigger::Finished => "finished",
            Trigger::Click => "click",
        };
        f.write_str(label)
    }
}

/// One motion change in the log.
#[derive(Debug, Clone, PartialEq)]
pub struct TourEntry {
    pub time: f32,
    pub index: usize,
    pub clip: String,
    pub trigger: Trigger,
}

impl fmt::Display for TourEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>8.3}s  #{} {:<18} ({})",
            self.time, self.index, self.clip, self.trigger
        )
    }
}

#[derive(Debug, Clone)]
pub struct TourOptions {
    /// Simulated wall time in seconds
    pub seconds: f32,
    /// Frames per second
    pub fps: f32,
    /// Times at which a click lands, in seconds
    pub clicks: Vec<f32>,
}

impl Default for TourOptions {
    fn default() -> Self {
        Self {
            seconds: 30.0,
            fps: 60.0,
            clicks: Vec::new(),
        }
    }
}

/// Run the scene frame by frame and record every motion it starts.
///
/// The scene is disposed at the end.
pub fn run_tour(scene: &mut TrophyScene, options: &TourOptions) -> Vec<TourEntry> {
    let mut surface = HeadlessSurface::new();
    let mut log = Vec::new();

    scene.start(&mut surface);
    record(scene, 0.0, Trigger::Start, &mut log);

    let fps = if options.fps.is_finite() && options.fps > 0.0 {
        options.fps
    } else {
        60.0
    };
    let dt = 1.0 / fps;
    let frames = (options.seconds.max(0.0) * fps).round() as u64;

    let mut clicks: Vec<f32> = options.clicks.iter().copied().filter(|t| t.is_finite()).collect();
    clicks.sort_by(f32::total_cmp);
    let mut pending = clicks.into_iter().peekable();

    let mut seen = scene.sequencer().transitions();
    for frame in 1..=frames {
        let now = frame as f32 * dt;

        while let Some(&at) = pending.peek() {
            if at > now {
                break;
            }
            pending.next();
            if scene.interact(InteractionKind::Click) {
                seen = scene.sequencer().transitions();
                record(scene, now, Trigger::Click, &mut log);
            }
        }

        scene.tick(dt);
        let transitions = scene.sequencer().transitions();
        if transitions != seen {
            seen = transitions;
            record(scene, now, Trigger::Finished, &mut log);
        }
    }

    scene.dispose(&mut surface);
    log::debug!("Tour simulated {} frames, {} entries", frames, log.len());
    log
}

fn record(scene: &TrophyScene, time: f32, trigger: Trigger, log: &mut Vec<TourEntry>) {
    let sequencer = scene.sequencer();
    if let (Some(index), Some(clip)) = (sequencer.last_index(), sequencer.current_clip_name()) {
        log.push(TourEntry {
            time,
            index,
            clip: clip.to_string(),
            trigger,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;
    use trophy_camera::{Catalog, SelectionPolicy};

    fn scene(policy: SelectionPolicy) -> TrophyScene {
        let mut config = SceneConfig::default();
        config.sequencer.policy = policy;
        config.sequencer.seed = Some(11);
        TrophyScene::new(config, Catalog::reference())
    }

    #[test]
    fn test_round_robin_tour() {
        let mut scene = scene(SelectionPolicy::RoundRobin);
        let log = run_tour(
            &mut scene,
            &TourOptions {
                seconds: 13.0,
                fps: 30.0,
                clicks: vec![],
            },
        );

        let names: Vec<&str> = log.iter().map(|e| e.clip.as_str()).collect();
        assert_eq!(names, vec!["CircularOrbit", "SideSweep", "LowAngle"]);
        assert_eq!(log[0].trigger, Trigger::Start);
        assert_eq!(log[1].trigger, Trigger::Finished);
        assert!((log[1].time - 6.0).abs() < 0.1);
        assert!(!scene.is_running());
    }

    #[test]
    fn test_clicks_interrupt() {
        let mut scene = scene(SelectionPolicy::RoundRobin);
        let log = run_tour(
            &mut scene,
            &TourOptions {
                seconds: 2.0,
                fps: 60.0,
                clicks: vec![1.5, 0.5],
            },
        );

        let triggers: Vec<Trigger> = log.iter().map(|e| e.trigger).collect();
        assert_eq!(triggers, vec![Trigger::Start, Trigger::Click, Trigger::Click]);
        assert_eq!(log[1].index, 1);
        assert_eq!(log[2].index, 2);
        assert!(log[1].time < log[2].time);
    }

    #[test]
    fn test_shuffled_tour_never_repeats() {
        let mut scene = scene(SelectionPolicy::ShuffledPool);
        let log = run_tour(
            &mut scene,
            &TourOptions {
                seconds: 60.0,
                fps: 20.0,
                clicks: vec![1.0, 2.0, 3.0],
            },
        );

        assert!(log.len() >= 10);
        for pair in log.windows(2) {
            assert_ne!(pair[0].index, pair[1].index);
        }
    }

    #[test]
    fn test_entry_display() {
        let entry = TourEntry {
            time: 6.0,
            index: 1,
            clip: "SideSweep".to_string(),
            trigger: Trigger::Finished,
        };
        let text = entry.to_string();
        assert!(text.contains("SideSweep"));
        assert!(text.contains("(finished)"));
    }
}
