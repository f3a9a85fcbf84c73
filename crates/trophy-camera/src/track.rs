//! Keyframe tracks: time-stamped samples for one animated camera property.

use glam::{Quat, Vec3};
use thiserror::Error;

use crate::tweens::Tweenable;

/// Rejected keyframe data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackError {
    #[error("track has no keyframes")]
    Empty,

    #[error("track has {times} key times but {values} values")]
    LengthMismatch { times: usize, values: usize },

    #[error("first key time must be 0, got {0}")]
    FirstTimeNotZero(f32),

    #[error("key time {time} at index {index} is not after the previous key")]
    NotIncreasing { index: usize, time: f32 },

    #[error("key time at index {0} is not finite")]
    NonFiniteTime(usize),
}

/// Ordered `(time, value)` samples.
///
/// Invariant: at least one key, times finite and strictly increasing,
/// first time is 0.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeTrack<T> {
    times: Vec<f32>,
    values: Vec<T>,
}

pub type PositionTrack = KeyframeTrack<Vec3>;
pub type OrientationTrack = KeyframeTrack<Quat>;

impl<T: Tweenable> KeyframeTrack<T> {
    pub fn new(times: Vec<f32>, values: Vec<T>) -> Result<Self, TrackError> {
        if times.len() != values.len() {
            return Err(TrackError::LengthMismatch {
                times: times.len(),
                values: values.len(),
            });
        }
        let Some(&first) = times.first() else {
            return Err(TrackError::Empty);
        };
        if first != 0.0 {
            return Err(TrackError::FirstTimeNotZero(first));
        }
        for (index, &time) in times.iter().enumerate() {
            if !time.is_finite() {
                return Err(TrackError::NonFiniteTime(index));
            }
            if index > 0 && time <= times[index - 1] {
                return Err(TrackError::NotIncreasing { index, time });
            }
        }
        Ok(Self { times, values })
    }

    /// Build a track from `(time, value)` pairs.
    pub fn from_keys(keys: impl IntoIterator<Item = (f32, T)>) -> Result<Self, TrackError> {
        let (times, values) = keys.into_iter().unzip();
        Self::new(times, values)
    }

    pub fn times(&self) -> &[f32] {
        &self.times
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Time of the last key.
    pub fn end_time(&self) -> f32 {
        self.times[self.times.len() - 1]
    }

    /// Replace the value of the first key.
    pub fn set_first_value(&mut self, value: T) {
        self.values[0] = value;
    }

    /// Sample the track at time `t`, clamping outside the key range.
    pub fn sample(&self, t: f32) -> T {
        let last = self.times.len() - 1;
        if t <= self.times[0] {
            return self.values[0];
        }
        if t >= self.times[last] {
            return self.values[last];
        }
        // First key strictly after t; t lies in [times[i - 1], times[i])
        let i = self.times.partition_point(|&k| k <= t);
        let t0 = self.times[i - 1];
        let t1 = self.times[i];
        let f = (t - t0) / (t1 - t0);
        T::lerp(self.values[i - 1], self.values[i], f)
    }
}

/// Normalize an orientation key, treating degenerate input as identity.
pub fn normalize_orientation(q: Quat) -> Quat {
    let len = q.length();
    if len.is_finite() && len > 1e-6 {
        q / len
    } else {
        Quat::IDENTITY
    }
}
