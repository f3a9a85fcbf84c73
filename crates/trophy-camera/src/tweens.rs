//! Interpolation and easing primitives shared by tracks and fades.

use glam::{Quat, Vec3};
use keyframe::{ease, functions};
use serde::{Deserialize, Serialize};

/// Easing function type for weight fades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EaseType {
    /// Constant speed interpolation
    #[default]
    Linear,
    /// Slow start, fast end
    EaseIn,
    /// Fast start, slow end
    EaseOut,
    /// Slow start and end, fast middle
    EaseInOut,
    /// Quadratic ease out
    QuadOut,
    /// Cubic ease out
    CubicOut,
}

impl EaseType {
    /// Apply easing function to a normalized time value (0.0 to 1.0).
    pub fn apply(&self, t: f32) -> f32 {
        let t = (t as f64).clamp(0.0, 1.0);
        let result = match self {
            EaseType::Linear => ease(functions::Linear, 0.0, 1.0, t),
            EaseType::EaseIn => ease(functions::EaseIn, 0.0, 1.0, t),
            EaseType::EaseOut => ease(functions::EaseOut, 0.0, 1.0, t),
            EaseType::EaseInOut => ease(functions::EaseInOut, 0.0, 1.0, t),
            EaseType::QuadOut => ease(functions::EaseOutQuad, 0.0, 1.0, t),
            EaseType::CubicOut => ease(functions::EaseOutCubic, 0.0, 1.0, t),
        };
        result as f32
    }
}

/// Trait for values a keyframe track can interpolate between.
pub trait Tweenable: Copy {
    /// Interpolate between two values.
    /// `t` should be 0.0 to 1.0, where 0.0 returns `a` and 1.0 returns `b`.
    fn lerp(a: Self, b: Self, t: f32) -> Self;
}

impl Tweenable for f32 {
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        a + (b - a) * t
    }
}

impl Tweenable for Vec3 {
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        a.lerp(b, t)
    }
}

impl Tweenable for Quat {
    /// Spherical interpolation along the shortest arc.
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        a.slerp(b, t)
    }
}

/// A weight ramp between two values over a fixed duration.
///
/// Used by the mixer for fade-in and fade-out of actions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fade {
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
    easing: EaseType,
}

impl Fade {
    pub fn new(from: f32, to: f32, duration: f32, easing: EaseType) -> Self {
        Self {
            from,
            to,
            elapsed: 0.0,
            duration: duration.max(0.0),
            easing,
        }
    }

    /// Advance the fade by `dt` seconds.
    ///
    /// Returns `true` while the fade is still in progress.
    pub fn update(&mut self, dt: f32) -> bool {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        !self.is_complete()
    }

    /// Current weight along the ramp.
    pub fn value(&self) -> f32 {
        if self.duration <= 0.0 {
            return self.to;
        }
        let eased = self.easing.apply(self.elapsed / self.duration);
        <f32 as Tweenable>::lerp(self.from, self.to, eased)
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Get remaining fade time in seconds.
    pub fn remaining(&self) -> f32 {
        (self.duration - self.elapsed).max(0.0)
    }
}
