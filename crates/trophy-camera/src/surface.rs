//! Render-surface input the sequencer listens to.

use thiserror::Error;

/// User interactions that advance the tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    Click,
    TouchEnd,
}

impl InteractionKind {
    pub const ALL: [InteractionKind; 2] = [InteractionKind::Click, InteractionKind::TouchEnd];

    /// DOM event name.
    pub fn event_name(&self) -> &'static str {
        match self {
            InteractionKind::Click => "click",
            InteractionKind::TouchEnd => "touchend",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("failed to attach '{event}' listener: {reason}")]
    Attach { event: &'static str, reason: String },
}

/// Source of interaction events (the canvas in the browser).
///
/// Implementations route delivered events back to
/// [`CameraSequencer::on_interaction`](crate::CameraSequencer::on_interaction).
pub trait InteractionSurface {
    fn attach(&mut self, kind: InteractionKind) -> Result<(), SurfaceError>;

    /// Remove a listener. Detaching a kind that is not attached is a no-op.
    fn detach(&mut self, kind: InteractionKind);
}

/// Surface without a real event source; only tracks what is attached.
///
/// Used by headless hosts, which inject interactions directly.
#[derive(Debug, Default, Clone)]
pub struct HeadlessSurface {
    attached: Vec<InteractionKind>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_attached(&self, kind: InteractionKind) -> bool {
        self.attached.contains(&kind)
    }

    pub fn attached(&self) -> &[InteractionKind] {
        &self.attached
    }
}

impl InteractionSurface for HeadlessSurface {
    fn attach(&mut self, kind: InteractionKind) -> Result<(), SurfaceError> {
        if !self.attached.contains(&kind) {
            self.attached.push(kind);
        }
        Ok(())
    }

    fn detach(&mut self, kind: InteractionKind) {
        self.attached.retain(|&k| k != kind);
    }
}
