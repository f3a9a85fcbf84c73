//! Camera tour for the trophy showcase
//!
//! This crate provides the platform-independent core:
//! - Keyframe tracks and motion clips (KeyframeTrack, MotionClip)
//! - The motion catalog (Catalog, MotionDef)
//! - A camera animation mixer with fades and finished events (CameraMixer)
//! - The tour sequencer and its selection policies (CameraSequencer, Selector)

pub mod camera;
pub mod catalog;
pub mod clip;
pub mod config;
pub mod mixer;
pub mod rng;
pub mod selection;
pub mod sequencer;
pub mod surface;
pub mod track;
pub mod tweens;

pub use camera::CameraRig;
pub use catalog::{Catalog, CatalogError, MotionDef};
pub use clip::{ClipError, MotionClip, TrackTarget};
pub use config::SequencerConfig;
pub use mixer::{ActionId, ActionState, CameraMixer, LoopMode, MixerEvent};
pub use selection::{SelectionError, SelectionPolicy, Selector};
pub use sequencer::{CameraSequencer, SequencerError, SequencerState, TransitionCause};
pub use surface::{HeadlessSurface, InteractionKind, InteractionSurface, SurfaceError};
pub use track::{KeyframeTrack, TrackError};
pub use tweens::EaseType;
