//! Folio motion core (host-agnostic)
//!
//! Building blocks for section-entrance animation:
//! - [`Ease`] named easing curves
//! - [`TimelineBuilder`] / [`Timeline`]: ordered, replayable property steps
//! - [`Tween`] / [`TweenSet`]: standalone `to` tweens and ambient loops
//! - [`ObserverBinding`] / [`ScrubBinding`]: scroll-position triggers
//! - [`CancelToken`] / [`CancelGuard`]: scoped cancellation
//! - [`Stage`]: the seam a renderer implements; [`MemoryStage`] is the
//!   in-process implementation used by adapters and tests.

pub mod cancel;
pub mod config;
pub mod ease;
pub mod error;
pub mod geometry;
pub mod ids;
pub mod interp;
pub mod observer;
pub mod stage;
pub mod step;
pub mod timeline;
pub mod tween;

// Re-exports for consumers (page controllers, adapters)
pub use cancel::{CancelGuard, CancelToken};
pub use config::Config;
pub use ease::{Ease, EaseMode};
pub use error::MotionError;
pub use geometry::{ElementRect, Viewport};
pub use ids::{IdAllocator, TweenId};
pub use observer::{
    BindingState, Marker, ObserverBinding, Offset, ScrubBinding, Threshold, ToggleAction,
    ToggleActions,
};
pub use stage::{ElementLayout, MemoryStage, Stage, StageLayout};
pub use step::{AnimationStep, Position};
pub use timeline::{Direction, PlayState, Stagger, Timeline, TimelineBuilder, TimelineEvent};
pub use tween::{Repeat, Tween, TweenSet, TweenStatus};

pub use folio_api_core::{Property, StyleMap, StyleWrite, TargetPath, Value, ValueKind, WriteBatch};
