// SPDX-License-Identifier: MIT OR Apache-2.0
//! Motion and animation engine for the Panoview panorama viewer.
//!
//! This crate turns discrete input (drag releases, autorotate toggles, zoom
//! requests, "go to position" calls) into smooth motion over time:
//! - Inertial single-axis motion controllers
//! - Grouped multi-axis motion
//! - Cancellable property tweens with a completed/cancelled outcome
//! - Easing curves
//!
//! ## Architecture
//!
//! Nothing here owns a timer or a thread. An external render loop ticks
//! every component once per frame with the elapsed milliseconds, and each
//! component reports whether its value changed. [`FrameLoop`] bundles that
//! for a whole viewer. All types are single-threaded.

pub mod completion;
pub mod easing;
pub mod frame_loop;
pub mod motion;
pub mod motion_group;
pub mod scheduler;
pub mod settings;
pub mod tween;

pub use completion::Completion;
pub use easing::{Easing, EasingFn, UnknownEasing};
pub use frame_loop::{FrameLoop, FrameStatus};
pub use motion::{Direction, MotionController, MotionMode, MotionTarget};
pub use motion_group::{MotionError, MotionGroup};
pub use scheduler::{TweenScheduler, TweenSpawner};
pub use settings::{
    ControllerSettings, MotionSettings, SettingsError, TransitionSettings, SETTINGS_FILE_NAME,
    SETTINGS_FORMAT_VERSION,
};
pub use tween::{PropertyRange, Tween, TweenBuilder, TweenError, TweenHandle, TweenId, TweenState};
