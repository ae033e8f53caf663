// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-frame driver for everything that moves.
//!
//! The render loop calls [`FrameLoop::tick`] once per display refresh with
//! the elapsed wall-clock time. The returned [`FrameStatus`] says whether
//! anything changed (redraw) and whether anything is still in motion
//! (request another frame).

use crate::motion::MotionController;
use crate::motion_group::MotionGroup;
use crate::scheduler::{TweenScheduler, TweenSpawner};
use crate::settings::{MotionSettings, Result};
use crate::tween::{Tween, TweenHandle};
use indexmap::IndexMap;

/// Outcome of one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStatus {
    /// Some value changed and the view needs a redraw
    pub changed: bool,
    /// Something is still moving and needs another frame
    pub active: bool,
}

/// Owns the controllers, groups and tweens of one viewer
#[derive(Debug, Default)]
pub struct FrameLoop {
    controllers: IndexMap<String, MotionController>,
    groups: IndexMap<String, MotionGroup>,
    tweens: TweenScheduler,
    frame_count: u64,
    elapsed_time: f64,
}

impl FrameLoop {
    /// Create an empty frame loop
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a frame loop with one controller per preset
    pub fn from_settings(settings: &MotionSettings) -> Result<Self> {
        let mut frame_loop = Self::new();
        for name in settings.controllers.keys() {
            frame_loop.add_controller(name.clone(), settings.controller(name)?);
        }
        Ok(frame_loop)
    }

    /// Add or replace a controller
    pub fn add_controller(&mut self, name: impl Into<String>, controller: MotionController) {
        self.controllers.insert(name.into(), controller);
    }

    /// Add or replace a group
    pub fn add_group(&mut self, name: impl Into<String>, group: MotionGroup) {
        self.groups.insert(name.into(), group);
    }

    /// Remove a controller
    pub fn remove_controller(&mut self, name: &str) -> Option<MotionController> {
        self.controllers.shift_remove(name)
    }

    /// Get a controller
    pub fn controller(&self, name: &str) -> Option<&MotionController> {
        self.controllers.get(name)
    }

    /// Get a mutable controller
    pub fn controller_mut(&mut self, name: &str) -> Option<&mut MotionController> {
        self.controllers.get_mut(name)
    }

    /// Get a group
    pub fn group(&self, name: &str) -> Option<&MotionGroup> {
        self.groups.get(name)
    }

    /// Get a mutable group
    pub fn group_mut(&mut self, name: &str) -> Option<&mut MotionGroup> {
        self.groups.get_mut(name)
    }

    /// Queue a tween for the next frame
    pub fn spawn(&self, tween: Tween) -> TweenHandle {
        self.tweens.spawn(tween)
    }

    /// Handle for queueing tweens from callbacks
    pub fn spawner(&self) -> TweenSpawner {
        self.tweens.spawner()
    }

    /// Tween registry
    pub fn tweens(&mut self) -> &mut TweenScheduler {
        &mut self.tweens
    }

    /// Frames ticked so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Milliseconds ticked so far
    pub fn elapsed_time(&self) -> f64 {
        self.elapsed_time
    }

    /// Whether another tick could change anything
    pub fn is_active(&self) -> bool {
        !self.tweens.is_idle()
            || self.controllers.values().any(|c| !c.is_idle())
            || self.groups.values().any(|g| !g.is_idle())
    }

    /// Advance everything by `elapsed_ms`
    pub fn tick(&mut self, elapsed_ms: f64) -> FrameStatus {
        self.frame_count += 1;
        self.elapsed_time += elapsed_ms;

        let mut changed = false;
        for controller in self.controllers.values_mut() {
            changed |= controller.update(elapsed_ms);
        }
        for group in self.groups.values_mut() {
            changed |= group.update(elapsed_ms);
        }
        changed |= self.tweens.tick(elapsed_ms);

        let status = FrameStatus {
            changed,
            active: self.is_active(),
        };
        if !status.active {
            tracing::debug!(
                "Frame loop idle after {} frames ({} ms)",
                self.frame_count,
                self.elapsed_time
            );
        }
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SettingsError;

    #[test]
    fn test_goes_idle_after_motion() {
        let mut frame_loop = FrameLoop::from_settings(&MotionSettings::default()).unwrap();
        assert!(!frame_loop.is_active());

        frame_loop.controller_mut("zoom").unwrap().goto(80.0, 1.0);
        let mut frames = 0;
        loop {
            let status = frame_loop.tick(16.0);
            frames += 1;
            if !status.active {
                break;
            }
            assert!(frames < 10_000);
        }

        assert_eq!(frame_loop.controller("zoom").unwrap().current(), 80.0);
        assert_eq!(frame_loop.frame_count(), frames);
        assert_eq!(frame_loop.tick(16.0), FrameStatus::default());
    }

    #[test]
    fn test_goes_idle_when_roll_reaches_bound() {
        let mut frame_loop = FrameLoop::new();
        frame_loop.add_controller(
            "pitch",
            MotionController::new(0.0).with_bounds(-1.0, 1.0).with_speed(2.0),
        );
        frame_loop.controller_mut("pitch").unwrap().roll(false, 1.0);

        let mut frames = 0;
        while frame_loop.tick(16.0).active {
            frames += 1;
            assert!(frames < 10_000);
        }
        assert_eq!(frame_loop.controller("pitch").unwrap().current(), 1.0);
        assert_eq!(frame_loop.tick(16.0), FrameStatus::default());
    }

    #[test]
    fn test_tweens_keep_loop_active() {
        let mut frame_loop = FrameLoop::new();
        let handle = frame_loop.spawn(
            Tween::builder(32.0)
                .property("opacity", 0.0, 1.0)
                .build()
                .unwrap(),
        );
        assert!(frame_loop.is_active());

        let first = frame_loop.tick(16.0);
        assert!(first.changed && first.active);
        let second = frame_loop.tick(16.0);
        assert!(second.changed && !second.active);
        assert_eq!(handle.outcome(), Some(true));
    }

    #[test]
    fn test_groups_are_ticked() {
        let mut frame_loop = FrameLoop::new();
        frame_loop.add_group(
            "position",
            MotionGroup::new().with_axis("yaw", MotionController::new(0.0).with_speed(1.0)),
        );
        frame_loop
            .group_mut("position")
            .unwrap()
            .get_mut("yaw")
            .unwrap()
            .roll(false, 1.0);

        assert!(frame_loop.tick(100.0).changed);
        assert!(frame_loop.is_active());
        assert!(frame_loop.group("position").unwrap().current()["yaw"] > 0.0);
    }

    #[test]
    fn test_unknown_preset() {
        let mut settings = MotionSettings::default();
        settings.controllers.clear();
        let frame_loop = FrameLoop::from_settings(&settings).unwrap();
        assert!(frame_loop.controller("yaw").is_none());
        assert!(matches!(
            settings.controller("yaw"),
            Err(SettingsError::UnknownController(_))
        ));
    }
}
