// SPDX-License-Identifier: MIT OR Apache-2.0
//! Several motion controllers moved as one position.
//!
//! Used for the two-axis camera direction: a `goto` scales each axis speed
//! by its share of the longest distance so that all axes arrive together.

use crate::motion::{clamp, MotionController, MotionMode};
use indexmap::IndexMap;
use std::fmt;
use thiserror::Error;

/// Motion group errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MotionError {
    /// No controller registered under this name
    #[error("Unknown axis: {0}")]
    UnknownAxis(String),
}

/// Result type for motion group operations
pub type Result<T> = std::result::Result<T, MotionError>;

type GroupCallback = Box<dyn FnMut(&IndexMap<String, f64>)>;

/// Named set of [`MotionController`]s sharing one change callback
#[derive(Default)]
pub struct MotionGroup {
    axes: IndexMap<String, MotionController>,
    on_change: Option<GroupCallback>,
}

impl MotionGroup {
    /// Create an empty group
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an axis. Its own change callback is left untouched.
    pub fn with_axis(mut self, name: impl Into<String>, controller: MotionController) -> Self {
        self.add(name, controller);
        self
    }

    /// Set the callback receiving every axis value after a change
    pub fn with_on_change(mut self, on_change: impl FnMut(&IndexMap<String, f64>) + 'static) -> Self {
        self.on_change = Some(Box::new(on_change));
        self
    }

    /// Add or replace an axis
    pub fn add(&mut self, name: impl Into<String>, controller: MotionController) {
        self.axes.insert(name.into(), controller);
    }

    /// Get an axis
    pub fn get(&self, name: &str) -> Option<&MotionController> {
        self.axes.get(name)
    }

    /// Get a mutable axis
    pub fn get_mut(&mut self, name: &str) -> Option<&mut MotionController> {
        self.axes.get_mut(name)
    }

    /// Axis names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.axes.keys().map(String::as_str)
    }

    /// Current value of every axis
    pub fn current(&self) -> IndexMap<String, f64> {
        self.axes
            .iter()
            .map(|(name, axis)| (name.clone(), axis.current()))
            .collect()
    }

    /// Whether every axis is at rest
    pub fn is_idle(&self) -> bool {
        self.axes.values().all(MotionController::is_idle)
    }

    /// Set the base speed of every axis
    pub fn set_speed(&mut self, speed: f64) {
        for axis in self.axes.values_mut() {
            axis.set_speed(speed);
        }
    }

    fn check<'a>(&self, names: impl IntoIterator<Item = &'a String>) -> Result<()> {
        match names.into_iter().find(|name| !self.axes.contains_key(*name)) {
            Some(name) => Err(MotionError::UnknownAxis(name.clone())),
            None => Ok(()),
        }
    }

    /// Move the listed axes so that they all arrive at the same time
    pub fn goto(&mut self, positions: &IndexMap<String, f64>, speed_multiplier: f64) -> Result<()> {
        self.check(positions.keys())?;

        // Distances to the targets each axis will actually reach
        let distances: IndexMap<&str, f64> = positions
            .iter()
            .map(|(name, position)| {
                let axis = &self.axes[name];
                let (min, max) = axis.bounds();
                (name.as_str(), (clamp(*position, min, max) - axis.current()).abs())
            })
            .collect();
        let longest = distances.values().copied().fold(0.0, f64::max);

        for (name, position) in positions {
            let ratio = if longest > 0.0 {
                distances[name.as_str()] / longest
            } else {
                0.0
            };
            self.axes[name].goto(*position, speed_multiplier * ratio);
        }
        Ok(())
    }

    /// Step the listed axes
    pub fn step(&mut self, deltas: &IndexMap<String, f64>, speed_multiplier: f64) -> Result<()> {
        self.check(deltas.keys())?;
        let changed = deltas.iter().fold(false, |changed, (name, delta)| {
            let axis = &mut self.axes[name];
            let before = axis.current();
            axis.step(*delta, speed_multiplier);
            changed | (axis.current() != before)
        });
        // A zero multiplier jumps at once
        if changed {
            self.notify();
        }
        Ok(())
    }

    /// Roll the listed axes; `true` inverts the direction
    pub fn roll(&mut self, inverts: &IndexMap<String, bool>, speed_multiplier: f64) -> Result<()> {
        self.check(inverts.keys())?;
        for (name, invert) in inverts {
            self.axes[name].roll(*invert, speed_multiplier);
        }
        Ok(())
    }

    /// Decelerate every axis
    pub fn stop(&mut self) {
        for axis in self.axes.values_mut() {
            axis.stop();
        }
    }

    /// Jump the listed axes. Returns true if any value changed.
    pub fn set_value(&mut self, values: &IndexMap<String, f64>) -> Result<bool> {
        self.check(values.keys())?;
        let changed = values
            .iter()
            .fold(false, |changed, (name, value)| self.axes[name].set_value(*value) | changed);
        if changed {
            self.notify();
        }
        Ok(changed)
    }

    /// Advance every axis. Returns true if any value changed.
    pub fn update(&mut self, elapsed_ms: f64) -> bool {
        let changed = self
            .axes
            .values_mut()
            .fold(false, |changed, axis| axis.update(elapsed_ms) | changed);
        if changed {
            self.notify();
        }
        changed
    }

    /// Whether any axis is tracking a target or rolling
    pub fn is_moving(&self) -> bool {
        self.axes
            .values()
            .any(|axis| axis.mode() != MotionMode::Stopped)
    }

    fn notify(&mut self) {
        if self.on_change.is_some() {
            let values = self.current();
            if let Some(on_change) = self.on_change.as_mut() {
                on_change(&values);
            }
        }
    }
}

impl fmt::Debug for MotionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MotionGroup")
            .field("axes", &self.axes)
            .finish_non_exhaustive()
    }
}
