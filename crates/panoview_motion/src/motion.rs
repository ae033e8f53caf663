// SPDX-License-Identifier: MIT OR Apache-2.0
//! Inertial single-axis motion.
//!
//! A [`MotionController`] moves one scalar (yaw, pitch, zoom level...)
//! toward a target or indefinitely in one direction. Velocity ramps up and
//! down at a fixed acceleration derived from the configured speed, and a
//! braking-distance check starts deceleration early enough to land on the
//! target without overshooting.

use std::fmt;

/// Motion mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionMode {
    /// Decelerating to rest (or at rest)
    #[default]
    Stopped,
    /// Moving toward a finite target
    TrackingTarget,
    /// Moving indefinitely in one direction
    RollingInfinite,
}

impl MotionMode {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stopped => "Stopped",
            Self::TrackingTarget => "TrackingTarget",
            Self::RollingInfinite => "RollingInfinite",
        }
    }
}

/// Direction of an unbounded roll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward increasing values
    Forward,
    /// Toward decreasing values
    Backward,
}

impl Direction {
    /// Sign applied to speeds moving in this direction
    pub fn sign(self) -> f64 {
        match self {
            Self::Forward => 1.0,
            Self::Backward => -1.0,
        }
    }

    fn from_invert(invert: bool) -> Self {
        if invert {
            Self::Backward
        } else {
            Self::Forward
        }
    }
}

/// Where the controller is heading
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionTarget {
    /// A finite position inside the bounds
    Position(f64),
    /// No end point, only a direction
    Unbounded(Direction),
}

/// Clamp without panicking on inverted bounds.
#[inline]
pub(crate) fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Velocity-ramped target tracker for a single axis
pub struct MotionController {
    mode: MotionMode,
    current: f64,
    target: MotionTarget,
    /// Units per second
    speed: f64,
    speed_multiplier: f64,
    velocity: f64,
    min: f64,
    max: f64,
    on_change: Option<Box<dyn FnMut(f64)>>,
}

impl MotionController {
    /// Create an unbounded controller resting at `initial`
    pub fn new(initial: f64) -> Self {
        Self {
            mode: MotionMode::Stopped,
            current: initial,
            target: MotionTarget::Position(initial),
            speed: 0.0,
            speed_multiplier: 1.0,
            velocity: 0.0,
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
            on_change: None,
        }
    }

    /// Set the bounds; the current value is clamped into them
    pub fn with_bounds(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self.current = clamp(self.current, min, max);
        self.target = MotionTarget::Position(self.current);
        self
    }

    /// Set the base speed in units per second
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Set the callback invoked with the new value whenever it changes
    pub fn with_on_change(mut self, on_change: impl FnMut(f64) + 'static) -> Self {
        self.on_change = Some(Box::new(on_change));
        self
    }

    /// Replace the change callback
    pub fn set_on_change(&mut self, on_change: impl FnMut(f64) + 'static) {
        self.on_change = Some(Box::new(on_change));
    }

    /// Current value, always within the bounds
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Current mode
    pub fn mode(&self) -> MotionMode {
        self.mode
    }

    /// Current target
    pub fn target(&self) -> MotionTarget {
        self.target
    }

    /// Instantaneous signed velocity in units per second
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Base speed in units per second
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// `(min, max)` bounds
    pub fn bounds(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// Whether further updates can no longer change the value. A roll with
    /// no speed, or pinned at the bound it heads for, counts as idle.
    pub fn is_idle(&self) -> bool {
        match (self.mode, self.target) {
            (MotionMode::RollingInfinite, MotionTarget::Unbounded(direction)) => {
                self.speed * self.speed_multiplier == 0.0
                    || match direction {
                        Direction::Forward => self.current >= self.max,
                        Direction::Backward => self.current <= self.min,
                    }
            }
            _ => self.mode == MotionMode::Stopped && self.velocity == 0.0,
        }
    }

    /// Set the base speed, effective from the next update
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    /// Move toward `position`, clamped to the bounds
    pub fn goto(&mut self, position: f64, speed_multiplier: f64) {
        self.mode = MotionMode::TrackingTarget;
        self.target = MotionTarget::Position(clamp(position, self.min, self.max));
        self.speed_multiplier = speed_multiplier;
        tracing::debug!(
            "Motion tracking {:?} from {} (x{})",
            self.target,
            self.current,
            speed_multiplier
        );
    }

    /// Move by `delta` relative to the pending target, or to the current
    /// value when not tracking. A zero multiplier applies the step at once.
    pub fn step(&mut self, delta: f64, speed_multiplier: f64) {
        if speed_multiplier == 0.0 {
            self.set_value(self.current + delta);
            return;
        }

        let base = match (self.mode, self.target) {
            (MotionMode::TrackingTarget, MotionTarget::Position(target)) => target,
            _ => self.current,
        };
        self.goto(base + delta, speed_multiplier);
    }

    /// Move indefinitely, toward decreasing values when `invert` is set
    pub fn roll(&mut self, invert: bool, speed_multiplier: f64) {
        self.mode = MotionMode::RollingInfinite;
        self.target = MotionTarget::Unbounded(Direction::from_invert(invert));
        self.speed_multiplier = speed_multiplier;
        tracing::debug!("Motion rolling {:?} (x{})", self.target, speed_multiplier);
    }

    /// Decelerate to rest from the current velocity
    pub fn stop(&mut self) {
        if self.mode != MotionMode::Stopped {
            tracing::debug!("Motion stopping at {} (velocity {})", self.current, self.velocity);
        }
        self.mode = MotionMode::Stopped;
    }

    /// Jump to `value` (clamped), cancelling any motion.
    /// Returns true if the value changed.
    pub fn set_value(&mut self, value: f64) -> bool {
        let value = clamp(value, self.min, self.max);
        self.target = MotionTarget::Position(value);
        self.mode = MotionMode::Stopped;
        self.velocity = 0.0;

        if value != self.current {
            self.current = value;
            self.notify();
            true
        } else {
            false
        }
    }

    /// Advance the simulation by `elapsed_ms`.
    /// Returns true if the value changed.
    pub fn update(&mut self, elapsed_ms: f64) -> bool {
        let effective_speed = self.speed * self.speed_multiplier;

        // No acceleration budget: nothing can move or brake
        if effective_speed == 0.0 {
            self.velocity = 0.0;
            if self.mode == MotionMode::TrackingTarget {
                tracing::debug!("Motion halted at {}: zero effective speed", self.current);
                self.mode = MotionMode::Stopped;
            }
            return false;
        }

        let desired_velocity = match (self.mode, self.target) {
            (MotionMode::TrackingTarget, MotionTarget::Position(target)) => {
                let braking_distance = self.velocity * self.velocity / (4.0 * effective_speed);
                if (target - self.current).abs() <= braking_distance {
                    0.0
                } else if target < self.current {
                    -effective_speed
                } else {
                    effective_speed
                }
            }
            (MotionMode::RollingInfinite, MotionTarget::Unbounded(direction)) => {
                effective_speed * direction.sign()
            }
            _ => 0.0,
        };

        // Symmetric acceleration and deceleration
        let max_delta = elapsed_ms / 1000.0 * effective_speed * 2.0;
        if self.velocity < desired_velocity {
            self.velocity = (self.velocity + max_delta).min(desired_velocity);
        } else if self.velocity > desired_velocity {
            self.velocity = (self.velocity - max_delta).max(desired_velocity);
        }

        let changed = self.integrate(elapsed_ms);
        self.settle();
        changed
    }

    /// Move by the current velocity without crossing the target.
    fn integrate(&mut self, elapsed_ms: f64) -> bool {
        if self.velocity == 0.0 {
            return false;
        }

        let moved = self.current + self.velocity * elapsed_ms / 1000.0;
        let candidate = match self.target {
            MotionTarget::Position(target) if self.current < target => moved.min(target),
            MotionTarget::Position(target) if self.current > target => moved.max(target),
            MotionTarget::Position(_) => return false,
            MotionTarget::Unbounded(_) => moved,
        };
        let candidate = clamp(candidate, self.min, self.max);

        if candidate != self.current {
            self.current = candidate;
            tracing::trace!("Motion value {} (velocity {})", self.current, self.velocity);
            self.notify();
            true
        } else {
            false
        }
    }

    /// Arriving on the target ends the tracking.
    fn settle(&mut self) {
        if self.mode != MotionMode::TrackingTarget {
            return;
        }
        if let MotionTarget::Position(target) = self.target {
            if self.current == target {
                self.mode = MotionMode::Stopped;
                self.velocity = 0.0;
                tracing::debug!("Motion settled at {}", target);
            }
        }
    }

    fn notify(&mut self) {
        if let Some(on_change) = self.on_change.as_mut() {
            on_change(self.current);
        }
    }
}

impl Default for MotionController {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl fmt::Debug for MotionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MotionController")
            .field("mode", &self.mode)
            .field("current", &self.current)
            .field("target", &self.target)
            .field("speed", &self.speed)
            .field("speed_multiplier", &self.speed_multiplier)
            .field("velocity", &self.velocity)
            .field("min", &self.min)
            .field("max", &self.max)
            .finish_non_exhaustive()
    }
}
