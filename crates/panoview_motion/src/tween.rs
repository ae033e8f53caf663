// SPDX-License-Identifier: MIT OR Apache-2.0
//! One-shot property tweens.
//!
//! A [`Tween`] interpolates a set of named numbers from a start to an end
//! value over a fixed duration. It is advanced by external ticks and settles
//! exactly once, either completed or cancelled.

use crate::completion::Completion;
use crate::easing::EasingFn;
use indexmap::IndexMap;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;
use uuid::Uuid;

/// Tween construction errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TweenError {
    /// No property to animate
    #[error("Tween has no properties")]
    NoProperties,

    /// Duration is not finite
    #[error("Invalid tween duration: {0}")]
    InvalidDuration(f64),

    /// Delay is negative or not a number
    #[error("Invalid tween delay: {0}")]
    InvalidDelay(f64),

    /// Start or end value is not finite
    #[error("Invalid range for property {0}")]
    InvalidRange(String),
}

/// Result type for tween construction
pub type Result<T> = std::result::Result<T, TweenError>;

/// Unique identifier for a tween
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TweenId(pub Uuid);

impl TweenId {
    /// Create a new random tween ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TweenId {
    fn default() -> Self {
        Self::new()
    }
}

/// Lifecycle state of a tween
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TweenState {
    /// Waiting for the delay to elapse
    #[default]
    Delaying,
    /// Interpolating
    Running,
    /// Reached the end
    Completed,
    /// Cancelled before the end
    Cancelled,
}

impl TweenState {
    /// Whether the tween will never tick again
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// Start and end value of one property
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyRange {
    /// Value at progress 0
    pub start: f64,
    /// Value at progress 1
    pub end: f64,
}

impl PropertyRange {
    /// Value at eased progress `t`
    pub fn at(&self, t: f64) -> f64 {
        self.start + (self.end - self.start) * t
    }
}

type TickCallback = Box<dyn FnMut(&IndexMap<String, f64>, f64)>;

/// Builder for [`Tween`]
pub struct TweenBuilder {
    properties: IndexMap<String, PropertyRange>,
    duration: f64,
    delay: f64,
    easing: EasingFn,
    on_tick: Option<TickCallback>,
}

impl TweenBuilder {
    /// Animate `name` from `start` to `end`. A repeated name replaces the
    /// earlier range.
    pub fn property(mut self, name: impl Into<String>, start: f64, end: f64) -> Self {
        self.properties.insert(name.into(), PropertyRange { start, end });
        self
    }

    /// Wait `delay_ms` before interpolating
    pub fn with_delay(mut self, delay_ms: f64) -> Self {
        self.delay = delay_ms;
        self
    }

    /// Set the easing curve
    pub fn with_easing(mut self, easing: impl Into<EasingFn>) -> Self {
        self.easing = easing.into();
        self
    }

    /// Set the callback receiving eased values and raw progress each frame
    pub fn on_tick(mut self, on_tick: impl FnMut(&IndexMap<String, f64>, f64) + 'static) -> Self {
        self.on_tick = Some(Box::new(on_tick));
        self
    }

    /// Validate and create the tween
    pub fn build(self) -> Result<Tween> {
        if self.properties.is_empty() {
            return Err(TweenError::NoProperties);
        }
        if !self.duration.is_finite() {
            return Err(TweenError::InvalidDuration(self.duration));
        }
        if !(self.delay.is_finite() && self.delay >= 0.0) {
            return Err(TweenError::InvalidDelay(self.delay));
        }
        if let Some((name, _)) = self
            .properties
            .iter()
            .find(|(_, range)| !(range.start.is_finite() && range.end.is_finite()))
        {
            return Err(TweenError::InvalidRange(name.clone()));
        }

        let values = self
            .properties
            .iter()
            .map(|(name, range)| (name.clone(), range.start))
            .collect();
        let initial = if self.delay > 0.0 {
            TweenState::Delaying
        } else {
            TweenState::Running
        };

        Ok(Tween {
            id: TweenId::new(),
            properties: self.properties,
            values,
            duration: self.duration,
            delay: self.delay,
            easing: self.easing,
            on_tick: self.on_tick,
            elapsed: 0.0,
            state: Rc::new(Cell::new(initial)),
            completion: Completion::new(),
        })
    }
}

/// Time-bounded interpolation over named numeric properties
pub struct Tween {
    id: TweenId,
    properties: IndexMap<String, PropertyRange>,
    values: IndexMap<String, f64>,
    /// Milliseconds; non-positive completes on the first active tick
    duration: f64,
    delay: f64,
    easing: EasingFn,
    on_tick: Option<TickCallback>,
    elapsed: f64,
    state: Rc<Cell<TweenState>>,
    completion: Completion,
}

impl Tween {
    /// Start building a tween lasting `duration_ms`
    pub fn builder(duration_ms: f64) -> TweenBuilder {
        TweenBuilder {
            properties: IndexMap::new(),
            duration: duration_ms,
            delay: 0.0,
            easing: EasingFn::default(),
            on_tick: None,
        }
    }

    /// Tween ID
    pub fn id(&self) -> TweenId {
        self.id
    }

    /// Current state
    pub fn state(&self) -> TweenState {
        self.state.get()
    }

    /// Whether the tween will never tick again
    pub fn is_settled(&self) -> bool {
        self.state().is_settled()
    }

    /// Latest interpolated values
    pub fn values(&self) -> &IndexMap<String, f64> {
        &self.values
    }

    /// A handle to cancel or observe this tween after handing it off
    pub fn handle(&self) -> TweenHandle {
        TweenHandle {
            id: self.id,
            state: Rc::clone(&self.state),
            completion: self.completion.clone(),
        }
    }

    /// Cancel the tween
    pub fn cancel(&self) -> bool {
        cancel(self.id, &self.state, &self.completion)
    }

    /// Advance by `elapsed_ms`. Returns true if a frame was emitted.
    pub fn tick(&mut self, elapsed_ms: f64) -> bool {
        if self.is_settled() {
            return false;
        }

        self.elapsed += elapsed_ms;
        if self.elapsed < self.delay {
            return false;
        }
        if self.state() == TweenState::Delaying {
            tracing::debug!("Tween {:?} started", self.id);
            self.state.set(TweenState::Running);
        }

        let progress = if self.duration <= 0.0 {
            1.0
        } else {
            ((self.elapsed - self.delay) / self.duration).clamp(0.0, 1.0)
        };

        if progress >= 1.0 {
            // Land exactly on the end values whatever the curve gives at 1
            for (value, range) in self.values.values_mut().zip(self.properties.values()) {
                *value = range.end;
            }
        } else {
            let eased = self.easing.ease(progress);
            for (value, range) in self.values.values_mut().zip(self.properties.values()) {
                *value = range.at(eased);
            }
        }

        tracing::trace!("Tween {:?} progress {}", self.id, progress);
        if let Some(on_tick) = self.on_tick.as_mut() {
            on_tick(&self.values, progress);
        }

        // The callback may have cancelled us
        if progress >= 1.0 && self.state() == TweenState::Running {
            self.state.set(TweenState::Completed);
            tracing::debug!("Tween {:?} completed", self.id);
            self.completion.resolve(true);
        }
        true
    }
}

impl fmt::Debug for Tween {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tween")
            .field("id", &self.id)
            .field("state", &self.state())
            .field("properties", &self.properties)
            .field("duration", &self.duration)
            .field("delay", &self.delay)
            .field("easing", &self.easing)
            .field("elapsed", &self.elapsed)
            .finish_non_exhaustive()
    }
}

fn cancel(id: TweenId, state: &Cell<TweenState>, completion: &Completion) -> bool {
    if state.get().is_settled() {
        return false;
    }
    state.set(TweenState::Cancelled);
    tracing::debug!("Tween {:?} cancelled", id);
    completion.resolve(false);
    true
}

/// Cancel and observe a tween owned elsewhere
#[derive(Clone)]
pub struct TweenHandle {
    id: TweenId,
    state: Rc<Cell<TweenState>>,
    completion: Completion,
}

impl TweenHandle {
    /// Tween ID
    pub fn id(&self) -> TweenId {
        self.id
    }

    /// Current state
    pub fn state(&self) -> TweenState {
        self.state.get()
    }

    /// Cancel the tween. Returns false if it had already settled.
    pub fn cancel(&self) -> bool {
        cancel(self.id, &self.state, &self.completion)
    }

    /// `Some(true)` once completed, `Some(false)` once cancelled
    pub fn outcome(&self) -> Option<bool> {
        self.completion.outcome()
    }

    /// Register an observer for the outcome
    pub fn on_settled(&self, observer: impl FnOnce(bool) + 'static) {
        self.completion.on_settled(observer);
    }

    /// The outcome as an awaitable future
    pub fn completion(&self) -> Completion {
        self.completion.clone()
    }
}

impl fmt::Debug for TweenHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TweenHandle")
            .field("id", &self.id)
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use futures::FutureExt;
    use std::cell::RefCell;

    type Frames = Rc<RefCell<Vec<(f64, f64)>>>;

    fn recording(duration: f64) -> (TweenBuilder, Frames) {
        let frames: Frames = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&frames);
        let builder = Tween::builder(duration)
            .property("p", 0.0, 1.0)
            .on_tick(move |values, progress| sink.borrow_mut().push((values["p"], progress)));
        (builder, frames)
    }

    #[test]
    fn test_linear_midpoint() {
        let (builder, frames) = recording(1000.0);
        let mut tween = builder.with_easing(Easing::Linear).build().unwrap();

        tween.tick(250.0);
        tween.tick(250.0);

        let (value, progress) = *frames.borrow().last().unwrap();
        assert!((value - 0.5).abs() < 1e-6);
        assert_eq!(progress, 0.5);
        assert_eq!(tween.state(), TweenState::Running);
    }

    #[test]
    fn test_eased_values_raw_progress() {
        let (builder, frames) = recording(1000.0);
        let mut tween = builder.with_easing(Easing::OutQuad).build().unwrap();
        tween.tick(500.0);
        assert_eq!(frames.borrow()[0], (0.75, 0.5));
    }

    #[test]
    fn test_completion() {
        let (builder, frames) = recording(1000.0);
        let mut tween = builder.build().unwrap();
        let handle = tween.handle();

        for _ in 0..5 {
            tween.tick(300.0);
        }

        assert_eq!(handle.outcome(), Some(true));
        assert_eq!(tween.state(), TweenState::Completed);
        // The fifth tick found it settled
        assert_eq!(frames.borrow().len(), 4);
        assert_eq!(*frames.borrow().last().unwrap(), (1.0, 1.0));
        assert_eq!(handle.completion().now_or_never(), Some(true));
    }

    #[test]
    fn test_cancel_mid_way() {
        let (builder, frames) = recording(1000.0);
        let mut tween = builder.build().unwrap();
        let handle = tween.handle();

        tween.tick(500.0);
        assert!(handle.cancel());
        assert!(!handle.cancel());
        assert!(!tween.tick(500.0));
        assert!(!tween.tick(500.0));

        assert_eq!(handle.outcome(), Some(false));
        assert_eq!(handle.state(), TweenState::Cancelled);
        assert_eq!(frames.borrow().len(), 1);
    }

    #[test]
    fn test_cancel_after_completion_is_noop() {
        let (builder, _) = recording(100.0);
        let mut tween = builder.build().unwrap();
        tween.tick(100.0);
        assert!(!tween.cancel());
        assert_eq!(tween.state(), TweenState::Completed);
        assert_eq!(tween.handle().outcome(), Some(true));
    }

    #[test]
    fn test_zero_duration_completes_first_tick() {
        for duration in [0.0, -5.0] {
            let (builder, frames) = recording(duration);
            let mut tween = builder.build().unwrap();
            assert!(tween.tick(0.0));
            assert_eq!(tween.state(), TweenState::Completed);
            assert_eq!(*frames.borrow(), vec![(1.0, 1.0)]);
        }
    }

    #[test]
    fn test_delay() {
        let (builder, frames) = recording(100.0);
        let mut tween = builder.with_delay(200.0).build().unwrap();
        assert_eq!(tween.state(), TweenState::Delaying);

        assert!(!tween.tick(150.0));
        assert_eq!(tween.state(), TweenState::Delaying);
        assert!(frames.borrow().is_empty());

        assert!(tween.tick(100.0));
        assert_eq!(tween.state(), TweenState::Running);
        let (value, progress) = frames.borrow()[0];
        assert!((progress - 0.5).abs() < 1e-12);
        assert!((value - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_cancel_while_delaying() {
        let (builder, frames) = recording(100.0);
        let mut tween = builder.with_delay(200.0).build().unwrap();
        let handle = tween.handle();
        tween.tick(50.0);
        handle.cancel();
        tween.tick(500.0);
        assert!(frames.borrow().is_empty());
        assert_eq!(handle.outcome(), Some(false));
    }

    #[test]
    fn test_end_values_are_exact() {
        let mut tween = Tween::builder(100.0)
            .property("zoom", 10.0, 30.0)
            .with_easing(Easing::OutExpo)
            .build()
            .unwrap();
        tween.tick(50.0);
        assert!(tween.values()["zoom"] < 30.0);
        tween.tick(50.0);
        assert_eq!(tween.values()["zoom"], 30.0);
    }

    #[test]
    fn test_multiple_properties() {
        let mut tween = Tween::builder(1000.0)
            .property("yaw", 1.0, 3.0)
            .property("pitch", 0.0, -1.0)
            .property("yaw", 0.0, 2.0)
            .build()
            .unwrap();
        tween.tick(250.0);
        let values = tween.values();
        assert_eq!(values.len(), 2);
        assert_eq!(values["yaw"], 0.5);
        assert_eq!(values["pitch"], -0.25);
    }

    #[test]
    fn test_cancel_from_on_tick() {
        let slot: Rc<RefCell<Option<TweenHandle>>> = Rc::new(RefCell::new(None));
        let inner = Rc::clone(&slot);
        let mut tween = Tween::builder(100.0)
            .property("p", 0.0, 1.0)
            .on_tick(move |_, _| {
                if let Some(handle) = inner.borrow().as_ref() {
                    handle.cancel();
                }
            })
            .build()
            .unwrap();
        *slot.borrow_mut() = Some(tween.handle());

        assert!(tween.tick(200.0));
        assert_eq!(tween.state(), TweenState::Cancelled);
        assert_eq!(tween.handle().outcome(), Some(false));
    }

    #[test]
    fn test_validation() {
        assert_eq!(Tween::builder(100.0).build().unwrap_err(), TweenError::NoProperties);
        assert!(matches!(
            Tween::builder(f64::NAN).property("p", 0.0, 1.0).build(),
            Err(TweenError::InvalidDuration(_))
        ));
        for duration in [f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(
                Tween::builder(duration).property("p", 0.0, 1.0).build().unwrap_err(),
                TweenError::InvalidDuration(duration)
            );
        }
        assert_eq!(
            Tween::builder(100.0)
                .property("p", 0.0, 1.0)
                .with_delay(-1.0)
                .build()
                .unwrap_err(),
            TweenError::InvalidDelay(-1.0)
        );
        assert_eq!(
            Tween::builder(100.0)
                .property("p", 0.0, f64::INFINITY)
                .build()
                .unwrap_err(),
            TweenError::InvalidRange("p".to_string())
        );
    }

    #[test]
    fn test_custom_easing() {
        let mut tween = Tween::builder(100.0)
            .property("p", 0.0, 10.0)
            .with_easing(EasingFn::custom(|t| t * t * t))
            .build()
            .unwrap();
        tween.tick(50.0);
        assert_eq!(tween.values()["p"], 1.25);
    }
}
