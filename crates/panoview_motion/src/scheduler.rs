// SPDX-License-Identifier: MIT OR Apache-2.0
//! Frame-driven tween registry.
//!
//! Tweens handed to the scheduler are queued and join the active set at the
//! start of the next [`TweenScheduler::tick`]. A tween spawned from inside a
//! callback during a tick therefore only starts moving on the following
//! frame, which keeps a single frame pass free of re-entrant ticks.

use crate::tween::{Tween, TweenHandle};
use std::cell::RefCell;
use std::rc::Rc;

type SpawnQueue = Rc<RefCell<Vec<Tween>>>;

/// Queues tweens into a [`TweenScheduler`]; usable from inside callbacks
#[derive(Clone, Default)]
pub struct TweenSpawner {
    queue: SpawnQueue,
}

impl TweenSpawner {
    /// Queue a tween for the next tick
    pub fn spawn(&self, tween: Tween) -> TweenHandle {
        let handle = tween.handle();
        tracing::debug!("Tween {:?} queued", tween.id());
        self.queue.borrow_mut().push(tween);
        handle
    }
}

/// Owns running tweens and ticks them once per frame
#[derive(Default)]
pub struct TweenScheduler {
    active: Vec<Tween>,
    spawner: TweenSpawner,
}

impl TweenScheduler {
    /// Create an empty scheduler
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for queueing tweens from callbacks
    pub fn spawner(&self) -> TweenSpawner {
        self.spawner.clone()
    }

    /// Queue a tween for the next tick
    pub fn spawn(&self, tween: Tween) -> TweenHandle {
        self.spawner.spawn(tween)
    }

    /// Number of tweens currently ticking
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Number of tweens waiting for the next tick
    pub fn queued_count(&self) -> usize {
        self.spawner.queue.borrow().len()
    }

    /// Whether nothing is running or queued
    pub fn is_idle(&self) -> bool {
        self.active.is_empty() && self.queued_count() == 0
    }

    /// Cancel every running and queued tween
    pub fn cancel_all(&mut self) {
        let queued = std::mem::take(&mut *self.spawner.queue.borrow_mut());
        for tween in self.active.drain(..).chain(queued) {
            tween.cancel();
        }
    }

    /// Advance all tweens by `elapsed_ms`.
    /// Returns true if any tween emitted a frame.
    pub fn tick(&mut self, elapsed_ms: f64) -> bool {
        let queued = std::mem::take(&mut *self.spawner.queue.borrow_mut());
        self.active.extend(queued);

        let mut changed = false;
        for tween in &mut self.active {
            changed |= tween.tick(elapsed_ms);
        }

        let before = self.active.len();
        self.active.retain(|tween| !tween.is_settled());
        if self.active.len() != before {
            tracing::debug!(
                "Dropped {} settled tweens, {} remaining",
                before - self.active.len(),
                self.active.len()
            );
        }
        changed
    }
}

impl std::fmt::Debug for TweenScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TweenScheduler")
            .field("active", &self.active.len())
            .field("queued", &self.queued_count())
            .finish()
    }
}
