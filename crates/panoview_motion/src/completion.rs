// SPDX-License-Identifier: MIT OR Apache-2.0
//! Single-resolution completion signal.
//!
//! A [`Completion`] settles exactly once with `true` (ran to the end) or
//! `false` (cancelled). There is no error channel. Observers can register
//! callbacks before or after settlement, or await it as a future.

use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

type Observer = Box<dyn FnOnce(bool)>;

#[derive(Default)]
struct CompletionInner {
    outcome: Option<bool>,
    observers: Vec<Observer>,
    wakers: Vec<Waker>,
}

/// Deferred completed-vs-cancelled result, shared between clones
#[derive(Clone, Default)]
pub struct Completion {
    inner: Rc<RefCell<CompletionInner>>,
}

impl Completion {
    /// Create an unsettled completion
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The outcome, once settled
    pub fn outcome(&self) -> Option<bool> {
        self.inner.borrow().outcome
    }

    /// Whether the outcome is known
    pub fn is_settled(&self) -> bool {
        self.outcome().is_some()
    }

    /// Register an observer. It runs once with the outcome, immediately if
    /// already settled.
    pub fn on_settled(&self, observer: impl FnOnce(bool) + 'static) {
        let settled = {
            let mut inner = self.inner.borrow_mut();
            if inner.outcome.is_none() {
                inner.observers.push(Box::new(observer));
                return;
            }
            inner.outcome
        };
        if let Some(outcome) = settled {
            observer(outcome);
        }
    }

    /// Settle with `outcome`. Returns false if it was already settled.
    pub(crate) fn resolve(&self, outcome: bool) -> bool {
        let (observers, wakers) = {
            let mut inner = self.inner.borrow_mut();
            if inner.outcome.is_some() {
                return false;
            }
            inner.outcome = Some(outcome);
            (
                std::mem::take(&mut inner.observers),
                std::mem::take(&mut inner.wakers),
            )
        };

        // Observers may register more observers or spawn tweens
        for observer in observers {
            observer(outcome);
        }
        for waker in wakers {
            waker.wake();
        }
        true
    }
}

impl Future for Completion {
    type Output = bool;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<bool> {
        let mut inner = self.inner.borrow_mut();
        match inner.outcome {
            Some(outcome) => Poll::Ready(outcome),
            None => {
                if !inner.wakers.iter().any(|w| w.will_wake(cx.waker())) {
                    inner.wakers.push(cx.waker().clone());
                }
                Poll::Pending
            }
        }
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Completion")
            .field("outcome", &inner.outcome)
            .field("observers", &inner.observers.len())
            .finish()
    }
}
