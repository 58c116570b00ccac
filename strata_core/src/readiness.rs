// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deadline-bounded waits on a controller's readiness signal.
//!
//! A [`ReadinessWait`] is a one-shot wait with two exits, raced in a fixed
//! order on every [`poll`](ReadinessWait::poll):
//!
//! 1. the controller reports [`Readiness::Ready`] → [`ReadinessOutcome::Ready`];
//! 2. the deadline has passed → [`ReadinessOutcome::TimedOut`].
//!
//! Both outcomes mean "go ahead": a controller that never becomes ready is
//! attached anyway once its deadline passes, so a misbehaving controller can
//! delay the overlay stack but never wedge it.
//!
//! A wait may also be torn down before either exit by dropping it. Whatever
//! the exit, dropping the wait releases its interaction block (if any) and
//! then runs its completion, each exactly once.

use alloc::boxed::Box;
use core::fmt;

use crate::controller::{ControllerRef, Readiness};
use crate::interaction::InteractionBlockGuard;
use crate::time::{Duration, HostTime};

/// Callback run once a presentation request has settled.
pub type Completion = Box<dyn FnOnce()>;

/// How a readiness wait resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReadinessOutcome {
    /// The controller reported ready before the deadline.
    Ready,
    /// The deadline passed first; the controller is treated as ready.
    TimedOut,
}

/// A pending wait for one controller to become ready.
pub struct ReadinessWait {
    controller: ControllerRef,
    started: HostTime,
    deadline: HostTime,
    block: Option<InteractionBlockGuard>,
    completion: Option<Completion>,
}

impl ReadinessWait {
    /// Starts waiting at `started` for at most `timeout`.
    #[must_use]
    pub fn new(controller: ControllerRef, started: HostTime, timeout: Duration) -> Self {
        Self {
            controller,
            started,
            deadline: started.saturating_add(timeout),
            block: None,
            completion: None,
        }
    }

    /// Holds `guard` until the wait resolves or is torn down.
    #[must_use]
    pub fn with_block(mut self, guard: Option<InteractionBlockGuard>) -> Self {
        self.block = guard;
        self
    }

    /// Runs `completion` when the wait is torn down.
    #[must_use]
    pub fn with_completion(mut self, completion: Option<Completion>) -> Self {
        self.completion = completion;
        self
    }

    /// The controller being waited on.
    #[must_use]
    pub fn controller(&self) -> &ControllerRef {
        &self.controller
    }

    /// When the wait started.
    #[must_use]
    pub fn started(&self) -> HostTime {
        self.started
    }

    /// When the wait gives up and resolves as [`ReadinessOutcome::TimedOut`].
    #[must_use]
    pub fn deadline(&self) -> HostTime {
        self.deadline
    }

    /// Whether this wait currently blocks interaction.
    #[must_use]
    pub fn is_blocking(&self) -> bool {
        self.block.is_some()
    }

    /// Checks both exits. Readiness wins over an expired deadline observed in
    /// the same poll.
    #[must_use]
    pub fn poll(&self, now: HostTime) -> Option<ReadinessOutcome> {
        if self.controller.readiness() == Readiness::Ready {
            Some(ReadinessOutcome::Ready)
        } else if now >= self.deadline {
            Some(ReadinessOutcome::TimedOut)
        } else {
            None
        }
    }

    /// Releases the interaction block early, before the wait is dropped.
    pub fn release_block(&mut self) {
        self.block = None;
    }
}

impl Drop for ReadinessWait {
    fn drop(&mut self) {
        self.block = None;
        if let Some(completion) = self.completion.take() {
            completion();
        }
    }
}

impl fmt::Debug for ReadinessWait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadinessWait")
            .field("view", &self.controller.view())
            .field("started", &self.started)
            .field("deadline", &self.deadline)
            .field("block", &self.block)
            .field("has_completion", &self.completion.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::{Cell, RefCell};

    use kurbo::{Point, Rect};

    use super::*;
    use crate::controller::{DismissHandle, HostedController, ViewId};
    use crate::interaction::InteractionBlocker;
    use crate::layout::{ContainerLayout, LayoutTransition};

    struct Signal(Cell<Readiness>);

    impl HostedController for Signal {
        fn view(&self) -> ViewId {
            ViewId(1)
        }
        fn readiness(&self) -> Readiness {
            self.0.get()
        }
        fn set_frame(&self, _: Rect) {}
        fn bounds(&self) -> Rect {
            Rect::ZERO
        }
        fn container_layout_updated(&self, _: &ContainerLayout, _: LayoutTransition) {}
        fn hit_test(&self, _: Point) -> Option<ViewId> {
            None
        }
        fn set_dismiss_handle(&self, _: DismissHandle) {}
    }

    const TIMEOUT: Duration = Duration(2_000);

    #[test]
    fn ready_value_resolves_before_deadline() {
        let signal = Rc::new(Signal(Cell::new(Readiness::Pending)));
        let wait = ReadinessWait::new(signal.clone(), HostTime(100), TIMEOUT);
        assert_eq!(wait.poll(HostTime(500)), None);

        signal.0.set(Readiness::NotReady);
        assert_eq!(wait.poll(HostTime(600)), None, "not-ready is filtered out");

        signal.0.set(Readiness::Ready);
        assert_eq!(wait.poll(HostTime(700)), Some(ReadinessOutcome::Ready));
    }

    #[test]
    fn deadline_is_inclusive() {
        let signal = Rc::new(Signal(Cell::new(Readiness::Pending)));
        let wait = ReadinessWait::new(signal, HostTime(100), TIMEOUT);
        assert_eq!(wait.deadline(), HostTime(2_100));
        assert_eq!(wait.poll(HostTime(2_099)), None);
        assert_eq!(wait.poll(HostTime(2_100)), Some(ReadinessOutcome::TimedOut));
    }

    #[test]
    fn teardown_releases_block_then_completes() {
        let blocker = InteractionBlocker::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        let log = order.clone();
        blocker.set_handler(move |blocked| log.borrow_mut().push(if blocked { "block" } else { "unblock" }));

        let log = order.clone();
        let signal = Rc::new(Signal(Cell::new(Readiness::Pending)));
        let wait = ReadinessWait::new(signal, HostTime(0), TIMEOUT)
            .with_block(Some(blocker.acquire()))
            .with_completion(Some(Box::new(move || log.borrow_mut().push("complete"))));
        assert!(wait.is_blocking());

        drop(wait);
        assert!(!blocker.is_blocked());
        assert_eq!(*order.borrow(), vec!["block", "unblock", "complete"]);
    }
}
