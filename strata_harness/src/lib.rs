// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted doubles for driving a presentation stack without a real UI
//! toolkit.
//!
//! - [`ScriptedController`] implements
//!   [`HostedController`](strata_core::controller::HostedController) with
//!   settable readiness, geometry and capabilities, and records every call
//!   the context makes into a shared [`CallLog`].
//! - [`RecordingHostView`] keeps an ordered subview list (bottom to top) and
//!   records insertions and removals into the same log, so tests can assert on
//!   the interleaving of host and controller calls.
//! - [`ReadinessScript`] replays a readiness timeline against a controller.
//! - [`FrameClock`] produces evenly spaced host times for simulated frame
//!   loops.

#![no_std]

extern crate alloc;

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use kurbo::{Point, Rect, Size};
use strata_core::controller::{DismissHandle, HostView, HostedController, Readiness, ViewId};
use strata_core::layout::{ContainerLayout, LayoutTransition};
use strata_core::orientation::{ScreenEdges, SupportedOrientations};
use strata_core::time::{Duration, HostTime};

/// One observed call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Call {
    /// `set_frame`.
    Frame(Rect),
    /// `container_layout_updated`.
    Layout {
        /// Size of the delivered layout.
        size: Size,
        /// Whether the transition animated.
        animated: bool,
    },
    /// `set_ignores_appearance_calls`.
    IgnoreAppearance(bool),
    /// `view_will_appear`.
    WillAppear,
    /// `view_did_appear`.
    DidAppear,
    /// `view_will_disappear`.
    WillDisappear,
    /// `view_did_disappear`.
    DidDisappear,
    /// `set_supported_orientations`.
    Orientations(SupportedOrientations),
    /// `set_dismiss_handle`.
    DismissHandleInstalled,
    /// The host view inserted this view, below `below` or on top.
    Inserted {
        /// Sibling the view went below.
        below: Option<ViewId>,
    },
    /// The host view removed this view.
    Removed,
}

/// Shared, ordered record of calls keyed by view.
#[derive(Clone, Debug, Default)]
pub struct CallLog(Rc<RefCell<Vec<(ViewId, Call)>>>);

impl CallLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a call.
    pub fn record(&self, view: ViewId, call: Call) {
        self.0.borrow_mut().push((view, call));
    }

    /// Every recorded call, in order.
    #[must_use]
    pub fn entries(&self) -> Vec<(ViewId, Call)> {
        self.0.borrow().clone()
    }

    /// Calls recorded for `view`, in order.
    #[must_use]
    pub fn calls_for(&self, view: ViewId) -> Vec<Call> {
        self.0
            .borrow()
            .iter()
            .filter(|(v, _)| *v == view)
            .map(|(_, c)| *c)
            .collect()
    }

    /// Views in the order they received `call`.
    #[must_use]
    pub fn views_with(&self, call: Call) -> Vec<ViewId> {
        self.0
            .borrow()
            .iter()
            .filter(|(_, c)| *c == call)
            .map(|(v, _)| *v)
            .collect()
    }

    /// Forgets everything recorded so far.
    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

/// A controller whose signals and capabilities are set by the test.
#[derive(Debug)]
pub struct ScriptedController {
    view: ViewId,
    log: CallLog,
    readiness: Cell<Readiness>,
    loaded: Cell<bool>,
    frame: Cell<Rect>,
    bounds: Cell<Option<Rect>>,
    hit_region: Cell<Option<Rect>>,
    locks_orientation: Cell<bool>,
    orientations: Cell<SupportedOrientations>,
    deferred_edges: Cell<ScreenEdges>,
    opaque: Cell<bool>,
    dismiss: RefCell<Option<DismissHandle>>,
}

impl ScriptedController {
    /// A loaded controller that is not yet ready.
    #[must_use]
    pub fn new(view: ViewId, log: &CallLog) -> Self {
        Self {
            view,
            log: log.clone(),
            readiness: Cell::new(Readiness::Pending),
            loaded: Cell::new(true),
            frame: Cell::new(Rect::ZERO),
            bounds: Cell::new(None),
            hit_region: Cell::new(None),
            locks_orientation: Cell::new(false),
            orientations: Cell::new(SupportedOrientations::ALL),
            deferred_edges: Cell::new(ScreenEdges::empty()),
            opaque: Cell::new(false),
            dismiss: RefCell::new(None),
        }
    }

    /// Starts out ready.
    #[must_use]
    pub fn ready(self) -> Self {
        self.readiness.set(Readiness::Ready);
        self
    }

    /// Claims hits inside `region`.
    #[must_use]
    pub fn with_hit_region(self, region: Rect) -> Self {
        self.hit_region.set(Some(region));
        self
    }

    /// Pins orientation when presented.
    #[must_use]
    pub fn locking_orientation(self) -> Self {
        self.locks_orientation.set(true);
        self
    }

    /// Reports `orientations` as supported.
    #[must_use]
    pub fn with_orientations(self, orientations: SupportedOrientations) -> Self {
        self.orientations.set(orientations);
        self
    }

    /// Asks for `edges` to be deferred.
    #[must_use]
    pub fn with_deferred_edges(self, edges: ScreenEdges) -> Self {
        self.deferred_edges.set(edges);
        self
    }

    /// Declares itself opaque in overlays.
    #[must_use]
    pub fn opaque(self) -> Self {
        self.opaque.set(true);
        self
    }

    /// Wraps the controller for presentation.
    #[must_use]
    pub fn into_rc(self) -> Rc<Self> {
        Rc::new(self)
    }

    /// Changes the readiness signal.
    pub fn set_readiness(&self, readiness: Readiness) {
        self.readiness.set(readiness);
    }

    /// Marks the root view loaded or unloaded.
    pub fn set_loaded(&self, loaded: bool) {
        self.loaded.set(loaded);
    }

    /// Overrides the reported bounds. Defaults to the frame's size.
    pub fn set_bounds(&self, bounds: Rect) {
        self.bounds.set(Some(bounds));
    }

    /// The frame last set by the context.
    #[must_use]
    pub fn frame(&self) -> Rect {
        self.frame.get()
    }

    /// Whether the context has installed a dismiss handle.
    #[must_use]
    pub fn has_dismiss_handle(&self) -> bool {
        self.dismiss.borrow().is_some()
    }

    /// Requests dismissal through the installed handle.
    ///
    /// Returns `false` if no handle was installed or its context is gone.
    pub fn request_dismiss(&self) -> bool {
        self.dismiss
            .borrow()
            .as_ref()
            .is_some_and(DismissHandle::request_dismiss)
    }
}

impl HostedController for ScriptedController {
    fn view(&self) -> ViewId {
        self.view
    }

    fn readiness(&self) -> Readiness {
        self.readiness.get()
    }

    fn is_view_loaded(&self) -> bool {
        self.loaded.get()
    }

    fn set_frame(&self, frame: Rect) {
        self.frame.set(frame);
        self.log.record(self.view, Call::Frame(frame));
    }

    fn bounds(&self) -> Rect {
        self.bounds
            .get()
            .unwrap_or_else(|| self.frame.get().with_origin(Point::ORIGIN))
    }

    fn container_layout_updated(&self, layout: &ContainerLayout, transition: LayoutTransition) {
        self.log.record(
            self.view,
            Call::Layout {
                size: layout.size,
                animated: transition.is_animated(),
            },
        );
    }

    fn view_will_appear(&self, _: bool) {
        self.log.record(self.view, Call::WillAppear);
    }

    fn view_did_appear(&self, _: bool) {
        self.log.record(self.view, Call::DidAppear);
    }

    fn view_will_disappear(&self, _: bool) {
        self.log.record(self.view, Call::WillDisappear);
    }

    fn view_did_disappear(&self, _: bool) {
        self.log.record(self.view, Call::DidDisappear);
    }

    fn set_ignores_appearance_calls(&self, ignore: bool) {
        self.log.record(self.view, Call::IgnoreAppearance(ignore));
    }

    fn locks_orientation(&self) -> bool {
        self.locks_orientation.get()
    }

    fn supported_orientations(&self) -> SupportedOrientations {
        self.orientations.get()
    }

    fn set_supported_orientations(&self, orientations: SupportedOrientations) {
        self.orientations.set(orientations);
        self.log.record(self.view, Call::Orientations(orientations));
    }

    fn deferred_screen_edge_gestures(&self) -> ScreenEdges {
        self.deferred_edges.get()
    }

    fn is_opaque_when_in_overlay(&self) -> bool {
        self.opaque.get()
    }

    fn hit_test(&self, point: Point) -> Option<ViewId> {
        self.hit_region
            .get()
            .filter(|region| region.contains(point))
            .map(|_| self.view)
    }

    fn set_dismiss_handle(&self, handle: DismissHandle) {
        *self.dismiss.borrow_mut() = Some(handle);
        self.log.record(self.view, Call::DismissHandleInstalled);
    }
}

/// A host view that keeps its subviews as an ordered list.
#[derive(Debug, Default)]
pub struct RecordingHostView {
    subviews: Vec<ViewId>,
    invalidations: usize,
    log: Option<CallLog>,
}

impl RecordingHostView {
    /// An empty host view that does not log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty host view that records insertions and removals into `log`.
    #[must_use]
    pub fn logging(log: &CallLog) -> Self {
        Self {
            log: Some(log.clone()),
            ..Self::default()
        }
    }

    /// Pre-populates a subview that isn't a hosted controller, such as a
    /// status bar.
    #[must_use]
    pub fn with_subview(mut self, view: ViewId) -> Self {
        self.subviews.push(view);
        self
    }

    /// Subviews from bottom to top.
    #[must_use]
    pub fn subviews(&self) -> &[ViewId] {
        &self.subviews
    }

    /// Number of `invalidate` calls.
    #[must_use]
    pub fn invalidations(&self) -> usize {
        self.invalidations
    }

    fn record(&self, view: ViewId, call: Call) {
        if let Some(log) = &self.log {
            log.record(view, call);
        }
    }
}

impl HostView for RecordingHostView {
    fn add_subview(&mut self, view: ViewId) {
        self.subviews.retain(|v| *v != view);
        self.subviews.push(view);
        self.record(view, Call::Inserted { below: None });
    }

    fn insert_subview_below(&mut self, view: ViewId, sibling: ViewId) {
        self.subviews.retain(|v| *v != view);
        let index = self
            .subviews
            .iter()
            .position(|v| *v == sibling)
            .unwrap_or(self.subviews.len());
        self.subviews.insert(index, view);
        self.record(
            view,
            Call::Inserted {
                below: Some(sibling),
            },
        );
    }

    fn remove_subview(&mut self, view: ViewId) {
        self.subviews.retain(|v| *v != view);
        self.record(view, Call::Removed);
    }

    fn invalidate(&mut self) {
        self.invalidations += 1;
    }
}

/// A readiness timeline: at each listed time the signal switches to the
/// listed value.
#[derive(Clone, Debug, Default)]
pub struct ReadinessScript {
    steps: Vec<(HostTime, Readiness)>,
}

impl ReadinessScript {
    /// An empty script; applying it leaves the signal alone.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a step. Steps may be added in any order.
    #[must_use]
    pub fn at(mut self, time: HostTime, readiness: Readiness) -> Self {
        let index = self.steps.partition_point(|(t, _)| *t <= time);
        self.steps.insert(index, (time, readiness));
        self
    }

    /// The value the script dictates at `now`, if any step has been reached.
    #[must_use]
    pub fn value_at(&self, now: HostTime) -> Option<Readiness> {
        self.steps
            .iter()
            .take_while(|(t, _)| *t <= now)
            .last()
            .map(|(_, r)| *r)
    }

    /// Applies the value for `now` to `controller`.
    pub fn apply(&self, controller: &ScriptedController, now: HostTime) {
        if let Some(readiness) = self.value_at(now) {
            controller.set_readiness(readiness);
        }
    }
}

/// Evenly spaced host times for simulated frame loops.
#[derive(Clone, Copy, Debug)]
pub struct FrameClock {
    now: HostTime,
    interval: Duration,
}

impl FrameClock {
    /// A clock at `start` that advances by `interval` per frame.
    #[must_use]
    pub const fn new(start: HostTime, interval: Duration) -> Self {
        Self {
            now: start,
            interval,
        }
    }

    /// The current time.
    #[must_use]
    pub const fn now(&self) -> HostTime {
        self.now
    }

    /// Advances one frame and returns the new time.
    pub fn tick(&mut self) -> HostTime {
        self.now = self.now.saturating_add(self.interval);
        self.now
    }

    /// Jumps to `time` if it is later than the current time.
    pub fn advance_to(&mut self, time: HostTime) {
        if time > self.now {
            self.now = time;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_picks_latest_reached_step() {
        let script = ReadinessScript::new()
            .at(HostTime(300), Readiness::Ready)
            .at(HostTime(100), Readiness::NotReady);
        assert_eq!(script.value_at(HostTime(50)), None);
        assert_eq!(script.value_at(HostTime(100)), Some(Readiness::NotReady));
        assert_eq!(script.value_at(HostTime(299)), Some(Readiness::NotReady));
        assert_eq!(script.value_at(HostTime(300)), Some(Readiness::Ready));
    }

    #[test]
    fn host_view_orders_subviews() {
        let mut host = RecordingHostView::new().with_subview(ViewId(100));
        host.add_subview(ViewId(1));
        host.insert_subview_below(ViewId(2), ViewId(100));
        host.insert_subview_below(ViewId(3), ViewId(100));
        assert_eq!(host.subviews(), &[ViewId(2), ViewId(3), ViewId(100), ViewId(1)]);
        host.remove_subview(ViewId(3));
        assert_eq!(host.subviews(), &[ViewId(2), ViewId(100), ViewId(1)]);
    }

    #[test]
    fn controller_hit_region() {
        let log = CallLog::new();
        let c = ScriptedController::new(ViewId(5), &log)
            .with_hit_region(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(c.hit_test(Point::new(5.0, 5.0)), Some(ViewId(5)));
        assert_eq!(c.hit_test(Point::new(15.0, 5.0)), None);
    }

    #[test]
    fn frame_clock_ticks() {
        let mut clock = FrameClock::new(HostTime(0), Duration(16));
        assert_eq!(clock.tick(), HostTime(16));
        clock.advance_to(HostTime(10));
        assert_eq!(clock.now(), HostTime(16));
        clock.advance_to(HostTime(40));
        assert_eq!(clock.tick(), HostTime(56));
    }
}
