// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The overlay presentation stack.
//!
//! A [`PresentationContext`] keeps an ordered stack of hosted controllers
//! above a host view and keeps their attached state, frames, and layouts in
//! step with a single cached [`ContainerLayout`].
//!
//! # Readiness
//!
//! The context is *ready* iff it has both a host view and a layout. Readiness
//! is edge-triggered:
//!
//! - not ready → ready attaches every hosted controller in stack order
//!   (`view_will_appear`, insert, frame, layout, `view_did_appear`);
//! - ready → not ready detaches every attached controller
//!   (`view_will_disappear`, remove, `view_did_disappear`). Controllers stay
//!   in the stack and come back on the next edge.
//!
//! # Ordering
//!
//! Controllers presented while ready first wait for their own readiness
//! signal (bounded by [`PresentationConfig::readiness_timeout`]). When the
//! wait resolves, the controller goes before the first entry whose
//! [`SurfaceLevel`] is strictly greater, so equal levels keep arrival order and
//! attach order follows resolution order.
//!
//! Controllers presented while not ready are appended as they arrive and
//! attached bottom to top, in stack order, on the next readiness edge.
//!
//! # Driving the context
//!
//! Everything happens on the owner's thread. The host calls
//! [`poll`](PresentationContext::poll) from its frame or timer callback to
//! resolve pending readiness waits and apply dismiss requests that
//! controllers queued through their [`DismissHandle`].
//!
//! ```rust,ignore
//! let mut context = PresentationContext::new(PresentationConfig::new(timebase));
//! context.set_view(Some(window_view));
//! context.container_layout_updated(layout, LayoutTransition::Immediate);
//!
//! context.present(alert, SurfaceLevel::ROOT, PresentOptions::new().blocking(), now());
//!
//! fn on_frame(now: HostTime) {
//!     context.poll(now);
//! }
//! ```

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use kurbo::{Point, Rect};

use crate::controller::{
    ControllerRef, DismissHandle, DismissQueue, HostView, ViewId, same_controller,
};
use crate::interaction::InteractionBlocker;
use crate::layout::{ContainerLayout, LayoutTransition};
use crate::level::SurfaceLevel;
use crate::orientation::{ScreenEdges, SupportedOrientations};
use crate::readiness::{Completion, ReadinessOutcome, ReadinessWait};
use crate::time::{Duration, HostTime, Timebase};
use crate::trace::{
    AttachEvent, AttachKind, DetachEvent, DetachReason, LayoutEvent, NoopSink, PresentEvent,
    ReadinessEvent, ReadyChangedEvent, TraceSink, Tracer,
};

/// Configuration for a [`PresentationContext`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PresentationConfig {
    /// How long a presented controller may take to report ready before it is
    /// attached anyway.
    pub readiness_timeout: Duration,
}

impl PresentationConfig {
    /// Default readiness timeout, in milliseconds.
    pub const DEFAULT_READINESS_TIMEOUT_MS: u64 = 2_000;

    /// Default configuration for a host whose ticks follow `timebase`.
    #[must_use]
    pub const fn new(timebase: Timebase) -> Self {
        Self {
            readiness_timeout: Duration::from_millis(Self::DEFAULT_READINESS_TIMEOUT_MS, timebase),
        }
    }

    /// Configuration with an explicit readiness timeout.
    #[must_use]
    pub const fn with_timeout(readiness_timeout: Duration) -> Self {
        Self { readiness_timeout }
    }
}

/// Per-call options for [`PresentationContext::present`].
#[derive(Default)]
pub struct PresentOptions {
    /// Block interaction on the host until the controller's readiness wait
    /// ends.
    pub block_interaction: bool,
    /// Runs once the request has settled.
    pub completion: Option<Completion>,
}

impl PresentOptions {
    /// Non-blocking, no completion.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks interaction while waiting for readiness.
    #[must_use]
    pub fn blocking(mut self) -> Self {
        self.block_interaction = true;
        self
    }

    /// Runs `completion` once the request has settled.
    #[must_use]
    pub fn on_complete(mut self, completion: impl FnOnce() + 'static) -> Self {
        self.completion = Some(Box::new(completion));
        self
    }
}

impl fmt::Debug for PresentOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresentOptions")
            .field("block_interaction", &self.block_interaction)
            .field("has_completion", &self.completion.is_some())
            .finish()
    }
}

struct HostedEntry {
    controller: ControllerRef,
    level: SurfaceLevel,
    attached: bool,
    /// Completion of a request queued while the context was not ready.
    completion: Option<Completion>,
}

struct PendingPresentation {
    wait: ReadinessWait,
    level: SurfaceLevel,
    /// Layout delivered when the request was made.
    initial_layout: ContainerLayout,
}

type OpacityTest = Box<dyn Fn(ViewId, Rect) -> bool>;

/// A stack of overlay controllers hosted above a host view.
///
/// `V` is the host view type; `S` receives trace events.
pub struct PresentationContext<V, S = NoopSink> {
    config: PresentationConfig,
    view: Option<V>,
    layout: Option<ContainerLayout>,
    top_level_subview: Option<ViewId>,
    entries: Vec<HostedEntry>,
    pending: Vec<PendingPresentation>,
    blocker: InteractionBlocker,
    dismiss_requests: DismissQueue,
    opacity_test: Option<OpacityTest>,
    sink: S,
}

impl<V: HostView> PresentationContext<V> {
    /// Creates an empty, not-ready context.
    #[must_use]
    pub fn new(config: PresentationConfig) -> Self {
        Self::with_sink(config, NoopSink)
    }
}

impl<V: HostView, S: TraceSink> PresentationContext<V, S> {
    /// Creates an empty, not-ready context that reports to `sink`.
    #[must_use]
    pub fn with_sink(config: PresentationConfig, sink: S) -> Self {
        Self {
            config,
            view: None,
            layout: None,
            top_level_subview: None,
            entries: Vec::new(),
            pending: Vec::new(),
            blocker: InteractionBlocker::new(),
            dismiss_requests: Rc::new(RefCell::new(Vec::new())),
            opacity_test: None,
            sink,
        }
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &PresentationConfig {
        &self.config
    }

    /// The trace sink.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// The trace sink, mutably.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consumes the context and returns the trace sink.
    ///
    /// Pending readiness waits are torn down: their interaction blocks are
    /// released and their completions run.
    #[must_use]
    pub fn into_sink(self) -> S {
        self.sink
    }

    // -- Host surface ------------------------------------------------------

    /// Whether both a host view and a layout are present.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.view.is_some() && self.layout.is_some()
    }

    /// The host view, if set.
    #[must_use]
    pub fn view(&self) -> Option<&V> {
        self.view.as_ref()
    }

    /// The host view, mutably.
    pub fn view_mut(&mut self) -> Option<&mut V> {
        self.view.as_mut()
    }

    /// The cached layout, if any.
    #[must_use]
    pub fn layout(&self) -> Option<&ContainerLayout> {
        self.layout.as_ref()
    }

    /// Supplies or clears the host view.
    ///
    /// Crossing a readiness edge attaches or detaches the whole stack.
    /// Replacing one view with another while ready is not an edge: attached
    /// views are moved to the new host in stack order and no appearance
    /// callbacks run.
    pub fn set_view(&mut self, view: Option<V>) {
        let was_ready = self.is_ready();
        let old = core::mem::replace(&mut self.view, view);
        let is_ready = self.is_ready();

        if was_ready
            && let Some(mut old) = old
        {
            match self.view.as_mut() {
                Some(new) if is_ready => {
                    move_attached(&self.entries, &mut old, new, self.top_level_subview);
                }
                _ => detach_all(
                    &mut self.entries,
                    &mut old,
                    &mut self.sink,
                    DetachReason::HostUnavailable,
                ),
            }
        }
        if was_ready != is_ready {
            Tracer::new(&mut self.sink).ready_changed(&ReadyChangedEvent {
                ready: is_ready,
                hosted: self.entries.len(),
            });
            if is_ready {
                self.attach_all();
            }
        }
    }

    /// Sets the host view that overlays are kept below (e.g. a status bar).
    pub fn set_top_level_subview(&mut self, view: Option<ViewId>) {
        self.top_level_subview = view;
    }

    /// The host view overlays are kept below, if any.
    #[must_use]
    pub fn top_level_subview(&self) -> Option<ViewId> {
        self.top_level_subview
    }

    /// Installs the handler told when interaction becomes blocked (`true`)
    /// or unblocked (`false`). Only transitions are reported.
    pub fn set_interaction_blocked_handler(&self, handler: impl FnMut(bool) + 'static) {
        self.blocker.set_handler(handler);
    }

    /// Whether any pending presentation is blocking interaction.
    #[must_use]
    pub fn is_interaction_blocked(&self) -> bool {
        self.blocker.is_blocked()
    }

    /// Installs the host's opacity test, used by
    /// [`is_currently_opaque`](Self::is_currently_opaque). It receives a
    /// controller's root view and bounds.
    pub fn set_opacity_test(&mut self, test: impl Fn(ViewId, Rect) -> bool + 'static) {
        self.opacity_test = Some(Box::new(test));
    }

    /// Applies a new container layout.
    ///
    /// The first layout while a view is present makes the context ready and
    /// attaches the stack. Later layouts are propagated to every hosted
    /// controller in stack order.
    pub fn container_layout_updated(&mut self, layout: ContainerLayout, transition: LayoutTransition) {
        let was_ready = self.is_ready();
        self.layout = Some(layout);

        if !was_ready && self.is_ready() {
            Tracer::new(&mut self.sink).ready_changed(&ReadyChangedEvent {
                ready: true,
                hosted: self.entries.len(),
            });
            self.attach_all();
        } else if self.is_ready() {
            for entry in &self.entries {
                entry.controller.container_layout_updated(&layout, transition);
            }
            Tracer::new(&mut self.sink).layout(&LayoutEvent {
                size: layout.size,
                propagated: self.entries.len(),
                animated: transition.is_animated(),
            });
        }
    }

    // -- Presentation ------------------------------------------------------

    /// Presents `controller` on `level`.
    ///
    /// If the context is ready, the controller is laid out immediately and
    /// attached once its readiness signal reports ready or the readiness
    /// timeout passes, whichever comes first. A controller that is already
    /// ready is attached before this call returns. With
    /// [`PresentOptions::block_interaction`], interaction stays blocked until
    /// the wait ends.
    ///
    /// If the context is not ready, the controller is queued and attached with
    /// the rest of the stack when the context becomes ready.
    ///
    /// Presenting a controller that is already in the stack is a no-op.
    pub fn present(
        &mut self,
        controller: ControllerRef,
        level: SurfaceLevel,
        options: PresentOptions,
        now: HostTime,
    ) {
        let view = controller.view();
        let layout = match (&self.view, self.layout) {
            (Some(_), Some(layout)) => layout,
            _ => {
                Tracer::new(&mut self.sink).present(&PresentEvent {
                    view,
                    level,
                    deferred: true,
                    blocking: false,
                    at: now,
                });
                self.enqueue(controller, level, options.completion);
                return;
            }
        };

        if controller.locks_orientation() {
            controller.set_supported_orientations(SupportedOrientations::uniform(
                layout.matching_orientations(),
            ));
        }
        controller.set_frame(layout.frame());
        controller.container_layout_updated(&layout, LayoutTransition::Immediate);

        let block = options.block_interaction.then(|| self.blocker.acquire());
        Tracer::new(&mut self.sink).present(&PresentEvent {
            view,
            level,
            deferred: false,
            blocking: block.is_some(),
            at: now,
        });

        let wait = ReadinessWait::new(controller, now, self.config.readiness_timeout)
            .with_block(block)
            .with_completion(options.completion);
        match wait.poll(now) {
            Some(outcome) => self.resolve(
                PendingPresentation {
                    wait,
                    level,
                    initial_layout: layout,
                },
                outcome,
                now,
            ),
            None => self.pending.push(PendingPresentation {
                wait,
                level,
                initial_layout: layout,
            }),
        }
    }

    /// Resolves every pending readiness wait whose controller is ready or
    /// whose deadline has passed, then applies queued dismiss requests.
    ///
    /// Waits resolve in the order they were started. Returns the number of
    /// waits resolved.
    pub fn poll(&mut self, now: HostTime) -> usize {
        let mut resolved = 0;
        let mut index = 0;
        while index < self.pending.len() {
            match self.pending[index].wait.poll(now) {
                Some(outcome) => {
                    let pending = self.pending.remove(index);
                    self.resolve(pending, outcome, now);
                    resolved += 1;
                }
                None => index += 1,
            }
        }
        self.process_dismiss_requests();
        resolved
    }

    /// The earliest deadline among pending readiness waits.
    ///
    /// Hosts without a steady frame callback can arm a timer for this time.
    #[must_use]
    pub fn next_deadline(&self) -> Option<HostTime> {
        self.pending.iter().map(|p| p.wait.deadline()).min()
    }

    /// Number of presentations still waiting for readiness.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Abandons the pending readiness waits for `controller`.
    ///
    /// The controller is not added to the stack. Interaction blocks held by
    /// the waits are released and their completions run. Returns whether
    /// anything was pending.
    pub fn cancel_presentation(&mut self, controller: &ControllerRef) -> bool {
        let before = self.pending.len();
        self.pending
            .retain(|p| !same_controller(p.wait.controller(), controller));
        self.pending.len() != before
    }

    /// Removes `controller` from the stack, detaching it if attached.
    ///
    /// Returns whether it was in the stack. Pending readiness waits for the
    /// same controller are unaffected.
    pub fn dismiss(&mut self, controller: &ControllerRef) -> bool {
        let Some(index) = self.position(controller) else {
            return false;
        };
        let entry = self.entries.remove(index);
        if entry.attached {
            let controller = &entry.controller;
            controller.view_will_disappear(false);
            if let Some(host) = self.view.as_mut() {
                host.remove_subview(controller.view());
            }
            controller.view_did_disappear(false);
            Tracer::new(&mut self.sink).detach(&DetachEvent {
                view: controller.view(),
                reason: DetachReason::Dismissed,
            });
        }
        if let Some(completion) = entry.completion {
            completion();
        }
        true
    }

    /// Applies dismiss requests queued through [`DismissHandle`]s. Returns
    /// the number of controllers removed.
    pub fn process_dismiss_requests(&mut self) -> usize {
        let requests = core::mem::take(&mut *self.dismiss_requests.borrow_mut());
        requests
            .into_iter()
            .filter_map(|weak| weak.upgrade())
            .filter(|controller| self.dismiss(controller))
            .count()
    }

    // -- Queries -----------------------------------------------------------

    /// Hosted controllers and their levels, bottom to top.
    pub fn controllers(&self) -> impl Iterator<Item = (&ControllerRef, SurfaceLevel)> {
        self.entries.iter().map(|e| (&e.controller, e.level))
    }

    /// Number of hosted controllers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the stack is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `controller` is in the stack.
    #[must_use]
    pub fn contains(&self, controller: &ControllerRef) -> bool {
        self.position(controller).is_some()
    }

    /// Whether `controller` is in the stack and attached to the host view.
    #[must_use]
    pub fn is_attached(&self, controller: &ControllerRef) -> bool {
        self.position(controller)
            .is_some_and(|index| self.entries[index].attached)
    }

    /// Orientations every hosted controller supports.
    #[must_use]
    pub fn combined_supported_orientations(&self) -> SupportedOrientations {
        self.entries
            .iter()
            .fold(SupportedOrientations::ALL, |mask, e| {
                mask.intersection(e.controller.supported_orientations())
            })
    }

    /// Screen edges any hosted controller wants deferred.
    #[must_use]
    pub fn combined_deferred_edge_gestures(&self) -> ScreenEdges {
        self.entries.iter().fold(ScreenEdges::empty(), |edges, e| {
            edges | e.controller.deferred_screen_edge_gestures()
        })
    }

    /// Whether some hosted controller fully covers the host.
    ///
    /// Only loaded controllers that declare themselves opaque in overlays are
    /// considered, and the host's opacity test has the final say. Without an
    /// opacity test nothing is opaque.
    #[must_use]
    pub fn is_currently_opaque(&self) -> bool {
        let Some(test) = &self.opacity_test else {
            return false;
        };
        self.entries.iter().any(|e| {
            let c = &e.controller;
            c.is_opaque_when_in_overlay() && c.is_view_loaded() && test(c.view(), c.bounds())
        })
    }

    /// Finds the view claiming `point`, asking controllers from the top of the
    /// stack down.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Option<ViewId> {
        self.entries
            .iter()
            .rev()
            .filter(|e| e.controller.is_view_loaded())
            .find_map(|e| e.controller.hit_test(point))
    }

    // -- Internal ----------------------------------------------------------

    fn position(&self, controller: &ControllerRef) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| same_controller(&e.controller, controller))
    }

    /// Index before the first entry with a strictly greater level.
    fn insertion_index(&self, level: SurfaceLevel) -> usize {
        self.entries
            .iter()
            .position(|e| e.level > level)
            .unwrap_or(self.entries.len())
    }

    fn enqueue(&mut self, controller: ControllerRef, level: SurfaceLevel, completion: Option<Completion>) {
        if self.contains(&controller) {
            if let Some(completion) = completion {
                completion();
            }
            return;
        }
        self.entries.push(HostedEntry {
            controller,
            level,
            attached: false,
            completion,
        });
    }

    fn resolve(&mut self, pending: PendingPresentation, outcome: ReadinessOutcome, now: HostTime) {
        let PendingPresentation {
            mut wait,
            level,
            initial_layout,
        } = pending;
        let controller = wait.controller().clone();

        Tracer::new(&mut self.sink).readiness(&ReadinessEvent {
            view: controller.view(),
            outcome,
            waited: now.saturating_duration_since(wait.started()),
            at: now,
        });
        wait.release_block();

        if !self.contains(&controller) {
            let index = self.insertion_index(level);
            self.entries.insert(
                index,
                HostedEntry {
                    controller,
                    level,
                    attached: false,
                    completion: None,
                },
            );
            self.attach_single(index, &initial_layout);
        }
        // Dropping the wait runs the completion.
        drop(wait);
    }

    /// Attaches the freshly inserted entry at `index`, if the context is ready.
    fn attach_single(&mut self, index: usize, initial_layout: &ContainerLayout) {
        let (Some(host), Some(layout)) = (self.view.as_mut(), self.layout) else {
            return;
        };
        let entry = &self.entries[index];
        let controller = entry.controller.clone();
        let level = entry.level;
        let view = controller.view();
        let below = sibling_above(&self.entries, level, self.top_level_subview);

        controller.set_dismiss_handle(DismissHandle::new(&self.dismiss_requests, &controller));
        controller.set_ignores_appearance_calls(true);
        if layout != *initial_layout {
            controller.set_frame(layout.frame());
            insert_view(host, view, below);
            controller.container_layout_updated(&layout, LayoutTransition::Immediate);
        } else {
            insert_view(host, view, below);
        }
        controller.set_ignores_appearance_calls(false);
        self.entries[index].attached = true;
        host.invalidate();

        controller.view_will_appear(false);
        controller.view_did_appear(false);

        Tracer::new(&mut self.sink).attach(&AttachEvent {
            view,
            level,
            index,
            below,
            kind: AttachKind::Single,
        });
    }

    /// Attaches every detached entry in stack order.
    fn attach_all(&mut self) {
        let (Some(host), Some(layout)) = (self.view.as_mut(), self.layout) else {
            return;
        };
        let frame = layout.frame();
        for (index, entry) in self.entries.iter_mut().enumerate() {
            if entry.attached {
                continue;
            }
            let controller = entry.controller.clone();
            let view = controller.view();
            controller.set_dismiss_handle(DismissHandle::new(&self.dismiss_requests, &controller));

            controller.view_will_appear(false);
            insert_view(host, view, self.top_level_subview);
            controller.set_frame(frame);
            controller.container_layout_updated(&layout, LayoutTransition::Immediate);
            controller.view_did_appear(false);
            entry.attached = true;

            Tracer::new(&mut self.sink).attach(&AttachEvent {
                view,
                level: entry.level,
                index,
                below: self.top_level_subview,
                kind: AttachKind::Bulk,
            });
            if let Some(completion) = entry.completion.take() {
                completion();
            }
        }
        host.invalidate();
    }
}

impl<V, S> fmt::Debug for PresentationContext<V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let levels: Vec<_> = self.entries.iter().map(|e| (e.controller.view(), e.level)).collect();
        f.debug_struct("PresentationContext")
            .field("config", &self.config)
            .field("has_view", &self.view.is_some())
            .field("layout", &self.layout)
            .field("top_level_subview", &self.top_level_subview)
            .field("stack", &levels)
            .field("pending", &self.pending.len())
            .field("blocker", &self.blocker)
            .finish_non_exhaustive()
    }
}

/// The view a new entry on `level` should be inserted below: the lowest
/// attached controller with a strictly greater level, found by walking down
/// from the top and stopping at the first attached entry that is not above
/// `level`. Falls back to `top_level_subview`.
fn sibling_above(
    entries: &[HostedEntry],
    level: SurfaceLevel,
    top_level_subview: Option<ViewId>,
) -> Option<ViewId> {
    let mut lowest_above = None;
    for entry in entries.iter().rev() {
        if !entry.attached || !entry.controller.is_view_loaded() {
            continue;
        }
        if entry.level > level {
            lowest_above = Some(entry.controller.view());
        } else {
            break;
        }
    }
    lowest_above.or(top_level_subview)
}

fn insert_view<V: HostView>(host: &mut V, view: ViewId, below: Option<ViewId>) {
    match below {
        Some(sibling) => host.insert_subview_below(view, sibling),
        None => host.add_subview(view),
    }
}

/// Re-parents every attached view from `old` to `new`, bottom to top.
fn move_attached<V: HostView>(
    entries: &[HostedEntry],
    old: &mut V,
    new: &mut V,
    top_level_subview: Option<ViewId>,
) {
    for entry in entries.iter().filter(|e| e.attached) {
        let view = entry.controller.view();
        old.remove_subview(view);
        insert_view(new, view, top_level_subview);
    }
    old.invalidate();
    new.invalidate();
}

fn detach_all<V: HostView, S: TraceSink>(
    entries: &mut [HostedEntry],
    host: &mut V,
    sink: &mut S,
    reason: DetachReason,
) {
    for entry in entries.iter_mut().filter(|e| e.attached) {
        let controller = &entry.controller;
        let view = controller.view();
        controller.view_will_disappear(false);
        host.remove_subview(view);
        controller.view_did_disappear(false);
        entry.attached = false;
        Tracer::new(&mut *sink).detach(&DetachEvent { view, reason });
    }
    host.invalidate();
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::Cell;

    use kurbo::Size;

    use super::*;
    use crate::controller::{HostedController, Readiness};

    struct Probe {
        view: ViewId,
        readiness: Cell<Readiness>,
        dismiss: RefCell<Option<DismissHandle>>,
    }

    impl Probe {
        fn ready(view: u64) -> Rc<Self> {
            Rc::new(Self {
                view: ViewId(view),
                readiness: Cell::new(Readiness::Ready),
                dismiss: RefCell::new(None),
            })
        }
    }

    impl HostedController for Probe {
        fn view(&self) -> ViewId {
            self.view
        }
        fn readiness(&self) -> Readiness {
            self.readiness.get()
        }
        fn set_frame(&self, _: Rect) {}
        fn bounds(&self) -> Rect {
            Rect::ZERO
        }
        fn container_layout_updated(&self, _: &ContainerLayout, _: LayoutTransition) {}
        fn hit_test(&self, _: Point) -> Option<ViewId> {
            None
        }
        fn set_dismiss_handle(&self, handle: DismissHandle) {
            *self.dismiss.borrow_mut() = Some(handle);
        }
    }

    #[derive(Default)]
    struct Subviews(Vec<ViewId>);

    impl HostView for Subviews {
        fn add_subview(&mut self, view: ViewId) {
            self.0.push(view);
        }
        fn insert_subview_below(&mut self, view: ViewId, sibling: ViewId) {
            let index = self.0.iter().position(|v| *v == sibling).unwrap_or(self.0.len());
            self.0.insert(index, view);
        }
        fn remove_subview(&mut self, view: ViewId) {
            self.0.retain(|v| *v != view);
        }
    }

    fn ready_context() -> PresentationContext<Subviews> {
        let mut context = PresentationContext::new(PresentationConfig::new(Timebase::NANOS));
        context.set_view(Some(Subviews::default()));
        context.container_layout_updated(
            ContainerLayout::new(Size::new(390.0, 844.0)),
            LayoutTransition::Immediate,
        );
        context
    }

    fn stack(context: &PresentationContext<Subviews>) -> Vec<ViewId> {
        context.controllers().map(|(c, _)| c.view()).collect()
    }

    #[test]
    fn ties_keep_arrival_order() {
        let mut context = ready_context();
        let c1: ControllerRef = Probe::ready(1);
        let c2: ControllerRef = Probe::ready(2);
        let c3: ControllerRef = Probe::ready(3);

        context.present(c1, SurfaceLevel(0), PresentOptions::new(), HostTime(0));
        context.present(c2, SurfaceLevel(1), PresentOptions::new(), HostTime(0));
        context.present(c3, SurfaceLevel(0), PresentOptions::new(), HostTime(0));

        assert_eq!(stack(&context), vec![ViewId(1), ViewId(3), ViewId(2)]);
        let host = context.view().map(|v| v.0.clone());
        assert_eq!(
            host,
            Some(vec![ViewId(1), ViewId(3), ViewId(2)]),
            "level-1 controller stays on top of later level-0 ones"
        );
    }

    #[test]
    fn presenting_twice_is_a_no_op() {
        let mut context = ready_context();
        let c: ControllerRef = Probe::ready(1);
        context.present(c.clone(), SurfaceLevel::ROOT, PresentOptions::new(), HostTime(0));
        context.present(c.clone(), SurfaceLevel(4), PresentOptions::new(), HostTime(0));
        assert_eq!(context.len(), 1);
        assert_eq!(context.controllers().next().map(|(_, l)| l), Some(SurfaceLevel::ROOT));
    }

    #[test]
    fn queued_entries_keep_arrival_order() {
        let mut context: PresentationContext<Subviews> =
            PresentationContext::new(PresentationConfig::new(Timebase::NANOS));
        let first: ControllerRef = Probe::ready(1);
        context.present(first.clone(), SurfaceLevel(2), PresentOptions::new(), HostTime(0));
        context.present(Probe::ready(2), SurfaceLevel(0), PresentOptions::new(), HostTime(0));
        assert_eq!(stack(&context), vec![ViewId(1), ViewId(2)]);
        assert!(context.contains(&first));
        assert!(!context.is_attached(&first));
        assert_eq!(context.pending_count(), 0, "no readiness wait while not ready");
    }

    #[test]
    fn dismiss_handle_is_applied_on_poll() {
        let mut context = ready_context();
        let probe = Probe::ready(1);
        context.present(probe.clone(), SurfaceLevel::ROOT, PresentOptions::new(), HostTime(0));

        let handle = probe.dismiss.borrow().clone();
        assert!(handle.is_some_and(|h| h.request_dismiss()));
        assert_eq!(context.len(), 1, "requests wait for the owner to poll");

        context.poll(HostTime(1));
        assert!(context.is_empty());
        assert_eq!(context.view().map(|v| v.0.len()), Some(0));
    }

    #[test]
    fn next_deadline_tracks_pending_waits() {
        let mut context = ready_context();
        let slow = Probe::ready(1);
        slow.readiness.set(Readiness::Pending);
        context.present(slow, SurfaceLevel::ROOT, PresentOptions::new(), HostTime(500));
        assert_eq!(context.next_deadline(), Some(HostTime(2_000_000_500)));
        assert_eq!(context.pending_count(), 1);
    }
}
