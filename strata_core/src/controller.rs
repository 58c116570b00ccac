// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contracts between the presentation context, hosted controllers, and the
//! host surface.
//!
//! The context never owns views. It talks to two collaborators:
//!
//! - **Hosted controllers** implement [`HostedController`]. A controller
//!   exposes its root view as an opaque [`ViewId`], a readiness signal, layout
//!   and appearance hooks, and its orientation and gesture declarations. All
//!   methods take `&self`: controllers are shared (`Rc`) between the caller
//!   that presents them and the context that hosts them, so implementations
//!   keep mutable state in `Cell`/`RefCell`.
//!
//! - **Host views** implement [`HostView`], the backing view the overlay stack
//!   inserts controller views into.
//!
//! Controllers ask to be removed through a [`DismissHandle`] installed when
//! they are attached. Requests are queued and applied by the context on its
//! next [`poll`](crate::context::PresentationContext::poll), so a controller
//! can dismiss itself from inside any of its own callbacks.

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use kurbo::{Point, Rect};

use crate::layout::{ContainerLayout, LayoutTransition};
use crate::orientation::{ScreenEdges, SupportedOrientations};

/// An opaque reference to a host-owned view.
///
/// Views are created and managed by the host platform. The context only passes
/// these handles back to the [`HostView`] it is attached to.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ViewId(pub u64);

impl fmt::Debug for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ViewId({})", self.0)
    }
}

/// The current value of a controller's readiness signal.
///
/// A controller reports [`Ready`](Self::Ready) once it has finished preparing
/// to display (content loaded, first layout done). Readiness waits only react
/// to `Ready`; [`NotReady`](Self::NotReady) is treated like
/// [`Pending`](Self::Pending).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Readiness {
    /// No value reported yet.
    #[default]
    Pending,
    /// The controller reported that it is ready.
    Ready,
    /// The controller reported that it is not ready.
    NotReady,
}

/// A shared handle to a hosted controller.
pub type ControllerRef = Rc<dyn HostedController>;

/// Whether two handles refer to the same controller instance.
///
/// Controllers are compared by identity, never by value.
#[inline]
#[must_use]
pub fn same_controller(a: &ControllerRef, b: &ControllerRef) -> bool {
    core::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// The capability a controller needs to be hosted by a
/// [`PresentationContext`](crate::context::PresentationContext).
pub trait HostedController {
    /// The controller's root view.
    fn view(&self) -> ViewId;

    /// The current value of the readiness signal.
    ///
    /// Queried repeatedly by pending readiness waits until it reports
    /// [`Readiness::Ready`] or the wait times out.
    fn readiness(&self) -> Readiness;

    /// Whether the root view has been created.
    ///
    /// Unloaded controllers are skipped by hit-testing and opacity checks.
    fn is_view_loaded(&self) -> bool {
        true
    }

    /// Sets the root view's frame in host coordinates.
    fn set_frame(&self, frame: Rect);

    /// The root view's bounds, used for opacity checks.
    fn bounds(&self) -> Rect;

    /// Delivers a new container layout.
    fn container_layout_updated(&self, layout: &ContainerLayout, transition: LayoutTransition);

    /// Called before the root view is inserted into the host view.
    fn view_will_appear(&self, animated: bool) {
        _ = animated;
    }

    /// Called after the root view has been inserted into the host view.
    fn view_did_appear(&self, animated: bool) {
        _ = animated;
    }

    /// Called before the root view is removed from the host view.
    fn view_will_disappear(&self, animated: bool) {
        _ = animated;
    }

    /// Called after the root view has been removed from the host view.
    fn view_did_disappear(&self, animated: bool) {
        _ = animated;
    }

    /// While `true`, the controller should suppress appearance callbacks
    /// triggered as a side effect of view insertion; the context delivers the
    /// appearance hooks explicitly afterwards.
    fn set_ignores_appearance_calls(&self, ignore: bool) {
        _ = ignore;
    }

    /// Whether the controller wants its orientation pinned to the one it was
    /// presented in.
    fn locks_orientation(&self) -> bool {
        false
    }

    /// Orientations this controller supports.
    fn supported_orientations(&self) -> SupportedOrientations {
        SupportedOrientations::ALL
    }

    /// Replaces the supported orientations (used by orientation locking).
    fn set_supported_orientations(&self, orientations: SupportedOrientations) {
        _ = orientations;
    }

    /// Screen edges whose system gestures should be deferred while this
    /// controller is hosted.
    fn deferred_screen_edge_gestures(&self) -> ScreenEdges {
        ScreenEdges::empty()
    }

    /// Whether this controller can make the overlay stack fully opaque.
    fn is_opaque_when_in_overlay(&self) -> bool {
        false
    }

    /// Returns the view that claims `point` (in host coordinates), if any.
    fn hit_test(&self, point: Point) -> Option<ViewId>;

    /// Installs the handle the controller uses to request its own dismissal.
    fn set_dismiss_handle(&self, handle: DismissHandle);
}

/// The backing view the overlay stack is composited into.
pub trait HostView {
    /// Inserts `view` above every existing subview.
    fn add_subview(&mut self, view: ViewId);

    /// Inserts `view` directly below `sibling`.
    fn insert_subview_below(&mut self, view: ViewId, sibling: ViewId);

    /// Removes `view` from this host view.
    fn remove_subview(&mut self, view: ViewId);

    /// Marks the view hierarchy as needing display after a structural change.
    fn invalidate(&mut self) {}
}

pub(crate) type DismissQueue = Rc<RefCell<Vec<Weak<dyn HostedController>>>>;

/// Lets a hosted controller request its own removal from the stack.
///
/// Requests are applied by the owning context on its next poll. A handle
/// outliving its context (or its controller) turns requests into no-ops.
#[derive(Clone)]
pub struct DismissHandle {
    queue: Weak<RefCell<Vec<Weak<dyn HostedController>>>>,
    controller: Weak<dyn HostedController>,
}

impl DismissHandle {
    pub(crate) fn new(queue: &DismissQueue, controller: &ControllerRef) -> Self {
        Self {
            queue: Rc::downgrade(queue),
            controller: Rc::downgrade(controller),
        }
    }

    /// Queues a dismissal of the controller this handle was issued to.
    ///
    /// Returns `false` if the context that issued the handle is gone.
    pub fn request_dismiss(&self) -> bool {
        match self.queue.upgrade() {
            Some(queue) => {
                queue.borrow_mut().push(self.controller.clone());
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for DismissHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DismissHandle")
            .field("context_alive", &(self.queue.strong_count() > 0))
            .finish_non_exhaustive()
    }
}
