// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the presentation stack.
//!
//! This module provides a [`TraceSink`] trait with one method per event the
//! presentation context emits. All method bodies default to no-ops, so
//! implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).

use kurbo::Size;

use crate::controller::ViewId;
use crate::level::SurfaceLevel;
use crate::readiness::ReadinessOutcome;
use crate::time::{Duration, HostTime};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Why a controller view was removed from the host view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DetachReason {
    /// The controller was dismissed and left the stack.
    Dismissed,
    /// The host view or layout went away; the controller stays queued.
    HostUnavailable,
}

/// How a controller view came to be attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttachKind {
    /// Attached on its own after its readiness wait resolved.
    Single,
    /// Attached together with the rest of the stack when the context became
    /// ready.
    Bulk,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a `present` call is accepted.
#[derive(Clone, Copy, Debug)]
pub struct PresentEvent {
    /// The presented controller's root view.
    pub view: ViewId,
    /// Requested surface level.
    pub level: SurfaceLevel,
    /// The context was not ready; the controller was queued for bulk attach.
    pub deferred: bool,
    /// The request holds an interaction block while waiting.
    pub blocking: bool,
    /// Host time of the call.
    pub at: HostTime,
}

/// Emitted when a readiness wait resolves.
#[derive(Clone, Copy, Debug)]
pub struct ReadinessEvent {
    /// The controller's root view.
    pub view: ViewId,
    /// Which exit the wait took.
    pub outcome: ReadinessOutcome,
    /// Time spent waiting.
    pub waited: Duration,
    /// Host time of resolution.
    pub at: HostTime,
}

/// Emitted when a controller view is inserted into the host view.
#[derive(Clone, Copy, Debug)]
pub struct AttachEvent {
    /// The controller's root view.
    pub view: ViewId,
    /// The controller's surface level.
    pub level: SurfaceLevel,
    /// Index of the controller in the presentation stack.
    pub index: usize,
    /// The sibling the view was inserted below, or `None` if it went on top.
    pub below: Option<ViewId>,
    /// Single or bulk attach.
    pub kind: AttachKind,
}

/// Emitted when a controller view is removed from the host view.
#[derive(Clone, Copy, Debug)]
pub struct DetachEvent {
    /// The controller's root view.
    pub view: ViewId,
    /// Why it was removed.
    pub reason: DetachReason,
}

/// Emitted on a readiness edge of the context itself.
#[derive(Clone, Copy, Debug)]
pub struct ReadyChangedEvent {
    /// New readiness.
    pub ready: bool,
    /// Number of controllers in the stack at the time of the edge.
    pub hosted: usize,
}

/// Emitted when a new container layout is applied.
#[derive(Clone, Copy, Debug)]
pub struct LayoutEvent {
    /// New container size.
    pub size: Size,
    /// Number of controllers the layout was delivered to.
    pub propagated: usize,
    /// Whether the transition animates.
    pub animated: bool,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the presentation context.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a `present` call is accepted.
    fn on_present(&mut self, e: &PresentEvent) {
        _ = e;
    }

    /// Called when a readiness wait resolves.
    fn on_readiness(&mut self, e: &ReadinessEvent) {
        _ = e;
    }

    /// Called when a controller view is attached.
    fn on_attach(&mut self, e: &AttachEvent) {
        _ = e;
    }

    /// Called when a controller view is detached.
    fn on_detach(&mut self, e: &DetachEvent) {
        _ = e;
    }

    /// Called on a readiness edge of the context.
    fn on_ready_changed(&mut self, e: &ReadyChangedEvent) {
        _ = e;
    }

    /// Called when a new layout is applied.
    fn on_layout(&mut self, e: &LayoutEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`PresentEvent`].
    #[inline]
    pub fn present(&mut self, e: &PresentEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_present(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ReadinessEvent`].
    #[inline]
    pub fn readiness(&mut self, e: &ReadinessEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_readiness(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`AttachEvent`].
    #[inline]
    pub fn attach(&mut self, e: &AttachEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_attach(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`DetachEvent`].
    #[inline]
    pub fn detach(&mut self, e: &DetachEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_detach(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ReadyChangedEvent`].
    #[inline]
    pub fn ready_changed(&mut self, e: &ReadyChangedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_ready_changed(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`LayoutEvent`].
    #[inline]
    pub fn layout(&mut self, e: &LayoutEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_layout(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_attach() -> AttachEvent {
        AttachEvent {
            view: ViewId(7),
            level: SurfaceLevel(2),
            index: 1,
            below: Some(ViewId(9)),
            kind: AttachKind::Single,
        }
    }

    #[test]
    fn noop_sink_accepts_everything() {
        let mut sink = NoopSink;
        sink.on_attach(&sample_attach());
        sink.on_ready_changed(&ReadyChangedEvent {
            ready: true,
            hosted: 3,
        });
        sink.on_layout(&LayoutEvent {
            size: Size::new(320.0, 480.0),
            propagated: 3,
            animated: false,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.attach(&sample_attach());
        tracer.detach(&DetachEvent {
            view: ViewId(7),
            reason: DetachReason::Dismissed,
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct AttachLog {
            views: Vec<ViewId>,
        }
        impl TraceSink for AttachLog {
            fn on_attach(&mut self, e: &AttachEvent) {
                self.views.push(e.view);
            }
        }

        let mut sink = AttachLog { views: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.attach(&sample_attach());
        drop(tracer);
        assert_eq!(sink.views, &[ViewId(7)]);
    }
}
