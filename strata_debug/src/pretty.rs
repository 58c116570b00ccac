// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are converted to microseconds using a [`Timebase`].

use std::io::Write;

use strata_core::readiness::ReadinessOutcome;
use strata_core::time::{HostTime, Timebase};
use strata_core::trace::{
    AttachEvent, AttachKind, DetachEvent, DetachReason, LayoutEvent, PresentEvent, ReadinessEvent,
    ReadyChangedEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    timebase: Timebase,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("timebase", &self.timebase)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr(timebase: Timebase) -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
            timebase,
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }

    /// Consumes the sink and returns the writer.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn ticks_to_ms(&self, ticks: u64) -> f64 {
        self.timebase.ticks_to_nanos(ticks) as f64 / 1_000_000.0
    }

    fn host_ms(&self, t: HostTime) -> f64 {
        self.ticks_to_ms(t.ticks())
    }
}

fn outcome_name(outcome: ReadinessOutcome) -> &'static str {
    match outcome {
        ReadinessOutcome::Ready => "ready",
        ReadinessOutcome::TimedOut => "timed-out",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_present(&mut self, e: &PresentEvent) {
        let mode = if e.deferred { "queued" } else { "waiting" };
        let block = if e.blocking { " blocking" } else { "" };
        let _ = writeln!(
            self.writer,
            "[present] view={} level={} {mode}{block} at={:.3}ms",
            e.view.0,
            e.level.raw(),
            self.host_ms(e.at),
        );
    }

    fn on_readiness(&mut self, e: &ReadinessEvent) {
        let _ = writeln!(
            self.writer,
            "[readiness] view={} {} after {:.3}ms at={:.3}ms",
            e.view.0,
            outcome_name(e.outcome),
            self.ticks_to_ms(e.waited.ticks()),
            self.host_ms(e.at),
        );
    }

    fn on_attach(&mut self, e: &AttachEvent) {
        let kind = match e.kind {
            AttachKind::Single => "single",
            AttachKind::Bulk => "bulk",
        };
        let placement = match e.below {
            Some(sibling) => format!("below={}", sibling.0),
            None => "on-top".to_owned(),
        };
        let _ = writeln!(
            self.writer,
            "[attach] view={} level={} index={} {placement} ({kind})",
            e.view.0,
            e.level.raw(),
            e.index,
        );
    }

    fn on_detach(&mut self, e: &DetachEvent) {
        let reason = match e.reason {
            DetachReason::Dismissed => "dismissed",
            DetachReason::HostUnavailable => "host-unavailable",
        };
        let _ = writeln!(self.writer, "[detach] view={} {reason}", e.view.0);
    }

    fn on_ready_changed(&mut self, e: &ReadyChangedEvent) {
        let state = if e.ready { "ready" } else { "not-ready" };
        let _ = writeln!(self.writer, "[context] {state} hosted={}", e.hosted);
    }

    fn on_layout(&mut self, e: &LayoutEvent) {
        let animated = if e.animated { " animated" } else { "" };
        let _ = writeln!(
            self.writer,
            "[layout] {}x{} propagated={}{animated}",
            e.size.width, e.size.height, e.propagated,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::controller::ViewId;
    use strata_core::level::SurfaceLevel;
    use strata_core::time::Duration;

    fn output(sink: PrettyPrintSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_writer()).unwrap()
    }

    #[test]
    fn pretty_print_present() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new(), Timebase::NANOS);
        sink.on_present(&PresentEvent {
            view: ViewId(4),
            level: SurfaceLevel(2),
            deferred: false,
            blocking: true,
            at: HostTime(1_500_000),
        });
        let output = output(sink);
        assert!(output.contains("[present]"), "got: {output}");
        assert!(output.contains("view=4 level=2 waiting blocking"), "got: {output}");
        assert!(output.contains("at=1.500ms"), "got: {output}");
    }

    #[test]
    fn pretty_print_timeout_and_attach() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new(), Timebase::NANOS);
        sink.on_readiness(&ReadinessEvent {
            view: ViewId(4),
            outcome: ReadinessOutcome::TimedOut,
            waited: Duration(2_000_000_000),
            at: HostTime(2_000_000_000),
        });
        sink.on_attach(&AttachEvent {
            view: ViewId(4),
            level: SurfaceLevel::ROOT,
            index: 0,
            below: Some(ViewId(99)),
            kind: AttachKind::Single,
        });
        let output = output(sink);
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 2, "got: {output}");
        assert!(lines[0].contains("timed-out after 2000.000ms"), "got: {output}");
        assert!(lines[1].contains("below=99 (single)"), "got: {output}");
    }
}
