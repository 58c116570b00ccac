// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`]. Decoding stops at the first truncated
//! record or unknown tag.

use kurbo::Size;
use strata_core::controller::ViewId;
use strata_core::level::SurfaceLevel;
use strata_core::readiness::ReadinessOutcome;
use strata_core::time::{Duration, HostTime};
use strata_core::trace::{
    AttachEvent, AttachKind, DetachEvent, DetachReason, LayoutEvent, PresentEvent, ReadinessEvent,
    ReadyChangedEvent, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_PRESENT: u8 = 1;
const TAG_READINESS: u8 = 2;
const TAG_ATTACH: u8 = 3;
const TAG_DETACH: u8 = 4;
const TAG_READY_CHANGED: u8 = 5;
const TAG_LAYOUT: u8 = 6;

const PRESENT_DEFERRED: u8 = 1 << 0;
const PRESENT_BLOCKING: u8 = 1 << 1;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_usize(&mut self, v: usize) {
        self.write_u64(u64::try_from(v).unwrap_or(u64::MAX));
    }

    fn write_option_u64(&mut self, v: Option<u64>) {
        match v {
            Some(val) => {
                self.write_u8(1);
                self.write_u64(val);
            }
            None => {
                self.write_u8(0);
                self.write_u64(0);
            }
        }
    }
}

impl TraceSink for RecorderSink {
    fn on_present(&mut self, e: &PresentEvent) {
        let mut flags = 0;
        if e.deferred {
            flags |= PRESENT_DEFERRED;
        }
        if e.blocking {
            flags |= PRESENT_BLOCKING;
        }
        self.write_u8(TAG_PRESENT);
        self.write_u64(e.view.0);
        self.write_i32(e.level.raw());
        self.write_u8(flags);
        self.write_u64(e.at.ticks());
    }

    fn on_readiness(&mut self, e: &ReadinessEvent) {
        self.write_u8(TAG_READINESS);
        self.write_u64(e.view.0);
        self.write_u8(match e.outcome {
            ReadinessOutcome::Ready => 0,
            ReadinessOutcome::TimedOut => 1,
        });
        self.write_u64(e.waited.ticks());
        self.write_u64(e.at.ticks());
    }

    fn on_attach(&mut self, e: &AttachEvent) {
        self.write_u8(TAG_ATTACH);
        self.write_u64(e.view.0);
        self.write_i32(e.level.raw());
        self.write_usize(e.index);
        self.write_option_u64(e.below.map(|v| v.0));
        self.write_u8(match e.kind {
            AttachKind::Single => 0,
            AttachKind::Bulk => 1,
        });
    }

    fn on_detach(&mut self, e: &DetachEvent) {
        self.write_u8(TAG_DETACH);
        self.write_u64(e.view.0);
        self.write_u8(match e.reason {
            DetachReason::Dismissed => 0,
            DetachReason::HostUnavailable => 1,
        });
    }

    fn on_ready_changed(&mut self, e: &ReadyChangedEvent) {
        self.write_u8(TAG_READY_CHANGED);
        self.write_u8(u8::from(e.ready));
        self.write_usize(e.hosted);
    }

    fn on_layout(&mut self, e: &LayoutEvent) {
        self.write_u8(TAG_LAYOUT);
        self.write_f64(e.size.width);
        self.write_f64(e.size.height);
        self.write_usize(e.propagated);
        self.write_u8(u8::from(e.animated));
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`PresentEvent`].
    Present(PresentEvent),
    /// A [`ReadinessEvent`].
    Readiness(ReadinessEvent),
    /// An [`AttachEvent`].
    Attach(AttachEvent),
    /// A [`DetachEvent`].
    Detach(DetachEvent),
    /// A [`ReadyChangedEvent`].
    ReadyChanged(ReadyChangedEvent),
    /// A [`LayoutEvent`].
    Layout(LayoutEvent),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[v]| v)
    }

    fn read_i32(&mut self) -> Option<i32> {
        self.take().map(i32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.take().map(f64::from_le_bytes)
    }

    fn read_usize(&mut self) -> Option<usize> {
        self.read_u64()
            .map(|v| usize::try_from(v).unwrap_or(usize::MAX))
    }

    fn read_option_u64(&mut self) -> Option<Option<u64>> {
        let present = self.read_u8()?;
        let val = self.read_u64()?;
        Some(if present != 0 { Some(val) } else { None })
    }

    fn decode_present(&mut self) -> Option<RecordedEvent> {
        let view = ViewId(self.read_u64()?);
        let level = SurfaceLevel(self.read_i32()?);
        let flags = self.read_u8()?;
        Some(RecordedEvent::Present(PresentEvent {
            view,
            level,
            deferred: flags & PRESENT_DEFERRED != 0,
            blocking: flags & PRESENT_BLOCKING != 0,
            at: HostTime(self.read_u64()?),
        }))
    }

    fn decode_readiness(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Readiness(ReadinessEvent {
            view: ViewId(self.read_u64()?),
            outcome: match self.read_u8()? {
                0 => ReadinessOutcome::Ready,
                _ => ReadinessOutcome::TimedOut,
            },
            waited: Duration(self.read_u64()?),
            at: HostTime(self.read_u64()?),
        }))
    }

    fn decode_attach(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Attach(AttachEvent {
            view: ViewId(self.read_u64()?),
            level: SurfaceLevel(self.read_i32()?),
            index: self.read_usize()?,
            below: self.read_option_u64()?.map(ViewId),
            kind: match self.read_u8()? {
                0 => AttachKind::Single,
                _ => AttachKind::Bulk,
            },
        }))
    }

    fn decode_detach(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Detach(DetachEvent {
            view: ViewId(self.read_u64()?),
            reason: match self.read_u8()? {
                0 => DetachReason::Dismissed,
                _ => DetachReason::HostUnavailable,
            },
        }))
    }

    fn decode_ready_changed(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::ReadyChanged(ReadyChangedEvent {
            ready: self.read_u8()? != 0,
            hosted: self.read_usize()?,
        }))
    }

    fn decode_layout(&mut self) -> Option<RecordedEvent> {
        let width = self.read_f64()?;
        let height = self.read_f64()?;
        Some(RecordedEvent::Layout(LayoutEvent {
            size: Size::new(width, height),
            propagated: self.read_usize()?,
            animated: self.read_u8()? != 0,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_PRESENT => self.decode_present(),
            TAG_READINESS => self.decode_readiness(),
            TAG_ATTACH => self.decode_attach(),
            TAG_DETACH => self.decode_detach(),
            TAG_READY_CHANGED => self.decode_ready_changed(),
            TAG_LAYOUT => self.decode_layout(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_session() -> RecorderSink {
        let mut rec = RecorderSink::new();
        rec.on_ready_changed(&ReadyChangedEvent {
            ready: true,
            hosted: 0,
        });
        rec.on_present(&PresentEvent {
            view: ViewId(11),
            level: SurfaceLevel(-1),
            deferred: false,
            blocking: true,
            at: HostTime(1_000),
        });
        rec.on_readiness(&ReadinessEvent {
            view: ViewId(11),
            outcome: ReadinessOutcome::TimedOut,
            waited: Duration(2_000),
            at: HostTime(3_000),
        });
        rec.on_attach(&AttachEvent {
            view: ViewId(11),
            level: SurfaceLevel(-1),
            index: 0,
            below: Some(ViewId(90)),
            kind: AttachKind::Single,
        });
        rec.on_layout(&LayoutEvent {
            size: Size::new(844.0, 390.0),
            propagated: 1,
            animated: true,
        });
        rec.on_detach(&DetachEvent {
            view: ViewId(11),
            reason: DetachReason::Dismissed,
        });
        rec
    }

    #[test]
    fn session_decodes_in_order() {
        let rec = sample_session();
        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 6);

        assert!(matches!(
            events[0],
            RecordedEvent::ReadyChanged(ReadyChangedEvent {
                ready: true,
                hosted: 0
            })
        ));
        let RecordedEvent::Present(p) = &events[1] else {
            panic!("expected present, got {:?}", events[1]);
        };
        assert_eq!((p.view, p.level, p.deferred, p.blocking), (ViewId(11), SurfaceLevel(-1), false, true));
        let RecordedEvent::Readiness(r) = &events[2] else {
            panic!("expected readiness, got {:?}", events[2]);
        };
        assert_eq!(r.outcome, ReadinessOutcome::TimedOut);
        assert_eq!(r.waited, Duration(2_000));
        let RecordedEvent::Attach(a) = &events[3] else {
            panic!("expected attach, got {:?}", events[3]);
        };
        assert_eq!(a.below, Some(ViewId(90)));
        assert_eq!(a.kind, AttachKind::Single);
        let RecordedEvent::Layout(l) = &events[4] else {
            panic!("expected layout, got {:?}", events[4]);
        };
        assert_eq!(l.size, Size::new(844.0, 390.0));
        assert!(l.animated);
        assert!(matches!(
            events[5],
            RecordedEvent::Detach(DetachEvent {
                reason: DetachReason::Dismissed,
                ..
            })
        ));
    }

    #[test]
    fn truncated_record_ends_decoding() {
        let bytes = sample_session().into_bytes();
        // Chop the final detach record in half.
        let truncated = &bytes[..bytes.len() - 4];
        assert_eq!(decode(truncated).count(), 5);
    }

    #[test]
    fn unknown_tag_ends_decoding() {
        assert_eq!(decode(&[0xff, 1, 2, 3]).count(), 0);
        assert_eq!(decode(&[]).count(), 0);
    }
}
