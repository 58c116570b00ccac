// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! Each controller view gets its own track (`tid` = view id). Readiness waits
//! become complete (`X`) slices spanning the wait; everything else is an
//! instant. Attach, detach, context and layout events carry no timestamp of
//! their own and are placed at the most recent timestamp seen in the
//! recording. A counter track follows the number of attached views.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use strata_core::time::Timebase;

use crate::recorder::{RecordedEvent, decode};

/// Track for events that belong to the context rather than a view.
const CONTEXT_TID: u64 = 0;

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Timestamps are converted to microseconds using the provided [`Timebase`].
pub fn export(bytes: &[u8], timebase: Timebase, writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    let mut now_us = 0.0;
    let mut attached: i64 = 0;

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::Present(e) => {
                now_us = ticks_to_us(e.at.ticks(), timebase);
                events.push(json!({
                    "ph": "i",
                    "name": "Present",
                    "cat": "Presentation",
                    "ts": now_us,
                    "pid": 0,
                    "tid": e.view.0,
                    "s": "t",
                    "args": {
                        "level": e.level.raw(),
                        "deferred": e.deferred,
                        "blocking": e.blocking,
                    }
                }));
            }
            RecordedEvent::Readiness(e) => {
                now_us = ticks_to_us(e.at.ticks(), timebase);
                let waited_us = ticks_to_us(e.waited.ticks(), timebase);
                events.push(json!({
                    "ph": "X",
                    "name": "ReadinessWait",
                    "cat": "Presentation",
                    "ts": now_us - waited_us,
                    "dur": waited_us,
                    "pid": 0,
                    "tid": e.view.0,
                    "args": {
                        "outcome": format!("{:?}", e.outcome),
                    }
                }));
            }
            RecordedEvent::Attach(e) => {
                attached += 1;
                events.push(json!({
                    "ph": "i",
                    "name": "Attach",
                    "cat": "Stack",
                    "ts": now_us,
                    "pid": 0,
                    "tid": e.view.0,
                    "s": "t",
                    "args": {
                        "level": e.level.raw(),
                        "index": e.index,
                        "below": e.below.map(|v| v.0),
                        "kind": format!("{:?}", e.kind),
                    }
                }));
                events.push(attached_counter(now_us, attached));
            }
            RecordedEvent::Detach(e) => {
                attached -= 1;
                events.push(json!({
                    "ph": "i",
                    "name": "Detach",
                    "cat": "Stack",
                    "ts": now_us,
                    "pid": 0,
                    "tid": e.view.0,
                    "s": "t",
                    "args": {
                        "reason": format!("{:?}", e.reason),
                    }
                }));
                events.push(attached_counter(now_us, attached));
            }
            RecordedEvent::ReadyChanged(e) => {
                let name = if e.ready {
                    "ContextReady"
                } else {
                    "ContextNotReady"
                };
                events.push(json!({
                    "ph": "i",
                    "name": name,
                    "cat": "Context",
                    "ts": now_us,
                    "pid": 0,
                    "tid": CONTEXT_TID,
                    "s": "g",
                    "args": {
                        "hosted": e.hosted,
                    }
                }));
            }
            RecordedEvent::Layout(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Layout",
                    "cat": "Context",
                    "ts": now_us,
                    "pid": 0,
                    "tid": CONTEXT_TID,
                    "s": "p",
                    "args": {
                        "width": e.size.width,
                        "height": e.size.height,
                        "propagated": e.propagated,
                        "animated": e.animated,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn attached_counter(ts: f64, attached: i64) -> Value {
    json!({
        "ph": "C",
        "name": "Attached",
        "ts": ts,
        "pid": 0,
        "args": { "views": attached },
    })
}

fn ticks_to_us(ticks: u64, timebase: Timebase) -> f64 {
    timebase.ticks_to_nanos(ticks) as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use strata_core::controller::ViewId;
    use strata_core::level::SurfaceLevel;
    use strata_core::readiness::ReadinessOutcome;
    use strata_core::time::{Duration, HostTime};
    use strata_core::trace::{
        AttachEvent, AttachKind, DetachEvent, DetachReason, PresentEvent, ReadinessEvent,
        TraceSink,
    };

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_present(&PresentEvent {
            view: ViewId(3),
            level: SurfaceLevel::ROOT,
            deferred: false,
            blocking: false,
            at: HostTime(1_000_000),
        });
        rec.on_readiness(&ReadinessEvent {
            view: ViewId(3),
            outcome: ReadinessOutcome::Ready,
            waited: Duration(500_000),
            at: HostTime(1_500_000),
        });
        rec.on_attach(&AttachEvent {
            view: ViewId(3),
            level: SurfaceLevel::ROOT,
            index: 0,
            below: None,
            kind: AttachKind::Single,
        });
        rec.on_detach(&DetachEvent {
            view: ViewId(3),
            reason: DetachReason::Dismissed,
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), Timebase::NANOS, &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        // present, wait, attach + counter, detach + counter
        assert_eq!(parsed.len(), 6);

        assert_eq!(parsed[0]["ph"], "i");
        assert_eq!(parsed[0]["name"], "Present");
        assert_eq!(parsed[0]["tid"], 3);

        assert_eq!(parsed[1]["ph"], "X");
        assert_eq!(parsed[1]["ts"], 1_000.0);
        assert_eq!(parsed[1]["dur"], 500.0);
        assert_eq!(parsed[1]["args"]["outcome"], "Ready");

        assert_eq!(parsed[2]["name"], "Attach");
        assert_eq!(parsed[2]["ts"], 1_500.0, "attach inherits the last timestamp");
        assert_eq!(parsed[3]["ph"], "C");
        assert_eq!(parsed[3]["args"]["views"], 1);
        assert_eq!(parsed[5]["args"]["views"], 0);
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], Timebase::NANOS, &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
