// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated 60 Hz host loop that exercises the presentation stack and the
//! diagnostics pipeline.
//!
//! Runs three seconds of synthetic frames: a toast queued before the host is
//! ready, a blocking alert that becomes ready after a few frames, a sheet
//! that never reports ready and is attached on timeout, a rotation, a
//! self-dismissal, and a list header bouncing back after an overscroll.
//! Events go to both a [`PrettyPrintSink`] and a [`RecorderSink`]; the
//! recording is exported as a Chrome trace JSON file at the end.

use std::fs::File;
use std::io::BufWriter;

use kurbo::{Rect, Size};
use strata_core::context::{PresentOptions, PresentationConfig, PresentationContext};
use strata_core::controller::{Readiness, ViewId};
use strata_core::header::{HeaderAnimator, HeaderId, HeaderSpec, ItemHeaderNode, PlainHeader, StickDirection};
use strata_core::layout::{ContainerLayout, LayoutTransition, TransitionCurve};
use strata_core::level::{PresentationTarget, SurfaceLevel};
use strata_core::time::{Duration, HostTime, Timebase};
use strata_core::trace::{
    AttachEvent, DetachEvent, LayoutEvent, PresentEvent, ReadinessEvent, ReadyChangedEvent,
    TraceSink,
};
use strata_debug::pretty::PrettyPrintSink;
use strata_debug::recorder::RecorderSink;
use strata_harness::{CallLog, FrameClock, ReadinessScript, RecordingHostView, ScriptedController};

const FRAME_COUNT: u64 = 180;
/// 16.6ms refresh interval in nanoseconds (≈60 Hz).
const REFRESH_INTERVAL_NS: u64 = 16_666_667;

const STATUS_BAR: ViewId = ViewId(1);
const TOAST: ViewId = ViewId(10);
const ALERT: ViewId = ViewId(11);
const SHEET: ViewId = ViewId(12);

const HEADER: HeaderId = HeaderId(0);

/// Forwards every event to two sinks.
struct Tee<A, B>(A, B);

impl<A: TraceSink, B: TraceSink> TraceSink for Tee<A, B> {
    fn on_present(&mut self, e: &PresentEvent) {
        self.0.on_present(e);
        self.1.on_present(e);
    }

    fn on_readiness(&mut self, e: &ReadinessEvent) {
        self.0.on_readiness(e);
        self.1.on_readiness(e);
    }

    fn on_attach(&mut self, e: &AttachEvent) {
        self.0.on_attach(e);
        self.1.on_attach(e);
    }

    fn on_detach(&mut self, e: &DetachEvent) {
        self.0.on_detach(e);
        self.1.on_detach(e);
    }

    fn on_ready_changed(&mut self, e: &ReadyChangedEvent) {
        self.0.on_ready_changed(e);
        self.1.on_ready_changed(e);
    }

    fn on_layout(&mut self, e: &LayoutEvent) {
        self.0.on_layout(e);
        self.1.on_layout(e);
    }
}

fn main() {
    let timebase = Timebase::NANOS;

    // -- sinks -------------------------------------------------------------
    let pretty = PrettyPrintSink::new(Box::new(std::io::stdout()), timebase);
    let sink = Tee(pretty, RecorderSink::new());

    // -- context -----------------------------------------------------------
    let mut context = PresentationContext::with_sink(PresentationConfig::new(timebase), sink);
    context.set_interaction_blocked_handler(|blocked| {
        println!("[host] interaction {}", if blocked { "blocked" } else { "unblocked" });
    });
    context.set_opacity_test(|_, bounds| bounds.width() >= 390.0 && bounds.height() >= 844.0);

    let log = CallLog::new();
    let toast = ScriptedController::new(TOAST, &log).ready().into_rc();
    let alert = ScriptedController::new(ALERT, &log).into_rc();
    let sheet = ScriptedController::new(SHEET, &log).opaque().into_rc();

    let mut clock = FrameClock::new(HostTime(1_000_000_000), Duration(REFRESH_INTERVAL_NS));
    let alert_script = ReadinessScript::new().at(
        HostTime(clock.now().ticks() + 30 * REFRESH_INTERVAL_NS),
        Readiness::Ready,
    );

    // -- headers -----------------------------------------------------------
    let mut headers: HeaderAnimator<PlainHeader> = HeaderAnimator::new();
    let mut header = ItemHeaderNode::new(true, false, PlainHeader);
    header.set_bounds(Rect::new(0.0, 0.0, 390.0, 28.0));
    headers.insert(
        HeaderSpec {
            id: HEADER,
            stick_direction: StickDirection::Top,
            height: 28.0,
        },
        header,
    );

    // Queued before the host exists; attached in bulk once it does.
    context.present(toast.clone(), SurfaceLevel::ROOT, PresentOptions::new(), clock.now());
    context.set_view(Some(RecordingHostView::new().with_subview(STATUS_BAR)));
    context.set_top_level_subview(Some(STATUS_BAR));
    context.container_layout_updated(
        ContainerLayout::new(Size::new(390.0, 844.0)),
        LayoutTransition::Immediate,
    );

    // -- simulated loop ----------------------------------------------------
    for frame_index in 0..FRAME_COUNT {
        let now = clock.tick();
        alert_script.apply(&alert, now);

        match frame_index {
            10 => context.present(
                alert.clone(),
                SurfaceLevel::ROOT,
                PresentOptions::new()
                    .blocking()
                    .on_complete(|| println!("[host] alert settled")),
                now,
            ),
            20 => context.present(
                sheet.clone(),
                PresentationTarget::Window(SurfaceLevel(1)).level(),
                PresentOptions::new(),
                now,
            ),
            60 => context.container_layout_updated(
                ContainerLayout::new(Size::new(844.0, 390.0)),
                LayoutTransition::Animated {
                    duration: Duration::from_millis(300, timebase),
                    curve: TransitionCurve::Spring,
                },
            ),
            90 => {
                toast.request_dismiss();
            }
            100 => headers.add_scrolling_offset(-120.0),
            _ => {}
        }

        context.poll(now);

        if headers.is_animating() && !headers.tick(now) {
            println!("[header] settled at frame {frame_index}");
        }
    }

    let stack: Vec<_> = context.controllers().map(|(c, l)| (c.view().0, l.raw())).collect();
    println!(
        "[host] stack={stack:?} subviews={:?} opaque={}",
        context.view().map(|v| v.subviews().to_vec()).unwrap_or_default(),
        context.is_currently_opaque(),
    );

    // -- export Chrome trace -----------------------------------------------
    let Tee(_, recorder) = context.into_sink();
    let path = "strata_trace.json";
    let file = File::create(path).expect("failed to create strata_trace.json");
    let mut writer = BufWriter::new(file);
    strata_debug::chrome::export(recorder.as_bytes(), timebase, &mut writer)
        .expect("failed to write Chrome trace");

    println!("Wrote {path} ({FRAME_COUNT} frames)");
}
