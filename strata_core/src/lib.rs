// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlay presentation stack and header spring dynamics.
//!
//! `strata_core` orchestrates *when* and *in what order* overlay controllers
//! are attached to a host surface, and *how* sticky list headers bounce while
//! a list scrolls. It is `no_std` compatible (with `alloc`) and never reads a
//! clock: the host passes [`HostTime`](time::HostTime) values into every call
//! that needs one.
//!
//! # Architecture
//!
//! ```text
//!   Host window                         Host list view
//!       │ set_view / container_layout_updated   │ scroll deltas, frame ticks
//!       ▼                                        ▼
//!   PresentationContext ◄── poll(now)        HeaderAnimator
//!       │  present ──► ReadinessWait             │
//!       │                 │ Ready | TimedOut     ▼
//!       │ ◄───────────────┘                  ItemHeaderNode ──► SpringModel
//!       ▼
//!   HostView (insert / remove controller views)
//! ```
//!
//! **[`context`]** — The [`PresentationContext`](context::PresentationContext):
//! an ordered stack of hosted controllers keyed by [`SurfaceLevel`](level::SurfaceLevel),
//! readiness-gated attach/detach, interaction blocking and layout propagation.
//!
//! **[`controller`]** — The [`HostedController`](controller::HostedController)
//! capability trait and the [`HostView`](controller::HostView) trait that
//! host surfaces implement.
//!
//! **[`readiness`]** — Deadline-bounded one-shot waits on a controller's
//! readiness signal.
//!
//! **[`interaction`]** — Edge-triggered interaction blocking with scoped
//! token guards.
//!
//! **[`spring`]** — Explicit-Euler damped oscillator used for header bounce.
//!
//! **[`header`]** — [`ItemHeaderNode`](header::ItemHeaderNode) and the
//! per-frame [`HeaderAnimator`](header::HeaderAnimator).
//!
//! **[`layout`]**, **[`level`]**, **[`orientation`]** — Layout snapshots,
//! surface levels, orientation and screen-edge masks.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! presentation instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod context;
pub mod controller;
pub mod header;
pub mod interaction;
pub mod layout;
pub mod level;
pub mod orientation;
pub mod readiness;
pub mod spring;
pub mod time;
pub mod trace;
