// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Surface levels: named z-layers for overlay controllers, and the target a
//! presentation is routed to.

use core::fmt;

/// An ordering tag identifying the z-layer an overlay controller lives on.
///
/// Levels are totally ordered; higher levels are composited in front of lower
/// ones. Several controllers may share a level, in which case their relative
/// order is the order in which they entered the presentation stack.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SurfaceLevel(pub i32);

impl SurfaceLevel {
    /// The level of ordinary in-window overlays.
    pub const ROOT: Self = Self(0);

    /// Returns the raw level value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> i32 {
        self.0
    }
}

impl fmt::Debug for SurfaceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SurfaceLevel({})", self.0)
    }
}

/// Which presentation context a request is routed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum PresentationTarget {
    /// The context nearest the presenting controller.
    #[default]
    Current,
    /// The window's own context, on the given level.
    Window(SurfaceLevel),
}

impl PresentationTarget {
    /// The level a controller routed to this target is stacked on.
    /// [`Current`](Self::Current) uses [`SurfaceLevel::ROOT`].
    #[must_use]
    pub const fn level(self) -> SurfaceLevel {
        match self {
            Self::Current => SurfaceLevel::ROOT,
            Self::Window(level) => level,
        }
    }

    /// Whether this target names the window context.
    #[must_use]
    pub const fn is_window(self) -> bool {
        matches!(self, Self::Window(_))
    }
}
