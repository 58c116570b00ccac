// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interface orientation and screen-edge masks.
//!
//! Hosted controllers declare which orientations they support and which
//! screen-edge system gestures should be deferred while they are visible. The
//! presentation context folds these over the whole stack: orientations by
//! intersection, deferred edges by union.

use bitflags::bitflags;

bitflags! {
    /// A set of interface orientations.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct OrientationMask: u8 {
        /// Upright portrait.
        const PORTRAIT = 1 << 0;
        /// Portrait, rotated 180°.
        const PORTRAIT_UPSIDE_DOWN = 1 << 1;
        /// Landscape with the top edge on the left.
        const LANDSCAPE_LEFT = 1 << 2;
        /// Landscape with the top edge on the right.
        const LANDSCAPE_RIGHT = 1 << 3;

        /// Both landscape orientations.
        const LANDSCAPE = Self::LANDSCAPE_LEFT.bits() | Self::LANDSCAPE_RIGHT.bits();
        /// Every orientation except upside-down portrait.
        const ALL_BUT_UPSIDE_DOWN = Self::PORTRAIT.bits() | Self::LANDSCAPE.bits();
        /// Every orientation.
        const ALL = Self::ALL_BUT_UPSIDE_DOWN.bits() | Self::PORTRAIT_UPSIDE_DOWN.bits();
    }
}

bitflags! {
    /// A set of screen edges.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ScreenEdges: u8 {
        /// Top edge.
        const TOP = 1 << 0;
        /// Left edge.
        const LEFT = 1 << 1;
        /// Bottom edge.
        const BOTTOM = 1 << 2;
        /// Right edge.
        const RIGHT = 1 << 3;

        /// All four edges.
        const ALL = Self::TOP.bits() | Self::LEFT.bits() | Self::BOTTOM.bits() | Self::RIGHT.bits();
    }
}

/// Supported orientations, split by horizontal size class.
///
/// Compact-width containers (phones) and regular-width containers (tablets,
/// split views) may allow different orientations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SupportedOrientations {
    /// Orientations allowed in a regular-width container.
    pub regular: OrientationMask,
    /// Orientations allowed in a compact-width container.
    pub compact: OrientationMask,
}

impl SupportedOrientations {
    /// Every orientation in both size classes.
    pub const ALL: Self = Self::uniform(OrientationMask::ALL);

    /// The same mask for both size classes.
    #[inline]
    #[must_use]
    pub const fn uniform(mask: OrientationMask) -> Self {
        Self {
            regular: mask,
            compact: mask,
        }
    }

    /// Orientations allowed by both `self` and `other`, per size class.
    #[inline]
    #[must_use]
    pub fn intersection(self, other: Self) -> Self {
        Self {
            regular: self.regular & other.regular,
            compact: self.compact & other.compact,
        }
    }
}

impl Default for SupportedOrientations {
    fn default() -> Self {
        Self::ALL
    }
}
