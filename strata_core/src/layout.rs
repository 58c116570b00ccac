// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Container layout snapshots and layout transitions.
//!
//! A [`ContainerLayout`] is an immutable description of the space the host
//! gives to the overlay stack. The presentation context caches the latest one
//! and hands it to every hosted controller; controllers compare snapshots to
//! decide whether they need to lay out again.

use kurbo::{Insets, Point, Rect, Size};

use crate::orientation::OrientationMask;
use crate::time::Duration;

/// A snapshot of the host container's geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContainerLayout {
    /// Size of the container.
    pub size: Size,
    /// Insets that content should avoid (notches, home indicators, rounded
    /// corners).
    pub safe_insets: Insets,
    /// Height of the status bar, if one is visible.
    pub status_bar_height: Option<f64>,
    /// Height of an on-screen input surface (e.g. a keyboard), if shown.
    pub input_height: Option<f64>,
}

impl ContainerLayout {
    /// Creates a layout of the given size with no insets or bars.
    #[must_use]
    pub const fn new(size: Size) -> Self {
        Self {
            size,
            safe_insets: Insets::ZERO,
            status_bar_height: None,
            input_height: None,
        }
    }

    /// Returns a copy with the given safe-area insets.
    #[must_use]
    pub const fn with_safe_insets(mut self, insets: Insets) -> Self {
        self.safe_insets = insets;
        self
    }

    /// Returns a copy with the given status bar height.
    #[must_use]
    pub const fn with_status_bar_height(mut self, height: Option<f64>) -> Self {
        self.status_bar_height = height;
        self
    }

    /// Returns a copy with the given input surface height.
    #[must_use]
    pub const fn with_input_height(mut self, height: Option<f64>) -> Self {
        self.input_height = height;
        self
    }

    /// The frame a full-container controller occupies: the layout size at the
    /// origin.
    #[must_use]
    pub fn frame(&self) -> Rect {
        Rect::from_origin_size(Point::ORIGIN, self.size)
    }

    /// Whether the container is taller than it is wide.
    #[must_use]
    pub fn is_portrait(&self) -> bool {
        self.size.width < self.size.height
    }

    /// The orientation mask matching this layout's aspect ratio.
    ///
    /// Used to pin a controller to the orientation it was presented in.
    #[must_use]
    pub fn matching_orientations(&self) -> OrientationMask {
        if self.is_portrait() {
            OrientationMask::PORTRAIT
        } else {
            OrientationMask::LANDSCAPE
        }
    }
}

/// Timing curve for an animated layout transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionCurve {
    /// Symmetric ease-in / ease-out.
    EaseInOut,
    /// The platform's default spring curve.
    Spring,
    /// Constant velocity.
    Linear,
}

/// How a layout change should be applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum LayoutTransition {
    /// Apply the new layout without animation.
    #[default]
    Immediate,
    /// Animate towards the new layout.
    Animated {
        /// Animation length in host ticks.
        duration: Duration,
        /// Timing curve.
        curve: TransitionCurve,
    },
}

impl LayoutTransition {
    /// Whether this transition animates.
    #[must_use]
    pub const fn is_animated(&self) -> bool {
        matches!(self, Self::Animated { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_ratio_picks_orientation() {
        let portrait = ContainerLayout::new(Size::new(390.0, 844.0));
        let landscape = ContainerLayout::new(Size::new(844.0, 390.0));
        let square = ContainerLayout::new(Size::new(500.0, 500.0));

        assert_eq!(portrait.matching_orientations(), OrientationMask::PORTRAIT);
        assert_eq!(landscape.matching_orientations(), OrientationMask::LANDSCAPE);
        // Width < height is strict, so a square container counts as landscape.
        assert_eq!(square.matching_orientations(), OrientationMask::LANDSCAPE);
    }

    #[test]
    fn frame_is_anchored_at_origin() {
        let layout = ContainerLayout::new(Size::new(320.0, 480.0))
            .with_safe_insets(Insets::new(0.0, 20.0, 0.0, 34.0));
        assert_eq!(layout.frame(), Rect::new(0.0, 0.0, 320.0, 480.0));
    }

    #[test]
    fn snapshots_compare_by_value() {
        let a = ContainerLayout::new(Size::new(320.0, 480.0));
        let b = a.with_input_height(Some(216.0));
        assert_ne!(a, b);
        assert_eq!(a, ContainerLayout::new(Size::new(320.0, 480.0)));
    }
}
