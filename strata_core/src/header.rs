// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sticky list headers with optional scroll dynamics.
//!
//! An [`ItemHeaderNode`] is the view-side state of a section header in a
//! virtualized list. When created with scroll dynamics it owns a
//! [`SpringModel`]: while the header floats freely (stick distance factor of
//! exactly zero) scroll deltas push its bounds origin around, and each frame
//! [`animate`](ItemHeaderNode::animate) pulls it back to rest.
//!
//! Presentation-specific behavior (repositioning as the header sticks, showing
//! a transient affordance while scrolling) is supplied through a
//! [`HeaderDelegate`].
//!
//! [`HeaderAnimator`] is the list-view side: it keeps every live header node
//! and ticks all of them once per frame while any is still moving.

use alloc::vec::Vec;

use kurbo::{Point, Rect};

use crate::layout::LayoutTransition;
use crate::spring::{SpringConfig, SpringModel, SpringParameters};
use crate::time::HostTime;

/// Hooks a concrete header implements to react to list state.
pub trait HeaderDelegate {
    /// The header's stick distance factor changed. `factor` is in `0.0..=1.0`:
    /// `0.0` floats freely, `1.0` is fully stuck to its anchor edge.
    fn update_stick_distance_factor(&mut self, factor: f64, transition: LayoutTransition) {
        _ = (factor, transition);
    }

    /// The "flashing while scrolling" state flipped. Only called on change.
    fn update_flashing_on_scrolling(&mut self, is_flashing: bool, animated: bool) {
        _ = (is_flashing, animated);
    }
}

/// A [`HeaderDelegate`] that ignores every hook.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainHeader;

impl HeaderDelegate for PlainHeader {}

/// View state of one list header.
#[derive(Debug)]
pub struct ItemHeaderNode<D = PlainHeader> {
    delegate: D,
    spring: Option<SpringModel>,
    is_rotated: bool,
    bounds: Rect,
    stick_distance_factor: f64,
    stick_location_distance: f64,
    is_flashing: bool,
}

impl<D: HeaderDelegate> ItemHeaderNode<D> {
    /// Creates a header node.
    ///
    /// With `wants_scroll_dynamics`, the node allocates a header bounce
    /// spring; otherwise scroll offsets are ignored and
    /// [`animate`](Self::animate) never asks for another frame.
    #[must_use]
    pub fn new(wants_scroll_dynamics: bool, is_rotated: bool, delegate: D) -> Self {
        let spring = wants_scroll_dynamics.then(|| {
            SpringModel::new(SpringParameters::HEADER_BOUNCE, SpringConfig::LIST_HEADER)
        });
        Self {
            delegate,
            spring,
            is_rotated,
            bounds: Rect::ZERO,
            stick_distance_factor: 0.0,
            stick_location_distance: 0.0,
            is_flashing: false,
        }
    }

    /// Whether the node was created with scroll dynamics.
    #[must_use]
    pub fn wants_scroll_dynamics(&self) -> bool {
        self.spring.is_some()
    }

    /// Whether the owning list is rotated (e.g. an inverted chat list).
    #[must_use]
    pub fn is_rotated(&self) -> bool {
        self.is_rotated
    }

    /// The header's bounds. The origin's y component is the dynamic offset.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Replaces the bounds.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    /// Current dynamic offset.
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.bounds.y0
    }

    /// Current spring velocity, or zero without scroll dynamics.
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.spring.as_ref().map_or(0.0, SpringModel::velocity)
    }

    /// The spring, if the node has scroll dynamics.
    #[must_use]
    pub fn spring(&self) -> Option<&SpringModel> {
        self.spring.as_ref()
    }

    /// Current stick distance factor.
    #[must_use]
    pub fn stick_distance_factor(&self) -> f64 {
        self.stick_distance_factor
    }

    /// Distance from the header to its stick location, as last reported by the
    /// list.
    #[must_use]
    pub fn stick_location_distance(&self) -> f64 {
        self.stick_location_distance
    }

    /// Records the distance from the header to its stick location.
    pub fn set_stick_location_distance(&mut self, distance: f64) {
        self.stick_location_distance = distance;
    }

    /// Whether the header is currently flashing while scrolling.
    #[must_use]
    pub fn is_flashing_on_scrolling(&self) -> bool {
        self.is_flashing
    }

    /// The delegate.
    #[must_use]
    pub fn delegate(&self) -> &D {
        &self.delegate
    }

    /// The delegate, mutably.
    pub fn delegate_mut(&mut self) -> &mut D {
        &mut self.delegate
    }

    /// Records how stuck the header is and forwards it to the delegate.
    ///
    /// Only a factor of exactly zero lets scroll offsets move the header.
    pub fn update_stick_distance_factor(&mut self, factor: f64, transition: LayoutTransition) {
        self.stick_distance_factor = factor;
        self.delegate.update_stick_distance_factor(factor, transition);
    }

    /// Updates the flashing state, notifying the delegate only on change.
    pub fn update_flashing_on_scrolling(&mut self, is_flashing: bool, animated: bool) {
        if self.is_flashing != is_flashing {
            self.is_flashing = is_flashing;
            self.delegate.update_flashing_on_scrolling(is_flashing, animated);
        }
    }

    /// Moves a freely floating header by a scroll delta.
    ///
    /// No-op without scroll dynamics or while the header is being pulled
    /// towards its stick position.
    pub fn add_scrolling_offset(&mut self, delta: f64) {
        if self.spring.is_some() && self.stick_distance_factor == 0.0 {
            self.set_offset(self.bounds.y0 + delta);
        }
    }

    /// Advances the spring by one frame and writes the new offset back.
    ///
    /// Returns whether another frame is needed. Without scroll dynamics there
    /// is never anything to animate.
    pub fn animate(&mut self, now: HostTime) -> bool {
        _ = now;
        let Some(spring) = &mut self.spring else {
            return false;
        };
        let (offset, step) = spring.step(self.bounds.y0);
        self.set_offset(offset);
        step.is_animating()
    }

    fn set_offset(&mut self, y: f64) {
        self.bounds = Rect::from_origin_size(Point::new(0.0, y), self.bounds.size());
    }
}

/// Identifies a header within a list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HeaderId(pub i64);

/// Which list edge a header sticks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StickDirection {
    /// Sticks to the top edge.
    Top,
    /// Sticks to the bottom edge.
    Bottom,
}

/// The list-model description of a header.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeaderSpec {
    /// Stable identity.
    pub id: HeaderId,
    /// Edge the header sticks to.
    pub stick_direction: StickDirection,
    /// Header height.
    pub height: f64,
}

/// Drives every live header node of a list once per frame.
#[derive(Debug)]
pub struct HeaderAnimator<D = PlainHeader> {
    headers: Vec<(HeaderSpec, ItemHeaderNode<D>)>,
    animating: bool,
}

impl<D> Default for HeaderAnimator<D> {
    fn default() -> Self {
        Self {
            headers: Vec::new(),
            animating: false,
        }
    }
}

impl<D: HeaderDelegate> HeaderAnimator<D> {
    /// Creates an animator with no headers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header, replacing (and returning) any node with the same id.
    pub fn insert(&mut self, spec: HeaderSpec, node: ItemHeaderNode<D>) -> Option<ItemHeaderNode<D>> {
        if let Some(slot) = self.headers.iter_mut().find(|(s, _)| s.id == spec.id) {
            slot.0 = spec;
            return Some(core::mem::replace(&mut slot.1, node));
        }
        self.headers.push((spec, node));
        None
    }

    /// Removes a header.
    pub fn remove(&mut self, id: HeaderId) -> Option<ItemHeaderNode<D>> {
        let index = self.headers.iter().position(|(s, _)| s.id == id)?;
        Some(self.headers.remove(index).1)
    }

    /// Looks up a header node.
    #[must_use]
    pub fn get(&self, id: HeaderId) -> Option<&ItemHeaderNode<D>> {
        self.headers.iter().find(|(s, _)| s.id == id).map(|(_, n)| n)
    }

    /// Looks up a header node mutably.
    pub fn get_mut(&mut self, id: HeaderId) -> Option<&mut ItemHeaderNode<D>> {
        self.headers
            .iter_mut()
            .find(|(s, _)| s.id == id)
            .map(|(_, n)| n)
    }

    /// Iterates over headers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&HeaderSpec, &ItemHeaderNode<D>)> {
        self.headers.iter().map(|(s, n)| (s, n))
    }

    /// Number of headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Whether there are no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Forwards a scroll delta to every header.
    pub fn add_scrolling_offset(&mut self, delta: f64) {
        for (_, node) in &mut self.headers {
            node.add_scrolling_offset(delta);
        }
        if delta != 0.0 {
            self.animating = self.headers.iter().any(|(_, n)| n.wants_scroll_dynamics());
        }
    }

    /// Animates every header by one frame. Returns whether any header needs
    /// another frame.
    pub fn tick(&mut self, now: HostTime) -> bool {
        let mut animating = false;
        for (_, node) in &mut self.headers {
            animating |= node.animate(now);
        }
        self.animating = animating;
        animating
    }

    /// Whether the list should keep scheduling frames for its headers.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animating
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use kurbo::Size;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        factors: Vec<f64>,
        flashes: Vec<(bool, bool)>,
    }

    impl HeaderDelegate for Recorder {
        fn update_stick_distance_factor(&mut self, factor: f64, _: LayoutTransition) {
            self.factors.push(factor);
        }

        fn update_flashing_on_scrolling(&mut self, is_flashing: bool, animated: bool) {
            self.flashes.push((is_flashing, animated));
        }
    }

    fn dynamic_node() -> ItemHeaderNode<Recorder> {
        let mut node = ItemHeaderNode::new(true, false, Recorder::default());
        node.set_bounds(Rect::from_origin_size(Point::ORIGIN, Size::new(320.0, 28.0)));
        node
    }

    #[test]
    fn scrolling_moves_only_free_dynamic_headers() {
        let mut node = dynamic_node();
        node.add_scrolling_offset(12.0);
        assert_eq!(node.offset(), 12.0);
        assert_eq!(node.bounds().size(), Size::new(320.0, 28.0));

        node.update_stick_distance_factor(0.5, LayoutTransition::Immediate);
        node.add_scrolling_offset(10.0);
        assert_eq!(node.offset(), 12.0, "stuck header ignores scroll offsets");

        let mut still = ItemHeaderNode::new(false, false, PlainHeader);
        still.add_scrolling_offset(10.0);
        assert_eq!(still.offset(), 0.0);
        assert!(!still.animate(HostTime(0)), "no spring means nothing to animate");
    }

    #[test]
    fn animate_returns_to_rest() {
        let mut node = dynamic_node();
        node.add_scrolling_offset(-80.0);

        let mut frames = 0;
        while node.animate(HostTime(frames)) {
            frames += 1;
            assert!(node.offset().abs() <= 250.0);
            assert!(frames < 600, "header never settled");
        }
        assert_eq!(node.offset(), 0.0);
        assert_eq!(node.velocity(), 0.0);
        assert!(!node.animate(HostTime(frames + 1)), "settled stays settled");
    }

    #[test]
    fn flashing_hook_is_edge_triggered() {
        let mut node = dynamic_node();
        node.update_flashing_on_scrolling(false, true);
        node.update_flashing_on_scrolling(true, true);
        node.update_flashing_on_scrolling(true, false);
        node.update_flashing_on_scrolling(false, false);
        assert_eq!(node.delegate().flashes, vec![(true, true), (false, false)]);
    }

    #[test]
    fn stick_factor_reaches_delegate() {
        let mut node = dynamic_node();
        node.update_stick_distance_factor(1.0, LayoutTransition::Immediate);
        node.update_stick_distance_factor(0.0, LayoutTransition::Immediate);
        assert_eq!(node.delegate().factors, vec![1.0, 0.0]);
        assert_eq!(node.stick_distance_factor(), 0.0);
    }

    #[test]
    fn animator_ticks_until_every_header_rests() {
        let mut animator = HeaderAnimator::new();
        for id in 0..3 {
            let spec = HeaderSpec {
                id: HeaderId(id),
                stick_direction: StickDirection::Top,
                height: 28.0,
            };
            animator.insert(spec, ItemHeaderNode::new(id != 1, false, PlainHeader));
        }

        animator.add_scrolling_offset(40.0);
        assert!(animator.is_animating());
        assert_eq!(animator.get(HeaderId(1)).map(ItemHeaderNode::offset), Some(0.0));

        let mut frames = 0_u64;
        while animator.tick(HostTime(frames)) {
            frames += 1;
            assert!(frames < 600, "headers never settled");
        }
        assert!(!animator.is_animating());
        assert!(animator.iter().all(|(_, n)| n.offset() == 0.0));
    }

    #[test]
    fn animator_insert_replaces_same_id() {
        let mut animator: HeaderAnimator = HeaderAnimator::new();
        let spec = HeaderSpec {
            id: HeaderId(5),
            stick_direction: StickDirection::Bottom,
            height: 20.0,
        };
        assert!(animator.insert(spec, ItemHeaderNode::new(false, false, PlainHeader)).is_none());
        let replaced = animator.insert(spec, ItemHeaderNode::new(true, true, PlainHeader));
        assert!(replaced.is_some_and(|n| !n.wants_scroll_dynamics()));
        assert_eq!(animator.len(), 1);
        assert!(animator.get(HeaderId(5)).is_some_and(ItemHeaderNode::is_rotated));
        assert!(animator.remove(HeaderId(5)).is_some());
        assert!(animator.is_empty());
    }
}
