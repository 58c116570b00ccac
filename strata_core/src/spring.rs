// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Discrete damped-oscillator integrator for header bounce.
//!
//! A [`SpringModel`] pulls a 1-D offset back towards zero. It owns only the
//! velocity; the offset lives in the caller's geometry and is passed in and
//! returned by [`SpringModel::step`].
//!
//! Each step is one explicit-Euler update over a fixed frame time:
//!
//! ```text
//! friction  = velocity * f
//! spring    = -offset * k
//! velocity' = velocity + (spring - friction) * dt
//! offset'   = offset + velocity' * dt
//! ```
//!
//! The integrator is not physically exact. What it guarantees is determinism
//! and boundedness: a NaN offset collapses to zero, both values snap to
//! exactly zero once they are inside `epsilon`, and the offset magnitude never
//! exceeds `max_offset`.

/// Integration constants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    /// Friction constant `f` applied to the velocity.
    pub friction: f64,
    /// Spring constant `k` applied to the offset.
    pub constant: f64,
    /// Fixed step length in seconds.
    pub time_step: f64,
    /// Offset and velocity magnitudes below this snap to zero.
    pub epsilon: f64,
    /// Largest offset magnitude the integrator will produce.
    pub max_offset: f64,
}

impl SpringConfig {
    /// Constants used for list header scroll dynamics: one step per 60 Hz
    /// frame, settling within a tenth of a point, and never drifting more
    /// than 250 points.
    pub const LIST_HEADER: Self = Self {
        friction: 31.821_126_937_866_2,
        constant: 443.704_223_632_812,
        time_step: 1.0 / 60.0,
        epsilon: 0.1,
        max_offset: 250.0,
    };
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::LIST_HEADER
    }
}

/// The declared physical parameters of a spring.
///
/// These describe the spring for callers that drive platform spring
/// animations from the same values. The Euler integrator itself is driven by
/// [`SpringConfig`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringParameters {
    /// Stiffness.
    pub stiffness: f64,
    /// Damping.
    pub damping: f64,
    /// Mass.
    pub mass: f64,
}

impl SpringParameters {
    /// Parameters of the header bounce spring.
    pub const HEADER_BOUNCE: Self = Self {
        stiffness: -280.0,
        damping: -24.0,
        mass: 0.85,
    };
}

/// Result of one integration step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpringStep {
    /// Offset and velocity are exactly zero; no further steps are needed.
    Settled,
    /// The spring is still moving.
    Animating,
}

impl SpringStep {
    /// Whether the caller must schedule another step.
    #[inline]
    #[must_use]
    pub const fn is_animating(self) -> bool {
        matches!(self, Self::Animating)
    }
}

/// Velocity state plus constants for one spring.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringModel {
    parameters: SpringParameters,
    config: SpringConfig,
    velocity: f64,
}

impl SpringModel {
    /// Creates a spring at rest.
    #[must_use]
    pub const fn new(parameters: SpringParameters, config: SpringConfig) -> Self {
        Self {
            parameters,
            config,
            velocity: 0.0,
        }
    }

    /// The declared physical parameters.
    #[must_use]
    pub const fn parameters(&self) -> SpringParameters {
        self.parameters
    }

    /// The integration constants.
    #[must_use]
    pub const fn config(&self) -> SpringConfig {
        self.config
    }

    /// Current velocity, in offset units per second.
    #[must_use]
    pub const fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Overrides the velocity, e.g. to hand over a fling.
    pub fn set_velocity(&mut self, velocity: f64) {
        self.velocity = velocity;
    }

    /// Advances one step from `offset`, returning the new offset and whether
    /// the spring has settled.
    pub fn step(&mut self, offset: f64) -> (f64, SpringStep) {
        let SpringConfig {
            friction,
            constant,
            time_step,
            epsilon,
            max_offset,
        } = self.config;

        let friction_force = self.velocity * friction;
        let spring_force = -offset * constant;
        let force = spring_force - friction_force;

        self.velocity += force * time_step;
        let mut next = offset + self.velocity * time_step;
        if next.is_nan() {
            next = 0.0;
        }

        let state = if next.abs() < epsilon && self.velocity.abs() < epsilon {
            next = 0.0;
            self.velocity = 0.0;
            SpringStep::Settled
        } else {
            SpringStep::Animating
        };

        if next.abs() > max_offset {
            next = if next < 0.0 { -max_offset } else { max_offset };
        }

        (next, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_spring() -> SpringModel {
        SpringModel::new(SpringParameters::HEADER_BOUNCE, SpringConfig::LIST_HEADER)
    }

    /// Runs until settled, asserting the bound on every step. Returns the
    /// number of steps taken.
    fn run_to_rest(spring: &mut SpringModel, mut offset: f64) -> usize {
        for steps in 1..=2_000 {
            let (next, state) = spring.step(offset);
            assert!(next.abs() <= 250.0, "offset {next} escaped the bound");
            offset = next;
            if state == SpringStep::Settled {
                assert_eq!(offset, 0.0);
                assert_eq!(spring.velocity(), 0.0);
                return steps;
            }
        }
        panic!("spring did not settle from offset {offset}");
    }

    #[test]
    fn converges_from_extremes() {
        for &(offset, velocity) in &[
            (250.0, 0.0),
            (-250.0, 0.0),
            (0.0, 250.0),
            (0.0, -250.0),
            (250.0, 250.0),
            (-250.0, 250.0),
            (37.5, -12.0),
        ] {
            let mut spring = header_spring();
            spring.set_velocity(velocity);
            let steps = run_to_rest(&mut spring, offset);
            assert!(steps < 600, "({offset}, {velocity}) took {steps} steps");
        }
    }

    #[test]
    fn settled_stays_settled() {
        let mut spring = header_spring();
        let (offset, state) = spring.step(0.0);
        assert_eq!(state, SpringStep::Settled);
        assert_eq!(offset, 0.0);

        for _ in 0..10 {
            let (offset, state) = spring.step(0.0);
            assert_eq!((offset, state), (0.0, SpringStep::Settled));
            assert_eq!(spring.velocity(), 0.0);
        }
    }

    #[test]
    fn nan_offset_collapses_to_zero() {
        let mut spring = header_spring();
        let (offset, _) = spring.step(f64::NAN);
        assert_eq!(offset, 0.0);
    }

    #[test]
    fn clamp_preserves_sign() {
        let mut spring = header_spring();
        spring.set_velocity(-100_000.0);
        let (offset, state) = spring.step(-240.0);
        assert_eq!(offset, -250.0);
        assert!(state.is_animating());

        let mut spring = header_spring();
        spring.set_velocity(100_000.0);
        let (offset, _) = spring.step(240.0);
        assert_eq!(offset, 250.0);
    }

    #[test]
    fn one_step_matches_hand_computation() {
        let mut spring = header_spring();
        let cfg = SpringConfig::LIST_HEADER;
        let (offset, _) = spring.step(100.0);

        let velocity = -100.0 * cfg.constant * cfg.time_step;
        let expected = 100.0 + velocity * cfg.time_step;
        assert!((spring.velocity() - velocity).abs() < 1e-9);
        assert!((offset - expected).abs() < 1e-9);
    }
}
