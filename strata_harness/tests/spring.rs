// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Convergence of the header spring over its whole operating range.

use proptest::prelude::*;
use strata_core::spring::{SpringConfig, SpringModel, SpringParameters, SpringStep};

const BOUND: f64 = 250.0;
const MAX_STEPS: usize = 600;

fn header_spring(velocity: f64) -> SpringModel {
    let mut spring = SpringModel::new(SpringParameters::HEADER_BOUNCE, SpringConfig::LIST_HEADER);
    spring.set_velocity(velocity);
    spring
}

proptest! {
    /// Any start inside the bound settles exactly at rest without escaping it.
    #[test]
    fn settles_from_any_start(offset in -BOUND..=BOUND, velocity in -BOUND..=BOUND) {
        let mut spring = header_spring(velocity);
        let mut current = offset;
        let mut settled = false;

        for _ in 0..MAX_STEPS {
            let (next, state) = spring.step(current);
            prop_assert!(next.abs() <= BOUND, "offset {} escaped the bound", next);
            current = next;
            if state == SpringStep::Settled {
                settled = true;
                break;
            }
        }

        prop_assert!(settled, "({}, {}) did not settle", offset, velocity);
        prop_assert_eq!(current, 0.0);
        prop_assert_eq!(spring.velocity(), 0.0);
    }

    /// Once settled, stepping from rest stays at rest.
    #[test]
    fn rest_is_a_fixed_point(offset in -BOUND..=BOUND) {
        let mut spring = header_spring(0.0);
        let mut current = offset;
        for _ in 0..MAX_STEPS {
            let (next, state) = spring.step(current);
            current = next;
            if !state.is_animating() {
                break;
            }
        }
        for _ in 0..10 {
            prop_assert_eq!(spring.step(0.0), (0.0, SpringStep::Settled));
        }
    }
}
