/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

/// attitude synthesis for position-only trajectories.
/// The body x axis is aligned with the discrete velocity, the bank angle follows a
/// coordinated turn model (tan φ = v·ω/g) with exponential smoothing so sample noise
/// does not make the aircraft wobble

use acmi_common::{
    abs, atan, signum,
    cartesian3::Cartesian3,
    datetime::secs_between,
    frames::{hpr_to_world, rotation_from_position_velocity, world_to_hpr},
    geo_constants::STANDARD_GRAVITY,
    quaternion::Quaternion,
    PI, TWO_PI,
};
use crate::trajectory::TrajectoryPoint;

/// below this speed [m/s] the velocity direction is considered undefined
const EPS_SPEED: f64 = 1e-6;
/// exponential smoothing factor for successive roll estimates
const ROLL_SMOOTHING: f64 = 0.05;
/// smoothed roll magnitudes below 1 degree snap to level flight
const ROLL_DEADBAND: f64 = PI / 180.0;

/// synthesize orientations for a position-only sample sequence. With less than three
/// samples there is no usable derivative and every sample gets the level local attitude.
/// The last two samples reuse the last synthesized attitude
pub fn emulate_orientation (samples: &mut [TrajectoryPoint], with_roll: bool) {
    let n = samples.len();
    if n < 3 {
        for s in samples.iter_mut() {
            s.state.orientation = Some( hpr_to_world( 0.0, 0.0, 0.0, &s.state.position));
        }
        return;
    }

    let mut roll_estimator = RollEstimator::new();

    for i in 0..=(n-3) {
        let p0 = samples[i].state.position;
        let p1 = samples[i+1].state.position;
        let p2 = samples[i+2].state.position;

        let dt0 = secs_between( &samples[i].time, &samples[i+1].time);
        let v0 = (p1 - p0) / dt0;
        let speed = v0.length();

        let q = if speed <= EPS_SPEED {
            hpr_to_world( 0.0, 0.0, 0.0, &p0)
        } else {
            let v0n = v0 / speed;
            let r0 = rotation_from_position_velocity( &p0, &v0n);
            let q0 = Quaternion::from_rotation_matrix( &r0);

            let mut roll = 0.0;
            if with_roll {
                let dt1 = secs_between( &samples[i+1].time, &samples[i+2].time);
                let v1 = (p2 - p1) / dt1;
                if v1.length() > EPS_SPEED {
                    let v1n = v1.scaled_to_unit_length();
                    let r1 = rotation_from_position_velocity( &p1, &v1n);
                    let q1 = Quaternion::from_rotation_matrix( &r1);
                    roll = roll_estimator.compute( &p0, &q0, &p1, &q1, speed, dt0);
                }
            }

            // apply the bank about the velocity axis
            Quaternion::from_axis_angle( &v0n, roll) * q0
        };
        samples[i].state.orientation = Some(q);
    }

    let q_tail = samples[n-3].state.orientation;
    samples[n-2].state.orientation = q_tail;
    samples[n-1].state.orientation = q_tail;
}

/// coordinated turn bank estimation. The estimator state is the smoothed roll of the
/// previous step, so one estimator must not be reused across trajectories
struct RollEstimator {
    last_roll: f64,
}

impl RollEstimator {
    fn new ()->Self {
        RollEstimator { last_roll: 0.0 }
    }

    fn compute (&mut self, p0: &Cartesian3, q0: &Quaternion, p1: &Cartesian3, q1: &Quaternion,
                speed: f64, dt: f64)->f64 {
        let (h0,_,_) = world_to_hpr( q0, p0);
        let (h1,_,_) = world_to_hpr( q1, p1);

        let mut delta = h1 - h0;
        let mut angle = abs( delta);
        if angle > PI { // take the short way around
            angle = TWO_PI - angle;
            delta = TWO_PI + delta;
        }
        let turn = signum( delta) * angle;

        let raw = atan( speed * turn / (STANDARD_GRAVITY * dt));

        let mut smooth = ROLL_SMOOTHING * raw + (1.0 - ROLL_SMOOTHING) * self.last_roll;
        if abs( smooth) < ROLL_DEADBAND { smooth = 0.0 }
        self.last_roll = smooth;
        smooth
    }
}
