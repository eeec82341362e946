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

/// resampling of a decoded scene history into per-object trajectories in ECEF space.
/// The frame list is walked with a fixed sample rate; consecutive samples that did not
/// move get dropped so hovering or parked objects do not inflate the output

use chrono::{DateTime,Utc};
use indexmap::IndexMap;
use serde::{Serialize,Deserialize};
use tracing::debug;

use acmi_common::{
    cartesian3::Cartesian3,
    cartographic::Cartographic,
    datetime::plus_secs_f64,
    frames::hpr_to_world,
    mat4::Mat4,
    quaternion::Quaternion,
};
use crate::{attitude, AcmiData, Frame, Transform};

/// positions closer than this in every ECEF component are considered unchanged [m]
pub const EPS_POS: f64 = 1e-6;
/// quaternions closer than this in every component are considered unchanged
pub const EPS_ORIENTATION: f64 = 1e-6;

#[derive(Debug,Clone,Serialize,Deserialize)]
pub struct TrajectoryOptions {
    /// seconds between consecutive samples
    pub sample_rate: f64,
    /// synthesize orientations from position derivatives for objects that never report any
    pub emulate_orientation: bool,
}

impl Default for TrajectoryOptions {
    fn default ()->Self {
        TrajectoryOptions { sample_rate: 1.0, emulate_orientation: false }
    }
}

#[derive(Debug,Clone,Copy,Serialize,Deserialize)]
pub struct StateVector {
    pub position: Cartesian3, // ECEF [m]
    pub orientation: Option<Quaternion>,
}

impl StateVector {
    /// homogeneous ECEF model matrix for this state. A sample without orientation
    /// yields a pure translation
    pub fn model_matrix (&self)->Mat4 {
        match &self.orientation {
            Some(q) => Mat4::from_rotation_translation( &q.to_rotation_matrix(), &self.position),
            None => Mat4::from_translation( &self.position)
        }
    }
}

#[derive(Debug,Clone,Copy,Serialize,Deserialize)]
pub struct TrajectoryPoint {
    pub time: DateTime<Utc>,
    pub state: StateVector,
}

/// time ordered state samples of one object
pub type Trajectory = Vec<TrajectoryPoint>;

/// walk the frame timeline in sample_rate steps and emit a state sample per object in the
/// frame at each step. An invalid recording yields an empty mapping
pub fn build_trajectories (data: &AcmiData, options: &TrajectoryOptions)->IndexMap<u64,Trajectory> {
    let mut trajectories: IndexMap<u64,Trajectory> = IndexMap::new();

    if !data.time_span.is_valid() || data.frames.is_empty() || options.sample_rate <= 0.0 {
        return trajectories;
    }
    let Some(start) = data.time_span.start else { return trajectories };
    let Some(end) = data.time_span.end else { return trajectories };
    let duration = data.time_span.duration_secs();

    let mut step: u64 = 0;
    let mut last_emitted = 0.0;
    loop {
        let ts = (step as f64) * options.sample_rate;
        if ts > duration { break }

        let time = plus_secs_f64( &start, ts);
        if let Some(frame) = data.get_frame( &time) {
            append_frame_samples( &mut trajectories, frame, &time, false);
        }
        last_emitted = ts;
        step += 1;
    }

    // the step loop overshot - close each trajectory with a sample at the exact end
    if last_emitted < duration {
        if let Some(frame) = data.get_frame( &end) {
            append_frame_samples( &mut trajectories, frame, &end, true);
        }
    }

    if options.emulate_orientation {
        for (_id, trajectory) in trajectories.iter_mut() {
            let source_has_orientation = trajectory.first()
                .map( |p| p.state.orientation.is_some()).unwrap_or( true);
            if !source_has_orientation {
                attitude::emulate_orientation( trajectory, true);
            }
        }
    }

    debug!("built {} trajectories over {:.1} sec", trajectories.len(), duration);
    trajectories
}

fn append_frame_samples (trajectories: &mut IndexMap<u64,Trajectory>, frame: &Frame,
                         time: &DateTime<Utc>, last_frame: bool) {
    for (id, transform) in frame.scene.iter() {
        let state = state_vector_of( transform);
        let trajectory = trajectories.entry( *id).or_default();

        if !last_frame {
            if let Some(prev) = trajectory.last() {
                if same_state( &prev.state, &state) { continue }
            }
        }
        if let Some(prev) = trajectory.last() {
            if *time <= prev.time { continue } // samples have to be strictly increasing in time
        }
        trajectory.push( TrajectoryPoint { time: *time, state });
    }
}

/// ECEF state for a decoded transform. Orientation is only constructed if the source
/// reported a yaw; missing pitch/roll default to level
fn state_vector_of (transform: &Transform)->StateVector {
    let position = Cartesian3::from( Cartographic::from_degrees(
        transform.longitude, transform.latitude, transform.altitude));

    let orientation = transform.yaw.map( |yaw| {
        hpr_to_world( yaw, transform.pitch.unwrap_or(0.0), transform.roll.unwrap_or(0.0), &position)
    });

    StateVector { position, orientation }
}

fn same_state (a: &StateVector, b: &StateVector)->bool {
    if !a.position.approx_eq( &b.position, EPS_POS) { return false }

    match (&a.orientation, &b.orientation) {
        (Some(qa), Some(qb)) => qa.approx_eq( qb, EPS_ORIENTATION),
        (None, None) => true,
        _ => false
    }
}
