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
#![allow(unused)]

use acmi_common::cartesian3::Cartesian3;
use acmi_common::cartographic::Cartographic;
use acmi_common::datetime::secs_between;
use acmi_track::{parse_acmi, AcmiData, ParseOptions, TrajectoryOptions};
use acmi_track::trajectory::EPS_POS;

/// trajectory builder tests. run with "cargo test test_two_samples -- --nocapture"

const MINIMAL: &str = "FileType=text/acmi/tacview\n\
FileVersion=2.2\n\
0,ReferenceTime=2024-01-01T00:00:00Z\n\
0,ReferenceLongitude=0\n\
0,ReferenceLatitude=0\n\
#0\n\
a,T=0|0|0,Name=x,Type=Air+FixedWing\n\
#1\n\
a,T=0.0001|0|100\n";

async fn parse (input: &str)->AcmiData {
    parse_acmi( input.as_bytes(), ParseOptions::default()).await.unwrap()
}

#[tokio::test]
async fn test_two_samples () {
    let data = parse( MINIMAL).await;
    let trajectories = data.create_sampled_trajectories( &TrajectoryOptions::default());

    assert_eq!( trajectories.len(), 1);
    let trajectory = &trajectories[&0xa];
    assert_eq!( trajectory.len(), 2);

    let dt = secs_between( &trajectory[0].time, &trajectory[1].time);
    println!("sample dt: {dt}");
    assert!( (dt - 1.0).abs() < 1e-9);

    // first sample on the ellipsoid surface, second 100m above it
    let p0 = Cartographic::from( &trajectory[0].state.position);
    let p1 = Cartographic::from( &trajectory[1].state.position);
    println!("p0: {p0}, p1: {p1}");
    assert!( p0.height.abs() < 1e-4);
    assert!( (p1.height - 100.0).abs() < 1e-4);
    assert!( (p1.longitude_deg() - 0.0001).abs() < 1e-9);

    // the source has no orientation and emulation was not requested
    assert!( trajectory[0].state.orientation.is_none());
    assert!( trajectory[1].state.orientation.is_none());
}

#[tokio::test]
async fn test_sampling_is_idempotent () {
    let data = parse( MINIMAL).await;
    let options = TrajectoryOptions { sample_rate: 0.25, emulate_orientation: true };

    let a = data.create_sampled_trajectories( &options);
    let b = data.create_sampled_trajectories( &options);

    assert_eq!( a.len(), b.len());
    for (id, ta) in a.iter() {
        let tb = &b[id];
        assert_eq!( ta.len(), tb.len());
        for (sa, sb) in ta.iter().zip( tb.iter()) {
            assert_eq!( sa.time, sb.time);
            assert!( sa.state.position.approx_eq( &sb.state.position, 1e-12));
            match (&sa.state.orientation, &sb.state.orientation) {
                (Some(qa), Some(qb)) => assert!( qa.approx_eq( qb, 1e-12)),
                (None, None) => {}
                _ => panic!("orientation mismatch")
            }
        }
    }
}

#[tokio::test]
async fn test_stationary_dedup () {
    let input = "FileType=text/acmi/tacview\n\
FileVersion=2.2\n\
0,ReferenceTime=2024-01-01T00:00:00Z\n\
#0\n\
a,T=10|20|500\n\
#5\n\
a,T=10|20|500\n\
#10\n\
a,T=10|20|500\n";

    let data = parse( input).await;

    // the recording length is a multiple of the sample rate, so there is no forced
    // closing sample and 11 sample steps collapse into one
    let trajectories = data.create_sampled_trajectories( &TrajectoryOptions::default());
    let trajectory = &trajectories[&0xa];
    println!("stationary samples: {}", trajectory.len());
    assert_eq!( trajectory.len(), 1);

    // with an overshooting step loop the closing sample is kept even though it did not move
    let options = TrajectoryOptions { sample_rate: 3.0, emulate_orientation: false };
    let trajectories = data.create_sampled_trajectories( &options);
    let trajectory = &trajectories[&0xa];
    assert_eq!( trajectory.len(), 2);
    assert!( trajectory[0].state.position.approx_eq( &trajectory[1].state.position, EPS_POS));
    assert_eq!( trajectory[1].time, data.time_span.end.unwrap());
}

#[tokio::test]
async fn test_final_sample_at_exact_end () {
    let input = "FileType=text/acmi/tacview\n\
FileVersion=2.2\n\
0,ReferenceTime=2024-01-01T00:00:00Z\n\
#0\n\
a,T=0|0|0\n\
#1\n\
a,T=0.001|0|0\n\
#2\n\
a,T=0.002|0|0\n\
#2.5\n\
a,T=0.003|0|0\n";

    let data = parse( input).await;
    assert_eq!( data.duration_secs(), 2.5);

    let trajectories = data.create_sampled_trajectories( &TrajectoryOptions::default());
    let trajectory = &trajectories[&0xa];

    // samples at 0,1,2 plus the closing sample at 2.5
    assert_eq!( trajectory.len(), 4);
    let end = data.time_span.end.unwrap();
    assert_eq!( trajectory.last().unwrap().time, end);

    // strictly increasing, no step wider than the sample rate
    for w in trajectory.windows(2) {
        let dt = secs_between( &w[0].time, &w[1].time);
        assert!( dt > 0.0);
        assert!( dt <= 1.0 + 1e-9);
    }
}

#[tokio::test]
async fn test_orientation_from_yaw () {
    let input = "FileType=text/acmi/tacview\n\
FileVersion=2.2\n\
0,ReferenceTime=2024-01-01T00:00:00Z\n\
#0\n\
a,T=10|45|1000|0|0|90\n\
#1\n\
a,T=10.001|45|1000|0|0|90\n";

    let data = parse( input).await;
    let trajectories = data.create_sampled_trajectories( &TrajectoryOptions::default());
    let trajectory = &trajectories[&0xa];

    for sample in trajectory {
        let q = sample.state.orientation.expect("yaw has to produce an orientation");
        assert!( (q.length() - 1.0).abs() < 1e-9);

        let (h,p,r) = acmi_common::frames::world_to_hpr( &q, &sample.state.position);
        assert!( (h - 90.0f64.to_radians()).abs() < 1e-9);
        assert!( p.abs() < 1e-9);
        assert!( r.abs() < 1e-9);
    }
}

#[tokio::test]
async fn test_model_matrix () {
    let data = parse( MINIMAL).await;
    let trajectories = data.create_sampled_trajectories( &TrajectoryOptions::default());
    let sample = &trajectories[&0xa][0];

    // a position-only sample yields a pure translation to its ECEF position
    let m = sample.state.model_matrix();
    let origin = acmi_common::cartesian3::Cartesian3::zero();
    assert!( m.transform_point( &origin).approx_eq( &sample.state.position, 1e-9));
}

#[tokio::test]
async fn test_invalid_data_yields_nothing () {
    // no reference time -> invalid time span -> empty mapping
    let input = "FileType=text/acmi/tacview\n\
FileVersion=2.2\n\
#0\n\
a,T=0|0|0\n";

    let data = parse( input).await;
    assert!( data.create_sampled_trajectories( &TrajectoryOptions::default()).is_empty());
}
