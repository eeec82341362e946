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

use acmi_common::{
    cartesian3::Cartesian3,
    cartographic::Cartographic,
    frames::{hpr_to_world, nwu_frame_at, rotation_from_position_velocity, world_to_hpr},
    quaternion::Quaternion,
    rotmat3::RotMat3,
    rad, PI, HALF_PI
};

/// run with "cargo test test_hpr_roundtrip -- --nocapture"

fn surface_pos (lon_deg: f64, lat_deg: f64)->Cartesian3 {
    Cartesian3::from( Cartographic::from_degrees( lon_deg, lat_deg, 0.0))
}

#[test]
fn test_nwu_frame () {
    // at (lon=0, lat=0): north = ECEF z, west = -ECEF y, up = ECEF x
    let frame = nwu_frame_at( &surface_pos( 0.0, 0.0));
    println!("NWU frame at (0,0): {frame}");

    assert!( frame.column(0).approx_eq( &Cartesian3::new( 0.0, 0.0, 1.0), 1e-9));
    assert!( frame.column(1).approx_eq( &Cartesian3::new( 0.0, -1.0, 0.0), 1e-9));
    assert!( frame.column(2).approx_eq( &Cartesian3::new( 1.0, 0.0, 0.0), 1e-9));
}

#[test]
fn test_hpr_roundtrip () {
    let pos = surface_pos( -122.0, 37.0);

    let cases = vec![
        (0.0, 0.0, 0.0),
        (rad(45.0), rad(10.0), rad(-20.0)),
        (rad(270.0), rad(-5.0), rad(60.0)),
        (rad(359.0), rad(30.0), rad(0.5)),
    ];

    for (h,p,r) in cases {
        let q = hpr_to_world( h, p, r, &pos);
        let (h1,p1,r1) = world_to_hpr( &q, &pos);
        println!("hpr ({h},{p},{r}) -> {q} -> ({h1},{p1},{r1})");

        let dh = (h1 - h).abs();
        assert!( dh.min( 2.0*PI - dh) < 1e-9);
        assert!( (p1 - p).abs() < 1e-9);
        assert!( (r1 - r).abs() < 1e-9);
    }
}

#[test]
fn test_heading_rotates_towards_east () {
    // heading 90° turns the body x axis from north to east
    let pos = surface_pos( 0.0, 0.0);
    let q = hpr_to_world( HALF_PI, 0.0, 0.0, &pos);

    let body_x = q.rotate_vector( &Cartesian3::new( 1.0, 0.0, 0.0));
    let east = Cartesian3::new( 0.0, 1.0, 0.0); // ECEF east at (0,0)

    println!("body x at heading 90: {body_x}");
    assert!( body_x.approx_eq( &east, 1e-9));
}

#[test]
fn test_velocity_frame_matches_level_flight () {
    // flying due north in level flight the velocity frame is the NWU frame
    let pos = surface_pos( 20.0, 45.0);
    let north = nwu_frame_at( &pos).column(0);

    let r = rotation_from_position_velocity( &pos, &north);
    let q = Quaternion::from_rotation_matrix( &r);
    let (h,p,roll) = world_to_hpr( &q, &pos);

    println!("velocity frame hpr: ({h},{p},{roll})");
    assert!( h.abs() < 1e-6 || (h - 2.0*PI).abs() < 1e-6);
    assert!( p.abs() < 1e-6);
    assert!( roll.abs() < 1e-6);
}

#[test]
fn test_mat4_affine () {
    use acmi_common::mat4::Mat4;

    let r = RotMat3::rot_z( rad(90.0));
    let t = Cartesian3::new( 10.0, 20.0, 30.0);
    let m = Mat4::from_rotation_translation( &r, &t);

    // rotate x into y, then translate
    let p = m.transform_point( &Cartesian3::new( 1.0, 0.0, 0.0));
    println!("transformed point: {p}");
    assert!( p.approx_eq( &Cartesian3::new( 10.0, 21.0, 30.0), 1e-12));

    // directions are not translated
    let v = m.transform_vector( &Cartesian3::new( 1.0, 0.0, 0.0));
    assert!( v.approx_eq( &Cartesian3::new( 0.0, 1.0, 0.0), 1e-12));

    // composition equals sequential application
    let m2 = Mat4::from_translation( &Cartesian3::new( -10.0, -20.0, -30.0));
    let p = (&m2 * &m).transform_point( &Cartesian3::new( 1.0, 0.0, 0.0));
    assert!( p.approx_eq( &Cartesian3::new( 0.0, 1.0, 0.0), 1e-12));

    assert!( m.rotation().transform( &Cartesian3::new( 1.0, 0.0, 0.0)).approx_eq( &Cartesian3::new( 0.0, 1.0, 0.0), 1e-12));
    assert!( m.translation().approx_eq( &t, 1e-12));
}

#[test]
fn test_quaternion_matrix_consistency () {
    let axis = Cartesian3::new( 0.0, 0.0, 1.0);
    let q = Quaternion::from_axis_angle( &axis, rad(30.0));
    let m = q.to_rotation_matrix();
    let q1 = Quaternion::from_rotation_matrix( &m);

    println!("q: {q}, roundtrip: {q1}");
    assert!( q.approx_eq( &q1, 1e-12));

    // rotating x by 30° about z
    let v = q.rotate_vector( &Cartesian3::new( 1.0, 0.0, 0.0));
    assert!( v.approx_eq( &Cartesian3::new( rad(30.0).cos(), rad(30.0).sin(), 0.0), 1e-12));

    // matrix and quaternion rotation have to agree
    let vm = m.transform( &Cartesian3::new( 1.0, 0.0, 0.0));
    assert!( v.approx_eq( &vm, 1e-12));
}
