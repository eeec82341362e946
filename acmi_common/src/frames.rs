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

/// local tangent frame construction and heading/pitch/roll (Tait-Bryan) conversions.
/// The local frame is NWU: +x north, +y west, +z up, which keeps the frame right-handed
/// with z pointing away from the ellipsoid

use crate::{asin, atan2, normalize_two_pi};
use crate::cartesian3::Cartesian3;
use crate::cartographic::ellipsoid_normal_at;
use crate::rotmat3::RotMat3;
use crate::quaternion::Quaternion;

/// NWU frame axes at an ECEF position, as a fixed-frame rotation matrix with
/// columns (north, west, up)
pub fn nwu_frame_at (pos: &Cartesian3)->RotMat3 {
    let up = ellipsoid_normal_at( pos);
    let z_axis = Cartesian3::new( 0.0, 0.0, 1.0);

    let mut east = z_axis.cross( &up);
    if east.length_squared() < 1e-24 { // degenerate at the poles
        east = Cartesian3::new( 0.0, 1.0, 0.0);
    } else {
        east.scale_to_unit_length();
    }

    let north = up.cross( &east);
    let west = -east;

    RotMat3::from_columns( &north, &west, &up)
}

/// body-to-NWU rotation for heading/pitch/roll in radians.
/// composition order is R_z(-heading) · R_y(-pitch) · R_x(roll)
pub fn hpr_rotation (heading: f64, pitch: f64, roll: f64)->RotMat3 {
    RotMat3::rot_z( -heading) * RotMat3::rot_y( -pitch) * RotMat3::rot_x( roll)
}

/// world (ECEF) orientation quaternion for heading/pitch/roll at an ECEF position
pub fn hpr_to_world (heading: f64, pitch: f64, roll: f64, pos: &Cartesian3)->Quaternion {
    let world = &nwu_frame_at( pos) * &hpr_rotation( heading, pitch, roll);
    Quaternion::from_rotation_matrix( &world)
}

/// inverse of [`hpr_to_world`] - recover (heading,pitch,roll) in radians from a world
/// orientation at an ECEF position. Heading is normalized into [0, 2π)
pub fn world_to_hpr (q: &Quaternion, pos: &Cartesian3)->(f64,f64,f64) {
    let body = &nwu_frame_at( pos).transpose() * &q.to_rotation_matrix();
    let m = &body.m;

    // body = R_z(a)·R_y(b)·R_x(c) with a = -heading, b = -pitch, c = roll
    let a = atan2( m[1][0], m[0][0]);
    let b = -asin( m[2][0].clamp( -1.0, 1.0));
    let c = atan2( m[2][1], m[2][2]);

    (normalize_two_pi( -a), -b, c)
}

/// rotation matrix with columns (v̂, right, up) for a unit velocity at an ECEF position:
/// right := up × v̂ normalized, then up re-orthogonalized as v̂ × right
pub fn rotation_from_position_velocity (pos: &Cartesian3, unit_velocity: &Cartesian3)->RotMat3 {
    let up = ellipsoid_normal_at( pos);
    let right = up.cross( unit_velocity).scaled_to_unit_length();
    let up = unit_velocity.cross( &right);

    RotMat3::from_columns( unit_velocity, &right, &up)
}
