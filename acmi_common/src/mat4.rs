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

use std::ops::Mul;
use crate::cartesian3::Cartesian3;
use crate::rotmat3::RotMat3;

/// homogeneous 4×4 transform, stored row-major. This is the exchange format for
/// renderers that want a ready-made model matrix per state sample

#[derive(Debug,Clone,Copy,PartialEq)]
pub struct Mat4 {
    pub m: [[f64;4];4]  // m[row][col]
}

impl Mat4 {
    pub fn identity ()->Self {
        Mat4 { m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0]
        ]}
    }

    /// affine transform with the given rotation and translation
    pub fn from_rotation_translation (r: &RotMat3, t: &Cartesian3)->Self {
        let rm = &r.m;
        Mat4 { m: [
            [rm[0][0], rm[0][1], rm[0][2], t.x],
            [rm[1][0], rm[1][1], rm[1][2], t.y],
            [rm[2][0], rm[2][1], rm[2][2], t.z],
            [     0.0,      0.0,      0.0, 1.0]
        ]}
    }

    pub fn from_translation (t: &Cartesian3)->Self {
        Mat4::from_rotation_translation( &RotMat3::identity(), t)
    }

    pub fn rotation (&self)->RotMat3 {
        let m = &self.m;
        RotMat3 { m: [
            [m[0][0], m[0][1], m[0][2]],
            [m[1][0], m[1][1], m[1][2]],
            [m[2][0], m[2][1], m[2][2]]
        ]}
    }

    pub fn translation (&self)->Cartesian3 {
        Cartesian3::new( self.m[0][3], self.m[1][3], self.m[2][3])
    }

    /// transform a point (w = 1)
    pub fn transform_point (&self, p: &Cartesian3)->Cartesian3 {
        let m = &self.m;
        Cartesian3::new(
            m[0][0]*p.x + m[0][1]*p.y + m[0][2]*p.z + m[0][3],
            m[1][0]*p.x + m[1][1]*p.y + m[1][2]*p.z + m[1][3],
            m[2][0]*p.x + m[2][1]*p.y + m[2][2]*p.z + m[2][3]
        )
    }

    /// transform a direction (w = 0)
    pub fn transform_vector (&self, v: &Cartesian3)->Cartesian3 {
        let m = &self.m;
        Cartesian3::new(
            m[0][0]*v.x + m[0][1]*v.y + m[0][2]*v.z,
            m[1][0]*v.x + m[1][1]*v.y + m[1][2]*v.z,
            m[2][0]*v.x + m[2][1]*v.y + m[2][2]*v.z
        )
    }
}

impl Mul for Mat4 {
    type Output = Self;

    fn mul (self, rhs: Self) -> Self {
        &self * &rhs
    }
}

impl Mul for &Mat4 {
    type Output = Mat4;

    fn mul (self, rhs: &Mat4) -> Mat4 {
        let a = &self.m;
        let b = &rhs.m;
        let mut m = [[0.0f64;4];4];

        for i in 0..4 {
            for j in 0..4 {
                m[i][j] = a[i][0]*b[0][j] + a[i][1]*b[1][j] + a[i][2]*b[2][j] + a[i][3]*b[3][j];
            }
        }
        Mat4 { m }
    }
}
