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
use crate::{sin,cos};
use crate::cartesian3::Cartesian3;

/// right-handed 3×3 rotation matrix, stored row-major.
/// rotation composition order matters for attitude synthesis so all factory and
/// product functions keep the conventional row·column orientation

#[derive(Debug,Clone,Copy,PartialEq)]
pub struct RotMat3 {
    pub m: [[f64;3];3]  // m[row][col]
}

impl RotMat3 {
    pub fn identity ()->Self {
        RotMat3 { m: [
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0]
        ]}
    }

    /// matrix with the given column vectors
    pub fn from_columns (c0: &Cartesian3, c1: &Cartesian3, c2: &Cartesian3)->Self {
        RotMat3 { m: [
            [c0.x, c1.x, c2.x],
            [c0.y, c1.y, c2.y],
            [c0.z, c1.z, c2.z]
        ]}
    }

    /// rotation about the x axis by angle in radians
    pub fn rot_x (a: f64)->Self {
        let (s,c) = (sin(a), cos(a));
        RotMat3 { m: [
            [1.0, 0.0, 0.0],
            [0.0,   c,  -s],
            [0.0,   s,   c]
        ]}
    }

    /// rotation about the y axis by angle in radians
    pub fn rot_y (a: f64)->Self {
        let (s,c) = (sin(a), cos(a));
        RotMat3 { m: [
            [  c, 0.0,   s],
            [0.0, 1.0, 0.0],
            [ -s, 0.0,   c]
        ]}
    }

    /// rotation about the z axis by angle in radians
    pub fn rot_z (a: f64)->Self {
        let (s,c) = (sin(a), cos(a));
        RotMat3 { m: [
            [  c,  -s, 0.0],
            [  s,   c, 0.0],
            [0.0, 0.0, 1.0]
        ]}
    }

    pub fn column (&self, idx: usize)->Cartesian3 {
        Cartesian3::new( self.m[0][idx], self.m[1][idx], self.m[2][idx])
    }

    pub fn transpose (&self)->Self {
        let m = &self.m;
        RotMat3 { m: [
            [m[0][0], m[1][0], m[2][0]],
            [m[0][1], m[1][1], m[2][1]],
            [m[0][2], m[1][2], m[2][2]]
        ]}
    }

    pub fn trace (&self)->f64 {
        self.m[0][0] + self.m[1][1] + self.m[2][2]
    }

    /// rotate a vector
    pub fn transform (&self, v: &Cartesian3)->Cartesian3 {
        let m = &self.m;
        Cartesian3::new(
            m[0][0]*v.x + m[0][1]*v.y + m[0][2]*v.z,
            m[1][0]*v.x + m[1][1]*v.y + m[1][2]*v.z,
            m[2][0]*v.x + m[2][1]*v.y + m[2][2]*v.z
        )
    }
}

impl Mul for RotMat3 {
    type Output = Self;

    fn mul (self, rhs: Self) -> Self {
        &self * &rhs
    }
}

impl Mul for &RotMat3 {
    type Output = RotMat3;

    fn mul (self, rhs: &RotMat3) -> RotMat3 {
        let a = &self.m;
        let b = &rhs.m;
        let mut m = [[0.0f64;3];3];

        for i in 0..3 {
            for j in 0..3 {
                m[i][j] = a[i][0]*b[0][j] + a[i][1]*b[1][j] + a[i][2]*b[2][j];
            }
        }
        RotMat3 { m }
    }
}

impl Mul<Cartesian3> for RotMat3 {
    type Output = Cartesian3;

    fn mul (self, rhs: Cartesian3) -> Cartesian3 {
        self.transform(&rhs)
    }
}

impl std::fmt::Display for RotMat3 {
    fn fmt (&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let m = &self.m;
        write!(f, "[ [{}, {}, {}], [{}, {}, {}], [{}, {}, {}] ]",
            m[0][0],m[0][1],m[0][2], m[1][0],m[1][1],m[1][2], m[2][0],m[2][1],m[2][2])
    }
}
