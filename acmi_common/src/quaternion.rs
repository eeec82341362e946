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
use serde::{Serialize,Deserialize};
use crate::{sin,cos,sqrt};
use crate::cartesian3::Cartesian3;
use crate::rotmat3::RotMat3;

/// unit rotation quaternion (x,y,z,w). Hamilton convention, i.e. (q1 * q2) applies q2 first

#[derive(Debug,Clone,Copy,Serialize,Deserialize)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64
}

impl Quaternion {
    pub fn new (x: f64, y: f64, z: f64, w: f64)->Self {
        Quaternion {x,y,z,w}
    }

    pub fn identity ()->Self {
        Quaternion { x: 0.0, y: 0.0, z: 0.0, w: 1.0 }
    }

    /// rotation by angle (radians) about the given axis. The axis has to be unit length
    pub fn from_axis_angle (axis: &Cartesian3, angle: f64)->Self {
        let half = angle / 2.0;
        let s = sin(half);

        Quaternion {
            x: axis.x * s,
            y: axis.y * s,
            z: axis.z * s,
            w: cos(half)
        }
    }

    /// Shepperd's method - branch on the largest of trace and diagonal elements
    /// so the divisor stays well conditioned
    pub fn from_rotation_matrix (r: &RotMat3)->Self {
        let m = &r.m;
        let trace = r.trace();

        if trace > 0.0 {
            let s = sqrt(trace + 1.0) * 2.0;
            Quaternion {
                w: 0.25 * s,
                x: (m[2][1] - m[1][2]) / s,
                y: (m[0][2] - m[2][0]) / s,
                z: (m[1][0] - m[0][1]) / s
            }
        } else if m[0][0] > m[1][1] && m[0][0] > m[2][2] {
            let s = sqrt(1.0 + m[0][0] - m[1][1] - m[2][2]) * 2.0;
            Quaternion {
                w: (m[2][1] - m[1][2]) / s,
                x: 0.25 * s,
                y: (m[0][1] + m[1][0]) / s,
                z: (m[0][2] + m[2][0]) / s
            }
        } else if m[1][1] > m[2][2] {
            let s = sqrt(1.0 + m[1][1] - m[0][0] - m[2][2]) * 2.0;
            Quaternion {
                w: (m[0][2] - m[2][0]) / s,
                x: (m[0][1] + m[1][0]) / s,
                y: 0.25 * s,
                z: (m[1][2] + m[2][1]) / s
            }
        } else {
            let s = sqrt(1.0 + m[2][2] - m[0][0] - m[1][1]) * 2.0;
            Quaternion {
                w: (m[1][0] - m[0][1]) / s,
                x: (m[0][2] + m[2][0]) / s,
                y: (m[1][2] + m[2][1]) / s,
                z: 0.25 * s
            }
        }
    }

    pub fn to_rotation_matrix (&self)->RotMat3 {
        let Quaternion {x,y,z,w} = *self;

        let xx = x*x;  let yy = y*y;  let zz = z*z;
        let xy = x*y;  let xz = x*z;  let yz = y*z;
        let wx = w*x;  let wy = w*y;  let wz = w*z;

        RotMat3 { m: [
            [1.0 - 2.0*(yy + zz),       2.0*(xy - wz),       2.0*(xz + wy)],
            [      2.0*(xy + wz), 1.0 - 2.0*(xx + zz),       2.0*(yz - wx)],
            [      2.0*(xz - wy),       2.0*(yz + wx), 1.0 - 2.0*(xx + yy)]
        ]}
    }

    pub fn length (&self)->f64 {
        sqrt( self.x*self.x + self.y*self.y + self.z*self.z + self.w*self.w)
    }

    pub fn normalized (&self)->Self {
        let len = self.length();
        Quaternion { x: self.x/len, y: self.y/len, z: self.z/len, w: self.w/len }
    }

    pub fn conjugate (&self)->Self {
        Quaternion { x: -self.x, y: -self.y, z: -self.z, w: self.w }
    }

    pub fn dot (&self, q: &Quaternion)->f64 {
        self.x*q.x + self.y*q.y + self.z*q.z + self.w*q.w
    }

    /// rotate a vector by this quaternion (v' = v + 2 w (u × v) + 2 u × (u × v))
    pub fn rotate_vector (&self, v: &Cartesian3)->Cartesian3 {
        let u = Cartesian3::new( self.x, self.y, self.z);
        let t = u.cross(v) * 2.0;

        v + &(t*self.w + u.cross(&t))
    }

    /// componentwise comparison within eps (each of x,y,z,w)
    pub fn approx_eq (&self, q: &Quaternion, eps: f64)->bool {
        (self.x - q.x).abs() < eps && (self.y - q.y).abs() < eps &&
        (self.z - q.z).abs() < eps && (self.w - q.w).abs() < eps
    }
}

impl Mul for Quaternion {
    type Output = Self;

    fn mul (self, rhs: Self) -> Self {
        &self * &rhs
    }
}

impl Mul for &Quaternion {
    type Output = Quaternion;

    fn mul (self, rhs: &Quaternion) -> Quaternion {
        let (ax,ay,az,aw) = (self.x, self.y, self.z, self.w);
        let (bx,by,bz,bw) = (rhs.x, rhs.y, rhs.z, rhs.w);

        Quaternion {
            x: aw*bx + ax*bw + ay*bz - az*by,
            y: aw*by - ax*bz + ay*bw + az*bx,
            z: aw*bz + ax*by - ay*bx + az*bw,
            w: aw*bw - ax*bx - ay*by - az*bz
        }
    }
}

impl std::fmt::Display for Quaternion {
    fn fmt (&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "( {}, {}, {}, {} )", self.x, self.y, self.z, self.w)
    }
}
