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

pub mod errors;
use errors::{invalid_grid, AcmiGeoidError};

type Result<T> = std::result::Result<T, AcmiGeoidError>;

/// EGM2008 geoid undulation raster with bilinear height lookup.
///
/// The grid holds `rows × cols` signed 16 bit samples in row-major order, the first row
/// being the northern edge. How the samples get here (normally from a PGM rendition of
/// the EGM2008 release) is up to the caller - this crate only interprets the raster.
/// Raw samples are mapped to meters as `offset + scale * sample`, which accommodates the
/// quantized PGM releases (e.g. offset -108, scale 0.003 for the official grids).

/// row/column step of the 1 arc minute EGM2008 grid, in degrees
pub const EGM2008_STEP_1_MIN: f64 = 1.0 / 60.0;
/// row/column step of the 2.5 arc minute EGM2008 grid, in degrees
pub const EGM2008_STEP_2_5_MIN: f64 = 2.5 / 60.0;
/// row/column step of the 10 arc minute EGM2008 grid, in degrees
pub const EGM2008_STEP_10_MIN: f64 = 10.0 / 60.0;

#[derive(Debug,Clone)]
pub struct GeoidGrid {
    rows: usize,
    cols: usize,
    lat0_deg: f64,   // latitude of the northern row
    lon0_deg: f64,   // longitude of the first column
    d_lat_deg: f64,  // row step towards south, in degrees (positive)
    d_lon_deg: f64,  // column step towards east, in degrees (positive)
    offset: f64,
    scale: f64,
    heights: Vec<i16>,
}

impl GeoidGrid {
    pub fn new (rows: usize, cols: usize, lat0_deg: f64, lon0_deg: f64,
                d_lat_deg: f64, d_lon_deg: f64, heights: Vec<i16>) -> Result<GeoidGrid> {
        if rows < 2 || cols < 2 {
            return Err( invalid_grid( format!("grid too small ({rows} x {cols})")));
        }
        if d_lat_deg <= 0.0 || d_lon_deg <= 0.0 {
            return Err( invalid_grid( format!("non-positive grid step ({d_lat_deg}, {d_lon_deg})")));
        }
        if heights.len() != rows * cols {
            return Err( invalid_grid( format!("expected {} samples, got {}", rows*cols, heights.len())));
        }

        Ok( GeoidGrid { rows, cols, lat0_deg, lon0_deg, d_lat_deg, d_lon_deg, offset: 0.0, scale: 1.0, heights } )
    }

    /// set the raw-sample-to-meters mapping `offset + scale * sample`
    pub fn with_value_mapping (mut self, offset: f64, scale: f64) -> GeoidGrid {
        self.offset = offset;
        self.scale = scale;
        self
    }

    pub fn rows (&self)->usize { self.rows }
    pub fn cols (&self)->usize { self.cols }

    #[inline]
    fn sample (&self, row: usize, col: usize) -> f64 {
        self.offset + self.scale * (self.heights[row * self.cols + col] as f64)
    }

    /// geoid height above the WGS84 ellipsoid in meters at the given position (degrees),
    /// bilinearly interpolated between the four surrounding samples.
    /// Longitude wraps around at 360°, latitude is clamped to the grid rows.
    /// Pure function, safe for concurrent readers
    pub fn height_at (&self, lat_deg: f64, lon_deg: f64) -> f64 {
        let lat = lat_deg.clamp( -90.0, 90.0);

        let y = ((self.lat0_deg - lat) / self.d_lat_deg).clamp( 0.0, (self.rows - 1) as f64);
        let r0 = y.floor() as usize;
        let r1 = (r0 + 1).min( self.rows - 1);
        let fy = y - (r0 as f64);

        let x = (lon_deg - self.lon0_deg).rem_euclid( 360.0) / self.d_lon_deg;
        let c0 = (x.floor() as usize) % self.cols;
        let c1 = (c0 + 1) % self.cols; // wraparound across the grid seam
        let fx = x - x.floor();

        let north = (1.0 - fx) * self.sample( r0, c0) + fx * self.sample( r0, c1);
        let south = (1.0 - fx) * self.sample( r1, c0) + fx * self.sample( r1, c1);

        (1.0 - fy) * north + fy * south
    }
}
