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

use acmi_geoid::GeoidGrid;

/// run with "cargo test test_bilinear -- --nocapture"

/// 10° steps, northern row at 90N, first column at 0E, heights increasing by row
fn gradient_grid ()->GeoidGrid {
    let rows = 19;
    let cols = 36;
    let mut heights: Vec<i16> = Vec::with_capacity( rows*cols);
    for r in 0..rows {
        for c in 0..cols {
            heights.push( (r as i16) * 10);
        }
    }
    GeoidGrid::new( rows, cols, 90.0, 0.0, 10.0, 10.0, heights).unwrap()
}

#[test]
fn test_grid_points () {
    let grid = gradient_grid();

    // exactly on grid points there is nothing to interpolate
    assert_eq!( grid.height_at( 90.0, 0.0), 0.0);
    assert_eq!( grid.height_at( 80.0, 0.0), 10.0);
    assert_eq!( grid.height_at( 0.0, 120.0), 90.0);
    assert_eq!( grid.height_at( -90.0, 350.0), 180.0);
}

#[test]
fn test_bilinear () {
    let grid = gradient_grid();

    // halfway between the 90N and 80N rows
    let h = grid.height_at( 85.0, 0.0);
    println!("height at 85N: {h}");
    assert!( (h - 5.0).abs() < 1e-9);

    // the gradient is purely meridional, so longitude offsets must not change it
    let h = grid.height_at( 85.0, 123.456);
    assert!( (h - 5.0).abs() < 1e-9);

    let h = grid.height_at( 82.5, 7.5);
    assert!( (h - 7.5).abs() < 1e-9);
}

#[test]
fn test_longitude_wraparound () {
    let rows = 19;
    let cols = 36;
    let mut heights: Vec<i16> = vec![0; rows*cols];
    for r in 0..rows {
        heights[r*cols] = 100; // spike along the 0E column
    }
    let grid = GeoidGrid::new( rows, cols, 90.0, 0.0, 10.0, 10.0, heights).unwrap();

    // interpolating at 355E uses the last column and wraps to the first
    let h = grid.height_at( 0.0, 355.0);
    println!("height at 355E: {h}");
    assert!( (h - 50.0).abs() < 1e-9);

    // negative longitudes wrap the same way
    let h = grid.height_at( 0.0, -5.0);
    assert!( (h - 50.0).abs() < 1e-9);
}

#[test]
fn test_latitude_clamp () {
    let grid = gradient_grid();

    assert_eq!( grid.height_at( 95.0, 10.0), grid.height_at( 90.0, 10.0));
    assert_eq!( grid.height_at( -95.0, 10.0), grid.height_at( -90.0, 10.0));
}

#[test]
fn test_value_mapping () {
    let grid = gradient_grid().with_value_mapping( -108.0, 0.003);

    let h = grid.height_at( 90.0, 0.0);
    println!("mapped height: {h}");
    assert!( (h - (-108.0)).abs() < 1e-9);

    let h = grid.height_at( 80.0, 0.0);
    assert!( (h - (-108.0 + 0.03)).abs() < 1e-9);
}

#[test]
fn test_invalid_grid () {
    assert!( GeoidGrid::new( 2, 2, 90.0, 0.0, 10.0, 10.0, vec![0; 3]).is_err());
    assert!( GeoidGrid::new( 1, 2, 90.0, 0.0, 10.0, 10.0, vec![0; 2]).is_err());
    assert!( GeoidGrid::new( 2, 2, 90.0, 0.0, 0.0, 10.0, vec![0; 4]).is_err());
}
