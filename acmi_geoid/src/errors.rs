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
use thiserror::Error;

#[derive(Error,Debug)]
pub enum AcmiGeoidError {

    #[error("invalid geoid grid: {0}")]
    InvalidGridError(String),

    // generic self-created error
    #[error("geoid operation failed: {0}")]
    OpFailedError(String),
}

pub fn op_failed<S: ToString> (msg: S)->AcmiGeoidError {
    AcmiGeoidError::OpFailedError(msg.to_string())
}

pub fn invalid_grid<S: ToString> (msg: S)->AcmiGeoidError {
    AcmiGeoidError::InvalidGridError(msg.to_string())
}
