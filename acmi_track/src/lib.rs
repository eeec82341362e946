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

use std::fmt;
use chrono::{DateTime,Utc};
use indexmap::IndexMap;
use serde::{Serialize,Deserialize};
use acmi_common::datetime::{secs_between, TimeSpan};

pub mod errors;
pub mod scanner;
pub mod parse;
pub mod trajectory;
pub mod attitude;

pub use acmi_geoid::GeoidGrid;
pub use parse::{parse_acmi, AcmiParser, ArchiveExtractor, ParseOptions, ZipExtractor};
pub use trajectory::{StateVector, Trajectory, TrajectoryOptions, TrajectoryPoint};

pub const ACMI_FILE_TYPE: &str = "text/acmi/tacview";
pub const SUPPORTED_FILE_VERSIONS: &[&str] = &["2.1", "2.2"];

/// the object id of the global property row
pub const GLOBAL_ID: u64 = 0;

/// the two mandatory header lines of an ACMI recording
#[derive(Debug,Clone,Default,PartialEq,Serialize,Deserialize)]
pub struct AcmiHeader {
    pub file_type: String,
    pub file_version: String,
}

impl AcmiHeader {
    pub fn is_valid (&self)->bool {
        self.file_type == ACMI_FILE_TYPE && SUPPORTED_FILE_VERSIONS.contains( &self.file_version.as_str())
    }
}

/// properties of the `0,Name=Value,..` rows. Recognized names get their own fields, everything
/// else is preserved in insertion order
#[derive(Debug,Clone,Serialize,Deserialize)]
pub struct GlobalProperties {
    pub reference_time: Option<DateTime<Utc>>,
    pub recording_time: Option<DateTime<Utc>>,
    pub reference_longitude: f64, // decimal degrees
    pub reference_latitude: f64,  // decimal degrees

    pub data_source: Option<String>,
    pub data_recorder: Option<String>,
    pub author: Option<String>,
    pub title: Option<String>,
    pub category: Option<String>,
    pub briefing: Option<String>,
    pub debriefing: Option<String>,
    pub comments: Option<String>,

    pub additional_props: IndexMap<String,String>,
}

impl Default for GlobalProperties {
    fn default()->Self {
        GlobalProperties {
            reference_time: None,
            recording_time: None,
            reference_longitude: 0.0,
            reference_latitude: 0.0,
            data_source: None,
            data_recorder: None,
            author: None,
            title: None,
            category: None,
            briefing: None,
            debriefing: None,
            comments: None,
            additional_props: IndexMap::new(),
        }
    }
}

/// decoded object state. Longitude/latitude are absolute degrees (the reference offsets are
/// already applied), altitude is meters above the WGS84 ellipsoid (the geoid undulation is
/// already applied), Euler angles are radians
#[derive(Debug,Clone,Copy,Default,PartialEq,Serialize,Deserialize)]
pub struct Transform {
    pub longitude: f64,
    pub latitude: f64,
    pub altitude: f64,
    pub roll: Option<f64>,
    pub pitch: Option<f64>,
    pub yaw: Option<f64>,
}

impl Transform {
    pub fn has_orientation (&self)->bool {
        self.yaw.is_some()
    }
}

impl fmt::Display for Transform {
    fn fmt (&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ lon: {:.6}, lat: {:.6}, alt: {:.1}", self.longitude, self.latitude, self.altitude)?;
        if let Some(yaw) = self.yaw { write!(f, ", yaw: {:.1}", yaw.to_degrees())?; }
        write!(f, " }}")
    }
}

/// object states of one point in time, keyed by object id in insertion order
pub type Scene = IndexMap<u64,Transform>;

/// a scene snapshot that is valid from its timestamp until the next frame's timestamp
#[derive(Debug,Clone,Default,Serialize,Deserialize)]
pub struct Frame {
    pub time_stamp: f64, // seconds since reference time
    pub scene: Scene,
}

/// the per-object property table entry
#[derive(Debug,Clone,Default,Serialize,Deserialize)]
pub struct EntityProps {
    pub id: u64,
    pub time_span: TimeSpan,
    pub name: Option<String>,
    pub types: Vec<String>,
    pub callsign: Option<String>,
    pub pilot: Option<String>,
    pub group: Option<String>,
    pub country: Option<String>,
    pub coalition: Option<String>,
    pub color: Option<String>, // CSS color syntax
}

impl EntityProps {
    pub fn new (id: u64)->Self {
        EntityProps { id, ..Default::default() }
    }

    pub fn is_alive_at (&self, time: &DateTime<Utc>)->bool {
        self.time_span.contains( time)
    }
}

impl fmt::Display for EntityProps {
    fn fmt (&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.id)?;
        if let Some(name) = &self.name { write!(f, " {}", name)?; }
        if !self.types.is_empty() { write!(f, " [{}]", self.types.join("+"))?; }
        if let Some(pilot) = &self.pilot { write!(f, " ({})", pilot)?; }
        Ok(())
    }
}

/// the decoded scene history of an ACMI recording: global metadata, the chronological frame
/// sequence and the per-object property table.
/// `is_valid` starts out true and is cleared on any structural violation encountered during
/// the parse - degraded recordings still yield whatever could be decoded
#[derive(Debug,Clone,Serialize,Deserialize)]
pub struct AcmiData {
    pub is_valid: bool,
    pub header: AcmiHeader,
    pub global_properties: GlobalProperties,
    pub time_span: TimeSpan,
    pub entities: IndexMap<u64,EntityProps>,
    pub frames: Vec<Frame>,
}

impl Default for AcmiData {
    fn default()->Self {
        AcmiData {
            is_valid: true,
            header: AcmiHeader::default(),
            global_properties: GlobalProperties::default(),
            time_span: TimeSpan::unset(),
            entities: IndexMap::new(),
            frames: Vec::new(),
        }
    }
}

impl AcmiData {
    /// recording length in fractional seconds
    pub fn duration_secs (&self)->f64 {
        self.time_span.duration_secs()
    }

    /// the frame with the largest timestamp at or before the given instant.
    /// Only defined between the reference time and the last frame
    pub fn get_frame (&self, time: &DateTime<Utc>)->Option<&Frame> {
        let ref_time = self.global_properties.reference_time?;
        let rel = secs_between( &ref_time, time);

        let last = self.frames.last()?;
        if rel < 0.0 || rel > last.time_stamp { return None }

        let idx = self.frames.partition_point( |f| f.time_stamp <= rel);
        if idx == 0 { return None }
        Some( &self.frames[idx-1])
    }

    /// resample the frame history into per-object ECEF trajectories.
    /// This does not mutate the recording - repeated calls with the same options
    /// yield the same result
    pub fn create_sampled_trajectories (&self, options: &TrajectoryOptions)->IndexMap<u64,Trajectory> {
        trajectory::build_trajectories( self, options)
    }
}
