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

use chrono::{DateTime, TimeDelta, Utc, TimeZone};
use serde::{Serialize,Deserialize};
use std::fmt;
use std::time::Duration;

// as of Rust 1.87 the min,hour,day Duration ctors are experimental and require multiple crate
// attributes. For simple use cases that do not require to handle leap seconds and the like we
// therefore provide our own wrappers to reduce nightly/crate attr dependencies
#[inline] pub fn millis (n: u64)->Duration { Duration::from_millis(n) }
#[inline] pub fn secs (n: u64)->Duration { Duration::from_secs(n) }
#[inline] pub fn secs_f64 (n: f64)->Duration { Duration::from_secs_f64(n) }

#[inline]
pub fn to_epoch_millis<Tz> (date: DateTime<Tz>)->i64 where Tz: TimeZone {
    date.timestamp_millis()
}

/// offset an instant by fractional seconds, keeping millisecond precision
pub fn plus_secs_f64 (dt: &DateTime<Utc>, secs: f64)->DateTime<Utc> {
    *dt + TimeDelta::milliseconds( (secs * 1000.0).round() as i64)
}

/// fractional seconds between two instants (negative if dt < dt0)
pub fn secs_between (dt0: &DateTime<Utc>, dt: &DateTime<Utc>)->f64 {
    (*dt - *dt0).num_milliseconds() as f64 / 1000.0
}

pub fn is_between_inclusive (dt: &DateTime<Utc>, dt_start: &DateTime<Utc>, dt_end: &DateTime<Utc>) -> bool {
    dt >= dt_start && dt <= dt_end
}

pub fn short_utc_datetime_string (dt: &DateTime<Utc>) -> String {
    format!("{}", dt.format("%Y-%m-%dT%H:%M:%S%Z"))
}

//--- misc string format parsing

/// parse an ISO-8601 instant (with offset or 'Z') into UTC
pub fn parse_datetime (s: &str)->Option<DateTime<Utc>> {
    match DateTime::parse_from_str(s, "%+") {
        Ok(dt) => Some(dt.to_utc()),
        Err(_) => None
    }
}

/* #region time spans *******************************************************************************/

/// a [start,end] pair of absolute instants. Either bound can still be unset while a
/// recording is being assembled; the span only becomes valid once both are known
#[derive(Debug,Clone,Copy,PartialEq,Default,Serialize,Deserialize)]
pub struct TimeSpan {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>
}

impl TimeSpan {
    pub fn new (start: DateTime<Utc>, end: DateTime<Utc>)->Self {
        TimeSpan { start: Some(start), end: Some(end) }
    }

    pub fn unset ()->Self {
        TimeSpan { start: None, end: None }
    }

    pub fn is_valid (&self)->bool {
        self.start.is_some() && self.end.is_some()
    }

    /// span length in fractional seconds (0 if the span is not valid yet)
    pub fn duration_secs (&self)->f64 {
        match (self.start, self.end) {
            (Some(start), Some(end)) => secs_between( &start, &end),
            _ => 0.0
        }
    }

    pub fn contains (&self, dt: &DateTime<Utc>)->bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => is_between_inclusive( dt, &start, &end),
            _ => false
        }
    }
}

impl fmt::Display for TimeSpan {
    fn fmt (&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.start, self.end) {
            (Some(start), Some(end)) => write!(f, "[{} .. {}]", short_utc_datetime_string(&start), short_utc_datetime_string(&end)),
            _ => write!(f, "[unset]")
        }
    }
}

/* #endregion time spans */
