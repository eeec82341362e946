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

/// the ACMI record decoder. Logical lines are dispatched by prefix into global property rows,
/// frame time markers, object updates and object removals. Recoverable structural problems
/// degrade the recording (`is_valid` is cleared, the offending line is skipped) but never
/// abort the parse; only container extraction and cancellation are terminal

use std::collections::HashMap;
use std::collections::HashSet;
use std::io::{Cursor, Read};
use std::sync::Arc;
use async_trait::async_trait;
use serde::{Serialize,Deserialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug,warn};
use zip::ZipArchive;

use acmi_common::datetime::{parse_datetime, plus_secs_f64, TimeSpan};
use acmi_geoid::GeoidGrid;
use crate::errors::{parse_error, AcmiTrackError, Result};
use crate::scanner::{LineScanner, LogicalLine};
use crate::{AcmiData, AcmiHeader, EntityProps, Frame, GlobalProperties, Transform, ACMI_FILE_TYPE, SUPPORTED_FILE_VERSIONS};

/* #region container extraction *********************************************************************/

/// collaborator that unwraps a compressed recording into the contained ACMI text
#[async_trait]
pub trait ArchiveExtractor {
    async fn extract (&self, bytes: &[u8])->Result<Vec<u8>>;
}

/// the default extractor for `.zip.acmi` containers - the archive has to hold exactly
/// one member, whose contents are the recording
pub struct ZipExtractor;

#[async_trait]
impl ArchiveExtractor for ZipExtractor {
    async fn extract (&self, bytes: &[u8])->Result<Vec<u8>> {
        let mut archive = ZipArchive::new( Cursor::new( bytes))
            .map_err( |e| AcmiTrackError::CorruptContainer( e.to_string()))?;

        if archive.len() != 1 {
            return Err( AcmiTrackError::CorruptContainer( format!("expected 1 archive entry, got {}", archive.len())));
        }

        let mut entry = archive.by_index( 0)
            .map_err( |e| AcmiTrackError::CorruptContainer( e.to_string()))?;
        let mut buf: Vec<u8> = Vec::with_capacity( entry.size() as usize);
        entry.read_to_end( &mut buf)?;
        Ok(buf)
    }
}

/* #endregion container extraction */

/// parse options - which object types to drop and how to interrupt a running parse
#[derive(Debug,Clone,Default,Serialize,Deserialize)]
pub struct ParseOptions {
    /// type names of objects that should not be tracked. The pseudo type "Untyped"
    /// filters objects that never report a Type
    pub filter: Vec<String>,

    #[serde(skip)]
    pub cancel: Option<CancellationToken>,
}

/// parse a byte buffer into an [`AcmiData`] with a one-shot parser and default collaborators
pub async fn parse_acmi (bytes: &[u8], options: ParseOptions)->Result<AcmiData> {
    AcmiParser::new().with_options( options).parse( bytes).await
}

/// the ACMI decoder. A parser owns all of its scratch state so concurrent parses just
/// use separate parser instances; the geoid raster is shared read-only between them
pub struct AcmiParser {
    options: ParseOptions,
    geoid: Option<Arc<GeoidGrid>>,
    extractor: Box<dyn ArchiveExtractor + Send + Sync>,

    //--- per-parse scratch state, reset at the beginning of each parse
    ref_lon: f64, // active reference longitude for T= decoding [deg]
    ref_lat: f64,
    current_ts: f64, // seconds since reference time
    current_frame: Frame,
    pending_destroyed: Vec<u64>, // removed ids that still show in the current frame
    kept: HashSet<u64>,    // ids that passed the type filter
    dropped: HashSet<u64>, // ids that did not
    first_seen: HashMap<u64,f64>, // id -> relative secs of first observation
    ended: HashMap<u64,f64>,      // id -> relative secs of removal/destruction
    data: AcmiData,
}

impl AcmiParser {
    pub fn new ()->Self {
        AcmiParser {
            options: ParseOptions::default(),
            geoid: None,
            extractor: Box::new( ZipExtractor),
            ref_lon: 0.0,
            ref_lat: 0.0,
            current_ts: 0.0,
            current_frame: Frame::default(),
            pending_destroyed: Vec::new(),
            kept: HashSet::new(),
            dropped: HashSet::new(),
            first_seen: HashMap::new(),
            ended: HashMap::new(),
            data: AcmiData::default(),
        }
    }

    pub fn with_options (mut self, options: ParseOptions)->Self {
        self.options = options;
        self
    }

    /// the geoid raster used to turn MSL altitudes into heights above the ellipsoid.
    /// Without it the undulation is treated as 0
    pub fn with_geoid (mut self, geoid: Arc<GeoidGrid>)->Self {
        self.geoid = Some(geoid);
        self
    }

    pub fn with_extractor (mut self, extractor: Box<dyn ArchiveExtractor + Send + Sync>)->Self {
        self.extractor = extractor;
        self
    }

    /// decode a possibly compressed ACMI recording into its scene history.
    /// Structural problems degrade the returned data (`is_valid` cleared); only
    /// container corruption and cancellation produce an Err
    pub async fn parse (&mut self, bytes: &[u8])->Result<AcmiData> {
        self.reset();

        let extracted: Vec<u8>;
        let bytes = if bytes.starts_with( b"PK") {
            extracted = self.extractor.extract( bytes).await?;
            &extracted[..]
        } else {
            bytes
        };

        let text = String::from_utf8_lossy( bytes);
        let mut scanner = LineScanner::new( text.as_ref());

        if !self.parse_header( &mut scanner) {
            self.data.is_valid = false;
            return Ok( std::mem::take( &mut self.data));
        }

        while let Some(line) = scanner.next_logical() {
            if let Some(token) = &self.options.cancel {
                if token.is_cancelled() {
                    self.reset(); // release intermediate state
                    return Err( AcmiTrackError::Cancelled);
                }
            }
            if let Err(e) = self.parse_record( &line) {
                warn!("skipping line {}: {}", line.line_no, e);
                self.data.is_valid = false;
            }
        }

        self.finish();
        Ok( std::mem::take( &mut self.data))
    }

    fn reset (&mut self) {
        self.ref_lon = 0.0;
        self.ref_lat = 0.0;
        self.current_ts = 0.0;
        self.current_frame = Frame::default();
        self.pending_destroyed.clear();
        self.kept.clear();
        self.dropped.clear();
        self.first_seen.clear();
        self.ended.clear();
        self.data = AcmiData::default();
    }

    /// the first two physical lines have to identify a supported ACMI recording
    fn parse_header (&mut self, scanner: &mut LineScanner)->bool {
        let (Some(l1), Some(l2)) = (scanner.next_physical(), scanner.next_physical()) else {
            warn!("missing ACMI header");
            return false;
        };

        let file_type = l1.trim().strip_prefix("FileType=").unwrap_or("").to_string();
        let file_version = l2.trim().strip_prefix("FileVersion=").unwrap_or("").to_string();
        self.data.header = AcmiHeader { file_type, file_version };

        if self.data.header.file_type != ACMI_FILE_TYPE {
            warn!("not an ACMI recording: {:?}", l1);
            return false;
        }
        if !SUPPORTED_FILE_VERSIONS.contains( &self.data.header.file_version.as_str()) {
            warn!("unsupported ACMI version: {:?}", self.data.header.file_version);
            return false;
        }

        debug!("ACMI {} recording", self.data.header.file_version);
        true
    }

    fn parse_record (&mut self, line: &LogicalLine)->Result<()> {
        let rec: &str = line.text.as_ref();

        if let Some(rest) = rec.strip_prefix('#') {
            self.parse_time_marker( rest)

        } else if let Some(rest) = rec.strip_prefix('-') {
            self.parse_removal( rest)

        } else if let Some(rest) = rec.strip_prefix("0,") {
            if rest.starts_with("Event=") || rest.starts_with("Event,") {
                Ok(()) // event records are recognized but not decoded yet
            } else {
                self.parse_global_properties( rest)
            }

        } else {
            self.parse_entity_update( rec)
        }
    }

    /// `#t` - advance the frame clock. Pending removals take effect with the transition,
    /// so a removed object still shows in the scene of its final timestamp
    fn parse_time_marker (&mut self, rest: &str)->Result<()> {
        let t: f64 = rest.trim().parse()
            .map_err( |_| parse_error!("invalid time marker #{}", rest))?;
        if !t.is_finite() || t < 0.0 {
            return Err( parse_error!("invalid time marker #{}", rest));
        }
        if t < self.current_ts {
            return Err( parse_error!("time marker #{} behind current frame {}", rest, self.current_ts));
        }

        if t != self.current_ts {
            let mut scene = self.current_frame.scene.clone();
            for id in self.pending_destroyed.drain(..) {
                scene.shift_remove( &id);
            }
            self.data.frames.push( std::mem::replace( &mut self.current_frame, Frame { time_stamp: t, scene }));
            self.current_ts = t;
        }
        Ok(())
    }

    /// `-id` - the object ends at the current timestamp and leaves the scene with the
    /// next frame transition
    fn parse_removal (&mut self, rest: &str)->Result<()> {
        let id = parse_hex_id( rest)?;
        self.ended.insert( id, self.current_ts);
        if self.kept.contains( &id) {
            self.pending_destroyed.push( id);
        }
        Ok(())
    }

    /// `0,Name=Value,..` - recognized names update the global properties, the reference
    /// position doubles as the active offset origin for subsequent T= decoding.
    /// Unknown names are preserved in observation order
    fn parse_global_properties (&mut self, rest: &str)->Result<()> {
        let fields = split_fields( rest);

        // validate first so a malformed fragment skips the line without a partial update
        for field in &fields {
            let Some((name,value)) = field.split_once('=') else {
                return Err( parse_error!("global property without '=': {}", field));
            };
            match name {
                "ReferenceTime" | "RecordingTime" => {
                    if parse_datetime( value).is_none() {
                        return Err( parse_error!("invalid {} instant '{}'", name, value));
                    }
                }
                "ReferenceLongitude" | "ReferenceLatitude" => {
                    if value.trim().parse::<f64>().is_err() {
                        return Err( parse_error!("invalid {} value '{}'", name, value));
                    }
                }
                _ => {}
            }
        }

        let props = &mut self.data.global_properties;
        for field in &fields {
            let Some((name,value)) = field.split_once('=') else { continue };
            match name {
                "ReferenceTime" => props.reference_time = parse_datetime( value),
                "RecordingTime" => props.recording_time = parse_datetime( value),
                "ReferenceLongitude" => {
                    let v: f64 = value.trim().parse().unwrap_or(0.0);
                    props.reference_longitude = v;
                    self.ref_lon = v;
                }
                "ReferenceLatitude" => {
                    let v: f64 = value.trim().parse().unwrap_or(0.0);
                    props.reference_latitude = v;
                    self.ref_lat = v;
                }
                "DataSource" => props.data_source = Some( value.to_string()),
                "DataRecorder" => props.data_recorder = Some( value.to_string()),
                "Author" => props.author = Some( value.to_string()),
                "Title" => props.title = Some( value.to_string()),
                "Category" => props.category = Some( value.to_string()),
                "Briefing" => props.briefing = Some( value.to_string()),
                "Debriefing" => props.debriefing = Some( value.to_string()),
                "Comments" => props.comments = Some( value.to_string()),
                _ => { props.additional_props.insert( name.to_string(), value.to_string()); }
            }
        }
        Ok(())
    }

    /// `id,Name=Value,..` - object upsert. New ids run through the type filter once;
    /// kept ids get their transform updated in the current frame's scene
    fn parse_entity_update (&mut self, rec: &str)->Result<()> {
        let Some(ci) = rec.find(',') else {
            return Err( parse_error!("object record without fields: {}", rec));
        };
        let id = parse_hex_id( &rec[..ci])?;
        let fields = split_fields( &rec[ci+1..]);

        for field in &fields {
            if !field.contains('=') {
                return Err( parse_error!("object property without '=': {}", field));
            }
        }

        // transform first so a malformed numeric token skips the line without a partial update
        let mut transform: Option<Transform> = None;
        for field in &fields {
            if let Some(value) = field.strip_prefix("T=") {
                transform = Some( self.decode_transform( id, value)?);
            }
        }

        let is_new = !self.kept.contains( &id) && !self.dropped.contains( &id);
        if is_new {
            let mut props = EntityProps::new( id);
            let destroyed = apply_entity_fields( &mut props, &fields);

            if self.passes_filter( &props) {
                self.kept.insert( id);
                self.first_seen.insert( id, self.current_ts);
                if destroyed { self.ended.insert( id, self.current_ts); }
                self.data.entities.insert( id, props);
            } else {
                debug!("filtered object {}", props);
                self.dropped.insert( id);
                return Ok(())
            }
        } else if self.kept.contains( &id) {
            if let Some(props) = self.data.entities.get_mut( &id) {
                if apply_entity_fields( props, &fields) {
                    self.ended.insert( id, self.current_ts);
                }
            }
        } else {
            return Ok(()) // filtered objects stay out of the scene for the whole parse
        }

        if let Some(transform) = transform {
            self.current_frame.scene.insert( id, transform);
        }
        Ok(())
    }

    /// keep an object iff none of its type names is filtered; objects without types
    /// are kept unless "Untyped" is filtered
    fn passes_filter (&self, props: &EntityProps)->bool {
        if props.types.is_empty() {
            !self.options.filter.iter().any( |t| t == "Untyped")
        } else {
            !props.types.iter().any( |t| self.options.filter.contains( t))
        }
    }

    /// decode a `T=lon|lat|alt|..` value. Empty tokens inherit from the object's transform
    /// in the current scene (or default). Token counts:
    ///   3..5  position only
    ///   6     position, roll, pitch, yaw
    ///   7..9  position, u/v plane coordinates (ignored), roll, pitch, yaw, heading (ignored)
    fn decode_transform (&self, id: u64, value: &str)->Result<Transform> {
        let prior = self.current_frame.scene.get( &id);
        let tokens: Vec<&str> = value.split('|').collect();

        let (roll_tok, pitch_tok, yaw_tok) = if tokens.len() == 6 {
            (token( &tokens, 3), token( &tokens, 4), token( &tokens, 5))
        } else if tokens.len() >= 7 {
            (token( &tokens, 5), token( &tokens, 6), token( &tokens, 7))
        } else {
            ("", "", "")
        };

        let longitude = match opt_f64( token( &tokens, 0))? {
            Some(off) => self.ref_lon + off,
            None => prior.map( |t| t.longitude).unwrap_or( self.ref_lon)
        };
        let latitude = match opt_f64( token( &tokens, 1))? {
            Some(off) => self.ref_lat + off,
            None => prior.map( |t| t.latitude).unwrap_or( self.ref_lat)
        };
        let altitude = match opt_f64( token( &tokens, 2))? {
            Some(msl) => msl + self.geoid_height( latitude, longitude),
            None => match prior {
                Some(t) => t.altitude, // already above ellipsoid
                None => self.geoid_height( latitude, longitude)
            }
        };

        // each Euler angle inherits independently when its token is empty
        let roll = match opt_f64( roll_tok)? {
            Some(deg) => Some( deg.to_radians()),
            None => prior.and_then( |t| t.roll)
        };
        let pitch = match opt_f64( pitch_tok)? {
            Some(deg) => Some( deg.to_radians()),
            None => prior.and_then( |t| t.pitch)
        };
        let yaw = match opt_f64( yaw_tok)? {
            Some(deg) => Some( deg.to_radians()),
            None => prior.and_then( |t| t.yaw)
        };

        Ok( Transform { longitude, latitude, altitude, roll, pitch, yaw })
    }

    fn geoid_height (&self, lat_deg: f64, lon_deg: f64)->f64 {
        match &self.geoid {
            Some(geoid) => geoid.height_at( lat_deg, lon_deg),
            None => 0.0
        }
    }

    /// push the in-flight frame, derive the recording time span and close open object spans
    fn finish (&mut self) {
        self.data.frames.push( std::mem::take( &mut self.current_frame));

        let ref_time = self.data.global_properties.reference_time;
        let first_ts = self.data.frames.iter().find( |f| !f.scene.is_empty()).map( |f| f.time_stamp);
        let last_ts = self.data.frames.last().map( |f| f.time_stamp);

        match (ref_time, first_ts, last_ts) {
            (Some(rt), Some(t0), Some(t1)) => {
                self.data.time_span = TimeSpan::new( plus_secs_f64( &rt, t0), plus_secs_f64( &rt, t1));
            }
            _ => {
                warn!("recording without valid time span");
                self.data.is_valid = false;
            }
        }

        if let Some(rt) = ref_time {
            let data_end = self.data.time_span.end;
            for (id, props) in self.data.entities.iter_mut() {
                let start = self.first_seen.get( id).map( |s| plus_secs_f64( &rt, *s));
                let end = self.ended.get( id).map( |s| plus_secs_f64( &rt, *s)).or( data_end);
                props.time_span = TimeSpan { start, end };
            }
        }

        debug!("parsed {} frames with {} tracked objects", self.data.frames.len(), self.data.entities.len());
    }
}

/* #region record field helpers ********************************************************************/

/// split a record remainder on commas that are not escaped with a backslash.
/// The escape stays part of the value
pub fn split_fields (s: &str)->Vec<&str> {
    let bytes = s.as_bytes();
    let mut fields: Vec<&str> = Vec::new();
    let mut start = 0;

    for i in 0..bytes.len() {
        if bytes[i] == b',' && (i == 0 || bytes[i-1] != b'\\') {
            fields.push( &s[start..i]);
            start = i + 1;
        }
    }
    fields.push( &s[start..]);
    fields
}

fn token<'a> (tokens: &[&'a str], i: usize)->&'a str {
    tokens.get(i).copied().unwrap_or("")
}

fn parse_hex_id (s: &str)->Result<u64> {
    u64::from_str_radix( s.trim(), 16)
        .map_err( |_| parse_error!("invalid object id '{}'", s))
}

fn opt_f64 (token: &str)->Result<Option<f64>> {
    let t = token.trim();
    if t.is_empty() { return Ok(None) }
    t.parse::<f64>().map( Some)
        .map_err( |_| parse_error!("invalid numeric token '{}'", token))
}

/// apply recognized object properties, returns whether a destruction was flagged.
/// Unrecognized names (including the already handled T=) are ignored
fn apply_entity_fields (props: &mut EntityProps, fields: &[&str])->bool {
    let mut destroyed = false;

    for field in fields {
        let Some((name,value)) = field.split_once('=') else { continue };
        match name {
            "Name" => props.name = Some( value.to_string()),
            "Type" => props.types = value.split('+').filter( |s| !s.is_empty()).map( |s| s.to_string()).collect(),
            "CallSign" => props.callsign = Some( value.to_string()),
            "Pilot" => props.pilot = Some( value.to_string()),
            "Group" => props.group = Some( value.to_string()),
            "Country" => props.country = Some( value.to_string()),
            "Coalition" => props.coalition = Some( value.to_string()),
            "Color" => props.color = Some( value.to_string()),
            "destroyed" => { if value == "1" { destroyed = true } }
            _ => {}
        }
    }
    destroyed
}

/* #endregion record field helpers */
