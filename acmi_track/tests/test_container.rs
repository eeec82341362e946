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

use std::io::{Cursor, Write};
use zip::write::{SimpleFileOptions, ZipWriter};

use acmi_track::errors::AcmiTrackError;
use acmi_track::{parse_acmi, ParseOptions};

/// compressed container tests. run with "cargo test test_zip_wrapper -- --nocapture"

const MINIMAL: &str = "FileType=text/acmi/tacview\n\
FileVersion=2.2\n\
0,ReferenceTime=2024-01-01T00:00:00Z\n\
#0\n\
a,T=0|0|0,Name=x,Type=Air+FixedWing\n\
#1\n\
a,T=0.0001|0|100\n";

fn zip_bytes (entries: &[(&str,&str)])->Vec<u8> {
    let mut cursor = Cursor::new( Vec::new());
    let mut writer = ZipWriter::new( &mut cursor);

    for (name, content) in entries {
        writer.start_file( *name, SimpleFileOptions::default()).unwrap();
        writer.write_all( content.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
    cursor.into_inner()
}

#[tokio::test]
async fn test_zip_wrapper () {
    let bytes = zip_bytes( &[("mission.txt.acmi", MINIMAL)]);
    assert_eq!( &bytes[0..2], b"PK");

    let zipped = parse_acmi( &bytes, ParseOptions::default()).await.unwrap();
    let plain = parse_acmi( MINIMAL.as_bytes(), ParseOptions::default()).await.unwrap();

    // the wrapped recording decodes exactly like the plain one
    assert!( zipped.is_valid);
    assert_eq!( zipped.entities.len(), plain.entities.len());
    assert_eq!( zipped.frames.len(), plain.frames.len());
    assert_eq!( zipped.time_span, plain.time_span);
    for (frame_z, frame_p) in zipped.frames.iter().zip( plain.frames.iter()) {
        assert_eq!( frame_z.time_stamp, frame_p.time_stamp);
        assert_eq!( frame_z.scene, frame_p.scene);
    }
}

#[tokio::test]
async fn test_two_entry_archive_is_corrupt () {
    let bytes = zip_bytes( &[("a.acmi", MINIMAL), ("b.acmi", MINIMAL)]);

    let result = parse_acmi( &bytes, ParseOptions::default()).await;
    assert!( matches!( result, Err( AcmiTrackError::CorruptContainer(_))));
}

#[tokio::test]
async fn test_truncated_archive_is_corrupt () {
    let mut bytes = zip_bytes( &[("a.acmi", MINIMAL)]);
    bytes.truncate( 20); // keep the PK signature, drop the directory

    let result = parse_acmi( &bytes, ParseOptions::default()).await;
    assert!( result.is_err());
}
