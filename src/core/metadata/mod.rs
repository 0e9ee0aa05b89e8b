//! # Metadata Module
//!
//! Reads the capture time and GPS position embedded in a photo.
//!
//! ## Extracted Fields
//! - Date taken (DateTimeOriginal) - required
//! - GPS latitude/longitude - optional
//!
//! EXIF metadata is typically found in JPEG and TIFF files. Anything the
//! EXIF reader cannot open is treated as an unreadable input and skipped.

use crate::error::MetadataError;
use chrono::NaiveDateTime;
use exif::{Exif, In, Reader, Tag, Value};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// EXIF date format: "YYYY:MM:DD HH:MM:SS"
pub const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Name of the tag every catalogued photo must carry
pub const CAPTURE_TAG: &str = "DateTimeOriginal";

/// A decimal-degree position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Metadata needed to file a photo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoMetadata {
    /// Original capture date/time, as recorded by the camera
    pub captured_at: NaiveDateTime,
    /// Where the photo was taken, if the camera recorded it
    pub coordinate: Option<Coordinate>,
}

/// Source of capture metadata for a file
///
/// Implement this trait to substitute metadata in tests.
pub trait MetadataResolver {
    /// Read the capture time and optional position of `path`
    fn resolve(&self, path: &Path) -> Result<PhotoMetadata, MetadataError>;
}

/// Resolver backed by the file's EXIF block
#[derive(Debug, Default, Clone, Copy)]
pub struct ExifMetadataResolver;

impl ExifMetadataResolver {
    pub fn new() -> Self {
        Self
    }
}

impl MetadataResolver for ExifMetadataResolver {
    fn resolve(&self, path: &Path) -> Result<PhotoMetadata, MetadataError> {
        let file = File::open(path).map_err(|source| MetadataError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let mut bufreader = BufReader::new(file);
        let exif = Reader::new()
            .read_from_container(&mut bufreader)
            .map_err(|e| MetadataError::Decode {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let captured_at = capture_time(&exif, path)?;
        let coordinate = gps_coordinate(&exif);

        Ok(PhotoMetadata {
            captured_at,
            coordinate,
        })
    }
}

fn capture_time(exif: &Exif, path: &Path) -> Result<NaiveDateTime, MetadataError> {
    let field = exif
        .get_field(Tag::DateTimeOriginal, In::PRIMARY)
        .ok_or_else(|| MetadataError::MissingTag {
            path: path.to_path_buf(),
            tag: CAPTURE_TAG,
        })?;

    let raw = get_string_value(&field.value).unwrap_or_default();
    parse_exif_datetime(&raw).ok_or_else(|| MetadataError::InvalidTag {
        path: path.to_path_buf(),
        tag: CAPTURE_TAG,
        value: raw,
    })
}

/// Parse an EXIF timestamp such as "2024:01:15 14:30:00"
pub fn parse_exif_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), EXIF_DATETIME_FORMAT).ok()
}

fn gps_coordinate(exif: &Exif) -> Option<Coordinate> {
    let lat = gps_degrees(exif, Tag::GPSLatitude, Tag::GPSLatitudeRef)?;
    let lon = gps_degrees(exif, Tag::GPSLongitude, Tag::GPSLongitudeRef)?;
    Some(Coordinate { lat, lon })
}

/// Convert a degree/minute/second triple plus hemisphere reference to decimal degrees
fn gps_degrees(exif: &Exif, coord_tag: Tag, ref_tag: Tag) -> Option<f64> {
    let coord = exif.get_field(coord_tag, In::PRIMARY)?;
    let reference = exif.get_field(ref_tag, In::PRIMARY)?;

    let Value::Rational(ref dms) = coord.value else {
        return None;
    };
    if dms.len() != 3 || dms.iter().any(|r| r.denom == 0) {
        return None;
    }

    let decimal = dms[0].to_f64() + dms[1].to_f64() / 60.0 + dms[2].to_f64() / 3600.0;

    match get_string_value(&reference.value)?.chars().next()? {
        'N' | 'E' => Some(decimal),
        'S' | 'W' => Some(-decimal),
        _ => None,
    }
}

/// Helper to extract string from EXIF ASCII value
fn get_string_value(value: &Value) -> Option<String> {
    if let Value::Ascii(ref vec) = value {
        if let Some(bytes) = vec.first() {
            if let Ok(s) = std::str::from_utf8(bytes) {
                let trimmed = s.trim_end_matches('\0').trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
        }
    }
    None
}

#[cfg(test)]
pub(crate) mod fixtures {
    use exif::experimental::Writer;
    use exif::{Field, In, Rational, Tag, Value};
    use std::io::Cursor;
    use std::path::Path;

    fn ascii(tag: Tag, s: &str) -> Field {
        Field {
            tag,
            ifd_num: In::PRIMARY,
            value: Value::Ascii(vec![s.as_bytes().to_vec()]),
        }
    }

    fn dms(tag: Tag, degrees: u32, minutes: u32, seconds_x100: u32) -> Field {
        Field {
            tag,
            ifd_num: In::PRIMARY,
            value: Value::Rational(vec![
                Rational { num: degrees, denom: 1 },
                Rational { num: minutes, denom: 1 },
                Rational { num: seconds_x100, denom: 100 },
            ]),
        }
    }

    /// Write a TIFF container holding the given capture time and GPS position
    pub fn write_tiff(
        path: &Path,
        captured_at: Option<&str>,
        gps: Option<((u32, u32, u32, &str), (u32, u32, u32, &str))>,
    ) {
        let mut fields = vec![ascii(Tag::Make, "Test Camera")];
        if let Some(ts) = captured_at {
            fields.push(ascii(Tag::DateTimeOriginal, ts));
        }
        if let Some(((ld, lm, ls, lr), (od, om, os, or))) = gps {
            fields.push(dms(Tag::GPSLatitude, ld, lm, ls));
            fields.push(ascii(Tag::GPSLatitudeRef, lr));
            fields.push(dms(Tag::GPSLongitude, od, om, os));
            fields.push(ascii(Tag::GPSLongitudeRef, or));
        }

        let mut writer = Writer::new();
        for field in &fields {
            writer.push_field(field);
        }
        let mut buf = Cursor::new(Vec::new());
        writer.write(&mut buf, false).unwrap();
        std::fs::write(path, buf.into_inner()).unwrap();
    }
}
