//! EXIF fixtures shared by the integration tests.

#![allow(dead_code)]

use exif::experimental::Writer;
use exif::{Field, In, Rational, Tag, Value};
use std::io::Cursor;

fn ascii(tag: Tag, s: &str) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Ascii(vec![s.as_bytes().to_vec()]),
    }
}

fn degrees(tag: Tag, d: u32) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Rational(vec![
            Rational { num: d, denom: 1 },
            Rational { num: 0, denom: 1 },
            Rational { num: 0, denom: 1 },
        ]),
    }
}

/// Minimal TIFF with an optional capture time and optional north/south position
pub fn photo_bytes(captured_at: Option<&str>, north: Option<bool>) -> Vec<u8> {
    let mut fields = vec![ascii(Tag::Make, "Test Camera")];
    if let Some(ts) = captured_at {
        fields.push(ascii(Tag::DateTimeOriginal, ts));
    }
    if let Some(north) = north {
        fields.push(degrees(Tag::GPSLatitude, 59));
        fields.push(ascii(Tag::GPSLatitudeRef, if north { "N" } else { "S" }));
        fields.push(degrees(Tag::GPSLongitude, 10));
        fields.push(ascii(Tag::GPSLongitudeRef, "E"));
    }

    let mut writer = Writer::new();
    for field in &fields {
        writer.push_field(field);
    }
    let mut buf = Cursor::new(Vec::new());
    writer.write(&mut buf, false).unwrap();
    buf.into_inner()
}
