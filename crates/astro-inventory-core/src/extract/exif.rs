//! Consumer-camera metadata via EXIF.

use crate::error::Error;
use crate::metadata::{non_empty, FileMetadata};
use exif::{Exif, Field, In, Reader as ExifReader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

fn field<'a>(exif: &'a Exif, tag: Tag) -> Option<&'a Field> {
    exif.get_field(tag, In::PRIMARY)
}

fn ascii(field: &Field) -> Option<String> {
    match &field.value {
        Value::Ascii(parts) => parts
            .iter()
            .find_map(|bytes| non_empty(String::from_utf8_lossy(bytes))),
        _ => None,
    }
}

fn signed_real(field: &Field) -> Option<f64> {
    match &field.value {
        Value::SRational(v) => v.first().map(|r| r.to_f64()),
        Value::Rational(v) => v.first().map(|r| r.to_f64()),
        _ => None,
    }
}

/// Seconds with at most four decimals and no trailing zeros, so `1/250`
/// becomes `0.004`.
pub fn format_exposure(seconds: f64) -> String {
    let text = format!("{:.4}", seconds);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    text.to_string()
}

fn exposure(field: &Field) -> Option<String> {
    match &field.value {
        Value::Rational(v) => v.first().and_then(|r| {
            if r.denom == 0 {
                None
            } else {
                Some(format_exposure(r.to_f64()))
            }
        }),
        _ => non_empty(field.display_value().to_string()),
    }
}

pub fn metadata_from_exif(exif: &Exif) -> FileMetadata {
    FileMetadata {
        camera: field(exif, Tag::Model).and_then(ascii),
        gain: field(exif, Tag::PhotographicSensitivity)
            .and_then(|f| f.value.get_uint(0))
            .map(|iso| iso.to_string()),
        exposure: field(exif, Tag::ExposureTime).and_then(exposure),
        // EXIF 2.31 ambient temperature, degrees Celsius
        temperature: field(exif, Tag::Temperature)
            .and_then(signed_real)
            .map(|t| t.to_string()),
        ..FileMetadata::default()
    }
}

pub fn extract(path: &Path) -> Result<FileMetadata, Error> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let exif = ExifReader::new()
        .read_from_container(&mut reader)
        .map_err(|e| Error::Header(format!("EXIF: {}", e)))?;
    Ok(metadata_from_exif(&exif))
}
