//! Primary-header fields of FITS files, read with `fitrs`.

use crate::error::Error;
use crate::metadata::{non_empty, FileMetadata};
use fitrs::{Fits, Hdu, HeaderValue};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const CARD_LEN: usize = 80;
const BLOCK_LEN: u64 = 2880;

/// Text form of a header value. Reals always keep a fractional part, so
/// `EXPTIME = 180.0` reads `180.0` like the `180.0s` filename token.
pub fn value_text(value: &HeaderValue) -> Option<String> {
    match value {
        HeaderValue::CharacterString(s) => non_empty(s),
        HeaderValue::IntegerNumber(i) => Some(i.to_string()),
        HeaderValue::RealFloatingNumber(f) => Some(format!("{:?}", f)),
        _ => None,
    }
}

/// A FITS file opens with a `SIMPLE` card and holds at least one full
/// header block. Anything else never reaches the parser.
fn check_signature(path: &Path) -> Result<(), Error> {
    let mut file = File::open(path)?;
    if file.metadata()?.len() < BLOCK_LEN {
        return Err(Error::Header("shorter than one FITS block".to_string()));
    }
    let mut card = [0u8; CARD_LEN];
    file.read_exact(&mut card)?;
    if !card.starts_with(b"SIMPLE") {
        return Err(Error::Header("missing SIMPLE keyword".to_string()));
    }
    Ok(())
}

/// Primary HDU of the file at `path`.
pub fn read_primary(path: &Path) -> Result<Hdu, Error> {
    check_signature(path)?;
    let fits = Fits::open(path).map_err(|e| Error::Header(format!("FITS: {}", e)))?;
    fits.get(0)
        .ok_or_else(|| Error::Header("no primary HDU".to_string()))
}

fn first_of(hdu: &Hdu, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| hdu.value(key))
        .find_map(value_text)
}

/// Map the primary header onto metadata fields.
pub fn metadata_from_header(hdu: &Hdu) -> FileMetadata {
    FileMetadata {
        camera: first_of(hdu, &["INSTRUME", "CAMERA"]),
        filter: first_of(hdu, &["FILTER"]),
        gain: first_of(hdu, &["GAIN", "ISO"]),
        exposure: first_of(hdu, &["EXPTIME", "EXPOSURE"]),
        temperature: first_of(hdu, &["CCD-TEMP", "SET-TEMP"]),
        ..FileMetadata::default()
    }
}

pub fn extract(path: &Path) -> Result<FileMetadata, Error> {
    read_primary(path).map(|hdu| metadata_from_header(&hdu))
}
