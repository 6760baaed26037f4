//! Acquisition fields encoded in capture-software filenames, e.g.
//! `Light_Orion_180.0s_Bin1_294MC_L-Extreme_gain120_20250405-214232_-10C_90deg_001.fit`.

use crate::metadata::{non_empty, FileMetadata};
use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref COMPOSITE: Regex = Regex::new(concat!(
        r"_(?P<exposure>[\d.]+)s",
        r"_Bin(?P<bin>\d+)",
        r"_(?P<camera>[^_]+)",
        r"(?:_(?P<filter>[^_]+))?",
        r"_gain(?P<gain>\d+)",
        r"_(?P<timestamp>\d{8}-\d{6})",
        r"_(?P<temperature>-?\d+(?:\.\d+)?)C",
        r"_(?P<rotation>\d+)deg",
    ))
    .expect("composite filename pattern");
    static ref EXPOSURE: Regex = Regex::new(r"(?i)(?P<v>[\d.]+)s").expect("exposure pattern");
    static ref BIN: Regex = Regex::new(r"(?i)Bin(?P<v>\d+)").expect("bin pattern");
    static ref GAIN: Regex = Regex::new(r"(?i)(?:gain|ISO)(?P<v>\d+)").expect("gain pattern");
    static ref TEMPERATURE: Regex =
        Regex::new(r"(?i)_(?P<v>-?\d+(?:\.\d+)?)C").expect("temperature pattern");
    static ref ROTATION: Regex = Regex::new(r"(?i)_(?P<v>\d+)deg").expect("rotation pattern");
    static ref TIMESTAMP: Regex = Regex::new(r"(?P<v>\d{8}-\d{6})").expect("timestamp pattern");
    static ref TOKEN_SPLIT: Regex = Regex::new(r"[_\-]").expect("token split pattern");
    static ref BIN_TOKEN: Regex = Regex::new(r"(?i)^Bin\d+").expect("bin token pattern");
    static ref ALPHANUMERIC: Regex = Regex::new(r"^[A-Za-z0-9]+$").expect("alphanumeric pattern");
}

/// Parse a filename: the strict composite layout first, and only if that
/// fails anywhere in the name, the independent per-field searches.
pub fn parse(file_name: &str) -> FileMetadata {
    match COMPOSITE.captures(file_name) {
        Some(caps) => from_composite(&caps),
        None => fallback_search(file_name),
    }
}

fn group(caps: &Captures, name: &str) -> Option<String> {
    caps.name(name).and_then(|m| non_empty(m.as_str()))
}

fn from_composite(caps: &Captures) -> FileMetadata {
    FileMetadata {
        camera: group(caps, "camera"),
        filter: group(caps, "filter"),
        gain: group(caps, "gain"),
        exposure: group(caps, "exposure"),
        temperature: group(caps, "temperature"),
        bin: group(caps, "bin"),
        rotation: group(caps, "rotation"),
        timestamp: group(caps, "timestamp"),
    }
}

fn search(pattern: &Regex, file_name: &str) -> Option<String> {
    pattern
        .captures(file_name)
        .and_then(|caps| group(&caps, "v"))
}

fn fallback_search(file_name: &str) -> FileMetadata {
    FileMetadata {
        camera: camera_after_bin(file_name),
        filter: None,
        gain: search(&GAIN, file_name),
        exposure: search(&EXPOSURE, file_name),
        temperature: search(&TEMPERATURE, file_name),
        bin: search(&BIN, file_name),
        rotation: search(&ROTATION, file_name),
        timestamp: search(&TIMESTAMP, file_name),
    }
}

/// The purely alphanumeric token right after the first `BinN` token.
fn camera_after_bin(file_name: &str) -> Option<String> {
    let tokens: Vec<&str> = TOKEN_SPLIT
        .split(file_name)
        .filter(|t| !t.is_empty())
        .collect();
    let bin_idx = tokens.iter().position(|t| BIN_TOKEN.is_match(t))?;
    tokens
        .get(bin_idx + 1)
        .filter(|candidate| ALPHANUMERIC.is_match(candidate))
        .map(|candidate| candidate.to_string())
}

/// Camera-token false positives: bare dates/timestamps and gain/ISO tokens.
pub fn is_bogus_camera(token: &str) -> bool {
    lazy_static! {
        static ref STAMP: Regex = Regex::new(r"^\d{8}$|^\d{8}-\d{6}$").expect("stamp pattern");
        static ref GAIN_ISO: Regex = Regex::new(r"(?i)^(gain|ISO)\d+").expect("gain token pattern");
    }
    STAMP.is_match(token) || GAIN_ISO.is_match(token)
}
