use serde::{Serialize, Serializer};

/// One output row. Column order follows field order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataRecord {
    #[serde(rename = "Object")]
    pub object: String,
    #[serde(rename = "Filter")]
    pub filter: String,
    #[serde(rename = "Camera")]
    pub camera: String,
    #[serde(rename = "Telescope")]
    pub telescope: String,
    #[serde(rename = "Exposure")]
    pub exposure: String,
    #[serde(rename = "Bin")]
    pub bin: String,
    #[serde(rename = "Gain")]
    pub gain: String,
    #[serde(rename = "Temp")]
    pub temp: String,
    #[serde(rename = "Rotation")]
    pub rotation: String,
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "Session Folder")]
    pub session_folder: String,
    #[serde(rename = "Edits Detected", serialize_with = "yes_no")]
    pub edits_detected: bool,
    #[serde(rename = "Path")]
    pub path: String,
}

fn yes_no<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *value { "Yes" } else { "No" })
}

