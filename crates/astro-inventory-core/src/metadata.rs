use serde::Deserialize;
use std::fmt;

/// The per-session fields shared between files of one folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataField {
    Camera,
    Filter,
    Gain,
    Exposure,
    Temperature,
}

impl MetadataField {
    pub const ALL: [MetadataField; 5] = [
        MetadataField::Camera,
        MetadataField::Filter,
        MetadataField::Gain,
        MetadataField::Exposure,
        MetadataField::Temperature,
    ];
}

impl fmt::Display for MetadataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MetadataField::Camera => "camera",
            MetadataField::Filter => "filter",
            MetadataField::Gain => "gain",
            MetadataField::Exposure => "exposure",
            MetadataField::Temperature => "temperature",
        };
        f.write_str(name)
    }
}

/// Best-effort acquisition metadata for one file, from any source.
///
/// An empty string is never stored: use [`non_empty`] when filling fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileMetadata {
    pub camera: Option<String>,
    pub filter: Option<String>,
    pub gain: Option<String>,
    pub exposure: Option<String>,
    pub temperature: Option<String>,
    pub bin: Option<String>,
    pub rotation: Option<String>,
    pub timestamp: Option<String>,
}

impl FileMetadata {
    pub fn field(&self, field: MetadataField) -> Option<&str> {
        match field {
            MetadataField::Camera => self.camera.as_deref(),
            MetadataField::Filter => self.filter.as_deref(),
            MetadataField::Gain => self.gain.as_deref(),
            MetadataField::Exposure => self.exposure.as_deref(),
            MetadataField::Temperature => self.temperature.as_deref(),
        }
    }

    fn field_mut(&mut self, field: MetadataField) -> &mut Option<String> {
        match field {
            MetadataField::Camera => &mut self.camera,
            MetadataField::Filter => &mut self.filter,
            MetadataField::Gain => &mut self.gain,
            MetadataField::Exposure => &mut self.exposure,
            MetadataField::Temperature => &mut self.temperature,
        }
    }

    pub fn missing(&self, required: &[MetadataField]) -> Vec<MetadataField> {
        required
            .iter()
            .copied()
            .filter(|field| self.field(*field).is_none())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        *self == FileMetadata::default()
    }

    /// Take values from `other` only where this record has none.
    pub fn fill_gaps(&mut self, other: &FileMetadata) {
        fn fill(slot: &mut Option<String>, value: &Option<String>) {
            if slot.is_none() {
                slot.clone_from(value);
            }
        }
        fill(&mut self.camera, &other.camera);
        fill(&mut self.filter, &other.filter);
        fill(&mut self.gain, &other.gain);
        fill(&mut self.exposure, &other.exposure);
        fill(&mut self.temperature, &other.temperature);
        fill(&mut self.bin, &other.bin);
        fill(&mut self.rotation, &other.rotation);
        fill(&mut self.timestamp, &other.timestamp);
    }
}

/// Trimmed value, or `None` when nothing is left.
pub fn non_empty(value: impl AsRef<str>) -> Option<String> {
    let trimmed = value.as_ref().trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Last known values for the files of one containing folder.
///
/// A field is only ever replaced by another non-empty value, never cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionMetadata {
    pub camera: Option<String>,
    pub filter: Option<String>,
    pub gain: Option<String>,
    pub exposure: Option<String>,
    pub temperature: Option<String>,
}

impl SessionMetadata {
    fn field_mut(&mut self, field: MetadataField) -> &mut Option<String> {
        match field {
            MetadataField::Camera => &mut self.camera,
            MetadataField::Filter => &mut self.filter,
            MetadataField::Gain => &mut self.gain,
            MetadataField::Exposure => &mut self.exposure,
            MetadataField::Temperature => &mut self.temperature,
        }
    }

    /// Two-way merge: gaps in `meta` are filled from the session, values
    /// present in `meta` overwrite the session.
    pub fn sync(&mut self, meta: &mut FileMetadata) {
        for field in MetadataField::ALL {
            let cached = self.field_mut(field);
            let current = meta.field_mut(field);
            if current.is_some() {
                cached.clone_from(current);
            } else {
                current.clone_from(cached);
            }
        }
    }

    /// Store a single field; empty values are ignored.
    pub fn remember(&mut self, field: MetadataField, value: &str) {
        if let Some(value) = non_empty(value) {
            *self.field_mut(field) = Some(value);
        }
    }
}
