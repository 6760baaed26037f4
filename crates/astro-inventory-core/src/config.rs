use crate::error::Error;
use crate::extract::ExtractorKind;
use crate::metadata::MetadataField;
use config::{Config, ConfigError, File as ConfigFile};
use glob::Pattern;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::error;

/// Settings read from `Config.toml`. Every key is optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub root_path: Option<String>,
    pub output_path: String,
    pub allowed_prefixes: Vec<String>,
    pub skipped_suffixes: Vec<String>,
    pub calibration_keywords: Vec<String>,
    pub edit_indicators: Vec<String>,
    pub edit_name_marker: String,
    pub date_folder_pattern: String,
    /// Extension (no dot) to header reader category.
    pub file_types: BTreeMap<String, ExtractorKind>,
    pub required_fields: RequiredFields,
    pub progress_interval: usize,
    pub ignore_patterns: Vec<String>,
}

/// Fields that must be known after filename parsing and the session cache,
/// otherwise the header reader for the category is opened.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RequiredFields {
    pub fits: Vec<MetadataField>,
    pub exif: Vec<MetadataField>,
}

impl RequiredFields {
    pub fn for_kind(&self, kind: ExtractorKind) -> &[MetadataField] {
        match kind {
            ExtractorKind::Fits => &self.fits,
            ExtractorKind::Exif => &self.exif,
        }
    }
}

impl Default for RequiredFields {
    fn default() -> Self {
        Self {
            fits: vec![
                MetadataField::Camera,
                MetadataField::Gain,
                MetadataField::Temperature,
                MetadataField::Filter,
            ],
            exif: vec![
                MetadataField::Camera,
                MetadataField::Gain,
                MetadataField::Exposure,
            ],
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

impl Default for AppConfig {
    fn default() -> Self {
        let file_types = [
            ("fit", ExtractorKind::Fits),
            ("fits", ExtractorKind::Fits),
            ("cr2", ExtractorKind::Exif),
            ("dng", ExtractorKind::Exif),
            ("jpg", ExtractorKind::Exif),
            ("jpeg", ExtractorKind::Exif),
        ]
        .into_iter()
        .map(|(ext, kind)| (ext.to_string(), kind))
        .collect();

        Self {
            root_path: None,
            output_path: "astro_inventory.csv".to_string(),
            allowed_prefixes: strings(&["Preview_", "Light_", "CRW_", "IMG_"]),
            skipped_suffixes: strings(&["_thn.jpg"]),
            calibration_keywords: strings(&["darks", "bias", "flats", "calibration"]),
            edit_indicators: strings(&[".tif", ".tiff", ".psd"]),
            edit_name_marker: "stack".to_string(),
            date_folder_pattern: r"^\d{4}[-_]?\d{2}[-_]?\d{2}".to_string(),
            file_types,
            required_fields: RequiredFields::default(),
            progress_interval: 50,
            ignore_patterns: Vec::new(),
        }
    }
}

pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}

impl AppConfig {
    /// Compile patterns and normalize keyword case.
    pub fn into_rules(self) -> Result<ScanRules, Error> {
        let date_folder = Regex::new(&self.date_folder_pattern)?;

        let ignore_patterns = self
            .ignore_patterns
            .iter()
            .filter_map(|glob| match Pattern::new(glob) {
                Ok(p) => Some(p),
                Err(e) => {
                    error!("Invalid glob pattern '{}': {}", glob, e);
                    None
                }
            })
            .collect();

        let file_types = self
            .file_types
            .into_iter()
            .map(|(ext, kind)| (ext.trim_start_matches('.').to_lowercase(), kind))
            .collect();

        Ok(ScanRules {
            allowed_prefixes: self.allowed_prefixes,
            skipped_suffixes: self.skipped_suffixes,
            calibration_keywords: lowercase(self.calibration_keywords),
            edit_indicators: lowercase(self.edit_indicators),
            edit_name_marker: self.edit_name_marker.to_lowercase(),
            date_folder,
            file_types,
            required_fields: self.required_fields,
            progress_interval: self.progress_interval.max(1),
            ignore_patterns,
        })
    }
}

fn lowercase(values: Vec<String>) -> Vec<String> {
    values.into_iter().map(|s| s.to_lowercase()).collect()
}

/// Compiled form of [`AppConfig`] used for the duration of a scan.
#[derive(Debug, Clone)]
pub struct ScanRules {
    pub allowed_prefixes: Vec<String>,
    pub skipped_suffixes: Vec<String>,
    pub calibration_keywords: Vec<String>,
    pub edit_indicators: Vec<String>,
    pub edit_name_marker: String,
    pub date_folder: Regex,
    pub file_types: BTreeMap<String, ExtractorKind>,
    pub required_fields: RequiredFields,
    pub progress_interval: usize,
    pub ignore_patterns: Vec<Pattern>,
}

impl ScanRules {
    pub fn is_date_folder(&self, name: &str) -> bool {
        self.date_folder.is_match(name.trim())
    }

    /// Case-insensitive substring match against the calibration keywords.
    pub fn is_calibration_path(&self, path: &str) -> bool {
        let lower = path.to_lowercase();
        self.calibration_keywords
            .iter()
            .any(|keyword| lower.contains(keyword.as_str()))
    }

    pub fn extractor_kind(&self, path: &Path) -> Option<ExtractorKind> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        self.file_types.get(&ext).copied()
    }

    /// True for post-processing output: edit formats or stacked results.
    pub fn is_edit_indicator(&self, file_name: &str) -> bool {
        let lower = file_name.to_lowercase();
        self.edit_indicators
            .iter()
            .any(|ext| lower.ends_with(ext.as_str()))
            || (!self.edit_name_marker.is_empty() && lower.contains(&self.edit_name_marker))
    }

    pub fn has_allowed_name(&self, file_name: &str) -> bool {
        self.allowed_prefixes
            .iter()
            .any(|prefix| file_name.starts_with(prefix.as_str()))
            && !self
                .skipped_suffixes
                .iter()
                .any(|suffix| file_name.ends_with(suffix.as_str()))
    }

    pub fn is_ignored(&self, path: &Path) -> bool {
        self.ignore_patterns
            .iter()
            .any(|pattern| pattern.matches_path(path))
    }
}

impl Default for ScanRules {
    fn default() -> Self {
        AppConfig::default()
            .into_rules()
            .expect("default configuration compiles")
    }
}
