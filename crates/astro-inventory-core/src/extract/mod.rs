//! Header readers, registered per file category.

pub mod exif;
pub mod fits;

use crate::error::Error;
use crate::metadata::FileMetadata;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Header format family a file extension maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractorKind {
    Fits,
    Exif,
}

impl fmt::Display for ExtractorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractorKind::Fits => f.write_str("fits"),
            ExtractorKind::Exif => f.write_str("exif"),
        }
    }
}

/// Reads whatever metadata a file header offers. Errors are recovered by the
/// engine and count as "nothing found".
pub type HeaderExtractor = Box<dyn Fn(&Path) -> Result<FileMetadata, Error> + Send + Sync>;

pub struct ExtractorRegistry {
    extractors: BTreeMap<ExtractorKind, HeaderExtractor>,
}

impl ExtractorRegistry {
    pub fn empty() -> Self {
        Self {
            extractors: BTreeMap::new(),
        }
    }

    pub fn register<F>(&mut self, kind: ExtractorKind, extractor: F)
    where
        F: Fn(&Path) -> Result<FileMetadata, Error> + Send + Sync + 'static,
    {
        self.extractors.insert(kind, Box::new(extractor));
    }

    pub fn get(&self, kind: ExtractorKind) -> Option<&HeaderExtractor> {
        self.extractors.get(&kind)
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(ExtractorKind::Fits, fits::extract);
        registry.register(ExtractorKind::Exif, exif::extract);
        registry
    }
}
