use crate::config::{AppConfig, ScanRules};
use crate::error::Error;
use crate::extract::{ExtractorKind, ExtractorRegistry};
use crate::filename;
use crate::filters::{self, UNKNOWN_FILTER};
use crate::metadata::{FileMetadata, MetadataField, SessionMetadata};
use crate::path_meta::{self, PathParts};
use crate::progress::ScanReporter;
use crate::record::MetadataRecord;
use crate::sanitize::sanitize;
use crate::scanner::{self, WalkOutcome};
use crate::taint::FolderEditTaint;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub struct ScanEngine {
    rules: ScanRules,
    extractors: ExtractorRegistry,
    cancel: Arc<AtomicBool>,
}

#[derive(Debug)]
pub struct ScanResult {
    pub records: Vec<MetadataRecord>,
    pub candidates_found: usize,
    pub excluded: usize,
    /// Files opened per header category.
    pub header_reads: BTreeMap<ExtractorKind, usize>,
    pub walk_duration: Duration,
    pub extract_duration: Duration,
}

impl ScanResult {
    pub fn duration(&self) -> Duration {
        self.walk_duration + self.extract_duration
    }
}

/// Terminal state of a scan that did not fail.
#[derive(Debug)]
pub enum ScanOutcome {
    Completed(ScanResult),
    /// The walk finished but no file qualified.
    NoData,
    /// A stop was requested; partial results are discarded.
    Stopped,
}

/// Why a candidate was left out of the inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    NotInDateFolder,
    NameNotAllowed,
    CalibrationFrame,
}

/// Mutable state for one scan; dropped when the scan ends.
struct ScanContext<'a> {
    root: &'a Path,
    taint: FolderEditTaint,
    sessions: HashMap<PathBuf, SessionMetadata>,
    header_reads: BTreeMap<ExtractorKind, usize>,
    reporter: &'a dyn ScanReporter,
}

impl ScanEngine {
    pub fn new(config: AppConfig) -> Result<Self, Error> {
        Ok(Self::with_rules(config.into_rules()?))
    }

    pub fn with_rules(mut rules: ScanRules) -> Self {
        rules.progress_interval = rules.progress_interval.max(1);
        Self {
            rules,
            extractors: ExtractorRegistry::default(),
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replace the header readers, e.g. with stubs in tests.
    pub fn with_extractors(mut self, extractors: ExtractorRegistry) -> Self {
        self.extractors = extractors;
        self
    }

    /// Flag that stops the scan when set from any thread.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    fn is_stopped(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Run the full inventory pipeline:
    /// 1. Walk the tree once (candidate files + edit-taint map)
    /// 2. Reconcile metadata per candidate, in walk order
    pub fn scan(&self, root: &Path, reporter: &dyn ScanReporter) -> Result<ScanOutcome, Error> {
        info!("Scanning {}", root.display());
        reporter.log("Reading the directory tree...");
        reporter.on_walk_start(&root.to_string_lossy());

        let walk_start = Instant::now();
        let walk = match scanner::walk_tree(root, &self.rules, &self.cancel)? {
            WalkOutcome::Finished(walk) => walk,
            WalkOutcome::Stopped => {
                info!("Scan stopped during directory walk");
                return Ok(ScanOutcome::Stopped);
            }
        };
        let walk_duration = walk_start.elapsed();

        let total = walk.candidates.len();
        debug!(
            "Walk completed in {:.2}s, {} folders, {} candidates, {} tainted folders",
            walk_duration.as_secs_f64(),
            walk.folders,
            total,
            walk.taint.len(),
        );
        reporter.on_walk_complete(total, walk_duration.as_secs_f64());
        reporter.log(&format!("Found {} images. Extracting metadata...", total));

        let extract_start = Instant::now();
        let mut ctx = ScanContext {
            root,
            taint: walk.taint,
            sessions: HashMap::new(),
            header_reads: BTreeMap::new(),
            reporter,
        };
        let mut records = Vec::new();
        let mut excluded = 0;

        for (idx, path) in walk.candidates.iter().enumerate() {
            if self.is_stopped() {
                info!("Scan stopped after {} of {} files", idx, total);
                return Ok(ScanOutcome::Stopped);
            }

            match self.process_file(path, &mut ctx) {
                Ok(record) => records.push(record),
                Err(reason) => {
                    debug!("Excluded {} ({:?})", path.display(), reason);
                    excluded += 1;
                }
            }

            let current = idx + 1;
            if current % self.rules.progress_interval == 0 || current == total {
                reporter.progress(current, total);
            }
        }

        if records.is_empty() {
            info!("No qualifying files under {}", root.display());
            return Ok(ScanOutcome::NoData);
        }

        Ok(ScanOutcome::Completed(ScanResult {
            records,
            candidates_found: total,
            excluded,
            header_reads: ctx.header_reads,
            walk_duration,
            extract_duration: extract_start.elapsed(),
        }))
    }

    /// Naming and folder conventions a light frame must follow.
    pub fn validate(&self, path: &Path, parts: &PathParts) -> Result<(), Exclusion> {
        if !self.rules.is_date_folder(&parts.session) {
            return Err(Exclusion::NotInDateFolder);
        }
        let file_name = file_name_of(path);
        if !self.rules.has_allowed_name(&file_name) {
            return Err(Exclusion::NameNotAllowed);
        }
        if self.rules.is_calibration_path(&path.to_string_lossy()) {
            return Err(Exclusion::CalibrationFrame);
        }
        Ok(())
    }

    fn process_file(&self, path: &Path, ctx: &mut ScanContext) -> Result<MetadataRecord, Exclusion> {
        let parts = path_meta::decompose(path, ctx.root, &self.rules);
        self.validate(path, &parts)?;

        let file_name = file_name_of(path);
        let folder = path.parent().map(Path::to_path_buf).unwrap_or_default();

        let mut meta = sanitize(filename::parse(&file_name), &file_name, &parts.session);
        ctx.sessions.entry(folder.clone()).or_default().sync(&mut meta);

        if let Some(kind) = self.rules.extractor_kind(path) {
            let missing = meta.missing(self.rules.required_fields.for_kind(kind));
            if !missing.is_empty() {
                debug!(
                    "{} missing {:?}, reading {} header",
                    file_name, missing, kind
                );
                let header = self.read_header(kind, path, ctx);
                let mut header = sanitize(header, &file_name, &parts.session);
                let session = ctx.sessions.entry(folder.clone()).or_default();
                session.sync(&mut header);
                meta.fill_gaps(&header);
            }
        }

        let session = ctx.sessions.entry(folder).or_default();
        session.sync(&mut meta);

        if meta.filter.is_none() {
            if let Some(name) = filters::resolve(&parts.session) {
                meta.filter = Some(name.to_string());
                session.remember(MetadataField::Filter, name);
            }
        }

        if meta.is_empty() {
            ctx.reporter
                .log(&format!("Note: filename did not match expected patterns: {}", file_name));
        }

        Ok(build_record(path, meta, parts, ctx.taint.file_has_edits(path)))
    }

    /// Header fields for `path`; any failure is logged and yields nothing.
    fn read_header(&self, kind: ExtractorKind, path: &Path, ctx: &mut ScanContext) -> FileMetadata {
        let Some(extractor) = self.extractors.get(kind) else {
            debug!("No {} reader registered", kind);
            return FileMetadata::default();
        };
        *ctx.header_reads.entry(kind).or_default() += 1;
        match extractor(path) {
            Ok(meta) => meta,
            Err(err) => {
                warn!("Error reading {} header for {}: {}", kind, path.display(), err);
                ctx.reporter.log(&format!(
                    "Error reading {} header for {}: {}",
                    kind,
                    path.display(),
                    err
                ));
                FileMetadata::default()
            }
        }
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn build_record(path: &Path, meta: FileMetadata, parts: PathParts, edits: bool) -> MetadataRecord {
    let object = if parts.object.is_empty() {
        "Unknown".to_string()
    } else {
        parts.object
    };

    MetadataRecord {
        object,
        filter: meta.filter.unwrap_or_else(|| UNKNOWN_FILTER.to_string()),
        camera: meta.camera.unwrap_or_default(),
        telescope: parts.telescope,
        exposure: meta.exposure.unwrap_or_else(|| "0".to_string()),
        bin: meta.bin.unwrap_or_else(|| "1".to_string()),
        gain: meta.gain.unwrap_or_default(),
        temp: meta.temperature.unwrap_or_default(),
        rotation: meta.rotation.unwrap_or_default(),
        timestamp: meta.timestamp.unwrap_or_default(),
        session_folder: parts.session,
        edits_detected: edits,
        path: path.to_string_lossy().into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::SilentReporter;

    fn engine() -> ScanEngine {
        ScanEngine::with_rules(ScanRules::default()).with_extractors(ExtractorRegistry::empty())
    }

    fn parts(session: &str) -> PathParts {
        PathParts {
            object: "M42".to_string(),
            telescope: "missing info".to_string(),
            session: session.to_string(),
        }
    }

    #[test]
    fn test_validate_requires_date_session() {
        let path = Path::new("/astro/M42/misc/Light_1.fits");
        assert_eq!(
            engine().validate(path, &parts("misc")),
            Err(Exclusion::NotInDateFolder)
        );
    }

    #[test]
    fn test_validate_name_rules() {
        let e = engine();
        assert_eq!(
            e.validate(Path::new("/a/M42/2024-01-01/Dark_1.fits"), &parts("2024-01-01")),
            Err(Exclusion::NameNotAllowed)
        );
        assert_eq!(
            e.validate(Path::new("/a/M42/2024-01-01/IMG_1_thn.jpg"), &parts("2024-01-01")),
            Err(Exclusion::NameNotAllowed)
        );
        assert_eq!(
            e.validate(Path::new("/a/M42/2024-01-01/Light_1.fits"), &parts("2024-01-01")),
            Ok(())
        );
    }

    #[test]
    fn test_validate_rejects_calibration_paths() {
        assert_eq!(
            engine().validate(
                Path::new("/a/M42/2024-01-01/Flats/Light_1.fits"),
                &parts("2024-01-01")
            ),
            Err(Exclusion::CalibrationFrame)
        );
    }

    #[test]
    fn test_record_defaults() {
        let record = build_record(
            Path::new("/a/x/Light_1.fits"),
            FileMetadata::default(),
            PathParts {
                object: String::new(),
                telescope: "missing info".to_string(),
                session: "2024-01-01".to_string(),
            },
            false,
        );
        assert_eq!(record.object, "Unknown");
        assert_eq!(record.filter, UNKNOWN_FILTER);
        assert_eq!(record.bin, "1");
        assert_eq!(record.exposure, "0");
        assert_eq!(record.gain, "");
        assert!(!record.edits_detected);
    }

    #[derive(Default)]
    struct ProgressLog(std::sync::Mutex<Vec<(usize, usize)>>);

    impl ScanReporter for ProgressLog {
        fn progress(&self, current: usize, total: usize) {
            self.0.lock().unwrap().push((current, total));
        }
    }

    #[test]
    fn test_zero_progress_interval_reports_every_file() {
        let dir = tempfile::tempdir().unwrap();
        let session = dir.path().join("M42/2024-01-01");
        std::fs::create_dir_all(&session).unwrap();
        std::fs::write(session.join("Light_1.fits"), "x").unwrap();
        std::fs::write(session.join("Light_2.fits"), "x").unwrap();

        let rules = ScanRules {
            progress_interval: 0,
            ..ScanRules::default()
        };
        let engine = ScanEngine::with_rules(rules).with_extractors(ExtractorRegistry::empty());
        let reporter = ProgressLog::default();
        let outcome = engine.scan(dir.path(), &reporter).unwrap();

        assert!(matches!(outcome, ScanOutcome::Completed(_)));
        assert_eq!(*reporter.0.lock().unwrap(), vec![(1, 2), (2, 2)]);
    }

    #[test]
    fn test_missing_root_is_an_error_not_no_data() {
        let result = engine().scan(Path::new("/definitely/not/here"), &SilentReporter);
        assert!(matches!(result, Err(Error::RootNotAccessible { .. })));
    }
}
