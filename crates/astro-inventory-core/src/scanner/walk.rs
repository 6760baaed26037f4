use crate::config::ScanRules;
use crate::error::Error;
use crate::taint::FolderEditTaint;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, warn};
use walkdir::WalkDir;

#[derive(Debug, Default)]
pub struct WalkOutput {
    /// Files with a known header category, in walk order.
    pub candidates: Vec<PathBuf>,
    pub taint: FolderEditTaint,
    pub folders: usize,
}

#[derive(Debug)]
pub enum WalkOutcome {
    Finished(WalkOutput),
    Stopped,
}

/// Single pass over the tree: enumerate candidate files and build the
/// edit-taint map. Skips symlinks and anything matching an ignore pattern.
///
/// Only an unreadable root is fatal; unreadable subtrees are logged and skipped.
pub fn walk_tree(
    root: &Path,
    rules: &ScanRules,
    cancel: &AtomicBool,
) -> Result<WalkOutcome, Error> {
    let metadata = fs::metadata(root).map_err(|source| Error::RootNotAccessible {
        path: root.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(Error::RootNotAccessible {
            path: root.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
        });
    }

    let mut folders: Vec<PathBuf> = Vec::new();
    let mut listings: HashMap<PathBuf, Vec<String>> = HashMap::new();
    let mut candidates = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !rules.is_ignored(entry.path()));

    for entry_result in walker {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(err) => {
                if err.depth() == 0 {
                    let source = err
                        .into_io_error()
                        .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "walk error"));
                    return Err(Error::RootNotAccessible {
                        path: root.to_path_buf(),
                        source,
                    });
                }
                if err.io_error().map(|e| e.kind()) == Some(io::ErrorKind::PermissionDenied) {
                    error!("Access denied: {}", err);
                } else {
                    warn!("Skipping unreadable entry: {}", err);
                }
                continue;
            }
        };

        let file_type = entry.file_type();
        if file_type.is_dir() {
            if cancel.load(Ordering::Relaxed) {
                debug!("Walk stopped at {}", entry.path().display());
                return Ok(WalkOutcome::Stopped);
            }
            folders.push(entry.path().to_path_buf());
            listings.entry(entry.path().to_path_buf()).or_default();
        } else if file_type.is_file() {
            let path = entry.path();
            if let Some(parent) = path.parent() {
                listings
                    .entry(parent.to_path_buf())
                    .or_default()
                    .push(entry.file_name().to_string_lossy().into_owned());
            }
            if rules.extractor_kind(path).is_some() {
                candidates.push(path.to_path_buf());
            }
        }
    }

    let mut taint = FolderEditTaint::new();
    for folder in &folders {
        let files = listings.get(folder).map(Vec::as_slice).unwrap_or_default();
        if taint.visit(files, folder, root, rules) {
            debug!("Edits detected in {}", folder.display());
        }
    }

    Ok(WalkOutcome::Finished(WalkOutput {
        candidates,
        taint,
        folders: folders.len(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let result = walk_tree(&missing, &ScanRules::default(), &AtomicBool::new(false));
        assert!(matches!(result, Err(Error::RootNotAccessible { .. })));
    }

    #[test]
    fn test_file_root_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("Light_1.fits");
        fs::write(&file, "x").unwrap();
        let result = walk_tree(&file, &ScanRules::default(), &AtomicBool::new(false));
        assert!(matches!(result, Err(Error::RootNotAccessible { .. })));
    }

    #[test]
    fn test_collects_candidates_and_taint() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let session = root.join("M42/2024-02-07");
        fs::create_dir_all(&session).unwrap();
        fs::write(session.join("Light_1.fits"), "x").unwrap();
        fs::write(session.join("IMG_2.JPG"), "x").unwrap();
        fs::write(session.join("notes.txt"), "x").unwrap();
        fs::write(session.join("final.psd"), "x").unwrap();

        let outcome = walk_tree(root, &ScanRules::default(), &AtomicBool::new(false)).unwrap();
        let WalkOutcome::Finished(output) = outcome else {
            panic!("walk should finish");
        };
        assert_eq!(output.candidates.len(), 2);
        assert!(output.taint.is_tainted(&session));
        assert!(output.taint.is_tainted(&root.join("M42")));
        assert!(!output.taint.is_tainted(root));
    }

    #[test]
    fn test_ignore_patterns_skip_subtrees() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let skipped = root.join("M42/_archive/2024-02-07");
        fs::create_dir_all(&skipped).unwrap();
        fs::write(skipped.join("Light_1.fits"), "x").unwrap();
        fs::write(skipped.join("stacked.tif"), "x").unwrap();

        let rules = crate::config::AppConfig {
            ignore_patterns: vec!["*/_archive".to_string()],
            ..Default::default()
        }
        .into_rules()
        .unwrap();

        let outcome = walk_tree(root, &rules, &AtomicBool::new(false)).unwrap();
        let WalkOutcome::Finished(output) = outcome else {
            panic!("walk should finish");
        };
        assert!(output.candidates.is_empty());
        assert!(output.taint.is_empty());
    }

    #[test]
    fn test_stop_request_aborts_walk() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("M42")).unwrap();
        let outcome = walk_tree(dir.path(), &ScanRules::default(), &AtomicBool::new(true)).unwrap();
        assert!(matches!(outcome, WalkOutcome::Stopped));
    }
}
