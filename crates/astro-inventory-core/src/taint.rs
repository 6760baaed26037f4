use crate::config::ScanRules;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Folders holding post-processed output, directly or in a descendant.
///
/// Taint is only ever added. The scan root itself is never marked.
#[derive(Debug, Default)]
pub struct FolderEditTaint {
    tainted: HashSet<PathBuf>,
}

impl FolderEditTaint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shallow check of one folder listing. Calibration folders never
    /// trigger, although they can still be marked through propagation.
    pub fn has_edits<S: AsRef<str>>(file_names: &[S], folder: &Path, rules: &ScanRules) -> bool {
        if rules.is_calibration_path(&folder.to_string_lossy()) {
            return false;
        }
        file_names
            .iter()
            .any(|name| rules.is_edit_indicator(name.as_ref()))
    }

    /// Mark `folder` and its ancestors up to, but excluding, `root`.
    pub fn propagate(&mut self, folder: &Path, root: &Path) {
        let mut current = Some(folder);
        while let Some(dir) = current {
            if dir == root || !dir.starts_with(root) {
                break;
            }
            if !self.tainted.insert(dir.to_path_buf()) {
                // ancestors were marked when this folder was
                break;
            }
            debug!("Marked {} as containing edits", dir.display());
            current = dir.parent();
        }
    }

    /// Run the shallow check and propagate on a hit.
    pub fn visit<S: AsRef<str>>(
        &mut self,
        file_names: &[S],
        folder: &Path,
        root: &Path,
        rules: &ScanRules,
    ) -> bool {
        let found = Self::has_edits(file_names, folder, rules);
        if found {
            self.propagate(folder, root);
        }
        found
    }

    pub fn is_tainted(&self, folder: &Path) -> bool {
        self.tainted.contains(folder)
    }

    /// A file counts as edited when its folder or the folder above is tainted.
    pub fn file_has_edits(&self, file: &Path) -> bool {
        let parent = file.parent();
        let grandparent = parent.and_then(Path::parent);
        parent.is_some_and(|p| self.is_tainted(p)) || grandparent.is_some_and(|g| self.is_tainted(g))
    }

    pub fn len(&self) -> usize {
        self.tainted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tainted.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_indicators_taint_folder_and_ancestors() {
        let rules = ScanRules::default();
        let root = Path::new("/astro");
        let session = root.join("M42/Redcat/2024-02-07");
        let mut taint = FolderEditTaint::new();

        assert!(taint.visit(&["Light_001.fits", "final.tif"], &session, root, &rules));
        assert!(taint.is_tainted(&session));
        assert!(taint.is_tainted(&root.join("M42/Redcat")));
        assert!(taint.is_tainted(&root.join("M42")));
        assert!(!taint.is_tainted(root));
        assert!(!taint.is_tainted(&root.join("M42/Redcat/2024-02-08")));
    }

    #[test]
    fn test_stack_in_name_is_case_insensitive() {
        let rules = ScanRules::default();
        assert!(FolderEditTaint::has_edits(
            &["M42_STACKED.fit"],
            Path::new("/astro/M42/2024-02-07"),
            &rules
        ));
    }

    #[test]
    fn test_calibration_folder_does_not_self_taint() {
        let rules = ScanRules::default();
        let root = Path::new("/astro");
        let darks = root.join("M42/2024-02-07/darks");
        let mut taint = FolderEditTaint::new();

        assert!(!taint.visit(&["master_stack.tif"], &darks, root, &rules));
        assert!(taint.is_empty());
    }

    #[test]
    fn test_calibration_folder_can_be_tainted_by_descendant() {
        let rules = ScanRules::default();
        let root = Path::new("/astro");
        let flats = root.join("M42/flats");
        let mut taint = FolderEditTaint::new();

        taint.propagate(&flats.join("processed"), root);
        assert!(taint.is_tainted(&flats));
        assert!(taint.is_tainted(&root.join("M42")));
    }

    #[test]
    fn test_propagation_is_idempotent() {
        let root = Path::new("/astro");
        let mut taint = FolderEditTaint::new();
        taint.propagate(&root.join("M42/a"), root);
        taint.propagate(&root.join("M42/b"), root);
        taint.propagate(&root.join("M42/a"), root);
        assert_eq!(taint.len(), 3);
    }

    #[test]
    fn test_file_lookup_checks_parent_and_grandparent() {
        let root = Path::new("/astro");
        let mut taint = FolderEditTaint::new();
        taint.propagate(&root.join("M42/Redcat/2024-02-07"), root);

        assert!(taint.file_has_edits(&root.join("M42/Redcat/2024-02-07/Light_1.fits")));
        // sibling session folder, grandparent Redcat is tainted
        assert!(taint.file_has_edits(&root.join("M42/Redcat/2024-02-08/Light_1.fits")));
        assert!(!taint.file_has_edits(&root.join("M31/Redcat/2024-02-08/Light_1.fits")));
    }
}
