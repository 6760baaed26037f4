use crate::config::ScanRules;
use std::path::{Component, Path};

/// Telescope value when no equipment folder sits above the session.
pub const MISSING_TELESCOPE: &str = "missing info";

/// Identifiers taken from the folder layout `Object/[Telescope/]Session/...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathParts {
    pub object: String,
    pub telescope: String,
    pub session: String,
}

fn name_of(path: Option<&Path>) -> Option<String> {
    path.and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
}

/// Locate the session folder (deepest date-named ancestor below the object
/// folder) and derive object and telescope around it.
pub fn decompose(path: &Path, root: &Path, rules: &ScanRules) -> PathParts {
    let relative = match path.strip_prefix(root) {
        Ok(relative) => relative,
        Err(_) => return decompose_naive(path),
    };

    let mut segments: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    // the file itself
    segments.pop();

    let parent_name = || name_of(path.parent()).unwrap_or_default();

    if segments.len() < 2 {
        return PathParts {
            object: String::new(),
            telescope: MISSING_TELESCOPE.to_string(),
            session: parent_name(),
        };
    }

    let session_idx = (1..segments.len())
        .rev()
        .find(|&i| rules.is_date_folder(&segments[i]));

    match session_idx {
        Some(i) => PathParts {
            object: segments[0].clone(),
            telescope: if i > 1 {
                segments[i - 1].clone()
            } else {
                MISSING_TELESCOPE.to_string()
            },
            session: segments[i].clone(),
        },
        None => PathParts {
            object: segments[0].clone(),
            telescope: MISSING_TELESCOPE.to_string(),
            session: parent_name(),
        },
    }
}

/// Parent, grandparent and great-grandparent names, for paths that are not
/// below the scan root.
fn decompose_naive(path: &Path) -> PathParts {
    let parent = path.parent();
    let grandparent = parent.and_then(Path::parent);
    let great_grandparent = grandparent.and_then(Path::parent);

    PathParts {
        object: name_of(great_grandparent).unwrap_or_default(),
        telescope: name_of(grandparent).unwrap_or_else(|| MISSING_TELESCOPE.to_string()),
        session: name_of(parent).unwrap_or_default(),
    }
}
