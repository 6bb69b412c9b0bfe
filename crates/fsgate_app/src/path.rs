//! Path normalization shared by the facade services.

use std::ffi::OsString;
use std::path::{Component, MAIN_SEPARATOR, MAIN_SEPARATOR_STR, Path, PathBuf};

/// Resolves a caller path against `base`. Absolute paths pass through; `.`
/// components of relative paths are dropped so no duplicate separators
/// appear.
pub fn resolve(base: &Path, user_path: &Path) -> PathBuf {
    if user_path.is_absolute() {
        return user_path.to_path_buf();
    }

    user_path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .fold(base.to_path_buf(), |acc, c| acc.join(c))
}

/// Returns `path` with exactly one trailing separator.
pub fn as_directory(path: &Path) -> PathBuf {
    let mut raw = OsString::from(path.as_os_str());
    if !raw.to_string_lossy().ends_with(MAIN_SEPARATOR) {
        raw.push(MAIN_SEPARATOR_STR);
    }
    PathBuf::from(raw)
}

/// True when both paths end in the same file name.
pub fn same_file_name(a: &Path, b: &Path) -> bool {
    match (a.file_name(), b.file_name()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Directories that must exist before `target` can be written, shallowest
/// first. Under `base` only the segments below it are listed; elsewhere every
/// ancestor except the filesystem root is.
pub fn parent_chain(base: &Path, target: &Path) -> Vec<PathBuf> {
    let Some(parent) = target.parent() else {
        return Vec::new();
    };

    match parent.strip_prefix(base) {
        Ok(relative) => relative
            .components()
            .scan(base.to_path_buf(), |acc, c| {
                acc.push(c);
                Some(acc.clone())
            })
            .collect(),
        Err(_) => {
            let mut chain: Vec<PathBuf> = parent
                .ancestors()
                .filter(|p| p.parent().is_some() && !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .collect();
            chain.reverse();
            chain
        }
    }
}

/// Rejects paths that are absolute or climb out of their root.
pub fn is_contained(relative: &Path) -> bool {
    relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
