//! Resolution of requested file paths under a fixed root.
use std::path::{Component, Path, PathBuf};

use crate::error::AppError;

/// Join `requested` onto `static_root` and reject anything that lands outside it.
///
/// Normalisation is lexical: `.` is dropped and `..` pops the previous segment,
/// so nested asset paths keep their directories.
pub fn resolve(requested: &str, static_root: &Path) -> Result<PathBuf, AppError> {
    let root = normalize(static_root);
    let joined = normalize(&root.join(requested));

    if !joined.starts_with(&root) {
        return Err(AppError::PathEscape(requested.to_string()));
    }

    Ok(joined)
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::Normal(_) => {
                out.push(component.as_os_str());
            },
            Component::CurDir => {},
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                },
                Some(Component::RootDir | Component::Prefix(_)) => {},
                // A relative path that climbs past its start keeps the `..`
                _ => out.push(".."),
            },
        }
    }
    out
}
