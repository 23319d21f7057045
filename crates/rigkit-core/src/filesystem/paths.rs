//! Directory helpers shared by the locator and the project context.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::errors::{RigkitError, RigkitResult};
use crate::filesystem::version::normalize_extension;

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" || path.starts_with("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            let mut expanded = PathBuf::from(home);
            if path.len() > 2 {
                expanded.push(&path[2..]);
            }
            return expanded;
        }
    }
    PathBuf::from(path)
}

pub fn path_exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().exists()
}

/// Return `path` if it exists. With `create_missing` the directory chain is
/// created instead (creating an existing directory is a no-op).
pub fn validate_path(path: impl AsRef<Path>, create_missing: bool) -> RigkitResult<PathBuf> {
    let path = path.as_ref();
    if path.exists() {
        return Ok(path.to_path_buf());
    }
    if create_missing {
        debug!("Creating directory {}", path.display());
        std::fs::create_dir_all(path)?;
        return Ok(path.to_path_buf());
    }
    Err(RigkitError::DirectoryNotFound(path.to_path_buf()))
}

/// Immediate children of `folder`, following symlinks. Unreadable children
/// are skipped with a warning; an unreadable `folder` is an error.
pub(crate) fn list_children(folder: &Path) -> RigkitResult<Vec<walkdir::DirEntry>> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        match entry {
            Ok(entry) => entries.push(entry),
            Err(err) if err.depth() == 0 => return Err(RigkitError::Io(err.into())),
            Err(err) => warn!("Skipping unreadable entry in {}: {err}", folder.display()),
        }
    }
    Ok(entries)
}

pub(crate) fn list_files(folder: &Path) -> RigkitResult<Vec<PathBuf>> {
    Ok(list_children(folder)?
        .into_iter()
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .collect())
}

/// True when `path` contains at least one entry.
pub fn has_folders(path: impl AsRef<Path>) -> RigkitResult<bool> {
    let path = validate_path(path, false)?;
    Ok(!list_children(&path)?.is_empty())
}

/// Immediate subdirectories of `path`, sorted by name, skipping `ignore`.
pub fn get_folders(path: impl AsRef<Path>, ignore: &[&str]) -> RigkitResult<Vec<PathBuf>> {
    let path = validate_path(path, false)?;
    let mut folders: Vec<PathBuf> = list_children(&path)?
        .into_iter()
        .filter(|entry| entry.file_type().is_dir())
        .filter(|entry| {
            let name = entry.file_name().to_string_lossy();
            !ignore.iter().any(|ignored| *ignored == name)
        })
        .map(walkdir::DirEntry::into_path)
        .collect();
    folders.sort();
    Ok(folders)
}

/// Immediate files of `path` whose final suffix is `extension`, sorted.
pub fn get_files_by_extension(
    path: impl AsRef<Path>,
    extension: &str,
) -> RigkitResult<Vec<PathBuf>> {
    let path = validate_path(path, false)?;
    let wanted = normalize_extension(extension);
    let mut files: Vec<PathBuf> = list_files(&path)?
        .into_iter()
        .filter(|file| {
            file.extension()
                .map(|ext| ext.to_string_lossy() == wanted)
                .unwrap_or(wanted.is_empty())
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Canonical form when the path can be resolved, else made absolute.
pub(crate) fn resolve_path(path: &Path) -> PathBuf {
    match std::fs::canonicalize(path) {
        Ok(resolved) => resolved,
        Err(_) => std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_expand_tilde_passthrough() {
        assert_eq!(expand_tilde("/projects/kate"), PathBuf::from("/projects/kate"));
        assert_eq!(expand_tilde("relative/~x"), PathBuf::from("relative/~x"));
    }

    #[test]
    fn test_validate_path_missing() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            validate_path(&missing, false),
            Err(RigkitError::DirectoryNotFound(_))
        ));
        assert!(!missing.exists());
    }

    #[test]
    fn test_validate_path_create_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        validate_path(&nested, true).unwrap();
        validate_path(&nested, true).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn test_has_folders() {
        let dir = TempDir::new().unwrap();
        assert!(!has_folders(dir.path()).unwrap());
        std::fs::create_dir(dir.path().join("100")).unwrap();
        assert!(has_folders(dir.path()).unwrap());
    }

    #[test]
    fn test_get_folders_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        for name in ["zed", "kate", ".config"] {
            std::fs::create_dir(dir.path().join(name)).unwrap();
        }
        std::fs::write(dir.path().join("notes.txt"), b"").unwrap();

        let folders = get_folders(dir.path(), &[".config"]).unwrap();
        let names: Vec<String> = folders
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["kate", "zed"]);
    }

    #[test]
    fn test_get_files_by_extension() {
        let dir = TempDir::new().unwrap();
        for name in ["b.v001.wmap", "a.v002.wmap", "a.v001.json", "README"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }

        let files = get_files_by_extension(dir.path(), ".wmap").unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.v002.wmap", "b.v001.wmap"]);
    }
}
