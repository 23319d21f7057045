//! Latest/next version lookups over a single asset folder.
//!
//! Every query scans only the immediate files of the folder. Files whose
//! names carry a malformed version marker are skipped with a warning so one
//! bad file never hides the rest of the folder.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::errors::{RigkitError, RigkitResult, VersionFault};
use crate::filesystem::paths::{list_files, resolve_path};
use crate::filesystem::version::{
    normalize_extension, versioned_file_name, PathVersion, MAX_VERSION,
};

/// How a query treats a folder that does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanMode {
    /// Missing folders are `DirectoryNotFound` errors.
    Strict,
    /// Missing folders log a warning and behave like empty folders.
    #[default]
    Lenient,
}

/// The highest existing version of an asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestVersion {
    pub path: PathBuf,
    pub version: u32,
}

/// Where the next version of an asset should be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVersion {
    pub path: PathBuf,
    pub version: u32,
}

struct VersionedFile {
    path: PathBuf,
    stem: String,
    extension: String,
    version: u32,
}

/// Returns whether `folder` can be scanned under `mode`.
fn check_folder(folder: &Path, mode: ScanMode) -> RigkitResult<bool> {
    if folder.is_dir() {
        return Ok(true);
    }
    match mode {
        ScanMode::Strict => Err(RigkitError::DirectoryNotFound(folder.to_path_buf())),
        ScanMode::Lenient => {
            warn!("Folder {} does not exist, nothing to scan", folder.display());
            Ok(false)
        }
    }
}

fn scan_versioned(folder: &Path, mode: ScanMode) -> RigkitResult<Vec<VersionedFile>> {
    if !check_folder(folder, mode)? {
        return Ok(Vec::new());
    }
    versioned_files(list_files(folder)?)
}

/// The well-formed versioned files among `paths`.
fn versioned_files(paths: Vec<PathBuf>) -> RigkitResult<Vec<VersionedFile>> {
    let mut files = Vec::new();
    for path in paths {
        let parsed = PathVersion::new(path);
        let version = match parsed.version() {
            Ok(0) => continue,
            Ok(version) => version,
            Err(err) => {
                warn!("Skipping {err}");
                continue;
            }
        };
        files.push(VersionedFile {
            stem: parsed.unversioned_stem()?,
            extension: parsed.extension()?,
            version,
            path: parsed.into_path(),
        });
    }
    Ok(files)
}

fn latest_of<'a>(
    files: impl IntoIterator<Item = &'a VersionedFile>,
    extension: &str,
    mut name_matches: impl FnMut(&str) -> bool,
) -> Option<LatestVersion> {
    let extension = normalize_extension(extension);
    let mut latest: Option<&VersionedFile> = None;
    for file in files {
        if file.extension != extension || !name_matches(&file.stem) {
            continue;
        }
        match latest {
            Some(current) if current.version >= file.version => {}
            _ => latest = Some(file),
        }
    }
    latest.map(|file| LatestVersion {
        path: resolve_path(&file.path),
        version: file.version,
    })
}

/// Latest version of `{base_name}.vNNN.{extension}` in `folder`.
pub fn find_latest(
    folder: impl AsRef<Path>,
    base_name: &str,
    extension: &str,
    mode: ScanMode,
) -> RigkitResult<Option<LatestVersion>> {
    let folder = folder.as_ref();
    let files = scan_versioned(folder, mode)?;
    let latest = latest_of(&files, extension, |stem| stem == base_name);
    match &latest {
        Some(hit) => debug!("find_latest: {base_name} -> v{:03}", hit.version),
        None => debug!("find_latest: no {base_name} in {}", folder.display()),
    }
    Ok(latest)
}

/// Latest version of any asset whose base name contains `partial_name`.
pub fn find_latest_partial(
    folder: impl AsRef<Path>,
    partial_name: &str,
    extension: &str,
    mode: ScanMode,
) -> RigkitResult<Option<LatestVersion>> {
    let files = scan_versioned(folder.as_ref(), mode)?;
    Ok(latest_of(&files, extension, |stem| stem.contains(partial_name)))
}

/// Like [`find_latest`] with strict folder checks, failing with
/// `AssetNotFound` when no version exists.
pub fn require_latest(
    folder: impl AsRef<Path>,
    base_name: &str,
    extension: &str,
) -> RigkitResult<LatestVersion> {
    let folder = folder.as_ref();
    find_latest(folder, base_name, extension, ScanMode::Strict)?.ok_or_else(|| {
        RigkitError::AssetNotFound {
            folder: folder.to_path_buf(),
            name: base_name.to_string(),
            extension: normalize_extension(extension).to_string(),
        }
    })
}

/// The unversioned file `{exact_name}.{extension}` in `folder`, if present.
///
/// Matching is on the whole file name, which is unique within a directory,
/// so at most one entry can match.
pub fn find_file(
    folder: impl AsRef<Path>,
    exact_name: &str,
    extension: &str,
    mode: ScanMode,
) -> RigkitResult<Option<PathBuf>> {
    let folder = folder.as_ref();
    if !check_folder(folder, mode)? {
        return Ok(None);
    }

    let extension = normalize_extension(extension);
    let target = if extension.is_empty() {
        exact_name.to_string()
    } else {
        format!("{exact_name}.{extension}")
    };

    let found = list_files(folder)?.into_iter().find(|file| {
        file.file_name()
            .map(|name| name.to_string_lossy() == target.as_str())
            .unwrap_or(false)
    });
    Ok(found.map(|file| resolve_path(&file)))
}

/// Path and number for the next version of `base_name`. Nothing is created.
pub fn find_new_version(
    folder: impl AsRef<Path>,
    base_name: &str,
    extension: &str,
    mode: ScanMode,
) -> RigkitResult<NewVersion> {
    let folder = folder.as_ref();
    let latest = find_latest(folder, base_name, extension, mode)?;

    let (parent, version) = match latest {
        Some(latest) => {
            let parent = latest
                .path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| resolve_path(folder));
            (parent, latest.version + 1)
        }
        None => (resolve_path(folder), 1),
    };

    if version > MAX_VERSION {
        let name = versioned_file_name(base_name, MAX_VERSION, extension);
        return Err(RigkitError::malformed(
            parent.join(name),
            VersionFault::OutOfRange,
        ));
    }

    let path = parent.join(versioned_file_name(base_name, version, extension));
    debug!("find_new_version: {}", path.display());
    Ok(NewVersion { path, version })
}

/// Every distinct base name in `folder`, sorted, mapped to its latest
/// version with `extension` (or `None` when that name has no such version).
pub fn find_all_latest(
    folder: impl AsRef<Path>,
    extension: &str,
    mode: ScanMode,
) -> RigkitResult<IndexMap<String, Option<LatestVersion>>> {
    let folder = folder.as_ref();
    if !check_folder(folder, mode)? {
        return Ok(IndexMap::new());
    }

    let listing = list_files(folder)?;
    let base_names: BTreeSet<String> = listing
        .iter()
        .filter_map(|file| file.file_name())
        .map(|name| base_name_of(&name.to_string_lossy()).to_string())
        .filter(|name| !name.is_empty())
        .collect();

    let files = versioned_files(listing)?;
    Ok(base_names
        .into_iter()
        .map(|base_name| {
            let latest = latest_of(&files, extension, |stem| stem == base_name);
            (base_name, latest)
        })
        .collect())
}

/// Everything before the first dot, keeping a leading dot.
fn base_name_of(file_name: &str) -> &str {
    let body_start = usize::from(file_name.starts_with('.'));
    match file_name[body_start..].find('.') {
        Some(index) => &file_name[..body_start + index],
        None => file_name,
    }
}
