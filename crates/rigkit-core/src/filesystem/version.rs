//! Version markers embedded in asset file names.
//!
//! A versioned asset is named `{base}.v{NNN}.{extension}`. The marker is a
//! suffix of exactly `.v` plus three digits, it must be the first suffix in the
//! chain, it may appear only once, and it starts at `v001`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, OnceLock};
use std::time::SystemTime;

use regex::Regex;

use crate::errors::{RigkitError, RigkitResult, VersionFault};

/// Highest version a three-digit marker can carry.
pub const MAX_VERSION: u32 = 999;

static VERSION_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\.v([0-9]{3})$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ParsedVersion {
    version: u32,
    marker_index: Option<usize>,
}

/// Split a file name into its stem and suffix chain (each suffix keeps its
/// leading dot). A leading dot belongs to the stem.
fn split_name(name: &str) -> (&str, Vec<&str>) {
    let body_start = usize::from(name.starts_with('.'));
    let Some(first_dot) = name[body_start..].find('.') else {
        return (name, Vec::new());
    };
    let split_at = body_start + first_dot;
    let rest = &name[split_at..];

    let mut suffixes = Vec::new();
    let mut start = 0;
    for (i, c) in rest.char_indices().skip(1) {
        if c == '.' {
            suffixes.push(&rest[start..i]);
            start = i;
        }
    }
    suffixes.push(&rest[start..]);
    (&name[..split_at], suffixes)
}

fn parse_version(name: &str) -> Result<ParsedVersion, VersionFault> {
    let (_, suffixes) = split_name(name);

    let mut found: Option<(usize, u32)> = None;
    for (index, suffix) in suffixes.iter().enumerate().rev() {
        let Some(caps) = VERSION_MARKER_RE.captures(suffix) else {
            continue;
        };
        if found.is_some() {
            return Err(VersionFault::Ambiguous);
        }
        let version = caps[1]
            .bytes()
            .fold(0u32, |acc, digit| acc * 10 + u32::from(digit - b'0'));
        found = Some((index, version));
    }

    match found {
        None => Ok(ParsedVersion {
            version: 0,
            marker_index: None,
        }),
        Some((index, _)) if index != 0 => Err(VersionFault::Misplaced),
        Some((_, 0)) => Err(VersionFault::ZeroVersion),
        Some((index, version)) => Ok(ParsedVersion {
            version,
            marker_index: Some(index),
        }),
    }
}

/// Strip one leading dot so `"abc"` and `".abc"` compare equal.
pub(crate) fn normalize_extension(extension: &str) -> &str {
    extension.strip_prefix('.').unwrap_or(extension)
}

/// Build `{base}.v{NNN}.{extension}`.
pub fn versioned_file_name(base_name: &str, version: u32, extension: &str) -> String {
    let extension = normalize_extension(extension);
    if extension.is_empty() {
        format!("{base_name}.v{version:03}")
    } else {
        format!("{base_name}.v{version:03}.{extension}")
    }
}

/// A file path together with its (lazily parsed) version marker.
#[derive(Debug, Clone)]
pub struct PathVersion {
    path: PathBuf,
    parsed: OnceLock<Result<ParsedVersion, VersionFault>>,
}

impl PathVersion {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            parsed: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    fn parsed(&self) -> RigkitResult<ParsedVersion> {
        let parsed = *self
            .parsed
            .get_or_init(|| parse_version(&self.file_name()));
        parsed.map_err(|fault| RigkitError::malformed(&self.path, fault))
    }

    /// The version number, or 0 when the name carries no marker.
    pub fn version(&self) -> RigkitResult<u32> {
        Ok(self.parsed()?.version)
    }

    pub fn is_versioned(&self) -> bool {
        matches!(self.parsed(), Ok(parsed) if parsed.version >= 1)
    }

    /// Everything before the first dot (a leading dot is kept).
    pub fn unversioned_stem(&self) -> RigkitResult<String> {
        self.parsed()?;
        let name = self.file_name();
        let (stem, _) = split_name(&name);
        Ok(stem.to_string())
    }

    /// The suffix chain with the version marker removed, e.g. `.abc`.
    pub fn unversioned_suffix(&self) -> RigkitResult<String> {
        let parsed = self.parsed()?;
        let name = self.file_name();
        let (_, suffixes) = split_name(&name);
        Ok(suffixes
            .iter()
            .enumerate()
            .filter(|(index, _)| Some(*index) != parsed.marker_index)
            .map(|(_, suffix)| *suffix)
            .collect())
    }

    pub fn unversioned_name(&self) -> RigkitResult<String> {
        Ok(format!(
            "{}{}",
            self.unversioned_stem()?,
            self.unversioned_suffix()?
        ))
    }

    pub fn unversioned_path(&self) -> RigkitResult<PathBuf> {
        let name = self.unversioned_name()?;
        Ok(match self.path.parent() {
            Some(parent) => parent.join(name),
            None => PathBuf::from(name),
        })
    }

    /// The unversioned suffix without its leading dot, e.g. `abc`.
    pub fn extension(&self) -> RigkitResult<String> {
        let suffix = self.unversioned_suffix()?;
        Ok(normalize_extension(&suffix).to_string())
    }

    /// The sibling path carrying `version` instead of the current marker.
    pub fn with_version(&self, version: u32) -> RigkitResult<PathVersion> {
        if !(1..=MAX_VERSION).contains(&version) {
            return Err(RigkitError::malformed(&self.path, VersionFault::OutOfRange));
        }
        let name = format!(
            "{}.v{version:03}{}",
            self.unversioned_stem()?,
            self.unversioned_suffix()?
        );
        let path = match self.path.parent() {
            Some(parent) => parent.join(name),
            None => PathBuf::from(name),
        };
        Ok(PathVersion::new(path))
    }

    pub fn file_size(&self) -> RigkitResult<u64> {
        Ok(std::fs::metadata(&self.path)?.len())
    }

    /// Birth time where the filesystem records one, else modification time.
    pub fn creation_date(&self) -> RigkitResult<SystemTime> {
        let metadata = std::fs::metadata(&self.path)?;
        match metadata.created() {
            Ok(created) => Ok(created),
            Err(_) => Ok(metadata.modified()?),
        }
    }
}

impl PartialEq for PathVersion {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for PathVersion {}

impl fmt::Display for PathVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl From<PathBuf> for PathVersion {
    fn from(path: PathBuf) -> Self {
        PathVersion::new(path)
    }
}

impl AsRef<Path> for PathVersion {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}
