//! Series folders: the three-digit batches under each category folder.

use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::errors::{RigkitError, RigkitResult};
use crate::filesystem::paths::list_children;

/// Series a freshly bootstrapped project starts at.
pub const DEFAULT_SERIES: u16 = 100;

pub const MAX_SERIES: u16 = 999;

static SERIES_DIR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{3}$").unwrap());

/// The series selected for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Series {
    Resolved(u16),
    /// No series existed when the context was built and none was created.
    #[default]
    Unresolved,
}

impl Series {
    /// A resolved series. Series folders are three-digit names, so numbers
    /// above [`MAX_SERIES`] are rejected.
    pub fn new(number: u16) -> RigkitResult<Self> {
        if number > MAX_SERIES {
            return Err(RigkitError::InvalidSeries(i64::from(number)));
        }
        Ok(Series::Resolved(number))
    }

    /// `self`, or `InvalidSeries` when it names a folder that cannot exist.
    pub fn checked(self) -> RigkitResult<Self> {
        match self {
            Series::Resolved(number) => Series::new(number),
            Series::Unresolved => Ok(self),
        }
    }

    pub fn number(self) -> Option<u16> {
        match self {
            Series::Resolved(number) => Some(number),
            Series::Unresolved => None,
        }
    }

    pub fn is_resolved(self) -> bool {
        matches!(self, Series::Resolved(_))
    }

    /// Integer form used by older tools: `-1` when unresolved.
    pub fn sentinel(self) -> i64 {
        self.number().map_or(-1, i64::from)
    }

    /// Folder name, zero padded (`"100"`).
    pub fn dir_name(self) -> Option<String> {
        self.number().map(|number| format!("{number:03}"))
    }
}

impl TryFrom<u16> for Series {
    type Error = RigkitError;

    fn try_from(number: u16) -> Result<Self, Self::Error> {
        Series::new(number)
    }
}

impl TryFrom<i64> for Series {
    type Error = RigkitError;

    /// Negative values are the legacy "unresolved" sentinel.
    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value < 0 {
            return Ok(Series::Unresolved);
        }
        let number = u16::try_from(value).map_err(|_| RigkitError::InvalidSeries(value))?;
        Series::new(number)
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Series::Resolved(number) => write!(f, "{number:03}"),
            Series::Unresolved => f.write_str("no existing series found"),
        }
    }
}

/// Series numbers present under `category_dir`, ascending. A missing
/// folder has no series.
pub fn scan_series(category_dir: &Path) -> RigkitResult<Vec<u16>> {
    if !category_dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut series: Vec<u16> = list_children(category_dir)?
        .into_iter()
        .filter(|entry| entry.file_type().is_dir())
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy();
            if SERIES_DIR_RE.is_match(&name) {
                name.parse().ok()
            } else {
                None
            }
        })
        .collect();
    series.sort_unstable();
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sentinel_round_trip() {
        assert_eq!(Series::Unresolved.sentinel(), -1);
        assert_eq!(Series::Resolved(101).sentinel(), 101);
        assert_eq!(Series::try_from(-1i64).unwrap(), Series::Unresolved);
        assert_eq!(Series::try_from(7i64).unwrap(), Series::Resolved(7));
        assert!(matches!(
            Series::try_from(1000i64),
            Err(RigkitError::InvalidSeries(1000))
        ));
        assert!(matches!(
            Series::try_from(70_000i64),
            Err(RigkitError::InvalidSeries(70_000))
        ));
    }

    #[test]
    fn test_four_digit_series_rejected() {
        assert_eq!(Series::new(999).unwrap(), Series::Resolved(999));
        assert_eq!(Series::try_from(0u16).unwrap(), Series::Resolved(0));
        assert!(matches!(
            Series::new(1000),
            Err(RigkitError::InvalidSeries(1000))
        ));
        assert!(Series::try_from(5000u16).is_err());
        assert!(Series::Resolved(1000).checked().is_err());
        assert_eq!(Series::Unresolved.checked().unwrap(), Series::Unresolved);
    }

    #[test]
    fn test_dir_name_is_zero_padded() {
        assert_eq!(Series::Resolved(7).dir_name().as_deref(), Some("007"));
        assert_eq!(Series::Unresolved.dir_name(), None);
    }

    #[test]
    fn test_scan_series_only_three_digit_dirs() {
        let dir = TempDir::new().unwrap();
        for name in ["100", "102", "1000", "10a", "old_101"] {
            std::fs::create_dir(dir.path().join(name)).unwrap();
        }
        std::fs::write(dir.path().join("105"), b"").unwrap();

        assert_eq!(scan_series(dir.path()).unwrap(), vec![100, 102]);
    }

    #[test]
    fn test_scan_series_missing_folder() {
        let dir = TempDir::new().unwrap();
        assert!(scan_series(&dir.path().join("missing")).unwrap().is_empty());
    }
}
