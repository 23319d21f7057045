//! Project context: the resolved folder layout for one character.
//!
//! ```text
//! {project}/{character}/wip/.config
//! {project}/{character}/wip/{assets,rigs,textures,shapes,utilities,shaders}/{series}
//! {project}/{character}/{animation,builds}/{series}
//! ```
//!
//! A [`ProjectContext`] is an immutable snapshot taken when a project is
//! opened. Picking another series produces a new snapshot; directories
//! created on disk afterwards are only seen by re-querying or rebuilding.

pub mod category;
pub mod series;

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::errors::{RigkitError, RigkitResult};
use crate::filesystem::paths::{get_folders, validate_path};

pub use category::{Category, CategoryRoot};
pub use series::{scan_series, Series, DEFAULT_SERIES, MAX_SERIES};

pub const WIP_DIR: &str = "wip";
pub const CONFIG_DIR: &str = ".config";

/// Whether every category of a context resolves to an existing folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    Resolved,
    Unresolved,
}

/// Inputs to [`ProjectContext::new`] beyond the project root and character.
#[derive(Debug, Clone, Default)]
pub struct ContextOptions {
    series: [Option<Series>; Category::COUNT],
    config_path: Option<PathBuf>,
    create_missing: bool,
}

impl ContextOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `series` for `category` instead of scanning for the highest one.
    /// Out-of-range numbers are rejected by [`ProjectContext::new`].
    pub fn series(mut self, category: Category, series: Series) -> Self {
        self.series[category.index()] = Some(series);
        self
    }

    pub fn config_path(mut self, config_path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(config_path.into());
        self
    }

    /// Create every missing folder in the layout while resolving.
    pub fn create_missing(mut self, create_missing: bool) -> Self {
        self.create_missing = create_missing;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectContext {
    project_path: PathBuf,
    character_name: String,
    series: [Series; Category::COUNT],
    config_path: PathBuf,
}

fn validate_character_name(name: &str) -> RigkitResult<()> {
    let escapes = name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || Path::new(name).is_absolute();
    if escapes {
        return Err(RigkitError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn category_folder(project_path: &Path, character_name: &str, category: Category) -> PathBuf {
    let character_path = project_path.join(character_name);
    match category.root() {
        CategoryRoot::Wip => character_path.join(WIP_DIR).join(category.folder_name()),
        CategoryRoot::Character => character_path.join(category.folder_name()),
    }
}

fn existing_dir(path: PathBuf) -> Option<PathBuf> {
    path.is_dir().then_some(path)
}

impl ProjectContext {
    /// Resolve the layout under `project_path` for `character_name`.
    ///
    /// Categories without an explicit series select the highest existing
    /// series folder. When none exists the series is [`DEFAULT_SERIES`] if
    /// `create_missing` is set, else [`Series::Unresolved`]. A missing tree
    /// is not an error; only I/O failures, unsafe names and explicit series
    /// above [`MAX_SERIES`] are.
    pub fn new(
        project_path: impl Into<PathBuf>,
        character_name: &str,
        options: ContextOptions,
    ) -> RigkitResult<Self> {
        let project_path = project_path.into();
        validate_character_name(character_name)?;
        for explicit in options.series.iter().flatten() {
            explicit.checked()?;
        }

        let has_character = !character_name.is_empty();
        if options.create_missing && !has_character {
            warn!("No character name given, nothing will be created");
        }
        let create = options.create_missing && has_character;

        let wip_path = project_path.join(character_name).join(WIP_DIR);
        let config_path = options
            .config_path
            .clone()
            .unwrap_or_else(|| wip_path.join(CONFIG_DIR));

        if create {
            validate_path(&wip_path, true)?;
            validate_path(&config_path, true)?;
        }

        let mut series = [Series::Unresolved; Category::COUNT];
        for category in Category::ALL {
            let folder = category_folder(&project_path, character_name, category);
            let selected = match options.series[category.index()] {
                Some(explicit) => explicit,
                None if !has_character => Series::Unresolved,
                None => match scan_series(&folder)?.last() {
                    Some(&highest) => Series::Resolved(highest),
                    None if create => Series::Resolved(DEFAULT_SERIES),
                    None => Series::Unresolved,
                },
            };

            if create {
                match selected.dir_name() {
                    Some(dir_name) => validate_path(folder.join(dir_name), true)?,
                    None => validate_path(&folder, true)?,
                };
            }
            debug!("{character_name}: {category} series {selected}");
            series[category.index()] = selected;
        }

        let context = Self {
            project_path,
            character_name: character_name.to_string(),
            series,
            config_path,
        };
        info!("Opened context {context}");
        Ok(context)
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }

    pub fn character_name(&self) -> &str {
        &self.character_name
    }

    pub fn series(&self, category: Category) -> Series {
        self.series[category.index()]
    }

    pub fn character_path(&self) -> Option<PathBuf> {
        if self.character_name.is_empty() {
            return None;
        }
        existing_dir(self.project_path.join(&self.character_name))
    }

    pub fn wip_path(&self) -> Option<PathBuf> {
        self.character_path()
            .and_then(|character| existing_dir(character.join(WIP_DIR)))
    }

    pub fn config_path(&self) -> Option<PathBuf> {
        existing_dir(self.config_path.clone())
    }

    /// The folder holding every series of `category`, whether or not it exists.
    pub fn category_folder(&self, category: Category) -> Option<PathBuf> {
        if self.character_name.is_empty() {
            return None;
        }
        Some(category_folder(
            &self.project_path,
            &self.character_name,
            category,
        ))
    }

    /// Where the selected series of `category` lives, without checking disk.
    pub fn expected_path(&self, category: Category) -> Option<PathBuf> {
        let dir_name = self.series(category).dir_name()?;
        Some(self.category_folder(category)?.join(dir_name))
    }

    /// The selected series folder of `category`, if it exists.
    pub fn path(&self, category: Category) -> Option<PathBuf> {
        self.expected_path(category).and_then(existing_dir)
    }

    pub fn assets_path(&self) -> Option<PathBuf> {
        self.path(Category::Assets)
    }

    pub fn rigs_path(&self) -> Option<PathBuf> {
        self.path(Category::Rigs)
    }

    pub fn textures_path(&self) -> Option<PathBuf> {
        self.path(Category::Textures)
    }

    pub fn shapes_path(&self) -> Option<PathBuf> {
        self.path(Category::Shapes)
    }

    pub fn utilities_path(&self) -> Option<PathBuf> {
        self.path(Category::Utilities)
    }

    pub fn shaders_path(&self) -> Option<PathBuf> {
        self.path(Category::Shaders)
    }

    pub fn animation_path(&self) -> Option<PathBuf> {
        self.path(Category::Animation)
    }

    pub fn builds_path(&self) -> Option<PathBuf> {
        self.path(Category::Builds)
    }

    /// Checks the whole layout against the disk as it is now.
    pub fn is_valid(&self) -> bool {
        self.project_path.is_dir()
            && !self.character_name.is_empty()
            && self.config_path().is_some()
            && Category::ALL
                .iter()
                .all(|category| self.path(*category).is_some())
    }

    pub fn state(&self) -> ContextState {
        if self.is_valid() {
            ContextState::Resolved
        } else {
            ContextState::Unresolved
        }
    }

    /// A copy of this context with `series` selected for `category`.
    pub fn with_series(&self, category: Category, series: Series) -> RigkitResult<Self> {
        let mut context = self.clone();
        context.series[category.index()] = series.checked()?;
        Ok(context)
    }

    /// Existing series numbers of `category`, ascending.
    pub fn available_series(&self, category: Category) -> RigkitResult<Vec<u16>> {
        match self.category_folder(category) {
            Some(folder) => scan_series(&folder),
            None => Ok(Vec::new()),
        }
    }

    /// Suggested number for a new series of `category`.
    pub fn next_series(&self, category: Category) -> RigkitResult<u16> {
        let next = match self.available_series(category)?.last() {
            Some(&highest) => highest + 1,
            None => DEFAULT_SERIES,
        };
        if next > MAX_SERIES {
            return Err(RigkitError::InvalidSeries(i64::from(next)));
        }
        Ok(next)
    }

    /// Create series folder `series` for `category` and return a context
    /// that selects it.
    pub fn create_series(&self, category: Category, series: u16) -> RigkitResult<Self> {
        let selected = Series::new(series)?;
        let folder = self
            .category_folder(category)
            .ok_or_else(|| RigkitError::InvalidName(self.character_name.clone()))?;
        let series_path = folder.join(format!("{series:03}"));
        if series_path.exists() {
            return Err(RigkitError::SeriesExists {
                category: category.to_string(),
                series,
            });
        }
        std::fs::create_dir_all(&series_path)?;
        info!("Created {category} series {series:03} for {}", self.character_name);
        self.with_series(category, selected)
    }
}

impl fmt::Display for ProjectContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ {} (",
            self.character_name,
            self.project_path.display()
        )?;
        for (i, category) in Category::ALL.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match self.series(*category).dir_name() {
                Some(dir_name) => write!(f, "{category} {dir_name}")?,
                None => write!(f, "{category} -")?,
            }
        }
        f.write_str(")")
    }
}

/// Character folders under a project root, sorted. The config folder is
/// not a character.
pub fn list_characters(project_path: impl AsRef<Path>) -> RigkitResult<Vec<String>> {
    Ok(get_folders(project_path, &[CONFIG_DIR])?
        .iter()
        .filter_map(|folder| folder.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn bootstrap(root: &Path) -> ProjectContext {
        ProjectContext::new(root, "kate", ContextOptions::new().create_missing(true)).unwrap()
    }

    #[test]
    fn test_create_missing_bootstraps_layout() {
        let dir = TempDir::new().unwrap();
        let context = bootstrap(dir.path());

        assert!(context.is_valid());
        assert_eq!(context.state(), ContextState::Resolved);
        for category in Category::ALL {
            assert_eq!(context.series(category), Series::Resolved(100));
            let path = context.path(category).unwrap();
            assert!(path.is_dir());
            assert!(path.ends_with("100"));
        }
        assert_eq!(
            context.config_path().unwrap(),
            dir.path().join("kate").join("wip").join(".config")
        );
    }

    #[test]
    fn test_layout_asymmetry() {
        let dir = TempDir::new().unwrap();
        let context = bootstrap(dir.path());
        let kate = dir.path().join("kate");

        assert_eq!(
            context.assets_path().unwrap(),
            kate.join("wip").join("assets").join("100")
        );
        assert_eq!(
            context.animation_path().unwrap(),
            kate.join("animation").join("100")
        );
        assert_eq!(context.builds_path().unwrap(), kate.join("builds").join("100"));
    }

    #[test]
    fn test_create_missing_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let first = bootstrap(dir.path());
        let second = bootstrap(dir.path());
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_tree_is_unresolved() {
        let dir = TempDir::new().unwrap();
        let context = ProjectContext::new(dir.path(), "kate", ContextOptions::new()).unwrap();

        for category in Category::ALL {
            assert_eq!(context.series(category), Series::Unresolved);
            assert_eq!(context.series(category).sentinel(), -1);
            assert_eq!(context.path(category), None);
        }
        assert!(!context.is_valid());
        assert_eq!(context.state(), ContextState::Unresolved);
        assert!(!dir.path().join("kate").exists());
    }

    #[test]
    fn test_missing_project_root_is_unresolved() {
        let dir = TempDir::new().unwrap();
        let context =
            ProjectContext::new(dir.path().join("gone"), "kate", ContextOptions::new()).unwrap();
        assert!(!context.is_valid());
        assert_eq!(context.character_path(), None);
    }

    #[test]
    fn test_highest_series_selected() {
        let dir = TempDir::new().unwrap();
        bootstrap(dir.path());
        let rigs = dir.path().join("kate").join("wip").join("rigs");
        std::fs::create_dir(rigs.join("103")).unwrap();
        std::fs::create_dir(rigs.join("101")).unwrap();
        std::fs::create_dir(rigs.join("1000")).unwrap();

        let context = ProjectContext::new(dir.path(), "kate", ContextOptions::new()).unwrap();
        assert_eq!(context.series(Category::Rigs), Series::Resolved(103));
        assert_eq!(context.series(Category::Assets), Series::Resolved(100));
        assert!(context.is_valid());
        assert_eq!(
            context.available_series(Category::Rigs).unwrap(),
            vec![100, 101, 103]
        );
    }

    #[test]
    fn test_explicit_series_override() {
        let dir = TempDir::new().unwrap();
        bootstrap(dir.path());

        let options = ContextOptions::new()
            .series(Category::Shapes, Series::Resolved(104))
            .series(Category::Textures, Series::Unresolved);
        let context = ProjectContext::new(dir.path(), "kate", options).unwrap();

        assert_eq!(context.series(Category::Shapes), Series::Resolved(104));
        assert_eq!(context.shapes_path(), None);
        assert!(context.expected_path(Category::Shapes).unwrap().ends_with("104"));
        assert_eq!(context.series(Category::Textures), Series::Unresolved);
        assert!(!context.is_valid());
    }

    #[test]
    fn test_explicit_series_created_when_requested() {
        let dir = TempDir::new().unwrap();
        let options = ContextOptions::new()
            .series(Category::Shaders, Series::Resolved(102))
            .create_missing(true);
        let context = ProjectContext::new(dir.path(), "kate", options).unwrap();

        assert!(context.shaders_path().unwrap().ends_with("102"));
        assert!(context.is_valid());
    }

    #[test]
    fn test_four_digit_series_never_selected() {
        let dir = TempDir::new().unwrap();
        let options = ContextOptions::new()
            .series(Category::Rigs, Series::Resolved(1000))
            .create_missing(true);
        assert!(matches!(
            ProjectContext::new(dir.path(), "kate", options),
            Err(RigkitError::InvalidSeries(1000))
        ));
        assert!(!dir.path().join("kate").exists());

        let context = bootstrap(dir.path());
        assert!(matches!(
            context.with_series(Category::Assets, Series::Resolved(5000)),
            Err(RigkitError::InvalidSeries(5000))
        ));

        let options = ContextOptions::new()
            .series(Category::Rigs, Series::new(999).unwrap())
            .create_missing(true);
        ProjectContext::new(dir.path(), "kate", options).unwrap();
        let reopened = ProjectContext::new(dir.path(), "kate", ContextOptions::new()).unwrap();
        assert_eq!(reopened.series(Category::Rigs), Series::Resolved(999));
    }

    #[test]
    fn test_partial_tree() {
        let dir = TempDir::new().unwrap();
        let assets = dir.path().join("kate").join("wip").join("assets").join("100");
        std::fs::create_dir_all(&assets).unwrap();

        let context = ProjectContext::new(dir.path(), "kate", ContextOptions::new()).unwrap();
        assert_eq!(context.assets_path().unwrap(), assets);
        assert_eq!(context.series(Category::Rigs), Series::Unresolved);
        assert_eq!(context.config_path(), None);
        assert!(!context.is_valid());
    }

    #[test]
    fn test_with_series_returns_new_snapshot() {
        let dir = TempDir::new().unwrap();
        let context = bootstrap(dir.path());
        let switched = context
            .with_series(Category::Rigs, Series::Resolved(101))
            .unwrap();

        assert_eq!(context.series(Category::Rigs), Series::Resolved(100));
        assert_eq!(switched.series(Category::Rigs), Series::Resolved(101));
        assert!(context.is_valid());
        assert!(!switched.is_valid());
    }

    #[test]
    fn test_validity_tracks_disk() {
        let dir = TempDir::new().unwrap();
        let context = bootstrap(dir.path());
        std::fs::remove_dir(context.textures_path().unwrap()).unwrap();
        assert!(!context.is_valid());
    }

    #[test]
    fn test_create_series() {
        let dir = TempDir::new().unwrap();
        let context = bootstrap(dir.path());

        assert_eq!(context.next_series(Category::Builds).unwrap(), 101);
        let created = context.create_series(Category::Builds, 101).unwrap();
        assert_eq!(created.series(Category::Builds), Series::Resolved(101));
        assert!(created.is_valid());

        assert!(matches!(
            context.create_series(Category::Builds, 101),
            Err(RigkitError::SeriesExists { series: 101, .. })
        ));
        assert!(context.create_series(Category::Builds, 1000).is_err());
    }

    #[test]
    fn test_next_series_without_folders() {
        let dir = TempDir::new().unwrap();
        let context = ProjectContext::new(dir.path(), "kate", ContextOptions::new()).unwrap();
        assert_eq!(context.next_series(Category::Assets).unwrap(), DEFAULT_SERIES);
    }

    #[test]
    fn test_unsafe_character_names_rejected() {
        let dir = TempDir::new().unwrap();
        for name in ["..", ".", "a/b", "a\\b"] {
            assert!(matches!(
                ProjectContext::new(dir.path(), name, ContextOptions::new()),
                Err(RigkitError::InvalidName(_))
            ));
        }
    }

    #[test]
    fn test_empty_character_name_creates_nothing() {
        let dir = TempDir::new().unwrap();
        let context =
            ProjectContext::new(dir.path(), "", ContextOptions::new().create_missing(true))
                .unwrap();

        assert!(!context.is_valid());
        assert_eq!(context.series(Category::Assets), Series::Unresolved);
        assert!(!dir.path().join("wip").exists());
    }

    #[test]
    fn test_custom_config_path() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("shared_config");
        let options = ContextOptions::new()
            .config_path(&config)
            .create_missing(true);
        let context = ProjectContext::new(dir.path(), "kate", options).unwrap();

        assert_eq!(context.config_path().unwrap(), config);
        assert!(context.is_valid());
    }

    #[test]
    fn test_list_characters() {
        let dir = TempDir::new().unwrap();
        bootstrap(dir.path());
        ProjectContext::new(dir.path(), "bob", ContextOptions::new().create_missing(true)).unwrap();
        std::fs::create_dir(dir.path().join(".config")).unwrap();

        assert_eq!(list_characters(dir.path()).unwrap(), vec!["bob", "kate"]);
    }

    #[test]
    fn test_display() {
        let dir = TempDir::new().unwrap();
        let context = ProjectContext::new(dir.path(), "kate", ContextOptions::new())
            .unwrap()
            .with_series(Category::Assets, Series::Resolved(100))
            .unwrap();
        let text = context.to_string();
        assert!(text.starts_with("kate @ "));
        assert!(text.contains("assets 100"));
        assert!(text.contains("rigs -"));
    }
}
