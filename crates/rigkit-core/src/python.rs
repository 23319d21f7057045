//! Python-facing wrappers. Result shapes follow what the toolkit's Python
//! tools already consume: paths as `str`, `(path | None, version)` tuples with
//! `(None, -1)` for "nothing found", and `-1` for unresolved series.

use std::path::PathBuf;
use std::time::UNIX_EPOCH;

use pyo3::prelude::*;

use crate::context::{list_characters, Category, ContextOptions, ProjectContext, Series};
use crate::filesystem::{
    expand_tilde, find_all_latest, find_file, find_latest, find_latest_partial, find_new_version,
    get_files_by_extension, get_folders, path_exists, LatestVersion, PathVersion, ScanMode,
};
use crate::logging;
use crate::settings::Settings;

fn scan_mode(strict: bool) -> ScanMode {
    if strict {
        ScanMode::Strict
    } else {
        ScanMode::Lenient
    }
}

fn path_string(path: PathBuf) -> String {
    path.to_string_lossy().into_owned()
}

fn optional_path_string(path: Option<PathBuf>) -> Option<String> {
    path.map(path_string)
}

fn latest_tuple(latest: Option<LatestVersion>) -> (Option<String>, i64) {
    match latest {
        Some(latest) => (Some(path_string(latest.path)), i64::from(latest.version)),
        None => (None, -1),
    }
}

fn parse_category(category: &str) -> PyResult<Category> {
    Ok(category.parse::<Category>()?)
}

// ---------------------------------------------------------------------------
// PathVersion
// ---------------------------------------------------------------------------

#[pyclass(frozen, name = "PathVersion", module = "_rigkit_core")]
#[derive(Clone, Debug)]
pub struct PyPathVersion {
    inner: PathVersion,
}

#[pymethods]
impl PyPathVersion {
    #[new]
    fn new(path: &str) -> Self {
        Self {
            inner: PathVersion::new(expand_tilde(path)),
        }
    }

    #[getter]
    fn path(&self) -> String {
        path_string(self.inner.path().to_path_buf())
    }

    #[getter]
    fn name(&self) -> String {
        self.inner.file_name()
    }

    #[getter]
    fn version(&self) -> PyResult<u32> {
        Ok(self.inner.version()?)
    }

    #[getter]
    fn is_versioned(&self) -> bool {
        self.inner.is_versioned()
    }

    #[getter]
    fn unversioned_stem(&self) -> PyResult<String> {
        Ok(self.inner.unversioned_stem()?)
    }

    #[getter]
    fn unversioned_name(&self) -> PyResult<String> {
        Ok(self.inner.unversioned_name()?)
    }

    #[getter]
    fn unversioned_suffix(&self) -> PyResult<String> {
        Ok(self.inner.unversioned_suffix()?)
    }

    fn with_version(&self, version: u32) -> PyResult<Self> {
        Ok(Self {
            inner: self.inner.with_version(version)?,
        })
    }

    #[getter]
    fn file_size(&self) -> PyResult<u64> {
        Ok(self.inner.file_size()?)
    }

    /// Seconds since the Unix epoch.
    #[getter]
    fn creation_date(&self) -> PyResult<f64> {
        let created = self.inner.creation_date()?;
        Ok(created
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs_f64())
            .unwrap_or(0.0))
    }

    fn __fspath__(&self) -> String {
        self.path()
    }

    fn __str__(&self) -> String {
        self.path()
    }

    fn __repr__(&self) -> String {
        format!("PathVersion({:?})", self.path())
    }
}

// ---------------------------------------------------------------------------
// ProjectContext
// ---------------------------------------------------------------------------

#[pyclass(frozen, eq, name = "ProjectContext", module = "_rigkit_core")]
#[derive(Clone, Debug, PartialEq)]
pub struct PyProjectContext {
    inner: ProjectContext,
}

impl PyProjectContext {
    fn series_of(&self, category: Category) -> i64 {
        self.inner.series(category).sentinel()
    }

    fn path_of(&self, category: Category) -> Option<String> {
        optional_path_string(self.inner.path(category))
    }
}

#[pymethods]
impl PyProjectContext {
    /// Resolve a context. Series left as `None` pick the highest existing
    /// series folder.
    #[staticmethod]
    #[pyo3(signature = (
        project_path,
        character_name,
        assets_series=None,
        rigs_series=None,
        texture_series=None,
        shapes_series=None,
        utilities_series=None,
        animation_series=None,
        build_series=None,
        shaders_series=None,
        config_path=None,
        create_missing=false,
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        project_path: &str,
        character_name: &str,
        assets_series: Option<i64>,
        rigs_series: Option<i64>,
        texture_series: Option<i64>,
        shapes_series: Option<i64>,
        utilities_series: Option<i64>,
        animation_series: Option<i64>,
        build_series: Option<i64>,
        shaders_series: Option<i64>,
        config_path: Option<&str>,
        create_missing: bool,
    ) -> PyResult<Self> {
        let overrides = [
            (Category::Assets, assets_series),
            (Category::Rigs, rigs_series),
            (Category::Textures, texture_series),
            (Category::Shapes, shapes_series),
            (Category::Utilities, utilities_series),
            (Category::Animation, animation_series),
            (Category::Builds, build_series),
            (Category::Shaders, shaders_series),
        ];

        let mut options = ContextOptions::new().create_missing(create_missing);
        for (category, series) in overrides {
            if let Some(series) = series {
                options = options.series(category, Series::try_from(series)?);
            }
        }
        if let Some(config_path) = config_path {
            options = options.config_path(expand_tilde(config_path));
        }

        let inner = ProjectContext::new(expand_tilde(project_path), character_name, options)?;
        Ok(Self { inner })
    }

    #[getter]
    fn project_path(&self) -> String {
        path_string(self.inner.project_path().to_path_buf())
    }

    #[getter]
    fn character_name(&self) -> String {
        self.inner.character_name().to_string()
    }

    #[getter]
    fn assets_series(&self) -> i64 {
        self.series_of(Category::Assets)
    }

    #[getter]
    fn rigs_series(&self) -> i64 {
        self.series_of(Category::Rigs)
    }

    #[getter]
    fn texture_series(&self) -> i64 {
        self.series_of(Category::Textures)
    }

    #[getter]
    fn shapes_series(&self) -> i64 {
        self.series_of(Category::Shapes)
    }

    #[getter]
    fn utilities_series(&self) -> i64 {
        self.series_of(Category::Utilities)
    }

    #[getter]
    fn shaders_series(&self) -> i64 {
        self.series_of(Category::Shaders)
    }

    #[getter]
    fn animation_series(&self) -> i64 {
        self.series_of(Category::Animation)
    }

    #[getter]
    fn build_series(&self) -> i64 {
        self.series_of(Category::Builds)
    }

    #[getter]
    fn character_path(&self) -> Option<String> {
        optional_path_string(self.inner.character_path())
    }

    #[getter]
    fn wip_path(&self) -> Option<String> {
        optional_path_string(self.inner.wip_path())
    }

    #[getter]
    fn config_path(&self) -> Option<String> {
        optional_path_string(self.inner.config_path())
    }

    #[getter]
    fn assets_path(&self) -> Option<String> {
        self.path_of(Category::Assets)
    }

    #[getter]
    fn rigs_path(&self) -> Option<String> {
        self.path_of(Category::Rigs)
    }

    #[getter]
    fn texture_path(&self) -> Option<String> {
        self.path_of(Category::Textures)
    }

    #[getter]
    fn shapes_path(&self) -> Option<String> {
        self.path_of(Category::Shapes)
    }

    #[getter]
    fn utilities_path(&self) -> Option<String> {
        self.path_of(Category::Utilities)
    }

    #[getter]
    fn shaders_path(&self) -> Option<String> {
        self.path_of(Category::Shaders)
    }

    #[getter]
    fn animation_path(&self) -> Option<String> {
        self.path_of(Category::Animation)
    }

    #[getter]
    fn builds_path(&self) -> Option<String> {
        self.path_of(Category::Builds)
    }

    #[getter]
    fn is_valid(&self) -> bool {
        self.inner.is_valid()
    }

    fn series(&self, category: &str) -> PyResult<i64> {
        Ok(self.series_of(parse_category(category)?))
    }

    fn path(&self, category: &str) -> PyResult<Option<String>> {
        Ok(self.path_of(parse_category(category)?))
    }

    fn with_series(&self, category: &str, series: i64) -> PyResult<Self> {
        let category = parse_category(category)?;
        Ok(Self {
            inner: self.inner.with_series(category, Series::try_from(series)?)?,
        })
    }

    fn available_series(&self, category: &str) -> PyResult<Vec<u16>> {
        Ok(self.inner.available_series(parse_category(category)?)?)
    }

    fn next_series(&self, category: &str) -> PyResult<u16> {
        Ok(self.inner.next_series(parse_category(category)?)?)
    }

    fn create_series(&self, category: &str, series: u16) -> PyResult<Self> {
        let inner = self
            .inner
            .create_series(parse_category(category)?, series)?;
        Ok(Self { inner })
    }

    fn __repr__(&self) -> String {
        format!("ProjectContext({})", self.inner)
    }
}

// ---------------------------------------------------------------------------
// Locator functions
// ---------------------------------------------------------------------------

#[pyfunction]
#[pyo3(name = "find_latest", signature = (folder, versioned_name, extension, strict=false))]
pub fn py_find_latest(
    folder: &str,
    versioned_name: &str,
    extension: &str,
    strict: bool,
) -> PyResult<(Option<String>, i64)> {
    let latest = find_latest(
        expand_tilde(folder),
        versioned_name,
        extension,
        scan_mode(strict),
    )?;
    Ok(latest_tuple(latest))
}

#[pyfunction]
#[pyo3(name = "find_latest_partial", signature = (folder, partial_name, extension, strict=false))]
pub fn py_find_latest_partial(
    folder: &str,
    partial_name: &str,
    extension: &str,
    strict: bool,
) -> PyResult<(Option<String>, i64)> {
    let latest = find_latest_partial(
        expand_tilde(folder),
        partial_name,
        extension,
        scan_mode(strict),
    )?;
    Ok(latest_tuple(latest))
}

#[pyfunction]
#[pyo3(name = "find_file", signature = (folder, file_name, extension, strict=false))]
pub fn py_find_file(
    folder: &str,
    file_name: &str,
    extension: &str,
    strict: bool,
) -> PyResult<Option<String>> {
    let found = find_file(expand_tilde(folder), file_name, extension, scan_mode(strict))?;
    Ok(optional_path_string(found))
}

#[pyfunction]
#[pyo3(name = "find_new_version", signature = (folder, versioned_name, extension, strict=false))]
pub fn py_find_new_version(
    folder: &str,
    versioned_name: &str,
    extension: &str,
    strict: bool,
) -> PyResult<(String, u32)> {
    let new = find_new_version(
        expand_tilde(folder),
        versioned_name,
        extension,
        scan_mode(strict),
    )?;
    Ok((path_string(new.path), new.version))
}

/// Latest file per distinct base name, sorted by base name.
#[pyfunction]
#[pyo3(name = "find_all_latest", signature = (folder, extension, strict=false))]
pub fn py_find_all_latest(
    folder: &str,
    extension: &str,
    strict: bool,
) -> PyResult<Vec<Option<String>>> {
    let all = find_all_latest(expand_tilde(folder), extension, scan_mode(strict))?;
    Ok(all
        .into_values()
        .map(|latest| latest.map(|latest| path_string(latest.path)))
        .collect())
}

#[pyfunction]
#[pyo3(name = "get_folders", signature = (path, ignore_list=None))]
pub fn py_get_folders(path: &str, ignore_list: Option<Vec<String>>) -> PyResult<Vec<String>> {
    let ignore_list = ignore_list.unwrap_or_default();
    let ignore: Vec<&str> = ignore_list.iter().map(String::as_str).collect();
    let folders = get_folders(expand_tilde(path), &ignore)?;
    Ok(folders.into_iter().map(path_string).collect())
}

#[pyfunction]
#[pyo3(name = "get_files_by_extension")]
pub fn py_get_files_by_extension(path: &str, extension: &str) -> PyResult<Vec<String>> {
    let files = get_files_by_extension(expand_tilde(path), extension)?;
    Ok(files.into_iter().map(path_string).collect())
}

#[pyfunction]
#[pyo3(name = "path_exists")]
pub fn py_path_exists(path: &str) -> bool {
    path_exists(expand_tilde(path))
}

#[pyfunction]
#[pyo3(name = "list_characters")]
pub fn py_list_characters(project_path: &str) -> PyResult<Vec<String>> {
    Ok(list_characters(expand_tilde(project_path))?)
}

/// Install the log subscriber. Settings come from `config_dir/toolkit.json`
/// when given, else the environment; `level` wins over both.
#[pyfunction]
#[pyo3(name = "init_logging", signature = (level=None, config_dir=None))]
pub fn py_init_logging(level: Option<String>, config_dir: Option<&str>) -> PyResult<()> {
    let mut settings = match config_dir {
        Some(config_dir) => Settings::load(expand_tilde(config_dir))?,
        None => Settings::from_env(),
    };
    if let Some(level) = level {
        settings.log_level = level.to_lowercase();
    }
    logging::init_logging(&settings);
    Ok(())
}
