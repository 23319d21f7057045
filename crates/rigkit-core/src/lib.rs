//! Rigging toolkit core: versioned asset lookup and project layout.
//!
//! The toolkit's host-side tools (rig builders, shader setup, the shape graph,
//! the UI) ask this crate two kinds of question: "where does this character's
//! data live" ([`context::ProjectContext`]) and "which file is the latest
//! version of this asset, and what do I call the next one"
//! ([`filesystem::locator`]). With the `python` feature the crate also builds
//! the `_rigkit_core` extension module those tools import.

pub mod context;
pub mod errors;
pub mod filesystem;
pub mod logging;
pub mod settings;

#[cfg(feature = "python")]
pub mod python;

pub use context::{Category, ContextOptions, ContextState, ProjectContext, Series};
pub use errors::{RigkitError, RigkitResult, VersionFault};
pub use filesystem::{LatestVersion, NewVersion, PathVersion, ScanMode};
pub use settings::Settings;

#[cfg(feature = "python")]
use pyo3::prelude::*;
#[cfg(feature = "python")]
use pyo3::wrap_pyfunction;

// ---------------------------------------------------------------------------
// Top-level Python module: _rigkit_core
// ---------------------------------------------------------------------------

#[cfg(feature = "python")]
#[pymodule]
fn _rigkit_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    let py = m.py();

    // -- Errors -------------------------------------------------------------
    m.add(
        "MalformedVersionError",
        py.get_type::<errors::MalformedVersionError>(),
    )?;
    m.add(
        "DirectoryNotFoundError",
        py.get_type::<errors::DirectoryNotFoundError>(),
    )?;
    m.add(
        "AssetNotFoundError",
        py.get_type::<errors::AssetNotFoundError>(),
    )?;
    m.add(
        "SeriesExistsError",
        py.get_type::<errors::SeriesExistsError>(),
    )?;

    // -- Constants ----------------------------------------------------------
    m.add("DEFAULT_SERIES", context::DEFAULT_SERIES)?;
    m.add("MAX_SERIES", context::MAX_SERIES)?;
    m.add("MAX_VERSION", filesystem::MAX_VERSION)?;
    m.add("WIP_DIR", context::WIP_DIR)?;
    m.add("CONFIG_DIR", context::CONFIG_DIR)?;

    // -- Classes ------------------------------------------------------------
    m.add_class::<python::PyPathVersion>()?;
    m.add_class::<python::PyProjectContext>()?;

    // -- Locator ------------------------------------------------------------
    m.add_function(wrap_pyfunction!(python::py_find_latest, m)?)?;
    m.add_function(wrap_pyfunction!(python::py_find_latest_partial, m)?)?;
    m.add_function(wrap_pyfunction!(python::py_find_file, m)?)?;
    m.add_function(wrap_pyfunction!(python::py_find_new_version, m)?)?;
    m.add_function(wrap_pyfunction!(python::py_find_all_latest, m)?)?;

    // -- Filesystem helpers -------------------------------------------------
    m.add_function(wrap_pyfunction!(python::py_get_folders, m)?)?;
    m.add_function(wrap_pyfunction!(python::py_get_files_by_extension, m)?)?;
    m.add_function(wrap_pyfunction!(python::py_path_exists, m)?)?;
    m.add_function(wrap_pyfunction!(python::py_list_characters, m)?)?;

    // -- Logging ------------------------------------------------------------
    m.add_function(wrap_pyfunction!(python::py_init_logging, m)?)?;

    Ok(())
}
