pub mod locator;
pub mod paths;
pub mod version;

pub use locator::{
    find_all_latest, find_file, find_latest, find_latest_partial, find_new_version,
    require_latest, LatestVersion, NewVersion, ScanMode,
};
pub use paths::{
    expand_tilde, get_files_by_extension, get_folders, has_folders, path_exists, validate_path,
};
pub use version::{versioned_file_name, PathVersion, MAX_VERSION};
