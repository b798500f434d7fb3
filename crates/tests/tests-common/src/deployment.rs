//! Deployment functions used across test cases.

use std::path::PathBuf;

/// Find the project root via the crate root provided by `cargo test`,
/// as the closest ancestor holding the `static` directory, and get a path relative to it.
pub fn get_path_from_project_root(path: &str) -> PathBuf {
    let crate_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let project_root = crate_root
        .ancestors()
        .find(|dir| dir.join("static").is_dir())
        .map_or_else(|| crate_root.join("../../.."), PathBuf::from);
    project_root.join(path)
}

/// The directory holding the shared sample configuration.
pub fn static_configuration_dir() -> PathBuf {
    get_path_from_project_root("static")
}
