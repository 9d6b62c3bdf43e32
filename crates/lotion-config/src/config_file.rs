//! Discovery of `lotion.yaml`.
//!
//! The file is found by walking up from a starting directory, unless the
//! `LOTION_CONFIG` environment variable names one explicitly.

use std::path::{Path, PathBuf};

/// The name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "lotion.yaml";

/// The environment variable that can override the configuration file.
const CONFIG_ENV: &str = "LOTION_CONFIG";

/// Walk up the directory tree from `start` looking for `lotion.yaml`.
///
/// Returns `None` if the filesystem root is reached without finding one.
/// `LOTION_CONFIG` is checked first (highest priority) and used when it
/// names an existing file.
///
/// # Examples
///
/// ```no_run
/// use lotion_config::find_config_file;
/// use std::path::Path;
///
/// if let Some(path) = find_config_file(Path::new(".")) {
///     println!("Using config at {}", path.display());
/// }
/// ```
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        let env_path = PathBuf::from(env_path);
        if env_path.is_file() {
            return Some(env_path);
        }
    }
    find_in_ancestors(start)
}

fn find_in_ancestors(start: &Path) -> Option<PathBuf> {
    // Canonicalize so relative starts still reach the filesystem root.
    let start = start.canonicalize().ok()?;
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
