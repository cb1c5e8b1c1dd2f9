//! Platform-specific directory paths.

use std::path::PathBuf;

use directories::ProjectDirs;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "tablescan";
const APPLICATION: &str = "tablescan";

/// Log file used when no cache directory is available.
pub const FALLBACK_LOG_FILE: &str = "tablescan.log";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Get the cache directory.
///
/// - Linux: `$XDG_CACHE_HOME/tablescan` or `~/.cache/tablescan`
/// - macOS: `~/Library/Caches/dev.tablescan.tablescan`
/// - Windows: `C:\Users\<User>\AppData\Local\tablescan\tablescan\cache`
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Get the path to the latest log file.
pub fn log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("latest.log"))
}
