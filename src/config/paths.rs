//! Platform-specific configuration paths.

use crate::constants::APP_NAME;
use crate::error::{Error, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Get the configuration directory for the current platform.
///
/// - Linux: `~/.config/plantwatch/`
/// - macOS: `~/Library/Application Support/plantwatch/`
/// - Windows: `%APPDATA%\plantwatch\`
pub fn config_dir() -> Result<PathBuf> {
    ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or(Error::ConfigDirNotFound)
}

/// Get the full path to the config file.
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Resolve a configured input path against the directory of `anchor`.
///
/// Absolute paths are returned unchanged. Relative paths such as the default
/// `GNSS.csv` are looked up next to the file they belong with.
pub fn resolve_beside(anchor: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    anchor
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map_or_else(|| path.to_path_buf(), |dir| dir.join(path))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir_returns_path() {
        let result = config_dir();
        assert!(result.is_ok());
        let path = result.ok();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("plantwatch"));
    }

    #[test]
    fn test_config_file_path_ends_with_toml() {
        let result = config_file_path();
        assert!(result.is_ok());
        let path = result.ok().unwrap();
        assert!(path.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn test_resolve_beside_relative() {
        let resolved = resolve_beside(Path::new("/runs/day1/crossing_records.csv"), Path::new("GNSS.csv"));
        assert_eq!(resolved, PathBuf::from("/runs/day1/GNSS.csv"));
    }

    #[test]
    fn test_resolve_beside_absolute_and_bare_anchor() {
        let resolved = resolve_beside(Path::new("/runs/a.csv"), Path::new("/logs/GNSS.csv"));
        assert_eq!(resolved, PathBuf::from("/logs/GNSS.csv"));
        let resolved = resolve_beside(Path::new("a.csv"), Path::new("GNSS.csv"));
        assert_eq!(resolved, PathBuf::from("GNSS.csv"));
    }
}
