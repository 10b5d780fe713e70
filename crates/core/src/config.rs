//! Runtime settings resolved from the environment.

use std::path::{Path, PathBuf};

use crate::constants::{DATA_DIR_ENV, DATA_DIR_NAME, DEFAULT_SOURCE_ENV, PRETTY_JSON_ENV};
use crate::env_config::env_parse_with_default;
use crate::VersionSource;

/// Settings shared by hosts of the version engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory relative record paths are looked up in
    pub data_dir: PathBuf,
    /// Source used by commits that don't specify one
    pub default_source: VersionSource,
    /// Pretty-print JSON output
    pub pretty_json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            default_source: VersionSource::Manual,
            pretty_json: true,
        }
    }
}

impl Settings {
    /// Reads `SHOWRUNNER_*` variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let data_dir = std::env::var_os(DATA_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map_or(defaults.data_dir, PathBuf::from);
        Self {
            data_dir,
            default_source: env_parse_with_default(DEFAULT_SOURCE_ENV, defaults.default_source),
            pretty_json: env_parse_with_default(PRETTY_JSON_ENV, defaults.pretty_json),
        }
    }

    /// Absolute paths and paths that exist relative to the working directory are
    /// used as given; anything else is looked up under `data_dir`.
    #[must_use]
    pub fn resolve_record_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() || path.exists() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir().unwrap_or_else(|| PathBuf::from(".")).join(DATA_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_paths_are_kept() {
        let settings = Settings { data_dir: PathBuf::from("/srv/shows"), ..Settings::default() };
        let path = PathBuf::from("/tmp/episode-12.json");
        assert_eq!(settings.resolve_record_path(&path), path);
    }

    #[test]
    fn missing_relative_paths_resolve_under_data_dir() {
        let settings = Settings { data_dir: PathBuf::from("/srv/shows"), ..Settings::default() };
        let resolved = settings.resolve_record_path(Path::new("episodes/does-not-exist-7731.json"));
        assert_eq!(resolved, PathBuf::from("/srv/shows/episodes/does-not-exist-7731.json"));
    }

    #[test]
    fn defaults_are_manual_and_pretty() {
        let settings = Settings::default();
        assert_eq!(settings.default_source, VersionSource::Manual);
        assert!(settings.pretty_json);
        assert!(settings.data_dir.ends_with(DATA_DIR_NAME));
    }
}
