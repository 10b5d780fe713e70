//! Shared constants for showrunner.

/// Overrides the directory record files are resolved against.
pub const DATA_DIR_ENV: &str = "SHOWRUNNER_DATA_DIR";

/// Source tag applied to commits that do not name one.
pub const DEFAULT_SOURCE_ENV: &str = "SHOWRUNNER_DEFAULT_SOURCE";

/// Whether CLI output is pretty-printed JSON.
pub const PRETTY_JSON_ENV: &str = "SHOWRUNNER_PRETTY_JSON";

/// Directory name under the platform data dir when `SHOWRUNNER_DATA_DIR` is unset.
pub const DATA_DIR_NAME: &str = "showrunner";

/// Characters of content shown per entry in the version selector.
pub const PREVIEW_CHARS: usize = 80;
