//! Stateful binding of a version list to one live content field.
//!
//! Each editable field owns its own [`VersionManager`]. The manager keeps the
//! list, the cached active id and the current draft, and pushes every change to
//! its [`VersionSink`] synchronously before returning.

use chrono::Utc;
use serde_json::Value;

use crate::version::{append_active, next_version};
use crate::{
    find_version, get_active_version, ingest_versions, normalize_versions, set_active_version,
    ContentVersion, VersionNumber, VersionSource,
};

/// Receives state changes from a [`VersionManager`].
pub trait VersionSink {
    /// The field's current content changed.
    fn content_changed(&mut self, content: &str);

    /// The field's version list changed.
    fn versions_changed(&mut self, versions: &[ContentVersion]);
}

/// Sink that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl VersionSink for NullSink {
    fn content_changed(&mut self, _content: &str) {}

    fn versions_changed(&mut self, _versions: &[ContentVersion]) {}
}

/// Sink backed by a pair of closures.
pub struct CallbackSink<C, V> {
    on_content_change: C,
    on_versions_change: V,
}

impl<C, V> CallbackSink<C, V>
where
    C: FnMut(&str),
    V: FnMut(&[ContentVersion]),
{
    pub const fn new(on_content_change: C, on_versions_change: V) -> Self {
        Self { on_content_change, on_versions_change }
    }
}

impl<C, V> VersionSink for CallbackSink<C, V>
where
    C: FnMut(&str),
    V: FnMut(&[ContentVersion]),
{
    fn content_changed(&mut self, content: &str) {
        (self.on_content_change)(content);
    }

    fn versions_changed(&mut self, versions: &[ContentVersion]) {
        (self.on_versions_change)(versions);
    }
}

/// Version history for one field, kept in sync with a host through a sink.
///
/// All operations take `&mut self`, so a commit and a selection can never
/// interleave: whichever is applied last determines the list.
#[derive(Debug)]
pub struct VersionManager<S> {
    versions: Vec<ContentVersion>,
    active_id: Option<String>,
    content: String,
    default_source: VersionSource,
    initialized: bool,
    revision: u64,
    sink: S,
}

impl<S: VersionSink> VersionManager<S> {
    #[must_use]
    pub fn new(sink: S) -> Self {
        Self {
            versions: Vec::new(),
            active_id: None,
            content: String::new(),
            default_source: VersionSource::default(),
            initialized: false,
            revision: 0,
            sink,
        }
    }

    /// Source recorded by [`commit`](Self::commit).
    #[must_use]
    pub fn with_default_source(mut self, source: VersionSource) -> Self {
        self.default_source = source;
        self
    }

    /// Seeds the manager from a field's stored state. Runs at most once.
    ///
    /// With no history and non-empty content, one `import` version holding the
    /// content becomes version 1. Otherwise the supplied history is normalized
    /// and its active version's content replaces `initial_content`.
    ///
    /// Returns `false` (and changes nothing) if already initialized, so a live
    /// draft is never overwritten by a late re-initialization.
    pub fn initialize(&mut self, initial_content: &str, initial_versions: Vec<ContentVersion>) -> bool {
        if self.initialized {
            tracing::warn!(revision = self.revision, "version manager already initialized, ignoring");
            return false;
        }
        self.initialized = true;

        let initial_versions = normalize_versions(initial_versions);
        if initial_versions.is_empty() {
            if initial_content.is_empty() {
                self.versions = Vec::new();
            } else {
                let seed = ContentVersion::builder(uuid::Uuid::new_v4().to_string(), initial_content)
                    .timestamp(Utc::now())
                    .source(VersionSource::Import)
                    .version_number(VersionNumber::FIRST.0)
                    .active(true)
                    .build();
                tracing::debug!(version_id = %seed.id, "seeded history with imported content");
                self.versions = vec![seed];
            }
            self.content = initial_content.to_owned();
        } else {
            self.versions = initial_versions;
            self.content = get_active_version(&self.versions)
                .map_or_else(|| initial_content.to_owned(), |v| v.content.clone());
            if self.content != initial_content {
                tracing::debug!("stored content differs from active version, using version history");
            }
        }

        self.refresh_active_id();
        self.publish();
        true
    }

    /// [`initialize`](Self::initialize) from a persisted, possibly malformed, JSON value.
    pub fn initialize_from_value(&mut self, initial_content: &str, raw_versions: Option<&Value>) -> bool {
        if self.initialized {
            return self.initialize(initial_content, Vec::new());
        }
        let versions = ingest_versions(raw_versions);
        self.initialize(initial_content, versions)
    }

    /// Updates the uncommitted draft. No version is recorded and the sink is not told.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Records `content` as a new active version using the default source.
    ///
    /// Always creates a version, even when `content` equals the active one.
    pub fn commit(&mut self, content: impl Into<String>) -> ContentVersion {
        let source = self.default_source;
        self.commit_with_source(content, source)
    }

    /// Records `content` as a new active version with an explicit source.
    pub fn commit_with_source(&mut self, content: impl Into<String>, source: VersionSource) -> ContentVersion {
        let version = next_version(&self.versions, content.into(), source, Utc::now());
        self.versions = append_active(&self.versions, version.clone());
        self.content = version.content.clone();
        tracing::debug!(
            version_id = %version.id,
            version_number = ?version.version_number,
            source = %version.source,
            "committed version"
        );
        self.refresh_active_id();
        self.publish();
        version
    }

    /// Makes `version_id` the active version and loads its content as the draft,
    /// discarding uncommitted edits.
    ///
    /// Unknown ids change nothing and notify no one; returns whether the id matched.
    pub fn select_version(&mut self, version_id: &str) -> bool {
        if find_version(&self.versions, version_id).is_none() {
            tracing::debug!(version_id, "select ignored, no such version");
            return false;
        }
        self.versions = set_active_version(&self.versions, version_id);
        self.content = get_active_version(&self.versions).map(|v| v.content.clone()).unwrap_or_default();
        tracing::debug!(version_id, "selected version");
        self.refresh_active_id();
        self.publish();
        true
    }

    /// Empties the history and resets the content to an empty string.
    pub fn clear_all_versions(&mut self) {
        let cleared = self.versions.len();
        self.versions = crate::clear_all();
        self.content = String::new();
        tracing::debug!(cleared, "cleared version history");
        self.refresh_active_id();
        self.publish();
    }

    #[must_use]
    pub fn versions(&self) -> &[ContentVersion] {
        &self.versions
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn active_version_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    #[must_use]
    pub fn active_version(&self) -> Option<&ContentVersion> {
        get_active_version(&self.versions)
    }

    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Bumped on every change to the version list or active version.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether the draft differs from the active version's content.
    #[must_use]
    pub fn has_uncommitted_changes(&self) -> bool {
        self.active_version().map_or(!self.content.is_empty(), |v| v.content != self.content)
    }

    fn refresh_active_id(&mut self) {
        self.active_id = get_active_version(&self.versions).map(|v| v.id.clone());
        self.revision = self.revision.wrapping_add(1);
    }

    fn publish(&mut self) {
        self.sink.content_changed(&self.content);
        self.sink.versions_changed(&self.versions);
    }
}
