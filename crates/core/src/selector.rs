//! Display-ready view of a field's version history.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::constants::PREVIEW_CHARS;
use crate::manager::{VersionManager, VersionSink};
use crate::version::display_order;
use crate::{ContentVersion, VersionNumber, VersionSource};

/// One row of the version picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectorEntry {
    pub id: String,
    pub version_number: Option<VersionNumber>,
    pub source: VersionSource,
    pub timestamp: DateTime<Utc>,
    pub active: bool,
    /// Leading characters of the content, whitespace collapsed
    pub preview: String,
}

impl From<&ContentVersion> for SelectorEntry {
    fn from(version: &ContentVersion) -> Self {
        Self {
            id: version.id.clone(),
            version_number: version.version_number,
            source: version.source,
            timestamp: version.timestamp,
            active: version.active,
            preview: preview(&version.content),
        }
    }
}

/// Sorted entries (latest first) plus the active id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionSelection {
    pub entries: Vec<SelectorEntry>,
    pub active_version_id: Option<String>,
}

impl VersionSelection {
    #[must_use]
    pub fn build(versions: &[ContentVersion], active_version_id: Option<&str>) -> Self {
        let mut sorted: Vec<&ContentVersion> = versions.iter().collect();
        sorted.sort_by(|a, b| display_order(a, b));
        Self {
            entries: sorted.into_iter().map(SelectorEntry::from).collect(),
            active_version_id: active_version_id.map(str::to_owned),
        }
    }
}

/// Recomputes a [`VersionSelection`] only when the manager's revision moves.
#[derive(Debug, Clone, Default)]
pub struct SelectorCache {
    revision: Option<u64>,
    selection: VersionSelection,
}

impl SelectorCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection<S: VersionSink>(&mut self, manager: &VersionManager<S>) -> &VersionSelection {
        if self.revision != Some(manager.revision()) {
            self.selection = VersionSelection::build(manager.versions(), manager.active_version_id());
            self.revision = Some(manager.revision());
        }
        &self.selection
    }
}

/// A version picker bound to a manager: the view plus its two actions.
pub struct VersionSelector<'m, S> {
    manager: &'m mut VersionManager<S>,
    cache: SelectorCache,
}

impl<'m, S: VersionSink> VersionSelector<'m, S> {
    pub fn new(manager: &'m mut VersionManager<S>) -> Self {
        Self { manager, cache: SelectorCache::new() }
    }

    pub fn selection(&mut self) -> &VersionSelection {
        self.cache.selection(self.manager)
    }

    /// Activates `version_id`; unknown ids are ignored.
    pub fn select(&mut self, version_id: &str) -> bool {
        self.manager.select_version(version_id)
    }

    pub fn clear_all(&mut self) {
        self.manager.clear_all_versions();
    }
}

fn preview(content: &str) -> String {
    let collapsed = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= PREVIEW_CHARS {
        return collapsed;
    }
    let mut cut: String = collapsed.chars().take(PREVIEW_CHARS).collect();
    cut.push('…');
    cut
}
