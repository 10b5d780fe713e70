//! Pure operations over a version list.
//!
//! Every function takes a slice and returns a fresh `Vec`; inputs are never
//! mutated in place. None of them can fail.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{ContentVersion, VersionNumber, VersionSource};

/// Fills in missing version numbers from creation order.
///
/// A version without a number receives its 1-based rank in the whole list
/// sorted by ascending `timestamp` (ties broken by array position). Versions
/// that already carry a number are left untouched, so mixed input can end up
/// with duplicate or non-dense numbers. Use [`renumber_versions`] when a
/// strict 1..N sequence is required.
#[must_use]
pub fn ensure_version_numbers(versions: &[ContentVersion]) -> Vec<ContentVersion> {
    let mut result = versions.to_vec();
    if result.iter().all(|v| v.version_number.is_some()) {
        return result;
    }
    for (rank, idx) in creation_order(versions).into_iter().enumerate() {
        if let Some(version) = result.get_mut(idx)
            && version.version_number.is_none()
        {
            version.version_number = Some(VersionNumber::from_rank(rank));
        }
    }
    result
}

/// Assigns dense numbers 1..N to every version by creation order, replacing
/// any existing numbers. Array order is preserved.
#[must_use]
pub fn renumber_versions(versions: &[ContentVersion]) -> Vec<ContentVersion> {
    let mut result = versions.to_vec();
    for (rank, idx) in creation_order(versions).into_iter().enumerate() {
        if let Some(version) = result.get_mut(idx) {
            version.version_number = Some(VersionNumber::from_rank(rank));
        }
    }
    result
}

/// Returns `true` when every version is numbered and the numbers are exactly 1..N.
#[must_use]
pub fn is_densely_numbered(versions: &[ContentVersion]) -> bool {
    let mut numbers: Vec<u32> = Vec::with_capacity(versions.len());
    for version in versions {
        match version.version_number {
            Some(n) => numbers.push(n.0),
            None => return false,
        }
    }
    numbers.sort_unstable();
    numbers.iter().enumerate().all(|(rank, n)| VersionNumber::from_rank(rank).0 == *n)
}

/// Guarantees an active version in a non-empty list.
///
/// If any version is already active the list is returned unchanged. Otherwise
/// the version with the latest `timestamp` (last in array order on ties) is
/// activated.
#[must_use]
pub fn ensure_active_version(versions: &[ContentVersion]) -> Vec<ContentVersion> {
    if versions.iter().any(|v| v.active) {
        return versions.to_vec();
    }
    let latest = versions
        .iter()
        .enumerate()
        .max_by_key(|(idx, v)| (v.timestamp, *idx))
        .map(|(idx, _)| idx);
    versions
        .iter()
        .enumerate()
        .map(|(idx, v)| with_active(v, Some(idx) == latest))
        .collect()
}

/// Appends a new active version built from `content`, stamped with the current time.
#[must_use]
pub fn add_version(
    versions: &[ContentVersion],
    content: impl Into<String>,
    source: VersionSource,
) -> Vec<ContentVersion> {
    add_version_at(versions, content, source, Utc::now())
}

/// Same as [`add_version`] with an explicit clock reading.
///
/// The stored timestamp is never earlier than the newest existing one, so a
/// clock stepping backwards cannot break creation order.
#[must_use]
pub fn add_version_at(
    versions: &[ContentVersion],
    content: impl Into<String>,
    source: VersionSource,
    now: DateTime<Utc>,
) -> Vec<ContentVersion> {
    let version = next_version(versions, content.into(), source, now);
    append_active(versions, version)
}

/// Builds the version that [`add_version_at`] would append, without appending it.
pub(crate) fn next_version(
    versions: &[ContentVersion],
    content: String,
    source: VersionSource,
    now: DateTime<Utc>,
) -> ContentVersion {
    let number = versions
        .iter()
        .filter_map(|v| v.version_number)
        .max()
        .map_or(VersionNumber::FIRST, VersionNumber::next);
    let timestamp = versions.iter().map(|v| v.timestamp).max().map_or(now, |latest| latest.max(now));

    ContentVersion {
        id: Uuid::new_v4().to_string(),
        content,
        timestamp,
        source,
        version_number: Some(number),
        active: true,
    }
}

/// Appends `version` as the only active entry.
pub(crate) fn append_active(
    versions: &[ContentVersion],
    version: ContentVersion,
) -> Vec<ContentVersion> {
    let mut result = Vec::with_capacity(versions.len().saturating_add(1));
    result.extend(versions.iter().map(|v| with_active(v, false)));
    result.push(with_active(&version, true));
    result
}

/// Activates the version matching `version_id` and deactivates all others.
///
/// Unknown ids are a no-op: the returned list equals the input. Callers that
/// need to know whether anything changed should check with [`find_version`].
#[must_use]
pub fn set_active_version(versions: &[ContentVersion], version_id: &str) -> Vec<ContentVersion> {
    if find_version(versions, version_id).is_none() {
        return versions.to_vec();
    }
    versions.iter().map(|v| with_active(v, v.id == version_id)).collect()
}

/// Returns the active version, if any.
#[must_use]
pub fn get_active_version(versions: &[ContentVersion]) -> Option<&ContentVersion> {
    versions.iter().find(|v| v.active)
}

/// Looks up a version by id.
#[must_use]
pub fn find_version<'a>(versions: &'a [ContentVersion], version_id: &str) -> Option<&'a ContentVersion> {
    versions.iter().find(|v| v.id == version_id)
}

/// Drops the whole history. Resetting the field's content is the caller's job.
#[must_use]
pub fn clear_all() -> Vec<ContentVersion> {
    Vec::new()
}

/// Display order: latest version number first, then latest timestamp.
///
/// Unnumbered versions sort after numbered ones.
#[must_use]
pub fn sort_for_display(versions: &[ContentVersion]) -> Vec<ContentVersion> {
    let mut sorted = versions.to_vec();
    sorted.sort_by(display_order);
    sorted
}

pub(crate) fn display_order(a: &ContentVersion, b: &ContentVersion) -> Ordering {
    b.version_number.cmp(&a.version_number).then_with(|| b.timestamp.cmp(&a.timestamp))
}

/// Indices of `versions` in ascending creation order.
fn creation_order(versions: &[ContentVersion]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..versions.len()).collect();
    // stable: equal timestamps keep array order
    order.sort_by_key(|&idx| versions.get(idx).map(|v| v.timestamp));
    order
}

fn with_active(version: &ContentVersion, active: bool) -> ContentVersion {
    ContentVersion { active, ..version.clone() }
}
