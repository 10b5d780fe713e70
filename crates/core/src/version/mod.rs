//! Content version types for long-form text fields.
//!
//! A field's history is a plain `Vec<ContentVersion>`; the pure list operations
//! live in [`ops`] and the persisted-shape handling in [`ingest`].

mod builder;
mod ingest;
mod ops;


pub use builder::*;
pub use ingest::*;
pub use ops::*;
pub(crate) use ops::{append_active, display_order, next_version};

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::VersionError;

/// Provenance of a version. Informational only, never affects ordering or activation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum VersionSource {
    /// Typed by an editor
    #[default]
    Manual,
    /// Produced by an AI generation step
    Ai,
    /// Synthesized from a field value that predates versioning
    Import,
}

impl VersionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Ai => "ai",
            Self::Import => "import",
        }
    }
}

impl fmt::Display for VersionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VersionSource {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "manual" => Ok(Self::Manual),
            "ai" | "generated" => Ok(Self::Ai),
            "import" | "imported" => Ok(Self::Import),
            other => Err(VersionError::InvalidInput(format!("unknown version source: {other}"))),
        }
    }
}

/// 1-based ordinal of a version within its list.
///
/// Kept distinct from plain integers so a list position is never passed
/// where a version number is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionNumber(pub u32);

impl VersionNumber {
    pub const FIRST: Self = Self(1);

    /// The number following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Number for a zero-based rank, saturating at `u32::MAX`.
    #[must_use]
    pub fn from_rank(rank: usize) -> Self {
        Self(u32::try_from(rank).unwrap_or(u32::MAX).saturating_add(1))
    }
}

impl From<u32> for VersionNumber {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

impl From<VersionNumber> for u32 {
    fn from(v: VersionNumber) -> Self {
        v.0
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One snapshot of a text field.
///
/// Equality is by `id` only. After creation only `active` ever changes
/// (and `version_number`, when a list is normalized on ingest).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentVersion {
    /// Unique identifier, immutable
    pub id: String,
    /// Full text/HTML payload (not a diff)
    pub content: String,
    /// Creation instant; non-decreasing across additions to one list
    pub timestamp: DateTime<Utc>,
    /// Where the content came from
    #[serde(default)]
    pub source: VersionSource,
    /// Ordinal within the list; `None` for legacy entries persisted without one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_number: Option<VersionNumber>,
    /// Whether this is the field's current version
    #[serde(default)]
    pub active: bool,
}

impl PartialEq for ContentVersion {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ContentVersion {}

impl ContentVersion {
    /// Returns a builder with the required fields set.
    #[must_use]
    pub fn builder(id: impl Into<String>, content: impl Into<String>) -> ContentVersionBuilder {
        ContentVersionBuilder::new(id.into(), content.into())
    }
}
