//! Builder for [`ContentVersion`], used by hosts seeding history and by tests.

use chrono::{DateTime, Utc};

use super::{ContentVersion, VersionNumber, VersionSource};

/// Builder for constructing [`ContentVersion`] instances.
#[derive(Debug, Clone)]
pub struct ContentVersionBuilder {
    id: String,
    content: String,
    timestamp: DateTime<Utc>,
    source: VersionSource,
    version_number: Option<VersionNumber>,
    active: bool,
}

impl ContentVersionBuilder {
    #[must_use]
    pub(crate) fn new(id: String, content: String) -> Self {
        Self {
            id,
            content,
            timestamp: Utc::now(),
            source: VersionSource::default(),
            version_number: None,
            active: false,
        }
    }

    #[must_use]
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    #[must_use]
    pub fn source(mut self, source: VersionSource) -> Self {
        self.source = source;
        self
    }

    #[must_use]
    pub fn version_number(mut self, number: u32) -> Self {
        self.version_number = Some(VersionNumber(number));
        self
    }

    #[must_use]
    pub fn maybe_version_number(mut self, number: Option<VersionNumber>) -> Self {
        self.version_number = number;
        self
    }

    #[must_use]
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    #[must_use]
    pub fn build(self) -> ContentVersion {
        ContentVersion {
            id: self.id,
            content: self.content,
            timestamp: self.timestamp,
            source: self.source,
            version_number: self.version_number,
            active: self.active,
        }
    }
}
