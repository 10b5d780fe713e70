//! Guest and episode records with versioned long-form fields.
//!
//! A record is the JSON object the hosted database returns for a guest or an
//! episode. Each versioned field stores its current text under one key and its
//! history under a sibling `*_versions` key.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::host::{FieldBinding, FieldHost};
use crate::{Result, VersionError, VersionManager};

/// Long-form fields that carry version history.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum VersionedField {
    /// Show notes of an episode
    EpisodeNotes,
    /// Guest biography
    GuestBio,
    /// Background research on a guest
    BackgroundResearch,
}

impl VersionedField {
    /// Key holding the field's current content.
    pub fn content_key(&self) -> &'static str {
        match self {
            Self::EpisodeNotes => "notes",
            Self::GuestBio => "bio",
            Self::BackgroundResearch => "background_research",
        }
    }

    /// Key holding the field's version history.
    pub fn versions_key(&self) -> &'static str {
        match self {
            Self::EpisodeNotes => "notes_versions",
            Self::GuestBio => "bio_versions",
            Self::BackgroundResearch => "background_research_versions",
        }
    }
}

impl fmt::Display for VersionedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.content_key())
    }
}

impl FromStr for VersionedField {
    type Err = VersionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "notes" | "episode_notes" | "show_notes" => Ok(Self::EpisodeNotes),
            "bio" | "guest_bio" => Ok(Self::GuestBio),
            "research" | "background_research" => Ok(Self::BackgroundResearch),
            other => Err(VersionError::UnknownField(other.to_owned())),
        }
    }
}

/// A guest or episode record as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Wraps a JSON value; anything but an object is rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            _ => Err(VersionError::InvalidInput("record must be a JSON object".to_owned())),
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(raw)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn save(&self, path: &Path, pretty: bool) -> Result<()> {
        let encoded = if pretty {
            serde_json::to_string_pretty(&self.fields)?
        } else {
            serde_json::to_string(&self.fields)?
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, encoded)?;
        Ok(())
    }

    /// Binds an initialized manager to `field`, seeding it from the stored
    /// content and history. Normalized state is written back immediately.
    pub fn open_field(&mut self, field: VersionedField) -> VersionManager<FieldBinding<'_, Self>> {
        let binding = FieldBinding::new(self, field.content_key(), field.versions_key());
        let content = binding.read_content();
        let raw_versions = binding.read_versions();
        let mut manager = VersionManager::new(binding);
        manager.initialize_from_value(&content, raw_versions.as_ref());
        manager
    }
}

impl FieldHost for Record {
    fn get_field(&self, name: &str) -> Option<Value> {
        self.fields.get_field(name)
    }

    fn set_field(&mut self, name: &str, value: Value) {
        self.fields.set_field(name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VersionSource;
    use serde_json::json;

    #[test]
    fn field_names_parse_loosely() {
        assert_eq!("notes".parse::<VersionedField>().ok(), Some(VersionedField::EpisodeNotes));
        assert_eq!("Guest-Bio".parse::<VersionedField>().ok(), Some(VersionedField::GuestBio));
        assert_eq!("research".parse::<VersionedField>().ok(), Some(VersionedField::BackgroundResearch));
        assert!("title".parse::<VersionedField>().is_err());
    }

    #[test]
    fn rejects_non_object_records() {
        assert!(Record::from_value(json!([1, 2])).is_err());
        assert!(Record::from_json_str("{\"id\": 1}").is_ok());
    }

    #[test]
    fn open_field_seeds_legacy_record() {
        let mut record = Record::from_value(json!({
            "id": 7,
            "title": "Episode 7",
            "notes": "<p>Original notes</p>"
        }))
        .expect("object");

        let manager = record.open_field(VersionedField::EpisodeNotes);
        assert_eq!(manager.versions().len(), 1);
        assert_eq!(manager.versions()[0].source, VersionSource::Import);
        drop(manager);

        let stored = record.get_field("notes_versions").expect("history written");
        assert_eq!(stored.as_array().map(Vec::len), Some(1));
        assert_eq!(record.get_field("title"), Some(json!("Episode 7")));
    }

    #[test]
    fn open_field_adopts_active_history() {
        let mut record = Record::from_value(json!({
            "bio": "out of date",
            "bio_versions": "[{\"id\":\"v1\",\"content\":\"Current bio\",\"versionNumber\":1,\"active\":true}]"
        }))
        .expect("object");

        let manager = record.open_field(VersionedField::GuestBio);
        assert_eq!(manager.content(), "Current bio");
        drop(manager);

        assert_eq!(record.get_field("bio"), Some(json!("Current bio")));
        assert!(record.get_field("bio_versions").is_some_and(|v| v.is_array()));
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("guests").join("guest.json");
        let record = Record::from_value(json!({"name": "Ada", "bio": "Engineer"})).expect("object");

        record.save(&path, true).expect("save");
        let loaded = Record::load(&path).expect("load");
        assert_eq!(loaded, record);
    }
}
