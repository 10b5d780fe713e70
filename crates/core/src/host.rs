//! Narrow host interface for binding a version manager to named fields.
//!
//! A host only needs to read and write named JSON values; it does not have to
//! look like any particular form library.

use serde_json::Value;

use crate::manager::VersionSink;
use crate::{to_persisted_value, ContentVersion};

/// Named-field storage the version engine can write into.
pub trait FieldHost {
    /// Current value of `name`, if set.
    fn get_field(&self, name: &str) -> Option<Value>;

    /// Replaces the value of `name`.
    fn set_field(&mut self, name: &str, value: Value);
}

impl FieldHost for serde_json::Map<String, Value> {
    fn get_field(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }

    fn set_field(&mut self, name: &str, value: Value) {
        self.insert(name.to_owned(), value);
    }
}

/// Sink that writes content and history into two fields of a [`FieldHost`].
#[derive(Debug)]
pub struct FieldBinding<'h, H: ?Sized> {
    host: &'h mut H,
    content_field: String,
    versions_field: String,
}

impl<'h, H: FieldHost + ?Sized> FieldBinding<'h, H> {
    pub fn new(host: &'h mut H, content_field: impl Into<String>, versions_field: impl Into<String>) -> Self {
        Self { host, content_field: content_field.into(), versions_field: versions_field.into() }
    }

    /// The content field's value as text; non-strings read as empty.
    #[must_use]
    pub fn read_content(&self) -> String {
        self.host.get_field(&self.content_field).and_then(|v| v.as_str().map(str::to_owned)).unwrap_or_default()
    }

    /// Raw persisted history, in whatever shape the host stored it.
    #[must_use]
    pub fn read_versions(&self) -> Option<Value> {
        self.host.get_field(&self.versions_field)
    }
}

impl<H: FieldHost + ?Sized> VersionSink for FieldBinding<'_, H> {
    fn content_changed(&mut self, content: &str) {
        self.host.set_field(&self.content_field, Value::String(content.to_owned()));
    }

    fn versions_changed(&mut self, versions: &[ContentVersion]) {
        self.host.set_field(&self.versions_field, to_persisted_value(versions));
    }
}
