pub(crate) mod edit;
pub(crate) mod history;

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;
use showrunner_core::{Record, Settings};

use crate::FieldArgs;

/// A record loaded for one command, remembered with where it came from.
pub(crate) struct LoadedRecord {
    pub(crate) path: PathBuf,
    pub(crate) record: Record,
    pub(crate) pretty: bool,
}

impl LoadedRecord {
    pub(crate) fn load(settings: &Settings, target: &FieldArgs) -> Result<Self> {
        let path = settings.resolve_record_path(&target.record);
        let record = Record::load(&path)
            .with_context(|| format!("failed to load record {}", path.display()))?;
        Ok(Self { path, record, pretty: settings.pretty_json && !target.compact })
    }

    pub(crate) fn save(&self) -> Result<()> {
        self.record
            .save(&self.path, self.pretty)
            .with_context(|| format!("failed to write record {}", self.path.display()))?;
        tracing::info!(path = %self.path.display(), "record saved");
        Ok(())
    }

    pub(crate) fn print<T: Serialize>(&self, value: &T) -> Result<()> {
        let out = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        println!("{out}");
        Ok(())
    }
}
