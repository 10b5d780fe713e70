use anyhow::Result;
use serde_json::json;
use showrunner_core::{SelectorCache, Settings};

use super::LoadedRecord;
use crate::FieldArgs;

pub(crate) fn run_show(settings: &Settings, target: &FieldArgs) -> Result<()> {
    let mut loaded = LoadedRecord::load(settings, target)?;
    let manager = loaded.record.open_field(target.field);
    let selection = SelectorCache::new().selection(&manager).clone();
    let body = json!({
        "field": target.field,
        "content": manager.content(),
        "selection": selection,
    });
    drop(manager);
    loaded.print(&body)
}

pub(crate) fn run_normalize(settings: &Settings, target: &FieldArgs) -> Result<()> {
    let mut loaded = LoadedRecord::load(settings, target)?;
    let manager = loaded.record.open_field(target.field);
    let body = json!({
        "field": target.field,
        "versions": manager.versions().len(),
        "activeVersionId": manager.active_version_id(),
    });
    drop(manager);
    loaded.save()?;
    loaded.print(&body)
}
