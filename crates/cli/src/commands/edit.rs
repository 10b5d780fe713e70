use std::io::{IsTerminal, Read};

use anyhow::{bail, Result};
use showrunner_core::{Settings, VersionSource};

use super::LoadedRecord;
use crate::FieldArgs;

fn content_from_stdin() -> Result<Option<String>> {
    if std::io::stdin().is_terminal() {
        return Ok(None);
    }
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    Ok(Some(input))
}

pub(crate) fn run_commit(
    settings: &Settings,
    target: &FieldArgs,
    content: Option<String>,
    source: Option<VersionSource>,
) -> Result<()> {
    let content = match content {
        Some(c) => c,
        None => match content_from_stdin()? {
            Some(piped) if !piped.trim().is_empty() => piped,
            Some(_) => bail!("No content on stdin: pipe some text or use --content"),
            None => bail!("Content required: use --content or pipe it on stdin"),
        },
    };
    let source = source.unwrap_or(settings.default_source);

    let mut loaded = LoadedRecord::load(settings, target)?;
    let mut manager = loaded.record.open_field(target.field);
    let version = manager.commit_with_source(content, source);
    drop(manager);

    loaded.save()?;
    loaded.print(&version)
}

pub(crate) fn run_select(settings: &Settings, target: &FieldArgs, version_id: &str) -> Result<()> {
    let mut loaded = LoadedRecord::load(settings, target)?;
    let mut manager = loaded.record.open_field(target.field);
    if !manager.select_version(version_id) {
        bail!("Version not found in {}: {version_id}", target.field);
    }
    let active = manager.active_version().cloned();
    drop(manager);

    loaded.save()?;
    loaded.print(&active)
}

pub(crate) fn run_clear(settings: &Settings, target: &FieldArgs, confirmed: bool) -> Result<()> {
    if !confirmed {
        bail!("Refusing to clear {} history without --yes", target.field);
    }
    let mut loaded = LoadedRecord::load(settings, target)?;
    let mut manager = loaded.record.open_field(target.field);
    let cleared = manager.versions().len();
    manager.clear_all_versions();
    drop(manager);

    loaded.save()?;
    loaded.print(&serde_json::json!({ "field": target.field, "cleared": cleared }))
}
