use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use showrunner_core::{Settings, VersionSource, VersionedField};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "showrunner")]
#[command(about = "Version history for podcast episode notes, guest bios and research", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Which record and field a command works on.
#[derive(Args)]
pub(crate) struct FieldArgs {
    /// Record JSON file; relative paths that don't exist resolve under SHOWRUNNER_DATA_DIR
    #[arg(short, long)]
    record: PathBuf,
    /// Versioned field: notes, bio or research
    #[arg(short, long, default_value = "notes")]
    field: VersionedField,
    /// Compact JSON output and storage
    #[arg(long)]
    compact: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the field's content and version list, latest first
    Show {
        #[command(flatten)]
        target: FieldArgs,
    },
    /// Record new content as the active version (reads stdin without --content)
    Commit {
        #[command(flatten)]
        target: FieldArgs,
        #[arg(short, long)]
        content: Option<String>,
        #[arg(short, long)]
        source: Option<VersionSource>,
    },
    /// Make an existing version active again
    Select {
        #[command(flatten)]
        target: FieldArgs,
        version_id: String,
    },
    /// Delete the field's whole history and empty its content
    Clear {
        #[command(flatten)]
        target: FieldArgs,
        #[arg(long, help = "Confirm deleting every version")]
        yes: bool,
    },
    /// Repair numbering and active flags and write the record back
    Normalize {
        #[command(flatten)]
        target: FieldArgs,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env();

    match cli.command {
        Commands::Show { target } => commands::history::run_show(&settings, &target),
        Commands::Commit { target, content, source } => {
            commands::edit::run_commit(&settings, &target, content, source)
        },
        Commands::Select { target, version_id } => {
            commands::edit::run_select(&settings, &target, &version_id)
        },
        Commands::Clear { target, yes } => commands::edit::run_clear(&settings, &target, yes),
        Commands::Normalize { target } => commands::history::run_normalize(&settings, &target),
    }
}
