//! Core of showrunner's content versioning.
//!
//! Tracks edits of long-form text fields (episode notes, guest bios, background
//! research) as an ordered history with exactly one active version, and keeps a
//! host's field values in sync with it.

pub mod config;
pub mod constants;
pub mod env_config;
mod error;
mod host;
pub mod json_utils;
mod manager;
mod record;
mod selector;
mod version;

pub use config::Settings;
pub use error::*;
pub use host::*;
pub use manager::*;
pub use record::*;
pub use selector::*;
pub use version::*;
