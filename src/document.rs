#![allow(clippy::self_named_module_files)]

//! Loading and storing structures as JSON or TOML documents.

use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod reader;
pub mod writer;

/// On-disk representation of a structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Json,
    Toml,
}

impl Format {
    /// Pick the format from a file extension; anything but `.toml` is JSON.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}
