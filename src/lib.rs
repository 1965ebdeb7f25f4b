#![allow(missing_docs)]

pub mod app_config;
pub mod cli;
pub mod document;
pub mod merge;
pub mod structure;

pub use merge::{extendext, merge, ArrayMode, MergeOptions};
pub use structure::Structure;

#[derive(Debug, thiserror::Error)]
pub enum ExtendextError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Invalid array mode \"{0}\" (expected default, concat, replace or extend)")]
    InvalidArrayMode(String),

    #[error("Cannot represent structure: {0}")]
    Unrepresentable(String),
}
