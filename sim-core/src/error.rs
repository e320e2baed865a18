//! Error types for cloth-core.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating a [`crate::config::Config`].
///
/// Stepping a simulation never fails; these only surface when a
/// simulation is built.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings document is not valid TOML for [`crate::config::Settings`].
    #[error("failed to parse {}: {source}", display_origin(.path))]
    Parse {
        path: Option<PathBuf>,
        #[source]
        source: toml::de::Error,
    },

    /// A field holds a value the simulation cannot run with.
    #[error("invalid `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

fn display_origin(path: &Option<PathBuf>) -> String {
    match path {
        Some(p) => p.display().to_string(),
        None => "settings".to_string(),
    }
}
