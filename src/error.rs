use std::path::PathBuf;
use thiserror::Error;

/// Everything that can stop a sweep. None of these are recovered locally:
/// the first one raised aborts the whole run.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed array file {path}: {reason}")]
    Format { path: PathBuf, reason: String },

    #[error("Array file set in {dir} is missing reserved member {name}")]
    MissingReservedFile { dir: PathBuf, name: String },

    #[error("Config file has no {key} key")]
    ConfigKeyNotFound { key: String },

    #[error("Config value for {key} cannot contain whitespace: '{value}'")]
    ConfigValue { key: String, value: String },

    #[error("Path is not valid UTF-8: {0}")]
    NonUtf8Path(PathBuf),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("Solver did not produce {path} (electrode {electrode}, layer {layer})")]
    MissingOutput {
        path: PathBuf,
        electrode: u32,
        layer: i32,
    },

    #[error("Could not launch solver {path}: {source}")]
    Solver {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No electrode array files found in {0}")]
    NoElectrodes(PathBuf),

    #[error("Settings parsing error: {0}")]
    Settings(#[from] toml::de::Error),
}

impl SweepError {
    pub(crate) fn format(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        SweepError::Format {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
