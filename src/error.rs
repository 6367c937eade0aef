use std::ffi::NulError;
use std::path::PathBuf;
use thiserror::Error;

use crate::shader::backend::ShaderStage;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to open shader source {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("{stage} shader compilation failed: {log}")]
    Compilation { stage: ShaderStage, log: String },
    #[error("Program linking failed: {0}")]
    Linking(String),
    #[error("Program validation failed: {0}")]
    Validation(String),
    #[error("Null byte error: {0}")]
    Nul(#[from] NulError),
    #[error("Failed to create {0}")]
    CreateFailed(&'static str),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}
