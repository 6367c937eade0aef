use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::shader::{BuildOptions, LineLimit};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderConfig {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
    /// Per-line read limit of the source loader. `None` reads lines whole.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_line_length: Option<usize>,
    pub strict_validation: bool,
}

impl ShaderConfig {
    pub fn line_limit(&self) -> LineLimit {
        match self.max_line_length {
            Some(max) => LineLimit::Legacy(max),
            None => LineLimit::Unbounded,
        }
    }

    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            strict_validation: self.strict_validation,
        }
    }
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self {
            vertex: PathBuf::from("assets/shaders/scene.vert.glsl"),
            fragment: PathBuf::from("assets/shaders/scene.frag.glsl"),
            max_line_length: None,
            strict_validation: false,
        }
    }
}
