pub mod rendering;
pub mod shaders;

pub use rendering::{GlConfig, WindowConfig};
pub use shaders::ShaderConfig;

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::error::ConfigError;

pub const CONFIG_FILE: &str = "ray-casting.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: String,
    pub window: WindowConfig,
    pub gl: GlConfig,
    pub shaders: ShaderConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            window: WindowConfig::default(),
            gl: GlConfig::default(),
            shaders: ShaderConfig::default(),
        }
    }
}

impl AppConfig {
    /// Reads the config at `path`, falling back to defaults when the file
    /// does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.log_level()?;

        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }

        if self.gl.version() < GlConfig::MIN {
            return Err(ConfigError::Invalid(format!(
                "OpenGL {}.{} is below the supported minimum {}.{}",
                self.gl.major,
                self.gl.minor,
                GlConfig::MIN.0,
                GlConfig::MIN.1
            )));
        }

        if self.shaders.max_line_length == Some(0) {
            return Err(ConfigError::Invalid(
                "shaders.max_line_length must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn log_level(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| ConfigError::Invalid(format!("unknown log level '{}'", self.log_level)))
    }
}
