use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "ray-casting".to_string(),
            width: 1920,
            height: 1080,
            vsync: true,
        }
    }
}

/// Requested OpenGL core profile version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlConfig {
    pub major: u8,
    pub minor: u8,
}

impl GlConfig {
    pub const MIN: (u8, u8) = (3, 3);

    pub fn version(&self) -> (u8, u8) {
        (self.major, self.minor)
    }
}

impl Default for GlConfig {
    fn default() -> Self {
        Self { major: 4, minor: 5 }
    }
}
