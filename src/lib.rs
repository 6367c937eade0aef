pub mod app;
pub mod config;
pub mod error;
pub mod render;
pub mod shader;

// Re-export commonly used types
pub use app::App;
pub use config::AppConfig;
pub use error::{ConfigError, ShaderError, SourceError};
pub use render::FullscreenQuad;
pub use shader::{ShaderProgram, SourceLoader, StatusReport};
