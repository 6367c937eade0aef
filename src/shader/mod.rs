pub mod backend;
pub mod program;
pub mod source;
pub mod status;

#[cfg(test)]
pub(crate) mod mock;

pub use backend::{GlBackend, ProgramStatus, ShaderBackend, ShaderStage};
pub use program::{BuildOptions, ShaderProgram};
pub use source::{LineLimit, SourceLoader, LEGACY_LINE_LIMIT};
pub use status::{report_program, report_shader, StatusKind, StatusReport};
