//! Compile, link and validate status of shader objects.

use gl::types::GLuint;
use std::io::{self, Write};

use super::backend::{ProgramStatus, ShaderBackend, ShaderStage};
use crate::error::ShaderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Compile(ShaderStage),
    Link,
    Validate,
}

impl From<ProgramStatus> for StatusKind {
    fn from(status: ProgramStatus) -> Self {
        match status {
            ProgramStatus::Link => StatusKind::Link,
            ProgramStatus::Validate => StatusKind::Validate,
        }
    }
}

/// Outcome of one status query. `log` holds the backend's diagnostic and is
/// only present when the query failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub handle: GLuint,
    pub kind: StatusKind,
    pub log: Option<String>,
}

impl StatusReport {
    pub fn passed(&self) -> bool {
        self.log.is_none()
    }

    pub fn message(&self) -> Option<&str> {
        self.log.as_deref()
    }

    /// Writes the diagnostic and a line break if the query failed. Nothing is
    /// written for a passing report.
    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        if let Some(log) = &self.log {
            writeln!(out, "{}", log)?;
        }
        Ok(())
    }

    pub fn into_result(self) -> Result<(), ShaderError> {
        let Some(log) = self.log else {
            return Ok(());
        };
        Err(match self.kind {
            StatusKind::Compile(stage) => ShaderError::Compilation { stage, log },
            StatusKind::Link => ShaderError::Linking(log),
            StatusKind::Validate => ShaderError::Validation(log),
        })
    }
}

pub fn report_shader<B>(backend: &B, shader: GLuint, stage: ShaderStage) -> StatusReport
where
    B: ShaderBackend + ?Sized,
{
    let log = (!backend.shader_compiled(shader)).then(|| backend.shader_info_log(shader));
    StatusReport {
        handle: shader,
        kind: StatusKind::Compile(stage),
        log,
    }
}

pub fn report_program<B>(backend: &B, program: GLuint, status: ProgramStatus) -> StatusReport
where
    B: ShaderBackend + ?Sized,
{
    let log = (!backend.program_status(program, status)).then(|| backend.program_info_log(program));
    StatusReport {
        handle: program,
        kind: status.into(),
        log,
    }
}
