use gl::types::*;
use log::{info, warn};
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::Path;

use super::backend::{GlBackend, ProgramStatus, ShaderBackend, ShaderStage};
use super::source::SourceLoader;
use super::status::{report_program, report_shader, StatusReport};
use crate::error::ShaderError;

#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Treat a failed validation as fatal instead of a warning.
    pub strict_validation: bool,
}

/// Linked vertex/fragment program. Deleted when dropped.
pub struct ShaderProgram<B: ShaderBackend = GlBackend> {
    backend: B,
    id: GLuint,
    uniforms: HashMap<String, GLint>,
}

impl<B: ShaderBackend> ShaderProgram<B> {
    /// Loads both stages from disk and builds the program. Failed status
    /// queries are printed to stdout.
    pub fn build(
        backend: B,
        loader: &SourceLoader,
        vertex_path: &Path,
        fragment_path: &Path,
        options: BuildOptions,
    ) -> Result<Self, ShaderError> {
        let vertex_source = loader.load(vertex_path)?;
        let fragment_source = loader.load(fragment_path)?;

        let stdout = io::stdout();
        let mut out = stdout.lock();
        Self::from_sources(backend, &vertex_source, &fragment_source, options, &mut out)
    }

    /// Compiles, links and validates the two sources, writing the diagnostic
    /// of every failed status query to `out`.
    pub fn from_sources(
        backend: B,
        vertex_source: &str,
        fragment_source: &str,
        options: BuildOptions,
        out: &mut dyn Write,
    ) -> Result<Self, ShaderError> {
        let shaders = compile_stages(
            &backend,
            [
                (ShaderStage::Vertex, vertex_source),
                (ShaderStage::Fragment, fragment_source),
            ],
            out,
        )?;

        let program = match backend.create_program() {
            Ok(program) => program,
            Err(e) => {
                delete_shaders(&backend, &shaders);
                return Err(e);
            }
        };

        for &shader in &shaders {
            backend.attach_shader(program, shader);
        }
        backend.link_program(program);
        backend.validate_program(program);

        let link = report_program(&backend, program, ProgramStatus::Link);
        let validate = report_program(&backend, program, ProgramStatus::Validate);
        emit(&link, out);
        emit(&validate, out);

        for &shader in &shaders {
            backend.detach_shader(program, shader);
        }
        delete_shaders(&backend, &shaders);

        if let Err(e) = link.into_result() {
            backend.delete_program(program);
            return Err(e);
        }

        let validated = validate.handle;
        if let Err(e) = validate.into_result() {
            if options.strict_validation {
                backend.delete_program(program);
                return Err(e);
            }
            warn!("Program {}: {}", validated, e);
        }

        info!("Linked shader program {}", program);
        Ok(ShaderProgram {
            backend,
            id: program,
            uniforms: HashMap::new(),
        })
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn set_used(&self) {
        self.backend.use_program(self.id);
    }

    pub fn get_uniform_location(&mut self, name: &str) -> GLint {
        if let Some(location) = self.uniforms.get(name) {
            return *location;
        }

        let location = self.backend.uniform_location(self.id, name);
        if location == -1 {
            warn!("Uniform '{}' not found in shader", name);
        }

        self.uniforms.insert(name.to_string(), location);
        location
    }

    pub fn set_uniform_1f(&mut self, name: &str, value: f32) {
        self.set_used();
        let location = self.get_uniform_location(name);
        self.backend.set_uniform_1f(location, value);
    }
}

impl<B: ShaderBackend> Drop for ShaderProgram<B> {
    fn drop(&mut self) {
        self.backend.delete_program(self.id);
    }
}

/// Creates and compiles one shader per stage, then reports every stage
/// before failing on the first one that did not compile.
fn compile_stages<B: ShaderBackend, const N: usize>(
    backend: &B,
    stages: [(ShaderStage, &str); N],
    out: &mut dyn Write,
) -> Result<[GLuint; N], ShaderError> {
    let mut shaders = [0; N];

    for (i, (stage, source)) in stages.iter().enumerate() {
        let created = backend.create_shader(*stage).and_then(|shader| {
            shaders[i] = shader;
            backend.shader_source(shader, source)
        });
        if let Err(e) = created {
            delete_shaders(backend, &shaders[..=i]);
            return Err(e);
        }
        backend.compile_shader(shaders[i]);
    }

    let reports: Vec<StatusReport> = stages
        .iter()
        .zip(shaders)
        .map(|((stage, _), shader)| report_shader(backend, shader, *stage))
        .collect();

    for report in &reports {
        emit(report, out);
    }

    for report in reports {
        if let Err(e) = report.into_result() {
            delete_shaders(backend, &shaders);
            return Err(e);
        }
    }

    Ok(shaders)
}

fn delete_shaders<B: ShaderBackend>(backend: &B, shaders: &[GLuint]) {
    for &shader in shaders.iter().filter(|&&s| s != 0) {
        backend.delete_shader(shader);
    }
}

fn emit(report: &StatusReport, out: &mut dyn Write) {
    if let Err(e) = report.write_to(out) {
        warn!("Failed to write shader diagnostics: {}", e);
    }
}
