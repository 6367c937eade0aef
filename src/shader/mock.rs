//! In-memory [`ShaderBackend`] for tests.

use gl::types::{GLint, GLuint};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use super::backend::{ProgramStatus, ShaderBackend, ShaderStage};
use crate::error::ShaderError;

#[derive(Debug)]
struct MockShader {
    stage: ShaderStage,
    source: Option<String>,
    compiled: bool,
}

#[derive(Debug, Default)]
struct MockProgram {
    attached: Vec<GLuint>,
    linked: bool,
    validated: bool,
}

#[derive(Debug, Default)]
pub struct MockBackend {
    next_id: Cell<GLuint>,
    compile_failures: HashMap<ShaderStage, String>,
    link_failure: Option<String>,
    validate_failure: Option<String>,
    uniforms: HashMap<String, GLint>,

    shaders: RefCell<HashMap<GLuint, MockShader>>,
    programs: RefCell<HashMap<GLuint, MockProgram>>,
    deleted_shaders: RefCell<Vec<GLuint>>,
    deleted_programs: RefCell<Vec<GLuint>>,
    info_log_queries: Cell<usize>,
    uniform_lookups: Cell<usize>,
    in_use: Cell<GLuint>,
    uniform_writes: RefCell<Vec<(GLint, f32)>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(1),
            ..Default::default()
        }
    }

    pub fn fail_compile(mut self, stage: ShaderStage, log: &str) -> Self {
        self.compile_failures.insert(stage, log.to_string());
        self
    }

    pub fn fail_link(mut self, log: &str) -> Self {
        self.link_failure = Some(log.to_string());
        self
    }

    pub fn fail_validate(mut self, log: &str) -> Self {
        self.validate_failure = Some(log.to_string());
        self
    }

    pub fn with_uniform(mut self, name: &str, location: GLint) -> Self {
        self.uniforms.insert(name.to_string(), location);
        self
    }

    fn next_id(&self) -> GLuint {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    pub fn shader_source_of(&self, shader: GLuint) -> Option<String> {
        self.shaders
            .borrow()
            .get(&shader)
            .and_then(|s| s.source.clone())
    }

    pub fn attached(&self, program: GLuint) -> Vec<GLuint> {
        self.programs
            .borrow()
            .get(&program)
            .map(|p| p.attached.clone())
            .unwrap_or_default()
    }

    pub fn deleted_shaders(&self) -> Vec<GLuint> {
        self.deleted_shaders.borrow().clone()
    }

    pub fn deleted_programs(&self) -> Vec<GLuint> {
        self.deleted_programs.borrow().clone()
    }

    pub fn info_log_queries(&self) -> usize {
        self.info_log_queries.get()
    }

    pub fn uniform_lookups(&self) -> usize {
        self.uniform_lookups.get()
    }

    pub fn in_use(&self) -> GLuint {
        self.in_use.get()
    }

    pub fn uniform_writes(&self) -> Vec<(GLint, f32)> {
        self.uniform_writes.borrow().clone()
    }
}

impl ShaderBackend for MockBackend {
    fn create_shader(&self, stage: ShaderStage) -> Result<GLuint, ShaderError> {
        let id = self.next_id();
        self.shaders.borrow_mut().insert(
            id,
            MockShader {
                stage,
                source: None,
                compiled: false,
            },
        );
        Ok(id)
    }

    fn shader_source(&self, shader: GLuint, source: &str) -> Result<(), ShaderError> {
        if let Some(s) = self.shaders.borrow_mut().get_mut(&shader) {
            s.source = Some(source.to_string());
        }
        Ok(())
    }

    fn compile_shader(&self, shader: GLuint) {
        if let Some(s) = self.shaders.borrow_mut().get_mut(&shader) {
            s.compiled = !self.compile_failures.contains_key(&s.stage);
        }
    }

    fn shader_compiled(&self, shader: GLuint) -> bool {
        self.shaders
            .borrow()
            .get(&shader)
            .map_or(false, |s| s.compiled)
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        self.info_log_queries.set(self.info_log_queries.get() + 1);
        self.shaders
            .borrow()
            .get(&shader)
            .and_then(|s| self.compile_failures.get(&s.stage).cloned())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: GLuint) {
        self.deleted_shaders.borrow_mut().push(shader);
    }

    fn create_program(&self) -> Result<GLuint, ShaderError> {
        let id = self.next_id();
        self.programs.borrow_mut().insert(id, MockProgram::default());
        Ok(id)
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        if let Some(p) = self.programs.borrow_mut().get_mut(&program) {
            p.attached.push(shader);
        }
    }

    fn detach_shader(&self, program: GLuint, shader: GLuint) {
        if let Some(p) = self.programs.borrow_mut().get_mut(&program) {
            p.attached.retain(|&s| s != shader);
        }
    }

    fn link_program(&self, program: GLuint) {
        let all_compiled = self
            .attached(program)
            .iter()
            .all(|&s| self.shader_compiled(s));
        if let Some(p) = self.programs.borrow_mut().get_mut(&program) {
            p.linked = all_compiled && self.link_failure.is_none();
        }
    }

    fn validate_program(&self, program: GLuint) {
        if let Some(p) = self.programs.borrow_mut().get_mut(&program) {
            p.validated = p.linked && self.validate_failure.is_none();
        }
    }

    fn program_status(&self, program: GLuint, status: ProgramStatus) -> bool {
        self.programs
            .borrow()
            .get(&program)
            .map_or(false, |p| match status {
                ProgramStatus::Link => p.linked,
                ProgramStatus::Validate => p.validated,
            })
    }

    fn program_info_log(&self, program: GLuint) -> String {
        self.info_log_queries.set(self.info_log_queries.get() + 1);
        let programs = self.programs.borrow();
        match programs.get(&program) {
            Some(p) if !p.linked => self.link_failure.clone().unwrap_or_default(),
            Some(_) => self.validate_failure.clone().unwrap_or_default(),
            None => String::new(),
        }
    }

    fn delete_program(&self, program: GLuint) {
        self.deleted_programs.borrow_mut().push(program);
    }

    fn use_program(&self, program: GLuint) {
        self.in_use.set(program);
    }

    fn uniform_location(&self, _program: GLuint, name: &str) -> GLint {
        self.uniform_lookups.set(self.uniform_lookups.get() + 1);
        self.uniforms.get(name).copied().unwrap_or(-1)
    }

    fn set_uniform_1f(&self, location: GLint, value: f32) {
        self.uniform_writes.borrow_mut().push((location, value));
    }
}
