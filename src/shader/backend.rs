use gl::types::*;
use std::ffi::{c_void, CString};
use std::fmt;
use std::ptr;

use crate::error::ShaderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn gl_enum(self) -> GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("Vertex"),
            ShaderStage::Fragment => f.write_str("Fragment"),
        }
    }
}

/// Status flag that can be queried on a program handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramStatus {
    Link,
    Validate,
}

impl ProgramStatus {
    pub fn gl_enum(self) -> GLenum {
        match self {
            ProgramStatus::Link => gl::LINK_STATUS,
            ProgramStatus::Validate => gl::VALIDATE_STATUS,
        }
    }
}

/// The calls the shader code makes into the graphics API.
///
/// Handles are the raw `GLuint` names the API hands out. Implementations
/// other than [`GlBackend`] exist only for tests.
pub trait ShaderBackend {
    fn create_shader(&self, stage: ShaderStage) -> Result<GLuint, ShaderError>;
    fn shader_source(&self, shader: GLuint, source: &str) -> Result<(), ShaderError>;
    fn compile_shader(&self, shader: GLuint);
    fn shader_compiled(&self, shader: GLuint) -> bool;
    fn shader_info_log(&self, shader: GLuint) -> String;
    fn delete_shader(&self, shader: GLuint);

    fn create_program(&self) -> Result<GLuint, ShaderError>;
    fn attach_shader(&self, program: GLuint, shader: GLuint);
    fn detach_shader(&self, program: GLuint, shader: GLuint);
    fn link_program(&self, program: GLuint);
    fn validate_program(&self, program: GLuint);
    fn program_status(&self, program: GLuint, status: ProgramStatus) -> bool;
    fn program_info_log(&self, program: GLuint) -> String;
    fn delete_program(&self, program: GLuint);

    fn use_program(&self, program: GLuint);
    /// Returns `-1` when the program has no active uniform with that name.
    fn uniform_location(&self, program: GLuint, name: &str) -> GLint;
    fn set_uniform_1f(&self, location: GLint, value: f32);
}

impl<B: ShaderBackend + ?Sized> ShaderBackend for &B {
    fn create_shader(&self, stage: ShaderStage) -> Result<GLuint, ShaderError> {
        (**self).create_shader(stage)
    }
    fn shader_source(&self, shader: GLuint, source: &str) -> Result<(), ShaderError> {
        (**self).shader_source(shader, source)
    }
    fn compile_shader(&self, shader: GLuint) {
        (**self).compile_shader(shader)
    }
    fn shader_compiled(&self, shader: GLuint) -> bool {
        (**self).shader_compiled(shader)
    }
    fn shader_info_log(&self, shader: GLuint) -> String {
        (**self).shader_info_log(shader)
    }
    fn delete_shader(&self, shader: GLuint) {
        (**self).delete_shader(shader)
    }
    fn create_program(&self) -> Result<GLuint, ShaderError> {
        (**self).create_program()
    }
    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        (**self).attach_shader(program, shader)
    }
    fn detach_shader(&self, program: GLuint, shader: GLuint) {
        (**self).detach_shader(program, shader)
    }
    fn link_program(&self, program: GLuint) {
        (**self).link_program(program)
    }
    fn validate_program(&self, program: GLuint) {
        (**self).validate_program(program)
    }
    fn program_status(&self, program: GLuint, status: ProgramStatus) -> bool {
        (**self).program_status(program, status)
    }
    fn program_info_log(&self, program: GLuint) -> String {
        (**self).program_info_log(program)
    }
    fn delete_program(&self, program: GLuint) {
        (**self).delete_program(program)
    }
    fn use_program(&self, program: GLuint) {
        (**self).use_program(program)
    }
    fn uniform_location(&self, program: GLuint, name: &str) -> GLint {
        (**self).uniform_location(program, name)
    }
    fn set_uniform_1f(&self, location: GLint, value: f32) {
        (**self).set_uniform_1f(location, value)
    }
}

/// [`ShaderBackend`] over the global `gl` function pointers.
///
/// Only obtainable through [`GlBackend::load_with`], so the function pointers
/// are loaded before any call goes through it. The context the pointers were
/// loaded from must be current on the calling thread.
#[derive(Debug, Clone, Copy)]
pub struct GlBackend {
    _loaded: (),
}

impl GlBackend {
    pub fn load_with<F>(loader: F) -> Self
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        gl::load_with(loader);
        Self { _loaded: () }
    }
}

/// Reads an info log of `len` bytes (terminator included) through `fetch`.
fn read_info_log(len: GLint, fetch: impl FnOnce(GLsizei, *mut GLsizei, *mut GLchar)) -> String {
    if len <= 0 {
        return String::new();
    }

    let mut buffer = vec![0u8; len as usize];
    let mut written: GLsizei = 0;
    fetch(len, &mut written, buffer.as_mut_ptr() as *mut GLchar);
    buffer.truncate(written.clamp(0, len) as usize);

    String::from_utf8_lossy(&buffer)
        .trim_end_matches(['\0', '\n', '\r', ' '])
        .to_owned()
}

impl ShaderBackend for GlBackend {
    fn create_shader(&self, stage: ShaderStage) -> Result<GLuint, ShaderError> {
        let shader = unsafe { gl::CreateShader(stage.gl_enum()) };
        if shader == 0 {
            return Err(ShaderError::CreateFailed("shader object"));
        }
        Ok(shader)
    }

    fn shader_source(&self, shader: GLuint, source: &str) -> Result<(), ShaderError> {
        let source = CString::new(source.as_bytes())?;
        unsafe {
            gl::ShaderSource(shader, 1, &source.as_ptr(), ptr::null());
        }
        Ok(())
    }

    fn compile_shader(&self, shader: GLuint) {
        unsafe {
            gl::CompileShader(shader);
        }
    }

    fn shader_compiled(&self, shader: GLuint) -> bool {
        let mut success = 0;
        unsafe {
            gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success);
        }
        success != 0
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        let mut len = 0;
        unsafe {
            gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len);
        }
        read_info_log(len, |len, written, buffer| unsafe {
            gl::GetShaderInfoLog(shader, len, written, buffer);
        })
    }

    fn delete_shader(&self, shader: GLuint) {
        unsafe {
            gl::DeleteShader(shader);
        }
    }

    fn create_program(&self) -> Result<GLuint, ShaderError> {
        let program = unsafe { gl::CreateProgram() };
        if program == 0 {
            return Err(ShaderError::CreateFailed("program object"));
        }
        Ok(program)
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe {
            gl::AttachShader(program, shader);
        }
    }

    fn detach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe {
            gl::DetachShader(program, shader);
        }
    }

    fn link_program(&self, program: GLuint) {
        unsafe {
            gl::LinkProgram(program);
        }
    }

    fn validate_program(&self, program: GLuint) {
        unsafe {
            gl::ValidateProgram(program);
        }
    }

    fn program_status(&self, program: GLuint, status: ProgramStatus) -> bool {
        let mut success = 0;
        unsafe {
            gl::GetProgramiv(program, status.gl_enum(), &mut success);
        }
        success != 0
    }

    fn program_info_log(&self, program: GLuint) -> String {
        let mut len = 0;
        unsafe {
            gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);
        }
        read_info_log(len, |len, written, buffer| unsafe {
            gl::GetProgramInfoLog(program, len, written, buffer);
        })
    }

    fn delete_program(&self, program: GLuint) {
        unsafe {
            gl::DeleteProgram(program);
        }
    }

    fn use_program(&self, program: GLuint) {
        unsafe {
            gl::UseProgram(program);
        }
    }

    fn uniform_location(&self, program: GLuint, name: &str) -> GLint {
        match CString::new(name) {
            Ok(cname) => unsafe { gl::GetUniformLocation(program, cname.as_ptr()) },
            Err(_) => -1,
        }
    }

    fn set_uniform_1f(&self, location: GLint, value: f32) {
        unsafe {
            gl::Uniform1f(location, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_log_is_trimmed_to_written_length() {
        let log = read_info_log(32, |len, written, buffer| {
            let message = b"0:1(1): error: syntax error\n\0";
            assert!(message.len() <= len as usize);
            unsafe {
                ptr::copy_nonoverlapping(message.as_ptr() as *const GLchar, buffer, message.len());
                *written = message.len() as GLsizei - 1;
            }
        });
        assert_eq!(log, "0:1(1): error: syntax error");
    }

    #[test]
    fn test_empty_info_log_skips_fetch() {
        let log = read_info_log(0, |_, _, _| panic!("fetch must not run for an empty log"));
        assert!(log.is_empty());
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(ShaderStage::Vertex.to_string(), "Vertex");
        assert_eq!(ShaderStage::Fragment.gl_enum(), gl::FRAGMENT_SHADER);
        assert_eq!(ProgramStatus::Validate.gl_enum(), gl::VALIDATE_STATUS);
    }
}
