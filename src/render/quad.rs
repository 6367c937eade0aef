use gl::types::*;
use std::mem;
use std::ptr;

/// Corners of clip space, two floats each.
pub const QUAD_VERTICES: [f32; 8] = [
    -1.0, -1.0, //
    -1.0, 1.0, //
    1.0, -1.0, //
    1.0, 1.0,
];

pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 1, 3];

/// Two triangles covering the viewport. Attribute 0 is the vec2 position.
pub struct FullscreenQuad {
    vao: GLuint,
    vbo: GLuint,
    ibo: GLuint,
}

impl FullscreenQuad {
    /// Uploads the quad. Needs a current context with loaded function pointers.
    pub fn new() -> Self {
        let mut vao = 0;
        let mut vbo = 0;
        let mut ibo = 0;

        unsafe {
            gl::GenVertexArrays(1, &mut vao);
            gl::BindVertexArray(vao);

            gl::GenBuffers(1, &mut vbo);
            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);
            gl::BufferData(
                gl::ARRAY_BUFFER,
                mem::size_of_val(&QUAD_VERTICES) as GLsizeiptr,
                QUAD_VERTICES.as_ptr() as *const _,
                gl::STATIC_DRAW,
            );

            gl::GenBuffers(1, &mut ibo);
            gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, ibo);
            gl::BufferData(
                gl::ELEMENT_ARRAY_BUFFER,
                mem::size_of_val(&QUAD_INDICES) as GLsizeiptr,
                QUAD_INDICES.as_ptr() as *const _,
                gl::STATIC_DRAW,
            );

            gl::VertexAttribPointer(
                0,
                2,
                gl::FLOAT,
                gl::FALSE,
                2 * mem::size_of::<f32>() as GLsizei,
                ptr::null(),
            );
            gl::EnableVertexAttribArray(0);
        }

        Self { vao, vbo, ibo }
    }

    pub fn draw(&self) {
        unsafe {
            gl::BindVertexArray(self.vao);
            gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, self.ibo);
            gl::DrawElements(
                gl::TRIANGLES,
                QUAD_INDICES.len() as GLsizei,
                gl::UNSIGNED_INT,
                ptr::null(),
            );
        }
    }
}

impl Drop for FullscreenQuad {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteVertexArrays(1, &self.vao);
            gl::DeleteBuffers(1, &self.vbo);
            gl::DeleteBuffers(1, &self.ibo);
        }
    }
}
