use super::backend::Gl;
use super::debug::{gl_check, GlError};
use super::program::ProgramBinding;
use bytemuck::{Pod, Zeroable};
use gl::types::*;
use std::mem;
use std::ptr;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
}

pub const QUAD_VERTICES: [Vertex; 4] = [
    Vertex { position: [-0.5, -0.5] },
    Vertex { position: [0.5, -0.5] },
    Vertex { position: [0.5, 0.5] },
    Vertex { position: [-0.5, 0.5] },
];

pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// Attribute slot of `Vertex::position` in the shader.
pub const POSITION_ATTRIBUTE: GLuint = 0;

/// The static quad, uploaded once. Buffers are released on drop.
pub struct QuadMesh {
    _gl: Gl,
    vao: GLuint,
    vbo: GLuint,
    ibo: GLuint,
    index_count: GLsizei,
}

impl QuadMesh {
    pub fn new(gl: Gl) -> Result<Self, GlError> {
        let mut mesh = QuadMesh {
            _gl: gl,
            vao: 0,
            vbo: 0,
            ibo: 0,
            index_count: QUAD_INDICES.len() as GLsizei,
        };

        let vertex_bytes: &[u8] = bytemuck::cast_slice(&QUAD_VERTICES);
        let index_bytes: &[u8] = bytemuck::cast_slice(&QUAD_INDICES);

        gl_check!(gl::GenVertexArrays(1, &mut mesh.vao))?;
        gl_check!(gl::BindVertexArray(mesh.vao))?;

        gl_check!(gl::GenBuffers(1, &mut mesh.vbo))?;
        gl_check!(gl::BindBuffer(gl::ARRAY_BUFFER, mesh.vbo))?;
        gl_check!(gl::BufferData(
            gl::ARRAY_BUFFER,
            vertex_bytes.len() as GLsizeiptr,
            vertex_bytes.as_ptr() as *const GLvoid,
            gl::STATIC_DRAW,
        ))?;

        gl_check!(gl::EnableVertexAttribArray(POSITION_ATTRIBUTE))?;
        gl_check!(gl::VertexAttribPointer(
            POSITION_ATTRIBUTE,
            2,
            gl::FLOAT,
            gl::FALSE,
            mem::size_of::<Vertex>() as GLsizei,
            ptr::null(),
        ))?;

        gl_check!(gl::GenBuffers(1, &mut mesh.ibo))?;
        gl_check!(gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, mesh.ibo))?;
        gl_check!(gl::BufferData(
            gl::ELEMENT_ARRAY_BUFFER,
            index_bytes.len() as GLsizeiptr,
            index_bytes.as_ptr() as *const GLvoid,
            gl::STATIC_DRAW,
        ))?;

        // The element buffer binding is vertex array state, so unbind the
        // vertex array before the element buffer.
        gl_check!(gl::BindVertexArray(0))?;
        gl_check!(gl::BindBuffer(gl::ARRAY_BUFFER, 0))?;
        gl_check!(gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, 0))?;

        log::debug!(
            "Uploaded quad: {} vertex bytes, {} index bytes",
            vertex_bytes.len(),
            index_bytes.len()
        );
        Ok(mesh)
    }

    /// Binds the vertex array until the returned guard is dropped.
    pub fn bind(&self) -> MeshBinding<'_> {
        unsafe { gl::BindVertexArray(self.vao) };
        MeshBinding { _mesh: self }
    }

    /// Draws the quad with whichever program `program` keeps bound.
    pub fn draw(&self, _program: &ProgramBinding<'_, Gl>) -> Result<(), GlError> {
        let _binding = self.bind();
        gl_check!(gl::DrawElements(
            gl::TRIANGLES,
            self.index_count,
            gl::UNSIGNED_INT,
            ptr::null(),
        ))
    }
}

impl Drop for QuadMesh {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteBuffers(1, &self.ibo);
            gl::DeleteBuffers(1, &self.vbo);
            gl::DeleteVertexArrays(1, &self.vao);
        }
    }
}

pub struct MeshBinding<'a> {
    _mesh: &'a QuadMesh,
}

impl Drop for MeshBinding<'_> {
    fn drop(&mut self) {
        unsafe { gl::BindVertexArray(0) };
    }
}
