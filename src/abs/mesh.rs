//! Mesh management module.
//!
//! This module defines the [`Mesh`] struct for managing mesh data on the GPU side. A mesh keeps
//! positions, normals and uvs in three separate buffers bound to the attribute locations in
//! [`VertexAttribs`].

use std::sync::Arc;

use glow::HasContext;
use sceneview_core::MeshData;

use crate::abs::ShaderProgram;

/// Attribute locations of the scene shader.
#[derive(Debug, Clone, Copy)]
pub struct VertexAttribs {
    pub position: u32,
    pub normal: u32,
    pub uv: u32,
}

impl VertexAttribs {
    /// Resolves `position`, `normal` and `uv` in the given program.
    pub fn resolve(program: &ShaderProgram) -> Result<Self, String> {
        Ok(Self {
            position: program.attrib_location("position")?,
            normal: program.attrib_location("normal")?,
            uv: program.attrib_location("uv")?,
        })
    }
}

/// Represents a mesh stored on the GPU side.
pub struct Mesh {
    gl: Arc<glow::Context>,
    vao: glow::VertexArray,
    buffers: [glow::Buffer; 3],
    vertex_count: usize,
}

impl Mesh {
    /// Uploads the mesh data once. The buffers are never reallocated.
    pub fn new(gl: &Arc<glow::Context>, data: &MeshData, attribs: VertexAttribs) -> Result<Self, String> {
        unsafe {
            let vao = gl.create_vertex_array()?;
            gl.bind_vertex_array(Some(vao));

            let position = upload_attribute(gl, &data.positions, attribs.position, 3)?;
            let normal = upload_attribute(gl, &data.normals, attribs.normal, 3)?;
            let uv = upload_attribute(gl, &data.uvs, attribs.uv, 2)?;

            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);

            Ok(Self {
                gl: Arc::clone(gl),
                vao,
                buffers: [position, normal, uv],
                vertex_count: data.len(),
            })
        }
    }

    /// Draws the mesh.
    pub fn draw(&self) {
        unsafe {
            self.gl.bind_vertex_array(Some(self.vao));
            self.gl.draw_arrays(glow::TRIANGLES, 0, self.vertex_count as i32);
            self.gl.bind_vertex_array(None);
        }
    }

    /// Returns the amount of vertices drawn by [`Mesh::draw`].
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }
}

/// Creates a buffer for one attribute array and points `location` at it.
/// The target vertex array must be bound.
unsafe fn upload_attribute<T>(
    gl: &glow::Context,
    values: &[T],
    location: u32,
    components: i32,
) -> Result<glow::Buffer, String> {
    unsafe {
        let buffer = gl.create_buffer()?;
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
        gl.buffer_data_u8_slice(
            glow::ARRAY_BUFFER,
            std::slice::from_raw_parts(
                values.as_ptr() as *const u8,
                std::mem::size_of_val(values),
            ),
            glow::STATIC_DRAW,
        );
        gl.vertex_attrib_pointer_f32(location, components, glow::FLOAT, false, 0, 0);
        gl.enable_vertex_attrib_array(location);
        Ok(buffer)
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        unsafe {
            for buffer in self.buffers {
                self.gl.delete_buffer(buffer);
            }
            self.gl.delete_vertex_array(self.vao);
        }
    }
}
