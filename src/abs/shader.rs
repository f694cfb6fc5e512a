//! OpenGL Shaders
//!
//! This module defines the [`Shader`] and [`ShaderProgram`] structs for managing OpenGL shaders.
//! Uniform and attribute names are resolved once, up front, and a missing name is an error
//! instead of a silently ignored upload. The [`Uniform`] trait uploads values to resolved
//! locations.

use std::{path::Path, sync::Arc};

use glam::{Mat4, Vec3};
use glow::HasContext;

/// Represents an individual OpenGL shader.
pub struct Shader {
    gl: Arc<glow::Context>,
    id: glow::Shader,
}

impl Shader {
    /// Compiles a new shader from the given source code.
    pub fn new(gl: &Arc<glow::Context>, shader_type: u32, source: &str) -> Result<Self, String> {
        unsafe {
            let shader = gl.create_shader(shader_type).map_err(|e| e.to_string())?;
            gl.shader_source(shader, source);
            gl.compile_shader(shader);

            if !gl.get_shader_compile_status(shader) {
                let log = gl.get_shader_info_log(shader);
                gl.delete_shader(shader);
                return Err(log);
            }

            Ok(Self {
                gl: Arc::clone(gl),
                id: shader,
            })
        }
    }

    /// Reads a shader source file and compiles it.
    pub fn from_file(
        gl: &Arc<glow::Context>,
        shader_type: u32,
        path: &Path,
    ) -> Result<Self, String> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
        Self::new(gl, shader_type, &source).map_err(|log| format!("{}: {log}", path.display()))
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_shader(self.id);
        }
    }
}

/// A value that can be uploaded to a uniform location.
pub trait Uniform {
    /// Uploads the value to the given location of the currently bound program.
    fn upload(&self, gl: &glow::Context, location: &glow::UniformLocation);
}

impl Uniform for f32 {
    fn upload(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe {
            gl.uniform_1_f32(Some(location), *self);
        }
    }
}

impl Uniform for i32 {
    fn upload(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe {
            gl.uniform_1_i32(Some(location), *self);
        }
    }
}

impl Uniform for Vec3 {
    fn upload(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe {
            gl.uniform_3_f32(Some(location), self.x, self.y, self.z);
        }
    }
}

impl Uniform for Mat4 {
    fn upload(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe {
            gl.uniform_matrix_4_f32_slice(Some(location), false, self.as_ref());
        }
    }
}

impl<T: Uniform> Uniform for &T {
    fn upload(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        (*self).upload(gl, location);
    }
}

/// Represents an OpenGL shader program composed of multiple shaders.
pub struct ShaderProgram {
    gl: Arc<glow::Context>,
    id: glow::Program,
}

impl ShaderProgram {
    /// Links a new shader program from the given shaders.
    pub fn new(gl: &Arc<glow::Context>, shaders: &[&Shader]) -> Result<Self, String> {
        unsafe {
            let program = gl.create_program().map_err(|e| e.to_string())?;

            for shader in shaders {
                gl.attach_shader(program, shader.id);
            }

            gl.link_program(program);

            if !gl.get_program_link_status(program) {
                let log = gl.get_program_info_log(program);
                gl.delete_program(program);
                return Err(log);
            }

            for shader in shaders {
                gl.detach_shader(program, shader.id);
            }

            Ok(Self {
                gl: Arc::clone(gl),
                id: program,
            })
        }
    }

    /// Compiles and links a vertex/fragment pair read from disk.
    pub fn from_files(
        gl: &Arc<glow::Context>,
        vertex: &Path,
        fragment: &Path,
    ) -> Result<Self, String> {
        let vert = Shader::from_file(gl, glow::VERTEX_SHADER, vertex)?;
        let frag = Shader::from_file(gl, glow::FRAGMENT_SHADER, fragment)?;
        Self::new(gl, &[&vert, &frag])
    }

    /// Binds the shader program for use.
    pub fn use_program(&self) {
        unsafe {
            self.gl.use_program(Some(self.id));
        }
    }

    /// Looks up a uniform by name.
    pub fn uniform_location(&self, name: &str) -> Result<glow::UniformLocation, String> {
        unsafe { self.gl.get_uniform_location(self.id, name) }
            .ok_or_else(|| format!("shader program has no active uniform '{name}'"))
    }

    /// Looks up a vertex attribute by name.
    pub fn attrib_location(&self, name: &str) -> Result<u32, String> {
        unsafe { self.gl.get_attrib_location(self.id, name) }
            .ok_or_else(|| format!("shader program has no active attribute '{name}'"))
    }

    /// Uploads a value to a resolved uniform. The program must be in use.
    pub fn set_uniform<T: Uniform>(&self, location: &glow::UniformLocation, value: T) {
        value.upload(&self.gl, location);
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_program(self.id);
        }
    }
}
