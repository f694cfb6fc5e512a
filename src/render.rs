//! The draw pass.
//!
//! Uniform and attribute names are resolved when the renderer is built. The
//! projection matrix, the light position and the sampler unit never change and
//! are uploaded once; model-view and material are uploaded per object per frame.

use std::sync::Arc;

use glam::Mat4;
use glow::HasContext;
use sceneview_core::{
    Camera, DrawPass, LightSource, Scene, SceneAssets, SceneLayout, draw_calls,
};

use crate::{
    abs::{Mesh, ShaderProgram, Texture, VertexAttribs},
    error::StartupError,
};

/// GPU resources owned by one scene object.
pub struct GpuObject {
    pub mesh: Mesh,
    pub texture: Texture,
}

/// Resolved uniform locations of the scene shader.
struct SceneUniforms {
    mv: glow::UniformLocation,
    projection: glow::UniformLocation,
    light_pos: glow::UniformLocation,
    mat_ambient: glow::UniformLocation,
    mat_diffuse: glow::UniformLocation,
    mat_specular: glow::UniformLocation,
    mat_power: glow::UniformLocation,
    texture: glow::UniformLocation,
}

impl SceneUniforms {
    fn resolve(program: &ShaderProgram) -> Result<Self, String> {
        Ok(Self {
            mv: program.uniform_location("mv")?,
            projection: program.uniform_location("projection")?,
            light_pos: program.uniform_location("light_pos")?,
            mat_ambient: program.uniform_location("mat_ambient")?,
            mat_diffuse: program.uniform_location("mat_diffuse")?,
            mat_specular: program.uniform_location("mat_specular")?,
            mat_power: program.uniform_location("mat_power")?,
            texture: program.uniform_location("texsampler")?,
        })
    }
}

pub struct SceneRenderer {
    gl: Arc<glow::Context>,
    program: ShaderProgram,
    attribs: VertexAttribs,
    uniforms: SceneUniforms,
}

impl SceneRenderer {
    /// Builds the shader program named by the layout, resolves its inputs and
    /// uploads the per-run uniforms.
    pub fn new(
        gl: &Arc<glow::Context>,
        layout: &SceneLayout,
        projection: Mat4,
        light: &LightSource,
    ) -> Result<Self, StartupError> {
        let vertex = layout.resolve(&layout.shaders.vertex);
        let fragment = layout.resolve(&layout.shaders.fragment);
        let program = ShaderProgram::from_files(gl, &vertex, &fragment).map_err(|message| {
            StartupError::Shader {
                vertex: vertex.clone(),
                fragment: fragment.clone(),
                message,
            }
        })?;

        let attribs = VertexAttribs::resolve(&program).map_err(StartupError::Binding)?;
        let uniforms = SceneUniforms::resolve(&program).map_err(StartupError::Binding)?;

        program.use_program();
        program.set_uniform(&uniforms.projection, projection);
        program.set_uniform(&uniforms.light_pos, light.position);
        program.set_uniform(&uniforms.texture, 0i32);

        log::info!(
            "Shader program ready ({} + {})",
            vertex.display(),
            fragment.display()
        );

        Ok(Self {
            gl: Arc::clone(gl),
            program,
            attribs,
            uniforms,
        })
    }

    /// Uploads every object's mesh and texture, in layout order.
    pub fn upload(
        &self,
        layout: &SceneLayout,
        assets: &SceneAssets,
    ) -> Result<Vec<GpuObject>, StartupError> {
        layout
            .objects
            .iter()
            .zip(&assets.objects)
            .map(|(object, data)| {
                let upload_error = |message| StartupError::Upload {
                    name: object.name.clone(),
                    message,
                };
                let mesh = Mesh::new(&self.gl, &data.mesh, self.attribs).map_err(upload_error)?;
                let texture = Texture::new(&self.gl, &data.texture.image).map_err(upload_error)?;
                log::debug!(
                    "Uploaded '{}': {} vertices, {}x{} texture",
                    object.name,
                    mesh.vertex_count(),
                    texture.width(),
                    texture.height()
                );
                Ok(GpuObject { mesh, texture })
            })
            .collect()
    }
}

impl DrawPass<GpuObject> for SceneRenderer {
    fn draw(&mut self, camera: &Camera, scene: &Scene<GpuObject>) {
        unsafe {
            self.gl.clear_color(0.0, 0.0, 0.0, 1.0);
            self.gl
                .clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }

        self.program.use_program();
        for call in draw_calls(camera, scene) {
            let uniforms = &self.uniforms;
            self.program.set_uniform(&uniforms.mv, call.model_view);
            self.program.set_uniform(&uniforms.mat_ambient, call.material.ambient);
            self.program.set_uniform(&uniforms.mat_diffuse, call.material.diffuse);
            self.program.set_uniform(&uniforms.mat_specular, call.material.specular);
            self.program.set_uniform(&uniforms.mat_power, call.material.power);

            call.resources.texture.bind(0);
            call.resources.mesh.draw();
        }
    }
}
