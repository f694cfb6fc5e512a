//! Scene state: a fixed set of objects and one shared light.
//!
//! Objects are created once from a [`SceneLayout`] and live for the whole run.
//! Only their model transforms change, through [`Scene::advance`].

use glam::{Mat4, Vec3};
use serde::Deserialize;

use crate::{
    layout::{LayoutError, SceneLayout},
    motion::MotionRule,
};

/// Phong material parameters of an object.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Material {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub power: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: Vec3::new(0.2, 0.2, 0.1),
            diffuse: Vec3::new(0.5, 0.5, 0.3),
            specular: Vec3::splat(0.7),
            power: 1024.0,
        }
    }
}

/// The single point light shared by every object.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LightSource {
    pub position: Vec3,
}

impl Default for LightSource {
    fn default() -> Self {
        Self {
            position: Vec3::splat(4.0),
        }
    }
}

/// Rotation part of a [`Placement`].
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Rotation {
    pub axis: Vec3,
    pub degrees: f32,
}

/// Initial placement of an object: translate, then rotate, then scale.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Placement {
    pub translation: Vec3,
    pub rotation: Option<Rotation>,
    pub scale: Option<Vec3>,
}

impl Placement {
    /// Composes the initial model matrix.
    pub fn matrix(&self) -> Mat4 {
        let mut model = Mat4::from_translation(self.translation);
        if let Some(rotation) = self.rotation {
            model *= Mat4::from_axis_angle(rotation.axis.normalize(), rotation.degrees.to_radians());
        }
        if let Some(scale) = self.scale {
            model *= Mat4::from_scale(scale);
        }
        model
    }
}

/// A single object in the scene.
///
/// `R` holds whatever render resources the caller attaches (GPU buffers and
/// textures in the viewer, `()` in tests).
#[derive(Debug)]
pub struct SceneObject<R> {
    name: String,
    model: Mat4,
    initial: Mat4,
    material: Material,
    motion: MotionRule,
    resources: R,
}

impl<R> SceneObject<R> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The current model transform.
    pub fn model(&self) -> Mat4 {
        self.model
    }

    /// The model transform the object started with.
    pub fn initial(&self) -> Mat4 {
        self.initial
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn motion(&self) -> MotionRule {
        self.motion
    }

    pub fn resources(&self) -> &R {
        &self.resources
    }

    /// Composes this frame's motion increment onto the current transform.
    fn advance(&mut self, delta_ms: f32) {
        if self.motion != MotionRule::None {
            self.model *= self.motion.increment(delta_ms);
        }
    }
}

/// All objects and the light, owned for the lifetime of the viewer.
#[derive(Debug)]
pub struct Scene<R> {
    objects: Vec<SceneObject<R>>,
    light: LightSource,
}

impl<R> Scene<R> {
    /// Builds the scene from a layout, attaching one resource value per object
    /// in layout order.
    pub fn from_layout(layout: &SceneLayout, resources: Vec<R>) -> Result<Self, LayoutError> {
        if resources.len() != layout.objects.len() {
            return Err(LayoutError::ResourceCount {
                expected: layout.objects.len(),
                found: resources.len(),
            });
        }

        Ok(Self::assemble(layout, resources))
    }

    fn assemble(layout: &SceneLayout, resources: impl IntoIterator<Item = R>) -> Self {
        let objects = layout
            .objects
            .iter()
            .zip(resources)
            .map(|(desc, resources)| {
                let model = desc.placement.matrix();
                SceneObject {
                    name: desc.name.clone(),
                    model,
                    initial: model,
                    material: desc.material,
                    motion: desc.motion,
                    resources,
                }
            })
            .collect::<Vec<_>>();

        log::debug!("Scene built with {} objects", objects.len());

        Self {
            objects,
            light: layout.light,
        }
    }

    /// Applies every object's motion rule for a frame of `delta_ms` milliseconds.
    pub fn advance(&mut self, delta_ms: f32) {
        for object in &mut self.objects {
            object.advance(delta_ms);
        }
    }

    pub fn objects(&self) -> &[SceneObject<R>] {
        &self.objects
    }

    pub fn light(&self) -> &LightSource {
        &self.light
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Scene<()> {
    /// Builds a scene with no render resources attached.
    pub fn without_resources(layout: &SceneLayout) -> Self {
        Self::assemble(layout, std::iter::repeat(()))
    }
}
