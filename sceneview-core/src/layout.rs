//! Scene layout definitions.
//!
//! A layout is a JSON document describing the window, the shaders, the camera,
//! the light and every object in the scene. Relative paths inside it are
//! resolved against the directory the document was loaded from.

use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::Deserialize;

use crate::{
    camera::{Camera, Projection},
    motion::MotionRule,
    scene::{LightSource, Material, Placement},
};

/// The layout the viewer starts with when no document is given.
pub const BUILTIN_LAYOUT_JSON: &str = include_str!("builtin_scene.json");

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("failed to read layout {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed layout: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("layout contains no objects")]
    NoObjects,
    #[error("tick interval must be at least one millisecond")]
    ZeroTickInterval,
    #[error("window size {0}x{1} is invalid")]
    WindowSize(u32, u32),
    #[error("object '{0}' has a degenerate motion rule")]
    DegenerateMotion(String),
    #[error("expected {expected} object resources, found {found}")]
    ResourceCount { expected: usize, found: usize },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Wait for the display refresh on every swap. When off, frames are paced
    /// by `tick_interval_ms` alone.
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Scene Viewer".to_string(),
            width: 800,
            height: 600,
            vsync: false,
        }
    }
}

impl WindowConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShaderPaths {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
}

impl Default for ShaderPaths {
    fn default() -> Self {
        Self {
            vertex: PathBuf::from("shaders/scene/vert.glsl"),
            fragment: PathBuf::from("shaders/scene/frag.glsl"),
        }
    }
}

/// Starting pose of the camera.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            yaw: -90.0,
            pitch: 0.0,
        }
    }
}

impl From<CameraConfig> for Camera {
    fn from(config: CameraConfig) -> Self {
        Camera::new(config.position, config.yaw, config.pitch)
    }
}

/// One object entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ObjectLayout {
    pub name: String,
    pub mesh: PathBuf,
    pub texture: PathBuf,
    #[serde(default)]
    pub placement: Placement,
    #[serde(default)]
    pub material: Material,
    #[serde(default)]
    pub motion: MotionRule,
}

fn default_tick_interval() -> u64 {
    1
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SceneLayout {
    #[serde(default)]
    pub window: WindowConfig,
    /// Milliseconds between two frame ticks.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    #[serde(default)]
    pub shaders: ShaderPaths,
    #[serde(default)]
    pub projection: Projection,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub light: LightSource,
    pub objects: Vec<ObjectLayout>,
    #[serde(skip)]
    root: PathBuf,
}

impl SceneLayout {
    /// Parses and validates a layout. Relative paths resolve against `root`.
    pub fn from_json(s: &str, root: impl Into<PathBuf>) -> Result<Self, LayoutError> {
        let mut layout: SceneLayout = serde_json::from_str(s)?;
        layout.root = root.into();
        layout.validate()?;
        Ok(layout)
    }

    /// Reads a layout document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LayoutError> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path).map_err(|source| LayoutError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let root = path.parent().map(Path::to_path_buf).unwrap_or_default();
        log::info!("Loaded scene layout from {}", path.display());
        Self::from_json(&s, root)
    }

    /// The built-in layout with its assets under `asset_root`.
    pub fn builtin(asset_root: impl Into<PathBuf>) -> Result<Self, LayoutError> {
        Self::from_json(BUILTIN_LAYOUT_JSON, asset_root)
    }

    /// Resolves a path from the document against its directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn validate(&self) -> Result<(), LayoutError> {
        if self.objects.is_empty() {
            return Err(LayoutError::NoObjects);
        }
        if self.tick_interval_ms == 0 {
            return Err(LayoutError::ZeroTickInterval);
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(LayoutError::WindowSize(self.window.width, self.window.height));
        }
        if let Some(object) = self.objects.iter().find(|o| !o.motion.is_well_formed()) {
            return Err(LayoutError::DegenerateMotion(object.name.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use glam::Mat4;

    use super::*;

    const MINIMAL: &str = r#"{
        "objects": [
            { "name": "crate", "mesh": "crate.obj", "texture": "/abs/crate.bmp" }
        ]
    }"#;

    #[test]
    fn minimal_layout_uses_defaults() {
        let layout = SceneLayout::from_json(MINIMAL, "data").unwrap();
        assert_eq!(layout.window, WindowConfig::default());
        assert_eq!(layout.tick_interval_ms, 1);
        assert_eq!(layout.projection, Projection::default());
        assert_eq!(layout.light, LightSource::default());
        let object = &layout.objects[0];
        assert_eq!(object.motion, MotionRule::None);
        assert_eq!(object.material, Material::default());
        assert_eq!(object.placement, Placement::default());
    }

    #[test]
    fn builtin_objects_step_once_per_tick() {
        let layout = SceneLayout::builtin("assets").unwrap();
        assert!(!layout.window.vsync);
        let tick = layout.tick_interval_ms as f32;
        let spin = layout.objects[0].motion.increment(tick);
        let expected = Mat4::from_axis_angle(Vec3::new(1.0, 1.0, 0.0).normalize(), 0.01);
        assert!(spin.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn relative_paths_resolve_against_root() {
        let layout = SceneLayout::from_json(MINIMAL, "data").unwrap();
        let object = &layout.objects[0];
        assert_eq!(layout.resolve(&object.mesh), Path::new("data").join("crate.obj"));
        assert_eq!(layout.resolve(&object.texture), PathBuf::from("/abs/crate.bmp"));
    }

    #[test]
    fn empty_layout_is_rejected() {
        let err = SceneLayout::from_json(r#"{ "objects": [] }"#, "").unwrap_err();
        assert!(matches!(err, LayoutError::NoObjects));
    }

    #[test]
    fn zero_tick_interval_is_rejected() {
        let json = r#"{ "tick_interval_ms": 0, "objects": [
            { "name": "a", "mesh": "a.obj", "texture": "a.bmp" }
        ] }"#;
        let err = SceneLayout::from_json(json, "").unwrap_err();
        assert!(matches!(err, LayoutError::ZeroTickInterval));
    }

    #[test]
    fn degenerate_motion_is_rejected() {
        let json = r#"{ "objects": [
            { "name": "spinner", "mesh": "a.obj", "texture": "a.bmp",
              "motion": { "kind": "rotate", "axis": [0.0, 0.0, 0.0], "rate": 0.01 } }
        ] }"#;
        let err = SceneLayout::from_json(json, "").unwrap_err();
        assert!(matches!(err, LayoutError::DegenerateMotion(name) if name == "spinner"));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = SceneLayout::from_json("{ objects: ", "").unwrap_err();
        assert!(matches!(err, LayoutError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = SceneLayout::load("definitely/not/here.json").unwrap_err();
        assert!(matches!(err, LayoutError::Io { .. }));
    }

    #[test]
    fn builtin_layout_is_valid() {
        let layout = SceneLayout::builtin("assets").unwrap();
        assert_eq!(layout.objects.len(), 5);
        assert_eq!(layout.window.width, 800);
        assert_eq!(layout.window.height, 600);
        assert_eq!(Camera::from(layout.camera), Camera::default());
        assert!(matches!(layout.objects[4].motion, MotionRule::Translate { .. }));
    }
}
