//! The core of the scene viewer. This crate contains everything that does
//! not need a live OpenGL context: the free-flying camera, the held-key
//! input buffer, the scene objects and their motion rules, resource loading
//! and the fixed-interval frame scheduler.
//!
//! The binary crate owns the window and the GL resources and plugs them into
//! [`frame::FrameScheduler`] through the [`frame::DrawPass`] trait.

pub mod assets;
pub mod camera;
pub mod clock;
pub mod frame;
pub mod input;
pub mod layout;
pub mod motion;
pub mod scene;

pub use assets::{AssetError, MeshData, ObjectAssets, SceneAssets, TextureData};
pub use camera::{Camera, CameraAction, MoveAxis, Projection};
pub use clock::{Clock, FrameClock, ManualClock, SystemClock};
pub use frame::{
    DrawCall, DrawPass, FrameScheduler, FrameStats, SchedulerState, ViewerState, draw_calls,
};
pub use input::{InputState, Key};
pub use layout::{CameraConfig, LayoutError, ObjectLayout, SceneLayout, WindowConfig};
pub use motion::MotionRule;
pub use scene::{LightSource, Material, Placement, Scene, SceneObject};
