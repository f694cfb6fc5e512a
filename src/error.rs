use std::path::PathBuf;

use sceneview_core::{AssetError, LayoutError};

/// Everything that can stop the viewer before the first frame.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Assets(#[from] AssetError),
    #[error("failed to open window: {0}")]
    Window(String),
    #[error("failed to build shader program from {vertex} and {fragment}: {message}")]
    Shader {
        vertex: PathBuf,
        fragment: PathBuf,
        message: String,
    },
    #[error("failed to bind shader inputs: {0}")]
    Binding(String),
    #[error("failed to upload object '{name}': {message}")]
    Upload { name: String, message: String },
}
