use std::{path::PathBuf, process::ExitCode};

use sceneview_core::{SceneLayout, SystemClock};

mod abs;
mod error;
mod logging;
mod render;
mod viewer;

/// Where the built-in layout looks for its shaders, meshes and textures.
fn default_asset_root() -> PathBuf {
    std::env::var_os("SCENEVIEW_ASSETS")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("assets"))
}

fn main() -> ExitCode {
    // Frame deltas are measured from here.
    let clock = SystemClock::new();

    if let Err(e) = logging::init() {
        eprintln!("Failed to set up logging: {e}");
    }

    let layout = match std::env::args_os().nth(1) {
        Some(path) => SceneLayout::load(PathBuf::from(path)),
        None => SceneLayout::builtin(default_asset_root()),
    };

    let result = layout
        .map_err(error::StartupError::from)
        .and_then(|layout| viewer::run(layout, clock));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
