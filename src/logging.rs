//! Logger setup.
//!
//! Records go to stderr and to `sceneview.log` in the platform's local data
//! directory. The level defaults to `info` and can be changed with the
//! `SCENEVIEW_LOG` environment variable (`trace`, `debug`, ...).

use std::path::PathBuf;

use log::LevelFilter;

const LEVEL_VAR: &str = "SCENEVIEW_LOG";

fn level_from_env() -> LevelFilter {
    std::env::var(LEVEL_VAR)
        .ok()
        .and_then(|level| level.parse().ok())
        .unwrap_or(LevelFilter::Info)
}

/// `<data dir>/sceneview/sceneview.log`, if the platform has a data directory.
pub fn log_file_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("sceneview").join("sceneview.log"))
}

pub fn init() -> Result<(), fern::InitError> {
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {:<5} {}] {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level_from_env())
        .chain(std::io::stderr());

    let mut file_error = None;
    if let Some(path) = log_file_path() {
        let file = path
            .parent()
            .map_or(Ok(()), std::fs::create_dir_all)
            .and_then(|()| fern::log_file(&path));
        match file {
            Ok(file) => dispatch = dispatch.chain(file),
            Err(e) => file_error = Some((path, e)),
        }
    }

    dispatch.apply()?;

    if let Some((path, e)) = file_error {
        log::warn!("Cannot write {}, logging to stderr only: {e}", path.display());
    }
    Ok(())
}
