//! Startup sequence and the scheduling loop.

use std::{ops::ControlFlow, time::Duration};

use glow::HasContext;
use sceneview_core::{
    FrameScheduler, InputState, Key, Scene, SceneAssets, SceneLayout, SystemClock, ViewerState,
};
use sdl2::{event::Event, keyboard::Keycode};

use crate::{abs::App, error::StartupError, render::SceneRenderer};

/// Maps an SDL keycode onto a viewer key.
fn key_from_sdl(keycode: Keycode) -> Option<Key> {
    let key = match keycode {
        Keycode::Escape => Key::Escape,
        Keycode::W => Key::W,
        Keycode::A => Key::A,
        Keycode::S => Key::S,
        Keycode::D => Key::D,
        Keycode::Q => Key::Q,
        Keycode::E => Key::E,
        Keycode::I => Key::I,
        Keycode::J => Key::J,
        Keycode::K => Key::K,
        Keycode::L => Key::L,
        _ => return None,
    };
    Some(key)
}

/// Feeds one SDL event into the input buffer.
fn handle_event(input: &mut InputState, event: &Event) -> ControlFlow<()> {
    match event {
        Event::Quit { .. } => ControlFlow::Break(()),
        Event::KeyDown {
            keycode: Some(keycode),
            repeat: false,
            ..
        } => match key_from_sdl(*keycode) {
            Some(key) => input.set_key(key, true),
            None => ControlFlow::Continue(()),
        },
        Event::KeyUp {
            keycode: Some(keycode),
            ..
        } => match key_from_sdl(*keycode) {
            Some(key) => input.set_key(key, false),
            None => ControlFlow::Continue(()),
        },
        _ => ControlFlow::Continue(()),
    }
}

/// Loads everything, opens the window and runs frames until the user quits.
pub fn run(layout: SceneLayout, clock: SystemClock) -> Result<(), StartupError> {
    // All file loading happens before any window or GL object exists.
    let assets = SceneAssets::load(&layout)?;

    let window = &layout.window;
    let mut app = App::new(&window.title, window.width, window.height, window.vsync)
        .map_err(StartupError::Window)?;

    unsafe {
        app.gl.enable(glow::DEPTH_TEST);
        app.gl.disable(glow::CULL_FACE);
        app.gl
            .viewport(0, 0, layout.window.width as i32, layout.window.height as i32);
    }

    let projection = layout.projection.matrix(layout.window.aspect_ratio());
    let mut renderer = SceneRenderer::new(&app.gl, &layout, projection, &layout.light)?;
    let objects = renderer.upload(&layout, &assets)?;
    drop(assets);

    let scene = Scene::from_layout(&layout, objects)?;
    let mut viewer = ViewerState::new(layout.camera.into(), scene);
    let mut scheduler =
        FrameScheduler::new(clock, Duration::from_millis(layout.tick_interval_ms));

    log::info!(
        "Entering frame loop with {} objects, tick every {:?}",
        viewer.scene.len(),
        scheduler.interval()
    );

    'running: loop {
        for event in app.event_pump.poll_iter() {
            if handle_event(&mut viewer.input, &event).is_break() {
                break 'running;
            }
        }

        if scheduler.is_due() {
            scheduler.tick(&mut viewer, &mut renderer);
            app.window.gl_swap_window();
            continue;
        }

        // Keep handling input while waiting for the next tick.
        let wait_ms = scheduler.until_next_tick().as_millis().max(1) as u32;
        if let Some(event) = app.event_pump.wait_event_timeout(wait_ms)
            && handle_event(&mut viewer.input, &event).is_break()
        {
            break 'running;
        }
    }

    log::info!("Stopped after {} frames", scheduler.ticks());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_and_look_keys_are_mapped() {
        assert_eq!(key_from_sdl(Keycode::W), Some(Key::W));
        assert_eq!(key_from_sdl(Keycode::L), Some(Key::L));
        assert_eq!(key_from_sdl(Keycode::Escape), Some(Key::Escape));
        assert_eq!(key_from_sdl(Keycode::Space), None);
    }
}
