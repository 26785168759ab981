use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use winit::{
    event::*,
    event_loop::{ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window, WindowBuilder},
};

use meadow_roam::config::{self, WorldConfig};
use meadow_roam::state::State;
use meadow_roam::world::World;

// Helper to handle the "messy" grab logic explicitly
fn set_cursor_grab(window: &Window, grabbed: bool) {
    if grabbed {
        if window.set_cursor_grab(CursorGrabMode::Locked).is_err() {
            // Locked is not supported everywhere (X11); confine instead
            let _ = window.set_cursor_grab(CursorGrabMode::Confined);
        }
        window.set_cursor_visible(false);
    } else {
        let _ = window.set_cursor_grab(CursorGrabMode::None);
        window.set_cursor_visible(true);
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let world_config = WorldConfig::load_or_default(config::CONFIG_FILE_PATH)?;
    let world = match World::new(&world_config) {
        Ok(world) => world,
        Err(e) => {
            log::error!("Terrain generation failed: {e}");
            World::without_terrain(&world_config)
        }
    };

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config::WINDOW_TITLE)
            .with_inner_size(winit::dpi::LogicalSize::new(1280.0, 720.0))
            .build(&event_loop)?,
    );
    set_cursor_grab(&window, false);

    let mut state = pollster::block_on(State::new(window.clone(), world))?;
    let mut last_frame = Instant::now();
    let mut last_fps_print = Instant::now();
    let mut frames = 0;

    event_loop.run(move |event, elwt| {
        match event {
            Event::WindowEvent { ref event, window_id } if window_id == window.id() => {
                // Pass input to state first
                if !state.input(event) {
                    match event {
                        WindowEvent::CloseRequested => elwt.exit(),
                        WindowEvent::Resized(physical_size) => state.resize(*physical_size),
                        WindowEvent::Focused(false) => {
                            state.input.release_all();
                            state.mouse_captured = false;
                            set_cursor_grab(&window, false);
                        }
                        WindowEvent::RedrawRequested => {
                            let now = Instant::now();
                            let dt = now.duration_since(last_frame).as_secs_f32().min(config::MAX_FRAME_DT);
                            last_frame = now;

                            state.update(dt);
                            match state.render() {
                                Ok(_) => {}
                                Err(wgpu::SurfaceError::Lost) => state.resize(state.ctx.size),
                                Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                                Err(e) => log::warn!("Render error: {e:?}"),
                            }
                        }
                        WindowEvent::MouseInput { state: ElementState::Pressed, button: MouseButton::Left, .. } => {
                            state.mouse_captured = true;
                            set_cursor_grab(&window, true);
                        }
                        WindowEvent::KeyboardInput {
                            event: KeyEvent { physical_key: PhysicalKey::Code(KeyCode::Escape), state: ElementState::Pressed, .. },
                            ..
                        } => {
                            state.mouse_captured = false;
                            set_cursor_grab(&window, false);
                        }
                        _ => {}
                    }
                }
            }
            Event::DeviceEvent { event: DeviceEvent::MouseMotion { delta }, .. } => {
                state.update_camera_rotation(delta);
            }
            Event::AboutToWait => {
                frames += 1;
                if last_fps_print.elapsed().as_secs_f32() >= 1.0 {
                    let p = state.world.character().position();
                    window.set_title(&format!(
                        "{} | FPS: {} | ({:.1}, {:.1}, {:.1}) {:?}",
                        config::WINDOW_TITLE,
                        frames,
                        p.x,
                        p.y,
                        p.z,
                        state.world.player().action(),
                    ));
                    frames = 0;
                    last_fps_print = Instant::now();
                }
                window.request_redraw();
            }
            _ => {}
        }
    })?;
    Ok(())
}
