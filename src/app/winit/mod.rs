//! Winit front end
//!
//! Opens a window and forwards its events to a [`DemoApp`]:
//!
//! - `RedrawRequested` runs [`DemoApp::frame`]
//! - `CursorMoved` runs [`DemoApp::on_pointer_move`]
//! - mouse buttons and the wheel drive the camera orbit
//! - digit keys `1`..`9` select clips `0`..`8`
//! - `Resized` runs [`DemoApp::on_resize`]
//!
//! Nothing is drawn; the window only provides events and a frame cadence.

use std::sync::Arc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::app::input::PointerButton;
use crate::app::settings::DemoSettings;
use crate::app::state::DemoApp;
use crate::errors::{Error, Result};

/// Runs the demo in a window until it is closed.
pub fn run(settings: DemoSettings) -> Result<()> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut runner = AppRunner::new(settings);
    event_loop.run_app(&mut runner).map_err(Error::from)
}

/// Maps the top digit row to clip indices.
#[must_use]
pub fn clip_index_for_key(code: KeyCode) -> Option<usize> {
    let index = match code {
        KeyCode::Digit1 => 0,
        KeyCode::Digit2 => 1,
        KeyCode::Digit3 => 2,
        KeyCode::Digit4 => 3,
        KeyCode::Digit5 => 4,
        KeyCode::Digit6 => 5,
        KeyCode::Digit7 => 6,
        KeyCode::Digit8 => 7,
        KeyCode::Digit9 => 8,
        _ => return None,
    };
    Some(index)
}

fn pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Left),
        MouseButton::Right => Some(PointerButton::Right),
        MouseButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

/// Pixel deltas are scaled down to roughly one line per notch.
fn scroll_lines(delta: MouseScrollDelta) -> (f32, f32) {
    match delta {
        MouseScrollDelta::LineDelta(x, y) => (x, y),
        MouseScrollDelta::PixelDelta(pos) => (pos.x as f32 * 0.1, pos.y as f32 * 0.1),
    }
}

struct AppRunner {
    settings: Option<DemoSettings>,
    window: Option<Arc<Window>>,
    app: Option<DemoApp>,
    start_time: Instant,
}

impl AppRunner {
    fn new(settings: DemoSettings) -> Self {
        Self {
            settings: Some(settings),
            window: None,
            app: None,
            start_time: Instant::now(),
        }
    }

    fn handle_key(app: &mut DemoApp, event: &KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        let Some(index) = clip_index_for_key(code) else {
            return;
        };
        match app.select_clip(index) {
            Ok(()) => {}
            Err(Error::NotLoaded) => log::debug!("Clip {index} requested before the model loaded"),
            Err(e) => log::warn!("{e}"),
        }
    }
}

impl ApplicationHandler for AppRunner {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let Some(settings) = self.settings.take() else {
            return;
        };

        let window_attributes = Window::default_attributes()
            .with_title(&settings.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                settings.window.width,
                settings.window.height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let mut app = DemoApp::new(settings);
        let size = window.inner_size();
        app.on_resize(size.width, size.height);

        self.window = Some(window);
        self.app = Some(app);
        self.start_time = Instant::now();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(app) = &mut self.app else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(physical_size) => {
                app.on_resize(physical_size.width, physical_size.height);
            }
            WindowEvent::CursorMoved { position, .. } => {
                app.on_pointer_move(position.x, position.y);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(button) = pointer_button(button) {
                    app.on_pointer_button(button, state == ElementState::Pressed);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let (x, y) = scroll_lines(delta);
                app.on_scroll(x, y);
            }
            WindowEvent::KeyboardInput { event, .. } => Self::handle_key(app, &event),
            WindowEvent::RedrawRequested => {
                let timestamp_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
                app.frame(timestamp_ms);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
